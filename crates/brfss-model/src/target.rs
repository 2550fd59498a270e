//! Fixed binarization table for the diabetes status question.

/// Raw survey code to label. Codes outside the table have no label.
pub const TARGET_MAPPING: [(i64, u8); 7] = [
    (1, 1), // yes
    (2, 1), // pre-diabetic
    (3, 0), // gestational
    (4, 0), // no
    (5, 0), // don't know
    (7, 0), // refused
    (9, 0), // missing
];

/// Binarize a raw target code.
pub fn map_target_code(value: f64) -> Option<f64> {
    if value.fract() != 0.0 {
        return None;
    }
    let code = value as i64;
    TARGET_MAPPING
        .iter()
        .find(|(raw, _)| *raw == code)
        .map(|(_, label)| f64::from(*label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_and_pre_diabetic_are_positive() {
        assert_eq!(map_target_code(1.0), Some(1.0));
        assert_eq!(map_target_code(2.0), Some(1.0));
    }

    #[test]
    fn no_gestational_and_nonresponse_are_negative() {
        for code in [3.0, 4.0, 5.0, 7.0, 9.0] {
            assert_eq!(map_target_code(code), Some(0.0), "code {code}");
        }
    }

    #[test]
    fn unmapped_codes_have_no_label() {
        assert_eq!(map_target_code(6.0), None);
        assert_eq!(map_target_code(77.0), None);
        assert_eq!(map_target_code(1.5), None);
        assert_eq!(map_target_code(-1.0), None);
    }
}
