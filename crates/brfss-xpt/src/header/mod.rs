//! XPT header record parsing.
//!
//! A V5 transport file is a sequence of 80-byte records:
//! - Library headers (file-level metadata)
//! - Member headers (dataset-level metadata)
//! - NAMESTR records (variable definitions)
//! - OBS header (marks start of observation data)

pub mod member;
pub mod namestr;

pub use member::{
    DSCRPTR_HEADER_PREFIX, LIBRARY_HEADER_PREFIX, LIBRARY_V8_HEADER_PREFIX, MEMBER_HEADER_PREFIX,
    NAMESTR_HEADER_PREFIX, OBS_HEADER_PREFIX, align_to_record, expect_prefix,
    parse_dataset_label, parse_dataset_name, parse_namestr_len, parse_variable_count,
    validate_library_header,
};
pub use namestr::{NAMESTR_LEN, NAMESTR_LEN_VAX, parse_namestr, parse_namestr_records};

/// Record length in bytes.
pub const RECORD_LEN: usize = 80;

/// Read a space-padded text field, trimming trailing blanks.
pub(crate) fn read_string(data: &[u8], offset: usize, len: usize) -> String {
    data.get(offset..offset + len)
        .map(|slice| String::from_utf8_lossy(slice).trim_end().to_string())
        .unwrap_or_default()
}
