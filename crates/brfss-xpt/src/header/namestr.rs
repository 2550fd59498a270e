//! NAMESTR record parsing.
//!
//! # NAMESTR Structure (140 bytes)
//!
//! | Offset | Field   | Type     | Description                    |
//! |--------|---------|----------|--------------------------------|
//! | 0-1    | ntype   | short    | 1=NUMERIC, 2=CHAR              |
//! | 4-5    | nlng    | short    | Variable length in observation |
//! | 8-15   | nname   | char[8]  | Variable name                  |
//! | 16-55  | nlabel  | char[40] | Variable label                 |
//! | 84-87  | npos    | long     | Position in observation        |
//!
//! Format and informat fields are not needed to decode values and are skipped.

use crate::error::{Result, XptError};
use crate::types::{XptColumn, XptType};

use super::read_string;

/// Standard NAMESTR length.
pub const NAMESTR_LEN: usize = 140;

/// VAX/VMS NAMESTR length.
pub const NAMESTR_LEN_VAX: usize = 136;

/// Parse a single NAMESTR record.
pub fn parse_namestr(data: &[u8], index: usize) -> Result<XptColumn> {
    if data.len() < 88 {
        return Err(XptError::InvalidNamestr {
            index,
            message: format!("data too short: {} bytes", data.len()),
        });
    }

    let ntype = read_i16(data, 0);
    let data_type = XptType::from_ntype(ntype).ok_or_else(|| XptError::InvalidNamestr {
        index,
        message: format!("invalid ntype: {ntype}"),
    })?;

    let length = usize::try_from(read_i16(data, 4)).unwrap_or(0);
    if length == 0 {
        return Err(XptError::InvalidNamestr {
            index,
            message: "variable length is zero".to_string(),
        });
    }
    if data_type == XptType::Num && length > 8 {
        return Err(XptError::InvalidNamestr {
            index,
            message: format!("numeric length {length} exceeds 8 bytes"),
        });
    }

    let name = read_string(data, 8, 8);
    if name.is_empty() {
        return Err(XptError::InvalidNamestr {
            index,
            message: "empty variable name".to_string(),
        });
    }

    let label = read_string(data, 16, 40);
    let position = usize::try_from(read_i32(data, 84)).map_err(|_| XptError::InvalidNamestr {
        index,
        message: "negative observation position".to_string(),
    })?;

    Ok(XptColumn {
        name,
        label: if label.is_empty() { None } else { Some(label) },
        data_type,
        length,
        position,
    })
}

/// Parse `var_count` consecutive NAMESTR records.
pub fn parse_namestr_records(
    data: &[u8],
    var_count: usize,
    namestr_len: usize,
) -> Result<Vec<XptColumn>> {
    if namestr_len != NAMESTR_LEN && namestr_len != NAMESTR_LEN_VAX {
        return Err(XptError::invalid_format(format!(
            "unsupported NAMESTR length {namestr_len}"
        )));
    }
    (0..var_count)
        .map(|index| {
            let start = index * namestr_len;
            let chunk = data
                .get(start..start + namestr_len)
                .ok_or_else(|| XptError::InvalidNamestr {
                    index,
                    message: "record truncated".to_string(),
                })?;
            parse_namestr(chunk, index)
        })
        .collect()
}

fn read_i16(data: &[u8], offset: usize) -> i16 {
    i16::from_be_bytes([data[offset], data[offset + 1]])
}

fn read_i32(data: &[u8], offset: usize) -> i32 {
    i32::from_be_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namestr(ntype: i16, length: i16, name: &str, position: i32) -> Vec<u8> {
        let mut buf = vec![0u8; NAMESTR_LEN];
        buf[0..2].copy_from_slice(&ntype.to_be_bytes());
        buf[4..6].copy_from_slice(&length.to_be_bytes());
        buf[8..16].copy_from_slice(format!("{name:<8}").as_bytes());
        buf[16..56].copy_from_slice(&[b' '; 40]);
        buf[84..88].copy_from_slice(&position.to_be_bytes());
        buf
    }

    #[test]
    fn test_parse_numeric_namestr() {
        let column = parse_namestr(&namestr(1, 8, "_STATE", 0), 0).unwrap();
        assert_eq!(column.name, "_STATE");
        assert_eq!(column.data_type, XptType::Num);
        assert_eq!(column.length, 8);
        assert_eq!(column.label, None);
    }

    #[test]
    fn test_rejects_bad_type_and_length() {
        assert!(parse_namestr(&namestr(3, 8, "X", 0), 0).is_err());
        assert!(parse_namestr(&namestr(1, 0, "X", 0), 0).is_err());
        assert!(parse_namestr(&namestr(1, 12, "X", 0), 0).is_err());
    }

    #[test]
    fn test_parse_records() {
        let mut data = namestr(1, 8, "SEX", 0);
        data.extend(namestr(2, 10, "IDATE", 8));
        let columns = parse_namestr_records(&data, 2, NAMESTR_LEN).unwrap();
        assert_eq!(columns[1].name, "IDATE");
        assert_eq!(columns[1].position, 8);
    }
}
