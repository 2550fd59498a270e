//! Library and member header records.
//!
//! # Layout
//!
//! 1. `LIBRARY HEADER` followed by two records of SAS version and timestamps
//! 2. `MEMBER HEADER` carrying the NAMESTR length at offset 74
//! 3. `DSCRPTR HEADER`, then the member data record (dataset name at 8)
//!    and the member second record (dataset label at 32)
//! 4. `NAMESTR HEADER` carrying the variable count at offset 54
//! 5. NAMESTR records, padded to a record boundary
//! 6. `OBS HEADER`, then observations until end of file

use crate::error::{Result, XptError};

use super::{RECORD_LEN, read_string};

pub const LIBRARY_HEADER_PREFIX: &str = "HEADER RECORD*******LIBRARY HEADER RECORD!!!!!!!";
pub const LIBRARY_V8_HEADER_PREFIX: &str = "HEADER RECORD*******LIBV8   HEADER RECORD!!!!!!!";
pub const MEMBER_HEADER_PREFIX: &str = "HEADER RECORD*******MEMBER  HEADER RECORD!!!!!!!";
pub const DSCRPTR_HEADER_PREFIX: &str = "HEADER RECORD*******DSCRPTR HEADER RECORD!!!!!!!";
pub const NAMESTR_HEADER_PREFIX: &str = "HEADER RECORD*******NAMESTR HEADER RECORD!!!!!!!";
pub const OBS_HEADER_PREFIX: &str = "HEADER RECORD*******OBS     HEADER RECORD!!!!!!!";

/// Validate the first record of the file.
///
/// V8 transport files are recognised and rejected; survey releases are V5.
pub fn validate_library_header(record: &[u8]) -> Result<()> {
    if record.starts_with(LIBRARY_V8_HEADER_PREFIX.as_bytes()) {
        return Err(XptError::UnsupportedVersion { version: "V8" });
    }
    expect_prefix(record, LIBRARY_HEADER_PREFIX, "LIBRARY HEADER")
}

/// Check that a record starts with the given header prefix.
pub fn expect_prefix(record: &[u8], prefix: &str, expected: &'static str) -> Result<()> {
    if record.len() < RECORD_LEN {
        return Err(XptError::invalid_format("record too short"));
    }
    if !record.starts_with(prefix.as_bytes()) {
        return Err(XptError::missing_header(expected));
    }
    Ok(())
}

/// NAMESTR length from the member header (140, or 136 on VAX/VMS).
pub fn parse_namestr_len(record: &[u8]) -> Result<usize> {
    parse_number(record, 74, 4, "NAMESTR length")
}

/// Variable count from the NAMESTR header.
pub fn parse_variable_count(record: &[u8]) -> Result<usize> {
    parse_number(record, 54, 4, "variable count")
}

/// Dataset name from the member data record.
pub fn parse_dataset_name(record: &[u8]) -> Result<String> {
    let name = read_string(record, 8, 8);
    if name.is_empty() {
        return Err(XptError::invalid_format("empty dataset name"));
    }
    Ok(name)
}

/// Dataset label from the member second record.
pub fn parse_dataset_label(record: &[u8]) -> Option<String> {
    let label = read_string(record, 32, 40);
    if label.is_empty() { None } else { Some(label) }
}

/// Round a byte count up to the next record boundary.
pub fn align_to_record(size: usize) -> usize {
    size.next_multiple_of(RECORD_LEN)
}

fn parse_number(record: &[u8], offset: usize, len: usize, field: &str) -> Result<usize> {
    read_string(record, offset, len)
        .trim()
        .parse::<usize>()
        .map_err(|_| XptError::NumericParse {
            field: field.to_string(),
        })
}
