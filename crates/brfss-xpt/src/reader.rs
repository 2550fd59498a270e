//! XPT file reader.
//!
//! Header records are parsed up front; observations are then streamed one at
//! a time into per-column buffers, so memory tracks the decoded values rather
//! than the raw file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{Result, XptError};
use crate::float::{ibm_to_ieee, is_missing};
use crate::header::{
    DSCRPTR_HEADER_PREFIX, MEMBER_HEADER_PREFIX, NAMESTR_HEADER_PREFIX, OBS_HEADER_PREFIX,
    RECORD_LEN, align_to_record, expect_prefix, parse_dataset_label, parse_dataset_name,
    parse_namestr_len, parse_namestr_records, parse_variable_count, validate_library_header,
};
use crate::types::{ColumnData, XptColumn, XptDataset, XptReaderOptions};

/// XPT V5 file reader.
pub struct XptReader<R: Read> {
    reader: BufReader<R>,
    options: XptReaderOptions,
}

impl<R: Read> XptReader<R> {
    /// Create a new XPT reader.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, XptReaderOptions::default())
    }

    /// Create a new XPT reader with options.
    pub fn with_options(reader: R, options: XptReaderOptions) -> Self {
        Self {
            reader: BufReader::new(reader),
            options,
        }
    }

    /// Read the first member of the file.
    pub fn read_dataset(mut self) -> Result<XptDataset> {
        let library = self.read_record("LIBRARY HEADER")?;
        validate_library_header(&library)?;
        // Real header and modified header carry only SAS version and timestamps.
        self.read_record("LIBRARY REAL HEADER")?;
        self.read_record("LIBRARY SECOND HEADER")?;

        let member = self.read_record("MEMBER HEADER")?;
        expect_prefix(&member, MEMBER_HEADER_PREFIX, "MEMBER HEADER")?;
        let namestr_len = parse_namestr_len(&member)?;

        let dscrptr = self.read_record("DSCRPTR HEADER")?;
        expect_prefix(&dscrptr, DSCRPTR_HEADER_PREFIX, "DSCRPTR HEADER")?;

        let member_data = self.read_record("MEMBER DATA")?;
        let name = parse_dataset_name(&member_data)?;
        let member_second = self.read_record("MEMBER SECOND")?;
        let label = parse_dataset_label(&member_second);

        let namestr_header = self.read_record("NAMESTR HEADER")?;
        expect_prefix(&namestr_header, NAMESTR_HEADER_PREFIX, "NAMESTR HEADER")?;
        let var_count = parse_variable_count(&namestr_header)?;

        let namestr_total = var_count
            .checked_mul(namestr_len)
            .ok_or(XptError::ObservationOverflow)?;
        let mut namestr_block = vec![0u8; align_to_record(namestr_total)];
        self.reader.read_exact(&mut namestr_block).map_err(eof_as_format)?;
        let columns = parse_namestr_records(&namestr_block, var_count, namestr_len)?;

        let obs = self.read_record("OBS HEADER")?;
        expect_prefix(&obs, OBS_HEADER_PREFIX, "OBS HEADER")?;

        let data = self.read_observations(&columns)?;
        Ok(XptDataset {
            name,
            label,
            columns,
            data,
        })
    }

    fn read_record(&mut self, expected: &'static str) -> Result<[u8; RECORD_LEN]> {
        let mut record = [0u8; RECORD_LEN];
        self.reader.read_exact(&mut record).map_err(|e| {
            if e.kind() == ErrorKind::UnexpectedEof {
                XptError::missing_header(expected)
            } else {
                XptError::Io(e)
            }
        })?;
        Ok(record)
    }

    fn read_observations(&mut self, columns: &[XptColumn]) -> Result<Vec<ColumnData>> {
        let mut data: Vec<ColumnData> = columns
            .iter()
            .map(|column| ColumnData::for_type(column.data_type))
            .collect();
        let obs_len = observation_length(columns)?;
        if obs_len == 0 {
            return Ok(data);
        }

        let mut row = vec![0u8; obs_len];
        let mut rows = 0usize;
        let mut trailing_blank = 0usize;
        loop {
            let filled = read_full(&mut self.reader, &mut row)?;
            if filled == 0 {
                break;
            }
            if filled < obs_len {
                // The final record is padded with blanks to 80 bytes.
                if row[..filled].iter().all(|&b| b == b' ') {
                    break;
                }
                return Err(XptError::TrailingBytes);
            }

            decode_row(&row, rows, columns, &mut data, &self.options)?;
            if row.iter().all(|&b| b == b' ') {
                trailing_blank += 1;
            } else {
                trailing_blank = 0;
            }
            rows += 1;
        }

        // Blank padding that happens to span whole observations is not data.
        let kept = rows - trailing_blank;
        for column in &mut data {
            column.truncate(kept);
        }
        Ok(data)
    }
}

impl XptReader<File> {
    /// Open an XPT file for reading.
    pub fn open(path: &Path) -> Result<Self> {
        Self::open_with_options(path, XptReaderOptions::default())
    }

    /// Open an XPT file with options.
    pub fn open_with_options(path: &Path, options: XptReaderOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                XptError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                XptError::Io(e)
            }
        })?;
        Ok(Self::with_options(file, options))
    }
}

/// Read an XPT file from a path.
pub fn read_xpt(path: &Path) -> Result<XptDataset> {
    XptReader::open(path)?.read_dataset()
}

/// Read an XPT file with options.
pub fn read_xpt_with_options(path: &Path, options: XptReaderOptions) -> Result<XptDataset> {
    XptReader::open_with_options(path, options)?.read_dataset()
}

/// Observation length: the furthest byte any variable occupies.
fn observation_length(columns: &[XptColumn]) -> Result<usize> {
    let mut total = 0usize;
    for column in columns {
        let end = column
            .position
            .checked_add(column.length)
            .ok_or(XptError::ObservationOverflow)?;
        total = total.max(end);
    }
    Ok(total)
}

fn decode_row(
    row: &[u8],
    row_idx: usize,
    columns: &[XptColumn],
    data: &mut [ColumnData],
    options: &XptReaderOptions,
) -> Result<()> {
    for (column, values) in columns.iter().zip(data.iter_mut()) {
        let slice = &row[column.position..column.position + column.length];
        match values {
            ColumnData::Numeric(values) => values.push(decode_numeric(slice)),
            ColumnData::Text(values) => {
                values.push(decode_text(slice, column, row_idx, options)?);
            }
        }
    }
    Ok(())
}

/// Decode a numeric value; SAS missing values become `None`.
fn decode_numeric(bytes: &[u8]) -> Option<f64> {
    if is_missing(bytes) {
        return None;
    }
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    Some(ibm_to_ieee(buf))
}

/// Decode a character value; blank values become `None`.
fn decode_text(
    bytes: &[u8],
    column: &XptColumn,
    row: usize,
    options: &XptReaderOptions,
) -> Result<Option<String>> {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |idx| idx + 1);
    if end == 0 {
        return Ok(None);
    }
    let bytes = if options.trim_strings {
        &bytes[..end]
    } else {
        bytes
    };
    options
        .encoding
        .decode(bytes)
        .map(Some)
        .ok_or_else(|| XptError::Encoding {
            column: column.name.clone(),
            row,
            encoding: options.encoding.as_str(),
        })
}

/// Fill `buf` from the reader, returning fewer bytes only at end of input.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(XptError::Io(e)),
        }
    }
    Ok(filled)
}

fn eof_as_format(e: std::io::Error) -> XptError {
    if e.kind() == ErrorKind::UnexpectedEof {
        XptError::invalid_format("NAMESTR records truncated")
    } else {
        XptError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float::MISSING;
    use crate::types::{TextEncoding, XptType};

    fn text_column(name: &str, length: usize) -> XptColumn {
        XptColumn {
            name: name.to_string(),
            label: None,
            data_type: XptType::Char,
            length,
            position: 0,
        }
    }

    #[test]
    fn test_decode_numeric() {
        assert_eq!(decode_numeric(&MISSING), None);
        assert_eq!(decode_numeric(&[0x41, 0x10, 0, 0, 0, 0, 0, 0]), Some(1.0));
        // Truncated 3-byte numeric.
        assert_eq!(decode_numeric(&[0x41, 0x20, 0]), Some(2.0));
    }

    #[test]
    fn test_decode_text() {
        let column = text_column("STATE", 8);
        let options = XptReaderOptions::default();
        assert_eq!(
            decode_text(b"Ohio    ", &column, 0, &options).unwrap(),
            Some("Ohio".to_string())
        );
        assert_eq!(decode_text(b"        ", &column, 0, &options).unwrap(), None);
    }

    #[test]
    fn test_decode_text_encoding_error() {
        let column = text_column("CITY", 4);
        let strict = XptReaderOptions::default();
        let err = decode_text(&[b'S', 0xe3, b'o', b' '], &column, 7, &strict).unwrap_err();
        assert!(matches!(err, XptError::Encoding { row: 7, .. }));

        let latin1 = XptReaderOptions::default().with_encoding(TextEncoding::Latin1);
        assert_eq!(
            decode_text(&[b'S', 0xe3, b'o', b' '], &column, 7, &latin1).unwrap(),
            Some("São".to_string())
        );
    }

    #[test]
    fn test_observation_length() {
        let mut a = text_column("A", 8);
        a.data_type = XptType::Num;
        let mut b = text_column("B", 20);
        b.position = 8;
        assert_eq!(observation_length(&[a, b]).unwrap(), 28);
    }
}
