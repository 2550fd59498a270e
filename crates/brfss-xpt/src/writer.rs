//! XPT V5 writer.
//!
//! Produces single-member transport files in the layout the reader accepts.
//! Variable positions are assigned sequentially from each column's length.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, XptError};
use crate::float::{MISSING, ieee_to_ibm};
use crate::header::{
    DSCRPTR_HEADER_PREFIX, LIBRARY_HEADER_PREFIX, MEMBER_HEADER_PREFIX, NAMESTR_HEADER_PREFIX,
    NAMESTR_LEN, OBS_HEADER_PREFIX, RECORD_LEN,
};
use crate::types::{ColumnData, XptColumn, XptDataset, XptType, XptWriterOptions};

/// XPT file writer.
pub struct XptWriter<W: Write> {
    writer: BufWriter<W>,
    options: XptWriterOptions,
}

impl<W: Write> XptWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XptWriterOptions::default())
    }

    pub fn with_options(writer: W, options: XptWriterOptions) -> Self {
        Self {
            writer: BufWriter::new(writer),
            options,
        }
    }

    /// Write a dataset as the only member of the file.
    pub fn write_dataset(mut self, dataset: &XptDataset) -> Result<()> {
        validate_dataset(dataset)?;

        self.writer.write_all(&header_record(LIBRARY_HEADER_PREFIX, &[]))?;
        self.writer
            .write_all(&text_record(&[(0, "SAS"), (8, "SAS"), (16, "SASLIB"), (24, "9.4")]))?;
        self.writer.write_all(&text_record(&[]))?;

        self.writer
            .write_all(&header_record(MEMBER_HEADER_PREFIX, &[(74, "0140")]))?;
        self.writer.write_all(&header_record(DSCRPTR_HEADER_PREFIX, &[]))?;
        self.writer
            .write_all(&text_record(&[(0, "SAS"), (8, dataset.name.as_str()), (16, "SASDATA")]))?;
        let label = dataset.label.as_deref().unwrap_or_default();
        self.writer.write_all(&text_record(&[(32, label)]))?;

        let count = format!("{:04}", dataset.columns.len());
        self.writer
            .write_all(&header_record(NAMESTR_HEADER_PREFIX, &[(54, count.as_str())]))?;
        let mut records = RecordWriter::new(&mut self.writer);
        let mut position = 0usize;
        for (idx, column) in dataset.columns.iter().enumerate() {
            records.write_bytes(&build_namestr(column, idx + 1, position))?;
            position += column.length;
        }
        records.finish()?;

        self.writer.write_all(&header_record(OBS_HEADER_PREFIX, &[]))?;
        self.write_observations(dataset, position)?;

        self.writer.flush()?;
        Ok(())
    }

    fn write_observations(&mut self, dataset: &XptDataset, obs_len: usize) -> Result<()> {
        let encoding = self.options.encoding;
        let mut records = RecordWriter::new(&mut self.writer);
        for row in 0..dataset.num_rows() {
            let mut obs = Vec::with_capacity(obs_len);
            for (column, values) in dataset.columns.iter().zip(&dataset.data) {
                match values {
                    ColumnData::Numeric(values) => {
                        let bytes = match values[row] {
                            Some(value) => ieee_to_ibm(value)?,
                            None => MISSING,
                        };
                        obs.extend_from_slice(&bytes[..column.length]);
                    }
                    ColumnData::Text(values) => {
                        let mut bytes = values[row]
                            .as_deref()
                            .map(|text| encoding.encode(text))
                            .unwrap_or_default();
                        bytes.resize(column.length, b' ');
                        obs.extend_from_slice(&bytes);
                    }
                }
            }
            records.write_bytes(&obs)?;
        }
        records.finish()
    }
}

impl XptWriter<File> {
    /// Create an XPT file for writing.
    pub fn create(path: &Path) -> Result<Self> {
        Ok(Self::new(File::create(path)?))
    }

    pub fn create_with_options(path: &Path, options: XptWriterOptions) -> Result<Self> {
        Ok(Self::with_options(File::create(path)?, options))
    }
}

/// Write a dataset to an XPT file.
pub fn write_xpt(path: &Path, dataset: &XptDataset) -> Result<()> {
    XptWriter::create(path)?.write_dataset(dataset)
}

/// Write a dataset to an XPT file with options.
pub fn write_xpt_with_options(
    path: &Path,
    dataset: &XptDataset,
    options: XptWriterOptions,
) -> Result<()> {
    XptWriter::create_with_options(path, options)?.write_dataset(dataset)
}

fn validate_dataset(dataset: &XptDataset) -> Result<()> {
    if dataset.name.is_empty() || dataset.name.len() > 8 {
        return Err(XptError::invalid_format(format!(
            "dataset name '{}' must be 1-8 characters",
            dataset.name
        )));
    }
    if dataset.columns.len() != dataset.data.len() {
        return Err(XptError::invalid_format("column and data counts differ"));
    }
    let rows = dataset.num_rows();
    for (index, (column, values)) in dataset.columns.iter().zip(&dataset.data).enumerate() {
        let invalid = |message: String| XptError::InvalidNamestr { index, message };
        if column.name.is_empty() || column.name.len() > 8 {
            return Err(invalid(format!(
                "variable name '{}' must be 1-8 characters",
                column.name
            )));
        }
        if values.len() != rows {
            return Err(invalid(format!("{} values, expected {rows}", values.len())));
        }
        let type_matches = matches!(
            (column.data_type, values),
            (XptType::Num, ColumnData::Numeric(_)) | (XptType::Char, ColumnData::Text(_))
        );
        if !type_matches {
            return Err(invalid("values do not match the variable type".to_string()));
        }
        let valid_length = match column.data_type {
            XptType::Num => (2..=8).contains(&column.length),
            XptType::Char => (1..=200).contains(&column.length),
        };
        if !valid_length {
            return Err(invalid(format!("invalid length {}", column.length)));
        }
    }
    Ok(())
}

fn build_namestr(column: &XptColumn, varnum: usize, position: usize) -> [u8; NAMESTR_LEN] {
    let mut buf = [0u8; NAMESTR_LEN];
    let ntype: i16 = match column.data_type {
        XptType::Num => 1,
        XptType::Char => 2,
    };
    buf[0..2].copy_from_slice(&ntype.to_be_bytes());
    // Lengths are validated to fit before writing.
    buf[4..6].copy_from_slice(&(column.length as i16).to_be_bytes());
    buf[6..8].copy_from_slice(&(varnum as i16).to_be_bytes());
    write_padded(&mut buf, 8, &column.name, 8);
    write_padded(&mut buf, 16, column.label.as_deref().unwrap_or_default(), 40);
    write_padded(&mut buf, 56, "", 8);
    write_padded(&mut buf, 72, "", 8);
    buf[84..88].copy_from_slice(&(position as i32).to_be_bytes());
    buf
}

fn header_record(prefix: &str, fields: &[(usize, &str)]) -> [u8; RECORD_LEN] {
    let mut record = text_record(fields);
    record[..prefix.len()].copy_from_slice(prefix.as_bytes());
    record
}

fn text_record(fields: &[(usize, &str)]) -> [u8; RECORD_LEN] {
    let mut record = [b' '; RECORD_LEN];
    for (offset, text) in fields {
        write_padded(&mut record, *offset, text, text.len());
    }
    record
}

fn write_padded(buf: &mut [u8], offset: usize, text: &str, width: usize) {
    let bytes = text.as_bytes();
    let len = bytes.len().min(width);
    buf[offset..offset + len].copy_from_slice(&bytes[..len]);
    buf[offset + len..offset + width].fill(b' ');
}

/// Writes a byte stream and pads the last record with blanks.
struct RecordWriter<'a, W: Write> {
    writer: &'a mut W,
    written: usize,
}

impl<'a, W: Write> RecordWriter<'a, W> {
    fn new(writer: &'a mut W) -> Self {
        Self { writer, written: 0 }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.written += bytes.len();
        Ok(())
    }

    fn finish(self) -> Result<()> {
        let remainder = self.written % RECORD_LEN;
        if remainder != 0 {
            self.writer.write_all(&vec![b' '; RECORD_LEN - remainder])?;
        }
        Ok(())
    }
}
