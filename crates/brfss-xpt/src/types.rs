//! Core types for decoded XPT datasets.

use std::fmt;

/// Variable storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XptType {
    /// IBM float, 3 to 8 bytes.
    Num,
    /// Space-padded text.
    Char,
}

impl XptType {
    /// Map the NAMESTR `ntype` field.
    pub fn from_ntype(ntype: i16) -> Option<Self> {
        match ntype {
            1 => Some(Self::Num),
            2 => Some(Self::Char),
            _ => None,
        }
    }
}

/// A variable definition from a NAMESTR record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XptColumn {
    pub name: String,
    pub label: Option<String>,
    pub data_type: XptType,
    /// Width in bytes within each observation.
    pub length: usize,
    /// Byte offset within each observation.
    pub position: usize,
}

/// Text encoding used for character variables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    /// Strict UTF-8; invalid bytes are an error.
    #[default]
    Utf8,
    /// ISO-8859-1; every byte decodes.
    Latin1,
}

impl TextEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Latin1 => "Latin-1",
        }
    }

    /// Decode a field, returning `None` on invalid input.
    pub(crate) fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_string),
            Self::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode text, replacing characters outside the encoding with `?`.
    pub(crate) fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Latin1 => text
                .chars()
                .map(|ch| u8::try_from(u32::from(ch)).unwrap_or(b'?'))
                .collect(),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for reading XPT files.
#[derive(Debug, Clone)]
pub struct XptReaderOptions {
    /// Encoding for character variables.
    pub encoding: TextEncoding,
    /// Trim trailing blanks from character values.
    pub trim_strings: bool,
}

impl Default for XptReaderOptions {
    fn default() -> Self {
        Self {
            encoding: TextEncoding::Utf8,
            trim_strings: true,
        }
    }
}

impl XptReaderOptions {
    #[must_use]
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Options for writing XPT files.
#[derive(Debug, Clone, Default)]
pub struct XptWriterOptions {
    /// Encoding for character variables.
    pub encoding: TextEncoding,
}

/// Decoded values of one variable.
///
/// SAS missing values and blank strings are `None`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub(crate) fn for_type(data_type: XptType) -> Self {
        match data_type {
            XptType::Num => Self::Numeric(Vec::new()),
            XptType::Char => Self::Text(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Self::Numeric(values) => Some(values),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Self::Text(values) => Some(values),
            Self::Numeric(_) => None,
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        match self {
            Self::Numeric(values) => values.truncate(len),
            Self::Text(values) => values.truncate(len),
        }
    }
}

/// A decoded dataset, stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct XptDataset {
    pub name: String,
    pub label: Option<String>,
    pub columns: Vec<XptColumn>,
    /// One entry per column, same order as `columns`.
    pub data: Vec<ColumnData>,
}

impl XptDataset {
    pub fn num_rows(&self) -> usize {
        self.data.first().map_or(0, ColumnData::len)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    /// Values of the named column.
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .position(|column| column.name == name)
            .map(|idx| &self.data[idx])
    }
}
