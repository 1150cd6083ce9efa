//! Selection of the tab separated fields a record is hashed on.
use std::{borrow::Cow, fmt::Display, str::FromStr};

use itertools::Itertools;
use thiserror::Error;

/// Delimiter between the fields of a record
pub const FIELD_DELIMITER: u8 = b'\t';
/// Most field indices a parsed spec may select, ranges expanded
pub const MAX_SELECTED_FIELDS: usize = 65_536;

/// Ordered list of 0-based field indices forming the hash key of a record.
///
/// The textual form uses 1-based positions and inclusive ranges in the style of
/// `cut -f`, so `"1,3-5"` selects the indices `[0, 2, 3, 4]`. Order and repeats
/// are kept as given: `"3,1,1"` hashes field 3 followed by field 1 twice.
///
/// An empty spec hashes the whole raw record, line terminator included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSpec(Vec<usize>);

impl FieldSpec {
    /// Create a spec from 0-based indices
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// The 0-based indices in hashing order
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// True if the whole record is hashed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the exact bytes to hash for `record`.
    ///
    /// With an empty spec this is the record itself. Otherwise the trailing
    /// newline is dropped, the record is split on [FIELD_DELIMITER] and the
    /// selected fields are concatenated without a separator.
    pub fn extract<'a>(&self, record: &'a [u8]) -> Result<Cow<'a, [u8]>, FieldError> {
        if self.is_empty() {
            return Ok(Cow::Borrowed(record));
        }
        let line = record.strip_suffix(b"\n").unwrap_or(record);
        let tokens = line.split(|b| *b == FIELD_DELIMITER).collect_vec();

        let mut key = Vec::with_capacity(line.len());
        for index in self.0.iter().copied() {
            let token = tokens.get(index).ok_or(FieldError::IndexOutOfRange {
                index,
                field_count: tokens.len(),
            })?;
            key.extend_from_slice(token);
        }
        Ok(Cow::Owned(key))
    }
}

impl From<Vec<usize>> for FieldSpec {
    fn from(value: Vec<usize>) -> Self {
        Self::new(value)
    }
}

impl FromStr for FieldSpec {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }
        let mut indices = Vec::new();
        for piece in s.split(',') {
            let (start, end) = match piece.split_once('-') {
                None => {
                    let position = parse_position(piece)?;
                    (position, position)
                }
                Some((start, end)) => (parse_position(start)?, parse_position(end)?),
            };
            if start > end {
                return Err(FieldError::InvertedRange(piece.to_owned()));
            }
            // indices.len() never exceeds the limit, so this cannot underflow
            if end - start >= MAX_SELECTED_FIELDS - indices.len() {
                return Err(FieldError::TooManyFields(piece.to_owned()));
            }
            indices.extend(start..=end);
        }
        Ok(Self(indices))
    }
}

/// Formats back into the 1-based textual form
impl Display for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("<whole line>");
        }
        write!(f, "{}", self.0.iter().map(|i| i + 1).join(","))
    }
}

/// Turn a 1-based position into a 0-based index
fn parse_position(raw: &str) -> Result<usize, FieldError> {
    let position: usize = raw
        .trim()
        .parse()
        .map_err(|_| FieldError::InvalidPosition(raw.to_owned()))?;
    position.checked_sub(1).ok_or(FieldError::ZeroPosition)
}

/// Errors from parsing a field spec or extracting a key with it
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    /// A piece of the spec is not a positive integer
    #[error("Invalid field position `{0}`, expected a positive integer")]
    InvalidPosition(String),
    /// Field positions start at 1
    #[error("Field positions are 1-based, got 0")]
    ZeroPosition,
    /// A range `a-b` with `a > b`
    #[error("Field range `{0}` ends before it starts")]
    InvertedRange(String),
    /// Ranges would expand into more than [MAX_SELECTED_FIELDS] indices
    #[error("Field selection `{0}` exceeds the limit of {max} fields", max = MAX_SELECTED_FIELDS)]
    TooManyFields(String),
    /// The record has fewer fields than the spec selects
    #[error("Field index {index} selected, but the record only has {field_count} fields")]
    IndexOutOfRange {
        /// 0-based index which was requested
        index: usize,
        /// number of fields the record actually has
        field_count: usize,
    },
}
