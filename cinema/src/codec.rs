//! Seat identifier codec.
//!
//! A seat id is the row letter followed by the column number zero-padded to
//! two digits (`R01`, `N17`). Row letters count down from a top letter: row
//! index 0 is the top letter, index 1 the letter before it, and so on down to
//! `'A'`.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Letter of the first (back) row in the shipped venue
pub const DEFAULT_TOP_ROW: char = 'R';

/// Largest column number a two-digit id can hold
pub const MAX_COLUMN: u32 = 99;

/// Errors raised while encoding or decoding seat ids
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Column outside `1..=99`
    #[error("column {0} is outside 1..={MAX_COLUMN}")]
    ColumnOutOfRange(u32),

    /// Row index would fall below `'A'`
    #[error("row index {index} runs past 'A' when counting down from '{top}'")]
    RowOutOfRange {
        /// Requested zero-based row index
        index: u32,
        /// Top row letter
        top: char,
    },

    /// Letter is not within `'A'..=top`
    #[error("row letter {letter:?} is outside 'A'..='{top}'")]
    LetterOutOfRange {
        /// Offending letter
        letter: char,
        /// Top row letter
        top: char,
    },

    /// Input is not `<letter><two digits>`
    #[error("malformed seat id {0:?}")]
    Malformed(String),
}

/// Maps a zero-based row index to its letter, counting down from `top`
///
/// # Errors
///
/// Returns [`CodecError::RowOutOfRange`] when `top` is not an uppercase ASCII
/// letter or the index would step past `'A'`.
pub fn row_letter(row_index: u32, top: char) -> Result<char, CodecError> {
    let out_of_range = CodecError::RowOutOfRange {
        index: row_index,
        top,
    };
    if !top.is_ascii_uppercase() {
        return Err(out_of_range);
    }
    u32::from(top)
        .checked_sub(row_index)
        .filter(|code| *code >= u32::from('A'))
        .and_then(char::from_u32)
        .ok_or(out_of_range)
}

/// Inverse of [`row_letter`]
///
/// # Errors
///
/// Returns [`CodecError::LetterOutOfRange`] unless `'A' <= letter <= top`.
pub fn row_index(letter: char, top: char) -> Result<u32, CodecError> {
    if !letter.is_ascii_uppercase() || !top.is_ascii_uppercase() || letter > top {
        return Err(CodecError::LetterOutOfRange { letter, top });
    }
    Ok(u32::from(top) - u32::from(letter))
}

/// Builds the id for a seat at `column` in the row lettered `letter`
///
/// # Errors
///
/// Returns [`CodecError::ColumnOutOfRange`] for column 0 or above 99 and
/// [`CodecError::Malformed`] when `letter` is not an uppercase ASCII letter.
pub fn seat_id(letter: char, column: u32) -> Result<SeatId, CodecError> {
    if !letter.is_ascii_uppercase() {
        return Err(CodecError::Malformed(format!("{letter}{column:02}")));
    }
    if column == 0 || column > MAX_COLUMN {
        return Err(CodecError::ColumnOutOfRange(column));
    }
    Ok(SeatId(format!("{letter}{column:02}")))
}

/// Identifier of a seat within one venue map
///
/// Always three ASCII characters: an uppercase row letter and a two-digit
/// column in `01..=99`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatId(String);

impl SeatId {
    /// Validates an id string
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Malformed`] unless `raw` is an uppercase letter
    /// followed by exactly two digits, and [`CodecError::ColumnOutOfRange`]
    /// for `00`.
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        let malformed = || CodecError::Malformed(raw.to_string());
        let mut chars = raw.chars();
        let letter = chars.next().ok_or_else(malformed)?;
        let digits = chars.as_str();
        if digits.len() != 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let column: u32 = digits.parse().map_err(|_| malformed())?;
        seat_id(letter, column).map_err(|error| match error {
            CodecError::ColumnOutOfRange(_) => error,
            _ => malformed(),
        })
    }

    /// Row letter of this seat
    #[must_use]
    pub fn row_letter(&self) -> char {
        // Construction guarantees a leading ASCII letter.
        self.0.chars().next().unwrap_or('A')
    }

    /// Column number of this seat
    #[must_use]
    pub fn column(&self) -> u32 {
        self.0.get(1..).and_then(|d| d.parse().ok()).unwrap_or(0)
    }

    /// Borrow the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::borrow::Borrow<str> for SeatId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SeatId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for SeatId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SeatId {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SeatId> for String {
    fn from(id: SeatId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn row_letters_count_down_from_top() {
        assert_eq!(row_letter(0, 'R').unwrap(), 'R');
        assert_eq!(row_letter(1, 'R').unwrap(), 'Q');
        assert_eq!(row_letter(16, 'R').unwrap(), 'B');
        assert_eq!(row_letter(17, 'R').unwrap(), 'A');
    }

    #[test]
    fn row_letter_rejects_past_a() {
        assert_eq!(
            row_letter(18, 'R'),
            Err(CodecError::RowOutOfRange { index: 18, top: 'R' })
        );
        assert!(row_letter(0, 'r').is_err());
    }

    #[test]
    fn row_index_inverts_row_letter() {
        for index in 0..18 {
            let letter = row_letter(index, DEFAULT_TOP_ROW).unwrap();
            assert_eq!(row_index(letter, DEFAULT_TOP_ROW).unwrap(), index);
        }
        assert!(matches!(
            row_index('S', 'R'),
            Err(CodecError::LetterOutOfRange { letter: 'S', .. })
        ));
    }

    #[test]
    fn seat_ids_are_zero_padded() {
        assert_eq!(seat_id('R', 1).unwrap().as_str(), "R01");
        assert_eq!(seat_id('D', 33).unwrap().as_str(), "D33");
        assert_eq!(seat_id('A', 99).unwrap().as_str(), "A99");
    }

    #[test]
    fn seat_id_rejects_columns_outside_two_digits() {
        assert_eq!(seat_id('R', 0), Err(CodecError::ColumnOutOfRange(0)));
        assert_eq!(seat_id('R', 100), Err(CodecError::ColumnOutOfRange(100)));
    }

    #[test]
    fn parse_splits_letter_and_column() {
        let id = SeatId::parse("N17").unwrap();
        assert_eq!(id.row_letter(), 'N');
        assert_eq!(id.column(), 17);
    }

    #[test]
    fn parse_rejects_malformed_ids() {
        for raw in ["", "R", "R1", "R001", "r01", "1R0", "R0a", "R-1"] {
            assert!(
                matches!(SeatId::parse(raw), Err(CodecError::Malformed(_))),
                "{raw:?} should be malformed"
            );
        }
        assert_eq!(SeatId::parse("R00"), Err(CodecError::ColumnOutOfRange(0)));
    }

    #[test]
    fn seat_id_serializes_as_plain_string() {
        let id = seat_id('R', 5).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"R05\"");
        let back: SeatId = serde_json::from_str("\"R05\"").unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<SeatId>("\"R5\"").is_err());
    }
}
