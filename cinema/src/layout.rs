//! Venue layout and row-band categories.
//!
//! A layout describes the rows (VIP band at the back, regular band, premium
//! band at the front) and the column blocks (left, aisle, right). Column
//! numbers run continuously across the three blocks of a row.

use crate::codec::{self, CodecError, MAX_COLUMN};
use crate::types::{Category, Section};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for layouts that cannot be rendered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Layout has no rows or no columns
    #[error("layout has no {0}")]
    Empty(&'static str),

    /// Top row is not an uppercase ASCII letter
    #[error("top row '{0}' must be an uppercase letter A-Z")]
    InvalidTopRow(char),

    /// More rows than letters between the top row and `'A'`
    #[error("{rows} rows do not fit below top row '{top}'")]
    TooManyRows {
        /// Total rows requested
        rows: u32,
        /// Top row letter
        top: char,
    },

    /// More columns than a two-digit id can hold
    #[error("{0} columns exceed the two-digit limit of {MAX_COLUMN}")]
    TooManyColumns(u32),

    /// `occupied_min` above `occupied_max`
    #[error("occupied range {min}..={max} is empty")]
    InvalidOccupiedRange {
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },

    /// Two seats share an id
    #[error("seat id {0} appears more than once")]
    DuplicateSeat(crate::codec::SeatId),

    /// Seat id could not be built
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Shape of the auditorium
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueLayout {
    /// Letter of the back row
    pub top_row: char,
    /// Rows in the VIP band (back)
    pub vip_rows: u32,
    /// Rows in the regular band (middle)
    pub regular_rows: u32,
    /// Rows in the premium band (front)
    pub premium_rows: u32,
    /// Seats in the left block
    pub seats_before_aisle: u32,
    /// Seats in the aisle / center block
    pub aisle_width: u32,
    /// Seats in the right block
    pub seats_after_aisle: u32,
    /// Fewest seats pre-marked occupied
    pub occupied_min: u32,
    /// Most seats pre-marked occupied
    pub occupied_max: u32,
}

impl Default for VenueLayout {
    fn default() -> Self {
        Self {
            top_row: codec::DEFAULT_TOP_ROW,
            vip_rows: 4,
            regular_rows: 11,
            premium_rows: 2,
            seats_before_aisle: 14,
            aisle_width: 5,
            seats_after_aisle: 14,
            occupied_min: 10,
            occupied_max: 29,
        }
    }
}

impl VenueLayout {
    /// Total number of rows
    #[must_use]
    pub const fn total_rows(&self) -> u32 {
        self.vip_rows
            .saturating_add(self.regular_rows)
            .saturating_add(self.premium_rows)
    }

    /// Seats per row, aisle included
    #[must_use]
    pub const fn seats_per_row(&self) -> u32 {
        self.seats_before_aisle
            .saturating_add(self.aisle_width)
            .saturating_add(self.seats_after_aisle)
    }

    /// Checks that the layout can be rendered
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !self.top_row.is_ascii_uppercase() {
            return Err(LayoutError::InvalidTopRow(self.top_row));
        }

        let rows = self.total_rows();
        if rows == 0 {
            return Err(LayoutError::Empty("rows"));
        }
        let columns = self.seats_per_row();
        if columns == 0 {
            return Err(LayoutError::Empty("columns"));
        }

        if codec::row_letter(rows - 1, self.top_row).is_err() {
            return Err(LayoutError::TooManyRows {
                rows,
                top: self.top_row,
            });
        }

        if columns > MAX_COLUMN {
            return Err(LayoutError::TooManyColumns(columns));
        }

        if self.occupied_min > self.occupied_max {
            return Err(LayoutError::InvalidOccupiedRange {
                min: self.occupied_min,
                max: self.occupied_max,
            });
        }

        Ok(())
    }

    /// Ordered category bands, back row first
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::TooManyRows`] when the bands run past `'A'`.
    pub fn category_bands(&self) -> Result<CategoryBands, LayoutError> {
        let letter = |index: u32| {
            codec::row_letter(index, self.top_row).map_err(|_| LayoutError::TooManyRows {
                rows: self.total_rows(),
                top: self.top_row,
            })
        };

        let mut bands = Vec::with_capacity(3);
        let mut start = 0;
        for (rows, category) in [
            (self.vip_rows, Category::Vip),
            (self.regular_rows, Category::Standard),
            (self.premium_rows, Category::Premium),
        ] {
            if rows == 0 {
                continue;
            }
            let end = start + rows - 1;
            bands.push(CategoryBand {
                first: letter(start)?,
                last: letter(end)?,
                category,
            });
            start = end + 1;
        }
        Ok(CategoryBands { bands })
    }

    /// Column block a 1-based column number falls in
    #[must_use]
    pub const fn section_for_column(&self, column: u32) -> Section {
        if column <= self.seats_before_aisle {
            Section::Left
        } else if column > self.seats_before_aisle.saturating_add(self.aisle_width) {
            Section::Right
        } else {
            Section::Main
        }
    }
}

/// One `(first row, last row, category)` entry
///
/// Letters descend from `first` to `last`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBand {
    /// Back-most row letter of the band
    pub first: char,
    /// Front-most row letter of the band
    pub last: char,
    /// Category of every seat in the band
    pub category: Category,
}

impl CategoryBand {
    /// Whether `letter` lies inside this band
    #[must_use]
    pub const fn contains(&self, letter: char) -> bool {
        letter <= self.first && letter >= self.last
    }
}

/// Row-letter lookup table evaluated in order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryBands {
    bands: Vec<CategoryBand>,
}

impl CategoryBands {
    /// Builds a table from explicit bands
    #[must_use]
    pub const fn new(bands: Vec<CategoryBand>) -> Self {
        Self { bands }
    }

    /// Category for a row letter; the first matching band wins and unmatched
    /// letters are `Standard`
    #[must_use]
    pub fn category_for(&self, letter: char) -> Category {
        self.bands
            .iter()
            .find(|band| band.contains(letter))
            .map_or(Category::Standard, |band| band.category)
    }

    /// The bands in evaluation order
    #[must_use]
    pub fn bands(&self) -> &[CategoryBand] {
        &self.bands
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid() {
        let layout = VenueLayout::default();
        assert!(layout.validate().is_ok());
        assert_eq!(layout.total_rows(), 17);
        assert_eq!(layout.seats_per_row(), 33);
    }

    #[test]
    fn default_bands_cover_r_to_b() {
        let bands = VenueLayout::default().category_bands().unwrap();
        assert_eq!(
            bands.bands(),
            &[
                CategoryBand { first: 'R', last: 'O', category: Category::Vip },
                CategoryBand { first: 'N', last: 'D', category: Category::Standard },
                CategoryBand { first: 'C', last: 'B', category: Category::Premium },
            ]
        );
        assert_eq!(bands.category_for('P'), Category::Vip);
        assert_eq!(bands.category_for('O'), Category::Vip);
        assert_eq!(bands.category_for('N'), Category::Standard);
        assert_eq!(bands.category_for('C'), Category::Premium);
        assert_eq!(bands.category_for('B'), Category::Premium);
    }

    #[test]
    fn letters_outside_bands_fall_back_to_standard() {
        let bands = VenueLayout::default().category_bands().unwrap();
        assert_eq!(bands.category_for('A'), Category::Standard);
        assert_eq!(bands.category_for('Z'), Category::Standard);
    }

    #[test]
    fn first_matching_band_wins() {
        let bands = CategoryBands::new(vec![
            CategoryBand { first: 'R', last: 'P', category: Category::Premium },
            CategoryBand { first: 'R', last: 'A', category: Category::Vip },
        ]);
        assert_eq!(bands.category_for('Q'), Category::Premium);
        assert_eq!(bands.category_for('C'), Category::Vip);
    }

    #[test]
    fn sections_follow_column_blocks() {
        let layout = VenueLayout::default();
        assert_eq!(layout.section_for_column(1), Section::Left);
        assert_eq!(layout.section_for_column(14), Section::Left);
        assert_eq!(layout.section_for_column(15), Section::Main);
        assert_eq!(layout.section_for_column(19), Section::Main);
        assert_eq!(layout.section_for_column(20), Section::Right);
        assert_eq!(layout.section_for_column(33), Section::Right);
    }

    #[test]
    fn empty_bands_are_allowed() {
        let layout = VenueLayout { premium_rows: 0, aisle_width: 0, ..VenueLayout::default() };
        assert!(layout.validate().is_ok());
        let bands = layout.category_bands().unwrap();
        assert_eq!(bands.bands().len(), 2);
        assert_eq!(bands.category_for('C'), Category::Standard);
    }

    #[test]
    fn validate_rejects_empty_layout() {
        let no_rows = VenueLayout {
            vip_rows: 0,
            regular_rows: 0,
            premium_rows: 0,
            ..VenueLayout::default()
        };
        assert_eq!(no_rows.validate(), Err(LayoutError::Empty("rows")));

        let no_columns = VenueLayout {
            seats_before_aisle: 0,
            aisle_width: 0,
            seats_after_aisle: 0,
            ..VenueLayout::default()
        };
        assert_eq!(no_columns.validate(), Err(LayoutError::Empty("columns")));
    }

    #[test]
    fn validate_rejects_lowercase_top_row() {
        for top_row in ['r', '1', 'É'] {
            let layout = VenueLayout { top_row, ..VenueLayout::default() };
            assert_eq!(layout.validate(), Err(LayoutError::InvalidTopRow(top_row)));
        }
    }

    #[test]
    fn validate_rejects_rows_past_a() {
        let layout = VenueLayout { regular_rows: 20, ..VenueLayout::default() };
        assert!(matches!(layout.validate(), Err(LayoutError::TooManyRows { rows: 26, .. })));
    }

    #[test]
    fn validate_rejects_wide_rows() {
        let layout = VenueLayout { seats_after_aisle: 81, ..VenueLayout::default() };
        assert_eq!(layout.validate(), Err(LayoutError::TooManyColumns(100)));
    }

    #[test]
    fn validate_rejects_inverted_occupied_range() {
        let layout = VenueLayout { occupied_min: 5, occupied_max: 4, ..VenueLayout::default() };
        assert_eq!(
            layout.validate(),
            Err(LayoutError::InvalidOccupiedRange { min: 5, max: 4 })
        );
    }
}
