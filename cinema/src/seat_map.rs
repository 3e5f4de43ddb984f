//! The live seat collection of one rendered session.
//!
//! Seats keep generation order (back row first, left to right). The selection
//! and its price are always derived from the seats on read, never cached.

use crate::codec::SeatId;
use crate::layout::{CategoryBands, LayoutError};
use crate::types::{Category, Money, Seat, SeatStatus, Section};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Seats picked for checkout and what they cost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Ids of the selected seats, in map order
    pub seat_ids: Vec<SeatId>,
    /// `seat_ids.len() × price per seat`
    pub total_price: Money,
}

impl Selection {
    /// Whether nothing is selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seat_ids.is_empty()
    }
}

/// One row of seats, for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRow<'a> {
    /// Row letter
    pub letter: char,
    /// Seats of the row, left to right
    pub seats: &'a [Seat],
}

/// Ordered seats plus an id lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    seats: Vec<Seat>,
    index: HashMap<SeatId, usize>,
    bands: CategoryBands,
}

impl SeatMap {
    /// Builds a map from seats in display order
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DuplicateSeat`] if two seats share an id.
    pub fn new(seats: Vec<Seat>, bands: CategoryBands) -> Result<Self, LayoutError> {
        let mut index = HashMap::with_capacity(seats.len());
        for (position, seat) in seats.iter().enumerate() {
            if index.insert(seat.id.clone(), position).is_some() {
                return Err(LayoutError::DuplicateSeat(seat.id.clone()));
            }
        }
        Ok(Self {
            seats,
            index,
            bands,
        })
    }

    /// Looks a seat up by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Seat> {
        self.index.get(id).and_then(|position| self.seats.get(*position))
    }

    pub(crate) fn set_status(&mut self, id: &str, status: SeatStatus) -> bool {
        let Some(position) = self.index.get(id).copied() else {
            return false;
        };
        self.seats
            .get_mut(position)
            .map(|seat| seat.status = status)
            .is_some()
    }

    /// All seats in display order
    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    /// Number of seats, aisle included
    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether the map has no seats
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// The row-band table used to recover categories
    #[must_use]
    pub const fn bands(&self) -> &CategoryBands {
        &self.bands
    }

    /// Seats whose status is `Selected`
    pub fn selected(&self) -> impl Iterator<Item = &Seat> {
        self.seats
            .iter()
            .filter(|seat| seat.status == SeatStatus::Selected)
    }

    /// Ids of the selected seats, in map order
    #[must_use]
    pub fn selected_ids(&self) -> Vec<SeatId> {
        self.selected().map(|seat| seat.id.clone()).collect()
    }

    /// Number of selected seats
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// `selected_count × price_per_seat`
    #[must_use]
    pub fn total_price(&self, price_per_seat: Money) -> Money {
        let count = u32::try_from(self.selected_count()).unwrap_or(u32::MAX);
        price_per_seat.multiply(count)
    }

    /// Snapshot of the selection for checkout
    #[must_use]
    pub fn selection(&self, price_per_seat: Money) -> Selection {
        let seat_ids = self.selected_ids();
        let count = u32::try_from(seat_ids.len()).unwrap_or(u32::MAX);
        Selection {
            seat_ids,
            total_price: price_per_seat.multiply(count),
        }
    }

    /// Category a seat returns to when deselected
    ///
    /// Recomputed from the row letter through the band table. Aisle seats
    /// never carry a row category.
    #[must_use]
    pub fn original_category(&self, id: &SeatId) -> Category {
        match self.get(id.as_str()) {
            Some(seat) if seat.section == Section::Main => Category::Standard,
            _ => self.bands.category_for(id.row_letter()),
        }
    }

    /// Seats grouped per row, back row first
    #[must_use]
    pub fn rows(&self) -> Vec<SeatRow<'_>> {
        self.seats
            .chunk_by(|a, b| a.id.row_letter() == b.id.row_letter())
            .filter_map(|seats| {
                seats.first().map(|first| SeatRow {
                    letter: first.id.row_letter(),
                    seats,
                })
            })
            .collect()
    }

    /// Count of seats per status
    #[must_use]
    pub fn count_by_status(&self, status: SeatStatus) -> usize {
        self.seats.iter().filter(|seat| seat.status == status).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::codec::seat_id;
    use crate::layout::CategoryBand;

    fn two_row_map() -> SeatMap {
        let bands = CategoryBands::new(vec![CategoryBand {
            first: 'R',
            last: 'R',
            category: Category::Vip,
        }]);
        let seats = vec![
            Seat::new(seat_id('R', 1).unwrap(), SeatStatus::Vip, Section::Left),
            Seat::new(seat_id('R', 2).unwrap(), SeatStatus::Available, Section::Main),
            Seat::new(seat_id('Q', 1).unwrap(), SeatStatus::Selected, Section::Left),
            Seat::new(seat_id('Q', 2).unwrap(), SeatStatus::Occupied, Section::Main),
        ];
        SeatMap::new(seats, bands).unwrap()
    }

    #[test]
    fn lookup_by_str() {
        let map = two_row_map();
        assert_eq!(map.get("Q02").unwrap().status, SeatStatus::Occupied);
        assert!(map.get("Z99").is_none());
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let id = seat_id('R', 1).unwrap();
        let seats = vec![
            Seat::new(id.clone(), SeatStatus::Available, Section::Left),
            Seat::new(id.clone(), SeatStatus::Available, Section::Left),
        ];
        assert_eq!(
            SeatMap::new(seats, CategoryBands::default()),
            Err(LayoutError::DuplicateSeat(id))
        );
    }

    #[test]
    fn selection_is_derived_from_statuses() {
        let mut map = two_row_map();
        let price = Money::from_reais(32);
        assert_eq!(map.selected_count(), 1);
        assert_eq!(map.total_price(price), Money::from_reais(32));

        assert!(map.set_status("R01", SeatStatus::Selected));
        let selection = map.selection(price);
        assert_eq!(selection.seat_ids, vec![seat_id('R', 1).unwrap(), seat_id('Q', 1).unwrap()]);
        assert_eq!(selection.total_price, Money::from_reais(64));
        assert!(!map.set_status("X01", SeatStatus::Selected));
    }

    #[test]
    fn original_category_uses_bands_and_section() {
        let map = two_row_map();
        assert_eq!(map.original_category(&seat_id('R', 1).unwrap()), Category::Vip);
        assert_eq!(map.original_category(&seat_id('R', 2).unwrap()), Category::Standard);
        assert_eq!(map.original_category(&seat_id('Q', 1).unwrap()), Category::Standard);
    }

    #[test]
    fn rows_group_consecutive_letters() {
        let map = two_row_map();
        let rows = map.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].letter, 'R');
        assert_eq!(rows[1].letter, 'Q');
        assert_eq!(rows[1].seats.len(), 2);
    }
}
