//! Seat grid generation.
//!
//! Builds every seat of a [`VenueLayout`] and pre-marks a random number of
//! regular side-block seats as occupied. The random source is injected so a
//! seeded generator reproduces the same map.

use crate::codec;
use crate::layout::{LayoutError, VenueLayout};
use crate::seat_map::SeatMap;
use crate::types::{Seat, SeatStatus, Section};
use rand::Rng;

/// Generates the seat map for one session render
///
/// Aisle seats are always `available` in the `main` section. Occupied seats
/// are drawn without replacement from seats that are `available` and not in
/// the `main` section; the draw count comes from
/// `occupied_min..=occupied_max`, clamped to the pool size.
///
/// # Errors
///
/// Returns a [`LayoutError`] when the layout fails validation.
pub fn generate_seat_map<R>(layout: &VenueLayout, rng: &mut R) -> Result<SeatMap, LayoutError>
where
    R: Rng + ?Sized,
{
    layout.validate()?;
    let bands = layout.category_bands()?;

    let columns = layout.seats_per_row();
    let capacity = usize::try_from(layout.total_rows().saturating_mul(columns)).unwrap_or(0);
    let mut seats = Vec::with_capacity(capacity);

    for row in 0..layout.total_rows() {
        let letter = codec::row_letter(row, layout.top_row)?;
        let resting = bands.category_for(letter).resting_status();

        for column in 1..=columns {
            let section = layout.section_for_column(column);
            let status = match section {
                Section::Main => SeatStatus::Available,
                Section::Left | Section::Right => resting,
            };
            seats.push(Seat::new(codec::seat_id(letter, column)?, status, section));
        }
    }

    let occupied = mark_occupied(&mut seats, layout, rng);
    tracing::debug!(
        seats = seats.len(),
        occupied,
        top_row = %layout.top_row,
        "Generated seat map"
    );

    SeatMap::new(seats, bands)
}

/// Marks seats occupied and returns how many were marked
fn mark_occupied<R>(seats: &mut [Seat], layout: &VenueLayout, rng: &mut R) -> usize
where
    R: Rng + ?Sized,
{
    let mut pool: Vec<usize> = seats
        .iter()
        .enumerate()
        .filter(|(_, seat)| seat.status == SeatStatus::Available && seat.section != Section::Main)
        .map(|(position, _)| position)
        .collect();

    let wanted = rng.gen_range(layout.occupied_min..=layout.occupied_max);
    let count = usize::try_from(wanted).unwrap_or(usize::MAX).min(pool.len());

    for _ in 0..count {
        let pick = rng.gen_range(0..pool.len());
        let position = pool.swap_remove(pick);
        if let Some(seat) = seats.get_mut(position) {
            seat.status = SeatStatus::Occupied;
        }
    }

    count
}
