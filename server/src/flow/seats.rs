//! Seat grid generation
//!
//! A grid is produced in two passes: every cell is drawn independently from
//! the weighted status table, then [`apply_corrections`] restores the grid
//! invariants (one haunted seat, at least one available seat).

use rand::Rng;
use rand::seq::IndexedRandom;

use super::catalog::{HAUNTED_SEAT, SEAT_ROWS, SEAT_STATUS_WEIGHTS, SEATS_PER_ROW};
use super::types::FlowError;
use crate::protocol::{SeatMap, SeatStatus};

/// Seat ids in grid order: A-1, A-2, ..., F-14
pub fn seat_ids() -> impl Iterator<Item = String> {
    SEAT_ROWS
        .iter()
        .flat_map(|row| (1..=SEATS_PER_ROW).map(move |num| format!("{}-{}", row, num)))
}

/// Draw a status for every seat, with no invariants applied
pub fn draw_grid<R: Rng + ?Sized>(rng: &mut R) -> Result<SeatMap, FlowError> {
    let mut seats = SeatMap::with_capacity(SEAT_ROWS.len() * SEATS_PER_ROW as usize);
    for seat_id in seat_ids() {
        let status = SEAT_STATUS_WEIGHTS
            .choose_weighted(rng, |(_, weight)| *weight)
            .map(|(status, _)| *status)
            .map_err(|e| FlowError::SeatDraw(e.to_string()))?;
        seats.insert(seat_id, status);
    }
    Ok(seats)
}

/// Force the haunted seat and guarantee at least one available seat
pub fn apply_corrections<R: Rng + ?Sized>(seats: &mut SeatMap, rng: &mut R) {
    for status in seats.values_mut() {
        if *status == SeatStatus::Haunted {
            *status = SeatStatus::Taken;
        }
    }
    seats.insert(HAUNTED_SEAT.to_string(), SeatStatus::Haunted);

    if seats.values().any(|s| *s == SeatStatus::Available) {
        return;
    }

    // Never promote the haunted seat, it must stay unique
    let candidates: Vec<&String> = seats
        .iter()
        .filter(|(_, status)| **status != SeatStatus::Haunted)
        .map(|(id, _)| id)
        .collect();
    if let Some(seat_id) = candidates.choose(rng).map(|id| (*id).clone())
        && let Some(status) = seats.get_mut(&seat_id)
    {
        tracing::debug!("No seat drawn available, freeing {}", seat_id);
        *status = SeatStatus::Available;
    }
}

/// Generate a fresh grid satisfying the grid invariants
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<SeatMap, FlowError> {
    let mut seats = draw_grid(rng)?;
    apply_corrections(&mut seats, rng);
    Ok(seats)
}
