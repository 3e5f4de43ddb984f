//! Seat selection engine.
//!
//! [`handle_seat_click`] is the only mutator of a [`SeatMap`] after
//! generation. A click either flips one seat or is rejected with the map left
//! untouched; rejections are values, never errors.

use crate::codec::SeatId;
use crate::notice::Notice;
use crate::seat_map::SeatMap;
use crate::types::{SeatStatus, Section};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default cap on simultaneously selected seats
pub const DEFAULT_MAX_SELECTED: usize = 6;

/// Whether aisle / center seats can be clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainSectionPolicy {
    /// Main-section seats ignore clicks
    #[default]
    Inert,
    /// Main-section seats behave like any other seat
    Selectable,
}

/// Policy names that cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Neither `inert` nor `selectable`
    #[error("unknown main section policy {0:?}, expected inert or selectable")]
    UnknownMainSection(String),
}

impl FromStr for MainSectionPolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inert" => Ok(Self::Inert),
            "selectable" => Ok(Self::Selectable),
            other => Err(PolicyError::UnknownMainSection(other.to_string())),
        }
    }
}

/// Rules applied to every click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Most seats selectable at once
    pub max_selected: usize,
    /// Clickability of main-section seats
    pub main_section: MainSectionPolicy,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            max_selected: DEFAULT_MAX_SELECTED,
            main_section: MainSectionPolicy::Inert,
        }
    }
}

/// Why a click was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    /// No seat has the clicked id
    SeatNotFound,
    /// The seat is occupied
    SeatUnavailable,
    /// Main-section seats are inert under the active policy
    MainSectionNotSelectable,
    /// Selecting would exceed the cap
    SelectionLimitReached {
        /// The cap
        max: usize,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeatNotFound | Self::SeatUnavailable => f.write_str("This seat is not available."),
            Self::MainSectionNotSelectable => f.write_str("Aisle seats cannot be selected."),
            Self::SelectionLimitReached { max } => {
                write!(f, "You can select at most {max} seats at a time.")
            },
        }
    }
}

/// Result of a click
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// Seat became `Selected`
    Selected {
        /// Clicked seat
        seat_id: SeatId,
    },
    /// Seat returned to its row category
    Deselected {
        /// Clicked seat
        seat_id: SeatId,
        /// Status it returned to
        restored: SeatStatus,
    },
    /// Nothing changed
    Rejected(RejectReason),
}

impl ClickOutcome {
    /// Notice for the display layer; deselecting is silent
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::Selected { seat_id } => Some(Notice::success(format!("Seat {seat_id} selected."))),
            Self::Deselected { .. } => None,
            Self::Rejected(reason) => Some(Notice::error(reason.to_string())),
        }
    }

    /// Whether the map changed
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Applies one click to the map
///
/// Checks, in order: the seat exists, is not occupied, is not an inert
/// main-section seat, and selecting it stays within `max_selected`.
/// Deselecting is never capped.
pub fn handle_seat_click(map: &mut SeatMap, seat_id: &str, policy: &SelectionPolicy) -> ClickOutcome {
    let outcome = click(map, seat_id, policy);
    match &outcome {
        ClickOutcome::Rejected(reason) => {
            tracing::debug!(seat_id, ?reason, "Seat click rejected");
        },
        ClickOutcome::Selected { .. } => {
            tracing::debug!(seat_id, selected = map.selected_count(), "Seat selected");
        },
        ClickOutcome::Deselected { restored, .. } => {
            tracing::debug!(seat_id, %restored, "Seat deselected");
        },
    }
    outcome
}

fn click(map: &mut SeatMap, seat_id: &str, policy: &SelectionPolicy) -> ClickOutcome {
    let Some(seat) = map.get(seat_id) else {
        return ClickOutcome::Rejected(RejectReason::SeatNotFound);
    };
    if seat.status == SeatStatus::Occupied {
        return ClickOutcome::Rejected(RejectReason::SeatUnavailable);
    }
    if seat.section == Section::Main && policy.main_section == MainSectionPolicy::Inert {
        return ClickOutcome::Rejected(RejectReason::MainSectionNotSelectable);
    }

    let id = seat.id.clone();
    if seat.status == SeatStatus::Selected {
        let restored = map.original_category(&id).resting_status();
        map.set_status(seat_id, restored);
        return ClickOutcome::Deselected {
            seat_id: id,
            restored,
        };
    }

    if map.selected_count() >= policy.max_selected {
        return ClickOutcome::Rejected(RejectReason::SelectionLimitReached {
            max: policy.max_selected,
        });
    }

    map.set_status(seat_id, SeatStatus::Selected);
    ClickOutcome::Selected { seat_id: id }
}
