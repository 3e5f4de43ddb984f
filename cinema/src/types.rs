//! Domain types for the cinema seat map.
//!
//! Value objects shared by the grid generator, the selection engine, the
//! catalog and the checkout flow.

use crate::codec::SeatId;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifier of a movie in the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MovieId(u32);

impl MovieId {
    /// Creates a new `MovieId`
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a screening session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(u32);

impl SessionId {
    /// Creates a new `SessionId`
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Seats
// ============================================================================

/// Current status of a seat
///
/// `Occupied` is terminal for the lifetime of a rendered map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    /// Regular seat, free to select
    Available,
    /// Sold before the map was rendered
    Occupied,
    /// Part of the current selection
    Selected,
    /// VIP row seat, free to select
    Vip,
    /// Premium row seat, free to select
    Premium,
}

impl SeatStatus {
    /// Whether a click may turn this seat into `Selected`
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        matches!(self, Self::Available | Self::Vip | Self::Premium)
    }
}

impl fmt::Display for SeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Selected => "selected",
            Self::Vip => "vip",
            Self::Premium => "premium",
        };
        f.write_str(name)
    }
}

/// Category a row band assigns to its seats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Regular seats (`available` status)
    Standard,
    /// VIP seats
    Vip,
    /// Premium seats
    Premium,
}

impl Category {
    /// Status a seat of this category has when nobody holds it
    #[must_use]
    pub const fn resting_status(self) -> SeatStatus {
        match self {
            Self::Standard => SeatStatus::Available,
            Self::Vip => SeatStatus::Vip,
            Self::Premium => SeatStatus::Premium,
        }
    }
}

/// Column block a seat belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Block left of the aisle
    Left,
    /// Aisle / center block
    Main,
    /// Block right of the aisle
    Right,
}

/// A single seat on the map
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    /// Immutable identifier (`R01`)
    pub id: SeatId,
    /// Current status
    pub status: SeatStatus,
    /// Column block
    pub section: Section,
}

impl Seat {
    /// Creates a new `Seat`
    #[must_use]
    pub const fn new(id: SeatId, status: SeatStatus, section: Section) -> Self {
        Self {
            id,
            status,
            section,
        }
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Amount of Brazilian reais held in cents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Zero reais
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole reais, saturating on overflow
    #[must_use]
    pub const fn from_reais(reais: u64) -> Self {
        Self(reais.saturating_mul(100))
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity, saturating at `u64::MAX` cents
    #[must_use]
    pub const fn multiply(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Splits the amount into `parts` equal shares, rounded to the nearest cent
    ///
    /// Returns `None` when `parts` is zero.
    #[must_use]
    pub const fn checked_split(self, parts: u32) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        let parts = parts as u64;
        Some(Self(self.0.saturating_add(parts / 2) / parts))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}.{:02}", self.0 / 100, self.0 % 100)
    }
}
