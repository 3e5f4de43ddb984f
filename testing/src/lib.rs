//! # Seatmap Testing
//!
//! Testing utilities and helpers for seat-map reducers.
//!
//! This crate provides:
//! - Deterministic clocks and random sources
//! - A Given-When-Then harness for reducers ([`ReducerTest`])
//! - Assertion helpers for returned effects
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_testing::{seeded_rng, ReducerTest};
//!
//! let seats = generate_seat_map(&VenueLayout::default(), &mut seeded_rng(7))?;
//!
//! ReducerTest::new(SeatMapReducer::new())
//!     .with_env(test_environment())
//!     .given_state(SeatMapState::new(session, seats))
//!     .when_action(SeatMapAction::ClickSeat { seat_id: "R01".into() })
//!     .then_state(|state| assert_eq!(state.seats.selected_count(), 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use seatmap_core::environment::Clock;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seatmap_testing::mocks::FixedClock;
    /// use seatmap_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2024-03-24 12:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        let time = DateTime::parse_from_rfc3339("2024-03-24T12:00:00Z")
            .map_or_else(|_| DateTime::<Utc>::default(), |t| t.with_timezone(&Utc));
        FixedClock::new(time)
    }

    /// Seeded random source so grid generation and simulated payments repeat exactly
    #[must_use]
    pub fn seeded_rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }
}

// Re-export commonly used items
pub use mocks::{seeded_rng, test_clock, FixedClock};
pub use reducer_test::{assertions, ReducerTest};
