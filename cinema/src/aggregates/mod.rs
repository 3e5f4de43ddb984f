//! Aggregates for the cinema seat map.
//!
//! Each aggregate is a reducer plus its state, actions and environment.

pub mod seat_map;

pub use seat_map::{
    CheckoutPhase, CheckoutRequest, SeatMapAction, SeatMapEnvironment, SeatMapReducer,
    SeatMapState,
};
