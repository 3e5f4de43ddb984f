//! # Cinema Seat Map
//!
//! Seat selection for a single cinema session, built on the seatmap reducer
//! architecture.
//!
//! ## Pieces
//!
//! - [`codec`]: seat ids (`R01`) from row letter and column
//! - [`layout`]: venue shape and row-band categories
//! - [`generator`]: builds a seat map and pre-marks occupied seats
//! - [`engine`]: the click rules (selection cap, occupied seats, aisle policy)
//! - [`aggregates::seat_map`]: reducer wiring the engine, checkout and payment
//!   into a [`seatmap_runtime::Store`]
//! - [`catalog`], [`payment`], [`notice`]: collaborators around the seat map
//!
//! ## Example
//!
//! ```ignore
//! let layout = VenueLayout::default();
//! let seats = generate_seat_map(&layout, &mut rng)?;
//! let state = SeatMapState::for_session(session, seats);
//! let store = Store::new(state, SeatMapReducer::new(), environment);
//!
//! store.send(SeatMapAction::ClickSeat { seat_id: "J07".into() }).await?;
//! store.send(SeatMapAction::ConfirmSelection).await?;
//! ```

pub mod aggregates;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod engine;
pub mod generator;
pub mod layout;
pub mod notice;
pub mod payment;
pub mod seat_map;
pub mod types;

pub use aggregates::{
    CheckoutPhase, CheckoutRequest, SeatMapAction, SeatMapEnvironment, SeatMapReducer,
    SeatMapState,
};
pub use catalog::{Catalog, Movie, MovieSession, SessionFormat};
pub use codec::{CodecError, SeatId};
pub use config::{Config, ConfigError};
pub use engine::{
    handle_seat_click, ClickOutcome, MainSectionPolicy, PolicyError, RejectReason, SelectionPolicy,
};
pub use generator::generate_seat_map;
pub use layout::{CategoryBand, CategoryBands, LayoutError, VenueLayout};
pub use notice::{LogNotifier, Notice, NoticeKind, Notifier, RecordingNotifier};
pub use payment::{
    CardDetails, GatewaySettings, PaymentError, PaymentGateway, PaymentMethod, PaymentReceipt,
    SimulatedGateway,
};
pub use seat_map::{SeatMap, SeatRow, Selection};
pub use types::{Category, Money, MovieId, Seat, SeatStatus, Section, SessionId};
