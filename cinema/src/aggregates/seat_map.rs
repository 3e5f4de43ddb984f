//! Seat map aggregate.
//!
//! Wires the selection engine, the checkout hand-off and the payment gateway
//! into a reducer the Store can run.
//!
//! Commands are applied synchronously under the Store's write lock, so seat
//! clicks stay responsive while a payment future is pending. Events produced
//! here are emitted back through the Store for observers; when they re-enter
//! the reducer they are no-ops because their effect on state has already been
//! applied.

use crate::catalog::MovieSession;
use crate::codec::SeatId;
use crate::engine::{self, ClickOutcome, RejectReason, SelectionPolicy};
use crate::notice::{Notice, Notifier};
use crate::payment::{PaymentGateway, PaymentMethod, PaymentReceipt};
use crate::seat_map::SeatMap;
use crate::types::{Money, SeatStatus, SessionId};
use chrono::{DateTime, Utc};
use seatmap_core::{effect::Effect, environment::Clock, reducer::Reducer, smallvec, SmallVec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Notice text when confirming with nothing selected
pub const EMPTY_SELECTION_TEXT: &str = "Please select at least one seat.";

/// Notice text after an approved payment
pub const PAYMENT_APPROVED_TEXT: &str = "Payment completed successfully!";

/// Error for commands that would change a paid order
pub const ORDER_PAID_TEXT: &str = "Order already paid";

// ============================================================================
// State
// ============================================================================

/// What the checkout collaborator receives on confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Session being booked
    pub session_id: SessionId,
    /// Selected seats, never empty
    pub selected_seat_ids: Vec<SeatId>,
    /// `selected_seat_ids.len() × price per seat`
    pub total_price: Money,
    /// When the selection was confirmed
    pub requested_at: DateTime<Utc>,
}

/// Where the checkout flow stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    /// Picking seats
    #[default]
    Selecting,
    /// Selection confirmed, waiting for a payment method
    AwaitingPayment(CheckoutRequest),
    /// Gateway call in flight
    Processing(CheckoutRequest),
    /// Payment approved
    Paid {
        /// What was bought
        request: CheckoutRequest,
        /// Gateway receipt
        receipt: PaymentReceipt,
    },
}

impl CheckoutPhase {
    /// The confirmed request, if any
    #[must_use]
    pub const fn request(&self) -> Option<&CheckoutRequest> {
        match self {
            Self::Selecting => None,
            Self::AwaitingPayment(request) | Self::Processing(request) | Self::Paid { request, .. } => {
                Some(request)
            },
        }
    }
}

/// State of one rendered session
#[derive(Debug, Clone)]
pub struct SeatMapState {
    /// Session being booked
    pub session_id: SessionId,
    /// Price of every seat
    pub price_per_seat: Money,
    /// The live seats
    pub seats: SeatMap,
    /// Click rules
    pub policy: SelectionPolicy,
    /// Checkout progress
    pub checkout: CheckoutPhase,
    /// Last notice shown to the user
    pub last_notice: Option<Notice>,
    /// Last command error
    pub last_error: Option<String>,
}

impl SeatMapState {
    /// State for a freshly generated map
    #[must_use]
    pub fn new(session_id: SessionId, price_per_seat: Money, seats: SeatMap) -> Self {
        Self {
            session_id,
            price_per_seat,
            seats,
            policy: SelectionPolicy::default(),
            checkout: CheckoutPhase::Selecting,
            last_notice: None,
            last_error: None,
        }
    }

    /// State for a catalog session
    #[must_use]
    pub fn for_session(session: &MovieSession, seats: SeatMap) -> Self {
        Self::new(session.id, session.price, seats)
    }

    /// Replaces the click rules
    #[must_use]
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current total of the selection
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.seats.total_price(self.price_per_seat)
    }
}

// ============================================================================
// Actions (Commands + Events)
// ============================================================================

/// Actions for the seat map aggregate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SeatMapAction {
    // Commands
    /// User clicked a seat
    ClickSeat {
        /// Raw id from the display layer
        seat_id: String,
    },

    /// User confirmed the selection
    ConfirmSelection,

    /// User submitted a payment method
    SubmitPayment {
        /// Chosen method
        method: PaymentMethod,
    },

    // Events
    /// A seat became selected
    SeatSelected {
        /// The seat
        seat_id: SeatId,
    },

    /// A seat returned to its row category
    SeatDeselected {
        /// The seat
        seat_id: SeatId,
        /// Status it returned to
        restored: SeatStatus,
    },

    /// A click changed nothing
    ClickRejected {
        /// Raw id that was clicked
        seat_id: String,
        /// Why
        reason: RejectReason,
    },

    /// Confirmation with an empty selection
    ConfirmRejected,

    /// Selection handed to checkout
    CheckoutRequested {
        /// The hand-off payload
        request: CheckoutRequest,
    },

    /// Gateway call started
    PaymentSubmitted {
        /// Amount being charged
        amount: Money,
        /// `credit`, `debit` or `pix`
        method: String,
    },

    /// Gateway approved the payment
    PaymentSucceeded {
        /// Gateway receipt
        receipt: PaymentReceipt,
    },

    /// Gateway refused the payment
    PaymentFailed {
        /// Reason shown to the user
        error: String,
    },

    /// Command not valid in the current phase
    ValidationFailed {
        /// Error message
        error: String,
    },
}

impl SeatMapAction {
    /// Whether this action is a command (user input)
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::ClickSeat { .. } | Self::ConfirmSelection | Self::SubmitPayment { .. }
        )
    }

    /// Whether this action is an event (a recorded fact)
    #[must_use]
    pub const fn is_event(&self) -> bool {
        !self.is_command()
    }

    /// Whether this event ends a payment attempt
    #[must_use]
    pub const fn is_payment_outcome(&self) -> bool {
        matches!(self, Self::PaymentSucceeded { .. } | Self::PaymentFailed { .. })
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Environment dependencies for the seat map aggregate
#[derive(Clone)]
pub struct SeatMapEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Display collaborator for notices
    pub notifier: Arc<dyn Notifier>,
    /// Payment collaborator
    pub gateway: Arc<dyn PaymentGateway>,
}

impl SeatMapEnvironment {
    /// Creates a new `SeatMapEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            clock,
            notifier,
            gateway,
        }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the seat map aggregate
#[derive(Clone, Debug, Default)]
pub struct SeatMapReducer;

impl SeatMapReducer {
    /// Creates a new `SeatMapReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Effect handing a notice to the notifier
    fn notify(notice: Notice, env: &SeatMapEnvironment) -> Effect<SeatMapAction> {
        let notifier = Arc::clone(&env.notifier);
        Effect::Future(Box::pin(async move {
            notifier.notify(&notice);
            None
        }))
    }

    /// Records the notice and returns effects delivering it and emitting `event`
    fn announce(
        state: &mut SeatMapState,
        notice: Option<Notice>,
        event: SeatMapAction,
        env: &SeatMapEnvironment,
    ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
        let mut effects: SmallVec<[Effect<SeatMapAction>; 4]> = SmallVec::new();
        if let Some(notice) = notice {
            state.last_notice = Some(notice.clone());
            effects.push(Self::notify(notice, env));
        }
        effects.push(Effect::emit(event));
        effects
    }

    fn validation_failed(
        state: &mut SeatMapState,
        error: String,
    ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
        tracing::warn!(%error, "Seat map command rejected");
        state.last_error = Some(error.clone());
        smallvec![Effect::emit(SeatMapAction::ValidationFailed { error })]
    }

    fn click_seat(
        state: &mut SeatMapState,
        seat_id: String,
        env: &SeatMapEnvironment,
    ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
        // The paid seats are final; the map only changes until payment settles.
        if matches!(state.checkout, CheckoutPhase::Paid { .. }) {
            return Self::validation_failed(state, ORDER_PAID_TEXT.to_string());
        }

        let outcome = engine::handle_seat_click(&mut state.seats, &seat_id, &state.policy);
        let notice = outcome.notice();
        let event = match outcome {
            ClickOutcome::Selected { seat_id } => SeatMapAction::SeatSelected { seat_id },
            ClickOutcome::Deselected { seat_id, restored } => {
                SeatMapAction::SeatDeselected { seat_id, restored }
            },
            ClickOutcome::Rejected(reason) => SeatMapAction::ClickRejected { seat_id, reason },
        };
        state.last_error = None;
        Self::announce(state, notice, event, env)
    }

    fn confirm_selection(
        state: &mut SeatMapState,
        env: &SeatMapEnvironment,
    ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
        match state.checkout {
            CheckoutPhase::Processing(_) => {
                return Self::validation_failed(state, "Payment already in progress".to_string());
            },
            CheckoutPhase::Paid { .. } => {
                return Self::validation_failed(state, ORDER_PAID_TEXT.to_string());
            },
            CheckoutPhase::Selecting | CheckoutPhase::AwaitingPayment(_) => {},
        }

        let selection = state.seats.selection(state.price_per_seat);
        if selection.is_empty() {
            tracing::debug!(session_id = %state.session_id, "Confirmation with empty selection");
            return Self::announce(
                state,
                Some(Notice::error(EMPTY_SELECTION_TEXT)),
                SeatMapAction::ConfirmRejected,
                env,
            );
        }

        let request = CheckoutRequest {
            session_id: state.session_id,
            selected_seat_ids: selection.seat_ids,
            total_price: selection.total_price,
            requested_at: env.clock.now(),
        };
        tracing::info!(
            session_id = %request.session_id,
            seats = request.selected_seat_ids.len(),
            total = %request.total_price,
            "Checkout requested"
        );
        state.checkout = CheckoutPhase::AwaitingPayment(request.clone());
        state.last_error = None;
        smallvec![Effect::emit(SeatMapAction::CheckoutRequested { request })]
    }

    fn submit_payment(
        state: &mut SeatMapState,
        method: PaymentMethod,
        env: &SeatMapEnvironment,
    ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
        let CheckoutPhase::AwaitingPayment(request) = &state.checkout else {
            return Self::validation_failed(state, "No confirmed selection awaiting payment".to_string());
        };
        let request = request.clone();
        let amount = request.total_price;
        let label = method.label().to_string();

        tracing::info!(method = %label, amount = amount.cents(), "Payment submitted");
        state.checkout = CheckoutPhase::Processing(request);
        state.last_error = None;

        let payment = env.gateway.process_payment(amount, method);
        smallvec![
            Effect::emit(SeatMapAction::PaymentSubmitted { amount, method: label }),
            Effect::Future(Box::pin(async move {
                Some(match payment.await {
                    Ok(receipt) => SeatMapAction::PaymentSucceeded { receipt },
                    Err(error) => SeatMapAction::PaymentFailed {
                        error: error.to_string(),
                    },
                })
            })),
        ]
    }

    fn payment_succeeded(
        state: &mut SeatMapState,
        receipt: PaymentReceipt,
        env: &SeatMapEnvironment,
    ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
        let CheckoutPhase::Processing(request) = &state.checkout else {
            tracing::warn!(transaction_id = %receipt.transaction_id, "Payment result without pending payment");
            return SmallVec::new();
        };
        let request = request.clone();
        tracing::info!(
            transaction_id = %receipt.transaction_id,
            amount = receipt.amount.cents(),
            "Payment approved"
        );
        state.checkout = CheckoutPhase::Paid { request, receipt };
        let notice = Notice::success(PAYMENT_APPROVED_TEXT);
        state.last_notice = Some(notice.clone());
        smallvec![Self::notify(notice, env)]
    }

    fn payment_failed(
        state: &mut SeatMapState,
        error: String,
        env: &SeatMapEnvironment,
    ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
        let CheckoutPhase::Processing(request) = &state.checkout else {
            tracing::warn!(%error, "Payment result without pending payment");
            return SmallVec::new();
        };
        let request = request.clone();
        tracing::info!(%error, "Payment refused");
        state.checkout = CheckoutPhase::AwaitingPayment(request);
        state.last_error = Some(error.clone());
        let notice = Notice::error(error);
        state.last_notice = Some(notice.clone());
        smallvec![Self::notify(notice, env)]
    }
}

impl Reducer for SeatMapReducer {
    type State = SeatMapState;
    type Action = SeatMapAction;
    type Environment = SeatMapEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            SeatMapAction::ClickSeat { seat_id } => Self::click_seat(state, seat_id, env),
            SeatMapAction::ConfirmSelection => Self::confirm_selection(state, env),
            SeatMapAction::SubmitPayment { method } => Self::submit_payment(state, method, env),

            // ========== Gateway results ==========
            SeatMapAction::PaymentSucceeded { receipt } => {
                Self::payment_succeeded(state, receipt, env)
            },
            SeatMapAction::PaymentFailed { error } => Self::payment_failed(state, error, env),

            // ========== Events (already applied) ==========
            SeatMapAction::SeatSelected { .. }
            | SeatMapAction::SeatDeselected { .. }
            | SeatMapAction::ClickRejected { .. }
            | SeatMapAction::ConfirmRejected
            | SeatMapAction::CheckoutRequested { .. }
            | SeatMapAction::PaymentSubmitted { .. }
            | SeatMapAction::ValidationFailed { .. } => SmallVec::new(),
        }
    }
}
