//! Simulated payment gateway.
//!
//! Cards (credit with installments, debit) and PIX instant transfers. Nothing
//! is charged: the gateway waits an artificial latency, validates card
//! fields, and approves PIX transfers with a configurable probability.

use crate::types::Money;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

/// Most installments a credit payment can be split into
pub const MAX_INSTALLMENTS: u8 = 12;

/// Payment gateway result
pub type GatewayResult<T> = Result<T, PaymentError>;

/// Why a payment did not go through
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PaymentError {
    /// A card field is blank
    #[error("Incomplete card details")]
    IncompleteCard,

    /// Card number fails the Luhn check
    #[error("Invalid card number")]
    InvalidCardNumber,

    /// Installments outside `1..=12`
    #[error("Installments must be between 1 and {MAX_INSTALLMENTS}, got {0}")]
    InvalidInstallments(u8),

    /// PIX transfer was not confirmed
    #[error("PIX payment was not confirmed")]
    PixNotConfirmed,
}

/// Card fields as typed by the user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    /// Card number, spaces allowed
    pub number: String,
    /// Name printed on the card
    pub holder: String,
    /// Expiry, `MM/YY`
    pub expiry: String,
    /// Security code
    pub cvv: String,
}

impl CardDetails {
    /// Last four digits of the number
    #[must_use]
    pub fn last_four(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }

    /// Checks completeness, then the Luhn checksum
    ///
    /// # Errors
    ///
    /// [`PaymentError::IncompleteCard`] when a field is blank,
    /// [`PaymentError::InvalidCardNumber`] when the number is not all digits
    /// or fails the checksum.
    pub fn validate(&self) -> GatewayResult<()> {
        let number: String = self.number.chars().filter(|c| !c.is_whitespace()).collect();
        let blank = [&number, &self.holder, &self.expiry, &self.cvv]
            .iter()
            .any(|field| field.trim().is_empty());
        if blank {
            return Err(PaymentError::IncompleteCard);
        }
        if luhn_valid(&number) {
            Ok(())
        } else {
            Err(PaymentError::InvalidCardNumber)
        }
    }
}

// Keeps card numbers and codes out of logs.
impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("number", &format_args!("**** {}", self.last_four()))
            .field("holder", &self.holder)
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

/// How the customer pays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Credit card, optionally in installments
    Credit {
        /// Card fields
        card: CardDetails,
        /// Number of installments (1 = single payment)
        installments: u8,
    },
    /// Debit card
    Debit {
        /// Card fields
        card: CardDetails,
    },
    /// PIX instant transfer
    Pix,
}

impl PaymentMethod {
    /// Short label for logs and receipts
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Credit { .. } => "credit",
            Self::Debit { .. } => "debit",
            Self::Pix => "pix",
        }
    }
}

/// Approved payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Gateway transaction id
    pub transaction_id: String,
    /// Amount charged
    pub amount: Money,
    /// `credit`, `debit` or `pix`
    pub method: String,
    /// Installment count and amount, credit only
    pub installments: Option<(u8, Money)>,
}

/// Inserts a space after every fourth digit, keeping at most 16 digits
#[must_use]
pub fn format_card_number(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(char::is_ascii_digit).take(16).collect();
    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats up to four digits as `MM/YY`
#[must_use]
pub fn format_expiry(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(4).collect();
    if digits.len() >= 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Luhn checksum over a string of digits
#[must_use]
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }
    let mut sum = 0;
    for (position, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if position % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// Static PIX copy-and-paste payload with the amount embedded
#[must_use]
pub fn pix_payload(amount: Money) -> String {
    format!(
        "00020126580014BR.GOV.BCB.PIX0136123e4567-e89b-12d3-a456-426614174000{}.{:02}\
         5204000053039865802BR5913Cinema Tickets6008Sao Paulo62070503***63041234",
        amount.cents() / 100,
        amount.cents() % 100
    )
}

/// Amount of each installment, rounded to the nearest cent
///
/// Returns `None` for counts outside `1..=12`.
#[must_use]
pub fn installment_amount(total: Money, installments: u8) -> Option<Money> {
    if installments == 0 || installments > MAX_INSTALLMENTS {
        return None;
    }
    total.checked_split(u32::from(installments))
}

/// Payment gateway trait
///
/// Object safe so environments can hold an `Arc<dyn PaymentGateway>`.
pub trait PaymentGateway: Send + Sync {
    /// Charge `amount` with `method`
    ///
    /// # Errors
    ///
    /// Returns a [`PaymentError`] when the payment is refused.
    fn process_payment(
        &self,
        amount: Money,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>>;
}

/// Timing and approval settings of [`SimulatedGateway`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GatewaySettings {
    /// Artificial latency for card payments
    pub card_latency: Duration,
    /// Artificial latency for PIX confirmation
    pub pix_latency: Duration,
    /// Probability a PIX transfer is confirmed
    pub pix_approval_rate: f64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            card_latency: Duration::from_millis(2000),
            pix_latency: Duration::from_millis(1000),
            pix_approval_rate: 0.8,
        }
    }
}

impl GatewaySettings {
    /// No latency, every PIX transfer confirmed
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            card_latency: Duration::ZERO,
            pix_latency: Duration::ZERO,
            pix_approval_rate: 1.0,
        }
    }
}

/// Gateway that validates and sleeps instead of charging
#[derive(Debug, Clone)]
pub struct SimulatedGateway {
    settings: GatewaySettings,
    rng: Arc<Mutex<StdRng>>,
}

impl SimulatedGateway {
    /// Gateway seeded from system entropy
    #[must_use]
    pub fn new(settings: GatewaySettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Gateway with a fixed random source
    #[must_use]
    pub fn with_rng(settings: GatewaySettings, rng: StdRng) -> Self {
        Self {
            settings,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Creates an Arc-wrapped instance for sharing
    #[must_use]
    pub fn shared(settings: GatewaySettings) -> Arc<dyn PaymentGateway> {
        Arc::new(Self::new(settings))
    }

    fn pix_confirmed(&self) -> bool {
        let rate = self.settings.pix_approval_rate;
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self.rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_bool(rate)
    }
}

impl PaymentGateway for SimulatedGateway {
    fn process_payment(
        &self,
        amount: Money,
        method: PaymentMethod,
    ) -> Pin<Box<dyn Future<Output = GatewayResult<PaymentReceipt>> + Send>> {
        let settings = self.settings;
        // Drawn up front so the future does not hold the lock.
        let pix_confirmed = matches!(method, PaymentMethod::Pix).then(|| self.pix_confirmed());

        Box::pin(settle(settings, amount, method, pix_confirmed))
    }
}

async fn settle(
    settings: GatewaySettings,
    amount: Money,
    method: PaymentMethod,
    pix_confirmed: Option<bool>,
) -> GatewayResult<PaymentReceipt> {
    let label = method.label();
    let installments = match &method {
        PaymentMethod::Credit { card, installments } => {
            tokio::time::sleep(settings.card_latency).await;
            card.validate()?;
            let each = installment_amount(amount, *installments)
                .ok_or(PaymentError::InvalidInstallments(*installments))?;
            Some((*installments, each))
        },
        PaymentMethod::Debit { card } => {
            tokio::time::sleep(settings.card_latency).await;
            card.validate()?;
            None
        },
        PaymentMethod::Pix => {
            tracing::debug!(payload = %pix_payload(amount), "Awaiting PIX transfer");
            tokio::time::sleep(settings.pix_latency).await;
            if pix_confirmed != Some(true) {
                tracing::info!(amount = amount.cents(), "PIX payment not confirmed");
                return Err(PaymentError::PixNotConfirmed);
            }
            None
        },
    };

    let transaction_id = format!("txn_{}", uuid::Uuid::new_v4().simple());
    tracing::info!(
        method = label,
        amount = amount.cents(),
        transaction_id = %transaction_id,
        "Simulated payment processed successfully"
    );

    Ok(PaymentReceipt {
        transaction_id,
        amount,
        method: label.to_string(),
        installments,
    })
}
