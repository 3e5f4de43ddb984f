//! Configuration management for the cinema seat map.
//!
//! Loads configuration from `CINEMA_*` environment variables with defaults
//! matching the shipped venue. Call `dotenvy::dotenv()` first to pick up a
//! `.env` file.

use crate::engine::{MainSectionPolicy, SelectionPolicy};
use crate::layout::{LayoutError, VenueLayout};
use crate::payment::GatewaySettings;
use crate::types::SessionId;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// Parse error
        reason: String,
    },

    /// The configured layout cannot be rendered
    #[error("invalid venue layout: {0}")]
    Layout(#[from] LayoutError),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Venue shape
    pub layout: VenueLayout,
    /// Click rules
    pub policy: SelectionPolicy,
    /// Seed for the occupied-seat draw; entropy when unset
    pub seed: Option<u64>,
    /// Session to render
    pub session_id: SessionId,
    /// Simulated gateway behaviour
    pub payment: GatewaySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: VenueLayout::default(),
            policy: SelectionPolicy::default(),
            seed: None,
            session_id: SessionId::new(1),
            payment: GatewaySettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparsable values or an invalid layout.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparsable values or an invalid layout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };
        let defaults = Self::default();
        let layout = &defaults.layout;

        let layout = VenueLayout {
            top_row: vars.parse("CINEMA_TOP_ROW", layout.top_row)?,
            vip_rows: vars.parse("CINEMA_VIP_ROWS", layout.vip_rows)?,
            regular_rows: vars.parse("CINEMA_REGULAR_ROWS", layout.regular_rows)?,
            premium_rows: vars.parse("CINEMA_PREMIUM_ROWS", layout.premium_rows)?,
            seats_before_aisle: vars.parse("CINEMA_SEATS_BEFORE_AISLE", layout.seats_before_aisle)?,
            aisle_width: vars.parse("CINEMA_AISLE_WIDTH", layout.aisle_width)?,
            seats_after_aisle: vars.parse("CINEMA_SEATS_AFTER_AISLE", layout.seats_after_aisle)?,
            occupied_min: vars.parse("CINEMA_OCCUPIED_MIN", layout.occupied_min)?,
            occupied_max: vars.parse("CINEMA_OCCUPIED_MAX", layout.occupied_max)?,
        };
        layout.validate()?;

        let policy = SelectionPolicy {
            max_selected: vars.parse("CINEMA_MAX_SELECTED", defaults.policy.max_selected)?,
            main_section: vars.parse::<MainSectionPolicy>(
                "CINEMA_MAIN_SECTION",
                defaults.policy.main_section,
            )?,
        };

        let payment = GatewaySettings {
            card_latency: Duration::from_millis(vars.parse(
                "CINEMA_CARD_LATENCY_MS",
                duration_ms(defaults.payment.card_latency),
            )?),
            pix_latency: Duration::from_millis(vars.parse(
                "CINEMA_PIX_LATENCY_MS",
                duration_ms(defaults.payment.pix_latency),
            )?),
            pix_approval_rate: vars.parse(
                "CINEMA_PIX_APPROVAL_RATE",
                defaults.payment.pix_approval_rate,
            )?,
        };
        if !(0.0..=1.0).contains(&payment.pix_approval_rate) {
            return Err(ConfigError::Invalid {
                key: "CINEMA_PIX_APPROVAL_RATE",
                value: payment.pix_approval_rate.to_string(),
                reason: "must be between 0 and 1".to_string(),
            });
        }

        Ok(Self {
            layout,
            policy,
            seed: vars.optional("CINEMA_SEED")?,
            session_id: SessionId::new(vars.parse("CINEMA_SESSION_ID", defaults.session_id.value())?),
            payment,
        })
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional<T>(&self, key: &'static str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = (self.lookup)(key) else {
            return Ok(None);
        };
        value
            .trim()
            .parse()
            .map(Some)
            .map_err(|error: T::Err| ConfigError::Invalid {
                key,
                reason: error.to_string(),
                value,
            })
    }

    fn parse<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.optional(key)?.unwrap_or(default))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layout.total_rows(), 17);
        assert_eq!(config.policy.max_selected, 6);
        assert_eq!(config.payment.card_latency, Duration::from_millis(2000));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("CINEMA_VIP_ROWS", "2"),
            ("CINEMA_MAIN_SECTION", "selectable"),
            ("CINEMA_SEED", " 42 "),
            ("CINEMA_SESSION_ID", "3"),
            ("CINEMA_PIX_APPROVAL_RATE", "1"),
            ("CINEMA_CARD_LATENCY_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.layout.vip_rows, 2);
        assert_eq!(config.policy.main_section, MainSectionPolicy::Selectable);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.session_id, SessionId::new(3));
        assert!((config.payment.pix_approval_rate - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.payment.card_latency, Duration::ZERO);
    }

    #[test]
    fn unparsable_value_names_the_key() {
        let error = Config::from_lookup(lookup(&[("CINEMA_MAX_SELECTED", "six")])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { key: "CINEMA_MAX_SELECTED", .. }));
    }

    #[test]
    fn unknown_main_section_policy_is_reported() {
        let error = Config::from_lookup(lookup(&[("CINEMA_MAIN_SECTION", "open")])).unwrap_err();
        assert_eq!(
            error,
            ConfigError::Invalid {
                key: "CINEMA_MAIN_SECTION",
                value: "open".to_string(),
                reason: "unknown main section policy \"open\", expected inert or selectable"
                    .to_string(),
            }
        );
    }

    #[test]
    fn invalid_layout_is_rejected() {
        let error = Config::from_lookup(lookup(&[("CINEMA_SEATS_AFTER_AISLE", "90")])).unwrap_err();
        assert_eq!(error, ConfigError::Layout(LayoutError::TooManyColumns(109)));
    }

    #[test]
    fn lowercase_top_row_is_reported_as_such() {
        let error = Config::from_lookup(lookup(&[("CINEMA_TOP_ROW", "r")])).unwrap_err();
        assert_eq!(error, ConfigError::Layout(LayoutError::InvalidTopRow('r')));
    }

    #[test]
    fn approval_rate_must_be_a_probability() {
        let error = Config::from_lookup(lookup(&[("CINEMA_PIX_APPROVAL_RATE", "1.5")])).unwrap_err();
        assert!(matches!(error, ConfigError::Invalid { key: "CINEMA_PIX_APPROVAL_RATE", .. }));
    }
}
