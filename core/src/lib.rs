//! # Seatmap Core
//!
//! Core traits and types for building seat-map features as reducers.
//!
//! ## Core Concepts
//!
//! - **State**: Domain state for a feature (e.g. the seats of one rendered session)
//! - **Action**: All possible inputs to a reducer (commands and the events they produce)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected dependencies via traits
//!
//! ## Architecture Principles
//!
//! - Functional Core, Imperative Shell
//! - Unidirectional Data Flow
//! - Explicit Effects (no hidden I/O)
//! - Dependency Injection via Environment
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for SeatMapReducer {
//!     type State = SeatMapState;
//!     type Action = SeatMapAction;
//!     type Environment = SeatMapEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut SeatMapState,
//!         action: SeatMapAction,
//!         env: &SeatMapEnvironment,
//!     ) -> SmallVec<[Effect<SeatMapAction>; 4]> {
//!         // Business logic goes here
//!         smallvec![Effect::None]
//!     }
//! }
//! ```

#![forbid(unsafe_code)]

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use smallvec::{smallvec, SmallVec};

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// This is a pure function that:
        /// 1. Validates the action
        /// 2. Updates state in place
        /// 3. Returns effect descriptions to be executed
        ///
        /// Most actions produce at most a handful of effects, so the return
        /// value is a `SmallVec` that stays on the stack for up to four.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe side effects to be performed by the runtime.
/// They are values (not execution) and are composable.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should happen,
    /// returned from reducers and executed by the Store runtime.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Delayed action (for timeouts, retries)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an already-known action so the runtime feeds it back
        ///
        /// Useful for events a reducer has applied and wants observers to see.
        #[must_use]
        pub fn emit(action: Action) -> Effect<Action>
        where
            Action: Send + 'static,
        {
            Effect::Future(Box::pin(async move { Some(action) }))
        }

        /// Returns true for `Effect::None`
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, SystemClock};

    #[derive(Debug, Clone, PartialEq)]
    enum Ping {
        Pong,
    }

    #[test]
    fn debug_output_names_variants() {
        let effect: Effect<Ping> = Effect::merge(vec![Effect::None, Effect::None]);
        assert_eq!(
            format!("{effect:?}"),
            "Effect::Parallel([Effect::None, Effect::None])"
        );

        let future: Effect<Ping> = Effect::emit(Ping::Pong);
        assert_eq!(format!("{future:?}"), "Effect::Future(<future>)");
    }

    #[test]
    fn none_is_detected() {
        assert!(Effect::<Ping>::None.is_none());
        assert!(!Effect::<Ping>::chain(vec![]).is_none());
    }

    #[tokio::test]
    async fn emit_resolves_to_the_wrapped_action() {
        let Effect::Future(fut) = Effect::emit(Ping::Pong) else {
            unreachable!("emit always builds a future effect");
        };
        assert_eq!(fut.await, Some(Ping::Pong));
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
