//! # Seatmap Runtime
//!
//! Runtime implementation for reducer-driven seat maps.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to reducers
//! - **Action Broadcast**: Lets rendering layers observe every action produced by effects
//!
//! ## Example
//!
//! ```ignore
//! use seatmap_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use seatmap_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for terminal action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Decrements the pending-effect counter when dropped, even if the effect panics.
struct PendingGuard(Arc<AtomicUsize>);

impl PendingGuard {
    fn track(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicUsize, Duration, Effect, Ordering, PendingGuard, Reducer, RwLock,
        StoreError,
    };
    use tokio::sync::broadcast;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Every action produced by an effect is broadcast here after the
        /// reducer has processed it, so observers always read settled state.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast channel holds 64 actions; use
        /// [`Store::with_broadcast_capacity`] for chattier reducers.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 64)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Starts the returned effects
        ///
        /// The reducer runs synchronously while holding the write lock. Effects
        /// run in spawned tasks, so `send()` returns as soon as they are started;
        /// a slow effect never delays the next action.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            metrics::counter!("store.commands.total").increment(1);
            self.reduce(action).await;

            Ok(())
        }

        /// Run the reducer under the write lock and start the returned effects
        async fn reduce(&self, action: A) {
            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut *state, action, &self.environment)
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect);
            }
        }

        /// Send an action and wait for a matching result action
        ///
        /// Subscribes to the action broadcast before sending, then returns the
        /// first action produced by effects that matches `predicate`.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: Timeout expired before matching action received
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: Store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            // Subscribe BEFORE sending to avoid race condition
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Actions passed directly to [`Store::send`] are not broadcast.
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let selected = store.state(|s| s.seats.selected_count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Number of effects currently running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Stop accepting actions and wait for running effects to finish
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still running
        /// once `timeout` has elapsed.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(20);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);
                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timed out");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Feed an effect-produced action back into the reducer, then broadcast it
        ///
        /// Counted under `store.effects.feedback`, not as a command.
        pub(crate) async fn feed_back(&self, action: A) {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Dropped effect feedback action: store is shutting down");
                metrics::counter!("store.shutdown.dropped_feedback").increment(1);
                return;
            }

            metrics::counter!("store.effects.feedback").increment(1);
            self.reduce(action.clone()).await;
            // No receivers is fine: nobody is observing right now.
            let _ = self.action_broadcast.send(action);
        }

        /// Execute an effect
        ///
        /// - `None`: No-op
        /// - `Future`: Executes async computation, feeds back the resulting action if `Some`
        /// - `Delay`: Waits for duration, then feeds back the action
        /// - `Parallel`: Starts every effect at once
        /// - `Sequential`: Runs effects in order, each finishing before the next starts
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Future(fut) => {
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    let guard = PendingGuard::track(&self.pending_effects);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        if let Some(action) = fut.await {
                            store.feed_back(action).await;
                        }
                    });
                },
                Effect::Delay { duration, action } => {
                    metrics::counter!("store.effects.executed", "type" => "delay").increment(1);
                    let guard = PendingGuard::track(&self.pending_effects);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        tokio::time::sleep(duration).await;
                        store.feed_back(*action).await;
                    });
                },
                Effect::Parallel(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                },
                Effect::Sequential(effects) => {
                    metrics::counter!("store.effects.executed", "type" => "sequential")
                        .increment(1);
                    let guard = PendingGuard::track(&self.pending_effects);
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        for effect in effects {
                            match effect {
                                Effect::None => {},
                                Effect::Future(fut) => {
                                    if let Some(action) = fut.await {
                                        store.feed_back(action).await;
                                    }
                                },
                                Effect::Delay { duration, action } => {
                                    tokio::time::sleep(duration).await;
                                    store.feed_back(*action).await;
                                },
                                // Nested groups are started, not awaited
                                nested @ (Effect::Parallel(_) | Effect::Sequential(_)) => {
                                    store.execute_effect(nested);
                                },
                            }
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use seatmap_core::{smallvec, SmallVec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        ProduceEffect,
        ProduceDelayedAction,
        ProduceParallelEffects,
        ProduceSequentialEffects,
    }

    struct TestEnv;

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::ProduceEffect => smallvec![Effect::emit(TestAction::Increment)],
                TestAction::ProduceDelayedAction => smallvec![Effect::Delay {
                    duration: Duration::from_millis(10),
                    action: Box::new(TestAction::Increment),
                }],
                TestAction::ProduceParallelEffects => smallvec![Effect::merge(vec![
                    Effect::emit(TestAction::Increment),
                    Effect::emit(TestAction::Increment),
                    Effect::emit(TestAction::Increment),
                ])],
                TestAction::ProduceSequentialEffects => smallvec![Effect::chain(vec![
                    Effect::emit(TestAction::Increment),
                    Effect::emit(TestAction::Increment),
                    Effect::emit(TestAction::Decrement),
                ])],
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    async fn settle(store: &Store<TestState, TestAction, TestEnv, TestReducer>) {
        for _ in 0..100 {
            if store.pending_effects() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_send_runs_reducer() {
        let store = test_store();
        store.send(TestAction::Increment).await.unwrap();
        store.send(TestAction::Increment).await.unwrap();
        store.send(TestAction::Decrement).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_future_effect_feeds_back() {
        let store = test_store();
        store.send(TestAction::ProduceEffect).await.unwrap();
        settle(&store).await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_delay_effect_feeds_back() {
        let store = test_store();
        let result = store
            .send_and_wait_for(
                TestAction::ProduceDelayedAction,
                |a| *a == TestAction::Increment,
                Duration::from_secs(1),
            )
            .await
            .unwrap();

        assert_eq!(result, TestAction::Increment);
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_parallel_effects() {
        let store = test_store();
        store.send(TestAction::ProduceParallelEffects).await.unwrap();
        settle(&store).await;

        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_sequential_effects_keep_order() {
        let store = test_store();
        let mut rx = store.subscribe_actions();
        store.send(TestAction::ProduceSequentialEffects).await.unwrap();

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(rx.recv().await.unwrap());
        }

        assert_eq!(
            seen,
            vec![
                TestAction::Increment,
                TestAction::Increment,
                TestAction::Decrement
            ]
        );
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_send_and_wait_for_times_out() {
        let store = test_store();
        let result = store
            .send_and_wait_for(
                TestAction::Increment,
                |_| true,
                Duration::from_millis(20),
            )
            .await;

        assert!(matches!(result, Err(StoreError::Timeout)));
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = test_store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TestAction::Increment).await;
        assert!(matches!(result, Err(StoreError::ShutdownInProgress)));
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    /// Counts every counter increment by metric name
    #[derive(Default)]
    struct CountingRecorder {
        counters: std::sync::Mutex<std::collections::HashMap<String, Arc<CounterCell>>>,
    }

    #[derive(Default)]
    struct CounterCell(AtomicUsize);

    impl metrics::CounterFn for CounterCell {
        fn increment(&self, value: u64) {
            self.0
                .fetch_add(usize::try_from(value).unwrap(), Ordering::SeqCst);
        }

        fn absolute(&self, value: u64) {
            self.0.store(usize::try_from(value).unwrap(), Ordering::SeqCst);
        }
    }

    impl CountingRecorder {
        fn count(&self, name: &str) -> usize {
            self.counters
                .lock()
                .unwrap()
                .get(name)
                .map_or(0, |cell| cell.0.load(Ordering::SeqCst))
        }
    }

    impl metrics::Recorder for CountingRecorder {
        fn describe_counter(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }

        fn describe_gauge(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }

        fn describe_histogram(
            &self,
            _: metrics::KeyName,
            _: Option<metrics::Unit>,
            _: metrics::SharedString,
        ) {
        }

        fn register_counter(&self, key: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Counter {
            let cell = Arc::clone(
                self.counters
                    .lock()
                    .unwrap()
                    .entry(key.name().to_string())
                    .or_default(),
            );
            metrics::Counter::from_arc(cell)
        }

        fn register_gauge(&self, _: &metrics::Key, _: &metrics::Metadata<'_>) -> metrics::Gauge {
            metrics::Gauge::noop()
        }

        fn register_histogram(
            &self,
            _: &metrics::Key,
            _: &metrics::Metadata<'_>,
        ) -> metrics::Histogram {
            metrics::Histogram::noop()
        }
    }

    #[test]
    fn test_feedback_is_not_counted_as_command() {
        let recorder = CountingRecorder::default();

        // Current-thread runtime so spawned effects see the local recorder.
        metrics::with_local_recorder(&recorder, || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async {
                let store = test_store();
                store
                    .send_and_wait_for(
                        TestAction::ProduceParallelEffects,
                        |a| *a == TestAction::Increment,
                        Duration::from_secs(1),
                    )
                    .await
                    .unwrap();
                settle(&store).await;
                assert_eq!(store.state(|s| s.value).await, 3);
            });
        });

        assert_eq!(recorder.count("store.commands.total"), 1);
        assert_eq!(recorder.count("store.effects.feedback"), 3);
    }

    #[tokio::test]
    async fn test_feedback_dropped_after_shutdown() {
        let store = test_store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        store.feed_back(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = test_store();
        let other = store.clone();
        other.send(TestAction::Increment).await.unwrap();

        assert_eq!(store.state(|s| s.value).await, 1);
    }
}
