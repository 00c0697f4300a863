//! Shared application state for API handlers.

use super::error::ApiError;
use crate::engine::Engine;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Shared application state passed to all handlers.
pub struct AppState {
    /// The engine being served.
    pub engine: Arc<Engine>,
    /// Server start time.
    pub start_time: Instant,
    /// Messages published through the API.
    published: AtomicU64,
    /// Configurations loaded through the API.
    loads: AtomicU64,
}

impl AppState {
    /// Create new application state.
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            start_time: Instant::now(),
            published: AtomicU64::new(0),
            loads: AtomicU64::new(0),
        }
    }

    /// Get server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record a publish.
    pub fn record_publish(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a configuration load.
    pub fn record_load(&self) {
        self.loads.fetch_add(1, Ordering::Relaxed);
    }

    /// Run engine work on the blocking pool.
    ///
    /// Loads take the engine's write lock and publishes run whole agent
    /// chains synchronously, so neither may run on a runtime worker.
    pub async fn run_engine<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Engine) -> T + Send + 'static,
        T: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || work(&engine))
            .await
            .map_err(|e| ApiError::internal("E900", format!("Engine task failed: {}", e)))
    }

    /// Messages published through the API so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    /// Configurations loaded through the API so far.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .field("uptime_secs", &self.uptime_secs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rivulet_core::testing::RecordingAgent;
    use std::time::Duration;

    #[test]
    fn counters() {
        let state = AppState::new(Arc::new(Engine::new()));
        state.record_publish();
        state.record_publish();
        state.record_load();

        assert_eq!(state.published(), 2);
        assert_eq!(state.loads(), 1);
    }

    #[tokio::test]
    async fn engine_work_returns_its_result() {
        let state = AppState::new(Arc::new(Engine::new()));
        let loaded = state
            .run_engine(|engine| engine.load_config("std::inc\nA\nB\n"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.agents.len(), 1);

        let subscribers = state
            .run_engine(|engine| engine.publish("A", "1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(subscribers, 1);
    }

    #[tokio::test]
    async fn slow_subscribers_do_not_stall_the_runtime() {
        let engine = Arc::new(Engine::new());
        let slow = RecordingAgent::hooked("slow", |_, _| {
            std::thread::sleep(Duration::from_millis(400));
        });
        engine.topic_registry().get("A").unwrap().subscribe(slow.clone());
        let state = Arc::new(AppState::new(engine));

        let work = tokio::spawn({
            let state = Arc::clone(&state);
            async move { state.run_engine(|engine| engine.publish("A", "1")).await }
        });

        // Single-threaded runtime: the timer only fires on time if the
        // publish is not holding the runtime thread.
        let started = std::time::Instant::now();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(started.elapsed() < Duration::from_millis(300));

        assert_eq!(work.await.unwrap().unwrap().unwrap(), 1);
        assert_eq!(slow.received().len(), 1);
    }
}
