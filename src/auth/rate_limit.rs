use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::AppState;

/// Per-client login and signup budget. Counts live in process memory, so the
/// budget is per server instance.
#[derive(Clone)]
pub struct RateLimitState {
    entries: Arc<Mutex<HashMap<String, RateLimitEntry>>>,
    max_requests: u32,
    window: Duration,
}

struct RateLimitEntry {
    count: u32,
    window_start: Instant,
}

impl RateLimitState {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Spends one request from `key`'s window. `Err` carries the time until the
    /// window resets.
    pub async fn check(&self, key: &str) -> Result<u32, Duration> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(RateLimitEntry {
            count: 0,
            window_start: now,
        });

        if now.duration_since(entry.window_start) > self.window {
            entry.count = 0;
            entry.window_start = now;
        }

        if entry.count >= self.max_requests {
            let retry_after = self
                .window
                .saturating_sub(now.duration_since(entry.window_start));
            return Err(retry_after);
        }

        entry.count += 1;
        Ok(self.max_requests - entry.count)
    }

    /// Forgets clients whose window started more than two windows ago.
    pub async fn cleanup(&self) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let keep = self.window * 2;

        entries.retain(|_, entry| now.duration_since(entry.window_start) < keep);
    }

    /// Runs `cleanup` once per window for the life of the runtime.
    pub fn spawn_cleanup_worker(&self) {
        let limiter = self.clone();
        let period = self.window.max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                limiter.cleanup().await;
            }
        });
    }
}

/// Budget key: one bucket per client IP and auth route.
fn bucket_key(addr: &SocketAddr, path: &str) -> String {
    format!("{}:{}", addr.ip(), path)
}

/// Rejects register/login attempts over budget with 429.
pub async fn rate_limit_auth(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let key = bucket_key(&addr, req.uri().path());

    match state.rate_limiter.check(&key).await {
        Ok(remaining) => {
            tracing::debug!(bucket = %key, remaining, "Auth attempt within budget");
            Ok(next.run(req).await)
        }
        Err(retry_after) => {
            tracing::warn!(
                bucket = %key,
                retry_after_secs = retry_after.as_secs(),
                "Auth attempt over budget"
            );
            Err(AppError::RateLimited)
        }
    }
}
