use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A simple rate limiter using a sliding window algorithm.
///
/// It tracks request timestamps for each unique ID (e.g., client IP address)
/// to determine if a new request is allowed. One limiter is kept per endpoint bucket.
pub struct RateLimiter {
    /// Stores timestamps of requests for each client ID.
    requests: HashMap<String, Vec<Instant>>,
    /// The maximum number of requests allowed within the `window`.
    limit: usize,
    /// The duration of the sliding window.
    window: Duration,
}

impl RateLimiter {
    /// Creates a new `RateLimiter`.
    ///
    /// # Arguments
    ///
    /// * `limit` - The number of requests allowed per `window`.
    /// * `window` - The time duration of the sliding window.
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    /// Checks if a request from a given ID is allowed.
    ///
    /// If the request is allowed, it's recorded and the function returns `Ok(())`.
    /// Otherwise it returns how long the client has to wait before the oldest
    /// request in its window expires.
    ///
    /// # Arguments
    ///
    /// * `id` - A unique identifier for the source of the request.
    pub fn check(&mut self, id: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let window = self.window;

        let client_requests = self.requests.entry(id.to_string()).or_default();

        // Remove timestamps older than the window
        client_requests.retain(|&timestamp| now.duration_since(timestamp) < window);

        if client_requests.len() < self.limit {
            client_requests.push(now);
            Ok(())
        } else {
            let oldest = client_requests.first().copied().unwrap_or(now);
            Err(window.saturating_sub(now.duration_since(oldest)))
        }
    }

    /// Drops clients whose windows are empty.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.requests.retain(|_, stamps| {
            stamps.retain(|&timestamp| now.duration_since(timestamp) < window);
            !stamps.is_empty()
        });
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }
}
