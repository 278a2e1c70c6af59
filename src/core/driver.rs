use crate::errors::DriverResult;
use async_trait::async_trait;

/// The external browser-automation handle the harness drives but does not
/// implement. Everything the flow needs from a browser goes through this
/// seam, so the flow and runner can be exercised against a mock.
#[async_trait]
pub trait SessionDriver: Send + Sync {
    /// Navigate the active tab to a URL and wait for the load to settle.
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Set an input's value, dispatching the DOM events a real user would.
    async fn set_value(&self, selector: &str, value: &str) -> DriverResult<()>;

    /// Click the first element matching the selector.
    async fn click(&self, selector: &str) -> DriverResult<()>;

    /// Whether the first matching element is currently rendered with a
    /// non-zero bounding box.
    async fn is_visible(&self, selector: &str) -> DriverResult<bool>;

    /// Block until the selector becomes visible or the timeout elapses.
    /// Returns `Ok(false)` on timeout; `Err` only for driver failures.
    async fn wait_for_visible(&self, selector: &str, timeout_ms: u64) -> DriverResult<bool>;

    /// Drop the session's cookies so the next iteration starts clean.
    async fn clear_cookies(&self) -> DriverResult<()>;

    async fn current_url(&self) -> DriverResult<String>;

    async fn close(&mut self) -> DriverResult<()>;
}
