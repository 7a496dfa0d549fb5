//! Progress Reporting
//!
//! The host-facing side of a sync pass: human-readable progress, outcome
//! counters, and the cooperative cancellation flag.

/// Progress and cancellation sink
///
/// Methods are synchronous and must be cheap; the sync core calls them
/// between every item.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::progress::ProgressSink;
///
/// fn step(sink: &dyn ProgressSink) -> bool {
///     sink.report("Uploading Holiday : IMG_0001.JPG...");
///     !sink.is_cancelled()
/// }
/// ```
pub trait ProgressSink: Send + Sync {
    /// Report what the sync is doing right now
    fn report(&self, message: &str);

    /// Add to the session's outcome counters
    fn add_outcome(&self, downloaded: u64, uploaded: u64, failed: u64);

    /// Whether the host asked the sync to stop
    fn is_cancelled(&self) -> bool;

    /// Set the session's status line
    fn set_status(&self, message: &str);
}
