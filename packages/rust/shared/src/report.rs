//! Operator-facing run reporting.
//!
//! Every masked failure in the pipeline surfaces here rather than as an
//! error value, so the implementation is the only channel an operator has
//! into a degraded run. The CLI renders these around its spinner; tests
//! use [`SilentReporter`] or a recording stub.

/// Progress and diagnostics callback for a pipeline run.
pub trait RunReporter: Send + Sync {
    /// Called when entering a new pipeline phase.
    fn phase(&self, name: &str);
    /// Called for each recoverable problem that was masked into a fallback.
    fn warning(&self, message: &str);
    /// Called for failures worth flagging more loudly (still non-fatal).
    fn error(&self, message: &str);
    /// Called for each dataset lookup within the resource phase.
    fn lookup_progress(&self, current: usize, total: usize, use_case: &str);
    /// Called when the run completes.
    fn finished(&self);
}

/// No-op reporter for headless/test usage.
pub struct SilentReporter;

impl RunReporter for SilentReporter {
    fn phase(&self, _name: &str) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
    fn lookup_progress(&self, _current: usize, _total: usize, _use_case: &str) {}
    fn finished(&self) {}
}
