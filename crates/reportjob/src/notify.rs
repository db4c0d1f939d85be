//! Host-facing notification sink.

/// Receives user-visible messages about a job's outcome.
///
/// The host decides how to surface them: a flash message, a toast, a log
/// line. The library only distinguishes success from failure.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn failure(&self, message: &str);
}

/// Forwards notifications to the tracing log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn failure(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Discards all notifications.
#[derive(Debug, Clone, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn info(&self, _message: &str) {}

    fn failure(&self, _message: &str) {}
}
