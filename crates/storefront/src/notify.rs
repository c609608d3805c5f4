//! User-facing notification sink.

/// Shows a transient error message to the shopper.
///
/// Fire-and-forget: the cart never waits on or inspects the result.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that emits each message as a `warn` tracing event.
///
/// Useful for headless sessions where log output is the only "screen".
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        tracing::warn!(notification = %message, "Cart notification");
    }
}
