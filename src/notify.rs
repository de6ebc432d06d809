use tracing::{error, info};

/// Sink for user-facing operation outcomes. The interface layer decides how
/// to present them; the store only guarantees each outcome is reported once.
pub trait Notifier: Send + Sync + 'static {
    fn success(&self, message: &str);

    fn error(&self, message: &str);
}

/// Default sink that routes outcomes to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        info!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}
