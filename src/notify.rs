//! Notification collaborator
//!
//! Welcome notifications after bulk student creation are fire-and-forget:
//! queued on the runtime and never awaited by the importer, so a slow or
//! failing notification backend cannot fail a row or block the response.

use std::sync::Arc;

pub trait Notifier: Send + Sync {
    /// Queue a welcome notification. Must not block and must not fail the
    /// caller.
    fn queue_welcome(&self, email: &str, full_name: &str);
}

pub type SharedNotifier = Arc<dyn Notifier>;

/// Notifier that records the send in the log. Stands in for the external
/// email/notification service.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn queue_welcome(&self, email: &str, full_name: &str) {
        let email = email.to_string();
        let full_name = full_name.to_string();
        tokio::spawn(async move {
            tracing::info!("Queued welcome notification for {} <{}>", full_name, email);
        });
    }
}

#[cfg(test)]
pub mod testing {
    use super::Notifier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts queued notifications for assertions
    #[derive(Default)]
    pub struct CountingNotifier {
        pub queued: AtomicUsize,
    }

    impl Notifier for CountingNotifier {
        fn queue_welcome(&self, _email: &str, _full_name: &str) {
            self.queued.fetch_add(1, Ordering::SeqCst);
        }
    }
}
