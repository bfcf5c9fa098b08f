//! Transient notification seam.
//!
//! The host page renders these as toasts; the core only guarantees that
//! every failure produces exactly one of them.

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Neutral status ("Now playing ...")
    Info,

    /// Completed action
    Success,

    /// Failed action
    Error,
}

/// Sink for transient user notifications.
pub trait Notifier: Send + Sync {
    /// Show one transient notification
    fn notify(&self, level: NoticeLevel, message: &str);

    /// Open a long-running notification ("Uploading...").
    ///
    /// The returned handle must be resolved exactly once; resolving it
    /// replaces the pending notification, so the user is never left
    /// looking at a stuck spinner.
    fn begin_progress(&self, message: &str) -> Box<dyn Progress>;

    /// Show an info notification
    fn info(&self, message: &str) {
        self.notify(NoticeLevel::Info, message);
    }

    /// Show a success notification
    fn success(&self, message: &str) {
        self.notify(NoticeLevel::Success, message);
    }

    /// Show an error notification
    fn error(&self, message: &str) {
        self.notify(NoticeLevel::Error, message);
    }
}

/// Handle for a pending notification, consumed on resolution.
pub trait Progress: Send {
    /// Replace the pending notification with a success
    fn succeed(self: Box<Self>, message: &str);

    /// Replace the pending notification with an error
    fn fail(self: Box<Self>, message: &str);
}

/// Notifier that discards everything.
///
/// For hosts without a notification surface, and as a test default.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _level: NoticeLevel, _message: &str) {}

    fn begin_progress(&self, _message: &str) -> Box<dyn Progress> {
        Box::new(NullProgress)
    }
}

struct NullProgress;

impl Progress for NullProgress {
    fn succeed(self: Box<Self>, _message: &str) {}
    fn fail(self: Box<Self>, _message: &str) {}
}
