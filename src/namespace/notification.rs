use std::fmt;
use std::sync::Arc;

/// Callback run when a notification button is pressed
pub type NotificationHandler = Arc<dyn Fn() + Send + Sync>;

fn noop() -> NotificationHandler {
    Arc::new(|| {})
}

/// Dialog contents shown to the user. Both handlers default to no-ops.
#[derive(Clone)]
pub struct Notification {
    title: String,
    message: String,
    label_ok: String,
    label_cancel: String,
    on_ok: NotificationHandler,
    on_cancel: NotificationHandler,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, ok: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.label_ok = ok.into();
        self.label_cancel = cancel.into();
        self
    }

    pub fn on_ok(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_ok = Arc::new(handler);
        self
    }

    pub fn on_cancel(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Arc::new(handler);
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn label_ok(&self) -> &str {
        &self.label_ok
    }

    pub fn label_cancel(&self) -> &str {
        &self.label_cancel
    }

    pub fn confirm(&self) {
        (self.on_ok)()
    }

    pub fn cancel(&self) {
        (self.on_cancel)()
    }
}

impl Default for Notification {
    fn default() -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            label_ok: String::new(),
            label_cancel: String::new(),
            on_ok: noop(),
            on_cancel: noop(),
        }
    }
}

impl fmt::Debug for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notification")
            .field("title", &self.title)
            .field("message", &self.message)
            .field("label_ok", &self.label_ok)
            .field("label_cancel", &self.label_cancel)
            .finish_non_exhaustive()
    }
}

// Handlers are closures and take no part in equality.
impl PartialEq for Notification {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.message == other.message
            && self.label_ok == other.label_ok
            && self.label_cancel == other.label_cancel
    }
}

impl Eq for Notification {}
