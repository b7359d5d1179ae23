//! The alert channel.

/// Blocking, user-facing message (the page's `alert`).
pub trait Notifier {
    fn alert(&mut self, message: &str);
}

/// Collects alerts so a front end can show them after an action completes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlertLog {
    messages: Vec<String>,
}

impl AlertLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Take every pending alert, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }
}

impl Notifier for AlertLog {
    fn alert(&mut self, message: &str) {
        self.messages.push(message.to_owned());
    }
}
