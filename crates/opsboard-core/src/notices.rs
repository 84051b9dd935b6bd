//! Uniform user-visible notification channel.
//!
//! Every locally-handled failure (rolled-back mutation, rejected request)
//! surfaces here; the embedding UI renders notices however it likes
//! (toasts, status bar). Nothing in the core blocks on the receiver.

use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Sending half handed to stores, the dispatcher and runtime operations.
/// Cloneable; sends to a dropped receiver are silently discarded.
#[derive(Clone)]
pub struct NoticeSender {
    tx: Sender<Notice>,
}

impl NoticeSender {
    pub fn send(&self, level: NoticeLevel, message: impl Into<String>) {
        let notice = Notice {
            level,
            message: message.into(),
        };
        if self.tx.send(notice).is_err() {
            tracing::debug!("notice receiver dropped");
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.send(NoticeLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.send(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(NoticeLevel::Error, message);
    }
}

/// Create the notice channel; the receiver goes to the UI loop.
pub fn channel() -> (NoticeSender, Receiver<Notice>) {
    let (tx, rx) = mpsc::channel();
    (NoticeSender { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_arrive_in_order() {
        let (tx, rx) = channel();
        tx.info("a");
        tx.error("b");

        let first = rx.try_recv().unwrap();
        assert_eq!(first.level, NoticeLevel::Info);
        assert_eq!(first.message, "a");

        let second = rx.try_recv().unwrap();
        assert_eq!(second.level, NoticeLevel::Error);
    }

    #[test]
    fn dropped_receiver_does_not_panic() {
        let (tx, rx) = channel();
        drop(rx);
        tx.error("nobody listening");
    }
}
