//! Transient user-facing notices.

use derive_getters::Getters;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

/// Visual category of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum NoticeKind {
    /// Operation succeeded.
    #[display("success")]
    Success,
    /// Operation failed.
    #[display("error")]
    Error,
    /// Neutral information.
    #[display("info")]
    Info,
}

/// A message shown until `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Notice {
    message: String,
    kind: NoticeKind,
    expires_at: Instant,
}

/// Ordered set of live notices with a fixed lifetime.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    ttl: Duration,
    notices: Vec<Notice>,
}

impl NoticeBoard {
    /// Creates an empty board whose notices live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            notices: Vec::new(),
        }
    }

    /// Posts a notice created at `now`.
    #[instrument(skip(self, message), fields(message = %message.as_ref()))]
    pub fn push(&mut self, message: impl AsRef<str>, kind: NoticeKind, now: Instant) {
        debug!(%kind, "Notice posted");
        self.notices.push(Notice {
            message: message.as_ref().to_string(),
            kind,
            expires_at: now + self.ttl,
        });
    }

    /// Drops notices that expired at or before `now`.
    pub fn prune(&mut self, now: Instant) {
        self.notices.retain(|n| n.expires_at > now);
    }

    /// Live notices, oldest first.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Most recent notice, if any.
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Whether any notice is live.
    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}
