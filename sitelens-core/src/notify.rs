use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(5);
const MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Success => "success",
            Level::Warning => "warning",
            Level::Error => "error",
        }
    }
}

/// A transient toast message.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    /// Crawl item the message refers to, if any.
    pub item_id: Option<i64>,
    /// Sticky notifications stay until dismissed.
    pub sticky: bool,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            item_id: None,
            sticky: false,
            created_at: Instant::now(),
        }
    }

    pub fn with_item(mut self, id: i64) -> Self {
        self.item_id = Some(id);
        self
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        !self.sticky && now.saturating_duration_since(self.created_at) >= ttl
    }
}

#[derive(Debug, Clone)]
pub struct Notifications {
    entries: Vec<Notification>,
    ttl: Duration,
}

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.entries.push(notification);
        if self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.drain(0..self.entries.len() - MAX_NOTIFICATIONS);
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Notification::new(Level::Info, message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(Level::Success, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::new(Level::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(Level::Error, message));
    }

    /// Drop every non-sticky notification older than the TTL.
    pub fn expire(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries.retain(|n| !n.is_expired(now, ttl));
    }

    pub fn dismiss_all(&mut self) {
        self.entries.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Notification> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
