use crate::catalog::View;
use crate::timer::TimerQueue;
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(2000);
pub const ACTION_TOAST_DURATION: Duration = Duration::from_millis(6000);
/// Oldest toasts beyond this are evicted on insert.
pub const MAX_RETAINED_TOASTS: usize = 5;
pub const MAX_VISIBLE_TOASTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastCategory {
    #[default]
    Warning,
    Error,
    Undo,
    Success,
}

impl ToastCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ToastCategory::Warning => "WARNING",
            ToastCategory::Error => "ERROR",
            ToastCategory::Undo => "UNDO",
            ToastCategory::Success => "SUCCESS",
        }
    }
}

/// What the shell should do when a toast's button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToastCommand {
    Navigate(View),
}

/// Button attached to a toast, e.g. "Undo".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastAction {
    pub label: String,
    pub command: ToastCommand,
}

impl ToastAction {
    pub fn new(label: impl Into<String>, command: ToastCommand) -> Self {
        Self {
            label: label.into(),
            command,
        }
    }
}

/// Either an explicit lifetime or an action button (which implies the
/// longer action lifetime).
#[derive(Debug, Clone)]
pub enum ToastExtra {
    Duration(Duration),
    Action(ToastAction),
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub body: String,
    pub category: ToastCategory,
    pub duration: Duration,
    pub action: Option<ToastAction>,
    pub created_at: Instant,
}

impl Toast {
    pub fn expires_at(&self) -> Instant {
        self.created_at + self.duration
    }
}

/// Ordered list of live toasts with per-toast expiry.
///
/// Insertion order is preserved; the display set is always the most recent
/// `MAX_VISIBLE_TOASTS` of the retained list.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    expiry: TimerQueue<ToastId>,
    next_id: u64,
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a toast and arms its expiry timer. Never fails; callers are
    /// responsible for rejecting blank titles.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
        category: ToastCategory,
        extra: Option<ToastExtra>,
        now: Instant,
    ) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);

        let (duration, action) = match extra {
            Some(ToastExtra::Duration(d)) if !d.is_zero() => (d, None),
            Some(ToastExtra::Duration(_)) | None => (DEFAULT_TOAST_DURATION, None),
            Some(ToastExtra::Action(action)) => (ACTION_TOAST_DURATION, Some(action)),
        };

        let toast = Toast {
            id,
            title: title.into(),
            body: body.into(),
            category,
            duration,
            action,
            created_at: now,
        };
        log::debug!("Adding {id} ({}) for {duration:?}", category.label());
        self.expiry.schedule(id, toast.expires_at());
        self.toasts.push(toast);

        if self.toasts.len() > MAX_RETAINED_TOASTS {
            let overflow = self.toasts.len() - MAX_RETAINED_TOASTS;
            for evicted in self.toasts.drain(..overflow) {
                self.expiry.cancel(&evicted.id);
            }
        }
        id
    }

    pub fn warning(&mut self, title: &str, body: &str, now: Instant) -> ToastId {
        self.add(title, body, ToastCategory::Warning, None, now)
    }

    pub fn error(&mut self, title: &str, body: &str, now: Instant) -> ToastId {
        self.add(title, body, ToastCategory::Error, None, now)
    }

    pub fn success(&mut self, title: &str, body: &str, now: Instant) -> ToastId {
        self.add(title, body, ToastCategory::Success, None, now)
    }

    /// Removes the toast and cancels its timer. Unknown ids are ignored.
    pub fn remove(&mut self, id: ToastId) -> bool {
        self.expiry.cancel(&id);
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    /// Dismisses the toast and hands back its button's command for the
    /// caller to carry out.
    pub fn trigger_action(&mut self, id: ToastId) -> Option<ToastCommand> {
        let command = self
            .toasts
            .iter()
            .find(|t| t.id == id)
            .and_then(|t| t.action.as_ref())
            .map(|action| action.command.clone());
        self.remove(id);
        command
    }

    /// Fires due expiry timers; returns the ids that expired.
    pub fn advance(&mut self, now: Instant) -> Vec<ToastId> {
        let expired = self.expiry.drain_due(now);
        for id in &expired {
            self.remove(*id);
        }
        expired
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
        self.expiry.cancel_all();
    }

    pub fn retained(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn visible(&self) -> &[Toast] {
        let start = self.toasts.len().saturating_sub(MAX_VISIBLE_TOASTS);
        &self.toasts[start..]
    }

    /// Most recent toast that carries an action.
    pub fn latest_with_action(&self) -> Option<&Toast> {
        self.visible().iter().rev().find(|t| t.action.is_some())
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.expiry.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.expiry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }
}
