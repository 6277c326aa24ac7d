//! One-shot prompts gated by dismissal flags: cookie consent, install, hint.

use crate::flag_store::{
    COOKIE_CONSENT_KEY, FlagStore, HINT_DISMISSED_KEY, INSTALL_DISMISSED_AT_KEY, read_flag,
    write_flag,
};
use std::time::{Duration, Instant};

pub const COOKIE_BANNER_DELAY: Duration = Duration::from_millis(2000);
pub const INSTALL_REARM_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentChoice {
    Accepted,
    Rejected,
}

impl ConsentChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsentChoice::Accepted => "accepted",
            ConsentChoice::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsentState {
    Pending { show_at: Instant },
    Showing,
    Done,
}

/// Cookie banner: shown once, shortly after start, until the user decides.
#[derive(Debug)]
pub struct ConsentPrompt {
    state: ConsentState,
}

impl ConsentPrompt {
    pub fn mount(store: &dyn FlagStore, now: Instant) -> Self {
        let state = if read_flag(store, COOKIE_CONSENT_KEY).is_some() {
            ConsentState::Done
        } else {
            ConsentState::Pending {
                show_at: now + COOKIE_BANNER_DELAY,
            }
        };
        Self { state }
    }

    /// Returns true when the banner just became visible.
    pub fn advance(&mut self, now: Instant) -> bool {
        match self.state {
            ConsentState::Pending { show_at } if now >= show_at => {
                self.state = ConsentState::Showing;
                true
            }
            _ => false,
        }
    }

    pub fn decide(&mut self, choice: ConsentChoice, store: &mut dyn FlagStore) {
        if self.state != ConsentState::Showing {
            return;
        }
        write_flag(store, COOKIE_CONSENT_KEY, choice.as_str());
        log::info!("Cookie consent {}", choice.as_str());
        self.state = ConsentState::Done;
    }

    pub fn is_visible(&self) -> bool {
        self.state == ConsentState::Showing
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            ConsentState::Pending { show_at } => Some(show_at),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

/// Single-use install handle handed over by the platform.
///
/// `invoke` takes the capability by value, so a consumed handle cannot be
/// prompted again.
pub trait InstallCapability {
    /// Stops the platform from showing its own install UI.
    fn suppress_default(&mut self);
    fn invoke(self: Box<Self>) -> InstallOutcome;
}

#[derive(Default)]
pub struct InstallPrompt {
    capability: Option<Box<dyn InstallCapability>>,
}

impl InstallPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles the platform's install-available signal.
    pub fn offer(
        &mut self,
        mut capability: Box<dyn InstallCapability>,
        store: &dyn FlagStore,
        now_epoch_millis: i64,
    ) -> bool {
        capability.suppress_default();
        if install_eligible(store, now_epoch_millis) {
            self.capability = Some(capability);
            true
        } else {
            log::debug!("Install prompt dismissed recently, not showing");
            false
        }
    }

    pub fn dismiss(&mut self, store: &mut dyn FlagStore, now_epoch_millis: i64) {
        if self.capability.take().is_some() {
            write_flag(
                store,
                INSTALL_DISMISSED_AT_KEY,
                &now_epoch_millis.to_string(),
            );
        }
    }

    pub fn accept(&mut self) -> Option<InstallOutcome> {
        let capability = self.capability.take()?;
        let outcome = capability.invoke();
        log::info!("Install prompt outcome: {outcome:?}");
        Some(outcome)
    }

    pub fn is_visible(&self) -> bool {
        self.capability.is_some()
    }
}

impl std::fmt::Debug for InstallPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallPrompt")
            .field("visible", &self.is_visible())
            .finish()
    }
}

/// No dismissal recorded, or the recorded one is older than a week.
/// An unparseable timestamp counts as no dismissal.
pub fn install_eligible(store: &dyn FlagStore, now_epoch_millis: i64) -> bool {
    let Some(raw) = read_flag(store, INSTALL_DISMISSED_AT_KEY) else {
        return true;
    };
    match raw.trim().parse::<i64>() {
        Ok(dismissed_at) => now_epoch_millis.saturating_sub(dismissed_at) > INSTALL_REARM_MILLIS,
        Err(e) => {
            log::warn!("Ignoring malformed install dismissal timestamp {raw:?}: {e}");
            true
        }
    }
}

#[derive(Debug)]
pub struct HintBanner {
    visible: bool,
}

impl HintBanner {
    pub fn mount(store: &dyn FlagStore) -> Self {
        Self {
            visible: read_flag(store, HINT_DISMISSED_KEY).is_none(),
        }
    }

    pub fn dismiss(&mut self, store: &mut dyn FlagStore) {
        if self.visible {
            write_flag(store, HINT_DISMISSED_KEY, "true");
            self.visible = false;
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
