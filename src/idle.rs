//! Idle-fade state machine for the floating support button.
//!
//! The button shrinks one step per second of inactivity and disappears after
//! five steps. Any interaction anywhere brings it back. While its panel is
//! open it never decays.

use crate::catalog::View;
use std::time::{Duration, Instant};

pub const DECAY_INTERVAL: Duration = Duration::from_millis(1000);
pub const MAX_DECAY_TICK: u8 = 5;
const SCALE_STEP: f32 = 0.1;
const OPACITY_STEP: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    PointerMove,
    PointerDown,
    TouchStart,
    KeyDown,
    Scroll,
}

/// Names of the views the support button is mounted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleAllowList {
    views: Vec<String>,
}

impl IdleAllowList {
    pub fn new<I, S>(views: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            views: views.into_iter().map(Into::into).collect(),
        }
    }

    pub fn permits(&self, view: &View) -> bool {
        self.views.iter().any(|name| name == view.name())
    }
}

#[derive(Debug)]
pub struct IdleVisibility {
    visible: bool,
    tick: u8,
    open: bool,
    next_tick_at: Option<Instant>,
}

impl IdleVisibility {
    /// Mounts the scheduler for `view`. Outside the allow-list nothing is
    /// created, so no timer exists and no input is observed.
    pub fn mount(view: &View, allow: &IdleAllowList, now: Instant) -> Option<Self> {
        if !allow.permits(view) {
            log::debug!("Support button not mounted on {}", view.name());
            return None;
        }
        log::debug!("Support button mounted on {}", view.name());
        Some(Self::new(now))
    }

    pub fn new(now: Instant) -> Self {
        Self {
            visible: true,
            tick: 0,
            open: false,
            next_tick_at: Some(now + DECAY_INTERVAL),
        }
    }

    /// Resets the decay cycle. Returns true if the button was hidden or
    /// partially faded before.
    pub fn interact(&mut self, _kind: Interaction, now: Instant) -> bool {
        if self.open {
            return false;
        }
        let changed = !self.visible || self.tick != 0;
        self.restart(now);
        changed
    }

    pub fn set_open(&mut self, open: bool, now: Instant) {
        if open {
            self.open = true;
            self.tick = 0;
            self.visible = true;
            self.next_tick_at = None;
        } else if self.open {
            self.open = false;
            self.restart(now);
        }
    }

    pub fn toggle_open(&mut self, now: Instant) -> bool {
        self.set_open(!self.open, now);
        self.open
    }

    /// Applies every decay step due by `now`. Returns true if anything changed.
    pub fn advance(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(deadline) = self.next_tick_at {
            if self.open || deadline > now {
                break;
            }
            self.tick += 1;
            changed = true;
            if self.tick >= MAX_DECAY_TICK {
                self.tick = MAX_DECAY_TICK;
                self.visible = false;
                self.next_tick_at = None;
                log::debug!("Support button hidden after inactivity");
            } else {
                self.next_tick_at = Some(deadline + DECAY_INTERVAL);
            }
        }
        changed
    }

    fn restart(&mut self, now: Instant) {
        self.tick = 0;
        self.visible = true;
        self.next_tick_at = Some(now + DECAY_INTERVAL);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn decay_tick(&self) -> u8 {
        self.tick
    }

    pub fn is_timer_running(&self) -> bool {
        self.next_tick_at.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_tick_at
    }

    pub fn scale(&self) -> f32 {
        if !self.visible {
            return 0.0;
        }
        (1.0 - SCALE_STEP * self.tick as f32).clamp(0.0, 1.0)
    }

    pub fn opacity(&self) -> f32 {
        if !self.visible {
            return 0.0;
        }
        (1.0 - OPACITY_STEP * self.tick as f32).clamp(0.0, 1.0)
    }
}

impl Drop for IdleVisibility {
    fn drop(&mut self) {
        log::debug!("Support button unmounted at tick {}", self.tick);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn hides_after_five_seconds_without_input() {
        let start = Instant::now();
        let mut idle = IdleVisibility::new(start);

        for expected_tick in 1..MAX_DECAY_TICK {
            assert!(idle.advance(start + secs(expected_tick as u64)));
            assert_eq!(idle.decay_tick(), expected_tick);
            assert!(idle.is_visible());
        }

        idle.advance(start + secs(5));
        assert_eq!(idle.decay_tick(), MAX_DECAY_TICK);
        assert!(!idle.is_visible());
        assert!(!idle.is_timer_running());
    }

    #[test]
    fn advance_catches_up_on_missed_ticks() {
        let start = Instant::now();
        let mut idle = IdleVisibility::new(start);

        idle.advance(start + Duration::from_millis(3500));
        assert_eq!(idle.decay_tick(), 3);

        idle.advance(start + secs(60));
        assert_eq!(idle.decay_tick(), MAX_DECAY_TICK);
        assert!(!idle.is_visible());
    }

    #[test]
    fn interaction_resets_decay() {
        let start = Instant::now();
        let mut idle = IdleVisibility::new(start);
        idle.advance(start + secs(4));
        assert_eq!(idle.decay_tick(), 4);

        assert!(idle.interact(Interaction::PointerMove, start + Duration::from_millis(4500)));
        assert_eq!(idle.decay_tick(), 0);

        idle.advance(start + secs(9));
        assert_eq!(idle.decay_tick(), 4);
        assert!(idle.is_visible());
    }

    #[test]
    fn interaction_revives_hidden_button() {
        let start = Instant::now();
        let mut idle = IdleVisibility::new(start);
        idle.advance(start + secs(10));
        assert!(!idle.is_visible());

        idle.interact(Interaction::Scroll, start + secs(11));

        assert!(idle.is_visible());
        assert_eq!(idle.decay_tick(), 0);
        assert!(idle.is_timer_running());
    }

    #[test]
    fn open_panel_suspends_decay() {
        let start = Instant::now();
        let mut idle = IdleVisibility::new(start);
        idle.advance(start + secs(3));

        idle.set_open(true, start + secs(3));
        assert_eq!(idle.decay_tick(), 0);
        assert!(!idle.is_timer_running());

        assert!(!idle.advance(start + secs(600)));
        assert!(!idle.interact(Interaction::KeyDown, start + secs(601)));
        assert_eq!(idle.decay_tick(), 0);
        assert!(idle.is_visible());
    }

    #[test]
    fn closing_panel_restarts_cycle() {
        let start = Instant::now();
        let mut idle = IdleVisibility::new(start);
        idle.set_open(true, start);

        let closed_at = start + secs(100);
        idle.set_open(false, closed_at);

        assert_eq!(idle.decay_tick(), 0);
        idle.advance(closed_at + Duration::from_millis(4999));
        assert!(idle.is_visible());
        idle.advance(closed_at + secs(5));
        assert!(!idle.is_visible());
    }

    #[test]
    fn presentation_factors_shrink_with_decay() {
        let start = Instant::now();
        let mut idle = IdleVisibility::new(start);
        assert_eq!(idle.scale(), 1.0);
        assert_eq!(idle.opacity(), 1.0);

        idle.advance(start + secs(2));
        assert!((idle.scale() - 0.8).abs() < 1e-6);
        assert!((idle.opacity() - 0.6).abs() < 1e-6);

        idle.advance(start + secs(5));
        assert_eq!(idle.scale(), 0.0);
        assert_eq!(idle.opacity(), 0.0);
    }

    #[test]
    fn mount_is_gated_on_allow_list() {
        let allow = IdleAllowList::new(["home", "tool"]);
        let now = Instant::now();

        assert!(IdleVisibility::mount(&View::Home, &allow, now).is_some());
        assert!(IdleVisibility::mount(&View::Tool("merge".into()), &allow, now).is_some());
        assert!(IdleVisibility::mount(&View::Privacy, &allow, now).is_none());
    }
}
