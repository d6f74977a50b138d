use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::PurchaseRecord;

/// Pause after records load before the first automatic display.
pub const INITIAL_DELAY: Duration = Duration::from_secs(3);
/// How long a shown record stays on screen before auto-hiding.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(10);
/// Pause between an auto-hide and the next automatic display.
pub const CYCLE_INTERVAL: Duration = Duration::from_secs(3);

/// Observable state of the popup cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No records, or manually dismissed with nothing pending.
    Idle,
    /// Records loaded, popup off screen; rotation may be pending.
    Hidden,
    /// Popup on screen, auto-hide countdown running.
    Visible,
}

/// Side effects for the presentation adapter. Content and visibility are
/// separate so a hide never clears the last rendered record mid-fade.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Render(PurchaseRecord),
    Show,
    Hide,
}

/// The popup cycle state machine: display, auto-hide, pause, next.
///
/// Owns every piece of session state and is driven by an external clock:
/// operations take `now` and return the effects to apply, `next_deadline`
/// tells the driver how long it may sleep. Each timer slot holds at most
/// one deadline; scheduling overwrites the slot, which is also how a
/// pending timer gets cancelled.
///
/// `cursor` always points at the NEXT record to auto-show; the record on
/// screen is the one before it (mod len).
#[derive(Debug, Clone, PartialEq)]
pub struct PopupCycle {
    records: Vec<PurchaseRecord>,
    cursor: usize,
    visible: bool,
    manually_dismissed: bool,
    display_deadline: Option<Instant>,
    rotate_deadline: Option<Instant>,
}

impl PopupCycle {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            cursor: 0,
            visible: false,
            manually_dismissed: false,
            display_deadline: None,
            rotate_deadline: None,
        }
    }

    /// Takes ownership of the fetched records and schedules the first
    /// display after the initial delay. Called at most once per session;
    /// an empty list leaves the cycle permanently idle.
    pub fn start(&mut self, records: Vec<PurchaseRecord>, now: Instant) {
        if records.is_empty() {
            debug!("no records, popup stays idle");
            return;
        }
        debug!(count = records.len(), "records loaded, scheduling first display");
        self.records = records;
        self.cursor = 0;
        self.rotate_deadline = Some(now + INITIAL_DELAY);
    }

    /// Fires any elapsed timer. Call whenever `next_deadline` may have
    /// passed; calling early or repeatedly is harmless.
    ///
    /// The manual-dismiss guard is checked here, at the moment an automatic
    /// display would happen, so a dismissal during the initial delay window
    /// suppresses the first display too.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.display_deadline.is_some_and(|at| now >= at) {
            self.display_deadline = None;
            self.visible = false;
            effects.push(Effect::Hide);
            self.rotate_deadline = Some(now + CYCLE_INTERVAL);
        }
        if self.rotate_deadline.is_some_and(|at| now >= at) {
            self.rotate_deadline = None;
            if !self.manually_dismissed {
                effects.extend(self.show_current(now));
            }
        }
        effects
    }

    /// Shows the record after the one on screen and restarts the full
    /// display countdown. No-op without records.
    pub fn navigate_next(&mut self, now: Instant) -> Vec<Effect> {
        if self.records.is_empty() {
            return Vec::new();
        }
        self.cancel_timers();
        self.show_current(now)
    }

    /// Shows the record before the one on screen (the first record wraps
    /// back to the last) and restarts the full display countdown. No-op
    /// without records.
    pub fn navigate_previous(&mut self, now: Instant) -> Vec<Effect> {
        if self.records.is_empty() {
            return Vec::new();
        }
        self.cancel_timers();
        let len = self.records.len();
        let shown = (self.cursor + len - 1) % len;
        self.cursor = (shown + len - 1) % len;
        self.show_current(now)
    }

    /// User closed the popup: cancel all pending timers, hide, and stop
    /// automatic rotation for the rest of the session (until
    /// `reset_manual_hide`). Safe to call repeatedly.
    pub fn dismiss(&mut self) -> Vec<Effect> {
        self.cancel_timers();
        self.manually_dismissed = true;
        if self.visible {
            self.visible = false;
            debug!("popup dismissed");
            vec![Effect::Hide]
        } else {
            Vec::new()
        }
    }

    /// Clears the sticky dismissal and, when records are loaded, resumes
    /// the cycle immediately.
    pub fn reset_manual_hide(&mut self, now: Instant) -> Vec<Effect> {
        self.manually_dismissed = false;
        if self.records.is_empty() {
            return Vec::new();
        }
        self.show_current(now)
    }

    /// Earliest pending deadline, for the driver's poll timeout. `None`
    /// while nothing is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.display_deadline, self.rotate_deadline) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn phase(&self) -> Phase {
        if self.visible {
            Phase::Visible
        } else if self.records.is_empty() || self.manually_dismissed {
            Phase::Idle
        } else {
            Phase::Hidden
        }
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn show_current(&mut self, now: Instant) -> Vec<Effect> {
        let record = self.records[self.cursor].clone();
        debug!(cursor = self.cursor, product = %record.product_name, "showing record");
        self.cursor = (self.cursor + 1) % self.records.len();
        self.visible = true;
        self.display_deadline = Some(now + DISPLAY_DURATION);
        self.rotate_deadline = None;
        vec![Effect::Render(record), Effect::Show]
    }

    fn cancel_timers(&mut self) {
        self.display_deadline = None;
        self.rotate_deadline = None;
    }
}

impl Default for PopupCycle {
    fn default() -> Self {
        Self::new()
    }
}
