use crate::clock::ManualClock;
use anyhow::Result;
pub use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::collections::VecDeque;
use std::time::Duration;

/// Trait for abstracting event sources to enable testing
pub trait EventSource {
    /// Poll for events with a timeout
    fn poll(&mut self, timeout: Duration) -> Result<bool>;

    /// Read the next event
    fn read(&mut self) -> Result<Event>;
}

/// Terminal input via crossterm
pub struct TerminalEventSource;

impl EventSource for TerminalEventSource {
    fn poll(&mut self, timeout: Duration) -> Result<bool> {
        Ok(crossterm::event::poll(timeout)?)
    }

    fn read(&mut self) -> Result<Event> {
        Ok(crossterm::event::read()?)
    }
}

#[derive(Debug, Clone)]
pub enum SimulatedStep {
    Input(Event),
    /// Lets time pass on the attached clock without any input.
    Wait(Duration),
}

/// Scripted input for tests. Waits advance the shared `ManualClock`, so the
/// app's timers fire exactly as they would after real idle time.
pub struct SimulatedEventSource {
    steps: VecDeque<SimulatedStep>,
    clock: Option<ManualClock>,
}

impl SimulatedEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self::from_steps(events.into_iter().map(SimulatedStep::Input).collect(), None)
    }

    pub fn from_steps(steps: Vec<SimulatedStep>, clock: Option<ManualClock>) -> Self {
        Self {
            steps: steps.into(),
            clock,
        }
    }

    pub fn key_event(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        })
    }

    pub fn char_key(c: char) -> Event {
        Self::key_event(KeyCode::Char(c), KeyModifiers::empty())
    }

    pub fn mouse_event(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        })
    }
}

impl EventSource for SimulatedEventSource {
    fn poll(&mut self, _timeout: Duration) -> Result<bool> {
        match self.steps.front() {
            Some(SimulatedStep::Wait(duration)) => {
                if let Some(clock) = &self.clock {
                    clock.advance(*duration);
                }
                self.steps.pop_front();
                Ok(false)
            }
            Some(SimulatedStep::Input(_)) => Ok(true),
            // Exhausted scripts still need to end the run loop
            None => Ok(true),
        }
    }

    fn read(&mut self) -> Result<Event> {
        loop {
            match self.steps.pop_front() {
                Some(SimulatedStep::Input(event)) => return Ok(event),
                Some(SimulatedStep::Wait(duration)) => {
                    if let Some(clock) = &self.clock {
                        clock.advance(duration);
                    }
                }
                None => return Ok(Self::char_key('q')),
            }
        }
    }
}
