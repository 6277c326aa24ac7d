pub mod test_helpers {
    use crate::clock::ManualClock;
    use crate::event_source::{
        Event, KeyCode, KeyModifiers, MouseButton, MouseEventKind, SimulatedEventSource,
        SimulatedStep,
    };
    use std::time::Duration;

    /// Builder for creating test scenarios with simulated user input
    pub struct TestScenarioBuilder {
        steps: Vec<SimulatedStep>,
    }

    impl TestScenarioBuilder {
        pub fn new() -> Self {
            Self { steps: Vec::new() }
        }

        fn input(mut self, event: Event) -> Self {
            self.steps.push(SimulatedStep::Input(event));
            self
        }

        pub fn press_char(self, c: char) -> Self {
            self.input(SimulatedEventSource::char_key(c))
        }

        pub fn press_enter(self) -> Self {
            self.input(SimulatedEventSource::key_event(
                KeyCode::Enter,
                KeyModifiers::empty(),
            ))
        }

        pub fn press_esc(self) -> Self {
            self.input(SimulatedEventSource::key_event(
                KeyCode::Esc,
                KeyModifiers::empty(),
            ))
        }

        /// Navigate down n times (press 'j' n times)
        pub fn navigate_down(mut self, times: usize) -> Self {
            for _ in 0..times {
                self = self.press_char('j');
            }
            self
        }

        pub fn mouse_move(self, column: u16, row: u16) -> Self {
            self.input(SimulatedEventSource::mouse_event(
                MouseEventKind::Moved,
                column,
                row,
            ))
        }

        pub fn click(self, column: u16, row: u16) -> Self {
            self.input(SimulatedEventSource::mouse_event(
                MouseEventKind::Down(MouseButton::Left),
                column,
                row,
            ))
        }

        pub fn scroll_down(self) -> Self {
            self.input(SimulatedEventSource::mouse_event(
                MouseEventKind::ScrollDown,
                0,
                0,
            ))
        }

        pub fn resize(self, columns: u16, rows: u16) -> Self {
            self.input(Event::Resize(columns, rows))
        }

        pub fn wait_millis(mut self, millis: u64) -> Self {
            self.steps
                .push(SimulatedStep::Wait(Duration::from_millis(millis)));
            self
        }

        pub fn quit(self) -> Self {
            self.press_char('q')
        }

        /// Build the event source; waits advance `clock`.
        pub fn build(self, clock: &ManualClock) -> SimulatedEventSource {
            SimulatedEventSource::from_steps(self.steps, Some(clock.clone()))
        }
    }

    impl Default for TestScenarioBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
