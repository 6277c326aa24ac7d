use pdfdock::catalog::View;
use pdfdock::clock::ManualClock;
use pdfdock::flag_store::{
    COOKIE_CONSENT_KEY, FlagStore, INSTALL_DISMISSED_AT_KEY, MemoryFlagStore,
};
use pdfdock::prompts::{InstallCapability, InstallOutcome};
use pdfdock::settings::Settings;
use pdfdock::share::{ShareError, ShareRequest, ShareTarget};
use pdfdock::test_utils::test_helpers::TestScenarioBuilder;
use pdfdock::toast::ToastCategory;
use pdfdock::{App, run_app_with_event_source};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::cell::Cell;
use std::rc::Rc;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

fn app_with_store(clock: &ManualClock, store: Box<dyn FlagStore>) -> App {
    App::new(Settings::default(), store, Box::new(clock.clone()), 100)
}

fn run(app: &mut App, clock: &ManualClock, scenario: TestScenarioBuilder) {
    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    let mut events = scenario.build(clock);
    run_app_with_event_source(&mut terminal, app, &mut events).unwrap();
}

struct FakeInstall {
    invoked: Rc<Cell<u32>>,
}

impl InstallCapability for FakeInstall {
    fn suppress_default(&mut self) {}

    fn invoke(self: Box<Self>) -> InstallOutcome {
        self.invoked.set(self.invoked.get() + 1);
        InstallOutcome::Accepted
    }
}

#[test]
fn missing_information_toast_expires_after_two_seconds() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));

    run(
        &mut app,
        &clock,
        TestScenarioBuilder::new().press_enter().press_enter().quit(),
    );
    assert_eq!(app.view(), &View::Tool("merge".into()));
    let toast = app.toasts().latest().unwrap();
    assert_eq!(toast.title, "Missing Information");
    assert_eq!(toast.category, ToastCategory::Error);

    run(&mut app, &clock, TestScenarioBuilder::new().wait_millis(1999).quit());
    assert_eq!(app.toasts().len(), 1);

    run(&mut app, &clock, TestScenarioBuilder::new().wait_millis(1).quit());
    assert!(app.toasts().is_empty());
}

#[test]
fn toast_stack_is_bounded() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));
    let mut scenario = TestScenarioBuilder::new().press_enter();
    for _ in 0..8 {
        scenario = scenario.press_enter();
    }

    run(&mut app, &clock, scenario.quit());

    assert_eq!(app.toasts().retained().len(), 5);
    assert_eq!(app.toasts().visible().len(), 3);
}

#[test]
fn remove_toast_twice_is_harmless() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));
    let id = app.add_toast("Saved", "All good", ToastCategory::Success, None);

    app.remove_toast(id);
    app.remove_toast(id);

    assert!(app.toasts().is_empty());
}

#[test]
fn support_button_fades_and_revives() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));

    run(&mut app, &clock, TestScenarioBuilder::new().wait_millis(4000).quit());
    // the quit key itself counts as interaction
    assert!(app.idle().unwrap().is_visible());

    clock.advance_millis(5000);
    app.tick();
    let idle = app.idle().unwrap();
    assert!(!idle.is_visible());
    assert_eq!(idle.decay_tick(), 5);

    run(&mut app, &clock, TestScenarioBuilder::new().mouse_move(3, 3).quit());
    let idle = app.idle().unwrap();
    assert!(idle.is_visible());
    assert_eq!(idle.decay_tick(), 0);
}

#[test]
fn open_support_panel_never_decays() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('s').quit());
    assert!(app.idle().unwrap().is_open());

    clock.advance_millis(60_000);
    app.tick();
    let idle = app.idle().unwrap();
    assert!(idle.is_visible());
    assert_eq!(idle.decay_tick(), 0);

    run(&mut app, &clock, TestScenarioBuilder::new().press_esc().quit());
    assert!(!app.idle().unwrap().is_open());
    clock.advance_millis(4_999);
    app.tick();
    assert!(app.idle().unwrap().is_visible());
    clock.advance_millis(1);
    app.tick();
    assert!(!app.idle().unwrap().is_visible());
}

#[test]
fn support_button_only_mounts_on_allowed_views() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));
    assert!(app.idle().is_some());

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('3').quit());
    assert_eq!(app.view(), &View::Privacy);
    assert!(app.idle().is_none());

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('1').quit());
    assert!(app.idle().is_some());
}

#[test]
fn cookie_banner_shows_once_and_stays_dismissed_after_remount() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));

    run(&mut app, &clock, TestScenarioBuilder::new().wait_millis(1000).quit());
    assert!(!app.is_cookie_banner_visible());

    run(&mut app, &clock, TestScenarioBuilder::new().wait_millis(1000).quit());
    assert!(app.is_cookie_banner_visible());

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('c').quit());
    assert!(!app.is_cookie_banner_visible());
    assert_eq!(
        app.store().get(COOKIE_CONSENT_KEY).unwrap().as_deref(),
        Some("accepted")
    );

    let store = app.into_store();
    let mut remounted = app_with_store(&clock, store);
    run(
        &mut remounted,
        &clock,
        TestScenarioBuilder::new().wait_millis(10_000).quit(),
    );
    assert!(!remounted.is_cookie_banner_visible());
}

#[test]
fn install_prompt_respects_recent_dismissal() {
    let clock = ManualClock::starting_at_epoch(100 * DAY_MS);
    let invoked = Rc::new(Cell::new(0));
    let recent = MemoryFlagStore::new()
        .with_value(INSTALL_DISMISSED_AT_KEY, &(99 * DAY_MS).to_string());
    let mut app = app_with_store(&clock, Box::new(recent));

    assert!(!app.offer_install(Box::new(FakeInstall {
        invoked: Rc::clone(&invoked)
    })));
    assert!(!app.is_install_prompt_visible());

    let stale = MemoryFlagStore::new()
        .with_value(INSTALL_DISMISSED_AT_KEY, &(92 * DAY_MS).to_string());
    let mut app = app_with_store(&clock, Box::new(stale));
    assert!(app.offer_install(Box::new(FakeInstall {
        invoked: Rc::clone(&invoked)
    })));
    assert!(app.is_install_prompt_visible());

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('i').quit());
    assert!(!app.is_install_prompt_visible());
    assert_eq!(invoked.get(), 1);
    assert_eq!(app.toasts().latest().unwrap().title, "Installed");
}

#[test]
fn install_dismissal_writes_timestamp() {
    let clock = ManualClock::starting_at_epoch(5 * DAY_MS);
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));
    app.offer_install(Box::new(FakeInstall {
        invoked: Rc::new(Cell::new(0)),
    }));

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('d').quit());

    assert!(!app.is_install_prompt_visible());
    assert_eq!(
        app.store().get(INSTALL_DISMISSED_AT_KEY).unwrap(),
        Some((5 * DAY_MS).to_string())
    );
}

#[test]
fn hint_dismissal_persists() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));
    assert!(app.is_hint_visible());

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('h').quit());

    let remounted = app_with_store(&clock, app.into_store());
    assert!(!remounted.is_hint_visible());
}

#[test]
fn opening_tools_counts_usage() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));

    run(
        &mut app,
        &clock,
        TestScenarioBuilder::new()
            .navigate_down(2)
            .press_enter()
            .press_char('1')
            .press_enter()
            .press_char('1')
            .press_enter()
            .quit(),
    );

    assert_eq!(app.usage_count("compress"), 3);
    let remounted = app_with_store(&clock, app.into_store());
    assert_eq!(remounted.usage_count("compress"), 3);
}

#[test]
fn most_used_tool_is_listed_first_and_opens_on_enter() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));
    for _ in 0..3 {
        app.open_tool("rotate");
        app.navigate(View::Home);
    }

    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|f| app.draw(f)).unwrap();
    let buffer = terminal.backend().buffer();
    let rows: Vec<String> = (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect();
    let first_tool_row = rows
        .iter()
        .position(|row| row.contains("Rotate PDF"))
        .unwrap();
    let merge_row = rows
        .iter()
        .position(|row| row.contains("Merge PDF"))
        .unwrap();
    assert!(first_tool_row < merge_row);
    assert_eq!(app.home_tools()[0].id, "rotate");
    assert_eq!(app.selected_index(), 0);

    run(&mut app, &clock, TestScenarioBuilder::new().press_enter().quit());
    assert_eq!(app.view(), &View::Tool("rotate".into()));
    assert_eq!(app.usage_count("rotate"), 4);
}

#[test]
fn storage_failures_never_surface() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::unavailable()));

    run(
        &mut app,
        &clock,
        TestScenarioBuilder::new()
            .wait_millis(2000)
            .press_char('x')
            .press_char('h')
            .press_enter()
            .quit(),
    );

    assert!(!app.is_cookie_banner_visible());
    assert_eq!(app.usage_count("merge"), 1);
    assert!(app.toasts().is_empty());
}

#[test]
fn missing_share_target_opens_fallback() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('p').quit());
    let fallback = app.share_fallback().unwrap();
    assert_eq!(fallback.url, Settings::default().support_url);

    run(&mut app, &clock, TestScenarioBuilder::new().press_esc().quit());
    assert!(app.share_fallback().is_none());
}

struct CancellingShare;

impl ShareTarget for CancellingShare {
    fn share(&mut self, _request: &ShareRequest) -> Result<(), ShareError> {
        Err(ShareError::Cancelled)
    }
}

#[test]
fn cancelled_share_is_silent() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()))
        .with_share_target(Box::new(CancellingShare));

    run(&mut app, &clock, TestScenarioBuilder::new().press_char('p').quit());

    assert!(app.share_fallback().is_none());
    assert!(app.toasts().is_empty());
}

#[test]
fn resize_recomputes_mobile_flag() {
    let clock = ManualClock::new();
    let mut app = app_with_store(&clock, Box::new(MemoryFlagStore::new()));
    assert!(!app.is_mobile());

    run(&mut app, &clock, TestScenarioBuilder::new().resize(50, 30).quit());
    assert!(app.is_mobile());

    run(&mut app, &clock, TestScenarioBuilder::new().resize(120, 30).quit());
    assert!(!app.is_mobile());
}
