use crate::catalog::{Tool, View, by_popularity, find_tool};
use crate::clock::Clock;
use crate::event_source::{Event, EventSource, KeyCode, KeyEvent, KeyEventKind, MouseEventKind};
use crate::flag_store::FlagStore;
use crate::idle::{IdleAllowList, IdleVisibility, Interaction};
use crate::prompts::{
    ConsentChoice, ConsentPrompt, HintBanner, InstallCapability, InstallOutcome, InstallPrompt,
};
use crate::settings::Settings;
use crate::share::{
    ClipboardWriter, ShareFallback, ShareRequest, ShareResult, ShareTarget, copy_to_clipboard,
    share_or_fallback,
};
use crate::theme::{Base16Palette, palette_by_name};
use crate::toast::{
    Toast, ToastAction, ToastCategory, ToastCommand, ToastExtra, ToastId, ToastQueue,
};
use crate::usage::{UsageCounts, load_usage, record_tool_use, usage_of};
use crate::viewport::Viewport;
use anyhow::Result;
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::time::{Duration, Instant};

const TICK_RATE: Duration = Duration::from_millis(100);
const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

/// The shell. Sole owner of the toast list and the flag store; everything
/// else reaches them through the methods below.
pub struct App {
    settings: Settings,
    palette: &'static Base16Palette,
    clock: Box<dyn Clock>,
    store: Box<dyn FlagStore>,
    toasts: ToastQueue,
    idle_allow: IdleAllowList,
    idle: Option<IdleVisibility>,
    consent: ConsentPrompt,
    install: InstallPrompt,
    hint: HintBanner,
    viewport: Viewport,
    view: View,
    list_state: ListState,
    usage: UsageCounts,
    share_target: Option<Box<dyn ShareTarget>>,
    clipboard: Option<Box<dyn ClipboardWriter>>,
    share_fallback: Option<ShareFallback>,
}

impl App {
    pub fn new(
        settings: Settings,
        store: Box<dyn FlagStore>,
        clock: Box<dyn Clock>,
        width: u16,
    ) -> Self {
        let now = clock.now();
        let idle_allow = IdleAllowList::new(settings.idle_views.iter().cloned());
        let view = View::Home;
        let idle = IdleVisibility::mount(&view, &idle_allow, now);
        let consent = ConsentPrompt::mount(store.as_ref(), now);
        let hint = HintBanner::mount(store.as_ref());
        let usage = load_usage(store.as_ref());
        let viewport = Viewport::new(width, settings.mobile_breakpoint);
        let palette = palette_by_name(&settings.theme);

        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            settings,
            palette,
            clock,
            store,
            toasts: ToastQueue::new(),
            idle_allow,
            idle,
            consent,
            install: InstallPrompt::new(),
            hint,
            viewport,
            view,
            list_state,
            usage,
            share_target: None,
            clipboard: None,
            share_fallback: None,
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardWriter>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn with_share_target(mut self, target: Box<dyn ShareTarget>) -> Self {
        self.share_target = Some(target);
        self
    }

    /// Tears the app down and hands back its flag store, e.g. to start a
    /// fresh session on the same storage.
    pub fn into_store(self) -> Box<dyn FlagStore> {
        self.store
    }

    pub fn add_toast(
        &mut self,
        title: &str,
        message: &str,
        category: ToastCategory,
        extra: Option<ToastExtra>,
    ) -> ToastId {
        let now = self.clock.now();
        self.toasts.add(title, message, category, extra, now)
    }

    pub fn remove_toast(&mut self, id: ToastId) {
        self.toasts.remove(id);
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport.is_mobile()
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn idle(&self) -> Option<&IdleVisibility> {
        self.idle.as_ref()
    }

    pub fn is_cookie_banner_visible(&self) -> bool {
        self.consent.is_visible()
    }

    pub fn is_install_prompt_visible(&self) -> bool {
        self.install.is_visible()
    }

    pub fn is_hint_visible(&self) -> bool {
        self.hint.is_visible()
    }

    pub fn share_fallback(&self) -> Option<&ShareFallback> {
        self.share_fallback.as_ref()
    }

    pub fn usage_count(&self, tool_id: &str) -> u64 {
        usage_of(&self.usage, tool_id)
    }

    pub fn store(&self) -> &dyn FlagStore {
        self.store.as_ref()
    }

    pub fn selected_index(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    /// Home list rows, most used first.
    pub fn home_tools(&self) -> Vec<&'static Tool> {
        by_popularity(&self.usage)
    }

    /// Platform signal that the app can be installed.
    pub fn offer_install(&mut self, capability: Box<dyn InstallCapability>) -> bool {
        let now = self.clock.epoch_millis();
        self.install.offer(capability, self.store.as_ref(), now)
    }

    pub fn navigate(&mut self, view: View) {
        if view == self.view {
            return;
        }
        debug!("Navigating from {} to {}", self.view.name(), view.name());
        let now = self.clock.now();
        // Each view is a fresh page lifetime for the support button
        self.idle = None;
        self.idle = IdleVisibility::mount(&view, &self.idle_allow, now);
        if view == View::Home {
            // usage may have reordered the list
            self.list_state.select(Some(0));
        }
        self.view = view;
    }

    pub fn open_tool(&mut self, tool_id: &str) {
        let Some(tool) = find_tool(tool_id) else {
            let now = self.clock.now();
            self.toasts
                .error("Unknown Tool", &format!("No tool named {tool_id}"), now);
            return;
        };
        let count = record_tool_use(self.store.as_mut(), tool.id);
        self.usage.insert(tool.id.to_string(), count);
        info!("Opened tool {} (used {count} times)", tool.id);
        self.navigate(View::Tool(tool.id.to_string()));
    }

    /// Fires every timer due by now. Returns true if anything visible changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        let mut changed = !self.toasts.advance(now).is_empty();
        if let Some(idle) = self.idle.as_mut() {
            changed |= idle.advance(now);
        }
        changed |= self.consent.advance(now);
        changed
    }

    fn poll_timeout(&self) -> Duration {
        let now = self.clock.now();
        [
            self.toasts.next_deadline(),
            self.idle.as_ref().and_then(|idle| idle.next_deadline()),
            self.consent.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .map(|deadline| deadline.saturating_duration_since(now))
        .fold(TICK_RATE, Duration::min)
    }

    pub fn handle_event(&mut self, event: Event) -> Option<AppAction> {
        let now = self.clock.now();
        if let Some(interaction) = interaction_for(&event) {
            if let Some(idle) = self.idle.as_mut() {
                idle.interact(interaction, now);
            }
        }

        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key, now),
            Event::Resize(columns, _rows) => {
                if self.viewport.resize(columns) {
                    debug!("Viewport is now mobile: {}", self.viewport.is_mobile());
                }
                None
            }
            _ => None,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<AppAction> {
        if self.share_fallback.is_some() {
            match key.code {
                KeyCode::Char('q') => return Some(AppAction::Quit),
                KeyCode::Esc => self.share_fallback = None,
                KeyCode::Char('y') => {
                    if let Some(url) = self.share_fallback.as_ref().map(|f| f.url.clone()) {
                        self.copy_link(&url, now);
                    }
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Char('q') => return Some(AppAction::Quit),
            KeyCode::Esc => self.handle_escape(now),
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::Enter => self.activate(now),
            KeyCode::Char('s') => {
                if let Some(idle) = self.idle.as_mut() {
                    idle.toggle_open(now);
                }
            }
            KeyCode::Char('c') if self.consent.is_visible() => {
                self.consent
                    .decide(ConsentChoice::Accepted, self.store.as_mut());
            }
            KeyCode::Char('x') if self.consent.is_visible() => {
                self.consent
                    .decide(ConsentChoice::Rejected, self.store.as_mut());
            }
            KeyCode::Char('i') if self.install.is_visible() => {
                if self.install.accept() == Some(InstallOutcome::Accepted) {
                    self.toasts
                        .success("Installed", "pdfdock was added to your launcher", now);
                }
            }
            KeyCode::Char('d') if self.install.is_visible() => {
                let epoch = self.clock.epoch_millis();
                self.install.dismiss(self.store.as_mut(), epoch);
            }
            KeyCode::Char('h') => self.hint.dismiss(self.store.as_mut()),
            KeyCode::Char('y') => {
                let url = self.settings.support_url.clone();
                self.copy_link(&url, now);
            }
            KeyCode::Char('p') => self.share(),
            KeyCode::Char('u') => self.trigger_latest_action(),
            KeyCode::Char('1') => self.navigate(View::Home),
            KeyCode::Char('2') => self.navigate(View::About),
            KeyCode::Char('3') => self.navigate(View::Privacy),
            _ => {}
        }
        None
    }

    fn handle_escape(&mut self, now: Instant) {
        if let Some(idle) = self.idle.as_mut().filter(|idle| idle.is_open()) {
            idle.set_open(false, now);
            return;
        }
        match self.view.clone() {
            View::Home => {
                if let Some(id) = self.toasts.latest().map(|t| t.id) {
                    self.toasts.remove(id);
                }
            }
            View::Tool(id) => {
                self.navigate(View::Home);
                let name = find_tool(&id).map(|t| t.name).unwrap_or("tool");
                let reopen = ToastCommand::Navigate(View::Tool(id));
                self.toasts.add(
                    "Closed",
                    &format!("Left {name}"),
                    ToastCategory::Undo,
                    Some(ToastExtra::Action(ToastAction::new("Reopen", reopen))),
                    now,
                );
            }
            View::About | View::Privacy => self.navigate(View::Home),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.view != View::Home {
            return;
        }
        let last = self.home_tools().len().saturating_sub(1) as isize;
        let next = (self.selected_index() as isize + delta).clamp(0, last);
        self.list_state.select(Some(next as usize));
    }

    fn activate(&mut self, now: Instant) {
        match &self.view {
            View::Home => {
                if let Some(tool) = self.home_tools().get(self.selected_index()) {
                    self.open_tool(tool.id);
                }
            }
            View::Tool(_) => {
                self.toasts
                    .error("Missing Information", "Drop a PDF file to get started", now);
            }
            View::About | View::Privacy => {}
        }
    }

    fn trigger_latest_action(&mut self) {
        let Some(id) = self.toasts.latest_with_action().map(|t| t.id) else {
            return;
        };
        if let Some(ToastCommand::Navigate(view)) = self.toasts.trigger_action(id) {
            self.navigate(view);
        }
    }

    fn copy_link(&mut self, url: &str, now: Instant) {
        match self.clipboard.as_mut() {
            Some(clipboard) => {
                copy_to_clipboard(clipboard.as_mut(), url, &mut self.toasts, now);
            }
            None => log::warn!("No clipboard available, cannot copy {url}"),
        }
    }

    fn share(&mut self) {
        let request = ShareRequest {
            title: "PDF Tools".to_string(),
            text: "Free PDF tools that run on your own machine".to_string(),
            url: self.settings.support_url.clone(),
        };
        match share_or_fallback(self.share_target.as_deref_mut(), &request) {
            ShareResult::Shared => {
                let now = self.clock.now();
                self.toasts.success("Shared", "Thanks for spreading the word", now);
            }
            ShareResult::Cancelled => {}
            ShareResult::Fallback(fallback) => self.share_fallback = Some(fallback),
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        let palette = self.palette;
        let hint_height = if self.hint.is_visible() { 1 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(hint_height),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area);

        self.render_header(f, chunks[0]);
        if self.hint.is_visible() {
            let hint = Paragraph::new(" Tip: open a tool with Enter, press s for support. (h: hide)")
                .style(Style::default().fg(palette.base_03));
            f.render_widget(hint, chunks[1]);
        }
        self.render_main(f, chunks[2]);
        self.render_help_bar(f, chunks[3]);

        self.render_support_button(f, chunks[2]);
        if self.consent.is_visible() {
            self.render_cookie_banner(f, chunks[2]);
        }
        self.render_toasts(f, area);
        if self.install.is_visible() {
            self.render_install_prompt(f, area);
        }
        if let Some(fallback) = &self.share_fallback {
            render_share_fallback(f, area, fallback, palette);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let palette = self.palette;
        let mut spans = vec![Span::styled(
            format!(" {} ", self.view.title()),
            Style::default()
                .fg(palette.base_07)
                .add_modifier(Modifier::BOLD),
        )];
        if self.viewport.is_mobile() {
            spans.push(Span::styled("[compact]", Style::default().fg(palette.base_03)));
        }
        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.base_02)),
        );
        f.render_widget(header, area);
    }

    fn render_main(&mut self, f: &mut Frame, area: Rect) {
        let palette = self.palette;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.base_04));

        match &self.view {
            View::Home => {
                let compact = self.viewport.is_mobile();
                let items: Vec<ListItem> = self
                    .home_tools()
                    .into_iter()
                    .map(|tool| {
                        let uses = usage_of(&self.usage, tool.id);
                        let mut spans = vec![Span::styled(
                            tool.name,
                            Style::default().fg(palette.base_05),
                        )];
                        if !compact {
                            spans.push(Span::styled(
                                format!("  {}", tool.summary),
                                Style::default().fg(palette.base_03),
                            ));
                        }
                        if uses > 0 {
                            spans.push(Span::styled(
                                format!("  ({uses})"),
                                Style::default().fg(palette.base_0c),
                            ));
                        }
                        ListItem::new(Line::from(spans))
                    })
                    .collect();
                let list = List::new(items).block(block.title(" Tools ")).highlight_style(
                    Style::default()
                        .bg(palette.base_02)
                        .fg(palette.base_06)
                        .add_modifier(Modifier::BOLD),
                );
                f.render_stateful_widget(list, area, &mut self.list_state);
            }
            View::Tool(id) => {
                let (name, summary) = find_tool(id)
                    .map(|t| (t.name, t.summary))
                    .unwrap_or(("Unknown tool", ""));
                let lines = vec![
                    Line::from(Span::styled(
                        name,
                        Style::default()
                            .fg(palette.base_0d)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(summary),
                    Line::from(""),
                    Line::from(format!("Used {} times", usage_of(&self.usage, id))),
                    Line::from("Enter: start   Esc: back"),
                ];
                let body = Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(block);
                f.render_widget(body, area);
            }
            View::About => {
                let body = Paragraph::new(
                    "Every tool runs locally. Files never leave your machine.",
                )
                .wrap(Wrap { trim: true })
                .block(block.title(" About "));
                f.render_widget(body, area);
            }
            View::Privacy => {
                let body = Paragraph::new(
                    "Only small preference flags are stored: cookie consent, \
                     install dismissal, hint dismissal and tool usage counts.",
                )
                .wrap(Wrap { trim: true })
                .block(block.title(" Privacy "));
                f.render_widget(body, area);
            }
        }
    }

    fn render_help_bar(&self, f: &mut Frame, area: Rect) {
        let palette = self.palette;
        let text = if self.share_fallback.is_some() {
            "y: Copy link | Esc: Close | q: Quit"
        } else if self.consent.is_visible() {
            "c: Accept cookies | x: Reject | q: Quit"
        } else if self.install.is_visible() {
            "i: Install | d: Not now | q: Quit"
        } else if self.toasts.latest_with_action().is_some() {
            "u: Undo | Esc: Back | j/k: Move | q: Quit"
        } else if self.viewport.is_mobile() {
            "j/k Enter Esc s q"
        } else {
            "j/k: Move | Enter: Open | Esc: Back | s: Support | 1/2/3: Home/About/Privacy | q: Quit"
        };
        let help = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.base_02)),
            )
            .style(Style::default().fg(palette.base_03));
        f.render_widget(help, area);
    }

    fn render_support_button(&self, f: &mut Frame, area: Rect) {
        let Some(idle) = self.idle.as_ref() else {
            return;
        };
        if !idle.is_visible() {
            return;
        }
        let palette = self.palette;
        let label = if idle.scale() >= 0.9 {
            " ♥ Support "
        } else if idle.scale() >= 0.7 {
            " ♥ Sup "
        } else {
            " ♥ "
        };
        let width = label.chars().count() as u16;
        if area.width < width + 2 || area.height < 2 {
            return;
        }
        let button_area = Rect::new(
            area.x + area.width - width - 1,
            area.y + area.height - 2,
            width,
            1,
        );
        let button = Paragraph::new(label).style(
            Style::default()
                .fg(palette.base_00)
                .bg(palette.faded_accent(idle.opacity())),
        );
        f.render_widget(Clear, button_area);
        f.render_widget(button, button_area);

        if idle.is_open() {
            let panel_width = 40.min(area.width);
            let panel_height = 6.min(area.height.saturating_sub(2));
            let panel_area = Rect::new(
                area.x + area.width - panel_width,
                button_area.y.saturating_sub(panel_height),
                panel_width,
                panel_height,
            );
            let panel = Paragraph::new(vec![
                Line::from("Enjoying the tools?"),
                Line::from(self.settings.support_url.as_str()),
                Line::from("y: Copy link   p: Share   s: Close"),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Support ")
                    .border_style(Style::default().fg(palette.base_0e)),
            );
            f.render_widget(Clear, panel_area);
            f.render_widget(panel, panel_area);
        }
    }

    fn render_cookie_banner(&self, f: &mut Frame, area: Rect) {
        let palette = self.palette;
        let height = 4.min(area.height);
        let banner_area = Rect::new(area.x, area.y + area.height - height, area.width, height);
        let banner = Paragraph::new(vec![
            Line::from("We store a few preferences on this machine."),
            Line::from("c: Accept   x: Reject"),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cookies ")
                .border_style(Style::default().fg(palette.base_0a)),
        );
        f.render_widget(Clear, banner_area);
        f.render_widget(banner, banner_area);
    }

    fn render_install_prompt(&self, f: &mut Frame, area: Rect) {
        let palette = self.palette;
        let popup = centered_rect(50, 30, area);
        let body = Paragraph::new(vec![
            Line::from("Install pdfdock for quick access from your launcher?"),
            Line::from(""),
            Line::from("i: Install   d: Not now"),
        ])
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Install ")
                .border_style(Style::default().fg(palette.base_0d)),
        );
        f.render_widget(Clear, popup);
        f.render_widget(body, popup);
    }

    fn render_toasts(&self, f: &mut Frame, area: Rect) {
        let width = if self.viewport.is_mobile() {
            area.width.saturating_sub(2)
        } else {
            TOAST_WIDTH.min(area.width)
        };
        let mut y = area.y + 1;
        for toast in self.toasts.visible() {
            if width == 0 || y + TOAST_HEIGHT > area.y + area.height {
                break;
            }
            let toast_area = Rect::new(area.x + area.width - width, y, width, TOAST_HEIGHT);
            render_toast(f, toast_area, toast, self.palette);
            y += TOAST_HEIGHT;
        }
    }
}

fn render_toast(f: &mut Frame, area: Rect, toast: &Toast, palette: &Base16Palette) {
    let color = palette.toast_color(toast.category);
    let mut lines = vec![Line::from(toast.body.as_str())];
    if let Some(action) = &toast.action {
        lines.push(Line::from(Span::styled(
            format!("[u] {}", action.label),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
    }
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(palette.base_05))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} · {} ", toast.category.label(), toast.title)),
        );
    f.render_widget(Clear, area);
    f.render_widget(body, area);
}

fn render_share_fallback(f: &mut Frame, area: Rect, fallback: &ShareFallback, palette: &Base16Palette) {
    let popup = centered_rect(70, 60, area);
    let mut lines = vec![
        Line::from(fallback.text.as_str()),
        Line::from(Span::styled(
            fallback.url.as_str(),
            Style::default().fg(palette.base_0d),
        )),
        Line::from(""),
    ];
    for link in &fallback.links {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<9}", link.network),
                Style::default().fg(palette.base_0e),
            ),
            Span::raw(link.url.as_str()),
        ]));
    }
    let body = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Share ")
            .border_style(Style::default().fg(palette.base_0d)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(body, popup);
}

fn interaction_for(event: &Event) -> Option<Interaction> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(Interaction::KeyDown),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(Interaction::PointerMove),
            MouseEventKind::Down(_) => Some(Interaction::PointerDown),
            MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight => Some(Interaction::Scroll),
            MouseEventKind::Up(_) => None,
        },
        _ => None,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|f| app.draw(f))?;
            needs_redraw = false;
        }

        if event_source.poll(app.poll_timeout())? {
            let event = event_source.read()?;
            if app.handle_event(event) == Some(AppAction::Quit) {
                return Ok(());
            }
            needs_redraw = true;
        }

        if app.tick() {
            needs_redraw = true;
        }
    }
}
