use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::action::{Action, Direction};
use crate::alert::ThresholdSet;
use crate::config::{Config, ThresholdStore, parse_key};
use crate::event::{Event, EventHandler};
use crate::format::stats_summary;
use crate::monitor::{LogDispatcher, Monitor, NotificationDispatcher, TickReport};
use crate::system::host::{HostMetrics, SysinfoHost};
use crate::system::kill::ProcessSignaller;
use crate::system::process::ProcessSample;
use crate::ui::theme::{Theme, resolve_color_support};

const ALERT_FEED_CAPACITY: usize = 20;

/// How long the newest alert stays in the status bar.
const ALERT_DISPLAY: Duration = Duration::from_secs(30);

const STATUS_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
    EditThresholds,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub refresh: KeyCode,
    pub copy_stats: KeyCode,
    pub edit_thresholds: KeyCode,
    pub kill: KeyCode,
    pub help: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: KeyCode::Char(parse_key(&kb.quit).unwrap_or('q')),
            refresh: KeyCode::Char(parse_key(&kb.refresh).unwrap_or('r')),
            copy_stats: KeyCode::Char(parse_key(&kb.copy_stats).unwrap_or('c')),
            edit_thresholds: KeyCode::Char(parse_key(&kb.edit_thresholds).unwrap_or('t')),
            kill: KeyCode::Char(parse_key(&kb.kill).unwrap_or('k')),
            help: KeyCode::Char('?'),
        }
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.copy_stats), "Copy stats"),
            (key_label(self.edit_thresholds), "Edit thresholds"),
            (key_label(self.kill), "Kill selected (SIGTERM)"),
            ("\u{2191}\u{2193}".to_string(), "Select process"),
            (key_label(self.help), "Toggle help"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "Esc".to_string(),
        _ => "?".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub message: String,
    pub at: Instant,
}

/// Keeps the most recent alerts for the status bar and forwards each one
/// to the log.
#[derive(Debug, Default)]
pub struct AlertFeed {
    entries: VecDeque<FeedEntry>,
    log: LogDispatcher,
}

impl AlertFeed {
    pub fn latest(&self) -> Option<&FeedEntry> {
        self.entries.back()
    }

    /// The newest alert if it is still fresh enough to show.
    pub fn visible(&self, now: Instant) -> Option<&FeedEntry> {
        self.latest()
            .filter(|e| now.saturating_duration_since(e.at) < ALERT_DISPLAY)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl NotificationDispatcher for AlertFeed {
    fn notify(&mut self, title: &str, message: &str) {
        self.log.notify(title, message);
        if self.entries.len() == ALERT_FEED_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(FeedEntry {
            title: title.to_string(),
            message: message.to_string(),
            at: Instant::now(),
        });
    }
}

/// Outcome of a user command, shown briefly in the status bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub at: Instant,
}

/// Where the app draws itself and sends copied text.
pub trait Surface<H: HostMetrics> {
    fn render(&mut self, app: &App<H>) -> io::Result<()>;

    fn copy_to_clipboard(&mut self, text: &str) -> io::Result<()>;
}

pub struct App<H: HostMetrics = SysinfoHost> {
    pub running: bool,
    pub monitor: Monitor<H>,
    pub report: Option<TickReport>,
    pub alerts: AlertFeed,
    pub theme: Theme,
    pub input_mode: InputMode,
    pub threshold_input: String,
    /// Index into the CPU list followed by the memory list.
    pub selected_index: usize,
    pub status_message: Option<StatusMessage>,
    pub keybinds: ResolvedKeybinds,
    store: ThresholdStore,
    pending_copy: Option<String>,
    tick_rate: Duration,
    last_refresh: Option<Instant>,
}

impl App<SysinfoHost> {
    pub fn new(config: &Config, monitor: Monitor<SysinfoHost>, store: ThresholdStore) -> Self {
        App::with_monitor(config, monitor, store)
    }
}

impl<H: HostMetrics> App<H> {
    pub fn with_monitor(config: &Config, monitor: Monitor<H>, store: ThresholdStore) -> Self {
        let color_support = resolve_color_support(&config.general.color_support);
        App {
            running: true,
            monitor,
            report: None,
            alerts: AlertFeed::default(),
            theme: Theme::for_support(color_support),
            input_mode: InputMode::Normal,
            threshold_input: String::new(),
            selected_index: 0,
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            store,
            pending_copy: None,
            tick_rate: Duration::from_millis(config.general.refresh_rate_ms),
            last_refresh: None,
        }
    }

    /// Run one monitor cycle now, regardless of the tick schedule.
    pub fn refresh_data(&mut self) {
        self.report = Some(self.monitor.tick_and_notify(&mut self.alerts));
        self.last_refresh = Some(Instant::now());

        let len = self.selectable_len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// Timer tick. Ticks that queued up behind a slow cycle are coalesced.
    pub fn on_tick(&mut self) -> bool {
        let due = self
            .last_refresh
            .is_none_or(|last| last.elapsed() >= self.tick_rate / 2);
        if due {
            self.refresh_data();
        }
        due
    }

    pub fn help_visible(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn selected_process(&self) -> Option<&ProcessSample> {
        self.report
            .as_ref()?
            .processes
            .selectable()
            .nth(self.selected_index)
    }

    fn selectable_len(&self) -> usize {
        self.report
            .as_ref()
            .map_or(0, |r| r.processes.selectable().count())
    }

    pub fn visible_status(&self, now: Instant) -> Option<&StatusMessage> {
        self.status_message
            .as_ref()
            .filter(|m| now.saturating_duration_since(m.at) < STATUS_DISPLAY)
    }

    fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error,
            at: Instant::now(),
        });
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
            InputMode::EditThresholds => self.map_key_thresholds(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let kb = &self.keybinds;
        let code = key.code;

        match code {
            KeyCode::Up => Action::Navigate(Direction::Up),
            KeyCode::Down => Action::Navigate(Direction::Down),
            _ if code == kb.quit => Action::Quit,
            _ if code == kb.refresh => Action::Refresh,
            _ if code == kb.help => Action::ToggleHelp,
            _ if code == kb.copy_stats => Action::CopyStats,
            _ if code == kb.edit_thresholds => Action::EnterThresholdEdit,
            _ if code == kb.kill => self
                .selected_process()
                .map_or(Action::None, |p| Action::Kill(p.pid)),
            _ => Action::None,
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        if key.code == self.keybinds.help || key.code == KeyCode::Esc {
            Action::ToggleHelp
        } else {
            Action::None
        }
    }

    fn map_key_thresholds(&self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => Action::CancelThresholdEdit,
            KeyCode::Enter => Action::SubmitThresholds,
            KeyCode::Backspace => {
                let mut text = self.threshold_input.clone();
                text.pop();
                Action::UpdateThresholdInput(text)
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == ' ' => {
                let mut text = self.threshold_input.clone();
                text.push(c);
                Action::UpdateThresholdInput(text)
            }
            _ => Action::None,
        }
    }

    fn navigate(&mut self, direction: Direction) {
        let len = self.selectable_len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = match direction {
            Direction::Up => self.selected_index.saturating_sub(1),
            Direction::Down => (self.selected_index + 1).min(len - 1),
        };
    }

    fn copy_stats(&mut self) {
        let Some(snapshot) = self.report.as_ref().and_then(|r| r.snapshot()) else {
            self.set_status("No stats available yet", true);
            return;
        };
        self.pending_copy = Some(stats_summary(snapshot));
    }

    /// Hands queued stats text to the surface. True when there was any.
    fn flush_copy<S: Surface<H>>(&mut self, surface: &mut S) -> bool {
        let Some(text) = self.pending_copy.take() else {
            return false;
        };
        match surface.copy_to_clipboard(&text) {
            Ok(()) => {
                tracing::info!("stats copied to clipboard");
                self.set_status("Stats copied to clipboard", false);
            }
            Err(err) => {
                tracing::error!(%err, "failed to copy stats");
                self.set_status(format!("Failed to copy stats: {err}"), true);
            }
        }
        true
    }

    fn begin_threshold_edit(&mut self) {
        let t = self.monitor.thresholds();
        self.threshold_input = format!("{} {} {}", t.cpu_limit, t.mem_limit, t.swap_limit);
        self.input_mode = InputMode::EditThresholds;
    }

    /// Applies the typed limits from the next tick on and persists them.
    /// Invalid input keeps the prompt open.
    fn submit_thresholds(&mut self) {
        let [cpu, mem, swap] = match parse_threshold_input(&self.threshold_input) {
            Ok(limits) => limits,
            Err(reason) => {
                self.set_status(reason, true);
                return;
            }
        };

        let warn_factor = self.monitor.thresholds().warn_factor;
        let thresholds = ThresholdSet::new(cpu, mem, swap, warn_factor);
        self.monitor.set_thresholds(thresholds);
        self.store.save(&thresholds);
        tracing::info!(cpu, mem, swap, "thresholds changed");

        self.set_status(
            format!("Thresholds saved: CPU {cpu}% MEM {mem}% SWAP {swap}%"),
            false,
        );
        self.threshold_input.clear();
        self.input_mode = InputMode::Normal;
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }
}

impl<H: HostMetrics + ProcessSignaller> App<H> {
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Refresh => {
                tracing::info!("manual refresh");
                self.refresh_data();
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Navigate(direction) => self.navigate(direction),
            Action::Kill(pid) => self.kill(pid),
            Action::CopyStats => self.copy_stats(),
            Action::EnterThresholdEdit => self.begin_threshold_edit(),
            Action::UpdateThresholdInput(text) => self.threshold_input = text,
            Action::SubmitThresholds => self.submit_thresholds(),
            Action::CancelThresholdEdit => {
                self.threshold_input.clear();
                self.input_mode = InputMode::Normal;
            }
            Action::None => {}
        }
    }

    fn kill(&mut self, pid: u32) {
        let name = self
            .selected_process()
            .filter(|p| p.pid == pid)
            .map_or_else(|| format!("PID {pid}"), |p| p.raw_name.clone());

        let result = self.monitor.host_mut().terminate(pid);
        if result.is_sent() {
            tracing::info!(pid, name = %name, "sent SIGTERM");
        } else {
            tracing::error!(pid, name = %name, ?result, "kill failed");
        }
        self.set_status(result.message(&name), !result.is_sent());
        self.refresh_data();
    }

    /// Applies one event. True when the screen needs redrawing.
    pub fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return false;
                }
                let action = self.map_key(key);
                let changed = action != Action::None;
                self.dispatch(action);
                changed
            }
            Event::Tick => self.on_tick(),
            Event::Resize => true,
        }
    }

    /// Draws, then handles events until quit or until the event channel
    /// closes.
    pub async fn run<S: Surface<H>>(
        &mut self,
        events: &mut EventHandler,
        surface: &mut S,
    ) -> io::Result<()> {
        surface.render(self)?;

        while self.running {
            let Some(event) = events.next().await else {
                tracing::warn!("event channel closed");
                self.running = false;
                break;
            };
            let mut redraw = self.handle_event(event);
            redraw |= self.flush_copy(surface);
            if redraw {
                surface.render(self)?;
            }
        }

        Ok(())
    }
}

/// Three whole numbers in `[1, 100]`, separated by spaces: cpu, mem, swap.
fn parse_threshold_input(input: &str) -> Result<[i64; 3], String> {
    let fields: Vec<&str> = input.split_whitespace().collect();
    let [cpu, mem, swap] = fields.as_slice() else {
        return Err("Enter three limits: CPU MEM SWAP".to_string());
    };
    Ok([
        parse_limit("CPU", cpu)?,
        parse_limit("MEM", mem)?,
        parse_limit("SWAP", swap)?,
    ])
}

fn parse_limit(label: &str, raw: &str) -> Result<i64, String> {
    match raw.parse::<i64>() {
        Ok(value) if (1..=100).contains(&value) => Ok(value),
        _ => Err(format!("{label}: enter a whole number between 1 and 100")),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tokio::sync::mpsc;

    use super::*;
    use crate::alert::CooldownTracker;
    use crate::system::host::SystemUsage;
    use crate::system::kill::KillResult;
    use crate::system::platform::NoPlatformData;
    use crate::system::process::ProcessReading;

    #[derive(Default)]
    struct BusyHost {
        killed: Vec<u32>,
    }

    impl HostMetrics for BusyHost {
        fn system_usage(&mut self) -> Option<SystemUsage> {
            Some(SystemUsage {
                cpu_pct: 97.0,
                mem_pct: 40.0,
                swap_pct: 0.0,
                total_memory_bytes: 8 * 1024 * 1024 * 1024,
            })
        }

        fn process_table(&mut self) -> Option<Vec<ProcessReading>> {
            Some(vec![
                ProcessReading {
                    pid: 10,
                    name: "spinner".into(),
                    cpu_pct: Some(97.0),
                    mem_pct: Some(1.0),
                },
                ProcessReading {
                    pid: 11,
                    name: "hog".into(),
                    cpu_pct: Some(2.0),
                    mem_pct: Some(30.0),
                },
            ])
        }
    }

    impl ProcessSignaller for BusyHost {
        fn terminate(&mut self, pid: u32) -> KillResult {
            if pid == 10 || pid == 11 {
                self.killed.push(pid);
                KillResult::Sent(pid)
            } else {
                KillResult::NotFound(pid)
            }
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        frames: usize,
        copied: Vec<String>,
        fail_copy: bool,
    }

    impl<H: HostMetrics> Surface<H> for RecordingSurface {
        fn render(&mut self, _app: &App<H>) -> io::Result<()> {
            self.frames += 1;
            Ok(())
        }

        fn copy_to_clipboard(&mut self, text: &str) -> io::Result<()> {
            if self.fail_copy {
                return Err(io::Error::other("no clipboard"));
            }
            self.copied.push(text.to_string());
            Ok(())
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("monarx_app_{}_{name}", std::process::id()))
    }

    fn make_app_with_store(store: ThresholdStore) -> App<BusyHost> {
        let monitor = Monitor::new(
            BusyHost::default(),
            Box::new(NoPlatformData),
            ThresholdSet::default(),
            CooldownTracker::default(),
            5,
        );
        App::with_monitor(&Config::default(), monitor, store)
    }

    fn make_app() -> App<BusyHost> {
        make_app_with_store(ThresholdStore::at(temp_path("unused.json")))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    /// A handler that yields `queued` and then reports a closed channel.
    fn events_from(queued: Vec<Event>) -> EventHandler {
        let (tx, rx) = mpsc::unbounded_channel();
        for event in queued {
            tx.send(event).unwrap();
        }
        EventHandler::from_receiver(rx)
    }

    #[test]
    fn refresh_feeds_alerts_once_per_cooldown() {
        let mut app = make_app();
        app.refresh_data();
        assert_eq!(app.alerts.len(), 1);
        assert_eq!(app.alerts.latest().unwrap().title, "High CPU");

        app.refresh_data();
        assert_eq!(app.alerts.len(), 1);
        assert!(app.report.as_ref().unwrap().alerts.is_empty());
    }

    #[test]
    fn queued_ticks_are_coalesced() {
        let mut app = make_app();
        assert!(app.on_tick());
        assert!(!app.on_tick());
    }

    #[test]
    fn default_keys() {
        let app = make_app();
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(key(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(app.map_key(key(KeyCode::Char('c'))), Action::CopyStats);
        assert_eq!(
            app.map_key(key(KeyCode::Char('t'))),
            Action::EnterThresholdEdit
        );
        assert_eq!(
            app.map_key(key(KeyCode::Down)),
            Action::Navigate(Direction::Down)
        );
        assert_eq!(app.map_key(key(KeyCode::Char('x'))), Action::None);
        assert_eq!(
            app.map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn help_mode_swallows_other_keys() {
        let mut app = make_app();
        app.dispatch(Action::ToggleHelp);
        assert!(app.help_visible());
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.map_key(key(KeyCode::Esc)), Action::ToggleHelp);
    }

    #[test]
    fn alert_feed_is_bounded_and_expires() {
        let mut feed = AlertFeed::default();
        for i in 0..(ALERT_FEED_CAPACITY + 5) {
            feed.notify("High CPU", &format!("CPU at {i}%"));
        }
        assert_eq!(feed.len(), ALERT_FEED_CAPACITY);
        let now = Instant::now();
        assert!(feed.visible(now).is_some());
        assert!(feed.visible(now + ALERT_DISPLAY).is_none());
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = make_app();
        let mut release = key(KeyCode::Char('q'));
        release.kind = KeyEventKind::Release;
        assert!(!app.handle_event(Event::Key(release)));
        assert!(app.running);
    }

    #[tokio::test]
    async fn closed_event_channel_ends_the_run() {
        let mut app = make_app();
        let mut events = events_from(vec![Event::Tick]);
        let mut surface = RecordingSurface::default();

        app.run(&mut events, &mut surface).await.unwrap();

        assert!(!app.running);
        // Initial frame plus the tick.
        assert_eq!(surface.frames, 2);
        assert!(app.report.is_some());
    }

    #[tokio::test]
    async fn quit_key_ends_the_run_with_sender_alive() {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(Event::Key(key(KeyCode::Char('q')))).unwrap();
        let mut events = EventHandler::from_receiver(rx);
        let mut app = make_app();
        let mut surface = RecordingSurface::default();

        app.run(&mut events, &mut surface).await.unwrap();

        assert!(!app.running);
        drop(tx);
    }

    #[tokio::test]
    async fn copy_key_sends_stats_to_the_clipboard() {
        let mut app = make_app();
        app.refresh_data();
        let mut events = events_from(vec![Event::Key(key(KeyCode::Char('c')))]);
        let mut surface = RecordingSurface::default();

        app.run(&mut events, &mut surface).await.unwrap();

        assert_eq!(surface.copied.len(), 1);
        assert!(surface.copied[0].starts_with("CPU: 97.0%  RAM: 40.0%"));
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Stats copied to clipboard");
        assert!(!status.is_error);
    }

    #[tokio::test]
    async fn failed_copy_is_reported() {
        let mut app = make_app();
        app.refresh_data();
        let mut events = events_from(vec![Event::Key(key(KeyCode::Char('c')))]);
        let mut surface = RecordingSurface {
            fail_copy: true,
            ..Default::default()
        };

        app.run(&mut events, &mut surface).await.unwrap();

        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Failed to copy stats: no clipboard");
        assert!(status.is_error);
    }

    #[test]
    fn copy_before_first_sample_has_nothing_to_copy() {
        let mut app = make_app();
        app.dispatch(Action::CopyStats);
        assert!(app.pending_copy.is_none());
        assert_eq!(
            app.visible_status(Instant::now()).unwrap().text,
            "No stats available yet"
        );
    }

    #[test]
    fn threshold_prompt_edits_text() {
        let mut app = make_app();
        app.dispatch(Action::EnterThresholdEdit);
        assert_eq!(app.input_mode, InputMode::EditThresholds);
        assert_eq!(app.threshold_input, "85 80 20");

        assert_eq!(
            app.map_key(key(KeyCode::Backspace)),
            Action::UpdateThresholdInput("85 80 2".to_string())
        );
        assert_eq!(
            app.map_key(key(KeyCode::Char('5'))),
            Action::UpdateThresholdInput("85 80 205".to_string())
        );
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.map_key(key(KeyCode::Enter)), Action::SubmitThresholds);
        assert_eq!(app.map_key(key(KeyCode::Esc)), Action::CancelThresholdEdit);

        app.dispatch(Action::CancelThresholdEdit);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.threshold_input.is_empty());
    }

    #[test]
    fn submitted_thresholds_apply_and_persist() {
        let path = temp_path("submit.json");
        let _ = std::fs::remove_file(&path);
        let mut app = make_app_with_store(ThresholdStore::at(&path));

        app.dispatch(Action::EnterThresholdEdit);
        app.dispatch(Action::UpdateThresholdInput("99 70 10".to_string()));
        app.dispatch(Action::SubmitThresholds);

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.monitor.thresholds().cpu_limit, 99);
        assert_eq!(app.monitor.thresholds().warn_factor, 0.85);
        assert_eq!(
            app.status_message.as_ref().unwrap().text,
            "Thresholds saved: CPU 99% MEM 70% SWAP 10%"
        );

        let saved = ThresholdStore::at(&path).load(0.85);
        assert_eq!(
            (saved.cpu_limit, saved.mem_limit, saved.swap_limit),
            (99, 70, 10)
        );

        // 97% CPU is under the new limit, so the next tick stays quiet.
        app.refresh_data();
        let report = app.report.as_ref().unwrap();
        assert_eq!(report.thresholds.cpu_limit, 99);
        assert!(report.alerts.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn invalid_thresholds_keep_the_prompt_open() {
        let path = temp_path("rejected.json");
        let _ = std::fs::remove_file(&path);
        let mut app = make_app_with_store(ThresholdStore::at(&path));

        app.dispatch(Action::EnterThresholdEdit);
        app.dispatch(Action::UpdateThresholdInput("0 80 20".to_string()));
        app.dispatch(Action::SubmitThresholds);

        assert_eq!(app.input_mode, InputMode::EditThresholds);
        assert_eq!(app.monitor.thresholds().cpu_limit, 85);
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "CPU: enter a whole number between 1 and 100");
        assert!(status.is_error);
        assert!(!path.exists());
    }

    #[test]
    fn threshold_input_parsing() {
        assert_eq!(parse_threshold_input(" 90  75 30 "), Ok([90, 75, 30]));
        assert_eq!(parse_threshold_input("1 100 50"), Ok([1, 100, 50]));
        assert!(parse_threshold_input("90 75").is_err());
        assert!(parse_threshold_input("90 75 30 1").is_err());
        assert_eq!(
            parse_threshold_input("90 101 30"),
            Err("MEM: enter a whole number between 1 and 100".to_string())
        );
    }

    #[test]
    fn selection_walks_cpu_then_memory_list() {
        let mut app = make_app();
        assert_eq!(app.map_key(key(KeyCode::Char('k'))), Action::None);

        app.refresh_data();
        assert_eq!(app.selected_process().unwrap().pid, 10);
        assert_eq!(app.map_key(key(KeyCode::Char('k'))), Action::Kill(10));

        for _ in 0..10 {
            app.dispatch(Action::Navigate(Direction::Down));
        }
        // top_cpu = [spinner, hog], top_mem = [hog, spinner]
        assert_eq!(app.selected_index, 3);
        assert_eq!(app.selected_process().unwrap().pid, 10);

        app.dispatch(Action::Navigate(Direction::Up));
        assert_eq!(app.selected_process().unwrap().raw_name, "hog");

        for _ in 0..10 {
            app.dispatch(Action::Navigate(Direction::Up));
        }
        assert_eq!(app.selected_index, 0);
    }

    #[test]
    fn kill_signals_the_selected_process() {
        let mut app = make_app();
        app.refresh_data();
        app.dispatch(Action::Navigate(Direction::Down));
        let action = app.map_key(key(KeyCode::Char('k')));
        assert_eq!(action, Action::Kill(11));

        app.dispatch(action);

        assert_eq!(app.monitor.host_mut().killed, vec![11]);
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Sent SIGTERM to hog (PID: 11)");
        assert!(!status.is_error);
    }

    #[test]
    fn kill_of_vanished_process_is_reported() {
        let mut app = make_app();
        app.dispatch(Action::Kill(4242));
        assert!(app.monitor.host_mut().killed.is_empty());
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Process 4242 not found");
        assert!(status.is_error);
    }
}
