//! Session — one run of the webstream menu.
//!
//! Owns the menu stack, input router, reconciler, render scheduler, history
//! and the text-entry overlay.  The host and display are borrowed per call.
//! Everything happens on the caller's thread: `tick` at the render cadence,
//! `handle_midi_*` as controller messages arrive.

use tracing::{debug, info, warn};
use webstream_proto::config::{Config, EngineConfig};
use webstream_proto::history::HistoryStore;
use webstream_proto::protocol::{
    Host, KEY_SEARCH_PROVIDER, KEY_SEARCH_QUERY, KEY_STREAM_PROVIDER, KEY_STREAM_URL,
};
use webstream_proto::provider::{clean_label, Provider};
use webstream_proto::state::ReconciledState;

use crate::action::MenuCommand;
use crate::input::{self, InputRouter, Routed};
use crate::menu::{MenuItem, MenuStack, Screen};
use crate::nav::{self, NavOutcome};
use crate::reconcile::{Delta, Reconciler};
use crate::render::{Display, MenuView, RenderScheduler};
use crate::text_entry::{Outcome, TextEntry};

const STATUS_READY: &str = "Click: select";
const STATUS_NEW_SEARCH: &str = "New search";
const STATUS_SEARCH_CANCELLED: &str = "Search cancelled";
const STATUS_CANCELLED: &str = "Cancelled";

const LABEL_NEW_SEARCH: &str = "[New Search...]";
const LABEL_HISTORY: &str = "[Previous searches]";
const LABEL_NO_HISTORY: &str = "(No previous searches)";

const TITLE_PROVIDERS: &str = "Provider";
const TITLE_HISTORY: &str = "Previous";

pub struct Session<T: TextEntry> {
    engine: EngineConfig,
    stack: MenuStack,
    input: InputRouter,
    reconciler: Reconciler,
    scheduler: RenderScheduler,
    history: HistoryStore,
    text_entry: T,
    /// Provider the open search prompt will submit to.
    prompt_provider: Provider,
    status: String,
}

impl<T: TextEntry> Session<T> {
    pub fn new(config: &Config, text_entry: T) -> Self {
        let engine = config.engine.clone();
        let provider = engine.default_provider();
        let history = HistoryStore::new(
            config.paths.history_file.clone(),
            config.paths.legacy_history_files.clone(),
            engine.history_format(),
            provider,
        );
        Self {
            stack: MenuStack::new(),
            input: InputRouter::new(),
            reconciler: Reconciler::new(provider, config.timing.poll_every_ticks),
            scheduler: RenderScheduler::new(config.timing.spinner_every_ticks),
            history,
            text_entry,
            prompt_provider: provider,
            status: STATUS_READY.to_string(),
            engine,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn stack(&self) -> &MenuStack {
        &self.stack
    }

    pub fn state(&self) -> &ReconciledState {
        self.reconciler.state()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn input(&self) -> &InputRouter {
        &self.input
    }

    pub fn text_entry(&self) -> &T {
        &self.text_entry
    }

    pub fn text_entry_mut(&mut self) -> &mut T {
        &mut self.text_entry
    }

    pub fn is_text_entry_active(&self) -> bool {
        self.text_entry.is_active()
    }

    pub fn request_redraw(&mut self) {
        self.scheduler.mark_dirty();
    }

    /// Footer text as it would be drawn now.
    pub fn footer(&self) -> String {
        self.scheduler.footer(
            self.text_entry.is_active(),
            self.reconciler.state().activity(),
            &self.status,
        )
    }

    /// Root title: the configured title, tagged with the current provider
    /// when more than one provider is offered.
    pub fn root_title(&self) -> String {
        if self.engine.is_single_provider() {
            self.engine.title.clone()
        } else {
            format!(
                "{} {}",
                self.engine.title,
                self.reconciler.state().search_provider.tag()
            )
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Start a fresh session against `host`.
    pub fn init(&mut self, host: &mut dyn Host) {
        let provider = Provider::normalize_or(
            host.get(KEY_SEARCH_PROVIDER).as_deref(),
            self.engine.default_provider(),
        );
        self.reconciler.reset(provider);
        self.input.reset();
        self.scheduler.reset();
        self.stack.clear();
        self.prompt_provider = provider;
        self.status = STATUS_READY.to_string();
        self.history.load();
        info!(
            "session start: provider={} history={} dialect={:?}",
            provider.id(),
            self.history.len(),
            self.engine.dialect
        );

        host.set(KEY_SEARCH_QUERY, "");
        self.rebuild_root();
    }

    /// One render tick.
    pub fn tick(&mut self, host: &mut dyn Host, display: &mut dyn Display) {
        if self.text_entry.is_active() {
            self.text_entry.tick();
            display.present_text_entry(&self.text_entry.view());
            self.collect_text_outcome(host);
            return;
        }

        if self.reconciler.tick() {
            if let Some(delta) = self.reconciler.poll(&*host) {
                self.apply_delta(delta);
            }
        }

        self.scheduler
            .advance_spinner(self.reconciler.state().activity().is_some());

        if self.scheduler.take_dirty() {
            if self.stack.is_empty() {
                self.rebuild_root();
            }
            if let Some(screen) = self.stack.current() {
                let view = MenuView::new(screen, self.footer());
                display.present_menu(&view);
            }
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// A message from the controller surface.
    pub fn handle_midi_internal(&mut self, host: &mut dyn Host, data: &[u8]) {
        match self.input.route(data, self.text_entry.is_active()) {
            Routed::Ignored | Routed::Shift(_) => {}
            Routed::Armed(pending) => {
                let paused = self.reconciler.state().is_paused();
                self.set_status(input::prompt(pending.action, paused));
            }
            Routed::Confirmed(action) => {
                info!("transport {:?}", action);
                self.engine.dialect.send(host, action);
                self.set_status(action.progress_message());
            }
            Routed::Cancelled => self.set_status(STATUS_CANCELLED),
            Routed::TextEntry => {
                self.text_entry.handle_midi(data);
                self.collect_text_outcome(host);
            }
            Routed::Navigate { cc, value, shift } => {
                if self.stack.is_empty() {
                    self.rebuild_root();
                    return;
                }
                let outcome = nav::handle_menu_input(&mut self.stack, cc, value, shift);
                if outcome.needs_redraw() {
                    self.scheduler.mark_dirty();
                }
                match outcome {
                    NavOutcome::Activated(cmd) => self.dispatch(host, cmd),
                    NavOutcome::ExitRequested => {
                        debug!("back at root; returning to host menu");
                        host.return_to_menu();
                    }
                    _ => {}
                }
            }
        }
    }

    /// A message from the external (thru) port.
    pub fn handle_midi_external(&mut self, host: &mut dyn Host, data: &[u8]) {
        if self.input.route_external(self.text_entry.is_active()) == Routed::TextEntry {
            self.text_entry.handle_midi(data);
            self.collect_text_outcome(host);
        }
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    pub fn dispatch(&mut self, host: &mut dyn Host, cmd: MenuCommand) {
        debug!("dispatch {:?}", cmd);
        match cmd {
            MenuCommand::NewSearch => {
                self.clear_search_state(host);
                if self.engine.is_single_provider() {
                    self.open_search_prompt(self.engine.default_provider());
                } else {
                    self.open_provider_menu();
                }
            }
            MenuCommand::OpenHistory => self.open_history_menu(),
            MenuCommand::SelectResult(index) => self.play_result(host, index),
            MenuCommand::OpenProvider(provider) => {
                self.stack.pop_to_root();
                self.open_search_prompt(provider);
            }
            MenuCommand::RepeatSearch(index) => {
                let Some(entry) = self.history.get(index).cloned() else {
                    return;
                };
                self.stack.pop_to_root();
                self.submit_search(host, entry.provider, &entry.query);
            }
            MenuCommand::Nothing => {}
        }
    }

    /// Ask the host to search `provider` for `query`.  Blank queries are
    /// dropped without touching the host.
    pub fn submit_search(&mut self, host: &mut dyn Host, provider: Provider, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.history.add(provider, query);
        if let Err(e) = self.history.save() {
            warn!("search history not saved: {}", e);
        }

        self.reconciler.begin_search(provider);
        if let Some(root) = self.stack.root_mut() {
            root.select(0);
        }
        self.status = format!("Searching {}...", provider.tag());
        self.rebuild_root();

        info!("search {} {:?}", provider.id(), query);
        host.set(KEY_SEARCH_PROVIDER, provider.id());
        host.set(KEY_SEARCH_QUERY, query);
    }

    fn clear_search_state(&mut self, host: &mut dyn Host) {
        self.reconciler.clear_search();
        if let Some(root) = self.stack.root_mut() {
            root.select(0);
        }
        host.set(KEY_SEARCH_QUERY, "");
        self.status = STATUS_NEW_SEARCH.to_string();
        self.rebuild_root();
    }

    fn play_result(&mut self, host: &mut dyn Host, index: usize) {
        let Some(row) = self.reconciler.state().results.get(index) else {
            return;
        };
        if !row.is_playable() {
            debug!("result {} has no url", index);
            return;
        }
        let (provider, url) = (row.provider, row.url.clone());
        info!("play {} {}", provider.id(), url);
        host.set(KEY_STREAM_PROVIDER, provider.id());
        host.set(KEY_STREAM_URL, &url);
        self.set_status(&format!("Loading {} stream...", provider.tag()));
    }

    fn open_provider_menu(&mut self) {
        let items = self
            .engine
            .providers()
            .into_iter()
            .map(|p| MenuItem::new(p.label(), MenuCommand::OpenProvider(p)))
            .collect();
        self.stack.push(Screen::new(TITLE_PROVIDERS, items));
        self.scheduler.mark_dirty();
    }

    fn open_history_menu(&mut self) {
        self.history.load();
        let mut items: Vec<MenuItem> = self
            .history
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                MenuItem::new(entry.label(self.engine.label_max), MenuCommand::RepeatSearch(i))
            })
            .collect();
        if items.is_empty() {
            items.push(MenuItem::new(LABEL_NO_HISTORY, MenuCommand::Nothing));
        }
        self.stack.push(Screen::new(TITLE_HISTORY, items));
        self.scheduler.mark_dirty();
    }

    fn open_search_prompt(&mut self, provider: Provider) {
        self.prompt_provider = provider;
        self.text_entry.open(&format!("Search {}", provider.tag()));
        self.scheduler.mark_dirty();
    }

    fn collect_text_outcome(&mut self, host: &mut dyn Host) {
        let Some(outcome) = self.text_entry.take_outcome() else {
            return;
        };
        match outcome {
            Outcome::Confirmed(text) if !text.trim().is_empty() => {
                self.submit_search(host, self.prompt_provider, &text);
            }
            _ => self.status = STATUS_SEARCH_CANCELLED.to_string(),
        }
        self.scheduler.mark_dirty();
    }

    // ── Host state ────────────────────────────────────────────────────────────

    fn apply_delta(&mut self, delta: Delta) {
        let state = self.reconciler.state();
        if delta.search {
            if let Some(msg) = state.search_status.message(state.search_provider, state.search_count)
            {
                self.status = msg;
            }
            self.rebuild_root();
        }
        if delta.stream {
            let msg = self.reconciler.state().stream_status.message();
            self.set_status(msg);
        }
    }

    /// Rebuild the root screen's title and items from the current snapshot.
    fn rebuild_root(&mut self) {
        let label_max = self.engine.label_max;
        let mut items = vec![
            MenuItem::new(LABEL_NEW_SEARCH, MenuCommand::NewSearch),
            MenuItem::new(LABEL_HISTORY, MenuCommand::OpenHistory),
        ];
        items.extend(
            self.reconciler
                .state()
                .results
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let text = if row.title.is_empty() {
                        format!("Result {}", i + 1)
                    } else {
                        row.title.clone()
                    };
                    MenuItem::new(clean_label(&text, label_max), MenuCommand::SelectResult(i))
                }),
        );
        let title = self.root_title();
        self.stack.replace_root(title, items);
        self.scheduler.mark_dirty();
    }

    fn set_status(&mut self, msg: &str) {
        self.status = msg.to_string();
        self.scheduler.mark_dirty();
    }
}
