//! Application state management for the Demoras CLI
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, and state transitions between the dashboard screens.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use crossterm::event::{KeyCode, KeyEvent};

use crate::cache::{CacheManager, DashboardStore};
use crate::cli::{StartupConfig, View};
use crate::data::{sample, DashboardClient, DashboardData, GateMetrics, ManifestClient, RouteMetric};
use crate::metrics::routes::{
    filter_routes, unique_airlines, unique_cities, unique_countries, unique_origins, RouteFilter,
};
use crate::refresh::RefreshMessage;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// Headline KPIs, rankings and insights
    Overview,
    /// Filterable routes table
    Routes,
    /// Gate utilization view
    Gates,
    /// Data could not be loaded and no cached snapshot was available
    LoadFailed(String),
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// The dashboard snapshot currently rendered
    pub data: Option<Arc<DashboardData>>,
    /// Active filter for the routes screen
    pub filter: RouteFilter,
    /// Selected row in the routes table
    pub routes_selected: usize,
    /// Selected row in the gates view
    pub gates_selected: usize,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating a refresh has been requested (via the `r` key)
    pub refresh_requested: bool,
    /// Timestamp of last successful data load
    pub last_refresh: Option<DateTime<Local>>,
    /// Screen to open once the initial load completes (from --view)
    pending_view: Option<View>,
    /// Whether the next load must bypass the caches (from --refresh)
    force_refresh: bool,
    /// Whether the app runs on the bundled sample dataset (from --demo)
    demo: bool,
    /// Snapshot store; absent in demo mode
    store: Option<Arc<DashboardStore>>,
}

impl App {
    /// Creates a new App instance with the given startup configuration.
    ///
    /// This applies CLI arguments like --view, --manifest-url, --refresh
    /// and --demo to the initial state.
    pub fn with_startup_config(config: StartupConfig) -> Self {
        let store = if config.demo {
            None
        } else {
            let manifest = match &config.manifest_url {
                Some(url) => ManifestClient::with_url(url.clone()),
                None => ManifestClient::new(),
            };
            Some(Arc::new(DashboardStore::new(
                DashboardClient::new(manifest),
                CacheManager::new(),
            )))
        };

        Self {
            state: AppState::Loading,
            data: None,
            filter: RouteFilter::default(),
            routes_selected: 0,
            gates_selected: 0,
            should_quit: false,
            show_help: false,
            refresh_requested: false,
            last_refresh: None,
            pending_view: config.initial_view,
            force_refresh: config.force_refresh,
            demo: config.demo,
            store,
        }
    }

    /// The snapshot store, for wiring up the background refresher
    pub fn store(&self) -> Option<Arc<DashboardStore>> {
        self.store.clone()
    }

    /// Loads the dashboard snapshot and transitions out of Loading
    ///
    /// In demo mode the bundled sample loads synchronously. Otherwise the
    /// store serves the snapshot read-through (memory, disk, then feed);
    /// a failure with no cached fallback lands in `LoadFailed`.
    pub async fn load_all_data(&mut self) {
        if self.demo {
            self.install_snapshot(Arc::new(sample::sample_dashboard()));
            return;
        }

        let Some(store) = self.store.clone() else {
            self.state = AppState::LoadFailed("no data source configured".to_string());
            return;
        };

        let result = if self.force_refresh {
            self.force_refresh = false;
            store.refresh().await
        } else {
            store.get().await
        };

        match result {
            Ok(data) => self.install_snapshot(data),
            Err(error) => {
                self.state = AppState::LoadFailed(error.to_string());
            }
        }
    }

    /// Installs a loaded snapshot and opens the requested screen
    fn install_snapshot(&mut self, data: Arc<DashboardData>) {
        self.data = Some(data);
        self.last_refresh = Some(Local::now());
        self.clamp_selections();
        self.state = match self.pending_view.take() {
            Some(View::Routes) => AppState::Routes,
            Some(View::Gates) => AppState::Gates,
            _ => AppState::Overview,
        };
    }

    /// Prepares a manual reload, returning to the current screen afterwards
    pub fn begin_reload(&mut self) {
        self.pending_view = match self.state {
            AppState::Routes => Some(View::Routes),
            AppState::Gates => Some(View::Gates),
            _ => None,
        };
        self.state = AppState::Loading;
    }

    /// Applies a message from the background refresher
    ///
    /// A new snapshot replaces the rendered one without changing the
    /// current screen; errors are ignored while cached data is on screen.
    pub fn apply_refresh(&mut self, message: RefreshMessage) {
        match message {
            RefreshMessage::DashboardUpdated(data) => {
                self.data = Some(data);
                self.last_refresh = Some(Local::now());
                self.clamp_selections();
            }
            RefreshMessage::RefreshError(reason) => {
                // Only surface the error if there is nothing to show
                if self.data.is_none() {
                    self.state = AppState::LoadFailed(reason);
                }
            }
            RefreshMessage::RefreshStarted | RefreshMessage::RefreshCompleted => {}
        }
    }

    /// Whether the rendered snapshot has outlived its manifest window
    pub fn data_is_stale(&self) -> bool {
        self.data
            .as_ref()
            .map(|data| data.is_expired(Utc::now()))
            .unwrap_or(false)
    }

    /// Routes matching the active filter, for the routes screen
    pub fn visible_routes(&self) -> Vec<&RouteMetric> {
        match self.data.as_ref() {
            Some(data) => filter_routes(&data.routes, &self.filter),
            None => Vec::new(),
        }
    }

    /// Gates of the current snapshot
    pub fn gates(&self) -> &[GateMetrics] {
        self.data.as_ref().map(|data| data.gates.as_slice()).unwrap_or(&[])
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q`: Quit the application (any screen)
    /// - `Esc`: Back to overview, or quit from the overview
    /// - `Tab`: Cycle overview -> routes -> gates -> overview
    /// - `1`/`2`/`3`: Jump to overview/routes/gates
    /// - `j`/`k` or arrows: Move selection in tables
    /// - `o`/`c`/`i`/`a`: Cycle origin/country/city/airline filter (routes)
    /// - `x`: Clear all filters (routes)
    /// - `r`: Refresh data (also retries from the error screen)
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        if key_event.code == KeyCode::Char('?') {
            self.show_help = true;
            return;
        }

        match &self.state {
            AppState::Loading => {
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::LoadFailed(_) => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                _ => {}
            },
            AppState::Overview => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Tab | KeyCode::Char('2') => {
                    self.state = AppState::Routes;
                }
                KeyCode::Char('3') => {
                    self.state = AppState::Gates;
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                _ => {}
            },
            AppState::Routes => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Char('1') => {
                    self.state = AppState::Overview;
                }
                KeyCode::Tab | KeyCode::Char('3') => {
                    self.state = AppState::Gates;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.routes_selected = self.routes_selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let count = self.visible_routes().len();
                    if self.routes_selected + 1 < count {
                        self.routes_selected += 1;
                    }
                }
                KeyCode::Char('o') => self.cycle_origin(),
                KeyCode::Char('c') => self.cycle_country(),
                KeyCode::Char('i') => self.cycle_city(),
                KeyCode::Char('a') => self.cycle_airline(),
                KeyCode::Char('x') => {
                    self.filter = RouteFilter::default();
                    self.routes_selected = 0;
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                _ => {}
            },
            AppState::Gates => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Char('1') => {
                    self.state = AppState::Overview;
                }
                KeyCode::Tab => {
                    self.state = AppState::Overview;
                }
                KeyCode::Char('2') => {
                    self.state = AppState::Routes;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.gates_selected = self.gates_selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    let count = self.gates().len();
                    if self.gates_selected + 1 < count {
                        self.gates_selected += 1;
                    }
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                _ => {}
            },
        }
    }

    /// Advances the origin filter to the next option, wrapping back to All
    ///
    /// Downstream filters reset because their option lists depend on the
    /// selected origin.
    fn cycle_origin(&mut self) {
        let Some(data) = self.data.as_ref() else { return };
        let options: Vec<String> = unique_origins(&data.routes)
            .into_iter()
            .map(|origin| origin.code)
            .collect();
        self.filter.origin = cycle_option(&options, &self.filter.origin);
        self.filter.country = None;
        self.filter.city = None;
        self.filter.airline = None;
        self.routes_selected = 0;
    }

    /// Advances the destination-country filter, resetting city and airline
    fn cycle_country(&mut self) {
        let Some(data) = self.data.as_ref() else { return };
        let options = unique_countries(&data.routes, self.filter.origin.as_deref());
        self.filter.country = cycle_option(&options, &self.filter.country);
        self.filter.city = None;
        self.filter.airline = None;
        self.routes_selected = 0;
    }

    /// Advances the destination-city filter, resetting the airline
    fn cycle_city(&mut self) {
        let Some(data) = self.data.as_ref() else { return };
        let options = unique_cities(
            &data.routes,
            self.filter.origin.as_deref(),
            self.filter.country.as_deref(),
        );
        self.filter.city = cycle_option(&options, &self.filter.city);
        self.filter.airline = None;
        self.routes_selected = 0;
    }

    /// Advances the airline filter
    fn cycle_airline(&mut self) {
        let Some(data) = self.data.as_ref() else { return };
        let options: Vec<String> = unique_airlines(
            &data.routes,
            self.filter.origin.as_deref(),
            self.filter.country.as_deref(),
            self.filter.city.as_deref(),
        )
        .into_iter()
        .map(|airline| airline.code)
        .collect();
        self.filter.airline = cycle_option(&options, &self.filter.airline);
        self.routes_selected = 0;
    }

    /// Keeps table selections inside the current data bounds
    fn clamp_selections(&mut self) {
        let route_count = self.visible_routes().len();
        if self.routes_selected >= route_count {
            self.routes_selected = route_count.saturating_sub(1);
        }
        let gate_count = self.gates().len();
        if self.gates_selected >= gate_count {
            self.gates_selected = gate_count.saturating_sub(1);
        }
    }
}

/// Steps through `None -> options[0] -> ... -> options[last] -> None`
fn cycle_option(options: &[String], current: &Option<String>) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    match current {
        None => Some(options[0].clone()),
        Some(value) => {
            let position = options.iter().position(|option| option == value);
            match position {
                Some(index) if index + 1 < options.len() => Some(options[index + 1].clone()),
                // Past the last option (or a value no longer offered): back to All
                _ => None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn demo_config() -> StartupConfig {
        StartupConfig {
            demo: true,
            ..Default::default()
        }
    }

    async fn loaded_app() -> App {
        let mut app = App::with_startup_config(demo_config());
        app.load_all_data().await;
        app
    }

    #[test]
    fn test_new_app_starts_loading() {
        let app = App::with_startup_config(demo_config());
        assert_eq!(app.state, AppState::Loading);
        assert!(app.data.is_none());
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_demo_load_opens_overview() {
        let app = loaded_app().await;
        assert_eq!(app.state, AppState::Overview);
        assert!(app.data.is_some());
        assert!(app.last_refresh.is_some());
    }

    #[tokio::test]
    async fn test_pending_view_opens_requested_screen() {
        let mut app = App::with_startup_config(StartupConfig {
            demo: true,
            initial_view: Some(View::Gates),
            ..Default::default()
        });
        app.load_all_data().await;
        assert_eq!(app.state, AppState::Gates);
    }

    #[tokio::test]
    async fn test_tab_cycles_screens() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Routes);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Gates);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Overview);
    }

    #[tokio::test]
    async fn test_escape_returns_to_overview_then_quits() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Routes);
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Overview);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_cycle_origin_sets_first_option_and_resets_downstream() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.filter.country.is_some());

        app.handle_key(key(KeyCode::Char('o')));
        assert_eq!(app.filter.origin.as_deref(), Some("AEP"));
        assert!(app.filter.country.is_none(), "downstream filters reset");
    }

    #[tokio::test]
    async fn test_cycle_wraps_back_to_all() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        // Sample data has 4 origins; 5 presses wrap back to All
        for _ in 0..5 {
            app.handle_key(key(KeyCode::Char('o')));
        }
        assert!(app.filter.origin.is_none());
    }

    #[tokio::test]
    async fn test_filters_narrow_visible_routes() {
        let mut app = loaded_app().await;
        let all = app.visible_routes().len();
        app.filter.origin = Some("EZE".to_string());
        let filtered = app.visible_routes().len();
        assert!(filtered > 0);
        assert!(filtered < all);
    }

    #[tokio::test]
    async fn test_clear_filters() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('o')));
        app.handle_key(key(KeyCode::Char('x')));
        assert!(!app.filter.is_active());
    }

    #[tokio::test]
    async fn test_selection_stays_in_bounds() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        let count = app.visible_routes().len();
        for _ in 0..count + 10 {
            app.handle_key(key(KeyCode::Char('j')));
        }
        assert_eq!(app.routes_selected, count - 1);
        app.handle_key(key(KeyCode::Char('k')));
        assert_eq!(app.routes_selected, count - 2);
    }

    #[tokio::test]
    async fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Char('?')));
        assert!(app.show_help);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Overview, "keys ignored under help");
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[tokio::test]
    async fn test_refresh_key_sets_flag() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[tokio::test]
    async fn test_begin_reload_returns_to_current_screen() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Routes);

        app.begin_reload();
        assert_eq!(app.state, AppState::Loading);
        app.load_all_data().await;
        assert_eq!(app.state, AppState::Routes);
    }

    #[tokio::test]
    async fn test_background_update_keeps_current_screen() {
        let mut app = loaded_app().await;
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state, AppState::Routes);

        let fresh = Arc::new(sample::sample_dashboard());
        app.apply_refresh(RefreshMessage::DashboardUpdated(Arc::clone(&fresh)));
        assert_eq!(app.state, AppState::Routes);
        assert!(Arc::ptr_eq(app.data.as_ref().unwrap(), &fresh));
    }

    #[tokio::test]
    async fn test_refresh_error_ignored_while_data_on_screen() {
        let mut app = loaded_app().await;
        app.apply_refresh(RefreshMessage::RefreshError("feed down".to_string()));
        assert_eq!(app.state, AppState::Overview);
    }

    #[test]
    fn test_refresh_error_without_data_fails_load() {
        let mut app = App::with_startup_config(demo_config());
        app.apply_refresh(RefreshMessage::RefreshError("feed down".to_string()));
        assert!(matches!(app.state, AppState::LoadFailed(_)));
    }

    #[test]
    fn test_cycle_option_steps_through_and_wraps() {
        let options = vec!["A".to_string(), "B".to_string()];
        let step1 = cycle_option(&options, &None);
        assert_eq!(step1.as_deref(), Some("A"));
        let step2 = cycle_option(&options, &step1);
        assert_eq!(step2.as_deref(), Some("B"));
        let step3 = cycle_option(&options, &step2);
        assert!(step3.is_none());
    }

    #[test]
    fn test_cycle_option_empty_options() {
        assert!(cycle_option(&[], &Some("A".to_string())).is_none());
    }
}
