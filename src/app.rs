use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use chrono::Local;
use mfl_api::Scoreboard;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Scoreboard,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self {
            state: AppState::new(settings.week),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Results for a week the user has since navigated away from are dropped;
    /// a fresh request for the current week is already queued.
    pub fn on_scoreboard_loaded(&mut self, scoreboard: Scoreboard) {
        if scoreboard.week != self.state.scoreboard.week {
            return;
        }
        self.state.last_error = None;
        let updated_at = Local::now().format("%-I:%M:%S %p").to_string();
        self.state.scoreboard.replace(scoreboard, updated_at);
    }

    pub fn on_refresh_failed(&mut self, week: u8, message: String) {
        if week != self.state.scoreboard.week {
            return;
        }
        self.state.scoreboard.clear();
        self.state.last_error = Some(message);
    }

    pub fn current_week(&self) -> u8 {
        self.state.scoreboard.week
    }

    // -----------------------------------------------------------------------
    // Week and card navigation
    // -----------------------------------------------------------------------

    /// Returns the new week when it changed, so the caller can request it.
    pub fn next_week(&mut self) -> Option<u8> {
        self.state.scoreboard.next_week()
    }

    pub fn prev_week(&mut self) -> Option<u8> {
        self.state.scoreboard.prev_week()
    }

    pub fn select_next(&mut self) {
        self.state.scoreboard.select_next();
    }

    pub fn select_prev(&mut self) {
        self.state.scoreboard.select_prev();
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn request_quit(&mut self) {
        self.state.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfl_api::{Matchup, MatchupSource};
    use std::collections::HashMap;

    fn app(week: &str) -> App {
        let env: HashMap<&str, &str> = [("MFL_LEAGUE_ID", "12345"), ("MFL_WEEK", week)].into();
        let settings =
            AppSettings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        App::new(settings)
    }

    fn scoreboard(week: u8, n: usize) -> Scoreboard {
        Scoreboard {
            week,
            league_name: Some("Bizarro".into()),
            source: MatchupSource::Scoreboard,
            matchups: (0..n).map(|i| Matchup { id: i.to_string(), ..Default::default() }).collect(),
        }
    }

    #[test]
    fn loaded_scoreboard_replaces_list_and_clears_error() {
        let mut app = app("5");
        app.on_refresh_failed(5, "boom".into());
        app.on_scoreboard_loaded(scoreboard(5, 3));
        assert!(app.state.last_error.is_none());
        assert_eq!(app.state.scoreboard.matchups.len(), 3);
        assert!(app.state.scoreboard.last_updated.is_some());
    }

    #[test]
    fn failed_refresh_clears_matchups() {
        let mut app = app("5");
        app.on_scoreboard_loaded(scoreboard(5, 3));
        app.on_refresh_failed(5, "upstream down".into());
        assert!(app.state.scoreboard.matchups.is_empty());
        assert_eq!(app.state.last_error.as_deref(), Some("upstream down"));
    }

    #[test]
    fn results_for_other_weeks_are_ignored() {
        let mut app = app("5");
        assert_eq!(app.next_week(), Some(6));
        app.on_scoreboard_loaded(scoreboard(5, 3));
        assert!(app.state.scoreboard.matchups.is_empty());
        app.on_refresh_failed(5, "stale".into());
        assert!(app.state.last_error.is_none());
    }

    #[test]
    fn help_tab_round_trip() {
        let mut app = app("1");
        app.update_tab(MenuItem::Help);
        assert_eq!(app.state.active_tab, MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Scoreboard);
    }

    #[test]
    fn quit_sets_flag() {
        let mut app = app("1");
        app.request_quit();
        assert!(app.state.should_quit);
    }
}
