use crate::app::MenuItem;
use mfl_api::{Matchup, MatchupSource, Scoreboard};

pub const MIN_WEEK: u8 = 1;
pub const MAX_WEEK: u8 = 18;

// ---------------------------------------------------------------------------
// Scoreboard state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScoreboardState {
    /// Week the user asked for. Drives every refresh request.
    pub week: u8,
    /// Week the shown matchups belong to. Can lag `week` while a request is in flight.
    pub shown_week: Option<u8>,
    pub league_name: Option<String>,
    pub source: Option<MatchupSource>,
    pub matchups: Vec<Matchup>,
    /// Local wall-clock time of the last successful refresh.
    pub last_updated: Option<String>,
    pub selected: usize,
    /// False until the first refresh cycle finishes, either way.
    pub loaded_once: bool,
}

impl ScoreboardState {
    pub fn new(week: u8) -> Self {
        Self {
            week: week.clamp(MIN_WEEK, MAX_WEEK),
            ..Default::default()
        }
    }

    /// Swap in a freshly built scoreboard. The list is always replaced
    /// wholesale; the last completed cycle wins.
    pub fn replace(&mut self, scoreboard: Scoreboard, updated_at: String) {
        self.shown_week = Some(scoreboard.week);
        self.league_name = scoreboard.league_name.or(self.league_name.take());
        self.source = Some(scoreboard.source);
        self.matchups = scoreboard.matchups;
        self.last_updated = Some(updated_at);
        self.loaded_once = true;
        self.clamp_selection();
    }

    /// A failed cycle shows nothing rather than stale cards.
    pub fn clear(&mut self) {
        self.matchups.clear();
        self.source = None;
        self.shown_week = None;
        self.selected = 0;
        self.loaded_once = true;
    }

    pub fn next_week(&mut self) -> Option<u8> {
        if self.week >= MAX_WEEK {
            return None;
        }
        self.week += 1;
        self.selected = 0;
        Some(self.week)
    }

    pub fn prev_week(&mut self) -> Option<u8> {
        if self.week <= MIN_WEEK {
            return None;
        }
        self.week -= 1;
        self.selected = 0;
        Some(self.week)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.matchups.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.matchups.len().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Root state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub scoreboard: ScoreboardState,
    pub last_error: Option<String>,
    pub show_logs: bool,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(week: u8) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            scoreboard: ScoreboardState::new(week),
            last_error: None,
            show_logs: false,
            should_quit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfl_api::MatchupSide;

    fn scoreboard(week: u8, n: usize) -> Scoreboard {
        Scoreboard {
            week,
            league_name: Some("Bizarro".into()),
            source: MatchupSource::LiveScoring,
            matchups: (0..n)
                .map(|i| Matchup {
                    id: i.to_string(),
                    a: MatchupSide { id: "0001".into(), ..Default::default() },
                    b: MatchupSide { id: "0002".into(), ..Default::default() },
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn week_is_clamped_on_creation() {
        assert_eq!(ScoreboardState::new(0).week, MIN_WEEK);
        assert_eq!(ScoreboardState::new(40).week, MAX_WEEK);
    }

    #[test]
    fn week_navigation_stops_at_bounds() {
        let mut state = ScoreboardState::new(MAX_WEEK);
        assert_eq!(state.next_week(), None);
        assert_eq!(state.prev_week(), Some(MAX_WEEK - 1));

        let mut state = ScoreboardState::new(MIN_WEEK);
        assert_eq!(state.prev_week(), None);
        assert_eq!(state.next_week(), Some(2));
    }

    #[test]
    fn replace_swaps_everything_and_clamps_selection() {
        let mut state = ScoreboardState::new(3);
        state.replace(scoreboard(3, 5), "20:15".into());
        state.selected = 4;
        state.replace(scoreboard(3, 2), "20:16".into());
        assert_eq!(state.matchups.len(), 2);
        assert_eq!(state.selected, 1);
        assert_eq!(state.shown_week, Some(3));
        assert_eq!(state.last_updated.as_deref(), Some("20:16"));
        assert!(state.loaded_once);
    }

    #[test]
    fn clear_drops_matchups_but_keeps_last_updated() {
        let mut state = ScoreboardState::new(3);
        state.replace(scoreboard(3, 4), "20:15".into());
        state.clear();
        assert!(state.matchups.is_empty());
        assert!(state.source.is_none());
        assert_eq!(state.last_updated.as_deref(), Some("20:15"));
    }

    #[test]
    fn selection_moves_within_list() {
        let mut state = ScoreboardState::new(1);
        state.replace(scoreboard(1, 2), "now".into());
        state.select_prev();
        assert_eq!(state.selected, 0);
        state.select_next();
        state.select_next();
        assert_eq!(state.selected, 1);
        assert_eq!(state.matchups[state.selected].id, "1");
    }
}
