use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use mfl_api::Scoreboard;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Fetch, normalize and tag one week. Manual and timed refreshes both send this.
    LoadWeek { week: u8 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ScoreboardLoaded { scoreboard: Scoreboard },
    Error { week: u8, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    RefreshTick,
}
