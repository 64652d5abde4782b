use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut load_week = None;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => guard.request_quit(),

        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Manual refresh of the selected week
        (MenuItem::Scoreboard, Char('r'), _) => load_week = Some(guard.current_week()),

        // Week navigation
        (MenuItem::Scoreboard, Char('l') | KeyCode::Right, _) => load_week = guard.next_week(),
        (MenuItem::Scoreboard, Char('h') | KeyCode::Left, _) => load_week = guard.prev_week(),

        // Card selection
        (MenuItem::Scoreboard, Char('j') | KeyCode::Down, _) => guard.select_next(),
        (MenuItem::Scoreboard, Char('k') | KeyCode::Up, _) => guard.select_prev(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some(week) = load_week {
        drop(guard);
        debug!("requesting week {week}");
        let _ = network_requests.send(NetworkRequest::LoadWeek { week }).await;
    }
}
