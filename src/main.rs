mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{error, info, warn};
use mfl_api::client::MflApi;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tui::{Terminal, backend::CrosstermBackend};

const INPUT_POLL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    // Configuration errors are reported before the terminal is taken over.
    let settings = AppSettings::load()?;
    let branding = Arc::new(settings.load_branding()?);
    let client = MflApi::new(settings.target.clone());
    let refresh_interval = settings.refresh_interval;

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Debug)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = Arc::new(Mutex::new(App::new(settings)));
    let cancel = CancellationToken::new();

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler =
        tokio::task::spawn_blocking({
            let ui_events = ui_event_tx.clone();
            let cancel = cancel.clone();
            move || input_handler_task(ui_events, cancel)
        });

    // Network thread
    let network_worker =
        NetworkWorker::new(client, branding, network_req_rx, network_resp_tx, cancel.clone());
    let network_task = tokio::spawn(network_worker.run());

    // Periodic refresh thread
    let periodic_updater =
        PeriodicRefresher::new(ui_event_tx.clone(), refresh_interval, cancel.clone());
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger the first load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(1), async {
        let _ = network_task.await;
        let _ = periodic_task.await;
        let _ = input_handler.await;
    })
    .await;

    cleanup_terminal();
    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("mfltui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "mfltui - live MyFantasyLeague scoreboard for the terminal

Usage:
  mfltui
  mfltui --help
  mfltui --version

Environment:
  MFL_LEAGUE_ID       League id (required unless MFL_PROXY_URL is set)
  MFL_SEASON          Season year (default: current season)
  MFL_API_BASE        Export API host (default https://api.myfantasyleague.com)
  MFL_PROXY_URL       Fetch through an mfl-proxy instance instead
  MFL_WEEK            Week to show on startup, 1-18 (default 1)
  MFL_REFRESH_SECS    Seconds between refreshes (default 30)
  MFL_BRANDING_JSON   Path to a franchise branding JSON file
  MFL_BRANDING        Built-in branding preset (bizarro)
  RUST_LOG            Log level for the log pane"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }

        if app.lock().await.state.should_quit {
            info!("quit requested");
            break;
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted | UiEvent::RefreshTick => {
            let week = app.lock().await.current_week();
            let _ = network_requests.send(NetworkRequest::LoadWeek { week }).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::ScoreboardLoaded { scoreboard } => {
            let mut guard = app.lock().await;
            guard.on_scoreboard_loaded(scoreboard);
        }
        NetworkResponse::Error { week, message } => {
            error!("Refresh for week {week} failed: {message}");
            let mut guard = app.lock().await;
            guard.on_refresh_failed(week, message);
        }
    }
    !loading.is_loading
}

/// Blocking input loop. Polls so it can notice cancellation between events.
fn input_handler_task(ui_events: mpsc::Sender<UiEvent>, cancel: CancellationToken) {
    while !cancel.is_cancelled() {
        match crossterm_event::poll(INPUT_POLL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("input poll failed: {e}");
                continue;
            }
        }

        let Ok(event) = crossterm_event::read() else {
            continue;
        };
        let ui_event = match event {
            Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
            Event::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.blocking_send(ui_event).is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
