use crate::state::messages::{NetworkRequest, NetworkResponse};
use chrono::Datelike;
use log::{debug, error, info};
use mfl_api::brand::BrandingConfig;
use mfl_api::client::{ApiError, MflApi};
use mfl_api::normalize::{NormalizeContext, build_scoreboard};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: MflApi,
    branding: Arc<BrandingConfig>,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl NetworkWorker {
    pub fn new(
        client: MflApi,
        branding: Arc<BrandingConfig>,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            branding,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
            cancel,
        }
    }

    pub async fn run(mut self) {
        loop {
            let request = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                request = self.requests.recv() => match request {
                    Some(request) => request,
                    None => break,
                },
            };

            self.start_loading_animation().await;

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.is_loading.store(false, Ordering::Relaxed);
                    break;
                }
                result = self.handle(request.clone()) => result,
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            // Shutdown may have been requested while the fetch was in flight.
            if self.cancel.is_cancelled() {
                break;
            }

            let response = result.unwrap_or_else(|err| {
                let NetworkRequest::LoadWeek { week } = request;
                NetworkResponse::Error { week, message: err.to_string() }
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
        debug!("network worker stopped");
    }

    async fn handle(&self, request: NetworkRequest) -> Result<NetworkResponse, ApiError> {
        match request {
            NetworkRequest::LoadWeek { week } => self.handle_load_week(week).await,
        }
    }

    async fn handle_load_week(&self, week: u8) -> Result<NetworkResponse, ApiError> {
        debug!("loading week {week}");
        let snapshot = self.client.fetch_week(week).await?;

        let ctx = NormalizeContext {
            league: &snapshot.league,
            branding: &self.branding,
            year: chrono::Local::now().year(),
        };
        let scoreboard = build_scoreboard(&ctx, week, snapshot.source, &snapshot.matchups);
        info!(
            "week {week}: {} matchups from {}",
            scoreboard.matchups.len(),
            scoreboard.source.label()
        );
        Ok(NetworkResponse::ScoreboardLoaded { scoreboard })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = interval.tick() => {}
                }
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
