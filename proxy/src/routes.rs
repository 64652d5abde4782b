use crate::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use mfl_api::client::{ApiError, ExportType, export_url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, warn};

/// Export type used when the request names none.
pub const DEFAULT_EXPORT: &str = "liveScoring";

/// `type` value that reports the URLs the proxy would call, without calling them.
pub const DEBUG_EXPORT: &str = "__debug";

/// Longest excerpt of a non-JSON upstream body echoed back to the client.
pub const RAW_EXCERPT_CHARS: usize = 5000;

#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    #[serde(rename = "type")]
    pub export: Option<String>,
    pub w: Option<String>,
}

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("MFL_LEAGUE_ID is not configured")]
    MissingLeagueId,
    #[error(transparent)]
    InvalidUrl(#[from] ApiError),
    #[error("upstream request failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream returned a non-JSON body")]
    NonJson { status: u16, url: String, raw: String },
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            ProxyError::MissingLeagueId => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ProxyError::InvalidUrl(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": message }))).into_response()
            }
            ProxyError::Transport { url, .. } => {
                (StatusCode::BAD_GATEWAY, Json(json!({ "error": message, "url": url })))
                    .into_response()
            }
            ProxyError::NonJson { status, url, raw } => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": message, "status": status, "url": url, "raw": raw })),
            )
                .into_response(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugUrls {
    pub league: String,
    pub live_scoring: String,
    pub scoreboard: String,
    pub requested: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    pub league_id: String,
    pub season: String,
    pub urls: DebugUrls,
}

/// GET /api/mfl?type=<export>&w=<week>
pub async fn mfl_export(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response, ProxyError> {
    let settings = &state.settings;
    let Some(league_id) = settings.league_id.as_deref() else {
        warn!("export requested but MFL_LEAGUE_ID is not set");
        return Err(ProxyError::MissingLeagueId);
    };

    let export = params
        .export
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_EXPORT);
    let week = params.w.as_deref().map(str::trim).filter(|w| !w.is_empty());
    let url_for = |export: &str, week: Option<&str>| {
        export_url(&settings.api_base, &settings.season, league_id, export, week)
            .map(|u| u.to_string())
    };

    if export == DEBUG_EXPORT {
        let body = DebugResponse {
            league_id: league_id.to_string(),
            season: settings.season.clone(),
            urls: DebugUrls {
                league: url_for(ExportType::League.as_str(), None)?,
                live_scoring: url_for(ExportType::LiveScoring.as_str(), week)?,
                scoreboard: url_for(ExportType::Scoreboard.as_str(), week)?,
                requested: url_for(DEFAULT_EXPORT, week)?,
            },
        };
        return Ok(Json(body).into_response());
    }

    let url = url_for(export, week)?;
    debug!(%url, "forwarding export request");

    let upstream = state
        .client
        .get(&url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|source| ProxyError::Transport { url: url.clone(), source })?;

    let status = upstream.status().as_u16();
    let body = upstream
        .text()
        .await
        .map_err(|source| ProxyError::Transport { url: url.clone(), source })?;

    if serde_json::from_str::<serde::de::IgnoredAny>(&body).is_err() {
        warn!(%url, status, "upstream body is not JSON");
        return Err(ProxyError::NonJson {
            status,
            url,
            raw: body.chars().take(RAW_EXCERPT_CHARS).collect(),
        });
    }

    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "mfl-proxy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
