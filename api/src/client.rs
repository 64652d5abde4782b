use crate::mfl::{LeagueResponse, LiveScoringResponse, RawMatchup, ScoreboardResponse, error_message};
use crate::{Franchise, League, MatchupSource};
use chrono::{DateTime, Datelike, Utc};
use reqwest::{Client, Url};
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const MFL_API_BASE: &str = "https://api.myfantasyleague.com";

/// Proxy route the browser-facing service exposes.
pub const PROXY_EXPORT_PATH: &str = "/api/mfl";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {1}: {0}")]
    Api(#[source] reqwest::Error, String),
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("MFL error for {1}: {0}")]
    Upstream(String, String),
    #[error("Invalid URL {0}: {1}")]
    InvalidUrl(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportType {
    League,
    LiveScoring,
    Scoreboard,
}

impl ExportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportType::League => "league",
            ExportType::LiveScoring => "liveScoring",
            ExportType::Scoreboard => "scoreboard",
        }
    }
}

/// Where export requests are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// Straight to the MFL export API.
    Direct {
        base: String,
        season: String,
        league_id: String,
    },
    /// Through the `mfl-proxy` service, which fills in league and season.
    Proxy { base: String },
}

impl ExportTarget {
    pub fn url(&self, export: &str, week: Option<&str>) -> ApiResult<Url> {
        match self {
            ExportTarget::Direct { base, season, league_id } => {
                export_url(base, season, league_id, export, week)
            }
            ExportTarget::Proxy { base } => {
                let raw = format!("{}{PROXY_EXPORT_PATH}", base.trim_end_matches('/'));
                let mut url =
                    Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(raw.clone(), e.to_string()))?;
                {
                    let mut query = url.query_pairs_mut();
                    query.append_pair("type", export);
                    if let Some(w) = week {
                        query.append_pair("w", w);
                    }
                }
                Ok(url)
            }
        }
    }
}

/// `{base}/{season}/export?TYPE={export}&L={league_id}&JSON=1[&W={week}]`
pub fn export_url(
    base: &str,
    season: &str,
    league_id: &str,
    export: &str,
    week: Option<&str>,
) -> ApiResult<Url> {
    let raw = format!("{}/{}/export", base.trim_end_matches('/'), season.trim());
    let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(raw.clone(), e.to_string()))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("TYPE", export);
        query.append_pair("L", league_id);
        query.append_pair("JSON", "1");
        if let Some(w) = week {
            query.append_pair("W", w);
        }
    }
    Ok(url)
}

/// Raw data for one week, before normalization.
#[derive(Debug, Clone, Default)]
pub struct WeekSnapshot {
    pub league: League,
    pub matchups: Vec<RawMatchup>,
    pub source: MatchupSource,
}

/// MyFantasyLeague export API client.
#[derive(Debug, Clone)]
pub struct MflApi {
    client: Client,
    timeout: Duration,
    target: ExportTarget,
}

impl MflApi {
    pub fn new(target: ExportTarget) -> Self {
        Self {
            client: Client::builder()
                .user_agent("mfltui/0.1 (terminal fantasy scoreboard)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            target,
        }
    }

    pub fn target(&self) -> &ExportTarget {
        &self.target
    }

    /// League metadata: name, base URL and franchise roster.
    pub async fn fetch_league(&self) -> ApiResult<League> {
        let url = self.target.url(ExportType::League.as_str(), None)?;
        let raw: LeagueResponse = self.get(url.as_str()).await?;
        if let Some(err) = raw.error {
            return Err(ApiError::Upstream(error_message(&err), url.to_string()));
        }
        Ok(map_league(raw))
    }

    pub async fn fetch_live_scoring(&self, week: Option<u8>) -> ApiResult<Vec<RawMatchup>> {
        let week = week.map(|w| w.to_string());
        let url = self.target.url(ExportType::LiveScoring.as_str(), week.as_deref())?;
        let raw: LiveScoringResponse = self.get(url.as_str()).await?;
        if let Some(err) = raw.error {
            return Err(ApiError::Upstream(error_message(&err), url.to_string()));
        }
        Ok(raw.live_scoring.map(|l| l.matchup).unwrap_or_default())
    }

    pub async fn fetch_scoreboard(&self, week: Option<u8>) -> ApiResult<Vec<RawMatchup>> {
        let week = week.map(|w| w.to_string());
        let url = self.target.url(ExportType::Scoreboard.as_str(), week.as_deref())?;
        let raw: ScoreboardResponse = self.get(url.as_str()).await?;
        if let Some(err) = raw.error.clone() {
            return Err(ApiError::Upstream(error_message(&err), url.to_string()));
        }
        Ok(raw.into_matchups())
    }

    /// Fetch everything needed to render a week.
    ///
    /// Fallback chain:
    /// 1) liveScoring export
    /// 2) scoreboard export, only when live scoring has no matchups
    pub async fn fetch_week(&self, week: u8) -> ApiResult<WeekSnapshot> {
        let league = self.fetch_league().await?;

        let live = self.fetch_live_scoring(Some(week)).await?;
        if !live.is_empty() {
            return Ok(WeekSnapshot { league, matchups: live, source: MatchupSource::LiveScoring });
        }

        let matchups = self.fetch_scoreboard(Some(week)).await?;
        Ok(WeekSnapshot { league, matchups, source: MatchupSource::Scoreboard })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Mapping: MFL wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_league(raw: LeagueResponse) -> League {
    let Some(body) = raw.league else {
        return League::default();
    };

    let franchises = body
        .franchises
        .map(|list| list.franchise)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|f| {
            let id = f.id?;
            Some(Franchise {
                name: f.name.unwrap_or_else(|| id.clone()),
                icon: f.icon.or(f.logo).filter(|s| !s.trim().is_empty()),
                id,
            })
        })
        .collect();

    League {
        id: body.id,
        name: body.name,
        base_url: body.base_url,
        franchises,
    }
}

/// MFL seasons run September through the following January/February; games
/// played early in a calendar year belong to the previous season.
pub fn season_year(now: DateTime<Utc>) -> i32 {
    if now.month() <= 2 { now.year() - 1 } else { now.year() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;

    const LEAGUE_JSON: &str = r#"{"league":{"id":"12345","name":"Bizarro","baseURL":"https://www43.myfantasyleague.com",
        "franchises":{"franchise":[{"id":"0001","name":"Cardinals"},{"id":"0002","name":"Falcons","icon":"https://x/f.png"}]}}}"#;
    const LIVE_JSON: &str = r#"{"liveScoring":{"week":"5","matchup":[{"franchise":[
        {"id":"0001","score":"50.5"},{"id":"0002","score":"44"}]}]}}"#;
    const EMPTY_LIVE_JSON: &str = r#"{"liveScoring":{"week":"5"}}"#;
    const SCOREBOARD_JSON: &str = r#"{"scoreboard":{"week":"5","matchup":{"team":[{"id":"0001","score":"10"},{"id":"0002","score":"12"}]}}}"#;

    fn proxy_api(server: &mockito::Server) -> MflApi {
        MflApi::new(ExportTarget::Proxy { base: server.url() })
    }

    #[test]
    fn season_year_tracks_calendar_year_in_fall() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
        assert_eq!(season_year(dt), 2026);
    }

    #[test]
    fn season_year_rolls_back_in_january_and_february() {
        let jan = Utc.with_ymd_and_hms(2027, 1, 10, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2027, 2, 28, 23, 59, 59).unwrap();
        assert_eq!(season_year(jan), 2026);
        assert_eq!(season_year(feb), 2026);
    }

    #[test]
    fn export_url_has_fixed_params() {
        let url = export_url(MFL_API_BASE, "2025", "12345", "liveScoring", Some("5")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.myfantasyleague.com/2025/export?TYPE=liveScoring&L=12345&JSON=1&W=5"
        );
        let url = export_url("https://api.myfantasyleague.com/", "2025", "12345", "league", None).unwrap();
        assert_eq!(url.as_str(), "https://api.myfantasyleague.com/2025/export?TYPE=league&L=12345&JSON=1");
    }

    #[test]
    fn export_url_rejects_garbage_base() {
        assert!(matches!(
            export_url("not a url", "2025", "1", "league", None),
            Err(ApiError::InvalidUrl(_, _))
        ));
    }

    #[test]
    fn proxy_target_url() {
        let target = ExportTarget::Proxy { base: "http://127.0.0.1:3000/".into() };
        let url = target.url("scoreboard", Some("3")).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:3000/api/mfl?type=scoreboard&w=3");
    }

    #[test]
    fn league_mapping_drops_franchises_without_id() {
        let raw: LeagueResponse = serde_json::from_str(
            r#"{"league":{"franchises":{"franchise":[{"name":"ghost"},{"id":"0003","logo":"https://l"}]}}}"#,
        )
        .unwrap();
        let league = map_league(raw);
        assert_eq!(league.franchises.len(), 1);
        assert_eq!(league.franchises[0].name, "0003");
        assert_eq!(league.franchises[0].icon.as_deref(), Some("https://l"));
    }

    #[tokio::test]
    async fn fetch_week_uses_live_scoring_when_present() {
        let mut server = mockito::Server::new_async().await;
        let league = server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::UrlEncoded("type".into(), "league".into()))
            .with_header("content-type", "application/json")
            .with_body(LEAGUE_JSON)
            .create_async()
            .await;
        let live = server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("type".into(), "liveScoring".into()),
                Matcher::UrlEncoded("w".into(), "5".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(LIVE_JSON)
            .create_async()
            .await;
        let scoreboard = server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::UrlEncoded("type".into(), "scoreboard".into()))
            .expect(0)
            .create_async()
            .await;

        let snapshot = proxy_api(&server).fetch_week(5).await.unwrap();
        assert_eq!(snapshot.source, MatchupSource::LiveScoring);
        assert_eq!(snapshot.matchups.len(), 1);
        assert_eq!(snapshot.league.franchises.len(), 2);
        assert_eq!(snapshot.league.name.as_deref(), Some("Bizarro"));

        league.assert_async().await;
        live.assert_async().await;
        scoreboard.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_week_falls_back_to_scoreboard() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::UrlEncoded("type".into(), "league".into()))
            .with_body(LEAGUE_JSON)
            .create_async()
            .await;
        server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::UrlEncoded("type".into(), "liveScoring".into()))
            .with_body(EMPTY_LIVE_JSON)
            .create_async()
            .await;
        let scoreboard = server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("type".into(), "scoreboard".into()),
                Matcher::UrlEncoded("w".into(), "5".into()),
            ]))
            .with_body(SCOREBOARD_JSON)
            .create_async()
            .await;

        let snapshot = proxy_api(&server).fetch_week(5).await.unwrap();
        assert_eq!(snapshot.source, MatchupSource::Scoreboard);
        assert_eq!(snapshot.matchups.len(), 1);
        scoreboard.assert_async().await;
    }

    #[tokio::test]
    async fn direct_target_sends_export_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/2025/export")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("TYPE".into(), "liveScoring".into()),
                Matcher::UrlEncoded("L".into(), "12345".into()),
                Matcher::UrlEncoded("JSON".into(), "1".into()),
                Matcher::UrlEncoded("W".into(), "2".into()),
            ]))
            .with_body(LIVE_JSON)
            .create_async()
            .await;

        let api = MflApi::new(ExportTarget::Direct {
            base: server.url(),
            season: "2025".into(),
            league_id: "12345".into(),
        });
        let matchups = api.fetch_live_scoring(Some(2)).await.unwrap();
        assert_eq!(matchups.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upstream_error_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::Any)
            .with_body(r#"{"error":{"$t":"Invalid league ID"}}"#)
            .create_async()
            .await;

        let err = proxy_api(&server).fetch_league().await.unwrap_err();
        assert!(matches!(err, ApiError::Upstream(ref msg, _) if msg == "Invalid league ID"));
    }

    #[tokio::test]
    async fn bad_gateway_is_an_api_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::Any)
            .with_status(502)
            .with_body(r#"{"error":"upstream returned non-JSON"}"#)
            .create_async()
            .await;

        let err = proxy_api(&server).fetch_live_scoring(Some(1)).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/mfl")
            .match_query(Matcher::Any)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = proxy_api(&server).fetch_live_scoring(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(_, _)));
    }
}
