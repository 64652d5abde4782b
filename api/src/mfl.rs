//! MyFantasyLeague export API raw wire types: serde shapes for the
//! `league`, `liveScoring` and `scoreboard` exports.
//!
//! MFL renders numbers as strings and collapses single-element arrays into a
//! bare object, so list fields go through `one_or_many` and scalar fields
//! through `lenient_string`. Interpretation of the raw text happens in
//! `normalize.rs`.
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Accept `[..]`, a single object, or null/missing.
pub fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
        None => Vec::new(),
    })
}

/// Accept a string, number or bool as raw text. Anything else is treated as missing.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// MFL reports failures as `{"error": {"$t": "..."}}` with a 200 status.
pub fn error_message(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("$t")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| error.to_string()),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// League  (TYPE=league)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeagueResponse {
    pub league: Option<LeagueBody>,
    pub error: Option<Value>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeagueBody {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "baseURL", default, deserialize_with = "lenient_string")]
    pub base_url: Option<String>,
    pub franchises: Option<FranchiseList>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FranchiseList {
    #[serde(default, deserialize_with = "one_or_many")]
    pub franchise: Vec<MflFranchise>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MflFranchise {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub logo: Option<String>,
}

// ---------------------------------------------------------------------------
// Live scoring  (TYPE=liveScoring) and scoreboard fallback (TYPE=scoreboard)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LiveScoringResponse {
    #[serde(rename = "liveScoring")]
    pub live_scoring: Option<MatchupList>,
    pub error: Option<Value>,
}

/// Same matchup shape as live scoring; some leagues answer the scoreboard
/// export under the `liveScoring` key, so both are accepted.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub scoreboard: Option<MatchupList>,
    #[serde(rename = "liveScoring")]
    pub live_scoring: Option<MatchupList>,
    pub error: Option<Value>,
}

impl ScoreboardResponse {
    pub fn into_matchups(self) -> Vec<RawMatchup> {
        self.scoreboard
            .or(self.live_scoring)
            .map(|list| list.matchup)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct MatchupList {
    #[serde(default, deserialize_with = "lenient_string")]
    pub week: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub matchup: Vec<RawMatchup>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawMatchup {
    #[serde(default, deserialize_with = "one_or_many")]
    pub franchise: Vec<RawSide>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub team: Vec<RawSide>,
}

impl RawMatchup {
    /// The two sides in upstream order. `franchise` pairs win over `team`
    /// pairs; a matchup without two sides yields None.
    pub fn sides(&self) -> Option<(&RawSide, &RawSide)> {
        let pair = if self.franchise.len() >= 2 {
            &self.franchise
        } else {
            &self.team
        };
        match pair.as_slice() {
            [a, b, ..] => Some((a, b)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawSide {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub score: Option<String>,
    pub players: Option<PlayerList>,
}

impl RawSide {
    pub fn players(&self) -> &[RawPlayer] {
        match &self.players {
            Some(PlayerList::Nested { player }) => player,
            Some(PlayerList::Flat(players)) => players,
            Some(PlayerList::Other(_)) | None => &[],
        }
    }
}

/// `players` is `{"player": [..]}` on MFL, a bare array on some mirrors,
/// and occasionally an empty string.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum PlayerList {
    Nested {
        #[serde(default, deserialize_with = "one_or_many")]
        player: Vec<RawPlayer>,
    },
    Flat(Vec<RawPlayer>),
    Other(serde::de::IgnoredAny),
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawPlayer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub starter: Option<String>,
    #[serde(rename = "gameSecondsRemaining", default, deserialize_with = "lenient_string")]
    pub game_seconds_remaining: Option<String>,
    #[serde(rename = "secondsRemaining", default, deserialize_with = "lenient_string")]
    pub seconds_remaining: Option<String>,
    #[serde(rename = "gameSecsRemaining", default, deserialize_with = "lenient_string")]
    pub game_secs_remaining: Option<String>,
    #[serde(rename = "remainingSeconds", default, deserialize_with = "lenient_string")]
    pub remaining_seconds: Option<String>,
}

impl RawPlayer {
    /// First non-blank timing field, in the order MFL and its mirrors use them.
    pub fn timing(&self) -> Option<&str> {
        [
            &self.game_seconds_remaining,
            &self.seconds_remaining,
            &self.game_secs_remaining,
            &self.remaining_seconds,
        ]
        .into_iter()
        .filter_map(|field| field.as_deref())
        .find(|raw| !raw.trim().is_empty())
    }

    pub fn is_starter(&self) -> bool {
        let status_starter = self
            .status
            .as_deref()
            .is_some_and(|s| s.trim().eq_ignore_ascii_case("starter"));
        let flag_starter = self
            .starter
            .as_deref()
            .is_some_and(|s| matches!(s.trim(), "1" | "true" | "TRUE" | "True" | "yes" | "Y"));
        status_starter || flag_starter
    }
}
