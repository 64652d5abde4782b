pub mod brand;
pub mod client;
pub mod mfl;
pub mod normalize;
pub mod tagger;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the MFL wire format
// ---------------------------------------------------------------------------

/// Clock label shown on every card. MFL live scoring carries no game clock.
pub const LIVE_CLOCK: &str = "LIVE";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct League {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Host the league lives on, e.g. "https://www43.myfantasyleague.com".
    pub base_url: Option<String>,
    pub franchises: Vec<Franchise>,
}

impl League {
    pub fn franchise(&self, id: &str) -> Option<&Franchise> {
        self.franchises.iter().find(|f| f.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Franchise {
    pub id: String,
    pub name: String,
    /// Explicit icon or logo URL from the league export, if the owner set one.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchupSide {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub color: Option<String>,
    pub logo: Option<String>,
    /// 0–100, None when upstream sent no player timing for this side.
    pub remaining_percent: Option<f64>,
    /// 0–100, None when neither side of the matchup has timing data.
    pub win_probability: Option<f64>,
    pub players_left: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchupTag {
    GameOfTheWeek,
    ClosestMatchup,
    BlowoutRisk,
}

impl MatchupTag {
    pub fn label(&self) -> &'static str {
        match self {
            MatchupTag::GameOfTheWeek => "Game of the Week",
            MatchupTag::ClosestMatchup => "Closest Matchup",
            MatchupTag::BlowoutRisk => "Blowout Risk",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Matchup {
    /// Positional index within the week, stable only for a single refresh.
    pub id: String,
    pub a: MatchupSide,
    pub b: MatchupSide,
    pub tag: Option<MatchupTag>,
    pub clock: String,
}

impl Matchup {
    pub fn margin(&self) -> f64 {
        (self.a.score - self.b.score).abs()
    }

    pub fn total_points(&self) -> f64 {
        self.a.score + self.b.score
    }

    /// Share of the win bar that belongs to side A, 0–100.
    /// Uses the win probability when known, otherwise the share of points scored.
    pub fn left_share(&self) -> f64 {
        if let Some(p) = self.a.win_probability {
            return p.clamp(0.0, 100.0);
        }
        let total = self.total_points();
        if total == 0.0 {
            50.0
        } else {
            (self.a.score / total * 100.0).clamp(0.0, 100.0)
        }
    }
}

/// Which export the week's matchups came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum MatchupSource {
    #[default]
    LiveScoring,
    Scoreboard,
}

impl MatchupSource {
    pub fn label(&self) -> &'static str {
        match self {
            MatchupSource::LiveScoring => "live scoring",
            MatchupSource::Scoreboard => "scoreboard",
        }
    }
}

/// One refresh cycle's worth of display data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scoreboard {
    pub week: u8,
    pub league_name: Option<String>,
    pub source: MatchupSource,
    pub matchups: Vec<Matchup>,
}
