//! Raw MFL matchups → display-ready `Matchup` records.
//!
//! Everything here is a pure function of its inputs: the calendar year used
//! for templated logos is passed in through `NormalizeContext` rather than
//! read from the clock.

use crate::brand::BrandingConfig;
use crate::mfl::{RawMatchup, RawPlayer, RawSide};
use crate::tagger;
use crate::{LIVE_CLOCK, League, Matchup, MatchupSide, MatchupSource, Scoreboard};
use std::collections::HashMap;

/// Stand-in for an unknown remaining percentage.
pub const NEUTRAL_REMAINING_PERCENT: f64 = 50.0;

/// Floor for the played percentage so early-game projections stay bounded.
pub const PROJECTION_DAMPING_PERCENT: f64 = 5.0;

/// Eligible game time per player, in seconds.
pub const PLAYER_GAME_SECONDS: f64 = 3600.0;

pub struct NormalizeContext<'a> {
    pub league: &'a League,
    pub branding: &'a BrandingConfig,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRemaining {
    pub percent: f64,
    pub players_left: u32,
}

/// Normalize then tag a week's matchups.
pub fn build_scoreboard(
    ctx: &NormalizeContext,
    week: u8,
    source: MatchupSource,
    raw: &[RawMatchup],
) -> Scoreboard {
    let mut matchups = normalize_matchups(ctx, raw);
    tagger::assign_tags(&mut matchups);
    Scoreboard {
        week,
        league_name: ctx.league.name.clone(),
        source,
        matchups,
    }
}

pub fn normalize_matchups(ctx: &NormalizeContext, raw: &[RawMatchup]) -> Vec<Matchup> {
    let franchises: HashMap<&str, &crate::Franchise> = ctx
        .league
        .franchises
        .iter()
        .map(|f| (f.id.as_str(), f))
        .collect();

    raw.iter()
        .filter_map(RawMatchup::sides)
        .enumerate()
        .map(|(idx, (a, b))| {
            let mut a = normalize_side(ctx, &franchises, a);
            let mut b = normalize_side(ctx, &franchises, b);

            if a.remaining_percent.is_some() || b.remaining_percent.is_some() {
                let (pa, pb) =
                    win_probability(a.score, a.remaining_percent, b.score, b.remaining_percent);
                a.win_probability = Some(pa);
                b.win_probability = Some(pb);
            }

            Matchup {
                id: idx.to_string(),
                a,
                b,
                tag: None,
                clock: LIVE_CLOCK.to_string(),
            }
        })
        .collect()
}

fn normalize_side(
    ctx: &NormalizeContext,
    franchises: &HashMap<&str, &crate::Franchise>,
    raw: &RawSide,
) -> MatchupSide {
    let id = raw.id.clone().unwrap_or_default();
    let franchise = franchises.get(id.as_str());

    let name = franchise
        .map(|f| f.name.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| id.clone());

    let logo = ctx.branding.resolve_logo(
        &id,
        franchise.and_then(|f| f.icon.as_deref()),
        ctx.league.base_url.as_deref(),
        ctx.league.id.as_deref(),
        ctx.year,
    );

    let remaining = estimate_remaining(raw.players());

    MatchupSide {
        color: ctx.branding.color(&id),
        score: parse_score(raw.score.as_deref()),
        name,
        logo,
        remaining_percent: remaining.map(|r| r.percent),
        win_probability: None,
        players_left: remaining.map(|r| r.players_left),
        id,
    }
}

/// Parse an upstream score. Missing, non-numeric, non-finite and negative
/// values all become 0.0.
pub fn parse_score(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(0.0)
}

fn parse_seconds(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
        .max(0.0)
}

/// Players whose remaining time counts toward the estimate: those carrying a
/// timing field, narrowed to starters when any of them is a starter.
pub fn timing_pool(players: &[RawPlayer]) -> Vec<&RawPlayer> {
    let timed: Vec<&RawPlayer> = players.iter().filter(|p| p.timing().is_some()).collect();
    if timed.iter().any(|p| p.is_starter()) {
        timed.into_iter().filter(|p| p.is_starter()).collect()
    } else {
        timed
    }
}

/// Fraction of the pool's player-minutes not yet played. None when no
/// player carries timing data.
pub fn estimate_remaining(players: &[RawPlayer]) -> Option<TimeRemaining> {
    let pool = timing_pool(players);
    if pool.is_empty() {
        return None;
    }

    let seconds: Vec<f64> = pool.iter().map(|p| parse_seconds(p.timing())).collect();
    let total: f64 = seconds.iter().sum();
    let percent = (total / (pool.len() as f64 * PLAYER_GAME_SECONDS) * 100.0).clamp(0.0, 100.0);
    let players_left = seconds.iter().filter(|s| **s > 0.0).count() as u32;

    Some(TimeRemaining { percent, players_left })
}

/// Final-score projection. Never below the current score.
pub fn project_total(score: f64, remaining_percent: Option<f64>) -> f64 {
    let remaining = remaining_percent
        .unwrap_or(NEUTRAL_REMAINING_PERCENT)
        .clamp(0.0, 100.0);
    let played = (100.0 - remaining).max(PROJECTION_DAMPING_PERCENT);
    let projected = score * (100.0 / played);
    projected.max(score)
}

/// Heuristic win probabilities for sides A and B, summing to 100.
pub fn win_probability(
    a_score: f64,
    a_remaining: Option<f64>,
    b_score: f64,
    b_remaining: Option<f64>,
) -> (f64, f64) {
    let a = project_total(a_score, a_remaining);
    let b = project_total(b_score, b_remaining);
    let total = a + b;
    if total <= 0.0 {
        return (50.0, 50.0);
    }
    let pa = a / total * 100.0;
    (pa, 100.0 - pa)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Franchise;
    use crate::brand::FranchiseBrand;

    fn player(secs: Option<&str>, starter: bool) -> RawPlayer {
        RawPlayer {
            game_seconds_remaining: secs.map(str::to_owned),
            status: Some(if starter { "starter" } else { "nonstarter" }.into()),
            ..Default::default()
        }
    }

    fn side(id: &str, score: Option<&str>) -> RawSide {
        RawSide {
            id: Some(id.into()),
            score: score.map(str::to_owned),
            players: None,
        }
    }

    fn league() -> League {
        League {
            id: Some("12345".into()),
            name: Some("Bizarro".into()),
            base_url: Some("https://www43.myfantasyleague.com".into()),
            franchises: vec![
                Franchise { id: "0001".into(), name: "Cardinals".into(), icon: None },
                Franchise {
                    id: "0002".into(),
                    name: "Falcons".into(),
                    icon: Some("https://cdn/falcons.png".into()),
                },
            ],
        }
    }

    #[test]
    fn parse_score_is_total() {
        assert_eq!(parse_score(Some("101.25")), 101.25);
        assert_eq!(parse_score(Some(" 7 ")), 7.0);
        assert_eq!(parse_score(Some("abc")), 0.0);
        assert_eq!(parse_score(Some("")), 0.0);
        assert_eq!(parse_score(None), 0.0);
        assert_eq!(parse_score(Some("NaN")), 0.0);
        assert_eq!(parse_score(Some("inf")), 0.0);
    }

    #[test]
    fn negative_scores_clamp_to_zero() {
        assert_eq!(parse_score(Some("-5")), 0.0);
        assert_eq!(parse_score(Some("-0.5")), 0.0);
    }

    #[test]
    fn remaining_uses_starters_only_when_present() {
        let players = vec![
            player(Some("1800"), true),
            player(Some("3600"), true),
            player(Some("0"), false),
        ];
        let r = estimate_remaining(&players).unwrap();
        assert_eq!(r.percent, 75.0);
        assert_eq!(r.players_left, 2);
    }

    #[test]
    fn remaining_uses_whole_pool_without_starters() {
        let players = vec![player(Some("3600"), false), player(Some("0"), false)];
        let r = estimate_remaining(&players).unwrap();
        assert_eq!(r.percent, 50.0);
        assert_eq!(r.players_left, 1);
    }

    #[test]
    fn remaining_is_none_without_timing() {
        assert!(estimate_remaining(&[]).is_none());
        assert!(estimate_remaining(&[player(None, true), player(None, false)]).is_none());
    }

    #[test]
    fn remaining_ignores_untimed_players_and_clamps() {
        let players = vec![
            player(Some("-200"), true),
            player(Some("garbage"), true),
            player(None, true),
        ];
        let r = estimate_remaining(&players).unwrap();
        assert_eq!(r.percent, 0.0);
        assert_eq!(r.players_left, 0);

        let over = estimate_remaining(&[player(Some("9000"), true)]).unwrap();
        assert_eq!(over.percent, 100.0);
    }

    #[test]
    fn projection_never_drops_below_score() {
        assert_eq!(project_total(80.0, Some(100.0)), 80.0 * 100.0 / PROJECTION_DAMPING_PERCENT);
        assert_eq!(project_total(80.0, Some(0.0)), 80.0);
        assert_eq!(project_total(80.0, None), 160.0);
        // out-of-range input is clamped before use
        assert_eq!(project_total(80.0, Some(-40.0)), 80.0);
    }

    #[test]
    fn leader_is_favored_with_equal_time_left() {
        let (a, b) = win_probability(100.0, Some(40.0), 50.0, Some(40.0));
        assert!(a > 50.0);
        assert!((a + b - 100.0).abs() < 1e-9);
        let (a, b) = win_probability(100.0, None, 50.0, None);
        assert!(a > b);
    }

    #[test]
    fn zero_projection_splits_evenly() {
        assert_eq!(win_probability(0.0, Some(10.0), 0.0, None), (50.0, 50.0));
    }

    #[test]
    fn sides_resolve_names_scores_and_logos() {
        let league = league();
        let branding = BrandingConfig::default().with_brand(
            "0001",
            FranchiseBrand { logo: None, color: Some("#97233F".into()) },
        );
        let ctx = NormalizeContext { league: &league, branding: &branding, year: 2025 };
        let raw = vec![RawMatchup {
            franchise: vec![side("0001", Some("88.5")), side("0002", Some("abc"))],
            team: vec![],
        }];

        let matchups = normalize_matchups(&ctx, &raw);
        assert_eq!(matchups.len(), 1);
        let m = &matchups[0];
        assert_eq!(m.id, "0");
        assert_eq!(m.clock, "LIVE");
        assert_eq!(m.a.name, "Cardinals");
        assert_eq!(m.a.score, 88.5);
        assert_eq!(m.a.color.as_deref(), Some("#97233F"));
        assert_eq!(
            m.a.logo.as_deref(),
            Some("https://www43.myfantasyleague.com/fflnetdynamic2025/12345_franchise_icon0001.jpg")
        );
        assert_eq!(m.b.score, 0.0);
        assert_eq!(m.b.logo.as_deref(), Some("https://cdn/falcons.png"));
        assert!(m.a.remaining_percent.is_none());
        assert!(m.a.win_probability.is_none());
        assert!(m.tag.is_none());
    }

    #[test]
    fn unknown_franchise_falls_back_to_id() {
        let league = League::default();
        let branding = BrandingConfig::default();
        let ctx = NormalizeContext { league: &league, branding: &branding, year: 2025 };
        let raw = vec![RawMatchup {
            franchise: vec![],
            team: vec![side("0099", Some("1")), side("0100", None)],
        }];
        let m = &normalize_matchups(&ctx, &raw)[0];
        assert_eq!(m.a.name, "0099");
        assert_eq!(m.b.name, "0100");
        assert!(m.a.logo.is_none());
    }

    #[test]
    fn one_sided_matchups_are_skipped_and_ids_stay_positional() {
        let league = League::default();
        let branding = BrandingConfig::default();
        let ctx = NormalizeContext { league: &league, branding: &branding, year: 2025 };
        let raw = vec![
            RawMatchup { franchise: vec![side("1", None)], team: vec![] },
            RawMatchup { franchise: vec![side("2", None), side("3", None)], team: vec![] },
        ];
        let matchups = normalize_matchups(&ctx, &raw);
        assert_eq!(matchups.len(), 1);
        assert_eq!(matchups[0].id, "0");
    }

    #[test]
    fn win_probability_set_when_either_side_is_timed() {
        let league = League::default();
        let branding = BrandingConfig::default();
        let ctx = NormalizeContext { league: &league, branding: &branding, year: 2025 };
        let mut timed = side("1", Some("100"));
        timed.players = Some(crate::mfl::PlayerList::Flat(vec![player(Some("1800"), true)]));
        let raw = vec![RawMatchup { franchise: vec![timed, side("2", Some("50"))], team: vec![] }];

        let m = &normalize_matchups(&ctx, &raw)[0];
        assert_eq!(m.a.remaining_percent, Some(50.0));
        assert_eq!(m.a.players_left, Some(1));
        assert!(m.b.remaining_percent.is_none());
        let (pa, pb) = (m.a.win_probability.unwrap(), m.b.win_probability.unwrap());
        assert!(pa > pb);
    }

    #[test]
    fn normalization_is_deterministic() {
        let league = league();
        let branding = BrandingConfig::preset("bizarro").unwrap();
        let ctx = NormalizeContext { league: &league, branding: &branding, year: 2025 };
        let raw = vec![
            RawMatchup { franchise: vec![side("0001", Some("12")), side("0002", Some("40"))], team: vec![] },
            RawMatchup { franchise: vec![side("0003", Some("70")), side("0004", Some("71"))], team: vec![] },
        ];
        let first = build_scoreboard(&ctx, 4, MatchupSource::LiveScoring, &raw);
        let second = build_scoreboard(&ctx, 4, MatchupSource::LiveScoring, &raw);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first.league_name.as_deref(), Some("Bizarro"));
    }
}
