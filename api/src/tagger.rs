//! Highlight tags for a week of matchups.
//!
//! Each tag picks at most one matchup, searched independently over the full
//! list with first-index-wins on ties. When two tags land on the same
//! matchup the card shows the higher priority one:
//! Game of the Week > Blowout Risk > Closest Matchup.

use crate::{Matchup, MatchupTag};

/// Minimum margin, in points, before the widest matchup is flagged.
pub const BLOWOUT_MARGIN_THRESHOLD: f64 = 30.0;

/// Combined points above this no longer raise the Game of the Week score.
pub const TOTAL_POINTS_CAP: f64 = 300.0;

const WIN_PROBABILITY_WEIGHT: f64 = 0.40;
const TOTAL_POINTS_WEIGHT: f64 = 0.30;
const CLOSENESS_WEIGHT: f64 = 0.30;

/// Index chosen for each tag, before priority resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagAssignment {
    pub closest: Option<usize>,
    pub blowout: Option<usize>,
    pub game_of_the_week: Option<usize>,
}

impl TagAssignment {
    pub fn compute(matchups: &[Matchup]) -> Self {
        Self {
            closest: closest_matchup(matchups),
            blowout: blowout_risk(matchups, BLOWOUT_MARGIN_THRESHOLD),
            game_of_the_week: game_of_the_week(matchups),
        }
    }

    /// The tag shown on the matchup at `idx`.
    pub fn tag_for(&self, idx: usize) -> Option<MatchupTag> {
        if self.game_of_the_week == Some(idx) {
            Some(MatchupTag::GameOfTheWeek)
        } else if self.blowout == Some(idx) {
            Some(MatchupTag::BlowoutRisk)
        } else if self.closest == Some(idx) {
            Some(MatchupTag::ClosestMatchup)
        } else {
            None
        }
    }
}

/// Replace every matchup's tag with the resolved assignment.
pub fn assign_tags(matchups: &mut [Matchup]) -> TagAssignment {
    let assignment = TagAssignment::compute(matchups);
    for (idx, matchup) in matchups.iter_mut().enumerate() {
        matchup.tag = assignment.tag_for(idx);
    }
    assignment
}

pub fn closest_matchup(matchups: &[Matchup]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, m) in matchups.iter().enumerate() {
        let margin = m.margin();
        if best.is_none_or(|(_, b)| margin < b) {
            best = Some((idx, margin));
        }
    }
    best.map(|(idx, _)| idx)
}

pub fn blowout_risk(matchups: &[Matchup], threshold: f64) -> Option<usize> {
    let (idx, margin) = widest_margin(matchups)?;
    (margin >= threshold).then_some(idx)
}

fn widest_margin(matchups: &[Matchup]) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, m) in matchups.iter().enumerate() {
        let margin = m.margin();
        if best.is_none_or(|(_, b)| margin > b) {
            best = Some((idx, margin));
        }
    }
    best
}

pub fn game_of_the_week(matchups: &[Matchup]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, m) in matchups.iter().enumerate() {
        let score = game_of_the_week_score(m);
        if best.is_none_or(|(_, b)| score > b) {
            best = Some((idx, score));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Weighted desirability: mean win probability, capped total points and
/// closeness, each on a 0–100 scale.
pub fn game_of_the_week_score(m: &Matchup) -> f64 {
    let avg_win_probability =
        (m.a.win_probability.unwrap_or(50.0) + m.b.win_probability.unwrap_or(50.0)) / 2.0;
    let total_points = m.total_points().min(TOTAL_POINTS_CAP) / TOTAL_POINTS_CAP * 100.0;
    let closeness = 100.0 - m.margin().min(100.0);

    WIN_PROBABILITY_WEIGHT * avg_win_probability
        + TOTAL_POINTS_WEIGHT * total_points
        + CLOSENESS_WEIGHT * closeness
}
