//! Decision analysis engine.
//!
//! Rebuilds each play's tag sequence, grades the first transition of every
//! play with the rubric, and aggregates the results into a letter grade.
//! Only positions 1 and 2 are examined; later tags never affect the grade.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::rubric::{classify, Quality, DEFENSIVE_STARTER, OFFENSIVE_STARTERS};
use super::sequences::{reconstruct, TagSequence};
use crate::models::{GameId, PlayerId, TeamId};
use crate::store::{PlayTagFilter, RecordStore, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Grade {
    A,
    B,
    C,
    D,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Grade {
    pub fn from_average(average: f64, total_decisions: u32) -> Self {
        if total_decisions == 0 {
            Grade::NotApplicable
        } else if average >= 3.5 {
            Grade::A
        } else if average >= 3.0 {
            Grade::B
        } else if average >= 2.5 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count of one graded (initiating, responding) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionCell {
    pub quality: Quality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub count: u32,
    /// Per-decision score of `quality`
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedQuality {
    pub average_score: f64,
    pub total_decisions: u32,
    pub grade: Grade,
}

impl AggregatedQuality {
    pub const EMPTY: AggregatedQuality =
        AggregatedQuality { average_score: 0.0, total_decisions: 0, grade: Grade::NotApplicable };

    /// Weighted average over (quality, count) pairs.
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (Quality, u32)>,
    {
        let (weighted, total) = counts
            .into_iter()
            .fold((0.0_f64, 0_u32), |(sum, n), (quality, count)| {
                (sum + quality.score() * f64::from(count), n + count)
            });
        if total == 0 {
            return Self::EMPTY;
        }
        let average_score = weighted / f64::from(total);
        Self { average_score, total_decisions: total, grade: Grade::from_average(average_score, total) }
    }
}

/// Bucketed first-transition counts for a set of sequences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionBreakdown {
    /// Keyed by responding action
    pub defensive_responses: BTreeMap<String, DecisionCell>,
    /// Keyed by initiating action, then responding action
    pub offensive_decisions: BTreeMap<String, BTreeMap<String, DecisionCell>>,
}

impl DecisionBreakdown {
    /// Grade one play's first transition. Returns false when the pair falls
    /// outside both buckets and was not counted.
    pub fn record(&mut self, initiating: &str, responding: &str) -> bool {
        let cells = if initiating == DEFENSIVE_STARTER {
            &mut self.defensive_responses
        } else if OFFENSIVE_STARTERS.contains(&initiating) {
            self.offensive_decisions.entry(initiating.to_string()).or_default()
        } else {
            return false;
        };

        let classification = classify(initiating, responding);
        cells
            .entry(responding.to_string())
            .or_insert_with(|| DecisionCell {
                quality: classification.quality,
                reason: classification.reason.map(str::to_string),
                count: 0,
                score: classification.quality.score(),
            })
            .count += 1;
        true
    }

    pub fn cells(&self) -> impl Iterator<Item = &DecisionCell> {
        self.defensive_responses
            .values()
            .chain(self.offensive_decisions.values().flat_map(|m| m.values()))
    }

    pub fn aggregate(&self) -> AggregatedQuality {
        AggregatedQuality::from_counts(self.cells().map(|c| (c.quality, c.count)))
    }
}

/// Grade the first transition of every sequence with at least two tags.
pub fn analyze_sequences<'a, I>(sequences: I) -> DecisionBreakdown
where
    I: IntoIterator<Item = &'a TagSequence>,
{
    let mut breakdown = DecisionBreakdown::default();
    for sequence in sequences {
        if let Some((initiating, responding)) = sequence.first_pair() {
            if !breakdown.record(initiating, responding) {
                log::debug!("Ungraded opening '{} -> {}' in play {}", initiating, responding, sequence.play_id);
            }
        }
    }
    breakdown
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecisionQualityReport {
    pub player_id: PlayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<GameId>,
    pub sequences_examined: usize,
    #[serde(flatten)]
    pub aggregate: AggregatedQuality,
    #[serde(flatten)]
    pub breakdown: DecisionBreakdown,
}

pub fn player_decision_quality(
    store: &dyn RecordStore,
    player_id: PlayerId,
    game_id: Option<GameId>,
) -> StoreResult<DecisionQualityReport> {
    let rows = store.play_tags(&PlayTagFilter::for_player(player_id).in_game(game_id))?;
    let sequences = reconstruct(rows);
    let breakdown = analyze_sequences(&sequences);
    let aggregate = breakdown.aggregate();
    log::debug!(
        "Player {}: {} sequences, {} graded, grade {}",
        player_id,
        sequences.len(),
        aggregate.total_decisions,
        aggregate.grade
    );
    Ok(DecisionQualityReport {
        player_id,
        game_id,
        sequences_examined: sequences.len(),
        aggregate,
        breakdown,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayerQuality {
    pub player_id: PlayerId,
    #[serde(flatten)]
    pub aggregate: AggregatedQuality,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamQualityReport {
    pub team_id: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<GameId>,
    pub sequences_examined: usize,
    #[serde(flatten)]
    pub aggregate: AggregatedQuality,
    /// Sorted by player id
    pub players: Vec<PlayerQuality>,
}

/// Same grading over every row attributed to a team, plus a per-player split.
pub fn team_decision_quality(
    store: &dyn RecordStore,
    team_id: TeamId,
    game_id: Option<GameId>,
) -> StoreResult<TeamQualityReport> {
    let rows = store.play_tags(&PlayTagFilter::for_team(team_id).in_game(game_id))?;
    let sequences = reconstruct(rows);

    let mut by_player: HashMap<PlayerId, Vec<&TagSequence>> = HashMap::new();
    for sequence in &sequences {
        if let Some(first) = sequence.rows.first() {
            by_player.entry(first.player_id).or_default().push(sequence);
        }
    }

    let mut players: Vec<PlayerQuality> = by_player
        .into_iter()
        .map(|(player_id, seqs)| PlayerQuality {
            player_id,
            aggregate: analyze_sequences(seqs).aggregate(),
        })
        .collect();
    players.sort_by_key(|p| p.player_id);

    Ok(TeamQualityReport {
        team_id,
        game_id,
        sequences_examined: sequences.len(),
        aggregate: analyze_sequences(&sequences).aggregate(),
        players,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sequences::fixtures::play_rows;
    use proptest::prelude::*;

    fn sequences(plays: &[&[&str]]) -> Vec<TagSequence> {
        let (player, team, game) = (PlayerId::new(), TeamId::new(), GameId::new());
        let rows = plays.iter().flat_map(|names| play_rows(player, team, game, names)).collect();
        reconstruct(rows)
    }

    #[test]
    fn test_double_team_pass_out_scores_excellent() {
        let breakdown = analyze_sequences(&sequences(&[&["Double Teamed", "Pass Out"]]));
        let cell = &breakdown.defensive_responses["Pass Out"];
        assert_eq!(cell.quality, Quality::Excellent);
        assert_eq!(cell.count, 1);
        assert_eq!(cell.score, 4.0);
        assert!(breakdown.offensive_decisions.is_empty());
    }

    #[test]
    fn test_only_first_transition_is_graded() {
        let breakdown =
            analyze_sequences(&sequences(&[&["Isolation", "Pull Up Shot", "Made Shot"]]));
        let iso = &breakdown.offensive_decisions["Isolation"];
        assert_eq!(iso.len(), 1);
        assert_eq!(iso["Pull Up Shot"].quality, Quality::Good);
        assert_eq!(breakdown.aggregate().total_decisions, 1);
    }

    #[test]
    fn test_unbucketed_openings_are_not_counted() {
        let breakdown = analyze_sequences(&sequences(&[
            &["Spot Up", "Catch and Shoot"],
            &["Timeout"],
            &["Pick and Roll", "Layup"],
        ]));
        let agg = breakdown.aggregate();
        // only the pick and roll counts, as an undefined (neutral) response
        assert_eq!(agg.total_decisions, 1);
        assert_eq!(agg.average_score, 2.5);
        assert_eq!(agg.grade, Grade::C);
    }

    #[test]
    fn test_weighted_average_across_buckets() {
        let breakdown = analyze_sequences(&sequences(&[
            &["Double Teamed", "Pass Out"],
            &["Double Teamed", "Pass Out"],
            &["Post Up", "Fadeaway"],
            &["Transition", "Turnover"],
        ]));
        let agg = breakdown.aggregate();
        assert_eq!(agg.total_decisions, 4);
        assert!((agg.average_score - (4.0 + 4.0 + 2.0 + 1.0) / 4.0).abs() < 1e-9);
        assert_eq!(agg.grade, Grade::C);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_average(3.5, 1), Grade::A);
        assert_eq!(Grade::from_average(3.49, 1), Grade::B);
        assert_eq!(Grade::from_average(3.0, 1), Grade::B);
        assert_eq!(Grade::from_average(2.5, 1), Grade::C);
        assert_eq!(Grade::from_average(2.49, 1), Grade::D);
        assert_eq!(Grade::from_average(0.0, 0), Grade::NotApplicable);
    }

    #[test]
    fn test_report_json_shape() {
        let breakdown = analyze_sequences(&sequences(&[&["Pick and Roll", "Pass to Roller"]]));
        let report = DecisionQualityReport {
            player_id: PlayerId::new(),
            game_id: None,
            sequences_examined: 1,
            aggregate: breakdown.aggregate(),
            breakdown,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["grade"], "A");
        assert_eq!(json["totalDecisions"], 1);
        assert_eq!(json["offensiveDecisions"]["Pick and Roll"]["Pass to Roller"]["quality"], "excellent");
        assert!(json.get("gameId").is_none());
        assert_eq!(serde_json::to_value(Grade::NotApplicable).unwrap(), "N/A");
    }

    fn quality() -> impl Strategy<Value = Quality> {
        prop_oneof![
            Just(Quality::Excellent),
            Just(Quality::Good),
            Just(Quality::Neutral),
            Just(Quality::Questionable),
            Just(Quality::Risky),
        ]
    }

    proptest! {
        #[test]
        fn prop_more_excellent_never_lowers_average(
            counts in proptest::collection::vec((quality(), 0u32..50), 0..8),
            extra in 1u32..20
        ) {
            let before = AggregatedQuality::from_counts(counts.iter().copied());
            let after = AggregatedQuality::from_counts(
                counts.iter().copied().chain(std::iter::once((Quality::Excellent, extra))),
            );
            prop_assert!(after.average_score + 1e-9 >= before.average_score);
            prop_assert!(after.total_decisions > before.total_decisions);
        }
    }
}
