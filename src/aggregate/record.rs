use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::trial::{AgentLabel, ResultRow};

use super::group::{GroupField, GroupKey};

/// Statistics for one group of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRecord {
    pub group_key: GroupKey,
    /// Fraction of rows whose score equals the win score
    pub win_rate: f64,
    pub mean_score: f64,
    pub count: usize,
}

#[derive(Default)]
struct Accumulator {
    wins: usize,
    score_sum: u64,
    count: usize,
}

/// Group `rows` by `group_by` and compute win rate, mean score and count
/// per group.
///
/// Groups come out in the order their first row appears. With an empty
/// `group_by` every row falls into a single group.
pub fn aggregate(
    rows: &[ResultRow],
    group_by: &[GroupField],
    win_score: u8,
) -> Vec<AggregateRecord> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey, Accumulator)> = Vec::new();

    for row in rows {
        let key = GroupKey::of(row, group_by);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Accumulator::default()));
            groups.len() - 1
        });
        let acc = &mut groups[slot].1;
        acc.count += 1;
        acc.score_sum += u64::from(row.score);
        if row.is_win(win_score) {
            acc.wins += 1;
        }
    }

    trace!(rows = rows.len(), groups = groups.len(), "Aggregated rows");
    groups
        .into_iter()
        .map(|(group_key, acc)| AggregateRecord {
            group_key,
            win_rate: acc.wins as f64 / acc.count as f64,
            mean_score: acc.score_sum as f64 / acc.count as f64,
            count: acc.count,
        })
        .collect()
}

/// Order rows for a report: by search budget (labels without one first),
/// then player count, then policy variant (absent first).
///
/// The sort is stable, so rows that tie keep their stored order.
pub fn sort_for_report(rows: &mut [ResultRow]) {
    rows.sort_by_key(|row| {
        (
            AgentLabel::budget(&row.agent_label),
            row.player_count,
            row.policy_variant,
        )
    });
}
