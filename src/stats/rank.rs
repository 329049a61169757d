use crate::{
    foundation::core::Period,
    stats::{
        aggregate::{Aggregate, PlayerMetric},
        counter::PeriodCounter,
    },
};

/// Number of entries every built-in panel shows.
pub const DEFAULT_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankEntry<'a, T> {
    /// 1-based position.
    pub rank: usize,
    /// Position of `item` in the ranked slice.
    pub index: usize,
    pub item: &'a T,
    pub count: u64,
}

/// Entries with a nonzero count for `period`, highest first, at most `limit` of them.
///
/// The sort is stable: equal counts keep their order in `items`.
pub fn rank_by<'a, T>(
    items: &'a [T],
    period: Period,
    limit: usize,
    counter: impl Fn(&'a T) -> &'a PeriodCounter,
) -> Vec<RankEntry<'a, T>> {
    let mut out: Vec<RankEntry<'a, T>> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let count = counter(item).get(period);
            (count > 0).then_some(RankEntry {
                rank: 0,
                index,
                item,
                count,
            })
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out.truncate(limit);
    for (i, e) in out.iter_mut().enumerate() {
        e.rank = i + 1;
    }
    out
}

/// What a ranked panel slot lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RankSource {
    Games,
    Players {
        #[serde(default)]
        metric: PlayerMetric,
    },
    Mechanics,
}

/// Display-ready ranking row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ranked {
    pub rank: usize,
    pub label: String,
    pub count: u64,
    /// Source index of the entity (games/players) or mechanic.
    pub index: usize,
}

impl Aggregate {
    pub fn rank(&self, source: RankSource, period: Period, limit: usize) -> Vec<Ranked> {
        match source {
            RankSource::Games => label_rows(
                rank_by(&self.games, period, limit, |g| &g.plays),
                |g| g.game.name.clone(),
            ),
            RankSource::Players { metric } => label_rows(
                rank_by(&self.players, period, limit, |p| p.metric(metric)),
                |p| p.player.name.clone(),
            ),
            RankSource::Mechanics => {
                let ordered = self.mechanics.in_period_order(period);
                rank_by(&ordered, period, limit, |e| &e.1.1)
                    .into_iter()
                    .map(|e| Ranked {
                        rank: e.rank,
                        label: e.item.1.0.clone(),
                        count: e.count,
                        index: e.item.0,
                    })
                    .collect()
            }
        }
    }
}

fn label_rows<T>(ranked: Vec<RankEntry<'_, T>>, label: impl Fn(&T) -> String) -> Vec<Ranked> {
    ranked
        .into_iter()
        .map(|e| Ranked {
            rank: e.rank,
            label: label(e.item),
            count: e.count,
            index: e.index,
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/stats/rank.rs"]
mod tests;
