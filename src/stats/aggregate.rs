use std::collections::{BTreeMap, HashMap};

use crate::{
    entity::model::{EntityMap, Game, Player},
    foundation::{
        core::Period,
        error::{WrappedError, WrappedResult},
    },
    playlog::model::PlayLog,
    stats::counter::PeriodCounter,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameTally {
    pub game: Game,
    pub plays: PeriodCounter,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerTally {
    pub player: Player,
    /// Every recorded appearance, ignored plays included.
    pub plays: PeriodCounter,
    /// Appearances in plays that count toward official statistics.
    pub counted_plays: PeriodCounter,
    pub wins: PeriodCounter,
    pub counted_wins: PeriodCounter,
    pub starts: PeriodCounter,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerMetric {
    #[default]
    Plays,
    CountedPlays,
    Wins,
    CountedWins,
    Starts,
}

impl PlayerTally {
    fn new(player: Player) -> Self {
        Self {
            player,
            plays: PeriodCounter::new(),
            counted_plays: PeriodCounter::new(),
            wins: PeriodCounter::new(),
            counted_wins: PeriodCounter::new(),
            starts: PeriodCounter::new(),
        }
    }

    pub fn metric(&self, metric: PlayerMetric) -> &PeriodCounter {
        match metric {
            PlayerMetric::Plays => &self.plays,
            PlayerMetric::CountedPlays => &self.counted_plays,
            PlayerMetric::Wins => &self.wins,
            PlayerMetric::CountedWins => &self.counted_wins,
            PlayerMetric::Starts => &self.starts,
        }
    }
}

/// Mechanic name to period counter.
///
/// Besides the global first-seen order, each period remembers the order in which mechanics first
/// appeared within it; rankings break ties by that per-period order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MechanicTally {
    entries: Vec<(String, PeriodCounter)>,
    index: HashMap<String, usize>,
    seen: BTreeMap<Period, Vec<usize>>,
}

impl MechanicTally {
    pub fn bump(&mut self, name: &str, year: i32) {
        let i = match self.index.get(name) {
            Some(&i) => i,
            None => {
                self.entries.push((name.to_string(), PeriodCounter::new()));
                self.index.insert(name.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        for period in [Period::Year(year), Period::AllTime] {
            if self.entries[i].1.get(period) == 0 {
                self.seen.entry(period).or_default().push(i);
            }
        }
        self.entries[i].1.bump(year);
    }

    pub fn get(&self, name: &str, period: Period) -> u64 {
        self.index
            .get(name)
            .map_or(0, |&i| self.entries[i].1.get(period))
    }

    pub fn entries(&self) -> &[(String, PeriodCounter)] {
        &self.entries
    }

    /// Mechanics counted in `period`, paired with their entry index, in the order they first
    /// appeared there.
    pub fn in_period_order(&self, period: Period) -> Vec<(usize, &(String, PeriodCounter))> {
        self.seen
            .get(&period)
            .map(|order| order.iter().map(|&i| (i, &self.entries[i])).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Headline numbers for a period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub plays: u64,
    pub counted_plays: u64,
    pub games_played: u64,
    pub players_active: u64,
}

/// Every counter derived from one play log, built fresh per call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub games: Vec<GameTally>,
    pub players: Vec<PlayerTally>,
    pub mechanics: MechanicTally,
    pub plays: PeriodCounter,
    pub counted_plays: PeriodCounter,
}

impl Aggregate {
    pub fn totals(&self, period: Period) -> Totals {
        Totals {
            plays: self.plays.get(period),
            counted_plays: self.counted_plays.get(period),
            games_played: self.games.iter().filter(|g| g.plays.get(period) > 0).count() as u64,
            players_active: self
                .players
                .iter()
                .filter(|p| p.plays.get(period) > 0)
                .count() as u64,
        }
    }

    /// Concrete years with at least one play, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.plays.years().collect()
    }
}

/// Turn `log` into period counters for every game, player and mechanic in `entities`.
///
/// A play that references an unknown game or player aborts the whole aggregation.
#[tracing::instrument(skip_all, fields(plays = log.plays.len()))]
pub fn aggregate(log: &PlayLog, entities: &EntityMap) -> WrappedResult<Aggregate> {
    let game_index = entities.game_index()?;
    let player_index = entities.player_index()?;

    let mut out = Aggregate {
        games: entities
            .games
            .iter()
            .map(|g| GameTally {
                game: g.clone(),
                plays: PeriodCounter::new(),
            })
            .collect(),
        players: entities
            .players
            .iter()
            .map(|p| PlayerTally::new(p.clone()))
            .collect(),
        ..Default::default()
    };

    for play in &log.plays {
        let year = play.year()?;
        let &gi = game_index.get(&play.game_ref_id).ok_or_else(|| {
            WrappedError::reference(format!(
                "play on {} references unknown game id {}",
                play.play_date, play.game_ref_id
            ))
        })?;

        out.plays.bump(year);
        if !play.ignored {
            out.counted_plays.bump(year);
        }

        let tally = &mut out.games[gi];
        tally.plays.bump(year);
        for mechanic in tally.game.mechanics() {
            out.mechanics.bump(mechanic, year);
        }

        for score in &play.player_scores {
            let &pi = player_index.get(&score.player_ref_id).ok_or_else(|| {
                WrappedError::reference(format!(
                    "play on {} references unknown player id {}",
                    play.play_date, score.player_ref_id
                ))
            })?;
            let p = &mut out.players[pi];
            p.plays.bump(year);
            if !play.ignored {
                p.counted_plays.bump(year);
            }
            if score.winner {
                p.wins.bump(year);
                if !play.ignored {
                    p.counted_wins.bump(year);
                }
            }
            if score.start_player {
                p.starts.bump(year);
            }
        }
    }

    tracing::debug!(
        games = out.games.len(),
        players = out.players.len(),
        mechanics = out.mechanics.len(),
        "aggregated play log"
    );
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/stats/aggregate.rs"]
mod tests;
