use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;

use crate::foundation::error::{WrappedError, WrappedResult};

pub const PLAY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parsed play-log export: the game and player catalogs plus every logged play.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PlayLog {
    #[serde(default)]
    pub games: Vec<LogGame>,
    #[serde(default)]
    pub players: Vec<LogPlayer>,
    #[serde(default)]
    pub plays: Vec<Play>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogGame {
    pub id: u64,
    /// External database id; `0` marks a game that has no external record.
    #[serde(default)]
    pub bgg_id: u64,
    pub name: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LogPlayer {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    pub play_date: String,
    pub game_ref_id: u64,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default)]
    pub player_scores: Vec<PlayerScore>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScore {
    pub player_ref_id: u64,
    #[serde(default)]
    pub winner: bool,
    #[serde(default)]
    pub start_player: bool,
}

impl PlayLog {
    pub fn from_path(path: &Path) -> WrappedResult<Self> {
        let f = File::open(path).with_context(|| format!("open play log '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn from_reader(r: impl std::io::Read) -> WrappedResult<Self> {
        Ok(serde_json::from_reader(r)?)
    }
}

impl Play {
    /// Calendar year the play was logged in.
    pub fn year(&self) -> WrappedResult<i32> {
        use chrono::Datelike as _;

        chrono::NaiveDateTime::parse_from_str(self.play_date.trim(), PLAY_DATE_FORMAT)
            .map(|dt| dt.year())
            .map_err(|e| {
                WrappedError::reference(format!(
                    "play of game {} has unparseable date '{}': {e}",
                    self.game_ref_id, self.play_date
                ))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playlog/model.rs"]
mod tests;
