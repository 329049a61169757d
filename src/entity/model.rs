use std::collections::HashMap;

use crate::foundation::error::{WrappedError, WrappedResult};

/// Local image drawn for games that have no external record.
pub const PLACEHOLDER_COVER: &str = "images/none_game.png";

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Game {
    pub id: u64,
    pub name: String,
    pub kind: GameKind,
}

/// A game is either backed by an external metadata lookup or a local placeholder.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameKind {
    Resolved {
        bgg_id: u64,
        image: String,
        mechanics: Vec<String>,
    },
    Placeholder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoverArt {
    /// Remote image reference for a resolved game.
    Remote { bgg_id: u64, uri: String },
    /// Asset-root relative path.
    Local(String),
}

impl Game {
    pub fn resolved(id: u64, name: impl Into<String>, bgg_id: u64, meta: GameMetadata) -> Self {
        Self {
            id,
            name: name.into(),
            kind: GameKind::Resolved {
                bgg_id,
                image: meta.image,
                mechanics: meta.mechanics,
            },
        }
    }

    /// Games without an external id never trigger a lookup.
    pub fn placeholder(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: GameKind::Placeholder,
        }
    }

    pub fn mechanics(&self) -> &[String] {
        match &self.kind {
            GameKind::Resolved { mechanics, .. } => mechanics,
            GameKind::Placeholder => &[],
        }
    }

    pub fn cover_art(&self) -> CoverArt {
        match &self.kind {
            GameKind::Resolved { bgg_id, image, .. } => CoverArt::Remote {
                bgg_id: *bgg_id,
                uri: image.clone(),
            },
            GameKind::Placeholder => CoverArt::Local(PLACEHOLDER_COVER.to_string()),
        }
    }
}

/// Metadata a resolver must fully populate for a game with an external id.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameMetadata {
    pub image: String,
    #[serde(default)]
    pub mechanics: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
}

/// Resolved game and player catalogs, kept in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntityMap {
    pub games: Vec<Game>,
    pub players: Vec<Player>,
}

impl EntityMap {
    pub(crate) fn game_index(&self) -> WrappedResult<HashMap<u64, usize>> {
        index_by_id(self.games.iter().map(|g| g.id), "game")
    }

    pub(crate) fn player_index(&self) -> WrappedResult<HashMap<u64, usize>> {
        index_by_id(self.players.iter().map(|p| p.id), "player")
    }
}

fn index_by_id(
    ids: impl Iterator<Item = u64>,
    what: &str,
) -> WrappedResult<HashMap<u64, usize>> {
    let mut out = HashMap::new();
    for (i, id) in ids.enumerate() {
        if out.insert(id, i).is_some() {
            return Err(WrappedError::reference(format!("duplicate {what} id {id}")));
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/entity/model.rs"]
mod tests;
