use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::Path,
    time::{Duration, Instant},
};

use anyhow::Context;

use crate::{
    entity::model::{EntityMap, Game, GameMetadata, Player},
    foundation::error::{WrappedError, WrappedResult},
    playlog::model::PlayLog,
};

/// Source of per-game metadata for games with an external id.
///
/// Implementations either return fully populated metadata or fail; the core never receives a
/// partially resolved game.
pub trait GameResolver {
    fn resolve(&mut self, bgg_id: u64, name: &str) -> WrappedResult<GameMetadata>;
}

/// Offline resolver backed by a JSON object mapping external id to metadata.
#[derive(Clone, Debug, Default)]
pub struct MetadataFileResolver {
    entries: HashMap<u64, GameMetadata>,
}

impl MetadataFileResolver {
    pub fn from_path(path: &Path) -> WrappedResult<Self> {
        let f = File::open(path)
            .with_context(|| format!("open game metadata '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn from_reader(r: impl std::io::Read) -> WrappedResult<Self> {
        let raw: HashMap<String, GameMetadata> = serde_json::from_reader(r)?;
        let mut entries = HashMap::with_capacity(raw.len());
        for (k, v) in raw {
            let id = k
                .trim()
                .parse::<u64>()
                .map_err(|_| WrappedError::serde(format!("invalid metadata key '{k}'")))?;
            entries.insert(id, v);
        }
        Ok(Self { entries })
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (u64, GameMetadata)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl GameResolver for MetadataFileResolver {
    fn resolve(&mut self, bgg_id: u64, name: &str) -> WrappedResult<GameMetadata> {
        self.entries.get(&bgg_id).cloned().ok_or_else(|| {
            WrappedError::lookup(format!("no metadata for '{name}' (external id {bgg_id})"))
        })
    }
}

/// Enforces a fixed delay between sequential calls to the wrapped resolver.
pub struct ThrottledResolver<R> {
    inner: R,
    delay: Duration,
    last_call: Option<Instant>,
}

impl<R: GameResolver> ThrottledResolver<R> {
    pub fn new(inner: R, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            last_call: None,
        }
    }
}

impl<R: GameResolver> GameResolver for ThrottledResolver<R> {
    fn resolve(&mut self, bgg_id: u64, name: &str) -> WrappedResult<GameMetadata> {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                std::thread::sleep(self.delay - elapsed);
            }
        }
        let out = self.inner.resolve(bgg_id, name);
        self.last_call = Some(Instant::now());
        out
    }
}

/// Build the entity catalogs for `log`, in log order.
#[tracing::instrument(skip_all, fields(games = log.games.len(), players = log.players.len()))]
pub fn resolve_entities(log: &PlayLog, resolver: &mut dyn GameResolver) -> WrappedResult<EntityMap> {
    let count = log.games.len();
    let mut games = Vec::with_capacity(count);
    for (i, g) in log.games.iter().enumerate() {
        let game = if g.bgg_id == 0 {
            Game::placeholder(g.id, g.name.clone())
        } else {
            let meta = resolver.resolve(g.bgg_id, &g.name)?;
            Game::resolved(g.id, g.name.clone(), g.bgg_id, meta)
        };
        tracing::info!("resolved game {} {}/{}", g.name, i + 1, count);
        games.push(game);
    }

    let players = log
        .players
        .iter()
        .map(|p| Player {
            id: p.id,
            name: p.name.clone(),
        })
        .collect();

    Ok(EntityMap { games, players })
}

#[cfg(test)]
#[path = "../../tests/unit/entity/resolve.rs"]
mod tests;
