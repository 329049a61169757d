use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    path::PathBuf,
};

use anyhow::Context;

use crate::{
    entity::{
        model::EntityMap,
        resolve::{GameResolver, resolve_entities},
    },
    foundation::error::WrappedResult,
    playlog::model::PlayLog,
};

/// Persisted snapshot of the whole resolved entity map.
pub trait EntityCache {
    fn load(&mut self) -> WrappedResult<Option<EntityMap>>;
    fn store(&mut self, entities: &EntityMap) -> WrappedResult<()>;
    fn invalidate(&mut self) -> WrappedResult<()>;
}

/// [`EntityCache`] stored as a single JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntityCache for JsonFileCache {
    fn load(&mut self) -> WrappedResult<Option<EntityMap>> {
        let f = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("open entity cache '{}'", self.path.display()))
                    .into());
            }
        };
        let map: EntityMap = serde_json::from_reader(BufReader::new(f))?;
        Ok(Some(map))
    }

    fn store(&mut self, entities: &EntityMap) -> WrappedResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir '{}'", parent.display()))?;
        }
        let f = File::create(&self.path)
            .with_context(|| format!("create entity cache '{}'", self.path.display()))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer(&mut w, entities)?;
        w.flush()
            .with_context(|| format!("flush entity cache '{}'", self.path.display()))?;
        Ok(())
    }

    fn invalidate(&mut self) -> WrappedResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove entity cache '{}'", self.path.display()))
                .into()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CachePolicy {
    /// Read a previously stored map and store freshly resolved ones.
    pub use_cache: bool,
    /// Discard the stored map before the run.
    pub refresh: bool,
}

/// Return the cached entity map when allowed and present, otherwise resolve from `log`.
pub fn load_or_resolve(
    policy: CachePolicy,
    cache: &mut dyn EntityCache,
    log: &PlayLog,
    resolver: &mut dyn GameResolver,
) -> WrappedResult<EntityMap> {
    if policy.refresh {
        tracing::warn!("entity cache invalidated by refresh request");
        cache.invalidate()?;
    }

    if policy.use_cache {
        if let Some(map) = cache.load()? {
            tracing::info!(
                games = map.games.len(),
                players = map.players.len(),
                "entity cache hit"
            );
            return Ok(map);
        }
        tracing::info!("entity cache miss");
    }

    let map = resolve_entities(log, resolver)?;
    if policy.use_cache {
        cache.store(&map)?;
    }
    Ok(map)
}

#[cfg(test)]
#[path = "../../tests/unit/entity/cache.rs"]
mod tests;
