use super::*;
use crate::{
    entity::model::{Game, GameMetadata},
    foundation::error::WrappedError,
    playlog::model::LogGame,
};

#[derive(Default)]
struct MemCache {
    map: Option<EntityMap>,
    stores: usize,
    invalidations: usize,
}

impl EntityCache for MemCache {
    fn load(&mut self) -> WrappedResult<Option<EntityMap>> {
        Ok(self.map.clone())
    }

    fn store(&mut self, entities: &EntityMap) -> WrappedResult<()> {
        self.stores += 1;
        self.map = Some(entities.clone());
        Ok(())
    }

    fn invalidate(&mut self) -> WrappedResult<()> {
        self.invalidations += 1;
        self.map = None;
        Ok(())
    }
}

struct FailingResolver;

impl GameResolver for FailingResolver {
    fn resolve(&mut self, _bgg_id: u64, _name: &str) -> WrappedResult<GameMetadata> {
        Err(WrappedError::lookup("offline"))
    }
}

struct StaticResolver;

impl GameResolver for StaticResolver {
    fn resolve(&mut self, _bgg_id: u64, _name: &str) -> WrappedResult<GameMetadata> {
        Ok(GameMetadata {
            image: "img".to_string(),
            mechanics: vec![],
        })
    }
}

fn log() -> PlayLog {
    PlayLog {
        games: vec![LogGame {
            id: 1,
            bgg_id: 5,
            name: "Five".to_string(),
        }],
        players: vec![],
        plays: vec![],
    }
}

fn cached_map() -> EntityMap {
    EntityMap {
        games: vec![Game::placeholder(1, "Cached")],
        players: vec![],
    }
}

#[test]
fn cache_hit_skips_resolution() {
    let mut cache = MemCache {
        map: Some(cached_map()),
        ..Default::default()
    };
    let policy = CachePolicy {
        use_cache: true,
        refresh: false,
    };
    let map = load_or_resolve(policy, &mut cache, &log(), &mut FailingResolver).unwrap();
    assert_eq!(map, cached_map());
    assert_eq!(cache.stores, 0);
}

#[test]
fn refresh_discards_cache_and_stores_fresh_map() {
    let mut cache = MemCache {
        map: Some(cached_map()),
        ..Default::default()
    };
    let policy = CachePolicy {
        use_cache: true,
        refresh: true,
    };
    let map = load_or_resolve(policy, &mut cache, &log(), &mut StaticResolver).unwrap();
    assert_eq!(map.games[0].name, "Five");
    assert_eq!(cache.invalidations, 1);
    assert_eq!(cache.stores, 1);
}

#[test]
fn disabled_cache_is_never_read_or_written() {
    let mut cache = MemCache {
        map: Some(cached_map()),
        ..Default::default()
    };
    let map =
        load_or_resolve(CachePolicy::default(), &mut cache, &log(), &mut StaticResolver).unwrap();
    assert_eq!(map.games[0].name, "Five");
    assert_eq!(cache.stores, 0);
    assert!(cache.map.is_some());
}

#[test]
fn json_file_cache_roundtrip_and_invalidate() {
    let dir = std::path::PathBuf::from("target").join("entity_cache_unit");
    let _ = std::fs::remove_dir_all(&dir);
    let mut cache = JsonFileCache::new(dir.join("nested").join("entities.json"));

    assert!(cache.load().unwrap().is_none());
    cache.store(&cached_map()).unwrap();
    assert_eq!(cache.load().unwrap(), Some(cached_map()));

    cache.invalidate().unwrap();
    assert!(cache.load().unwrap().is_none());
    cache.invalidate().unwrap();
}
