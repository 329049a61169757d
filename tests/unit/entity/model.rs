use super::*;

fn meta() -> GameMetadata {
    GameMetadata {
        image: "https://example.invalid/azul.jpg".to_string(),
        mechanics: vec!["Tile Placement".to_string(), "Set Collection".to_string()],
    }
}

#[test]
fn placeholder_has_local_cover_and_no_mechanics() {
    let g = Game::placeholder(7, "Homebrew");
    assert!(g.mechanics().is_empty());
    assert_eq!(g.cover_art(), CoverArt::Local(PLACEHOLDER_COVER.to_string()));
}

#[test]
fn resolved_game_exposes_metadata() {
    let g = Game::resolved(1, "Azul", 230802, meta());
    assert_eq!(g.mechanics().len(), 2);
    assert_eq!(
        g.cover_art(),
        CoverArt::Remote {
            bgg_id: 230802,
            uri: "https://example.invalid/azul.jpg".to_string()
        }
    );
}

#[test]
fn entity_map_roundtrips_through_json() {
    let map = EntityMap {
        games: vec![Game::resolved(1, "Azul", 230802, meta()), Game::placeholder(2, "X")],
        players: vec![Player {
            id: 3,
            name: "Ada".to_string(),
        }],
    };
    let s = serde_json::to_string(&map).unwrap();
    let back: EntityMap = serde_json::from_str(&s).unwrap();
    assert_eq!(back, map);
}

#[test]
fn duplicate_ids_are_rejected_when_indexing() {
    let map = EntityMap {
        games: vec![Game::placeholder(1, "A"), Game::placeholder(1, "B")],
        players: vec![],
    };
    assert!(matches!(
        map.game_index().unwrap_err(),
        WrappedError::Reference(_)
    ));
    assert!(map.player_index().unwrap().is_empty());
}
