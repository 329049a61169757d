use super::*;
use crate::{
    entity::model::{EntityMap, Game, GameMetadata, Player},
    playlog::model::{Play, PlayLog, PlayerScore},
    stats::aggregate::aggregate,
};

fn counter(entries: &[(i32, u64)]) -> PeriodCounter {
    let mut c = PeriodCounter::new();
    for &(y, n) in entries {
        c.add(y, n);
    }
    c
}

#[test]
fn filters_zero_and_sorts_descending() {
    let items = vec![
        ("a", counter(&[(2023, 1)])),
        ("b", counter(&[(2024, 9)])),
        ("c", counter(&[(2023, 4)])),
    ];
    let out = rank_by(&items, Period::Year(2023), DEFAULT_LIMIT, |(_, c)| c);

    let names: Vec<_> = out.iter().map(|e| e.item.0).collect();
    assert_eq!(names, vec!["c", "a"]);
    assert_eq!(out[0].rank, 1);
    assert_eq!(out[0].index, 2);
    assert_eq!(out[1].count, 1);
}

#[test]
fn ties_keep_input_order() {
    let items = vec![
        ("first", counter(&[(2023, 3)])),
        ("top", counter(&[(2023, 5)])),
        ("second", counter(&[(2023, 3)])),
        ("third", counter(&[(2023, 3)])),
    ];
    let out = rank_by(&items, Period::Year(2023), 10, |(_, c)| c);
    let names: Vec<_> = out.iter().map(|e| e.item.0).collect();
    assert_eq!(names, vec!["top", "first", "second", "third"]);
}

#[test]
fn limit_larger_than_population_returns_everything() {
    let items = vec![("only", counter(&[(2023, 2)]))];
    assert_eq!(rank_by(&items, Period::AllTime, 50, |(_, c)| c).len(), 1);
    assert!(rank_by(&items, Period::AllTime, 0, |(_, c)| c).is_empty());
}

#[test]
fn empty_period_yields_empty_ranking() {
    let items = vec![("a", counter(&[(2023, 2)]))];
    assert!(rank_by(&items, Period::Year(2030), 5, |(_, c)| c).is_empty());
}

fn play(date: &str, game: u64, ignored: bool) -> Play {
    Play {
        play_date: date.to_string(),
        game_ref_id: game,
        ignored,
        player_scores: vec![PlayerScore {
            player_ref_id: 1,
            winner: false,
            start_player: false,
        }],
    }
}

/// Two games, one player: A has 5 plays in 2023 and 2 in 2024, B has 3 in 2023.
/// Two of the 2023 plays of A are ignored.
fn scenario() -> (PlayLog, EntityMap) {
    let mut plays = Vec::new();
    for d in 1..=5 {
        plays.push(play(&format!("2023-06-0{d} 18:00:00"), 100, d <= 2));
    }
    for d in 1..=2 {
        plays.push(play(&format!("2024-01-0{d} 18:00:00"), 100, false));
    }
    for d in 1..=3 {
        plays.push(play(&format!("2023-07-0{d} 18:00:00"), 200, false));
    }
    let log = PlayLog {
        plays,
        ..Default::default()
    };
    let entities = EntityMap {
        games: vec![Game::placeholder(200, "B"), Game::placeholder(100, "A")],
        players: vec![Player {
            id: 1,
            name: "Solo".to_string(),
        }],
    };
    (log, entities)
}

#[test]
fn scenario_rankings_and_counted_plays() {
    let (log, entities) = scenario();
    let agg = aggregate(&log, &entities).unwrap();

    let y2023 = agg.rank(RankSource::Games, Period::Year(2023), DEFAULT_LIMIT);
    assert_eq!(
        y2023
            .iter()
            .map(|r| (r.label.as_str(), r.count))
            .collect::<Vec<_>>(),
        vec![("A", 5), ("B", 3)]
    );

    let all = agg.rank(RankSource::Games, Period::AllTime, DEFAULT_LIMIT);
    assert_eq!(
        all.iter()
            .map(|r| (r.label.as_str(), r.count))
            .collect::<Vec<_>>(),
        vec![("A", 7), ("B", 3)]
    );

    let solo = &agg.players[0];
    assert_eq!(solo.plays.get(Period::AllTime), 10);
    assert_eq!(solo.counted_plays.get(Period::AllTime), 8);
    assert_eq!(solo.counted_plays.get(Period::Year(2023)), 8 - 2);

    let players = agg.rank(
        RankSource::Players {
            metric: PlayerMetric::CountedPlays,
        },
        Period::Year(2023),
        DEFAULT_LIMIT,
    );
    assert_eq!(players[0].count, 6);
}

#[test]
fn independent_runs_rank_identically() {
    let (log, entities) = scenario();
    let a = aggregate(&log, &entities).unwrap();
    let b = aggregate(&log, &entities).unwrap();
    for period in [Period::Year(2023), Period::Year(2024), Period::AllTime] {
        for source in [
            RankSource::Games,
            RankSource::Mechanics,
            RankSource::Players {
                metric: PlayerMetric::Plays,
            },
        ] {
            assert_eq!(a.rank(source, period, 5), b.rank(source, period, 5));
        }
    }
}

#[test]
fn rank_source_json_shape() {
    let s: RankSource =
        serde_json::from_str(r#"{"kind": "players", "metric": "counted_wins"}"#).unwrap();
    assert_eq!(
        s,
        RankSource::Players {
            metric: PlayerMetric::CountedWins
        }
    );
    let g: RankSource = serde_json::from_str(r#"{"kind": "games"}"#).unwrap();
    assert_eq!(g, RankSource::Games);
}

#[test]
fn mechanic_ties_follow_first_appearance_within_the_period() {
    let meta = |m: &str| GameMetadata {
        image: format!("{m}.png"),
        mechanics: vec![m.to_string()],
    };
    let log = PlayLog {
        plays: vec![
            play("2022-03-01 18:00:00", 1, false),
            play("2023-03-01 18:00:00", 2, false),
            play("2023-04-01 18:00:00", 1, false),
        ],
        ..Default::default()
    };
    let entities = EntityMap {
        games: vec![
            Game::resolved(1, "Gx", 11, meta("X")),
            Game::resolved(2, "Gy", 22, meta("Y")),
        ],
        players: vec![Player {
            id: 1,
            name: "Solo".to_string(),
        }],
    };
    let agg = aggregate(&log, &entities).unwrap();

    let rows = |period| {
        agg.rank(RankSource::Mechanics, period, DEFAULT_LIMIT)
            .into_iter()
            .map(|r| (r.label, r.count, r.index))
            .collect::<Vec<_>>()
    };
    assert_eq!(
        rows(Period::Year(2023)),
        vec![("Y".to_string(), 1, 1), ("X".to_string(), 1, 0)]
    );
    assert_eq!(
        rows(Period::AllTime),
        vec![("X".to_string(), 2, 0), ("Y".to_string(), 1, 1)]
    );
    assert_eq!(rows(Period::Year(2022)), vec![("X".to_string(), 1, 0)]);
    assert!(rows(Period::Year(2021)).is_empty());
}
