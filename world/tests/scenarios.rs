use dungeon_crawl_core::{
    CellCoord, Command, Direction, Event, GameStatus, LevelSkip, LevelSlot, MonsterKind,
    PlayerCondition, MAX_HEALTH,
};
use dungeon_crawl_world::{self as world, query, GameSession, Level, LevelError};

fn run(session: &mut GameSession, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(session, command, &mut events);
    events
}

fn walk(session: &mut GameSession, direction: Direction) -> Vec<Event> {
    let mut events = run(session, Command::MovePlayer { direction });
    events.extend(finish_moves(session));
    events
}

fn finish_moves(session: &mut GameSession) -> Vec<Event> {
    let mut events = Vec::new();
    for movement in world::drain_moves(session) {
        world::apply(
            session,
            Command::CompleteMove {
                id: movement.id(),
                effect: movement.effect(),
            },
            &mut events,
        );
    }
    events
}

#[test]
fn last_stairway_finishes_the_campaign() {
    let level = Level::parse("finale", &[".x"], CellCoord::new(0, 0)).expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");

    let events = walk(&mut session, Direction::East);

    assert_eq!(query::status(&session), GameStatus::Finished);
    assert_eq!(
        events,
        vec![
            Event::StatusChanged {
                status: GameStatus::Finished
            },
            Event::MusicStopped,
        ]
    );
    assert_eq!(query::active_slot(&session), LevelSlot::Main(0));
    assert_eq!(query::player(&session).position(), CellCoord::new(0, 0));
}

#[test]
fn giant_kills_an_unarmored_player_in_one_bite() {
    let level = Level::parse("lair", &["..."], CellCoord::new(0, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Giant, CellCoord::new(1, 0), Direction::East, 1)
        })
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");

    let events = run(
        &mut session,
        Command::MovePlayer {
            direction: Direction::East,
        },
    );

    assert_eq!(query::player(&session).health(), 0);
    assert_eq!(query::status(&session), GameStatus::GameOver);
    assert!(events.contains(&Event::StatusChanged {
        status: GameStatus::GameOver
    }));
}

#[test]
fn game_over_is_final() {
    let level = Level::parse("lair", &["..."], CellCoord::new(0, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Giant, CellCoord::new(1, 0), Direction::East, 1)
        })
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");
    let _ = walk(&mut session, Direction::East);

    assert!(run(&mut session, Command::Tick).is_empty());
    assert!(run(&mut session, Command::DrinkPotion).is_empty());
    assert!(run(&mut session, Command::Quit).is_empty());
    assert_eq!(query::status(&session), GameStatus::GameOver);
}

#[test]
fn rat_steals_a_coin_instead_of_biting() {
    let level = Level::parse("burrow", &[".$$.."], CellCoord::new(0, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Rat, CellCoord::new(3, 0), Direction::East, 1)
        })
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");

    let _ = walk(&mut session, Direction::East);
    let _ = walk(&mut session, Direction::East);
    assert_eq!(query::player(&session).coins(), 2);

    let events = walk(&mut session, Direction::East);

    assert!(events.contains(&Event::CoinStolen { remaining: 1 }));
    assert_eq!(query::player(&session).coins(), 1);
    assert_eq!(query::player(&session).health(), MAX_HEALTH);
}

#[test]
fn spider_bite_poisons_until_healed() {
    let level = Level::parse("nest", &["..h"], CellCoord::new(0, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Spider, CellCoord::new(1, 0), Direction::North, 1)
        })
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");

    let _ = walk(&mut session, Direction::East);
    assert_eq!(query::player(&session).condition(), PlayerCondition::Poisoned);
    assert_eq!(query::player(&session).health(), MAX_HEALTH - 1);

    let _ = walk(&mut session, Direction::East);
    assert_eq!(query::player(&session).condition(), PlayerCondition::Normal);
    assert_eq!(query::player(&session).health(), MAX_HEALTH);
}

#[test]
fn hurt_cooldown_suppresses_damage_for_a_hundred_ticks() {
    let level = Level::parse("gauntlet", &[".ttt"], CellCoord::new(0, 0)).expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");

    let _ = walk(&mut session, Direction::East);
    assert_eq!(query::player(&session).health(), 4);

    for _ in 0..99 {
        let _ = run(&mut session, Command::Tick);
    }
    let _ = walk(&mut session, Direction::East);
    assert_eq!(query::player(&session).health(), 4);

    let _ = run(&mut session, Command::Tick);
    let _ = walk(&mut session, Direction::East);
    assert_eq!(query::player(&session).health(), 3);
}

#[test]
fn fireball_only_hits_after_arriving() {
    let level = Level::parse("range", &["...."], CellCoord::new(2, 0))
        .and_then(|level| level.with_fireball(CellCoord::new(1, 0), Direction::East, 8))
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");

    let events = run(&mut session, Command::Tick);
    assert!(events.is_empty());
    assert_eq!(
        query::active_level(&session).fireballs()[0].position(),
        CellCoord::new(2, 0)
    );

    let _ = finish_moves(&mut session);
    let events = run(&mut session, Command::Tick);

    assert!(events.contains(&Event::PlayerHurt {
        health: 4,
        armor: None
    }));
}

#[test]
fn level_skip_clamps_to_the_campaign() {
    let mut session = GameSession::campaign().expect("campaign");

    let events = run(
        &mut session,
        Command::SkipLevel {
            skip: LevelSkip::Backward,
        },
    );
    assert!(events.is_empty());

    for _ in 0..10 {
        let _ = run(
            &mut session,
            Command::SkipLevel {
                skip: LevelSkip::Forward,
            },
        );
    }
    let last = query::level_count(&session) - 1;
    assert_eq!(query::active_slot(&session), LevelSlot::Main(last));
    assert_eq!(
        query::player(&session).position(),
        query::active_level(&session).spawn()
    );
}

#[test]
fn saved_session_round_trips_without_animation_state() {
    let mut session = GameSession::campaign().expect("campaign");
    for _ in 0..3 {
        let _ = run(
            &mut session,
            Command::SkipLevel {
                skip: LevelSkip::Forward,
            },
        );
    }
    let _ = run(&mut session, Command::Tick);
    let roaming = query::active_level(&session).monsters().len();
    assert!(query::settled_monsters(&session).len() < roaming);

    let json = serde_json::to_string(&session).expect("serialize");
    let restored: GameSession = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(restored.validate(), Ok(()));
    assert_eq!(query::player(&restored), query::player(&session));
    assert!(query::pending_moves(&restored).is_empty());
    assert_eq!(
        query::settled_monsters(&restored).len(),
        query::active_level(&restored).monsters().len()
    );
}

fn restore_with(edit: impl FnOnce(&mut serde_json::Value)) -> GameSession {
    let session = GameSession::campaign().expect("campaign");
    let mut value = serde_json::to_value(&session).expect("serialize");
    edit(&mut value);
    serde_json::from_value(value).expect("deserialize")
}

#[test]
fn restored_session_with_a_dead_running_player_is_rejected() {
    let restored = restore_with(|value| value["player"]["health"] = serde_json::json!(0));
    assert!(matches!(
        restored.validate(),
        Err(LevelError::InvalidPlayer { .. })
    ));
}

#[test]
fn restored_session_with_spent_worn_armor_is_rejected() {
    let restored = restore_with(|value| {
        value["player"]["armor_worn"] = serde_json::json!(true);
        value["player"]["armor_health"] = serde_json::json!(0);
    });
    assert!(matches!(
        restored.validate(),
        Err(LevelError::InvalidPlayer { .. })
    ));

    let worn = restore_with(|value| value["player"]["armor_worn"] = serde_json::json!(true));
    assert_eq!(worn.validate(), Ok(()));
}
