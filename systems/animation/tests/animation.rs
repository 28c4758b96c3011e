use dungeon_crawl_core::{CellCoord, Command, Direction, Event, MonsterKind, TILE_SIZE};
use dungeon_crawl_system_animation::MoveTracker;
use dungeon_crawl_world::{self as world, query, GameSession, Level};

fn apply_all(session: &mut GameSession, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(session, command, &mut events);
    }
    events
}

#[test]
fn trap_damage_lands_when_the_animation_arrives() {
    let level = Level::parse("pit", &[".t."], CellCoord::new(0, 0)).expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");
    let mut tracker = MoveTracker::new();

    let _ = apply_all(
        &mut session,
        vec![Command::MovePlayer {
            direction: Direction::East,
        }],
    );
    tracker.absorb(world::drain_moves(&mut session));

    let mut frames = 0;
    while tracker.is_player_moving() {
        let mut commands = Vec::new();
        tracker.advance_frame(TILE_SIZE, &mut commands);
        let _ = apply_all(&mut session, commands);
        frames += 1;
        if frames < 5 {
            assert_eq!(query::player(&session).health(), 5);
        }
    }

    assert_eq!(frames, 5);
    assert_eq!(query::player(&session).health(), 4);
}

#[test]
fn monsters_settle_once_their_move_is_reported() {
    let level = Level::parse("hall", &["....."], CellCoord::new(0, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Skeleton, CellCoord::new(2, 0), Direction::East, 16)
        })
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");
    let mut tracker = MoveTracker::new();

    let _ = apply_all(&mut session, vec![Command::Tick]);
    tracker.absorb(world::drain_moves(&mut session));
    assert!(query::settled_monsters(&session).is_empty());

    for _ in 0..4 {
        let mut commands = Vec::new();
        tracker.advance_frame(TILE_SIZE, &mut commands);
        let _ = apply_all(&mut session, commands);
    }

    assert_eq!(query::settled_monsters(&session).len(), 1);
    assert!(tracker.active().is_empty());
}

#[test]
fn entering_a_level_settles_abandoned_moves() {
    let first = Level::parse("first", &["..x", "..."], CellCoord::new(1, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Rat, CellCoord::new(0, 1), Direction::East, 1)
        })
        .expect("valid level");
    let second = Level::parse("second", &["..."], CellCoord::new(0, 0)).expect("valid level");
    let mut session = GameSession::new(vec![first, second], Vec::new()).expect("session");
    let mut tracker = MoveTracker::new();

    let _ = apply_all(&mut session, vec![Command::Tick]);
    tracker.absorb(world::drain_moves(&mut session));
    assert_eq!(tracker.active().len(), 1);

    let events = apply_all(
        &mut session,
        vec![Command::MovePlayer {
            direction: Direction::East,
        }],
    );
    let mut commands = Vec::new();
    tracker.handle(&events, &mut commands);

    assert_eq!(commands.len(), 1);
    assert!(tracker.active().is_empty());
    let _ = apply_all(&mut session, commands);
    assert_eq!(query::active_level(&session).title(), "second");
}

#[test]
fn moves_queued_in_the_frame_that_changes_level_are_dropped() {
    let first = Level::parse("one", &["x..", "..."], CellCoord::new(1, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Skeleton, CellCoord::new(0, 1), Direction::East, 1)
        })
        .expect("valid level");
    let second = Level::parse("two", &["..."], CellCoord::new(0, 0)).expect("valid level");
    let mut session = GameSession::new(vec![first, second], Vec::new()).expect("session");
    let mut tracker = MoveTracker::new();

    let mut events = apply_all(&mut session, vec![Command::Tick]);
    events.extend(apply_all(
        &mut session,
        vec![Command::MovePlayer {
            direction: Direction::West,
        }],
    ));
    let mut commands = Vec::new();
    tracker.handle(&events, &mut commands);
    let _ = apply_all(&mut session, commands);
    tracker.absorb(world::drain_moves(&mut session));

    assert_eq!(query::active_level(&session).title(), "two");
    assert!(tracker.active().is_empty());
    assert!(query::pending_moves(&session).is_empty());
}
