use dungeon_crawl_core::{CellCoord, Direction, MonsterKind, PlayerCondition};
use dungeon_crawl_system_controls::{Controls, Request};
use dungeon_crawl_world::{self as world, query, GameSession, Level};

fn press(session: &mut GameSession, key: char) {
    let condition = query::player(session).condition();
    let Some(command) = Controls::translate(key, condition).and_then(Request::command) else {
        return;
    };
    let mut events = Vec::new();
    world::apply(session, command, &mut events);
}

#[test]
fn poisoned_player_walks_against_the_pressed_key() {
    let level = Level::parse("nest", &["....."], CellCoord::new(1, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Spider, CellCoord::new(2, 0), Direction::North, 1)
        })
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");

    press(&mut session, 'd');
    assert_eq!(query::player(&session).position(), CellCoord::new(2, 0));
    assert_eq!(query::player(&session).condition(), PlayerCondition::Poisoned);

    press(&mut session, 'd');
    assert_eq!(query::player(&session).position(), CellCoord::new(1, 0));
}

#[test]
fn quit_key_ends_the_session() {
    let mut session = GameSession::campaign().expect("campaign");
    press(&mut session, 'q');
    assert!(query::status(&session).is_terminal());
}
