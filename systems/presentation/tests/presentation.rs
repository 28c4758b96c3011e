use dungeon_crawl_core::{CellCoord, Command, Direction, Event, MonsterKind};
use dungeon_crawl_system_presentation::{Music, PresentationContext, Screen};
use dungeon_crawl_world::{self as world, GameSession, Level};

fn step_east(session: &mut GameSession) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(
        session,
        Command::MovePlayer {
            direction: Direction::East,
        },
        &mut events,
    );
    events
}

#[test]
fn game_over_switches_screen_and_silences_music() {
    let level = Level::parse("lair", &["..."], CellCoord::new(0, 0))
        .and_then(|level| {
            level.with_monster(MonsterKind::Giant, CellCoord::new(1, 0), Direction::South, 1)
        })
        .expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");
    let mut context = PresentationContext::playing();
    assert_eq!(context.music(), Music::Playing);

    context.handle(&step_east(&mut session));

    assert_eq!(context.screen(), Screen::GameOver);
    assert_eq!(context.music(), Music::Stopped);
}

#[test]
fn final_stairway_shows_the_victory_screen() {
    let level = Level::parse("finale", &[".x"], CellCoord::new(0, 0)).expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");
    let mut context = PresentationContext::playing();

    context.handle(&step_east(&mut session));

    assert_eq!(context.screen(), Screen::Victory);
    assert_eq!(context.music(), Music::Stopped);
}

#[test]
fn ordinary_steps_leave_presentation_alone() {
    let level = Level::parse("hall", &["..."], CellCoord::new(0, 0)).expect("valid level");
    let mut session = GameSession::new(vec![level], Vec::new()).expect("session");
    let mut context = PresentationContext::playing();

    context.handle(&step_east(&mut session));

    assert_eq!(context.screen(), Screen::Playing);
    assert_eq!(context.music(), Music::Playing);
}
