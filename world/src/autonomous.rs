//! Per-tick movement of fireballs and monsters.

use dungeon_crawl_core::{CellCoord, Event, Move, MoveSprite};

use crate::{combat, GameSession, Level};

/// Moves every settled fireball and monster one cell, ticks the hurt
/// cooldown down, and resolves collisions before and after movement.
pub(crate) fn advance(session: &mut GameSession, out_events: &mut Vec<Event>) {
    combat::resolve_collisions(session, out_events);

    let (level, ledger) = session.level_and_ledger();

    for index in 0..level.fireballs().len() {
        let fireball = &level.fireballs()[index];
        if !fireball.is_settled() {
            continue;
        }
        let origin = fireball.position();
        let facing = fireball.facing();
        let speed = fireball.speed();
        match passable(level, origin.step(facing)) {
            Some(destination) => {
                let id = ledger.allocate();
                ledger.enqueue(Move::toward(id, MoveSprite::Fireball, origin, facing, speed));
                level.fireballs_mut()[index].launch(destination, id);
            }
            None => level.fireballs_mut()[index].bounce(),
        }
    }

    for index in 0..level.monsters().len() {
        let monster = &level.monsters()[index];
        if !monster.is_settled() {
            continue;
        }
        let origin = monster.position();
        let facing = monster.facing();
        let speed = monster.speed();
        let sprite = MoveSprite::Monster(monster.kind());
        match passable(level, origin.step(facing)) {
            Some(destination) => {
                let id = ledger.allocate();
                ledger.enqueue(Move::toward(id, sprite, origin, facing, speed));
                level.monsters_mut()[index].launch(destination, id);
            }
            None => level.monsters_mut()[index].face(facing.reverse()),
        }
    }

    session.player.hurt_cooldown = session.player.hurt_cooldown.saturating_sub(1);
    combat::resolve_collisions(session, out_events);
}

fn passable(level: &Level, cell: Option<CellCoord>) -> Option<CellCoord> {
    cell.filter(|cell| level.contains(*cell) && level.tile_at(*cell).is_fly_over())
}
