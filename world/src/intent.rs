//! Resolution of a single directional step requested by the player.

use dungeon_crawl_core::{
    CellCoord, Direction, Event, GameStatus, Item, LevelSlot, Move, MoveEffect, MoveSprite, Tile,
    ARMOR_CAPACITY, FALLING_WALL_SPEED, PLAYER_SPEED,
};
use tracing::{debug, info};

use crate::{combat, GameSession};

/// Applies one step of player intent, including every tile and entity interaction.
pub(crate) fn apply_player_intent(
    session: &mut GameSession,
    direction: Direction,
    out_events: &mut Vec<Event>,
) {
    let from = session.player.position;
    let Some(target) = from.step(direction) else {
        return;
    };
    if !session.active_level().contains(target) {
        return;
    }

    let original = session.active_level().tile_at(target);
    let mut movement = original.starts_player_move().then(|| {
        let sprite = if session.player.armor_worn {
            MoveSprite::ArmoredPlayer
        } else {
            MoveSprite::Player
        };
        let id = session.moves.allocate();
        Move::toward(id, sprite, from, direction, PLAYER_SPEED)
    });

    match original {
        Tile::Coin => {
            session.active_level_mut().set_tile(target, Tile::Floor);
            session.player.coins += 1;
            out_events.push(Event::CoinCollected {
                cell: target,
                total: session.player.coins,
            });
        }
        Tile::Trap => {
            session.active_level_mut().set_tile(target, Tile::Floor);
            movement = movement.map(|pending| pending.with_effect(MoveEffect::Damage));
            out_events.push(Event::TrapSprung { cell: target });
        }
        Tile::Potion => {
            session.active_level_mut().set_tile(target, Tile::Floor);
            movement = movement.map(|pending| pending.with_effect(MoveEffect::Heal));
            out_events.push(Event::PotionConsumed { cell: target });
        }
        Tile::Key => {
            session.player.inventory.push(Item::Key);
            session.active_level_mut().set_tile(target, Tile::Floor);
            out_events.push(Event::KeyCollected { cell: target });
        }
        Tile::ClosedDoor => {
            if session.player.take(Item::Key) {
                session.active_level_mut().set_tile(target, Tile::OpenDoor);
                out_events.push(Event::DoorUnlocked { cell: target });
            }
        }
        _ => {}
    }

    open_chest_at(session, target, out_events);

    if !session.player.armor_worn && session.player.take(Item::Armor) {
        session.player.armor_health = ARMOR_CAPACITY;
    }

    let resolved = session.active_level().tile_at(target);
    if resolved.is_walkable() {
        session.player.position = target;
        out_events.push(Event::PlayerMoved { from, to: target });
        if let Some(pending) = movement {
            session.moves.enqueue(pending);
        }
    }

    teleport(session, out_events);

    match resolved {
        Tile::StairsDown => {
            if descend(session, out_events) {
                return;
            }
        }
        Tile::StairsUp => ascend(session, out_events),
        _ => {}
    }

    trip_switch(session, out_events);
    combat::resolve_collisions(session, out_events);
}

fn open_chest_at(
    session: &mut GameSession,
    target: CellCoord,
    out_events: &mut Vec<Event>,
) {
    let contents = session
        .active_level_mut()
        .chests_mut()
        .iter_mut()
        .find(|chest| chest.position() == target)
        .and_then(|chest| chest.open());
    let Some(contents) = contents else {
        return;
    };

    info!(?contents, column = target.column(), row = target.row(), "chest opened");
    out_events.push(Event::ChestOpened {
        cell: target,
        contents,
    });
    match contents {
        Item::Armor => session.equip_armor(out_events),
        other => session.player.inventory.push(other),
    }
}

fn teleport(session: &mut GameSession, out_events: &mut Vec<Event>) {
    let position = session.player.position;
    let destination = session
        .active_level()
        .teleporters()
        .iter()
        .find(|teleporter| teleporter.position() == position)
        .map(|teleporter| teleporter.target());
    if let Some(to) = destination {
        session.player.position = to;
        out_events.push(Event::Teleported { from: position, to });
    }
}

/// Takes the stairs down. Returns whether the campaign just finished.
fn descend(session: &mut GameSession, out_events: &mut Vec<Event>) -> bool {
    session.level_index += 1;
    if session.level_index < session.levels.len() {
        session.enter_level(LevelSlot::Main(session.level_index), out_events);
        return false;
    }

    info!(coins = session.player.coins, "campaign finished");
    let _ = session.transition(GameStatus::Finished, out_events);
    out_events.push(Event::MusicStopped);
    true
}

fn ascend(session: &mut GameSession, out_events: &mut Vec<Event>) {
    let index = session.secret_level_index;
    if index >= session.secret_levels.len() {
        debug!(index, "no secret level left behind the stairway");
        return;
    }
    session.secret_level_index += 1;
    session.enter_level(LevelSlot::Secret(index), out_events);
}

fn trip_switch(session: &mut GameSession, out_events: &mut Vec<Event>) {
    let position = session.player.position;
    let (level, ledger) = session.level_and_ledger();
    let Some(door) = level
        .switches()
        .iter()
        .find(|switch| switch.position() == position)
        .map(|switch| switch.door())
    else {
        return;
    };
    if level.tile_at(door) != Tile::Wall {
        return;
    }

    level.set_tile(door, Tile::StairsUp);
    let id = ledger.allocate();
    ledger.enqueue(Move::new(
        id,
        MoveSprite::FallingWall,
        door,
        0,
        FALLING_WALL_SPEED,
    ));
    info!(column = door.column(), row = door.row(), "secret passage opened");
    out_events.push(Event::SecretPassageOpened { cell: door });
}
