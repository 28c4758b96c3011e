use dungeon_crawl_core::{PlayerCondition, TILE_SIZE};
use dungeon_crawl_rendering::{Hud, Overlay, Scene, SceneSprite, SpriteKey};
use dungeon_crawl_system_animation::MoveTracker;
use dungeon_crawl_system_presentation::{PresentationContext, Screen};
use dungeon_crawl_world::{query, GameSession};

/// Rebuilds `scene` from the current session, animations and screen.
pub(crate) fn populate(
    scene: &mut Scene,
    session: &GameSession,
    tracker: &MoveTracker,
    context: &PresentationContext,
) {
    scene.clear();
    scene.overlay = overlay_for(context.screen());
    scene.message = context.message().map(str::to_owned);

    let level = query::active_level(session);
    scene.columns = level.columns();
    scene.rows = level.rows();
    scene.tiles.extend(
        level
            .tiles()
            .map(|(cell, tile)| SceneSprite::at_cell(SpriteKey::for_tile(tile), cell)),
    );

    scene.props.extend(
        level
            .teleporters()
            .iter()
            .map(|teleporter| SceneSprite::at_cell(SpriteKey::Teleporter, teleporter.position())),
    );
    scene.props.extend(
        level
            .chests()
            .iter()
            .filter(|chest| !chest.is_opened())
            .map(|chest| SceneSprite::at_cell(SpriteKey::Chest, chest.position())),
    );

    scene.actors.extend(
        level
            .fireballs()
            .iter()
            .filter(|fireball| fireball.is_settled())
            .map(|fireball| SceneSprite::at_cell(SpriteKey::Fireball, fireball.position())),
    );
    scene.actors.extend(
        level
            .monsters()
            .iter()
            .filter(|monster| monster.is_settled())
            .map(|monster| {
                SceneSprite::at_cell(SpriteKey::for_monster(monster.kind()), monster.position())
            }),
    );
    scene.actors.extend(tracker.active().iter().map(|movement| {
        SceneSprite::in_flight(
            SpriteKey::for_move(movement.sprite()),
            movement.origin(),
            movement.offset(),
            TILE_SIZE,
        )
    }));

    let player = query::player(session);
    if !tracker.is_player_moving() {
        let key = if player.armor_worn() {
            SpriteKey::ArmoredPlayer
        } else {
            SpriteKey::Player
        };
        scene.actors.push(SceneSprite::at_cell(key, player.position()));
    }

    scene.hud = Hud {
        level_title: level.title().to_owned(),
        health: player.health(),
        coins: player.coins(),
        armor: player.armor_worn().then_some(player.armor_health()),
        poisoned: player.condition() == PlayerCondition::Poisoned,
        inventory: player
            .inventory()
            .iter()
            .map(|item| SpriteKey::for_item(*item))
            .collect(),
    };
}

fn overlay_for(screen: Screen) -> Option<Overlay> {
    match screen {
        Screen::Title => Some(Overlay::Title),
        Screen::Instructions => Some(Overlay::Instructions),
        Screen::Playing => None,
        Screen::GameOver => Some(Overlay::GameOver),
        Screen::Victory => Some(Overlay::Victory),
    }
}
