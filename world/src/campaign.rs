//! Built-in campaign levels.

use dungeon_crawl_core::{
    CellCoord,
    Direction::{East, North, South, West},
    Item,
    MonsterKind::{Giant, Rat, Skeleton, Spider},
};

use crate::level::{Level, LevelError};

/// Main levels followed by secret levels, in campaign order.
pub(crate) type Campaign = (Vec<Level>, Vec<Level>);

const fn at(column: u32, row: u32) -> CellCoord {
    CellCoord::new(column, row)
}

/// Builds every level of the campaign from its blueprint.
pub(crate) fn build() -> Result<Campaign, LevelError> {
    let levels = vec![
        level_one()?,
        level_two()?,
        level_three()?,
        level_four()?,
        level_five()?,
        level_six()?,
        level_seven()?,
    ];
    let secret_levels = vec![secret_level_one()?];
    Ok((levels, secret_levels))
}

fn level_one() -> Result<Level, LevelError> {
    Level::parse(
        "Level 1",
        &[
            "##########",
            "#..$..$..#",
            "#........#",
            "#######..#",
            "#........#",
            "#.#$..$..#",
            "#.#......#",
            "#.########",
            "#.......x#",
            "##########",
        ],
        at(1, 1),
    )?
    .with_switch(at(8, 6), at(8, 7))
}

fn level_two() -> Result<Level, LevelError> {
    Level::parse(
        "Level 2",
        &[
            "##########",
            "#...###.$#",
            "#.$..h...#",
            "#.$.##...#",
            "#.$.####.#",
            "#......#t#",
            "#wwww#.#.#",
            "#wffw#.#.#",
            "#wwww#x#.#",
            "##########",
        ],
        at(8, 8),
    )?
    .with_monster(Rat, at(2, 5), South, 1)
}

fn level_three() -> Result<Level, LevelError> {
    Level::parse(
        "Level 3",
        &[
            "##########",
            "#........#",
            "#...##.k.#",
            "##d###...#",
            "#...##...#",
            "#.h.##...#",
            "#...##...#",
            "#w.w####.#",
            "#wxw##...#",
            "##########",
        ],
        at(6, 8),
    )?
    .with_fireball(at(6, 2), East, 1)?
    .with_fireball(at(8, 5), West, 1)
}

fn level_four() -> Result<Level, LevelError> {
    Level::parse(
        "Level 4",
        &[
            "##########",
            "#....h..x#",
            "#d########",
            "#........#",
            "#..$.....#",
            "#........#",
            "#....$...#",
            "##.#.....#",
            "##.#.....#",
            "##########",
        ],
        at(2, 8),
    )?
    .with_fireball(at(8, 3), South, 2)?
    .with_monster(Skeleton, at(6, 8), East, 1)?
    .with_monster(Skeleton, at(5, 5), West, 1)?
    .with_monster(Giant, at(8, 3), South, 1)?
    .with_chest(at(8, 8), Item::Key)?
    .with_chest(at(2, 7), Item::Armor)
}

fn level_five() -> Result<Level, LevelError> {
    Level::parse(
        "Level 5",
        &[
            "##########",
            "#........#",
            "##########",
            "##.......#",
            "##.#.....#",
            "##.#.....#",
            "#x.#.....#",
            "#..#.....#",
            "#........#",
            "##########",
        ],
        at(8, 1),
    )?
    .with_fireball(at(4, 3), South, 5)?
    .with_fireball(at(5, 6), North, 5)?
    .with_teleporter(at(1, 1), at(8, 8))?
    .with_chest(at(2, 8), Item::Armor)?
    .with_monster(Spider, at(6, 4), South, 3)
}

fn level_six() -> Result<Level, LevelError> {
    Level::parse(
        "Level 6",
        &[
            "##########",
            "#xwwwwwww#",
            "#wwwwwwww#",
            "#wwwwwwww#",
            "#wwwwwwww#",
            "###wwwwww#",
            "#wwwwwwww#",
            "###wwwwww#",
            "#wwwwwwww#",
            "##########",
        ],
        at(1, 6),
    )?
    .with_chest(at(1, 8), Item::Potion)?
    .with_monster(Giant, at(1, 1), South, 1)?
    .with_monster(Spider, at(5, 3), West, 2)?
    .with_fireball(at(8, 6), West, 3)
}

fn level_seven() -> Result<Level, LevelError> {
    Level::parse(
        "Level 7",
        &[
            "##########",
            "#ssssssss#",
            "#ssssssss#",
            "#ssssssss#",
            "#ssssssss#",
            "#ssssssss#",
            "#ssssssss#",
            "#ssssssss#",
            "#sssssssx#",
            "##########",
        ],
        at(1, 1),
    )?
    .with_chest(at(1, 8), Item::Potion)?
    .with_monster(Skeleton, at(1, 1), South, 5)?
    .with_monster(Spider, at(5, 3), West, 2)?
    .with_fireball(at(8, 6), West, 3)
}

fn secret_level_one() -> Result<Level, LevelError> {
    Level::parse(
        "Level S1",
        &[
            "##########",
            "#........#",
            "#.$$$$$$.#",
            "#.$....$.#",
            "#.$.hh.$.#",
            "#.$....$.#",
            "#.$$$$$$.#",
            "#........#",
            "#.......x#",
            "##########",
        ],
        at(1, 1),
    )
}
