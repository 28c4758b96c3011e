//! Damage, healing and collision resolution.

use dungeon_crawl_core::{
    Event, GameStatus, MonsterKind, PlayerCondition, ARMOR_CAPACITY, HURT_COOLDOWN_TICKS,
    MAX_HEALTH, RESTORE_HEALTH,
};
use tracing::debug;

use crate::GameSession;

impl GameSession {
    /// Applies one point of trap or fireball damage.
    ///
    /// Worn armor soaks the hit; otherwise health drops. Nothing happens while
    /// the hurt cooldown is running, and every landed hit restarts it.
    pub fn take_damage(&mut self, out_events: &mut Vec<Event>) {
        if self.player.hurt_cooldown > 0 {
            return;
        }

        if self.player.armor_worn {
            self.player.armor_health = self.player.armor_health.saturating_sub(1);
            self.break_armor_if_spent(out_events);
        } else {
            self.player.health = self.player.health.saturating_sub(1);
        }
        self.player.hurt_cooldown = HURT_COOLDOWN_TICKS;
        self.report_hurt(out_events);
    }

    /// Applies the bite of a monster of the given kind.
    pub fn take_damage_by_monster(&mut self, kind: MonsterKind, out_events: &mut Vec<Event>) {
        if self.player.hurt_cooldown > 0 {
            return;
        }

        if self.player.armor_worn {
            // Spider and rat bites glance off armor.
            match kind {
                MonsterKind::Skeleton => {
                    self.player.armor_health = self.player.armor_health.saturating_sub(1);
                }
                MonsterKind::Giant => self.player.armor_health = 0,
                MonsterKind::Spider | MonsterKind::Rat => {}
            }
            if matches!(kind, MonsterKind::Skeleton | MonsterKind::Giant) {
                self.break_armor_if_spent(out_events);
                self.report_hurt(out_events);
            }
        } else {
            match kind {
                MonsterKind::Skeleton => {
                    self.player.health = self.player.health.saturating_sub(1);
                }
                MonsterKind::Giant => self.player.health = 0,
                MonsterKind::Rat => {
                    if self.player.coins > 0 {
                        self.player.coins -= 1;
                        out_events.push(Event::CoinStolen {
                            remaining: self.player.coins,
                        });
                    }
                }
                MonsterKind::Spider => {
                    self.player.health = self.player.health.saturating_sub(1);
                    if self.player.condition != PlayerCondition::Poisoned {
                        self.player.condition = PlayerCondition::Poisoned;
                        out_events.push(Event::ConditionChanged {
                            condition: PlayerCondition::Poisoned,
                        });
                    }
                }
            }
            if kind != MonsterKind::Rat {
                self.report_hurt(out_events);
            }
        }
        self.player.hurt_cooldown = HURT_COOLDOWN_TICKS;
    }

    /// Heals one point of health, curing poison when health actually rises.
    pub fn heal(&mut self, out_events: &mut Vec<Event>) {
        if self.player.health >= MAX_HEALTH {
            return;
        }
        self.player.health += 1;
        out_events.push(Event::PlayerHealed {
            health: self.player.health,
        });
        if self.player.condition == PlayerCondition::Poisoned {
            self.player.condition = PlayerCondition::Normal;
            out_events.push(Event::ConditionChanged {
                condition: PlayerCondition::Normal,
            });
        }
    }

    /// Raises health to the restore floor when below it.
    pub fn restore(&mut self, out_events: &mut Vec<Event>) {
        if self.player.health >= RESTORE_HEALTH {
            return;
        }
        self.player.health = RESTORE_HEALTH;
        out_events.push(Event::PlayerHealed {
            health: self.player.health,
        });
    }

    /// Equips armor, or repairs it to full capacity when already worn.
    pub(crate) fn equip_armor(&mut self, out_events: &mut Vec<Event>) {
        self.player.armor_worn = true;
        self.player.armor_health = ARMOR_CAPACITY;
        out_events.push(Event::ArmorEquipped {
            armor: ARMOR_CAPACITY,
        });
    }

    fn break_armor_if_spent(&mut self, out_events: &mut Vec<Event>) {
        if self.player.armor_health == 0 {
            self.player.armor_worn = false;
            out_events.push(Event::ArmorBroken);
        }
    }

    fn report_hurt(&mut self, out_events: &mut Vec<Event>) {
        let armor = self
            .player
            .armor_worn
            .then_some(self.player.armor_health);
        debug!(health = self.player.health, ?armor, "player hurt");
        out_events.push(Event::PlayerHurt {
            health: self.player.health,
            armor,
        });
        if self.player.health == 0 {
            let _ = self.transition(GameStatus::GameOver, out_events);
        }
    }
}

/// Hurts the player for every settled fireball and monster sharing their cell.
///
/// Entities still animating toward a cell do not collide there yet.
pub(crate) fn resolve_collisions(session: &mut GameSession, out_events: &mut Vec<Event>) {
    let position = session.player.position;
    let level = session.active_level();
    let fireball_hits = level
        .fireballs()
        .iter()
        .filter(|fireball| fireball.is_settled() && fireball.position() == position)
        .count();
    let monster_hits: Vec<MonsterKind> = level
        .monsters()
        .iter()
        .filter(|monster| monster.is_settled() && monster.position() == position)
        .map(|monster| monster.kind())
        .collect();

    for _ in 0..fireball_hits {
        session.take_damage(out_events);
    }
    for kind in monster_hits {
        session.take_damage_by_monster(kind, out_events);
    }
}
