//! Scrolling entities: traffic, oil, fuel and lane arrows

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::assets::Sprite;
use crate::consts::SCREEN_HEIGHT;

/// Entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Car in the left lanes, driving down the screen
    TrafficLeft,
    /// Car in the right lanes, driving up the screen
    TrafficRight,
    /// Oil slick - makes the player skid
    Oil,
    /// Fuel can - restores health
    Fuel,
    /// Painted arrow, purely visual
    LaneMarker,
}

impl EntityKind {
    /// Vertical direction of travel (+1 down, -1 up)
    pub fn direction(self) -> i32 {
        match self {
            EntityKind::TrafficRight => -1,
            EntityKind::TrafficLeft
            | EntityKind::Oil
            | EntityKind::Fuel
            | EntityKind::LaneMarker => 1,
        }
    }
}

/// A scrolling entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub rect: Rect,
    /// Unsigned speed in px/frame; direction comes from the kind
    pub speed: i32,
    pub sprite: Sprite,
}

impl Entity {
    pub fn new(id: u32, kind: EntityKind, rect: Rect, speed: i32, sprite: Sprite) -> Self {
        Self {
            id,
            kind,
            rect,
            speed,
            sprite,
        }
    }

    /// Signed vertical displacement per frame
    #[inline]
    pub fn velocity(&self) -> i32 {
        self.speed * self.kind.direction()
    }

    /// Apply one frame of motion
    pub fn advance(&mut self) {
        self.rect.pos.y += self.velocity();
    }

    /// Fully off-screen on the edge the entity travels toward
    pub fn is_expired(&self) -> bool {
        if self.kind.direction() > 0 {
            self.rect.top() > SCREEN_HEIGHT
        } else {
            self.rect.bottom() < 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: EntityKind, y: i32, speed: i32) -> Entity {
        Entity::new(1, kind, Rect::new(200, y, 50, 100), speed, Sprite::Car(0))
    }

    #[test]
    fn test_downward_kinds_move_down() {
        for kind in [
            EntityKind::TrafficLeft,
            EntityKind::Oil,
            EntityKind::Fuel,
            EntityKind::LaneMarker,
        ] {
            let mut e = entity(kind, 10, 2);
            e.advance();
            assert_eq!(e.rect.top(), 12, "{kind:?}");
            assert_eq!(e.rect.left(), 200);
        }
    }

    #[test]
    fn test_traffic_right_moves_up() {
        let mut e = entity(EntityKind::TrafficRight, 500, 3);
        e.advance();
        assert_eq!(e.rect.top(), 497);
        assert_eq!(e.velocity(), -3);
    }

    #[test]
    fn test_downward_expiry_needs_top_past_bottom_edge() {
        let mut e = entity(EntityKind::Oil, SCREEN_HEIGHT - 1, 1);
        assert!(!e.is_expired());
        e.advance(); // top == SCREEN_HEIGHT is not yet beyond the edge
        assert!(!e.is_expired());
        e.advance();
        assert!(e.is_expired());
    }

    #[test]
    fn test_upward_expiry_needs_bottom_above_top_edge() {
        let mut e = entity(EntityKind::TrafficRight, -99, 1);
        assert_eq!(e.rect.bottom(), 1);
        e.advance();
        assert!(!e.is_expired());
        e.advance();
        assert!(e.is_expired());
    }

    #[test]
    fn test_fresh_spawns_are_not_expired() {
        // Spawn positions sit just outside the screen, moving inward
        assert!(!entity(EntityKind::TrafficLeft, -100, 1).is_expired());
        assert!(!entity(EntityKind::TrafficRight, SCREEN_HEIGHT + 100, 1).is_expired());
    }
}
