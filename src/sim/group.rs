//! Unordered collections of entities of one kind

use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::rect::Rect;

/// A group of live entities (order carries no meaning)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityGroup {
    members: Vec<Entity>,
}

impl EntityGroup {
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub fn add(&mut self, entity: Entity) {
        self.members.push(entity);
    }

    /// Advance every member one frame, then drop the ones that left the screen
    pub fn advance_all(&mut self) {
        for entity in &mut self.members {
            entity.advance();
        }
        self.members.retain(|e| !e.is_expired());
    }

    /// Remove every member overlapping `rect`, returning how many were removed
    pub fn remove_colliding(&mut self, rect: &Rect) -> usize {
        let before = self.members.len();
        self.members.retain(|e| !e.rect.intersects(rect));
        before - self.members.len()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Sprite;
    use crate::consts::SCREEN_HEIGHT;
    use crate::sim::EntityKind;

    fn oil(id: u32, x: i32, y: i32) -> Entity {
        Entity::new(id, EntityKind::Oil, Rect::new(x, y, 40, 40), 2, Sprite::Oil)
    }

    #[test]
    fn test_advance_all_moves_and_expires() {
        let mut group = EntityGroup::new();
        group.add(oil(1, 100, 0));
        group.add(oil(2, 200, SCREEN_HEIGHT - 1));
        group.add(oil(3, 300, SCREEN_HEIGHT));

        group.advance_all();

        let ids: Vec<u32> = group.iter().map(|e| e.id).collect();
        // #2 lands exactly on the edge (kept), #3 passes it (removed)
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(group.iter().next().map(|e| e.rect.top()), Some(2));
    }

    #[test]
    fn test_remove_colliding_only_takes_overlaps() {
        let mut group = EntityGroup::new();
        group.add(oil(1, 100, 100));
        group.add(oil(2, 500, 100));
        group.add(oil(3, 120, 120));

        let removed = group.remove_colliding(&Rect::new(90, 90, 60, 60));
        assert_eq!(removed, 2);
        assert_eq!(group.len(), 1);
        assert_eq!(group.iter().next().map(|e| e.id), Some(2));
    }

    #[test]
    fn test_remove_colliding_on_empty_group() {
        let mut group = EntityGroup::new();
        assert_eq!(group.remove_colliding(&Rect::new(0, 0, 10, 10)), 0);
        assert!(group.is_empty());
    }
}
