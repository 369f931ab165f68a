//! Wave spawning
//!
//! A wave is one car per traffic direction, one oil slick, one fuel can and a
//! full row of lane arrows. All random draws go through the injected RNG so a
//! fixed seed reproduces the same waves.

use glam::IVec2;
use rand::Rng;

use super::entity::{Entity, EntityKind};
use super::player::Player;
use super::rect::Rect;
use super::state::World;
use crate::assets::{AssetCatalog, Sprite};
use crate::consts::*;

/// Sprite footprints the simulation needs for spawning
#[derive(Debug, Clone, PartialEq)]
pub struct Footprints {
    /// One footprint per car variant. Must not be empty once handed to a
    /// [`Spawner`].
    pub cars: Vec<IVec2>,
    pub oil: IVec2,
    pub fuel: IVec2,
    pub arrow: IVec2,
}

impl Default for Footprints {
    fn default() -> Self {
        AssetCatalog::builtin().footprints()
    }
}

impl Footprints {
    fn car(&self, variant: usize) -> IVec2 {
        self.cars[variant % self.cars.len()]
    }
}

/// Lane arrow x-offsets: `count` arrows spread evenly across the playable band
pub fn arrow_positions(count: usize, arrow_width: i32) -> Vec<i32> {
    match count {
        0 => Vec::new(),
        1 => vec![PLAYABLE_MIN_X],
        _ => {
            let span = (PLAYABLE_MAX_X - PLAYABLE_MIN_X - arrow_width) as f64;
            let step = span / (count - 1) as f64;
            (0..count)
                .map(|i| (PLAYABLE_MIN_X as f64 + i as f64 * step).floor() as i32)
                .collect()
        }
    }
}

/// Uniform integer in `[min, max]`, pinned to `min` when the range is empty
fn random_x<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        min
    } else {
        rng.random_range(min..=max)
    }
}

/// Creates players and waves
#[derive(Debug, Clone)]
pub struct Spawner {
    footprints: Footprints,
    arrow_positions: Vec<i32>,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new(Footprints::default(), ARROW_COUNT)
    }
}

impl Spawner {
    /// An empty car list is replaced with the builtin variants, so there is
    /// always at least one car to pick from.
    pub fn new(mut footprints: Footprints, arrow_count: usize) -> Self {
        if footprints.cars.is_empty() {
            log::warn!("No car footprints given, using the builtin ones");
            footprints.cars = Footprints::default().cars;
        }
        let arrow_positions = arrow_positions(arrow_count, footprints.arrow.x);
        log::debug!("Lane arrows at {:?}", arrow_positions);
        Self {
            footprints,
            arrow_positions,
        }
    }

    /// Number of selectable car variants
    pub fn car_variants(&self) -> usize {
        self.footprints.cars.len()
    }

    /// Player car for the given variant, centered on screen
    pub fn spawn_player(&self, car: usize) -> Player {
        let variant = car % self.car_variants();
        Player::new(Sprite::Car(variant as u8), self.footprints.car(variant))
    }

    /// Spawn one full wave into `world`
    pub fn spawn_wave<R: Rng>(&self, rng: &mut R, world: &mut World) {
        let left = self.traffic(rng, world.next_id(), EntityKind::TrafficLeft);
        world.traffic_left.add(left);
        let right = self.traffic(rng, world.next_id(), EntityKind::TrafficRight);
        world.traffic_right.add(right);

        let oil = self.item(rng, world.next_id(), EntityKind::Oil);
        world.oil.add(oil);
        let fuel = self.item(rng, world.next_id(), EntityKind::Fuel);
        world.fuel.add(fuel);

        let size = self.footprints.arrow;
        for &x in &self.arrow_positions {
            let id = world.next_id();
            world.markers.add(Entity::new(
                id,
                EntityKind::LaneMarker,
                Rect::new(x, -size.y, size.x, size.y),
                HAZARD_SPEED,
                Sprite::Arrow,
            ));
        }

        log::debug!(
            "Wave spawned: traffic {}/{}, oil {}, fuel {}, arrows {}",
            world.traffic_left.len(),
            world.traffic_right.len(),
            world.oil.len(),
            world.fuel.len(),
            world.markers.len()
        );
    }

    /// Random car in its half of the road, just off-screen on its entry edge
    fn traffic<R: Rng>(&self, rng: &mut R, id: u32, kind: EntityKind) -> Entity {
        let variant = rng.random_range(0..self.car_variants());
        let size = self.footprints.car(variant);
        let speed = rng.random_range(TRAFFIC_MIN_SPEED..=TRAFFIC_MAX_SPEED);

        let (x, y) = match kind {
            EntityKind::TrafficRight => (
                random_x(rng, MID_X, PLAYABLE_MAX_X - size.x),
                SCREEN_HEIGHT + size.y,
            ),
            _ => (random_x(rng, PLAYABLE_MIN_X, MID_X - size.x), -size.y),
        };

        Entity::new(
            id,
            kind,
            Rect::new(x, y, size.x, size.y),
            speed,
            Sprite::Car(variant as u8),
        )
    }

    /// Oil or fuel anywhere across the playable band, just above the screen
    fn item<R: Rng>(&self, rng: &mut R, id: u32, kind: EntityKind) -> Entity {
        let (size, sprite) = match kind {
            EntityKind::Fuel => (self.footprints.fuel, Sprite::Fuel),
            _ => (self.footprints.oil, Sprite::Oil),
        };
        let x = random_x(rng, PLAYABLE_MIN_X, PLAYABLE_MAX_X - size.x);
        Entity::new(
            id,
            kind,
            Rect::new(x, -size.y, size.x, size.y),
            HAZARD_SPEED,
            sprite,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_arrow_positions_reference_layout() {
        let xs = arrow_positions(10, 100);
        assert_eq!(xs.len(), 10);
        assert_eq!(xs[0], PLAYABLE_MIN_X);
        // step = (1000 - 100) / 9 = 100
        assert_eq!(xs[1], 200);
        assert_eq!(*xs.last().unwrap(), PLAYABLE_MAX_X - 100);
    }

    #[test]
    fn test_arrow_positions_truncate() {
        // (1000 - 50) / 7 is fractional, offsets floor
        let xs = arrow_positions(8, 50);
        let step = 950.0 / 7.0;
        for (i, x) in xs.iter().enumerate() {
            assert_eq!(*x, (100.0 + i as f64 * step).floor() as i32);
        }
    }

    #[test]
    fn test_arrow_positions_degenerate_counts() {
        assert!(arrow_positions(0, 100).is_empty());
        assert_eq!(arrow_positions(1, 100), vec![PLAYABLE_MIN_X]);
    }

    #[test]
    fn test_wave_has_one_of_each_plus_arrows() {
        let spawner = Spawner::default();
        let mut world = World::default();
        let mut rng = Pcg32::seed_from_u64(1234);
        spawner.spawn_wave(&mut rng, &mut world);

        assert_eq!(world.traffic_left.len(), 1);
        assert_eq!(world.traffic_right.len(), 1);
        assert_eq!(world.oil.len(), 1);
        assert_eq!(world.fuel.len(), 1);
        assert_eq!(world.markers.len(), ARROW_COUNT);
    }

    #[test]
    fn test_spawn_ranges() {
        let spawner = Spawner::default();
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..500 {
            let mut world = World::default();
            spawner.spawn_wave(&mut rng, &mut world);

            for car in world.traffic_left.iter() {
                assert!((TRAFFIC_MIN_SPEED..=TRAFFIC_MAX_SPEED).contains(&car.speed));
                assert!(car.rect.left() >= PLAYABLE_MIN_X);
                assert!(car.rect.right() <= MID_X);
                assert_eq!(car.rect.bottom(), 0);
            }
            for car in world.traffic_right.iter() {
                assert!((TRAFFIC_MIN_SPEED..=TRAFFIC_MAX_SPEED).contains(&car.speed));
                assert!(car.rect.left() >= MID_X);
                assert!(car.rect.right() <= PLAYABLE_MAX_X);
                assert_eq!(car.rect.top(), SCREEN_HEIGHT + car.rect.height());
            }
            for item in world.oil.iter().chain(world.fuel.iter()) {
                assert_eq!(item.speed, HAZARD_SPEED);
                assert!(item.rect.left() >= PLAYABLE_MIN_X);
                assert!(item.rect.right() <= PLAYABLE_MAX_X);
                assert_eq!(item.rect.bottom(), 0);
            }
        }
    }

    #[test]
    fn test_same_seed_same_wave() {
        let spawner = Spawner::default();
        let mut a = World::default();
        let mut b = World::default();
        spawner.spawn_wave(&mut Pcg32::seed_from_u64(7), &mut a);
        spawner.spawn_wave(&mut Pcg32::seed_from_u64(7), &mut b);

        let rects = |w: &World| -> Vec<(Rect, i32)> {
            w.traffic_left
                .iter()
                .chain(w.traffic_right.iter())
                .chain(w.oil.iter())
                .chain(w.fuel.iter())
                .map(|e| (e.rect, e.speed))
                .collect()
        };
        assert_eq!(rects(&a), rects(&b));
    }

    #[test]
    fn test_oversized_car_pins_to_lane_start() {
        let footprints = Footprints {
            cars: vec![IVec2::new(800, 100)],
            ..Footprints::default()
        };
        let spawner = Spawner::new(footprints, 0);
        let mut world = World::default();
        spawner.spawn_wave(&mut Pcg32::seed_from_u64(1), &mut world);
        assert_eq!(world.traffic_left.iter().next().map(|e| e.rect.left()), Some(PLAYABLE_MIN_X));
        assert_eq!(world.traffic_right.iter().next().map(|e| e.rect.left()), Some(MID_X));
        assert!(world.markers.is_empty());
    }

    #[test]
    fn test_spawn_player_uses_variant_footprint() {
        let mut footprints = Footprints::default();
        footprints.cars[3] = IVec2::new(60, 110);
        let spawner = Spawner::new(footprints, ARROW_COUNT);
        let player = spawner.spawn_player(3);
        assert_eq!(player.sprite, Sprite::Car(3));
        assert_eq!(player.rect.size, IVec2::new(60, 110));
    }

    #[test]
    fn test_empty_car_list_uses_builtin_cars() {
        let footprints = Footprints {
            cars: Vec::new(),
            ..Footprints::default()
        };
        let spawner = Spawner::new(footprints, ARROW_COUNT);
        assert_eq!(spawner.car_variants(), CAR_VARIANTS);

        let player = spawner.spawn_player(5);
        assert_eq!(player.sprite, Sprite::Car(5));

        let mut rng = Pcg32::seed_from_u64(3);
        let mut world = World::default();
        spawner.spawn_wave(&mut rng, &mut world);
        assert_eq!(world.traffic_left.len(), 1);
        assert_eq!(world.traffic_right.len(), 1);
    }
}
