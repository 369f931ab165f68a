//! Per-frame scene layout

use glam::IVec2;

use super::Renderer;
use super::colors::{GRAY, GREEN, WHITE};
use crate::assets::{AssetCatalog, Sprite};
use crate::consts::*;
use crate::sim::{EntityGroup, Rect, Scene, SessionState};

/// Health bar origin and size at full health
const HEALTH_BAR: Rect = Rect::new(10, 10, MAX_HEALTH, 20);

impl EntityGroup {
    /// Draw every member at its current position
    pub fn draw_all<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for entity in self.iter() {
            renderer.draw_sprite(entity.sprite, entity.rect.pos);
        }
    }
}

/// Draw one complete frame for the current scene (does not present)
pub fn draw_frame<R: Renderer + ?Sized>(
    renderer: &mut R,
    state: &SessionState,
    catalog: &AssetCatalog,
) {
    renderer.clear(GRAY);
    draw_scenery(renderer);

    match state.scene {
        Scene::Menu => draw_menu(renderer, state, catalog),
        Scene::Play => draw_play(renderer, state),
        Scene::GameOver => draw_game_over(renderer, state),
    }
}

/// Stands and grass along both sides of the road
fn draw_scenery<R: Renderer + ?Sized>(renderer: &mut R) {
    renderer.draw_sprite(Sprite::Tribune, IVec2::new(-40, 0));
    renderer.draw_sprite(Sprite::Tribune, IVec2::new(SCREEN_WIDTH - 120, 0));
    renderer.draw_sprite(Sprite::Grass, IVec2::new(-90, 0));
    renderer.draw_sprite(Sprite::Grass, IVec2::new(SCREEN_WIDTH - 60, 0));
}

fn draw_menu<R: Renderer + ?Sized>(
    renderer: &mut R,
    state: &SessionState,
    catalog: &AssetCatalog,
) {
    // The menu has a plain backdrop
    renderer.clear(GRAY);

    let car = Sprite::Car((state.selected_car % CAR_VARIANTS) as u8);
    let size = catalog.sprite(car).size;
    let rect = Rect::from_center(IVec2::new(MID_X, SCREEN_HEIGHT / 2 - 50), size);
    renderer.draw_sprite(car, rect.pos);

    renderer.draw_text(
        "<- PILIH MOBIL MU->",
        24,
        WHITE,
        IVec2::new(MID_X, SCREEN_HEIGHT / 2 + 10),
    );
    renderer.draw_text(
        "SPACE = Start",
        28,
        WHITE,
        IVec2::new(MID_X, SCREEN_HEIGHT / 2 + 70),
    );
}

fn draw_play<R: Renderer + ?Sized>(renderer: &mut R, state: &SessionState) {
    let world = &state.world;
    world.traffic_left.draw_all(renderer);
    world.traffic_right.draw_all(renderer);
    world.oil.draw_all(renderer);
    world.fuel.draw_all(renderer);
    world.markers.draw_all(renderer);
    if let Some(player) = &state.player {
        renderer.draw_sprite(player.sprite, player.rect.pos);
    }

    // HUD
    let health = state.health.clamp(0, MAX_HEALTH);
    renderer.draw_filled_rect(
        Rect {
            size: IVec2::new(health, HEALTH_BAR.height()),
            ..HEALTH_BAR
        },
        GREEN,
    );
    renderer.draw_outlined_rect(HEALTH_BAR, WHITE, 2);
    renderer.draw_text(
        &format!("Score: {}", state.display_score()),
        30,
        WHITE,
        IVec2::new(100, 50),
    );
}

fn draw_game_over<R: Renderer + ?Sized>(renderer: &mut R, state: &SessionState) {
    let lines = [
        ("GAME OVER".to_owned(), 50, SCREEN_HEIGHT / 3),
        (
            format!("Final Score: {}", state.display_score()),
            30,
            SCREEN_HEIGHT / 2,
        ),
        ("R = Restart".to_owned(), 24, SCREEN_HEIGHT / 2 + 60),
        ("M = Menu".to_owned(), 24, SCREEN_HEIGHT / 2 + 90),
        ("ESC = Exit".to_owned(), 24, SCREEN_HEIGHT / 2 + 120),
    ];
    for (text, size, y) in lines {
        renderer.draw_text(&text, size, WHITE, IVec2::new(MID_X, y));
    }
}
