//! Farming domain — planting, reaping, weather accrual, growth, win check.
//!
//! Communicates with other domains exclusively through crate::shared
//! events/resources.

use bevy::prelude::*;

use crate::shared::*;

mod growth;
mod plants;
mod render;

pub use growth::{accrue_and_grow, advance_time, nearby_plant_count, try_grow, watch_win_condition};
pub use plants::{handle_plant_input, handle_reap_input};
pub use render::{plant_color, sync_plant_sprites};

/// Marker component for plant sprite entities managed by this domain.
/// Carries the tile key back to the owning soil record.
#[derive(Component, Debug, Clone)]
pub struct PlantSprite {
    pub pos: TilePos,
}

/// (x, y) → plant sprite entity. The explicit co-location index between a
/// soil record and its presentation-layer plant; at most one entry per tile.
#[derive(Resource, Default, Debug)]
pub struct PlantEntities {
    pub entities: std::collections::HashMap<TilePos, Entity>,
}

/// Latch so the win signal fires only on the first 4→5 transition.
#[derive(Resource, Default, Debug)]
pub struct WinTracker {
    pub won: bool,
}

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlantEntities>()
            .init_resource::<WinTracker>()
            .add_systems(
                Update,
                (
                    plants::handle_plant_input,
                    plants::handle_reap_input,
                    growth::advance_time,
                    growth::watch_win_condition,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // Visual sync runs after all state mutations.
            .add_systems(
                PostUpdate,
                render::sync_plant_sprites.run_if(in_state(GameState::Playing)),
            );
    }
}
