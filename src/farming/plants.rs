//! Planting and reaping at the player's tile.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Plant — R over a farmable tile
// ─────────────────────────────────────────────────────────────────────────────

/// Plant a random base-stage species on the tile the player is standing on.
/// Silent no-op when the tile is outside the farming layer or already holds
/// a plant — occupied soil is never overwritten.
pub fn handle_plant_input(
    input: Res<PlayerInput>,
    player_query: Query<&Transform, With<Player>>,
    mut farm_state: ResMut<FarmState>,
    mut added_events: EventWriter<PlantAddedEvent>,
) {
    if !input.plant {
        return;
    }

    let Ok(transform) = player_query.get_single() else {
        return;
    };

    let Some(pos) = world_to_tile(transform.translation.x, transform.translation.y) else {
        return;
    };

    let mut rng = rand::thread_rng();
    let species = PlantSpecies::ALL[rng.gen_range(0..PlantSpecies::ALL.len())];
    let kind = PlantKind::base(species);

    if farm_state.plant_at(pos, kind) {
        info!("Planted {:?} at ({}, {})", species, pos.0, pos.1);
        added_events.send(PlantAddedEvent { pos, kind });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reap — F over an occupied tile
// ─────────────────────────────────────────────────────────────────────────────

/// Clear the plant from the tile the player is standing on. Silent no-op
/// when the tile is unknown or empty.
pub fn handle_reap_input(
    input: Res<PlayerInput>,
    player_query: Query<&Transform, With<Player>>,
    mut farm_state: ResMut<FarmState>,
    mut removed_events: EventWriter<PlantRemovedEvent>,
) {
    if !input.reap {
        return;
    }

    let Ok(transform) = player_query.get_single() else {
        return;
    };

    let Some(pos) = world_to_tile(transform.translation.x, transform.translation.y) else {
        return;
    };

    if farm_state.reap_at(pos) {
        info!("Reaped plant at ({}, {})", pos.0, pos.1);
        removed_events.send(PlantRemovedEvent { pos });
    }
}
