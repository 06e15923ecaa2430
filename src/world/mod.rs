//! World domain — the farming layer and its ground visuals.

use bevy::prelude::*;

use crate::shared::*;

/// The set of tile coordinates eligible to hold soil/plant state.
#[derive(Resource, Debug, Clone, Default)]
pub struct FarmLayer {
    pub tiles: Vec<TilePos>,
}

impl FarmLayer {
    /// The fixed farming plot: every tile in the 18×18 block.
    pub fn plot() -> Self {
        let mut tiles = Vec::new();
        for y in FARM_MIN_TILE..=FARM_MAX_TILE {
            for x in FARM_MIN_TILE..=FARM_MAX_TILE {
                tiles.push((x, y));
            }
        }
        Self { tiles }
    }
}

/// Marker for the tilled-soil ground sprites.
#[derive(Component, Debug, Clone)]
pub struct SoilGround;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FarmLayer>()
            .add_systems(Startup, setup_farm_layer.in_set(BootSet::World));
    }
}

/// Build the farming layer, create its soil records (once, before any
/// restore), and lay down the plot's ground visuals.
fn setup_farm_layer(
    mut commands: Commands,
    mut farm_layer: ResMut<FarmLayer>,
    mut farm_state: ResMut<FarmState>,
) {
    *farm_layer = FarmLayer::plot();

    let mut rng = rand::thread_rng();
    farm_state.init_tiles(farm_layer.tiles.iter().copied(), &mut rng);
    info!("Farming layer initialized: {} tiles", farm_layer.tiles.len());

    for &pos in &farm_layer.tiles {
        commands.spawn((
            Sprite {
                color: Color::srgb(0.45, 0.32, 0.20),
                custom_size: Some(Vec2::splat(TILE_SIZE - 1.0)), // 1px grid seam
                ..default()
            },
            Transform::from_translation(tile_to_world(pos).extend(1.0)),
            SoilGround,
        ));
    }

    // Grass backdrop under everything else.
    commands.spawn((
        Sprite {
            color: Color::srgb(0.35, 0.55, 0.30),
            custom_size: Some(Vec2::splat(WORLD_SIZE_PX)),
            ..default()
        },
        Transform::from_translation(Vec3::new(
            WORLD_SIZE_PX / 2.0,
            WORLD_SIZE_PX / 2.0,
            0.0,
        )),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_covers_the_full_block_once() {
        let layer = FarmLayer::plot();
        assert_eq!(layer.tiles.len(), 18 * 18);

        let unique: std::collections::BTreeSet<TilePos> =
            layer.tiles.iter().copied().collect();
        assert_eq!(unique.len(), layer.tiles.len());
        assert!(unique.contains(&(FARM_MIN_TILE, FARM_MIN_TILE)));
        assert!(unique.contains(&(FARM_MAX_TILE, FARM_MAX_TILE)));
        assert!(!unique.contains(&(FARM_MIN_TILE - 1, FARM_MIN_TILE)));
    }
}
