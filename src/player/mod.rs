//! Player domain — sprite spawn, continuous movement, camera follow.

use bevy::prelude::*;

use crate::shared::*;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player.in_set(BootSet::World))
            .add_systems(
                Update,
                (player_movement, camera_follow)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn spawn_player(mut commands: Commands) {
    commands.spawn((
        Sprite {
            color: Color::srgb(0.9, 0.8, 0.6),
            custom_size: Some(Vec2::new(TILE_SIZE * 0.75, TILE_SIZE * 0.95)),
            ..default()
        },
        Transform::from_translation(DEFAULT_PLAYER_POS.extend(10.0)),
        Player,
        GridPosition::new(
            (DEFAULT_PLAYER_POS.x / TILE_SIZE) as i32,
            (DEFAULT_PLAYER_POS.y / TILE_SIZE) as i32,
        ),
    ));
}

/// Smooth pixel motion from the input axis, clamped to the world bounds.
/// `GridPosition` is kept in sync for tile lookups.
fn player_movement(
    time: Res<Time>,
    input: Res<PlayerInput>,
    mut query: Query<(&mut Transform, &mut GridPosition), With<Player>>,
) {
    let Ok((mut transform, mut grid_pos)) = query.get_single_mut() else {
        return;
    };

    if input.move_axis != Vec2::ZERO {
        let delta = input.move_axis * PLAYER_SPEED * time.delta_secs();
        transform.translation.x =
            (transform.translation.x + delta.x).clamp(0.0, WORLD_SIZE_PX);
        transform.translation.y =
            (transform.translation.y + delta.y).clamp(0.0, WORLD_SIZE_PX);
    }

    grid_pos.x = (transform.translation.x / TILE_SIZE).floor() as i32;
    grid_pos.y = (transform.translation.y / TILE_SIZE).floor() as i32;
}

fn camera_follow(
    player_query: Query<&Transform, With<Player>>,
    mut camera_query: Query<&mut Transform, (With<Camera2d>, Without<Player>)>,
) {
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok(mut camera) = camera_query.get_single_mut() else {
        return;
    };
    camera.translation.x = player.translation.x;
    camera.translation.y = player.translation.y;
}
