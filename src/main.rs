mod shared;
mod input;
mod player;
mod world;
mod farming;
mod save;
mod ui;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Sunpatch".into(),
                        resolution: WindowResolution::new(SCREEN_WIDTH, SCREEN_HEIGHT),
                        present_mode: PresentMode::AutoVsync,
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<FarmState>()
        .init_resource::<GameClock>()
        // Events
        .add_event::<PlantAddedEvent>()
        .add_event::<PlantRemovedEvent>()
        .add_event::<PlantStageChangedEvent>()
        .add_event::<GameWonEvent>()
        // Boot ordering: build the world, then restore any saved state over it.
        .configure_sets(Startup, (BootSet::World, BootSet::Restore).chain())
        // Domain plugins
        .add_plugins(input::InputPlugin)
        .add_plugins(player::PlayerPlugin)
        .add_plugins(world::WorldPlugin)
        .add_plugins(farming::FarmingPlugin)
        .add_plugins(ui::UiPlugin)
        .add_plugins(save::SavePlugin)
        // Camera
        .add_systems(Startup, setup_camera)
        .add_systems(Startup, begin_playing.after(BootSet::Restore))
        .run();
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

fn begin_playing(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::Playing);
}
