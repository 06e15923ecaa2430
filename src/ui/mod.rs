//! HUD — elapsed-time readout and the win banner.

use bevy::prelude::*;

use crate::shared::*;

#[derive(Component)]
pub struct HudTimeText;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_hud)
            .add_systems(
                Update,
                (update_time_display, show_win_banner)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("Time: 00:00"),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(12.0),
            left: Val::Px(12.0),
            ..default()
        },
        HudTimeText,
    ));
}

/// Format elapsed time units as MM:SS.
pub fn format_time(time_elapsed: u16) -> String {
    let minutes = time_elapsed / 60;
    let seconds = time_elapsed % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

fn update_time_display(
    clock: Res<GameClock>,
    mut query: Query<&mut Text, With<HudTimeText>>,
) {
    if !clock.is_changed() {
        return;
    }
    for mut text in query.iter_mut() {
        **text = format!("Time: {}", format_time(clock.time_elapsed));
    }
}

/// Replace the clock readout with the win banner once the farm is won.
fn show_win_banner(
    mut won_events: EventReader<GameWonEvent>,
    mut query: Query<(&mut Text, &mut TextColor), With<HudTimeText>>,
) {
    for _ in won_events.read() {
        for (mut text, mut color) in query.iter_mut() {
            **text = "You grew a full harvest!".to_string();
            *color = TextColor(Color::srgb(0.2, 1.0, 0.2));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(60), "01:00");
        assert_eq!(format_time(3599), "59:59");
        assert_eq!(format_time(3600), "60:00");
    }
}
