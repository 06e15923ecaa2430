//! Visual synchronisation — plant sprites follow the soil records.
//!
//! The store signals every mutation through shared events; this system is
//! the only code that touches plant entities.

use bevy::prelude::*;

use crate::shared::*;
use super::{PlantEntities, PlantSprite};

/// Placeholder colour for a species/stage pair: one hue per species,
/// brightening and saturating as the plant matures.
pub fn plant_color(kind: PlantKind) -> Color {
    let progress = kind.stage.index() as f32 / 3.0;
    let (r, g, b) = match kind.species {
        PlantSpecies::Fern => (0.15, 0.45 + 0.45 * progress, 0.15),
        PlantSpecies::Blossom => (0.45 + 0.45 * progress, 0.25, 0.45 + 0.30 * progress),
        PlantSpecies::Reed => (0.55 + 0.30 * progress, 0.55 + 0.25 * progress, 0.15),
    };
    Color::srgb(r, g, b)
}

/// Sprite size grows a little with the stage so progress reads at a glance.
fn plant_size(kind: PlantKind) -> Vec2 {
    let scale = 0.5 + 0.15 * kind.stage.index() as f32;
    Vec2::splat(TILE_SIZE * scale)
}

/// Consume the plant lifecycle events and spawn/despawn/restyle sprite
/// entities, keeping the (x, y) → entity index in step with the store.
pub fn sync_plant_sprites(
    mut commands: Commands,
    mut plant_entities: ResMut<PlantEntities>,
    mut added_events: EventReader<PlantAddedEvent>,
    mut removed_events: EventReader<PlantRemovedEvent>,
    mut changed_events: EventReader<PlantStageChangedEvent>,
    mut sprite_query: Query<&mut Sprite, With<PlantSprite>>,
) {
    for event in added_events.read() {
        // At most one sprite per tile; a duplicate add means the store and
        // the index disagree, so keep the existing entity.
        if plant_entities.entities.contains_key(&event.pos) {
            warn!(
                "Plant sprite already exists at ({}, {})",
                event.pos.0, event.pos.1
            );
            continue;
        }

        let translation = tile_to_world(event.pos).extend(2.0); // above soil
        let entity = commands
            .spawn((
                Sprite {
                    color: plant_color(event.kind),
                    custom_size: Some(plant_size(event.kind)),
                    ..default()
                },
                Transform::from_translation(translation),
                PlantSprite { pos: event.pos },
            ))
            .id();
        plant_entities.entities.insert(event.pos, entity);
    }

    for event in changed_events.read() {
        let Some(&entity) = plant_entities.entities.get(&event.pos) else {
            continue;
        };
        if let Ok(mut sprite) = sprite_query.get_mut(entity) {
            sprite.color = plant_color(event.kind);
            sprite.custom_size = Some(plant_size(event.kind));
        }
    }

    for event in removed_events.read() {
        if let Some(entity) = plant_entities.entities.remove(&event.pos) {
            commands.entity(entity).despawn();
        }
    }
}
