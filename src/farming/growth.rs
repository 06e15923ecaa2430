//! Weather accrual and growth evaluation.
//!
//! One accrue-and-grow pass models a discrete unit of weather exposure.
//! Per tile, in order: add random sun/water to the running totals, evaluate
//! growth eligibility, then zero the sun level (water carries over between
//! ticks, sun does not). Eligibility is checked against the raw running
//! totals — clamping to 255 happens only in the save codec.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;
use super::WinTracker;

/// Count plants within `NEIGHBOR_RANGE` tiles (Euclidean) of `pos`.
/// A plant on `pos` itself is at distance zero and counts.
pub fn nearby_plant_count(farm: &FarmState, pos: TilePos) -> usize {
    farm.tiles
        .iter()
        .filter(|(_, tile)| tile.plant.is_some())
        .filter(|(&(px, py), _)| {
            let dx = pos.0 as f32 - px as f32;
            let dy = pos.1 as f32 - py as f32;
            (dx * dx + dy * dy).sqrt() <= NEIGHBOR_RANGE
        })
        .count()
}

/// Evaluate growth eligibility for one tile. When the tile holds a plant and
/// has sun ≥ 5, water ≥ 5, and ≥ 2 plants nearby, spend 5 of each resource
/// and advance the plant one stage (a mature plant stays mature but still
/// pays). Returns the new kind when anything changed.
pub fn try_grow(farm: &mut FarmState, pos: TilePos) -> Option<PlantKind> {
    let tile = farm.tile(pos)?;
    let kind = tile.plant?;

    if tile.sun_level < SUN_REQUIREMENT || tile.water_level < WATER_REQUIREMENT {
        return None;
    }
    if nearby_plant_count(farm, pos) < NEIGHBORS_REQUIRED {
        return None;
    }

    let tile = farm.tile_mut(pos)?;
    tile.sun_level -= SUN_REQUIREMENT;
    tile.water_level -= WATER_REQUIREMENT;
    let grown = kind.advanced();
    tile.plant = Some(grown);
    Some(grown)
}

/// One weather tick over every tracked soil record. Returns the stage
/// changes so the caller can emit visual-update signals.
pub fn accrue_and_grow(
    farm: &mut FarmState,
    rng: &mut impl Rng,
) -> Vec<(TilePos, PlantKind)> {
    // Key set is fixed for the whole pass; growth never adds or removes
    // records, so neighbour counts see every plant that existed at tick
    // start (stage changes don't affect membership).
    let positions: Vec<TilePos> = farm.tiles.keys().copied().collect();
    let mut changes = Vec::new();

    for pos in positions {
        let sun: u16 = rng.gen_range(1..=10);
        let water: u16 = rng.gen_range(1..=2);

        let Some(tile) = farm.tile_mut(pos) else {
            continue;
        };
        tile.sun_level = tile.sun_level.saturating_add(sun);
        tile.water_level = tile.water_level.saturating_add(water);

        if let Some(kind) = try_grow(farm, pos) {
            changes.push((pos, kind));
        }

        // Sun does not carry over to the next tick.
        if let Some(tile) = farm.tile_mut(pos) {
            tile.sun_level = 0;
        }
    }

    changes
}

// ─────────────────────────────────────────────────────────────────────────────
// Systems
// ─────────────────────────────────────────────────────────────────────────────

/// Ticks the advance cooldown every frame and, when the player presses the
/// time key with the cooldown expired, advances the clock one unit and runs
/// the accrue-and-grow pass.
pub fn advance_time(
    input: Res<PlayerInput>,
    mut clock: ResMut<GameClock>,
    mut farm_state: ResMut<FarmState>,
    mut stage_events: EventWriter<PlantStageChangedEvent>,
) {
    if input.advance_time && clock.ready() {
        clock.advance();

        let mut rng = rand::thread_rng();
        let changes = accrue_and_grow(&mut farm_state, &mut rng);
        for (pos, kind) in changes {
            info!(
                "Plant at ({}, {}) grew to {:?}",
                pos.0, pos.1, kind.stage
            );
            stage_events.send(PlantStageChangedEvent { pos, kind });
        }
    }

    clock.tick();
}

/// Fires GameWonEvent once, on the first frame the mature-plant count
/// reaches the threshold.
pub fn watch_win_condition(
    farm_state: Res<FarmState>,
    mut tracker: ResMut<WinTracker>,
    mut won_events: EventWriter<GameWonEvent>,
) {
    if tracker.won {
        return;
    }
    if farm_state.mature_plant_count() >= MATURE_PLANTS_TO_WIN {
        tracker.won = true;
        info!("Win condition reached: {} mature plants", MATURE_PLANTS_TO_WIN);
        won_events.send(GameWonEvent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn farm_with(tiles: &[(TilePos, u16, u16, Option<PlantKind>)]) -> FarmState {
        let mut farm = FarmState::default();
        for &(pos, sun, water, plant) in tiles {
            farm.tiles.insert(
                pos,
                SoilTile {
                    sun_level: sun,
                    water_level: water,
                    plant,
                },
            );
        }
        farm
    }

    fn seed(species: PlantSpecies) -> Option<PlantKind> {
        Some(PlantKind::base(species))
    }

    #[test]
    fn test_growth_blocked_below_sun_threshold() {
        // sun=4, water=10, three plants in range: must not advance.
        let mut farm = farm_with(&[
            ((10, 10), 4, 10, seed(PlantSpecies::Fern)),
            ((11, 10), 0, 0, seed(PlantSpecies::Reed)),
            ((10, 12), 0, 0, seed(PlantSpecies::Blossom)),
        ]);
        assert_eq!(nearby_plant_count(&farm, (10, 10)), 3);

        assert_eq!(try_grow(&mut farm, (10, 10)), None);
        let tile = farm.tile((10, 10)).unwrap();
        assert_eq!(tile.plant, seed(PlantSpecies::Fern));
        assert_eq!(tile.sun_level, 4);
        assert_eq!(tile.water_level, 10);
    }

    #[test]
    fn test_growth_at_exact_thresholds_spends_resources() {
        // sun=5, water=5, two plants in range (self + one): advances.
        let mut farm = farm_with(&[
            ((10, 10), 5, 5, seed(PlantSpecies::Fern)),
            ((12, 10), 0, 0, seed(PlantSpecies::Reed)),
        ]);
        assert_eq!(nearby_plant_count(&farm, (10, 10)), 2);

        let grown = try_grow(&mut farm, (10, 10)).unwrap();
        assert_eq!(grown.species, PlantSpecies::Fern);
        assert_eq!(grown.stage, GrowthStage::Sprout);

        let tile = farm.tile((10, 10)).unwrap();
        assert_eq!(tile.sun_level, 0);
        assert_eq!(tile.water_level, 0);
        assert_eq!(tile.plant, Some(grown));
    }

    #[test]
    fn test_growth_blocked_without_neighbors() {
        // Lone plant: nearby = 1 (itself), never grows.
        let mut farm = farm_with(&[((10, 10), 50, 50, seed(PlantSpecies::Blossom))]);
        assert_eq!(nearby_plant_count(&farm, (10, 10)), 1);
        assert_eq!(try_grow(&mut farm, (10, 10)), None);
    }

    #[test]
    fn test_neighbor_range_is_euclidean_inclusive() {
        // (13, 14) is exactly 5 tiles from (10, 10); (12, 10) is 2 away.
        let farm = farm_with(&[
            ((10, 10), 0, 0, seed(PlantSpecies::Fern)),
            ((12, 10), 0, 0, seed(PlantSpecies::Fern)),
            ((13, 14), 0, 0, seed(PlantSpecies::Fern)),
            ((10, 13), 0, 0, seed(PlantSpecies::Fern)), // exactly 3.0 away
        ]);
        assert_eq!(nearby_plant_count(&farm, (10, 10)), 3);
    }

    #[test]
    fn test_empty_tiles_ignore_growth() {
        let mut farm = farm_with(&[((10, 10), 50, 50, None)]);
        assert_eq!(try_grow(&mut farm, (10, 10)), None);
        assert_eq!(try_grow(&mut farm, (99, 99)), None);
    }

    #[test]
    fn test_accrue_resets_sun_and_keeps_water() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut farm = farm_with(&[((10, 10), 0, 0, None), ((11, 11), 0, 0, None)]);
        let mut rng = StdRng::seed_from_u64(42);

        let changes = accrue_and_grow(&mut farm, &mut rng);
        assert!(changes.is_empty());

        for tile in farm.tiles.values() {
            assert_eq!(tile.sun_level, 0, "sun is zeroed after every tick");
            assert!((1..=2).contains(&tile.water_level), "water accrued 1..=2");
        }
    }

    #[test]
    fn test_mature_plant_pays_but_stays_mature() {
        let mature = Some(PlantKind {
            species: PlantSpecies::Reed,
            stage: GrowthStage::Mature,
        });
        let mut farm = farm_with(&[
            ((10, 10), 9, 9, mature),
            ((11, 10), 0, 0, seed(PlantSpecies::Fern)),
        ]);

        let grown = try_grow(&mut farm, (10, 10)).unwrap();
        assert_eq!(grown.stage, GrowthStage::Mature);
        let tile = farm.tile((10, 10)).unwrap();
        assert_eq!(tile.sun_level, 4);
        assert_eq!(tile.water_level, 4);
    }
}
