//! Shared components, resources, events, and states for Sunpatch.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

/// Startup ordering: the world must build the farm layer and spawn the player
/// before the save domain restores persisted state over it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BootSet {
    World,
    Restore,
}

// ═══════════════════════════════════════════════════════════════════════
// SPECIES & GROWTH STAGES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantSpecies {
    Fern,
    Blossom,
    Reed,
}

impl PlantSpecies {
    pub const ALL: [PlantSpecies; 3] = [
        PlantSpecies::Fern,
        PlantSpecies::Blossom,
        PlantSpecies::Reed,
    ];

    pub fn index(self) -> u8 {
        match self {
            PlantSpecies::Fern => 0,
            PlantSpecies::Blossom => 1,
            PlantSpecies::Reed => 2,
        }
    }

    fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(PlantSpecies::Fern),
            1 => Some(PlantSpecies::Blossom),
            2 => Some(PlantSpecies::Reed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GrowthStage {
    Seed,
    Sprout,
    Budding,
    Mature,
}

impl GrowthStage {
    pub fn index(self) -> u8 {
        match self {
            GrowthStage::Seed => 0,
            GrowthStage::Sprout => 1,
            GrowthStage::Budding => 2,
            GrowthStage::Mature => 3,
        }
    }

    fn from_index(idx: u8) -> Option<Self> {
        match idx {
            0 => Some(GrowthStage::Seed),
            1 => Some(GrowthStage::Sprout),
            2 => Some(GrowthStage::Budding),
            3 => Some(GrowthStage::Mature),
            _ => None,
        }
    }

    /// Next stage, staying at Mature once reached.
    pub fn next(self) -> Self {
        match self {
            GrowthStage::Seed => GrowthStage::Sprout,
            GrowthStage::Sprout => GrowthStage::Budding,
            GrowthStage::Budding => GrowthStage::Mature,
            GrowthStage::Mature => GrowthStage::Mature,
        }
    }
}

/// A species at a specific growth stage — the unit the wire format, the soil
/// records, and the plant sprites all agree on.
///
/// Wire codes: 0 = empty tile, 1..=12 = `species_index * 4 + stage_index + 1`.
/// Codes outside that range decode to nothing rather than an undefined visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlantKind {
    pub species: PlantSpecies,
    pub stage: GrowthStage,
}

pub const PLANT_CODE_MAX: u8 = 12;

impl PlantKind {
    pub fn base(species: PlantSpecies) -> Self {
        Self {
            species,
            stage: GrowthStage::Seed,
        }
    }

    pub fn code(self) -> u8 {
        self.species.index() * 4 + self.stage.index() + 1
    }

    pub fn from_code(code: u8) -> Option<Self> {
        if code == 0 || code > PLANT_CODE_MAX {
            return None;
        }
        let idx = code - 1;
        Some(Self {
            species: PlantSpecies::from_index(idx / 4)?,
            stage: GrowthStage::from_index(idx % 4)?,
        })
    }

    /// Same species, one stage further along (terminal at Mature).
    pub fn advanced(self) -> Self {
        Self {
            species: self.species,
            stage: self.stage.next(),
        }
    }

    pub fn is_mature(self) -> bool {
        self.stage == GrowthStage::Mature
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FARM STATE — per-tile soil/plant records
// ═══════════════════════════════════════════════════════════════════════

/// Tile coordinates. Single-byte components so the save codec can store
/// them directly.
pub type TilePos = (u8, u8);

/// Soil record for one farmable tile. Sun/water are running totals that may
/// exceed 255 between ticks; they are clamped only when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilTile {
    pub sun_level: u16,
    pub water_level: u16,
    pub plant: Option<PlantKind>,
}

/// Authoritative soil/plant state for the whole farm.
///
/// The map is append-only over the coordinate key space: a record is created
/// once per farming-layer tile (or upserted by the save codec) and never
/// removed — only its fields mutate. BTreeMap keeps iteration order
/// deterministic, which the save codec relies on.
#[derive(Resource, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FarmState {
    pub tiles: BTreeMap<TilePos, SoilTile>,
}

impl FarmState {
    /// Create a fresh soil record for every farming-layer coordinate:
    /// no sun, a little starting moisture, no plant. Called exactly once at
    /// world start, before any saved state is restored.
    pub fn init_tiles(
        &mut self,
        coords: impl IntoIterator<Item = TilePos>,
        rng: &mut impl rand::Rng,
    ) {
        for pos in coords {
            self.tiles.insert(
                pos,
                SoilTile {
                    sun_level: 0,
                    water_level: rng.gen_range(1..=2),
                    plant: None,
                },
            );
        }
    }

    pub fn tile(&self, pos: TilePos) -> Option<&SoilTile> {
        self.tiles.get(&pos)
    }

    pub fn tile_mut(&mut self, pos: TilePos) -> Option<&mut SoilTile> {
        self.tiles.get_mut(&pos)
    }

    /// Put a plant on a tile. Returns false (leaving the tile untouched)
    /// when the coordinate is not farmable or already occupied.
    pub fn plant_at(&mut self, pos: TilePos, kind: PlantKind) -> bool {
        let Some(tile) = self.tiles.get_mut(&pos) else {
            return false;
        };
        if tile.plant.is_some() {
            return false;
        }
        tile.plant = Some(kind);
        true
    }

    /// Clear the plant from a tile. Returns false when the coordinate is not
    /// farmable or there is nothing to reap.
    pub fn reap_at(&mut self, pos: TilePos) -> bool {
        let Some(tile) = self.tiles.get_mut(&pos) else {
            return false;
        };
        if tile.plant.is_none() {
            return false;
        }
        tile.plant = None;
        true
    }

    /// Number of plants currently at the final growth stage, any species.
    pub fn mature_plant_count(&self) -> usize {
        self.tiles
            .values()
            .filter(|t| t.plant.is_some_and(|p| p.is_mature()))
            .count()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// GAME CLOCK
// ═══════════════════════════════════════════════════════════════════════

/// Elapsed game time plus the cooldown gating the accrue-and-grow step.
/// The cooldown is a tick counter, not a wall-clock timer, so the whole
/// simulation stays deterministic under the fixed-step loop.
#[derive(Resource, Debug, Clone, Default)]
pub struct GameClock {
    /// Discrete time units (displayed as MM:SS). Wraps at u16::MAX, which
    /// matches the 16-bit field in the save layout.
    pub time_elapsed: u16,
    pub advance_cooldown: u32,
}

impl GameClock {
    pub fn ready(&self) -> bool {
        self.advance_cooldown == 0
    }

    /// Advance one time unit and re-arm the cooldown.
    pub fn advance(&mut self) {
        self.time_elapsed = self.time_elapsed.wrapping_add(1);
        self.advance_cooldown = ADVANCE_COOLDOWN_TICKS;
    }

    pub fn tick(&mut self) {
        self.advance_cooldown = self.advance_cooldown.saturating_sub(1);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER & INPUT
// ═══════════════════════════════════════════════════════════════════════

#[derive(Component, Debug, Clone, Default)]
pub struct Player;

#[derive(Component, Debug, Clone, Copy)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The single place where hardware keys become game actions.
/// Written by the input domain each frame, read by everyone else.
#[derive(Resource, Debug, Clone, Default)]
pub struct PlayerInput {
    pub move_axis: Vec2,
    /// Edge-triggered: pressed this frame.
    pub plant: bool,
    pub reap: bool,
    pub advance_time: bool,
}

#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub plant: KeyCode,
    pub reap: KeyCode,
    pub advance_time: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_up: KeyCode::KeyW,
            move_down: KeyCode::KeyS,
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            plant: KeyCode::KeyR,
            reap: KeyCode::KeyF,
            advance_time: KeyCode::KeyT,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — cross-domain communication
// ═══════════════════════════════════════════════════════════════════════

/// A plant was created on a tile; the render sync spawns its sprite.
#[derive(Event, Debug, Clone)]
pub struct PlantAddedEvent {
    pub pos: TilePos,
    pub kind: PlantKind,
}

/// A plant was reaped; the render sync despawns its sprite.
#[derive(Event, Debug, Clone)]
pub struct PlantRemovedEvent {
    pub pos: TilePos,
}

/// A plant advanced a growth stage; the render sync restyles its sprite.
#[derive(Event, Debug, Clone)]
pub struct PlantStageChangedEvent {
    pub pos: TilePos,
    pub kind: PlantKind,
}

/// Fired exactly once, when the mature-plant count first reaches the win
/// threshold.
#[derive(Event, Debug, Clone)]
pub struct GameWonEvent;

// ═══════════════════════════════════════════════════════════════════════
// GRID HELPERS
// ═══════════════════════════════════════════════════════════════════════

/// World-space centre of a tile.
pub fn tile_to_world(pos: TilePos) -> Vec2 {
    Vec2::new(
        pos.0 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        pos.1 as f32 * TILE_SIZE + TILE_SIZE / 2.0,
    )
}

/// Tile under a world-space position, if it lands in the byte-addressable
/// grid at all.
pub fn world_to_tile(x: f32, y: f32) -> Option<TilePos> {
    let tx = (x / TILE_SIZE).floor();
    let ty = (y / TILE_SIZE).floor();
    if (0.0..=255.0).contains(&tx) && (0.0..=255.0).contains(&ty) {
        Some((tx as u8, ty as u8))
    } else {
        None
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

pub const TILE_SIZE: f32 = 32.0;
pub const SCREEN_WIDTH: f32 = 960.0;
pub const SCREEN_HEIGHT: f32 = 540.0;

/// The farming plot: an 18×18 block of tillable tiles.
pub const FARM_MIN_TILE: u8 = 41;
pub const FARM_MAX_TILE: u8 = 58;

pub const PLAYER_SPEED: f32 = 200.0;
pub const DEFAULT_PLAYER_POS: Vec2 = Vec2::new(1200.0, 1600.0);
pub const WORLD_SIZE_PX: f32 = 3200.0;

/// Growth eligibility thresholds (see farming::growth).
pub const SUN_REQUIREMENT: u16 = 5;
pub const WATER_REQUIREMENT: u16 = 5;
pub const NEIGHBOR_RANGE: f32 = 3.0;
pub const NEIGHBORS_REQUIRED: usize = 2;

pub const MATURE_PLANTS_TO_WIN: usize = 5;

/// Update ticks between accepted time-advance presses.
pub const ADVANCE_COOLDOWN_TICKS: u32 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_codes_are_total_and_bidirectional() {
        // 12 nonzero codes, one per species × stage.
        let mut seen = std::collections::BTreeSet::new();
        for species in PlantSpecies::ALL {
            for stage in [
                GrowthStage::Seed,
                GrowthStage::Sprout,
                GrowthStage::Budding,
                GrowthStage::Mature,
            ] {
                let kind = PlantKind { species, stage };
                let code = kind.code();
                assert!((1..=PLANT_CODE_MAX).contains(&code));
                assert_eq!(PlantKind::from_code(code), Some(kind));
                seen.insert(code);
            }
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_out_of_range_codes_decode_to_nothing() {
        assert_eq!(PlantKind::from_code(0), None);
        assert_eq!(PlantKind::from_code(13), None);
        assert_eq!(PlantKind::from_code(255), None);
    }

    #[test]
    fn test_base_species_codes() {
        // Freshly planted seeds land on one of the three base-stage codes.
        let codes: Vec<u8> = PlantSpecies::ALL
            .iter()
            .map(|&s| PlantKind::base(s).code())
            .collect();
        assert_eq!(codes, vec![1, 5, 9]);
    }

    #[test]
    fn test_stage_advance_is_terminal_at_mature() {
        let mut kind = PlantKind::base(PlantSpecies::Blossom);
        for _ in 0..10 {
            kind = kind.advanced();
        }
        assert_eq!(kind.species, PlantSpecies::Blossom);
        assert!(kind.is_mature());
        assert_eq!(kind.advanced(), kind);
    }

    #[test]
    fn test_plant_at_never_overwrites() {
        let mut farm = FarmState::default();
        let mut rng = rand::thread_rng();
        farm.init_tiles([(3, 4)], &mut rng);

        assert!(farm.plant_at((3, 4), PlantKind::base(PlantSpecies::Fern)));
        let before = farm.tile((3, 4)).unwrap().plant;
        assert!(!farm.plant_at((3, 4), PlantKind::base(PlantSpecies::Reed)));
        assert_eq!(farm.tile((3, 4)).unwrap().plant, before);

        // Unknown tile is a silent no-op too.
        assert!(!farm.plant_at((9, 9), PlantKind::base(PlantSpecies::Fern)));
    }

    #[test]
    fn test_reap_clears_only_occupied_known_tiles() {
        let mut farm = FarmState::default();
        let mut rng = rand::thread_rng();
        farm.init_tiles([(1, 1)], &mut rng);

        assert!(!farm.reap_at((1, 1)), "empty tile");
        assert!(!farm.reap_at((200, 200)), "unknown tile");

        farm.plant_at((1, 1), PlantKind::base(PlantSpecies::Reed));
        assert!(farm.reap_at((1, 1)));
        assert_eq!(farm.tile((1, 1)).unwrap().plant, None);
    }
}
