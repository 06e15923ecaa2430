//! Fixed-layout byte codec for the persisted world state.
//!
//! Layout (little-endian u16 fields):
//!
//! ```text
//! bytes[0..2)  player_x
//! bytes[2..4)  player_y
//! bytes[4..6)  time_elapsed
//! bytes[6..]   5-byte tile records, one per tracked soil tile, in the
//!              store's iteration order:
//!              [tile_x, tile_y, plant_code, sun_level, water_level]
//! ```
//!
//! Sun/water are clamped to 255 here and only here; the store keeps the
//! unclamped running totals. Player position is the pixel position truncated
//! to 16 bits (sub-pixel physics state is lost on purpose).

use bevy::prelude::*;

use crate::shared::*;

pub const HEADER_LEN: usize = 6;
pub const TILE_RECORD_LEN: usize = 5;

/// One serialized soil record. `plant_code` is kept raw; mapping to a
/// `PlantKind` (and dropping out-of-range codes) happens on apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRecord {
    pub x: u8,
    pub y: u8,
    pub plant_code: u8,
    pub sun_level: u8,
    pub water_level: u8,
}

/// The codec's view of the world: everything that survives a reload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveState {
    pub player_x: u16,
    pub player_y: u16,
    pub time_elapsed: u16,
    pub tiles: Vec<TileRecord>,
}

/// Serialize to exactly `6 + 5 * N` bytes.
pub fn encode(state: &SaveState) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + state.tiles.len() * TILE_RECORD_LEN);
    bytes.extend_from_slice(&state.player_x.to_le_bytes());
    bytes.extend_from_slice(&state.player_y.to_le_bytes());
    bytes.extend_from_slice(&state.time_elapsed.to_le_bytes());
    for record in &state.tiles {
        bytes.extend_from_slice(&[
            record.x,
            record.y,
            record.plant_code,
            record.sun_level,
            record.water_level,
        ]);
    }
    bytes
}

/// Deserialize any byte prefix. Fewer than 6 bytes means no valid state
/// (None); after the header, whole 5-byte records are consumed and a
/// dangling 1–4 byte tail is silently discarded.
pub fn decode(bytes: &[u8]) -> Option<SaveState> {
    if bytes.len() < HEADER_LEN {
        return None;
    }

    let mut state = SaveState {
        player_x: u16::from_le_bytes([bytes[0], bytes[1]]),
        player_y: u16::from_le_bytes([bytes[2], bytes[3]]),
        time_elapsed: u16::from_le_bytes([bytes[4], bytes[5]]),
        tiles: Vec::new(),
    };

    for chunk in bytes[HEADER_LEN..].chunks_exact(TILE_RECORD_LEN) {
        state.tiles.push(TileRecord {
            x: chunk[0],
            y: chunk[1],
            plant_code: chunk[2],
            sun_level: chunk[3],
            water_level: chunk[4],
        });
    }

    Some(state)
}

/// Snapshot the live resources into codec form.
pub fn capture(farm: &FarmState, clock: &GameClock, player_pos: Vec2) -> SaveState {
    SaveState {
        // Bit-truncate, not saturate.
        player_x: player_pos.x as i32 as u16,
        player_y: player_pos.y as i32 as u16,
        time_elapsed: clock.time_elapsed,
        tiles: farm
            .tiles
            .iter()
            .map(|(&(x, y), tile)| TileRecord {
                x,
                y,
                plant_code: tile.plant.map_or(0, PlantKind::code),
                sun_level: tile.sun_level.min(255) as u8,
                water_level: tile.water_level.min(255) as u8,
            })
            .collect(),
    }
}

/// Write a decoded snapshot back into the live resources. Every record
/// upserts its soil tile (no validation against the farming layer). Returns
/// the plants that need visual-creation signals; unknown plant codes are
/// dropped rather than given an undefined visual.
pub fn apply(state: &SaveState, farm: &mut FarmState, clock: &mut GameClock) -> Vec<(TilePos, PlantKind)> {
    clock.time_elapsed = state.time_elapsed;

    let mut plants = Vec::new();
    for record in &state.tiles {
        let pos = (record.x, record.y);
        let plant = PlantKind::from_code(record.plant_code);
        farm.tiles.insert(
            pos,
            SoilTile {
                sun_level: record.sun_level as u16,
                water_level: record.water_level as u16,
                plant,
            },
        );
        if let Some(kind) = plant {
            plants.push((pos, kind));
        }
    }
    plants
}
