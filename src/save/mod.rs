//! Persistence — serialize the farm after every tick, restore on boot.
//!
//! The payload is the codec's byte sequence wrapped in a JSON number array,
//! which keeps saves portable between the browser (localStorage) and native
//! (a file next to the executable). A missing, short, or unreadable save is
//! never fatal: the game falls back to the default spawn and a fresh farm.

use bevy::prelude::*;
#[cfg(not(target_arch = "wasm32"))]
use std::fs;
#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

use crate::shared::*;

pub mod codec;

/// Fixed slot name in the durable key/value store.
pub const SAVE_KEY: &str = "sunpatch_state";

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, restore_saved_state.in_set(BootSet::Restore))
            .add_systems(
                PostUpdate,
                autosave.run_if(in_state(GameState::Playing)),
            );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// RESTORE / AUTOSAVE LOGIC
// ═══════════════════════════════════════════════════════════════════════

/// Decode persisted bytes (if any) into the live resources. Returns the
/// restored player position and the plants that need visual-creation
/// signals; anything unusable falls back to the defaults.
pub fn restore_from_bytes(
    bytes: Option<&[u8]>,
    farm: &mut FarmState,
    clock: &mut GameClock,
) -> (Vec2, Vec<(TilePos, PlantKind)>) {
    let Some(state) = bytes.and_then(codec::decode) else {
        return (DEFAULT_PLAYER_POS, Vec::new());
    };

    let plants = codec::apply(&state, farm, clock);
    let pos = Vec2::new(state.player_x as f32, state.player_y as f32);
    (pos, plants)
}

fn restore_saved_state(
    mut farm_state: ResMut<FarmState>,
    mut clock: ResMut<GameClock>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut added_events: EventWriter<PlantAddedEvent>,
) {
    let bytes = match load_persisted_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Could not read saved state: {}. Starting fresh.", e);
            None
        }
    };

    let (pos, plants) = restore_from_bytes(bytes.as_deref(), &mut farm_state, &mut clock);

    if let Ok(mut transform) = player_query.get_single_mut() {
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
    }

    if !plants.is_empty() {
        info!(
            "Restored {} plants, time {}",
            plants.len(),
            clock.time_elapsed
        );
    }
    for (pos, kind) in plants {
        added_events.send(PlantAddedEvent { pos, kind });
    }
}

/// Serialize and persist the whole store after every tick. Errors are
/// logged once and the game keeps running — persistence is best-effort.
fn autosave(
    farm_state: Res<FarmState>,
    clock: Res<GameClock>,
    player_query: Query<&Transform, With<Player>>,
    mut warned: Local<bool>,
) {
    let Ok(transform) = player_query.get_single() else {
        return;
    };

    let state = codec::capture(
        &farm_state,
        &clock,
        transform.translation.truncate(),
    );
    let bytes = codec::encode(&state);

    if let Err(e) = persist_bytes(&bytes) {
        if !*warned {
            warn!("Saving failed: {}. Progress will not persist.", e);
            *warned = true;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STORAGE BACKENDS
// ═══════════════════════════════════════════════════════════════════════

fn to_json(bytes: &[u8]) -> Result<String, String> {
    serde_json::to_string(&bytes.to_vec()).map_err(|e| format!("serialization failed: {}", e))
}

fn from_json(json: &str) -> Result<Vec<u8>, String> {
    serde_json::from_str(json).map_err(|e| format!("corrupt save payload: {}", e))
}

#[cfg(not(target_arch = "wasm32"))]
fn saves_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    exe_dir.join("saves")
}

#[cfg(not(target_arch = "wasm32"))]
fn save_path() -> PathBuf {
    saves_directory().join(format!("{}.json", SAVE_KEY))
}

#[cfg(not(target_arch = "wasm32"))]
fn persist_bytes(bytes: &[u8]) -> Result<(), String> {
    let dir = saves_directory();
    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|e| format!("could not create saves dir: {}", e))?;
    }

    let json = to_json(bytes)?;
    let path = save_path();
    // Write to a temp file first, then rename for atomicity.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json).map_err(|e| format!("write failed: {}", e))?;
    fs::rename(&tmp_path, &path).map_err(|e| format!("rename failed: {}", e))?;
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn load_persisted_bytes() -> Result<Option<Vec<u8>>, String> {
    let path = save_path();
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(&path).map_err(|e| format!("read failed: {}", e))?;
    from_json(&json).map(Some)
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or_else(|| "no window".to_string())?
        .local_storage()
        .map_err(|_| "localStorage unavailable".to_string())?
        .ok_or_else(|| "localStorage unavailable".to_string())
}

#[cfg(target_arch = "wasm32")]
fn persist_bytes(bytes: &[u8]) -> Result<(), String> {
    let json = to_json(bytes)?;
    local_storage()?
        .set_item(SAVE_KEY, &json)
        .map_err(|_| "localStorage write failed (quota?)".to_string())
}

#[cfg(target_arch = "wasm32")]
fn load_persisted_bytes() -> Result<Option<Vec<u8>>, String> {
    let json = local_storage()?
        .get_item(SAVE_KEY)
        .map_err(|_| "localStorage read failed".to_string())?;
    match json {
        Some(json) => from_json(&json).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_envelope_round_trip() {
        let bytes = vec![0, 1, 2, 255, 128];
        let json = to_json(&bytes).unwrap();
        // Plain number array, readable from a browser console.
        assert_eq!(json, "[0,1,2,255,128]");
        assert_eq!(from_json(&json).unwrap(), bytes);
    }

    #[test]
    fn test_corrupt_envelope_is_an_error_not_a_panic() {
        assert!(from_json("not json").is_err());
        assert!(from_json("[1, 999]").is_err());
    }

    #[test]
    fn test_restore_falls_back_on_short_input() {
        let mut farm = FarmState::default();
        let mut clock = GameClock::default();

        let (pos, plants) = restore_from_bytes(Some(&[1, 2, 3, 4, 5]), &mut farm, &mut clock);
        assert_eq!(pos, DEFAULT_PLAYER_POS);
        assert!(plants.is_empty());
        assert!(farm.tiles.is_empty());
        assert_eq!(clock.time_elapsed, 0);

        let (pos, plants) = restore_from_bytes(None, &mut farm, &mut clock);
        assert_eq!(pos, DEFAULT_PLAYER_POS);
        assert!(plants.is_empty());
    }
}
