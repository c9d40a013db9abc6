use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use super::{SavedState, STATE_VERSION};

fn state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trellis")
}

pub fn state_file_path() -> PathBuf {
    state_dir().join("state.json")
}

pub fn save(state: &SavedState) -> Result<()> {
    save_to(state, &state_file_path())
}

pub fn load() -> Option<SavedState> {
    load_from(&state_file_path())
}

// Path-parameterized variants for testability

pub fn save_to(state: &SavedState, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_from(path: &Path) -> Option<SavedState> {
    let json = fs::read_to_string(path).ok()?;
    let state: SavedState = serde_json::from_str(&json).ok()?;
    // A snapshot from a newer build is not understood; start fresh instead.
    if state.version > STATE_VERSION {
        return None;
    }
    Some(state)
}
