use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::model::SavedState;

pub fn save_state(path: impl AsRef<Path>, state: &SavedState) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(state).map_err(|e| Error::Format {
        path: path.to_owned(),
        message: e.to_string(),
    })?;
    fs::write(path, json).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;

    info!("Saved {} bodies to {}", state.system.planets().len(), path.display());
    Ok(())
}

pub fn load_state(path: impl AsRef<Path>) -> Result<SavedState> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    let state: SavedState = serde_json::from_str(&json).map_err(|e| Error::Format {
        path: path.to_owned(),
        message: e.to_string(),
    })?;
    state.validate().map_err(|message| Error::Format {
        path: path.to_owned(),
        message: message.to_owned(),
    })?;

    info!("Loaded {} bodies from {}", state.system.planets().len(), path.display());
    Ok(state)
}
