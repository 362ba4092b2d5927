use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use taskdraw_core::ProfileId;

const STATE_SCHEMA_VERSION: u32 = 1;

/// Client-local state. Only the active profile survives a restart; draw
/// cycles always start fresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientState {
    pub version: u32,
    #[serde(default)]
    pub active_profile_id: Option<ProfileId>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            version: STATE_SCHEMA_VERSION,
            active_profile_id: None,
        }
    }
}

/// A missing file is an empty state.
pub fn load_client_state(path: &Path) -> anyhow::Result<ClientState> {
    if !path.exists() {
        return Ok(ClientState::default());
    }
    let body = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let state: ClientState =
        serde_json::from_str(&body).with_context(|| format!("parse {}", path.display()))?;
    if state.version != STATE_SCHEMA_VERSION {
        bail!(
            "unsupported state version {} (expected {})",
            state.version,
            STATE_SCHEMA_VERSION
        );
    }
    Ok(state)
}

pub fn save_client_state(path: &Path, active_profile_id: Option<ProfileId>) -> anyhow::Result<()> {
    let state = ClientState {
        version: STATE_SCHEMA_VERSION,
        active_profile_id,
    };
    let body = serde_json::to_string_pretty(&state)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))
}
