//! Checkpoint - save/restore agent state
//!
//! Enables serialization and deserialization of an agent's persistent
//! state for pause/resume of long runs.
//!
//! # Critical Invariants
//!
//! - **Determinism**: capture → restore → identical subsequent behavior,
//!   because the RNG state travels with the snapshot
//! - **Config Matching**: a snapshot can only be restored under the
//!   configuration that produced it, validated by a SHA-256 hash of the
//!   serialized config

use crate::agents::botmaster::BotmasterState;
use crate::agents::spoofer::{MasterCmd, SpooferState};
use crate::agents::ConfigError;
use crate::models::blotter::Blotter;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors that can occur during checkpoint capture or restore
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("snapshot was captured under a different configuration")]
    ConfigMismatch,

    #[error("failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// SHA-256 hex digest of a serialized configuration.
///
/// Binds a snapshot to the exact config that produced it.
pub(crate) fn config_hash<T: Serialize>(config: &T) -> Result<String, CheckpointError> {
    let encoded = serde_json::to_vec(config)?;
    let mut hasher = Sha256::new();
    hasher.update(&encoded);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Spoofer state snapshot
///
/// Everything the agent carries across wakeups: machine state, the last
/// coordinator answer, the RNG state, and the blotter. The event log is
/// not checkpointed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpooferSnapshot {
    /// Hash of the config this snapshot was captured under
    pub config_hash: String,
    pub state: SpooferState,
    pub master_cmd: MasterCmd,
    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,
    pub blotter: Blotter,
}

/// Botmaster state snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotmasterSnapshot {
    /// Hash of the config this snapshot was captured under
    pub config_hash: String,
    pub state: BotmasterState,
    pub accumulation_placed: bool,
    pub liquidation_placed: bool,
    /// RNG state at time of snapshot (CRITICAL for determinism)
    pub rng_state: u64,
    pub blotter: Blotter,
}
