#![forbid(unsafe_code)]

//! Serialization of the selection across teardown and rebuild.
//!
//! The blob is UTF-8 JSON. Child state blobs are opaque bytes, stored as
//! base64 strings keyed by position:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "version": 1,
//!   "data": {
//!     "index": 3,
//!     "child_states": { "4": "AQID" },
//!     "global": null
//!   }
//! }
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Result |
//! |---------|-------|--------|
//! | Empty input | Nothing was saved | [`CodecError::Empty`] |
//! | Bad JSON | Truncated or foreign data | [`CodecError::Json`] |
//! | Bad base64 | Corrupted child state | [`CodecError::Base64`] |
//! | Version mismatch | Saved by another build | [`CodecError::Version`] |
//!
//! Callers treat every error as "no prior state".

use std::collections::BTreeMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::stateful::VersionedState;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors decoding a persisted selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The blob is not valid JSON of the expected shape.
    Json(String),
    /// A state blob is not valid base64. `position` is `None` for the global
    /// blob.
    Base64 {
        position: Option<usize>,
        message: String,
    },
    /// The blob was written with a different format or schema version.
    Version { stored: u32, expected: u32 },
    /// The blob is empty.
    Empty,
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "malformed selection state: {msg}"),
            Self::Base64 {
                position: Some(position),
                message,
            } => write!(f, "invalid child state at position {position}: {message}"),
            Self::Base64 {
                position: None,
                message,
            } => write!(f, "invalid global state: {message}"),
            Self::Version { stored, expected } => {
                write!(f, "selection state version {stored}, expected {expected}")
            }
            Self::Empty => write!(f, "selection state is empty"),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saved state
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to resume a grid's selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedSelection {
    /// Selected position.
    pub index: Option<usize>,
    /// Opaque per-position child state.
    pub child_states: BTreeMap<usize, Vec<u8>>,
    /// Opaque container-level state.
    pub global: Option<Vec<u8>>,
}

impl SavedSelection {
    /// Whether there is nothing to restore.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_none() && self.child_states.is_empty() && self.global.is_none()
    }
}

#[derive(Serialize, Deserialize)]
struct StateFile {
    format_version: u32,
    version: u32,
    data: StateData,
}

#[derive(Serialize, Deserialize)]
struct StateData {
    index: Option<usize>,
    #[serde(default)]
    child_states: BTreeMap<usize, String>,
    #[serde(default)]
    global: Option<String>,
}

/// Encodes and decodes [`SavedSelection`] blobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionStateCodec;

impl SelectionStateCodec {
    /// Version of the JSON envelope layout.
    pub const FORMAT_VERSION: u32 = 1;

    /// Serialize a versioned selection.
    pub fn encode(state: &VersionedState<SavedSelection>) -> Result<Vec<u8>, CodecError> {
        let selection = &state.data;
        let file = StateFile {
            format_version: Self::FORMAT_VERSION,
            version: state.version,
            data: StateData {
                index: selection.index,
                child_states: selection
                    .child_states
                    .iter()
                    .map(|(&position, blob)| (position, STANDARD.encode(blob)))
                    .collect(),
                global: selection.global.as_ref().map(|blob| STANDARD.encode(blob)),
            },
        };
        Ok(serde_json::to_vec(&file)?)
    }

    /// Parse a blob written by [`encode`](Self::encode).
    ///
    /// `expected_version` is the reader's schema version.
    pub fn decode(bytes: &[u8], expected_version: u32) -> Result<SavedSelection, CodecError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(CodecError::Empty);
        }
        let file: StateFile = serde_json::from_slice(bytes)?;
        if file.format_version != Self::FORMAT_VERSION {
            return Err(CodecError::Version {
                stored: file.format_version,
                expected: Self::FORMAT_VERSION,
            });
        }
        let versioned = VersionedState::new(file.version, file.data);
        if versioned.version != expected_version {
            return Err(CodecError::Version {
                stored: versioned.version,
                expected: expected_version,
            });
        }
        let data = versioned.data;

        let mut child_states = BTreeMap::new();
        for (position, encoded) in data.child_states {
            let blob = STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| CodecError::Base64 {
                    position: Some(position),
                    message: e.to_string(),
                })?;
            child_states.insert(position, blob);
        }
        let global = data
            .global
            .map(|encoded| {
                STANDARD
                    .decode(encoded.as_bytes())
                    .map_err(|e| CodecError::Base64 {
                        position: None,
                        message: e.to_string(),
                    })
            })
            .transpose()?;

        Ok(SavedSelection {
            index: data.index,
            child_states,
            global,
        })
    }
}
