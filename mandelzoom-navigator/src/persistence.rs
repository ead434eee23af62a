//! Save and restore the navigator's boundary and render parameters.

use crate::error::NavigatorError;
use mandelzoom_core::{BoundaryMode, RenderParameters};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Bump when the session format changes.
pub const SESSION_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigatorSession {
    pub version: u32,
    /// Boundary in whichever mode it was in; high precision edges keep
    /// their full decimal digits.
    pub boundary: BoundaryMode,
    pub params: RenderParameters,
}

impl NavigatorSession {
    pub fn new(boundary: BoundaryMode, params: RenderParameters) -> Self {
        Self {
            version: SESSION_VERSION,
            boundary,
            params,
        }
    }
}

pub fn save_session(path: impl AsRef<Path>, session: &NavigatorSession) -> Result<(), NavigatorError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(session)?;
    fs::write(path, json)?;
    log::info!(
        "Saved {} session to {}",
        session.boundary.name(),
        path.display()
    );
    Ok(())
}

/// Load a saved session. Missing, unreadable or incompatible files yield `None`.
pub fn load_session(path: impl AsRef<Path>) -> Option<NavigatorSession> {
    let path = path.as_ref();
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::debug!("No session at {}: {}", path.display(), e);
            return None;
        }
    };

    let session: NavigatorSession = match serde_json::from_str(&json) {
        Ok(session) => session,
        Err(e) => {
            log::warn!("Failed to parse session {}: {}", path.display(), e);
            return None;
        }
    };

    if session.version != SESSION_VERSION {
        log::warn!(
            "Session version mismatch: expected {}, got {}",
            SESSION_VERSION,
            session.version
        );
        return None;
    }

    log::info!(
        "Loaded {} session from {}",
        session.boundary.name(),
        path.display()
    );
    Some(session)
}
