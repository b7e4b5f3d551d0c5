//! Request context carrying the authenticated player.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skirmish_core::types::PlayerId;

/// Context for the current authenticated request.
///
/// Built by the API extractor from a validated token so services know who
/// is acting and what time to stamp on the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated player.
    pub player_id: PlayerId,
    /// Username from the token claims.
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context stamped with the current time.
    pub fn new(player_id: PlayerId, username: impl Into<String>) -> Self {
        Self {
            player_id,
            username: username.into(),
            request_time: Utc::now(),
        }
    }

    /// Creates a context with an explicit request time.
    pub fn at(player_id: PlayerId, username: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            player_id,
            username: username.into(),
            request_time: now,
        }
    }
}
