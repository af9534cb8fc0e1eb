//! Session state record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transcript size observed at the last preemptive handoff of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStateRecord {
    pub session_id: String,
    pub transcript_size: u64,
    pub timestamp: DateTime<Utc>,
}

impl SessionStateRecord {
    pub fn new(session_id: &str, transcript_size: u64) -> Self {
        Self {
            session_id: session_id.to_string(),
            transcript_size,
            timestamp: Utc::now(),
        }
    }
}
