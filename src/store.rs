//! Local JSON persistence for event data.
//!
//! All application state lives in one versioned snapshot file. The store
//! is the only component that touches disk; aggregation and report
//! synthesis operate on read-only snapshots borrowed from it.
//!
//! Single-client, last-write-wins: there is no locking and no merge.

use crate::models::{new_id, Feedback, Participant, Session};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Current snapshot schema version.
pub const SCHEMA_VERSION: u32 = 8;

/// The persisted application state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventState {
    pub schema_version: u32,
    pub event_title: String,
    pub sessions: Vec<Session>,
    pub participants: Vec<Participant>,
    pub feedback: Vec<Feedback>,
}

impl Default for EventState {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            event_title: "Untitled Event".to_string(),
            sessions: Vec::new(),
            participants: Vec::new(),
            feedback: Vec::new(),
        }
    }
}

/// File-backed store for one event.
pub struct Store {
    path: PathBuf,
    state: EventState,
}

impl Store {
    /// Load the store from `path`. A missing file yields an empty default
    /// state; a corrupt or newer-versioned file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let state = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read store file: {}", path.display()))?;
            let state: EventState = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse store file: {}", path.display()))?;

            if state.schema_version > SCHEMA_VERSION {
                bail!(
                    "store file {} uses schema v{} (this build understands up to v{})",
                    path.display(),
                    state.schema_version,
                    SCHEMA_VERSION
                );
            }
            debug!("Loaded store from {}", path.display());
            state
        } else {
            info!("No store file at {}, starting empty", path.display());
            EventState::default()
        };

        Ok(Self {
            path: path.to_path_buf(),
            state,
        })
    }

    /// Persist the current state as pretty JSON. Last write wins.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.state)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write store file: {}", self.path.display()))?;
        debug!("Saved store to {}", self.path.display());
        Ok(())
    }

    pub fn state(&self) -> &EventState {
        &self.state
    }

    pub fn event_title(&self) -> &str {
        &self.state.event_title
    }

    pub fn set_event_title(&mut self, title: String) {
        self.state.event_title = title;
    }

    pub fn sessions(&self) -> &[Session] {
        &self.state.sessions
    }

    pub fn participants(&self) -> &[Participant] {
        &self.state.participants
    }

    pub fn feedback(&self) -> &[Feedback] {
        &self.state.feedback
    }

    pub fn find_session(&self, id: &str) -> Option<&Session> {
        self.state.sessions.iter().find(|s| s.id == id)
    }

    pub fn find_participant(&self, id: &str) -> Option<&Participant> {
        self.state.participants.iter().find(|p| p.id == id)
    }

    /// Feedback submitted for one session.
    pub fn feedback_for_session(&self, session_id: &str) -> Vec<Feedback> {
        self.state
            .feedback
            .iter()
            .filter(|f| f.session_id == session_id)
            .cloned()
            .collect()
    }

    /// Append sessions, assigning fresh ids to any without one.
    pub fn add_sessions(&mut self, mut sessions: Vec<Session>) {
        for session in sessions.iter_mut() {
            if session.id.is_empty() {
                session.id = new_id();
            }
        }
        self.state.sessions.extend(sessions);
    }

    pub fn update_session(&mut self, updated: Session) -> Result<()> {
        match self.state.sessions.iter_mut().find(|s| s.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                Ok(())
            }
            None => bail!("no session with id {}", updated.id),
        }
    }

    /// Remove a session. Feedback referencing it is kept; the aggregation
    /// layer skips records whose session no longer resolves.
    pub fn remove_session(&mut self, id: &str) -> Result<()> {
        let before = self.state.sessions.len();
        self.state.sessions.retain(|s| s.id != id);
        if self.state.sessions.len() == before {
            bail!("no session with id {}", id);
        }
        Ok(())
    }

    pub fn add_participants(&mut self, mut participants: Vec<Participant>) {
        for participant in participants.iter_mut() {
            if participant.id.is_empty() {
                participant.id = new_id();
            }
        }
        self.state.participants.extend(participants);
    }

    pub fn update_participant(&mut self, updated: Participant) -> Result<()> {
        match self
            .state
            .participants
            .iter_mut()
            .find(|p| p.id == updated.id)
        {
            Some(slot) => {
                *slot = updated;
                Ok(())
            }
            None => bail!("no participant with id {}", updated.id),
        }
    }

    /// Remove a participant. Their feedback is kept (no cascade).
    pub fn remove_participant(&mut self, id: &str) -> Result<()> {
        let before = self.state.participants.len();
        self.state.participants.retain(|p| p.id != id);
        if self.state.participants.len() == before {
            bail!("no participant with id {}", id);
        }
        Ok(())
    }

    /// Append one feedback record. This is the submission boundary: an
    /// incomplete form (fewer than one answer per questionnaire entry) is
    /// rejected. Feedback has no edit or delete path.
    pub fn add_feedback(&mut self, mut feedback: Feedback) -> Result<()> {
        if !feedback.is_complete() {
            bail!(
                "incomplete feedback: expected {} answers, one per question",
                crate::models::QUESTIONNAIRE.len()
            );
        }
        if feedback.id.is_empty() {
            feedback.id = new_id();
        }
        self.state.feedback.push(feedback);
        Ok(())
    }
}
