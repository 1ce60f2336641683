//! CSV templates and batch import for the session program and the
//! participant list.
//!
//! The format is the naive template one: plain comma separation, no
//! quoting, one record per line, header row first.

use crate::models::{new_id, Participant, Session};
use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};

/// Downloadable template for the session program.
pub const SESSION_TEMPLATE: &str = "Module Title,Presenter,Email,Phone,Date (YYYY-MM-DD),Start (HH:mm),End (HH:mm),Location\nStrategic Planning,Dr. Aris,aris@example.com,+123456789,2024-11-20,09:00,10:30,Room 101\n";

/// Downloadable template for the participant list.
pub const PARTICIPANT_TEMPLATE: &str =
    "Full Name,Email Address,Phone\nAlice Doe,alice@example.com,+123456789\n";

/// Parse a batch of sessions from template-format CSV.
///
/// The header row is skipped; blank lines are ignored. Each record gets a
/// fresh id.
pub fn parse_sessions_csv(content: &str) -> Result<Vec<Session>> {
    let mut sessions = Vec::new();

    for (line_no, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 8 {
            bail!(
                "line {}: expected 8 columns, found {}",
                line_no + 1,
                fields.len()
            );
        }

        let date = NaiveDate::parse_from_str(fields[4], "%Y-%m-%d")
            .with_context(|| format!("line {}: bad date '{}'", line_no + 1, fields[4]))?;
        let start_time = NaiveTime::parse_from_str(fields[5], "%H:%M")
            .with_context(|| format!("line {}: bad start time '{}'", line_no + 1, fields[5]))?;
        let end_time = NaiveTime::parse_from_str(fields[6], "%H:%M")
            .with_context(|| format!("line {}: bad end time '{}'", line_no + 1, fields[6]))?;

        sessions.push(Session {
            id: new_id(),
            title: fields[0].to_string(),
            date,
            start_time,
            end_time,
            presenter_name: fields[1].to_string(),
            presenter_email: fields[2].to_string(),
            presenter_phone: optional(fields[3]),
            location: fields[7].to_string(),
            material_url: None,
        });
    }

    Ok(sessions)
}

/// Parse a batch of participants from template-format CSV.
pub fn parse_participants_csv(content: &str) -> Result<Vec<Participant>> {
    let mut participants = Vec::new();

    for (line_no, line) in content.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            bail!(
                "line {}: expected 3 columns, found {}",
                line_no + 1,
                fields.len()
            );
        }

        participants.push(Participant {
            id: new_id(),
            name: fields[0].to_string(),
            email: fields[1].to_string(),
            phone: optional(fields[2]),
        });
    }

    Ok(participants)
}

fn optional(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}
