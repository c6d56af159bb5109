//! Flattens a raw osu! user record into a flat stat-key → number mapping.
//!
//! Two shapes need normalizing: `level` is an object whose `current` field
//! carries the value we expose, and `grade_counts` is a tally object whose
//! entries become individually named `grade_counts_<grade>` keys.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("missing or malformed field '{0}'")]
    MalformedField(&'static str),
}

/// The decoded per-user result: identity plus the flat numeric mapping the
/// metric sink consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct UserStats {
    pub user_id: u64,
    pub username: String,
    pub values: BTreeMap<String, f64>,
}

pub fn map_user_stats(body: &str) -> Result<UserStats, MapError> {
    let record: Value = serde_json::from_str(body)?;

    let user_id = record
        .get("id")
        .and_then(Value::as_u64)
        .ok_or(MapError::MalformedField("id"))?;
    let username = record
        .get("username")
        .and_then(Value::as_str)
        .ok_or(MapError::MalformedField("username"))?
        .to_string();
    let statistics = record
        .get("statistics")
        .and_then(Value::as_object)
        .ok_or(MapError::MalformedField("statistics"))?;

    let mut values = BTreeMap::new();
    for (key, value) in statistics {
        match key.as_str() {
            "level" => {
                let current = value
                    .get("current")
                    .and_then(Value::as_f64)
                    .ok_or(MapError::MalformedField("level.current"))?;
                values.insert(key.clone(), current);
            }
            "grade_counts" => {
                let counts = value
                    .as_object()
                    .ok_or(MapError::MalformedField("grade_counts"))?;
                for (grade, count) in counts {
                    if let Some(count) = count.as_f64() {
                        values.insert(format!("grade_counts_{grade}"), count);
                    }
                }
            }
            // Non-numeric leaves (e.g. a null rank on inactive accounts)
            // are simply not mapped.
            _ => {
                if let Some(number) = value.as_f64() {
                    values.insert(key.clone(), number);
                }
            }
        }
    }

    if !statistics.contains_key("level") {
        return Err(MapError::MalformedField("level.current"));
    }
    if !statistics.contains_key("grade_counts") {
        return Err(MapError::MalformedField("grade_counts"));
    }

    Ok(UserStats {
        user_id,
        username,
        values,
    })
}
