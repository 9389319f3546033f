//! On-disk shape of the two stored blobs.
//!
//! Subjects are written as `{"version":1,"subjects":[...]}`. A bare JSON
//! array (the pre-versioned layout, with numeric timestamp ids) is still
//! accepted when reading; those entries get fresh UUIDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::{GradeError, GradeResult};
use crate::model::results::ResultSnapshot;
use crate::model::subject::{validate, Subject};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug)]
pub struct SubjectRecord {
    pub version: u32,
    pub subjects: Vec<Subject>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSubjects {
    Versioned { version: u32, subjects: Vec<Value> },
    Legacy(Vec<Value>),
}

/// One stored entry, read loosely so a single bad entry can be skipped
/// without losing the rest of the list.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSubject {
    id: Value,
    name: String,
    credits: i64,
    grade: i64,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

pub fn encode_subjects(subjects: &[Subject]) -> GradeResult<String> {
    let record = SubjectRecord {
        version: SCHEMA_VERSION,
        subjects: subjects.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&record)?)
}

/// Parses a stored subject blob. Entries that do not parse or fail
/// validation are dropped and the cached grade points / letter are
/// recomputed on the rest.
pub fn decode_subjects(raw: &str) -> GradeResult<Vec<Subject>> {
    let entries = match serde_json::from_str::<StoredSubjects>(raw)? {
        StoredSubjects::Versioned { version, subjects } => {
            check_version(version)?;
            subjects
        }
        StoredSubjects::Legacy(subjects) => subjects,
    };

    let subjects = entries
        .into_iter()
        .filter_map(|entry| match decode_entry(entry) {
            Ok(subject) => Some(subject),
            Err(e) => {
                warn!(error = %e, "dropping unreadable stored subject");
                None
            }
        })
        .collect();
    Ok(sanitize(subjects))
}

fn decode_entry(entry: Value) -> GradeResult<Subject> {
    let stored: StoredSubject = serde_json::from_value(entry)?;

    let id = match &stored.id {
        Value::String(s) => Uuid::parse_str(s).unwrap_or_else(|_| Uuid::new_v4()),
        // Timestamp ids from the pre-versioned layout.
        _ => Uuid::new_v4(),
    };
    let credits = u32::try_from(stored.credits)
        .map_err(|_| GradeError::Validation(format!("credits out of range: {}", stored.credits)))?;
    let grade = u32::try_from(stored.grade)
        .map_err(|_| GradeError::Validation(format!("grade out of range: {}", stored.grade)))?;
    validate(&stored.name, credits, grade)?;

    let mut subject = Subject::new(&stored.name, credits, grade);
    subject.id = id;
    if let Some(created_at) = stored.created_at {
        subject.created_at = created_at;
    }
    Ok(subject)
}

pub fn encode_snapshot(snapshot: &ResultSnapshot) -> GradeResult<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn decode_snapshot(raw: &str) -> GradeResult<ResultSnapshot> {
    let mut snapshot: ResultSnapshot = serde_json::from_str(raw)?;
    check_version(snapshot.version)?;
    snapshot.subjects = sanitize(snapshot.subjects);
    Ok(snapshot)
}

fn check_version(version: u32) -> GradeResult<()> {
    if version != SCHEMA_VERSION {
        return Err(GradeError::Validation(format!(
            "unsupported record version {} (expected {})",
            version, SCHEMA_VERSION
        )));
    }
    Ok(())
}

fn sanitize(subjects: Vec<Subject>) -> Vec<Subject> {
    let mut kept: Vec<Subject> = Vec::with_capacity(subjects.len());
    for mut subject in subjects {
        if !subject.is_valid() {
            warn!(name = %subject.name, "dropping stored subject with out-of-range fields");
            continue;
        }
        if kept.iter().any(|s| s.id == subject.id) {
            warn!(id = %subject.id, "dropping stored subject with duplicate id");
            continue;
        }
        subject.refresh_derived();
        kept.push(subject);
    }
    kept
}
