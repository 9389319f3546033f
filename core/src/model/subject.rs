use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{GradeError, GradeResult};
use crate::model::grade::{grade_letter, MAX_CREDITS, MAX_GRADE, MIN_CREDITS};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub credits: u32,
    pub grade: u32,

    // Cached on the record so the stored blob is readable on its own.
    // Re-derived from credits/grade whenever a collection is loaded.
    #[serde(default)]
    pub grade_points: u32,
    #[serde(default)]
    pub grade_letter: String,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Subject {
    /// Builds a subject without validating it. Use [`validate`] first.
    pub fn new(name: &str, credits: u32, grade: u32) -> Self {
        let mut subject = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            credits,
            grade,
            grade_points: 0,
            grade_letter: String::new(),
            created_at: Utc::now(),
        };
        subject.refresh_derived();
        subject
    }

    pub fn refresh_derived(&mut self) {
        self.grade_points = self.credits.saturating_mul(self.grade);
        self.grade_letter = grade_letter(self.grade).to_string();
    }

    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    pub fn is_valid(&self) -> bool {
        validate(&self.name, self.credits, self.grade).is_ok()
    }
}

pub fn validate(name: &str, credits: u32, grade: u32) -> GradeResult<()> {
    if name.trim().is_empty() {
        return Err(GradeError::Validation("subject name is required".to_string()));
    }
    if !(MIN_CREDITS..=MAX_CREDITS).contains(&credits) {
        return Err(GradeError::Validation(format!(
            "credits must be between {} and {} (got {})",
            MIN_CREDITS, MAX_CREDITS, credits
        )));
    }
    if grade > MAX_GRADE {
        return Err(GradeError::Validation(format!(
            "grade must be between 0 and {} (got {})",
            MAX_GRADE, grade
        )));
    }
    Ok(())
}
