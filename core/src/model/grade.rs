use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_CREDITS: u32 = 1;
pub const MAX_CREDITS: u32 = 10;
pub const MAX_GRADE: u32 = 10;

/// Letter shown next to a numeric grade. Anything below 4 is a fail.
pub fn grade_letter(grade: u32) -> &'static str {
    match grade {
        10 => "A+",
        9 => "A",
        8 => "B+",
        7 => "B",
        6 => "C+",
        5 => "C",
        4 => "D",
        0..=3 => "F",
        _ => "N/A",
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Excellent,
    VeryGood,
    Good,
    Satisfactory,
    NeedsImprovement,
    Critical,
}

impl Performance {
    pub fn from_sgpa(sgpa: f64) -> Self {
        if sgpa >= 9.0 {
            Performance::Excellent
        } else if sgpa >= 8.0 {
            Performance::VeryGood
        } else if sgpa >= 7.0 {
            Performance::Good
        } else if sgpa >= 6.0 {
            Performance::Satisfactory
        } else if sgpa >= 5.0 {
            Performance::NeedsImprovement
        } else {
            Performance::Critical
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Performance::Excellent => "Excellent Performance!",
            Performance::VeryGood => "Very Good Performance!",
            Performance::Good => "Good Performance!",
            Performance::Satisfactory => "Satisfactory Performance",
            Performance::NeedsImprovement => "Needs Improvement",
            Performance::Critical => "Critical - Requires Attention!",
        }
    }
}

impl fmt::Display for Performance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
