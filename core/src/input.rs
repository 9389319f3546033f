use std::collections::HashMap;
use anyhow::{anyhow, Result};

use crate::error::{GradeError, GradeResult};

pub const FORM_KEYS: [&str; 2] = ["credits", "grade"];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Values for one add-subject submission, not yet range checked.
#[derive(Debug, PartialEq)]
pub struct SubjectForm {
    pub name: String,
    pub credits: u32,
    pub grade: u32,
}

/// Splits `args` into name words and `key:value` fields. Only keys that
/// expand to one of `candidates` count as fields; anything else (e.g.
/// `Chem:Lab`) stays part of the name. A field given twice is an error.
pub fn parse_args(args: &[String], candidates: &[&str]) -> Result<ParsedInput> {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() && !value.is_empty() {
                if let Ok(full_key) = expand_key(&key.to_lowercase(), candidates) {
                    if metadata.insert(full_key.clone(), value.to_string()).is_some() {
                        return Err(anyhow!("Field '{}' given more than once", full_key));
                    }
                    continue;
                }
            }
        }
        name_parts.push(arg.as_str());
    }

    Ok(ParsedInput {
        name: name_parts.join(" "),
        metadata,
    })
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown field: '{}'", key)),
        _ => Err(anyhow!("Ambiguous field: '{}' matches {:?}", key, matches)),
    }
}

/// Parses `Data Structures credits:4 grade:9` (keys may be shortened, e.g.
/// `c:4 g:9`) or the positional `Data Structures 4 9`.
pub fn parse_subject_args(args: &[String]) -> GradeResult<SubjectForm> {
    let parsed = parse_args(args, &FORM_KEYS).map_err(|e| GradeError::Validation(e.to_string()))?;
    let mut name = parsed.name;

    let mut credits = None;
    let mut grade = None;
    for (key, value) in &parsed.metadata {
        match key.as_str() {
            "credits" => credits = Some(parse_number("credits", value)?),
            "grade" => grade = Some(parse_number("grade", value)?),
            _ => {}
        }
    }

    if parsed.metadata.is_empty() {
        let words: Vec<&str> = name.split_whitespace().collect();
        if let [head @ .., c, g] = words.as_slice() {
            if !head.is_empty() && c.parse::<i64>().is_ok() && g.parse::<i64>().is_ok() {
                credits = Some(parse_number("credits", c)?);
                grade = Some(parse_number("grade", g)?);
                name = head.join(" ");
            }
        }
    }

    if name.trim().is_empty() {
        return Err(GradeError::Validation("subject name is required".to_string()));
    }
    let credits = credits.ok_or_else(|| GradeError::Validation("credits are required (credits:N)".to_string()))?;
    let grade = grade.ok_or_else(|| GradeError::Validation("grade is required (grade:N)".to_string()))?;

    Ok(SubjectForm {
        name,
        credits,
        grade,
    })
}

pub fn parse_subject_form(input: &str) -> GradeResult<SubjectForm> {
    let args: Vec<String> = input.split_whitespace().map(|s| s.to_string()).collect();
    parse_subject_args(&args)
}

fn parse_number(field: &str, value: &str) -> GradeResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| GradeError::Validation(format!("{} must be a whole number (got '{}')", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let args = vec![
            "Data".to_string(),
            "Structures".to_string(),
            "credits:4".to_string(),
            "grade:9".to_string(),
        ];
        let parsed = parse_args(&args, &FORM_KEYS).unwrap();
        assert_eq!(parsed.name, "Data Structures");
        assert_eq!(parsed.metadata.get("credits"), Some(&"4".to_string()));
        assert_eq!(parsed.metadata.get("grade"), Some(&"9".to_string()));
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("c", &FORM_KEYS).unwrap(), "credits");
        assert_eq!(expand_key("cred", &FORM_KEYS).unwrap(), "credits");
        assert_eq!(expand_key("g", &FORM_KEYS).unwrap(), "grade");
        assert_eq!(expand_key("grade", &FORM_KEYS).unwrap(), "grade");

        // Unknown
        assert!(expand_key("x", &FORM_KEYS).is_err());
    }

    #[test]
    fn test_parse_subject_form() {
        let form = parse_subject_form("Linear Algebra C:3 g:10").unwrap();
        assert_eq!(
            form,
            SubjectForm {
                name: "Linear Algebra".to_string(),
                credits: 3,
                grade: 10,
            }
        );
    }

    #[test]
    fn test_parse_subject_form_errors() {
        assert!(matches!(parse_subject_form("credits:3 grade:9"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("Math grade:9"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("Math credits:3"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("Math credits:-3 grade:9"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("Math credits:x grade:9"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("Math 4"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("4 8"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("Math -4 8"), Err(GradeError::Validation(_))));
    }

    #[test]
    fn test_positional_credits_and_grade() {
        let args: Vec<String> = ["Math", "4", "8"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            parse_subject_args(&args).unwrap(),
            SubjectForm {
                name: "Math".to_string(),
                credits: 4,
                grade: 8,
            }
        );

        let form = parse_subject_form("Data Structures 2 4 9").unwrap();
        assert_eq!(form.name, "Data Structures 2");
        assert_eq!(form.credits, 4);
        assert_eq!(form.grade, 9);
    }

    #[test]
    fn test_non_field_keys_stay_in_name() {
        let form = parse_subject_form("Chem:Lab credits:2 grade:8").unwrap();
        assert_eq!(form.name, "Chem:Lab");

        let form = parse_subject_form("Math room:4 credits:3 grade:9").unwrap();
        assert_eq!(form.name, "Math room:4");
    }

    #[test]
    fn test_repeated_field_is_rejected() {
        assert!(matches!(parse_subject_form("Math c:3 credits:4 grade:9"), Err(GradeError::Validation(_))));
        assert!(matches!(parse_subject_form("Math c:3 g:4 G:9"), Err(GradeError::Validation(_))));
    }

    #[test]
    fn test_trailing_colon_stays_in_name() {
        let form = parse_subject_form("Intro: Rust credits:2 grade:8").unwrap();
        assert_eq!(form.name, "Intro: Rust");
    }
}
