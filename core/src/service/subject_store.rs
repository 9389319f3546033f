use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{GradeError, GradeResult};
use crate::model::record::{decode_subjects, encode_subjects};
use crate::model::results::Aggregate;
use crate::model::subject::{validate, Subject};
use crate::repository::{Storage, SUBJECTS_KEY};
use crate::service::aggregator::aggregate;

/// The live list of subjects, mirrored into the `subjects` storage key
/// after every change.
pub struct SubjectStore<S: Storage> {
    storage: S,
    subjects: Vec<Subject>,
}

impl<S: Storage> SubjectStore<S> {
    pub fn open(storage: S) -> Self {
        let subjects = read_subjects(&storage);
        Self { storage, subjects }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Re-reads the stored collection. Missing or unreadable data yields an
    /// empty list.
    pub fn load(&mut self) -> Vec<Subject> {
        self.subjects = read_subjects(&self.storage);
        self.subjects.clone()
    }

    pub fn add(&mut self, name: &str, credits: u32, grade: u32) -> GradeResult<Subject> {
        validate(name, credits, grade)?;

        let name = name.trim();
        if self.contains_name(name) {
            return Err(GradeError::Duplicate(name.to_string()));
        }

        let subject = Subject::new(name, credits, grade);
        self.subjects.push(subject.clone());

        if let Err(e) = self.persist() {
            self.subjects.pop();
            return Err(e);
        }

        info!(id = %subject.id, name = %subject.name, credits, grade, "subject added");
        Ok(subject)
    }

    /// Removes the subject with `id`. An unknown id is a no-op and nothing is
    /// written.
    pub fn remove(&mut self, id: &Uuid) -> GradeResult<Option<Subject>> {
        let Some(pos) = self.subjects.iter().position(|s| s.id == *id) else {
            debug!(%id, "remove: no such subject");
            return Ok(None);
        };

        let removed = self.subjects.remove(pos);
        if let Err(e) = self.persist() {
            self.subjects.insert(pos, removed);
            return Err(e);
        }

        info!(id = %removed.id, name = %removed.name, "subject removed");
        Ok(Some(removed))
    }

    /// Empties the collection and deletes the storage key itself.
    pub fn clear(&mut self) -> GradeResult<()> {
        self.storage.remove(SUBJECTS_KEY)?;
        self.subjects.clear();
        info!("all subjects cleared");
        Ok(())
    }

    /// Looks a subject up by full id or by a unique id prefix.
    pub fn find(&self, query: &str) -> GradeResult<&Subject> {
        let query = query.trim();
        if let Ok(id) = Uuid::parse_str(query) {
            return self
                .subjects
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| GradeError::NotFound(query.to_string()));
        }

        let needle = query.to_ascii_lowercase().replace('-', "");
        if needle.is_empty() {
            return Err(GradeError::NotFound(query.to_string()));
        }

        let matches: Vec<&Subject> = self
            .subjects
            .iter()
            .filter(|s| s.id.simple().to_string().starts_with(&needle))
            .collect();

        match matches.len() {
            1 => Ok(matches[0]),
            0 => Err(GradeError::NotFound(query.to_string())),
            _ => Err(GradeError::AmbiguousId(query.to_string())),
        }
    }

    pub fn summary(&self) -> Aggregate {
        aggregate(&self.subjects)
    }

    fn contains_name(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.subjects.iter().any(|s| s.name.to_lowercase() == lowered)
    }

    fn persist(&self) -> GradeResult<()> {
        let raw = encode_subjects(&self.subjects)?;
        self.storage.set(SUBJECTS_KEY, &raw)?;
        debug!(count = self.subjects.len(), "subjects persisted");
        Ok(())
    }
}

fn read_subjects<S: Storage>(storage: &S) -> Vec<Subject> {
    let raw = match storage.get(SUBJECTS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "could not read stored subjects; starting empty");
            return Vec::new();
        }
    };

    match decode_subjects(&raw) {
        Ok(subjects) => subjects,
        Err(e) => {
            warn!(error = %e, "stored subjects are unreadable; starting empty");
            Vec::new()
        }
    }
}
