use tracing::{info, warn};

use crate::error::{GradeError, GradeResult};
use crate::model::record::{decode_snapshot, encode_snapshot};
use crate::model::results::ResultSnapshot;
use crate::repository::{Storage, RESULTS_KEY};
use crate::service::subject_store::SubjectStore;

/// Owns the `results` key: the snapshot the results view reads.
pub struct ResultsService<S: Storage> {
    storage: S,
}

impl<S: Storage> ResultsService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Captures the current subjects and their results, replacing any
    /// previous snapshot.
    pub fn calculate<T: Storage>(&self, store: &SubjectStore<T>) -> GradeResult<ResultSnapshot> {
        if store.is_empty() {
            return Err(GradeError::NoData);
        }

        let snapshot = ResultSnapshot::capture(store.subjects());
        let raw = encode_snapshot(&snapshot)?;
        self.storage.set(RESULTS_KEY, &raw)?;

        info!(
            subjects = snapshot.subjects.len(),
            sgpa = snapshot.sgpa,
            percentage = snapshot.percentage,
            "results calculated"
        );
        Ok(snapshot)
    }

    /// The last stored snapshot, if there is one with at least one subject.
    pub fn latest(&self) -> Option<ResultSnapshot> {
        let raw = match self.storage.get(RESULTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "could not read stored results");
                return None;
            }
        };

        match decode_snapshot(&raw) {
            Ok(snapshot) if snapshot.subjects.is_empty() => None,
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "stored results are unreadable; ignoring them");
                None
            }
        }
    }

    pub fn require_latest(&self) -> GradeResult<ResultSnapshot> {
        self.latest().ok_or(GradeError::NoResults)
    }

    /// Drops every subject and the stored snapshot.
    pub fn clear_all<T: Storage>(&self, store: &mut SubjectStore<T>) -> GradeResult<()> {
        store.clear()?;
        self.storage.remove(RESULTS_KEY)?;
        info!("results cleared");
        Ok(())
    }
}
