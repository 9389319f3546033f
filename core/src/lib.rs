pub mod config;
pub mod error;
pub mod export;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;

pub use config::Config;
pub use error::{GradeError, GradeResult};
pub use export::{write_export, ExportFormat};
pub use input::{parse_subject_args, parse_subject_form, SubjectForm};
pub use model::grade::{grade_letter, Performance};
pub use model::results::{Aggregate, ResultSnapshot};
pub use model::subject::Subject;
pub use repository::{FileStorage, MemoryStorage, Storage};
pub use service::aggregator::aggregate;
pub use service::results_service::ResultsService;
pub use service::subject_store::SubjectStore;
