pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use traits::{Storage, RESULTS_KEY, SUBJECTS_KEY};
