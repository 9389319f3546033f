use anyhow::Result;

pub const SUBJECTS_KEY: &str = "subjects";
pub const RESULTS_KEY: &str = "results";

/// String blobs under named keys. Mirrors a browser's local storage.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Deletes the key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: Storage + ?Sized> Storage for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
