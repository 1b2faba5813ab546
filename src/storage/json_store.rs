use super::dataset::{DataFiles, Dataset};
use crate::errors::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::ErrorKind;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, instrument, warn};

/// Loads and saves datasets as pretty-printed JSON files.
#[derive(Debug)]
pub struct JsonStore {
    files: DataFiles,
    write_locks: [Mutex<()>; Dataset::ALL.len()],
}

impl JsonStore {
    /// Creates a store writing below `files`' root directory
    #[must_use]
    pub fn new(files: DataFiles) -> Self {
        Self {
            files,
            write_locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    /// Loads a dataset, falling back to its default shape.
    ///
    /// A missing file, an unreadable file or malformed JSON is logged and
    /// yields `T::default()`; this never fails.
    #[instrument(skip(self))]
    pub async fn load<T>(&self, dataset: Dataset) -> T
    where
        T: DeserializeOwned + Default,
    {
        let path = self.files.path(dataset);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No {} data at {:?}; starting empty", dataset, path);
                return T::default();
            }
            Err(e) => {
                error!("Failed to read {} data from {:?}: {}", dataset, path, e);
                return T::default();
            }
        };

        if contents.trim().is_empty() {
            warn!("{} data at {:?} is empty; starting empty", dataset, path);
            return T::default();
        }

        match serde_json::from_str(&contents) {
            Ok(value) => {
                debug!("Loaded {} data from {:?}", dataset, path);
                value
            }
            Err(e) => {
                error!(
                    "Malformed {} data in {:?}: {}; using defaults",
                    dataset, path, e
                );
                T::default()
            }
        }
    }

    /// Serializes `value` and replaces the dataset file.
    ///
    /// The JSON is written to a sibling `.tmp` file which is then renamed over
    /// the target, so readers never observe a half-written dataset.
    ///
    /// # Errors
    /// Returns an error if serialization, the write or the rename fails. The
    /// previous file is left untouched in that case.
    #[instrument(skip(self, value))]
    pub async fn save<T>(&self, dataset: Dataset, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let path = self.files.path(dataset);
        let json = serde_json::to_string_pretty(value)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = std::path::PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!("Saved {} data to {:?}", dataset, path);
        Ok(())
    }

    /// Serializes writers of one dataset.
    ///
    /// Hold the guard across "snapshot in-memory state, then save" so an
    /// older snapshot can never overwrite a newer one.
    pub async fn lock(&self, dataset: Dataset) -> MutexGuard<'_, ()> {
        self.write_locks[dataset.index()].lock().await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::CurrencyAccounts;
    use std::collections::BTreeMap;

    fn store_in(dir: &tempfile::TempDir) -> JsonStore {
        JsonStore::new(DataFiles::new(dir.path()))
    }

    #[tokio::test]
    async fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let loaded: BTreeMap<u64, Vec<u64>> = store.load(Dataset::Summons).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_default() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);
        tokio::fs::write(DataFiles::new(dir.path()).path(Dataset::Currency), "{ not json").await?;

        let loaded: CurrencyAccounts = store.load(Dataset::Currency).await;
        assert!(loaded.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_pretty_json() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = JsonStore::new(DataFiles::new(dir.path().join("nested")));
        let mut summons = BTreeMap::new();
        summons.insert(1_u64, vec![2_u64, 3]);

        store.save(Dataset::Summons, &summons).await?;

        let path = DataFiles::new(dir.path().join("nested")).path(Dataset::Summons);
        let text = tokio::fs::read_to_string(&path).await?;
        assert!(text.contains('\n'), "expected indented JSON");
        assert!(!path.with_extension("json.tmp").exists());

        let loaded: BTreeMap<u64, Vec<u64>> = store.load(Dataset::Summons).await;
        assert_eq!(loaded, summons);
        Ok(())
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_contents() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let store = store_in(&dir);

        let mut birthdays = BTreeMap::new();
        birthdays.insert(1_u64, "01-01".to_string());
        store.save(Dataset::Birthdays, &birthdays).await?;
        birthdays.clear();
        birthdays.insert(2_u64, "25-12".to_string());
        store.save(Dataset::Birthdays, &birthdays).await?;

        let loaded: BTreeMap<u64, String> = store.load(Dataset::Birthdays).await;
        assert_eq!(loaded, birthdays);
        Ok(())
    }
}
