use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use lurewake_game::SaveStorage;

/// Stores each save key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create the storage, making the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl SaveStorage for FileStorage {
    type Error = io::Error;

    fn save(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, payload)?;
        fs::rename(staging, path)
    }

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "lurewake-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn save_load_delete_cycle() {
        let storage = FileStorage::new(scratch_dir("cycle")).unwrap();
        assert_eq!(storage.load("slot").unwrap(), None);
        storage.save("slot", "{\"a\":1}").unwrap();
        assert_eq!(storage.load("slot").unwrap().as_deref(), Some("{\"a\":1}"));
        storage.save("slot", "{}").unwrap();
        assert_eq!(storage.load("slot").unwrap().as_deref(), Some("{}"));
        storage.delete("slot").unwrap();
        storage.delete("slot").unwrap();
        assert_eq!(storage.load("slot").unwrap(), None);
        let _ = fs::remove_dir_all(storage.dir());
    }

    #[test]
    fn keys_are_flattened_into_file_names() {
        let storage = FileStorage::new(scratch_dir("keys")).unwrap();
        assert_eq!(
            storage.path_for("lurewake.save/v1"),
            storage.dir().join("lurewake_save_v1.json")
        );
        let _ = fs::remove_dir_all(storage.dir());
    }
}
