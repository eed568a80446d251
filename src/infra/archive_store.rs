use anyhow::{ensure, Context, Result};
use std::{fs, path::{Path, PathBuf}};

/// Directory that downloaded archives are written into.
pub struct ArchiveStore {
    dir: PathBuf,
}

impl ArchiveStore {
    /// Creates the directory if it does not exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output dir '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Whether `file_name` names a plain file directly inside the store.
    /// Names come from URLs, so separators and dot entries are refused.
    pub fn accepts(file_name: &str) -> bool {
        !file_name.is_empty()
            && !file_name.contains(['/', '\\'])
            && file_name != "."
            && file_name != ".."
    }

    /// Write `bytes` to `<dir>/<file_name>`, replacing any existing file.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        ensure!(
            Self::accepts(file_name),
            "refusing to write archive with unsafe name '{file_name}'"
        );

        let path = self.dir.join(file_name);
        fs::write(&path, bytes)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_writes_bytes() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path().join("boat-racer_lzh")).unwrap();

        let path = store.save("k2401.lzh", b"LZH!").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"LZH!");
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ArchiveStore::new(dir.path()).unwrap();
        assert!(store.save("../escape.lzh", b"x").is_err());
        assert!(store.save("..", b"x").is_err());
        assert!(store.save("", b"x").is_err());
        assert!(store.save("dl\\k2401.lzh", b"x").is_err());
    }

    #[test]
    fn test_accepts_plain_names_only() {
        assert!(ArchiveStore::accepts("k2401.lzh"));
        assert!(ArchiveStore::accepts("..k2401.lzh"));
        assert!(!ArchiveStore::accepts("a\\b.lzh"));
        assert!(!ArchiveStore::accepts("."));
    }
}
