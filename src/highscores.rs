//! Persist the high score (XDG config or ~/.config/sandbridge).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "sandbridge";
const FILENAME: &str = "highscore";

#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid high score {0:?}")]
    Parse(String),
    #[error("no config directory (HOME and XDG_CONFIG_HOME unset)")]
    NoConfigDir,
}

/// Where the best score lives between sessions.
pub trait HighScoreStore {
    fn load(&self) -> Result<u64, HighScoreError>;
    fn save(&mut self, score: u64) -> Result<(), HighScoreError>;
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn load(&self) -> Result<u64, HighScoreError> {
        (**self).load()
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        (**self).save(score)
    }
}

/// Default path: `$XDG_CONFIG_HOME/sandbridge/highscore`, else `$HOME/.config/...`.
pub fn default_path() -> Result<PathBuf, HighScoreError> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(|h| PathBuf::from(h).join(".config"))
            .ok_or(HighScoreError::NoConfigDir)?,
    };
    Ok(base.join(APP_DIR).join(FILENAME))
}

/// One decimal number in a text file. A missing file reads as 0.
#[derive(Debug, Clone)]
pub struct FileHighScores {
    path: PathBuf,
}

impl FileHighScores {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn at_default_location() -> Result<Self, HighScoreError> {
        default_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScores {
    fn load(&self) -> Result<u64, HighScoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        let line = content.lines().next().unwrap_or("").trim();
        if line.is_empty() {
            return Ok(0);
        }
        line.parse()
            .map_err(|_| HighScoreError::Parse(line.to_string()))
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut f = fs::File::create(&self.path)?;
        writeln!(f, "{}", score)?;
        Ok(())
    }
}

/// Keeps the score in memory only; `saves` counts persisted updates.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScores {
    pub score: u64,
    pub saves: usize,
}

impl MemoryHighScores {
    pub fn with_score(score: u64) -> Self {
        Self { score, saves: 0 }
    }
}

impl HighScoreStore for MemoryHighScores {
    fn load(&self) -> Result<u64, HighScoreError> {
        Ok(self.score)
    }

    fn save(&mut self, score: u64) -> Result<(), HighScoreError> {
        self.score = score;
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sandbridge-test-{}-{}", std::process::id(), name))
            .join(FILENAME)
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let store = FileHighScores::new(scratch_path("missing"));
        assert_eq!(store.load().unwrap(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("roundtrip");
        let mut store = FileHighScores::new(&path);
        store.save(1234).unwrap();
        assert_eq!(FileHighScores::new(&path).load().unwrap(), 1234);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let path = scratch_path("garbage");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "lots\n").unwrap();
        let err = FileHighScores::new(&path).load().unwrap_err();
        assert!(matches!(err, HighScoreError::Parse(ref s) if s == "lots"));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut m = MemoryHighScores::with_score(5);
        assert_eq!(m.load().unwrap(), 5);
        m.save(9).unwrap();
        assert_eq!((m.score, m.saves), (9, 1));
    }
}
