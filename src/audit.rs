use std::io::Write;
use std::path::{Path, PathBuf};

use crate::foundation::error::PageResult;

/// Append-only record of every prompt submitted during a run.
///
/// Each entry opens, appends and closes the file, so entries written before
/// a crash or interrupt stay on disk.
#[derive(Clone, Debug, Default)]
pub struct PromptLog {
    path: Option<PathBuf>,
}

impl PromptLog {
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `<dir>/prompts_<YYYYmmdd_HHMMSS>.txt`, creating `dir` if needed.
    pub fn timestamped_in(dir: &Path) -> PageResult<Self> {
        std::fs::create_dir_all(dir)?;
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        Ok(Self::at(dir.join(format!("prompts_{stamp}.txt"))))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn record(&self, tag: &str, text: &str) -> PageResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        write!(file, "--- {tag} ---\n{text}\n\n")?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/audit.rs"]
mod tests;
