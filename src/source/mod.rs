use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::app::Result;

/// Where the raw article document comes from.
pub trait ArticleSource {
    /// The raw `{"articles": [...]}` document, or `None` when the source has
    /// nothing to offer (e.g. the file is absent).
    fn read(&self) -> Result<Option<Vec<u8>>>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Static JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArticleSource for FileSource {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(body) => Ok(Some(body)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    body: Option<Vec<u8>>,
}

impl MemorySource {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ArticleSource for MemorySource {
    fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.body.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
