use std::path::{Path, PathBuf};

use crate::{model::ModelManager, utils::uploads::resolve_uploads_dir};

#[derive(Debug, Clone)]
pub struct AppState {
    mm: ModelManager,
    uploads_dir: PathBuf,
}

impl AppState {
    pub fn new(mm: ModelManager, uploads_dir: &str) -> std::io::Result<Self> {
        Ok(Self {
            mm,
            uploads_dir: resolve_uploads_dir(uploads_dir)?,
        })
    }

    pub fn pool(&self) -> &ModelManager {
        &self.mm
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }
}
