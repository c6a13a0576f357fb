// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session lifecycle.
//!
//! A session owns exactly one loaded model and its temporary backing files.
//! Hosts create a session when a file is uploaded, pass it to every engine
//! operation, and drop (or `close`) it on reset or re-upload. Backing files
//! are removed on drop; there is no global "current model".

use crate::error::Result;
use qto_lite_model::ModelStore;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One single-user editing session over one in-memory model
#[derive(Debug)]
pub struct Session {
    source_name: String,
    store: ModelStore,
    /// Temp files written for this session, removed on drop
    backing: Vec<PathBuf>,
}

impl Session {
    /// Load a model snapshot from uploaded bytes. A corrupt snapshot fails
    /// here, before the session exists.
    pub fn from_bytes(source_name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let store = ModelStore::open(bytes)?;
        let source_name = source_name.into();
        tracing::info!(source = %source_name, elements = store.element_count(), "Session opened");
        Ok(Session {
            source_name,
            store,
            backing: Vec::new(),
        })
    }

    /// Wrap an already-built store (hosts that author models in memory)
    pub fn from_store(source_name: impl Into<String>, store: ModelStore) -> Self {
        Session {
            source_name: source_name.into(),
            store,
            backing: Vec::new(),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ModelStore {
        &mut self.store
    }

    /// Write the current model state to a fresh temp file and return its
    /// path (the download artifact after a run). The file lives until the
    /// session ends.
    pub fn write_modified(&mut self) -> Result<PathBuf> {
        let file_name = format!("qto-lite-{}.json", Uuid::new_v4());
        let path = std::env::temp_dir().join(file_name);
        self.store.write(&path)?;
        self.backing.push(path.clone());
        Ok(path)
    }

    /// Suggested download name derived from the uploaded file
    pub fn modified_name(&self, suffix: &str) -> String {
        let stem = Path::new(&self.source_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        format!("{stem}_{suffix}.json")
    }

    /// Explicitly end the session, removing backing files now
    pub fn close(mut self) {
        self.cleanup();
    }

    fn cleanup(&mut self) {
        for path in self.backing.drain(..) {
            if let Err(err) = std::fs::remove_file(&path) {
                tracing::debug!(path = %path.display(), error = %err, "backing file not removed");
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cleanup();
    }
}
