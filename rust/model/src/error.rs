// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for model store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the model store
#[derive(Error, Debug)]
pub enum Error {
    /// The snapshot bytes could not be decoded. Fatal: nothing was loaded.
    #[error("Failed to read model snapshot: {0}")]
    Load(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A typed construction was rejected (e.g. a non-finite measure value).
    /// Callers abandon the current element's update and continue.
    #[error("Invalid {context}: {reason}")]
    Construction { context: String, reason: String },
}

impl Error {
    pub fn construction(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Construction {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
