// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the takeoff and sync engines.
///
/// Only fatal conditions become errors: unreadable inputs before any element
/// processing starts. Per-element conditions are handled inside the
/// orchestrators (skipped, optionally logged) and never abort a run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Model error: {0}")]
    Model(#[from] qto_lite_model::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Mapping table has no usable rows after the header")]
    MappingEmpty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
