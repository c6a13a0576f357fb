// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry evaluator seam.
//!
//! Mesh production lives outside this crate: hosts plug in an evaluator that
//! tessellates one element on demand. Evaluation failures and empty meshes
//! are soft skips at the orchestrator, never run-fatal.

use qto_lite_geometry::TriMesh;
use qto_lite_model::{Element, ModelStore};
use thiserror::Error;

/// Settings passed through to the evaluator
#[derive(Debug, Clone, Copy)]
pub struct ShapeSettings {
    /// Tessellate in world coordinates rather than object-local placement
    pub world_coords: bool,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self { world_coords: true }
    }
}

/// Evaluation failure for a single element
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("Element has no solid geometry")]
    NoGeometry,

    #[error("Tessellation failed: {0}")]
    Tessellation(String),
}

/// Produces a triangulated surface for one element.
///
/// Implementations must be shareable across rayon workers; the orchestrator
/// evaluates elements in parallel and serializes all store writes afterward.
pub trait GeometryEvaluator: Sync {
    fn create_shape(
        &self,
        settings: &ShapeSettings,
        store: &ModelStore,
        element: &Element,
    ) -> Result<TriMesh, ShapeError>;
}
