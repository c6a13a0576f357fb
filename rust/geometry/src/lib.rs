// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! QTO-Lite Geometry
//!
//! Triangle mesh representation and the pure metric functions used for
//! quantity takeoff: surface area, divergence-theorem volume, bounding-box
//! extents, and oriented sub-areas.

pub mod mesh;
pub mod metrics;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use mesh::TriMesh;
pub use metrics::{
    area, bottom_area, height, longest_bounding_edge, max_side_area, planar_diagonal, volume,
};
