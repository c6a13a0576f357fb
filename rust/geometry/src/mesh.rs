// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle mesh data structure

use nalgebra::Point3;

/// A transient triangulated surface for one element.
///
/// Produced on demand by a geometry evaluator, consumed by the metric
/// functions, never persisted. Triangle indices must be valid positions
/// into the vertex list; degenerate (zero-area) triangles are permitted.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// Vertex positions
    pub vertices: Vec<Point3<f64>>,
    /// Triangles as vertex index triples
    pub triangles: Vec<[u32; 3]>,
}

impl TriMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Build a mesh from flat evaluator output: `[x0,y0,z0, x1,y1,z1, ...]`
    /// positions and `[i0,i1,i2, i0,i1,i2, ...]` triangle indices.
    /// Trailing partial chunks are dropped.
    pub fn from_flat(positions: &[f64], indices: &[u32]) -> Self {
        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        let triangles = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self { vertices, triangles }
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        self.vertices.push(position);
        (self.vertices.len() - 1) as u32
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.triangles.push([i0, i1, i2]);
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// A mesh with no vertices or no triangles carries no geometry.
    /// Callers skip such elements instead of reporting zero quantities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.triangles.is_empty()
    }

    /// Axis-aligned bounding box, `None` for a vertexless mesh
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.vertices.first()?;
        let mut min = first;
        let mut max = first;
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }
        Some((min, max))
    }

    /// Corner positions of one triangle. Panics on an out-of-range index;
    /// that is a programmer error, not a recoverable condition.
    #[inline]
    pub fn triangle_vertices(&self, tri: [u32; 3]) -> [Point3<f64>; 3] {
        [
            self.vertices[tri[0] as usize],
            self.vertices[tri[1] as usize],
            self.vertices[tri[2] as usize],
        ]
    }
}
