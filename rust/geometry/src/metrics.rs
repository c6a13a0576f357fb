// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pure mesh metric functions.
//!
//! All functions assume a valid mesh (indices in range) and return plain
//! numbers. Degenerate triangles contribute zero. Empty meshes are the
//! caller's concern: check [`TriMesh::is_empty`] first, because "no
//! geometry" and "zero-sized geometry" mean different things downstream.

use crate::mesh::TriMesh;
use nalgebra::{Point3, Vector3};

/// Cosine threshold against straight-down for bottom-facing triangles
const DOWN_COS_THRESHOLD: f64 = 0.8;
/// Cosine threshold against vertical below which a normal counts as a side
const SIDE_COS_THRESHOLD: f64 = 0.2;
/// Guard against division by zero when normalizing degenerate normals
const NORMAL_EPS: f64 = 1e-12;

#[inline]
fn triangle_area(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> f64 {
    0.5 * (v1 - v0).cross(&(v2 - v0)).norm()
}

#[inline]
fn unit_normal(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Vector3<f64> {
    let n = (v1 - v0).cross(&(v2 - v0));
    n / (n.norm() + NORMAL_EPS)
}

/// Total surface area: sum of triangle areas
pub fn area(mesh: &TriMesh) -> f64 {
    mesh.triangles
        .iter()
        .map(|&t| {
            let [v0, v1, v2] = mesh.triangle_vertices(t);
            triangle_area(v0, v1, v2)
        })
        .sum()
}

/// Enclosed volume via signed tetrahedra against the origin.
///
/// Exact for closed, consistently outward-wound meshes (divergence
/// theorem). Open or inconsistently wound meshes yield an approximate
/// result of unspecified sign; the absolute value is returned as a blunt
/// correction, which is a known limitation of this tool.
pub fn volume(mesh: &TriMesh) -> f64 {
    let signed: f64 = mesh
        .triangles
        .iter()
        .map(|&t| {
            let [v0, v1, v2] = mesh.triangle_vertices(t);
            v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0
        })
        .sum();
    signed.abs()
}

/// Largest axis-aligned bounding box extent
pub fn longest_bounding_edge(mesh: &TriMesh) -> f64 {
    match mesh.bounds() {
        Some((min, max)) => {
            let d = max - min;
            d.x.max(d.y).max(d.z)
        }
        None => 0.0,
    }
}

/// Bounding box extent along the vertical axis
pub fn height(mesh: &TriMesh) -> f64 {
    match mesh.bounds() {
        Some((min, max)) => max.z - min.z,
        None => 0.0,
    }
}

/// Bounding box diagonal projected onto the horizontal plane
pub fn planar_diagonal(mesh: &TriMesh) -> f64 {
    match mesh.bounds() {
        Some((min, max)) => {
            let dx = max.x - min.x;
            let dy = max.y - min.y;
            (dx * dx + dy * dy).sqrt()
        }
        None => 0.0,
    }
}

/// Summed area of triangles facing downward, within a cosine similarity of
/// [`DOWN_COS_THRESHOLD`] against straight-down
pub fn bottom_area(mesh: &TriMesh) -> f64 {
    let down = Vector3::new(0.0, 0.0, -1.0);
    mesh.triangles
        .iter()
        .map(|&t| {
            let [v0, v1, v2] = mesh.triangle_vertices(t);
            if unit_normal(v0, v1, v2).dot(&down) > DOWN_COS_THRESHOLD {
                triangle_area(v0, v1, v2)
            } else {
                0.0
            }
        })
        .sum()
}

/// Largest single triangle area among near-vertical faces (normal within
/// [`SIDE_COS_THRESHOLD`] of horizontal)
pub fn max_side_area(mesh: &TriMesh) -> f64 {
    let up = Vector3::new(0.0, 0.0, 1.0);
    mesh.triangles
        .iter()
        .filter_map(|&t| {
            let [v0, v1, v2] = mesh.triangle_vertices(t);
            if unit_normal(v0, v1, v2).dot(&up).abs() < SIDE_COS_THRESHOLD {
                Some(triangle_area(v0, v1, v2))
            } else {
                None
            }
        })
        .fold(0.0, f64::max)
}
