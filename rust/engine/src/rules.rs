// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Quantity rule dispatch.
//!
//! Two layers: an exact-tag table selecting the metric function, and a
//! prefix policy selecting the unit category and quantity kind. The prefix
//! policy lets mapping authors add new AREA_*/VOLUME_* sub-metrics to the
//! table without touching the dispatch chain.

use qto_lite_geometry::{self as geometry, TriMesh};
use qto_lite_model::{QuantityKind, UnitCategory};

/// Tag for counted pieces: value 1.0 per element, no physical unit
pub const COUNT_STK: &str = "COUNT_STK";

/// Metric value for a quantity type tag. Unknown tags yield `None` so that
/// exploratory mapping rows stay inert instead of failing the run.
pub fn compute_quantity(tag: &str, mesh: &TriMesh) -> Option<f64> {
    let value = match tag {
        "VOLUME_NET" | "VOLUME_GROSS" => geometry::volume(mesh),
        "AREA_SURF_TOTAL" => geometry::area(mesh),
        "AREA_BOTTOM" => geometry::bottom_area(mesh),
        "AREA_SIDE_MAX" => geometry::max_side_area(mesh),
        "LENGTH_LONGEST" => geometry::longest_bounding_edge(mesh),
        "LENGTH_XY" => geometry::planar_diagonal(mesh),
        "HEIGHT_Z" => geometry::height(mesh),
        _ => return None,
    };
    Some(value)
}

/// Unit category by tag prefix. COUNT_STK is unitless, VOLUME* and AREA*
/// share their family unit, everything else falls back to length.
pub fn unit_category_for(tag: &str) -> UnitCategory {
    if tag == COUNT_STK {
        UnitCategory::Count
    } else if tag.starts_with("VOLUME") {
        UnitCategory::Volume
    } else if tag.starts_with("AREA") {
        UnitCategory::Area
    } else {
        UnitCategory::Length
    }
}

/// Quantity kind for the typed Qto upsert, same prefix policy
pub fn quantity_kind_for(tag: &str) -> QuantityKind {
    if tag == COUNT_STK {
        QuantityKind::Count
    } else if tag.starts_with("VOLUME") {
        QuantityKind::Volume
    } else if tag.starts_with("AREA") {
        QuantityKind::Area
    } else {
        QuantityKind::Length
    }
}

/// Quantity set name for an element class
pub fn qto_set_name(class: &str) -> &'static str {
    match class {
        "Wall" | "WallStandardCase" => "WallBaseQuantities",
        "Slab" => "SlabBaseQuantities",
        "Beam" => "BeamBaseQuantities",
        "Column" => "ColumnBaseQuantities",
        _ => "GenericBaseQuantities",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qto_lite_geometry::TriMesh;

    fn unit_cube() -> TriMesh {
        let positions = [
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
        ];
        let indices = [
            0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, //
            1, 2, 6, 1, 6, 5, 2, 3, 7, 2, 7, 6, 3, 0, 4, 3, 4, 7,
        ];
        TriMesh::from_flat(&positions, &indices)
    }

    #[test]
    fn test_known_tags_dispatch_to_metrics() {
        let cube = unit_cube();
        assert_relative_eq!(compute_quantity("VOLUME_GROSS", &cube).unwrap(), 1.0);
        assert_relative_eq!(compute_quantity("VOLUME_NET", &cube).unwrap(), 1.0);
        assert_relative_eq!(compute_quantity("AREA_SURF_TOTAL", &cube).unwrap(), 6.0);
        assert_relative_eq!(compute_quantity("AREA_BOTTOM", &cube).unwrap(), 1.0);
        assert_relative_eq!(compute_quantity("HEIGHT_Z", &cube).unwrap(), 1.0);
        assert_relative_eq!(
            compute_quantity("LENGTH_XY", &cube).unwrap(),
            2.0_f64.sqrt()
        );
    }

    #[test]
    fn test_unknown_tag_is_inert() {
        assert!(compute_quantity("WEIGHT_TOTAL", &unit_cube()).is_none());
        assert!(compute_quantity("", &unit_cube()).is_none());
    }

    #[test]
    fn test_prefix_policy() {
        assert_eq!(unit_category_for("VOLUME_GROSS"), UnitCategory::Volume);
        assert_eq!(unit_category_for("VOLUME_EXPLORATORY"), UnitCategory::Volume);
        assert_eq!(unit_category_for("AREA_SIDE_MAX"), UnitCategory::Area);
        assert_eq!(unit_category_for("COUNT_STK"), UnitCategory::Count);
        assert_eq!(unit_category_for("HEIGHT_Z"), UnitCategory::Length);
        assert_eq!(unit_category_for("SOMETHING_ELSE"), UnitCategory::Length);

        assert_eq!(quantity_kind_for("AREA_BOTTOM"), QuantityKind::Area);
        assert_eq!(quantity_kind_for("COUNT_STK"), QuantityKind::Count);
        assert_eq!(quantity_kind_for("LENGTH_LONGEST"), QuantityKind::Length);
    }

    #[test]
    fn test_qto_set_names() {
        assert_eq!(qto_set_name("Wall"), "WallBaseQuantities");
        assert_eq!(qto_set_name("WallStandardCase"), "WallBaseQuantities");
        assert_eq!(qto_set_name("Slab"), "SlabBaseQuantities");
        assert_eq!(qto_set_name("Railing"), "GenericBaseQuantities");
    }
}
