// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Base-quantity autofill.
//!
//! Creates a class-appropriate quantity set with GrossVolume, GrossArea and
//! (for non-degenerate extents) Length for elements that carry no quantity
//! set at all. Author-supplied quantities are never touched.

use crate::evaluator::{GeometryEvaluator, ShapeSettings};
use crate::rules::qto_set_name;
use crate::upsert::{upsert_element_quantity, upsert_quantity};
use qto_lite_geometry as geometry;
use qto_lite_model::{ElementId, ModelStore, QuantityKind, UnitCategory};

/// Fill missing base quantities across the model. Returns the number of
/// quantity sets created.
pub fn autofill_base_quantities(
    store: &mut ModelStore,
    evaluator: &dyn GeometryEvaluator,
) -> usize {
    let settings = ShapeSettings::default();

    let candidates: Vec<ElementId> = store
        .elements()
        .filter(|(id, element)| !element.guid.is_empty() && !store.has_element_quantity(*id))
        .map(|(id, _)| id)
        .collect();

    let mut created = 0;
    for id in candidates {
        let element = store.element(id);
        let guid = element.guid.as_str().to_string();

        let mesh = match evaluator.create_shape(&settings, store, element) {
            Ok(mesh) => mesh,
            Err(err) => {
                tracing::debug!(guid = %guid, error = %err, "no geometry, skipping");
                continue;
            }
        };
        if mesh.is_empty() {
            continue;
        }

        let volume = geometry::volume(&mesh);
        let area = geometry::area(&mesh);
        let length = geometry::longest_bounding_edge(&mesh);
        let class = element.class.clone();

        let unit_volume = store.project_unit(UnitCategory::Volume);
        let unit_area = store.project_unit(UnitCategory::Area);
        let unit_length = store.project_unit(UnitCategory::Length);

        let qset = upsert_element_quantity(store, id, qto_set_name(&class));
        let result = upsert_quantity(store, qset, QuantityKind::Volume, "GrossVolume", unit_volume, volume)
            .and_then(|()| {
                upsert_quantity(store, qset, QuantityKind::Area, "GrossArea", unit_area, area)
            })
            .and_then(|()| {
                if length > 0.0 {
                    upsert_quantity(store, qset, QuantityKind::Length, "Length", unit_length, length)
                } else {
                    Ok(())
                }
            });

        match result {
            Ok(()) => created += 1,
            Err(err) => {
                tracing::warn!(guid = %guid, error = %err, "store rejected quantities, abandoning element");
            }
        }
    }

    tracing::info!(created, "Autofill complete");
    created
}
