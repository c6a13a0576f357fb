// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mapped quantity-takeoff orchestrator.
//!
//! Three phases per run: a sequential scan resolving applicable
//! classification codes, a parallel mesh/metric phase with no store access,
//! and a serial write-back phase performing all upserts. Given the same
//! model, mapping table, and element order, re-runs produce identical
//! property keys and values.
//!
//! Numbering scheme: the i-th applicable classification code (1-indexed)
//! owns the property keys `base+1 ..= base+5` with `base = 20 + 10*(i-1)`.
//! Blocks follow resolved order; changing that order reassigns blocks.

use crate::classify::resolve_codes;
use crate::error::Result;
use crate::evaluator::{GeometryEvaluator, ShapeSettings};
use crate::mapping::MappingTable;
use crate::report::{DetailRow, TakeoffReport};
use crate::rules::{compute_quantity, qto_set_name, quantity_kind_for, unit_category_for, COUNT_STK};
use crate::upsert::{
    upsert_element_quantity, upsert_property_set, upsert_quantity, upsert_single_value,
};
use qto_lite_model::{
    ElementId, ModelStore, PropertyValue, QuantityKind, UnitCategory,
};
use rayon::prelude::*;

/// Property set every processed element receives
pub const TAKEOFF_PSET: &str = "OEBBset_RC2_KE";

/// Constant placeholder for comment and density fields
const PLACEHOLDER: &str = "ND";

/// One resolved classification slot with its computed quantity
struct Slot {
    code: String,
    title: String,
    quantity_type: String,
    kind: QuantityKind,
    unit_category: UnitCategory,
    unit_label: String,
    value: f64,
}

/// Per-element result of the parallel phase
struct Computation {
    element: ElementId,
    guid: String,
    name: String,
    class: String,
    slots: Vec<Slot>,
}

/// Run the mapped takeoff over every element in the model.
///
/// Elements without an identifier, without a mapping-table match, or
/// without usable geometry are skipped and the run continues. A store
/// rejection during write-back abandons that element's remaining writes
/// only; mutations already applied stand (no rollback).
pub fn run_mapped_takeoff(
    store: &mut ModelStore,
    mapping: &MappingTable,
    evaluator: &dyn GeometryEvaluator,
) -> Result<TakeoffReport> {
    let settings = ShapeSettings::default();

    // Phase 1: sequential scan, immutable reads only
    let jobs: Vec<(ElementId, Vec<String>)> = store
        .elements()
        .filter_map(|(id, element)| {
            if element.guid.is_empty() {
                tracing::debug!(class = %element.class, "skipping element without identifier");
                return None;
            }
            let codes = resolve_codes(element, mapping);
            if codes.is_empty() {
                return None;
            }
            Some((id, codes))
        })
        .collect();

    tracing::info!(
        elements = store.element_count(),
        in_scope = jobs.len(),
        mapping_rows = mapping.len(),
        "Starting mapped takeoff"
    );

    // Phase 2: parallel geometry evaluation and metric computation.
    // No store writes happen here; order is preserved by collect.
    let computations: Vec<Computation> = jobs
        .into_par_iter()
        .filter_map(|(id, codes)| {
            let element = store.element(id);
            let guid = element.guid.as_str().to_string();

            let mesh = match evaluator.create_shape(&settings, store, element) {
                Ok(mesh) => mesh,
                Err(err) => {
                    tracing::debug!(guid = %guid, error = %err, "geometry evaluation failed, skipping");
                    return None;
                }
            };
            if mesh.is_empty() {
                tracing::debug!(guid = %guid, "empty mesh, skipping");
                return None;
            }

            let slots = codes
                .into_iter()
                .filter_map(|code| {
                    // resolved codes always key into the table
                    let row = mapping.get(&code)?;
                    let tag = row.quantity_type.as_str();

                    let value = if tag == COUNT_STK {
                        1.0
                    } else {
                        match compute_quantity(tag, &mesh) {
                            Some(v) => v,
                            None => {
                                tracing::debug!(
                                    guid = %guid,
                                    quantity_type = tag,
                                    "unmapped quantity type, skipping slot"
                                );
                                return None;
                            }
                        }
                    };

                    let unit_category = unit_category_for(tag);
                    let unit_label = if row.unit_hint.is_empty() {
                        unit_category.default_label().to_string()
                    } else {
                        row.unit_hint.clone()
                    };

                    Some(Slot {
                        code,
                        title: row.title.clone(),
                        quantity_type: row.quantity_type.clone(),
                        kind: quantity_kind_for(tag),
                        unit_category,
                        unit_label,
                        value,
                    })
                })
                .collect();

            Some(Computation {
                element: id,
                guid,
                name: element.display_name().to_string(),
                class: element.class.clone(),
                slots,
            })
        })
        .collect();

    // Phase 3: serial write-back
    let mut detail = Vec::new();
    for computation in &computations {
        if let Err(err) = write_element(store, computation, &mut detail) {
            tracing::warn!(
                guid = %computation.guid,
                error = %err,
                "store rejected element update, abandoning element"
            );
        }
    }

    if detail.is_empty() {
        tracing::info!("No matching elements or mapping rows found");
    } else {
        tracing::info!(rows = detail.len(), "Mapped takeoff complete");
    }

    Ok(TakeoffReport::from_detail(detail))
}

/// Upsert one element's property set, quantity set, and numbered blocks.
/// A construction rejection abandons the remaining writes for this element.
fn write_element(
    store: &mut ModelStore,
    computation: &Computation,
    detail: &mut Vec<DetailRow>,
) -> Result<()> {
    let pset = upsert_property_set(store, computation.element, TAKEOFF_PSET);

    // once-per-element fields, independent of the classification fan-out
    upsert_single_value(
        store,
        pset,
        "10_Vorhabenteil",
        Some(PropertyValue::Label(computation.name.clone())),
        None,
    );
    upsert_single_value(
        store,
        pset,
        "11_Kommentar",
        Some(PropertyValue::Text(PLACEHOLDER.into())),
        None,
    );

    for (i, slot) in computation.slots.iter().enumerate() {
        let unit = store.project_unit(slot.unit_category);

        let qset = upsert_element_quantity(store, computation.element, qto_set_name(&computation.class));
        upsert_quantity(store, qset, slot.kind, &slot.quantity_type, unit, slot.value)?;

        let base = 20 + 10 * i;
        upsert_single_value(
            store,
            pset,
            &format!("{}_Elementbezeichnung", base + 1),
            Some(PropertyValue::Text(slot.title.clone())),
            None,
        );
        upsert_single_value(
            store,
            pset,
            &format!("{}_Menge", base + 2),
            Some(PropertyValue::real(slot.value)?),
            unit,
        );
        upsert_single_value(
            store,
            pset,
            &format!("{}_Einheit", base + 3),
            Some(PropertyValue::Label(slot.unit_label.clone())),
            None,
        );
        upsert_single_value(
            store,
            pset,
            &format!("{}_Element-Kennnummer", base + 4),
            Some(PropertyValue::Label(slot.code.clone())),
            None,
        );
        upsert_single_value(
            store,
            pset,
            &format!("{}_Dichte", base + 5),
            Some(PropertyValue::Text(PLACEHOLDER.into())),
            None,
        );

        detail.push(DetailRow {
            guid: computation.guid.clone(),
            name: computation.name.clone(),
            classification: slot.code.clone(),
            title: slot.title.clone(),
            quantity_type: slot.quantity_type.clone(),
            unit: slot.unit_label.clone(),
            value: slot.value,
        });
    }

    Ok(())
}
