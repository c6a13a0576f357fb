// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property container upsert engine.
//!
//! Find-or-create for named containers, overwrite-or-append for members.
//! Properties are keyed by name, quantities by (name, kind). Nothing is
//! ever deleted here; stale members from prior runs persist unless
//! overwritten, and re-running with unchanged input leaves the containers
//! bit-for-bit identical.

use qto_lite_model::{
    DefId, ElementId, ModelStore, Property, PropertyValue, Quantity, QuantityKind, Result, UnitId,
};

/// Find the element's property set with the given name, creating and
/// attaching an empty one when absent. Safe to call repeatedly; the second
/// call returns the same definition.
pub fn upsert_property_set(store: &mut ModelStore, element: ElementId, name: &str) -> DefId {
    match store.find_property_set(element, name) {
        Some(id) => id,
        None => store.create_property_set(element, name),
    }
}

/// Find-or-create for a named quantity set
pub fn upsert_element_quantity(store: &mut ModelStore, element: ElementId, name: &str) -> DefId {
    match store.find_element_quantity(element, name) {
        Some(id) => id,
        None => store.create_element_quantity(element, name),
    }
}

/// Overwrite the named property's value and unit in place, or append a new
/// property. `value = None` clears the value while keeping the property
/// (placeholder columns).
pub fn upsert_single_value(
    store: &mut ModelStore,
    pset: DefId,
    name: &str,
    value: Option<PropertyValue>,
    unit: Option<UnitId>,
) {
    let set = store
        .property_set_mut(pset)
        .expect("definition is a property set");
    if let Some(existing) = set.property_mut(name) {
        existing.value = value;
        existing.unit = unit;
        return;
    }
    set.push(Property {
        name: name.to_string(),
        value,
        unit,
    });
}

/// Overwrite the quantity keyed by (name, kind) in place, or append a newly
/// constructed one. Non-finite values are rejected by the model store and
/// surface as a construction error.
pub fn upsert_quantity(
    store: &mut ModelStore,
    qset: DefId,
    kind: QuantityKind,
    name: &str,
    unit: Option<UnitId>,
    value: f64,
) -> Result<()> {
    let quantity = Quantity::new(kind, name, value, unit)?;
    let set = store
        .element_quantity_mut(qset)
        .expect("definition is a quantity set");
    if let Some(existing) = set.quantity_mut(name, kind) {
        *existing = quantity;
    } else {
        set.push(quantity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qto_lite_model::{Guid, UnitCategory};

    fn store_with_wall() -> (ModelStore, ElementId) {
        let mut store = ModelStore::new();
        let id = store.add_element(Guid::from("G1"), "Wall", Some("W-01".into()));
        (store, id)
    }

    #[test]
    fn test_upsert_property_set_is_stable() {
        let (mut store, wall) = store_with_wall();
        let first = upsert_property_set(&mut store, wall, "OEBBset_RC2_KE");
        let second = upsert_property_set(&mut store, wall, "OEBBset_RC2_KE");
        assert_eq!(first, second);
        assert_eq!(store.element(wall).definitions.len(), 1);
    }

    #[test]
    fn test_overwrite_vs_append() {
        let (mut store, wall) = store_with_wall();
        let pset = upsert_property_set(&mut store, wall, "P");

        upsert_single_value(&mut store, pset, "a", Some(PropertyValue::Real(1.0)), None);
        upsert_single_value(&mut store, pset, "a", Some(PropertyValue::Real(2.0)), None);
        upsert_single_value(&mut store, pset, "b", Some(PropertyValue::Real(3.0)), None);

        let set = store.property_set(pset).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.property("a").unwrap().value,
            Some(PropertyValue::Real(2.0))
        );
        assert_eq!(
            set.property("b").unwrap().value,
            Some(PropertyValue::Real(3.0))
        );
    }

    #[test]
    fn test_none_clears_value_but_keeps_property() {
        let (mut store, wall) = store_with_wall();
        let pset = upsert_property_set(&mut store, wall, "P");

        upsert_single_value(
            &mut store,
            pset,
            "25_Dichte",
            Some(PropertyValue::Text("ND".into())),
            None,
        );
        upsert_single_value(&mut store, pset, "25_Dichte", None, None);

        let set = store.property_set(pset).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.property("25_Dichte").unwrap().value.is_none());
    }

    #[test]
    fn test_quantity_keyed_by_name_and_kind() {
        let (mut store, wall) = store_with_wall();
        let qset = upsert_element_quantity(&mut store, wall, "WallBaseQuantities");
        let unit = store.project_unit(UnitCategory::Volume);

        upsert_quantity(&mut store, qset, QuantityKind::Volume, "VOLUME_GROSS", unit, 1.5)
            .unwrap();
        upsert_quantity(&mut store, qset, QuantityKind::Volume, "VOLUME_GROSS", unit, 2.5)
            .unwrap();
        upsert_quantity(&mut store, qset, QuantityKind::Area, "AREA_BOTTOM", None, 4.0).unwrap();

        let set = store.element_quantity(qset).unwrap();
        assert_eq!(set.quantities.len(), 2);
        assert_eq!(
            set.quantity("VOLUME_GROSS", QuantityKind::Volume).unwrap().value,
            2.5
        );
    }

    #[test]
    fn test_non_finite_quantity_is_rejected() {
        let (mut store, wall) = store_with_wall();
        let qset = upsert_element_quantity(&mut store, wall, "WallBaseQuantities");
        let result = upsert_quantity(
            &mut store,
            qset,
            QuantityKind::Volume,
            "VOLUME_GROSS",
            None,
            f64::NAN,
        );
        assert!(result.is_err());
        // the rejected quantity was never appended
        assert!(store.element_quantity(qset).unwrap().quantities.is_empty());
    }
}
