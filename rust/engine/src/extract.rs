// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Flat element extraction for spreadsheet export.
//!
//! One row per element with guid/class/name, classification strings, every
//! quantity found on the element, and the properties of one chosen property
//! set. Quantity and property columns are the union across all elements,
//! sorted by name; sparse cells stay empty.

use crate::error::Result;
use qto_lite_model::{Definition, ModelStore, PropertyValue};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::io::Write;

/// Extraction options
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Name of the property set to harvest; empty reads none
    pub pset_name: String,
    /// One `classification_i` column per reference instead of a single
    /// joined column
    pub split_classifications: bool,
}

/// Column-ordered string table ready for CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct ElementTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ElementTable {
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

fn cell(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Boolean(b) => b.to_string(),
        PropertyValue::Text(s) | PropertyValue::Label(s) => s.clone(),
        PropertyValue::Real(v) | PropertyValue::Measure { value: v, .. } => v.to_string(),
    }
}

/// Build the element table. Elements without an identifier are skipped.
pub fn extract_elements(store: &ModelStore, options: &ExtractOptions) -> ElementTable {
    let mut records: Vec<FxHashMap<String, String>> = Vec::new();
    let mut quantity_keys: BTreeSet<String> = BTreeSet::new();
    let mut pset_keys: BTreeSet<String> = BTreeSet::new();
    let mut max_classifications = 0usize;

    for (id, element) in store.elements() {
        if element.guid.is_empty() {
            continue;
        }

        let mut record = FxHashMap::default();
        record.insert("guid".to_string(), element.guid.as_str().to_string());
        record.insert("class".to_string(), element.class.clone());
        record.insert("name".to_string(), element.display_name().to_string());

        let classifications = element.classification_strings();
        if options.split_classifications {
            max_classifications = max_classifications.max(classifications.len());
            for (i, display) in classifications.into_iter().enumerate() {
                record.insert(format!("classification_{}", i + 1), display);
            }
        } else {
            record.insert("classification".to_string(), classifications.join("; "));
        }

        for (_, definition) in store.definitions_of(id) {
            match definition {
                Definition::ElementQuantity(qset) => {
                    for quantity in &qset.quantities {
                        quantity_keys.insert(quantity.name.clone());
                        record.insert(quantity.name.clone(), quantity.value.to_string());
                    }
                }
                Definition::PropertySet(pset) if pset.name == options.pset_name => {
                    for property in &pset.properties {
                        pset_keys.insert(property.name.clone());
                        let text = property.value.as_ref().map(cell).unwrap_or_default();
                        record.insert(property.name.clone(), text);
                    }
                }
                Definition::PropertySet(_) => {}
            }
        }

        records.push(record);
    }

    let mut columns = vec!["guid".to_string(), "class".to_string(), "name".to_string()];
    if options.split_classifications {
        for i in 1..=max_classifications {
            columns.push(format!("classification_{i}"));
        }
    } else {
        columns.push("classification".to_string());
    }
    columns.extend(quantity_keys);
    columns.extend(pset_keys);

    let rows = records
        .into_iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(c).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    ElementTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upsert::{
        upsert_element_quantity, upsert_property_set, upsert_quantity, upsert_single_value,
    };
    use qto_lite_model::{ClassificationRef, Guid, QuantityKind};

    fn sample_store() -> ModelStore {
        let mut store = ModelStore::new();
        let wall = store.add_element(Guid::from("G1"), "Wall", Some("W-01".into()));
        store.add_classification(
            wall,
            ClassificationRef {
                scheme: Some("RC2".into()),
                identification: Some("100".into()),
                ..Default::default()
            },
        );
        store.add_classification(
            wall,
            ClassificationRef {
                scheme: Some("RC2".into()),
                identification: Some("200".into()),
                ..Default::default()
            },
        );
        let qset = upsert_element_quantity(&mut store, wall, "WallBaseQuantities");
        upsert_quantity(&mut store, qset, QuantityKind::Volume, "GrossVolume", None, 2.0)
            .unwrap();
        let pset = upsert_property_set(&mut store, wall, "OEBBset_RC2");
        upsert_single_value(
            &mut store,
            pset,
            "Pruefung",
            Some(PropertyValue::Boolean(true)),
            None,
        );

        store.add_element(Guid::from("G2"), "Slab", None);
        store.add_element(Guid::default(), "Proxy", None);
        store
    }

    #[test]
    fn test_joined_classifications_and_union_columns() {
        let store = sample_store();
        let options = ExtractOptions {
            pset_name: "OEBBset_RC2".into(),
            split_classifications: false,
        };
        let table = extract_elements(&store, &options);

        assert_eq!(
            table.columns,
            vec!["guid", "class", "name", "classification", "GrossVolume", "Pruefung"]
        );
        // the guid-less proxy is dropped
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][3], "RC2 : 100; RC2 : 200");
        assert_eq!(table.rows[0][4], "2");
        assert_eq!(table.rows[0][5], "true");
        // slab has neither quantities nor the pset
        assert_eq!(table.rows[1][4], "");
    }

    #[test]
    fn test_split_classifications() {
        let store = sample_store();
        let options = ExtractOptions {
            pset_name: String::new(),
            split_classifications: true,
        };
        let table = extract_elements(&store, &options);
        let c1 = table.columns.iter().position(|c| c == "classification_1").unwrap();
        let c2 = table.columns.iter().position(|c| c == "classification_2").unwrap();
        assert_eq!(table.rows[0][c1], "RC2 : 100");
        assert_eq!(table.rows[0][c2], "RC2 : 200");
        assert_eq!(table.rows[1][c1], "");
    }

    #[test]
    fn test_csv_output() {
        let store = sample_store();
        let table = extract_elements(&store, &ExtractOptions::default());
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("guid,class,name,classification"));
        assert!(text.contains("G1,Wall,W-01"));
    }
}
