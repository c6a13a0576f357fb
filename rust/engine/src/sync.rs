// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tabular sync engine for the editable RC2 sheet.
//!
//! One row per element, keyed by guid, with a verification flag and
//! dynamic `Position_k` / `Menge_k` column pairs. Build fills the table
//! from the model (classification strings plus the element's GrossVolume
//! replicated into every pair); sync writes user edits back through the
//! upsert engine. Slot indices are matched by their suffix number, never by
//! column position, and rows whose guid is unknown are silently skipped.

use crate::error::Result;
use crate::upsert::{upsert_property_set, upsert_single_value};
use qto_lite_model::{
    Definition, ElementId, ModelStore, PropertyValue, QuantityKind, UnitCategory,
};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Property set the sync engine maintains
pub const SYNC_PSET: &str = "OEBBset_RC2";

/// One Position/Menge column pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rc2Slot {
    pub position: Option<String>,
    pub quantity: Option<f64>,
}

/// One table row for one element
#[derive(Debug, Clone, PartialEq)]
pub struct Rc2Row {
    pub guid: String,
    /// "Pruefung" verification flag
    pub pruefung: bool,
    /// Slot index -> pair; sparse, in index order
    pub slots: BTreeMap<u32, Rc2Slot>,
}

impl Rc2Row {
    pub fn new(guid: impl Into<String>) -> Self {
        Rc2Row {
            guid: guid.into(),
            pruefung: false,
            slots: BTreeMap::new(),
        }
    }
}

/// Row-oriented exchange table for the RC2 property set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rc2Table {
    pub rows: Vec<Rc2Row>,
}

/// The element's GrossVolume quantity, if one was computed earlier
fn gross_volume(store: &ModelStore, element: ElementId) -> Option<f64> {
    store.definitions_of(element).find_map(|(_, definition)| {
        let qset = match definition {
            Definition::ElementQuantity(q) => q,
            Definition::PropertySet(_) => return None,
        };
        qset.quantities
            .iter()
            .find(|q| q.kind == QuantityKind::Volume && q.name.eq_ignore_ascii_case("grossvolume"))
            .map(|q| q.value)
    })
}

/// Build the export-direction table: classification strings per slot, the
/// shared gross volume replicated across every pair.
pub fn build_rc2_table(store: &ModelStore) -> Rc2Table {
    let mut rows = Vec::new();
    for (id, element) in store.elements() {
        if element.guid.is_empty() {
            continue;
        }
        let volume = gross_volume(store, id);
        let mut row = Rc2Row::new(element.guid.as_str());
        for (i, display) in element.classification_strings().into_iter().enumerate() {
            row.slots.insert(
                (i + 1) as u32,
                Rc2Slot {
                    position: Some(display),
                    quantity: volume,
                },
            );
        }
        rows.push(row);
    }
    Rc2Table { rows }
}

/// Write a (possibly edited) table back into the model. Returns the number
/// of rows that reached an element; unknown and empty guids contribute
/// nothing.
pub fn sync_rc2(store: &mut ModelStore, table: &Rc2Table) -> usize {
    let mut synced = 0;
    for row in &table.rows {
        if row.guid.is_empty() {
            continue;
        }
        let Some(element) = store.by_id(&row.guid) else {
            tracing::debug!(guid = %row.guid, "guid not in model, skipping row");
            continue;
        };

        if let Err(err) = sync_row(store, element, row) {
            tracing::warn!(guid = %row.guid, error = %err, "store rejected row, abandoning");
            continue;
        }
        synced += 1;
    }
    synced
}

fn sync_row(store: &mut ModelStore, element: ElementId, row: &Rc2Row) -> Result<()> {
    let pset = upsert_property_set(store, element, SYNC_PSET);

    upsert_single_value(
        store,
        pset,
        "Pruefung",
        Some(PropertyValue::Boolean(row.pruefung)),
        None,
    );

    for (&index, slot) in &row.slots {
        if let Some(position) = slot.position.as_deref() {
            if !position.is_empty() {
                upsert_single_value(
                    store,
                    pset,
                    &format!("Position_{index}"),
                    Some(PropertyValue::Label(position.to_string())),
                    None,
                );
            }
        }
        if let Some(quantity) = slot.quantity {
            upsert_single_value(
                store,
                pset,
                &format!("Menge_{index}"),
                Some(PropertyValue::measure(UnitCategory::Volume, quantity)?),
                None,
            );
        }
    }
    Ok(())
}

impl Rc2Table {
    /// Highest slot index used by any row
    fn max_slot(&self) -> u32 {
        self.rows
            .iter()
            .filter_map(|r| r.slots.keys().next_back().copied())
            .max()
            .unwrap_or(0)
    }

    /// Write the table as CSV: `guid,Pruefung,Position_1,Menge_1,...`
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        let max_slot = self.max_slot();

        let mut header = vec!["guid".to_string(), "Pruefung".to_string()];
        for i in 1..=max_slot {
            header.push(format!("Position_{i}"));
            header.push(format!("Menge_{i}"));
        }
        csv_writer.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.guid.clone(), row.pruefung.to_string()];
            for i in 1..=max_slot {
                let slot = row.slots.get(&i);
                record.push(
                    slot.and_then(|s| s.position.clone())
                        .unwrap_or_default(),
                );
                record.push(
                    slot.and_then(|s| s.quantity)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                );
            }
            csv_writer.write_record(&record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Read a table from CSV. Columns are recognized by name and suffix
    /// number; order does not matter, unknown columns are ignored, and a
    /// missing Pruefung column defaults to true.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        enum Column {
            Guid,
            Pruefung,
            Position(u32),
            Menge(u32),
            Other,
        }

        let columns: Vec<Column> = csv_reader
            .headers()?
            .iter()
            .map(|h| {
                let h = h.trim();
                if h == "guid" {
                    Column::Guid
                } else if h == "Pruefung" {
                    Column::Pruefung
                } else if let Some(i) = h.strip_prefix("Position_").and_then(|s| s.parse().ok()) {
                    Column::Position(i)
                } else if let Some(i) = h.strip_prefix("Menge_").and_then(|s| s.parse().ok()) {
                    Column::Menge(i)
                } else {
                    Column::Other
                }
            })
            .collect();

        let has_pruefung = columns.iter().any(|c| matches!(c, Column::Pruefung));

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row = Rc2Row::new("");
            row.pruefung = !has_pruefung;
            for (column, field) in columns.iter().zip(record.iter()) {
                let field = field.trim();
                match column {
                    Column::Guid => row.guid = field.to_string(),
                    Column::Pruefung => {
                        row.pruefung = matches!(
                            field.to_ascii_lowercase().as_str(),
                            "true" | "1" | "wahr" | "ja"
                        );
                    }
                    Column::Position(i) => {
                        if !field.is_empty() {
                            row.slots.entry(*i).or_default().position = Some(field.to_string());
                        }
                    }
                    Column::Menge(i) => {
                        if let Ok(value) = field.parse::<f64>() {
                            row.slots.entry(*i).or_default().quantity = Some(value);
                        }
                    }
                    Column::Other => {}
                }
            }
            rows.push(row);
        }
        Ok(Rc2Table { rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upsert::{upsert_element_quantity, upsert_quantity};
    use qto_lite_model::{ClassificationRef, Guid};

    fn store_with_classified_wall() -> ModelStore {
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
        let qset = upsert_element_quantity(&mut store, wall, "WallBaseQuantities");
        upsert_quantity(&mut store, qset, QuantityKind::Volume, "GrossVolume", None, 2.5).unwrap();
        store
    }

    #[test]
    fn test_build_replicates_gross_volume() {
        let store = store_with_classified_wall();
        let table = build_rc2_table(&store);
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.guid, "G1");
        assert!(!row.pruefung);
        let slot = row.slots.get(&1).unwrap();
        assert_eq!(slot.position.as_deref(), Some("RC2 : 100"));
        assert_eq!(slot.quantity, Some(2.5));
    }

    #[test]
    fn test_sync_writes_flag_positions_and_quantities() {
        let mut store = store_with_classified_wall();
        let mut row = Rc2Row::new("G1");
        row.pruefung = true;
        row.slots.insert(
            2,
            Rc2Slot {
                position: Some("RC2 : 200".into()),
                quantity: Some(7.0),
            },
        );
        let synced = sync_rc2(&mut store, &Rc2Table { rows: vec![row] });
        assert_eq!(synced, 1);

        let wall = store.by_id("G1").unwrap();
        let pset = store.find_property_set(wall, SYNC_PSET).unwrap();
        let set = store.property_set(pset).unwrap();
        assert_eq!(
            set.property("Pruefung").unwrap().value,
            Some(PropertyValue::Boolean(true))
        );
        // slot index comes from the column suffix, not table position
        assert_eq!(
            set.property("Position_2").unwrap().value,
            Some(PropertyValue::Label("RC2 : 200".into()))
        );
        assert_eq!(
            set.property("Menge_2").unwrap().value,
            Some(PropertyValue::Measure {
                category: UnitCategory::Volume,
                value: 7.0
            })
        );
        assert!(set.property("Position_1").is_none());
    }

    #[test]
    fn test_unknown_guid_is_silently_skipped() {
        let mut store = store_with_classified_wall();
        let table = Rc2Table {
            rows: vec![Rc2Row::new("G999"), Rc2Row::new("")],
        };
        assert_eq!(sync_rc2(&mut store, &table), 0);
        let wall = store.by_id("G1").unwrap();
        assert!(store.find_property_set(wall, SYNC_PSET).is_none());
    }

    #[test]
    fn test_empty_position_does_not_overwrite() {
        let mut store = store_with_classified_wall();
        let mut row = Rc2Row::new("G1");
        row.slots.insert(
            1,
            Rc2Slot {
                position: Some("First".into()),
                quantity: None,
            },
        );
        sync_rc2(&mut store, &Rc2Table { rows: vec![row] });

        let mut row = Rc2Row::new("G1");
        row.slots.insert(
            1,
            Rc2Slot {
                position: Some(String::new()),
                quantity: None,
            },
        );
        sync_rc2(&mut store, &Rc2Table { rows: vec![row] });

        let wall = store.by_id("G1").unwrap();
        let pset = store.find_property_set(wall, SYNC_PSET).unwrap();
        assert_eq!(
            store
                .property_set(pset)
                .unwrap()
                .property("Position_1")
                .unwrap()
                .value,
            Some(PropertyValue::Label("First".into()))
        );
    }

    #[test]
    fn test_csv_round_trip_with_shuffled_columns() {
        let csv = "\
guid,Menge_2,Position_1,Pruefung,Position_2,Menge_1
G1,4.5,RC2 : 100,true,RC2 : 200,1.5
G2,,,false,,
";
        let table = Rc2Table::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.rows.len(), 2);
        let row = &table.rows[0];
        assert!(row.pruefung);
        assert_eq!(row.slots.get(&1).unwrap().quantity, Some(1.5));
        assert_eq!(row.slots.get(&2).unwrap().position.as_deref(), Some("RC2 : 200"));
        assert!(table.rows[1].slots.is_empty());

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let reparsed = Rc2Table::from_csv_reader(out.as_slice()).unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn test_missing_pruefung_column_defaults_true() {
        let csv = "guid,Position_1\nG1,RC2 : 100\n";
        let table = Rc2Table::from_csv_reader(csv.as_bytes()).unwrap();
        assert!(table.rows[0].pruefung);
    }
}
