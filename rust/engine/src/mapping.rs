// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User-supplied mapping table: classification code to quantity rule.
//!
//! Columns are taken by position, not header name: A=classification code,
//! B=title, C/D=reserved, E=quantity type tag, F=unit hint. Extra columns
//! are ignored, short rows are padded. Rows without a code or a quantity
//! type are dropped on load; an unknown quantity type is kept and simply
//! produces no output later.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use std::io::Read;

/// One usable row of the mapping table
#[derive(Debug, Clone, PartialEq)]
pub struct MappingRow {
    /// Classification code, the join key against element classifications
    pub classification: String,
    pub title: String,
    /// Quantity type tag, upper-cased on load (e.g. "VOLUME_GROSS")
    pub quantity_type: String,
    /// Free-text unit label, may be empty
    pub unit_hint: String,
}

/// Loaded mapping table with first-seen row order and code lookup
#[derive(Debug, Default)]
pub struct MappingTable {
    rows: Vec<MappingRow>,
    index: FxHashMap<String, usize>,
}

impl MappingTable {
    /// Read a mapping table from CSV. The first record is a header and is
    /// skipped. Fails with [`Error::MappingEmpty`] when no usable rows
    /// remain, which aborts a run before any element is touched.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut table = MappingTable::default();
        for record in csv_reader.records() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or("").trim().to_string();

            let classification = field(0);
            let quantity_type = field(4).to_uppercase();
            if classification.is_empty() || quantity_type.is_empty() {
                continue;
            }
            // columns beyond F are ignored; missing C/D/F read as empty
            table.insert(MappingRow {
                classification,
                title: field(1),
                quantity_type,
                unit_hint: field(5),
            });
        }

        if table.rows.is_empty() {
            return Err(Error::MappingEmpty);
        }
        Ok(table)
    }

    fn insert(&mut self, row: MappingRow) {
        // later duplicates of a code do not shadow the first occurrence
        if self.index.contains_key(&row.classification) {
            return;
        }
        self.index
            .insert(row.classification.clone(), self.rows.len());
        self.rows.push(row);
    }

    /// Look a row up by classification code (case-sensitive exact match)
    pub fn get(&self, code: &str) -> Option<&MappingRow> {
        self.index.get(code).map(|&i| &self.rows[i])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in load order
    pub fn rows(&self) -> &[MappingRow] {
        &self.rows
    }
}
