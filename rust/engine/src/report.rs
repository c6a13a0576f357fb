// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Takeoff reporting: detail rows per processed classification slot and a
//! fully recomputed summary aggregation.

use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// One row per processed (element, classification) slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub guid: String,
    pub name: String,
    pub classification: String,
    pub title: String,
    pub quantity_type: String,
    pub unit: String,
    pub value: f64,
}

/// Values summed over (classification, title, quantity type, unit)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub classification: String,
    pub title: String,
    pub quantity_type: String,
    pub unit: String,
    pub value: f64,
}

/// Output of one takeoff run
#[derive(Debug, Default)]
pub struct TakeoffReport {
    pub detail: Vec<DetailRow>,
    pub summary: Vec<SummaryRow>,
}

impl TakeoffReport {
    /// Build the report from detail rows; the summary is recomputed from
    /// scratch (plain aggregation, not incremental), sorted by
    /// (classification, quantity type).
    pub fn from_detail(detail: Vec<DetailRow>) -> Self {
        let mut groups: BTreeMap<(String, String, String, String), f64> = BTreeMap::new();
        for row in &detail {
            *groups
                .entry((
                    row.classification.clone(),
                    row.quantity_type.clone(),
                    row.title.clone(),
                    row.unit.clone(),
                ))
                .or_insert(0.0) += row.value;
        }
        let summary = groups
            .into_iter()
            .map(|((classification, quantity_type, title, unit), value)| SummaryRow {
                classification,
                title,
                quantity_type,
                unit,
                value,
            })
            .collect();
        Self { detail, summary }
    }

    /// True when the run matched no elements at all. An informational
    /// outcome, not a failure.
    pub fn is_empty(&self) -> bool {
        self.detail.is_empty()
    }

    /// Write the detail table as CSV
    pub fn write_detail_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.detail {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Write the summary table as CSV
    pub fn write_summary_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.summary {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(guid: &str, code: &str, qtype: &str, value: f64) -> DetailRow {
        DetailRow {
            guid: guid.into(),
            name: String::new(),
            classification: code.into(),
            title: "T".into(),
            quantity_type: qtype.into(),
            unit: "m\u{b3}".into(),
            value,
        }
    }

    #[test]
    fn test_summary_groups_and_sums() {
        let report = TakeoffReport::from_detail(vec![
            row("G1", "100", "VOLUME_GROSS", 1.0),
            row("G2", "100", "VOLUME_GROSS", 2.5),
            row("G3", "200", "AREA_BOTTOM", 4.0),
        ]);
        assert_eq!(report.summary.len(), 2);
        assert_eq!(report.summary[0].classification, "100");
        assert_eq!(report.summary[0].value, 3.5);
        assert_eq!(report.summary[1].classification, "200");
    }

    #[test]
    fn test_summary_sorted_by_code_then_type() {
        let report = TakeoffReport::from_detail(vec![
            row("G1", "100", "VOLUME_GROSS", 1.0),
            row("G1", "100", "AREA_BOTTOM", 2.0),
        ]);
        assert_eq!(report.summary[0].quantity_type, "AREA_BOTTOM");
        assert_eq!(report.summary[1].quantity_type, "VOLUME_GROSS");
    }

    #[test]
    fn test_detail_csv_has_header_and_rows() {
        let report = TakeoffReport::from_detail(vec![row("G1", "100", "VOLUME_GROSS", 1.0)]);
        let mut out = Vec::new();
        report.write_detail_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("guid,name,classification,title,quantity_type,unit,value"));
        assert!(text.contains("G1,,100,T,VOLUME_GROSS,"));
    }

    #[test]
    fn test_empty_report() {
        let report = TakeoffReport::from_detail(Vec::new());
        assert!(report.is_empty());
        assert!(report.summary.is_empty());
    }
}
