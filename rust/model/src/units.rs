// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project unit table.
//!
//! Models carry at most one unit assignment; quantities and measure
//! properties reference units by index. Missing SI units are created on
//! demand so that takeoff output always has a unit to point at.

use serde::{Deserialize, Serialize};

/// Index into the model's unit table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub(crate) u32);

/// Physical category of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Length,
    Area,
    Volume,
    Count,
    Weight,
}

impl UnitCategory {
    /// Default SI unit name for this category, if one exists.
    /// Count has no physical unit.
    pub fn si_name(self) -> Option<&'static str> {
        match self {
            UnitCategory::Length => Some("METRE"),
            UnitCategory::Area => Some("SQUARE_METRE"),
            UnitCategory::Volume => Some("CUBIC_METRE"),
            UnitCategory::Weight => Some("KILOGRAM"),
            UnitCategory::Count => None,
        }
    }

    /// Human-readable fallback label when a mapping row has no unit hint
    pub fn default_label(self) -> &'static str {
        match self {
            UnitCategory::Length => "m",
            UnitCategory::Area => "m\u{b2}",
            UnitCategory::Volume => "m\u{b3}",
            UnitCategory::Weight => "kg",
            UnitCategory::Count => "Stk",
        }
    }
}

/// One named unit in the project unit table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub category: UnitCategory,
    /// SI unit name, e.g. "METRE", "CUBIC_METRE"
    pub name: String,
}

impl Unit {
    pub fn si(category: UnitCategory) -> Option<Self> {
        category.si_name().map(|name| Unit {
            category,
            name: name.to_string(),
        })
    }

    /// Short display label for spreadsheet output
    pub fn label(&self) -> &'static str {
        match self.name.as_str() {
            "METRE" => "m",
            "SQUARE_METRE" => "m\u{b2}",
            "CUBIC_METRE" => "m\u{b3}",
            "GRAM" => "g",
            "KILOGRAM" => "kg",
            _ => "",
        }
    }
}
