// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # QTO-Lite Engine
//!
//! Mapping-driven quantity takeoff and property-set synchronization.
//!
//! The engine reads elements from a [`qto_lite_model::ModelStore`], resolves
//! which classification codes of a user-supplied mapping table apply to each
//! element, derives scalar quantities from the element's triangulated mesh,
//! and idempotently upserts the results into named property and quantity
//! sets. A separate sync engine reconciles a user-edited row table back into
//! the same property containers.
//!
//! Entry points:
//! - [`takeoff::run_mapped_takeoff`] — the mapped takeoff orchestrator
//! - [`sync::build_rc2_table`] / [`sync::sync_rc2`] — tabular round-trip
//! - [`autofill::autofill_base_quantities`] — fill missing base quantities
//! - [`extract::extract_elements`] — flat element table for export

pub mod autofill;
pub mod classify;
pub mod error;
pub mod evaluator;
pub mod extract;
pub mod mapping;
pub mod report;
pub mod rules;
pub mod session;
pub mod sync;
pub mod takeoff;
pub mod upsert;

pub use error::{Error, Result};
pub use evaluator::{GeometryEvaluator, ShapeError, ShapeSettings};
pub use mapping::{MappingRow, MappingTable};
pub use report::{DetailRow, SummaryRow, TakeoffReport};
pub use session::Session;
pub use sync::{Rc2Row, Rc2Slot, Rc2Table};
pub use takeoff::run_mapped_takeoff;
