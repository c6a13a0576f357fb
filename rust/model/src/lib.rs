// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # QTO-Lite Model Store
//!
//! In-memory, serializable BIM model graph: elements identified by guid and
//! class, with attached property sets, element quantities, classification
//! references, and a project unit table.
//!
//! The store is the single owner of all model data. Engines read elements
//! and mutate property containers through typed accessors; they never create
//! or destroy elements. Snapshots round-trip through JSON via
//! [`ModelStore::open`] and [`ModelStore::write`].

pub mod error;
pub mod guid;
pub mod properties;
pub mod store;
pub mod units;

pub use error::{Error, Result};
pub use guid::Guid;
pub use properties::{
    ClassificationRef, Definition, Element, ElementQuantity, Property, PropertySet, PropertyValue,
    Quantity, QuantityKind,
};
pub use store::{DefId, ElementId, ModelStore};
pub use units::{Unit, UnitCategory, UnitId};
