// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The model store: ordered element arena, definition arena, unit table.
//!
//! Element iteration order is the authoring order and is stable across
//! snapshot round-trips, which makes downstream takeoff runs deterministic.

use crate::error::Result;
use crate::guid::Guid;
use crate::properties::{
    ClassificationRef, Definition, Element, ElementQuantity, PropertySet,
};
use crate::units::{Unit, UnitCategory, UnitId};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Handle to an element in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(u32);

/// Handle to a property/quantity definition in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefId(u32);

/// In-memory model graph
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelStore {
    elements: Vec<Element>,
    definitions: Vec<Definition>,
    units: Vec<Unit>,
    /// guid -> element position, rebuilt after deserialization
    #[serde(skip)]
    guid_index: FxHashMap<String, ElementId>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON snapshot. Corrupt input fails here, before any
    /// element processing can begin.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        let mut store: ModelStore = serde_json::from_slice(bytes)?;
        store.rebuild_index();
        Ok(store)
    }

    /// Serialize the current graph to snapshot bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Write a snapshot to disk
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn rebuild_index(&mut self) {
        self.guid_index.clear();
        for (i, element) in self.elements.iter().enumerate() {
            if !element.guid.is_empty() {
                self.guid_index
                    .entry(element.guid.as_str().to_string())
                    .or_insert(ElementId(i as u32));
            }
        }
    }

    // ---- elements -------------------------------------------------------

    /// Add an element to the model. Authoring API for hosts and tests;
    /// engines never create elements.
    pub fn add_element(
        &mut self,
        guid: Guid,
        class: impl Into<String>,
        name: Option<String>,
    ) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        if !guid.is_empty() {
            self.guid_index
                .entry(guid.as_str().to_string())
                .or_insert(id);
        }
        self.elements.push(Element {
            guid,
            class: class.into(),
            name,
            classifications: Vec::new(),
            definitions: Vec::new(),
        });
        id
    }

    /// Attach a classification reference to an element (authoring API)
    pub fn add_classification(&mut self, id: ElementId, reference: ClassificationRef) {
        self.elements[id.0 as usize].classifications.push(reference);
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0 as usize]
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// All elements in stable authoring order
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    /// Elements of one class, in stable order
    pub fn by_type<'a>(&'a self, class: &'a str) -> impl Iterator<Item = ElementId> + 'a {
        self.elements
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.class == class)
            .map(|(i, _)| ElementId(i as u32))
    }

    /// Look an element up by guid
    pub fn by_id(&self, guid: &str) -> Option<ElementId> {
        self.guid_index.get(guid).copied()
    }

    // ---- definitions ----------------------------------------------------

    pub fn definition(&self, id: DefId) -> &Definition {
        &self.definitions[id.0 as usize]
    }

    pub fn definition_mut(&mut self, id: DefId) -> &mut Definition {
        &mut self.definitions[id.0 as usize]
    }

    /// Definitions attached to an element, in attachment order
    pub fn definitions_of<'a>(
        &'a self,
        element: ElementId,
    ) -> impl Iterator<Item = (DefId, &'a Definition)> {
        self.elements[element.0 as usize]
            .definitions
            .iter()
            .map(|&d| (d, &self.definitions[d.0 as usize]))
    }

    /// Find an attached property set by name
    pub fn find_property_set(&self, element: ElementId, name: &str) -> Option<DefId> {
        self.definitions_of(element)
            .find(|(_, d)| matches!(d, Definition::PropertySet(p) if p.name == name))
            .map(|(id, _)| id)
    }

    /// Find an attached quantity set by name
    pub fn find_element_quantity(&self, element: ElementId, name: &str) -> Option<DefId> {
        self.definitions_of(element)
            .find(|(_, d)| matches!(d, Definition::ElementQuantity(q) if q.name == name))
            .map(|(id, _)| id)
    }

    /// True when the element carries any quantity set at all
    pub fn has_element_quantity(&self, element: ElementId) -> bool {
        self.definitions_of(element)
            .any(|(_, d)| matches!(d, Definition::ElementQuantity(_)))
    }

    /// Create an empty property set and attach it to the element
    pub fn create_property_set(&mut self, element: ElementId, name: impl Into<String>) -> DefId {
        self.attach(element, Definition::PropertySet(PropertySet::new(name)))
    }

    /// Create an empty quantity set and attach it to the element
    pub fn create_element_quantity(
        &mut self,
        element: ElementId,
        name: impl Into<String>,
    ) -> DefId {
        self.attach(
            element,
            Definition::ElementQuantity(ElementQuantity::new(name)),
        )
    }

    fn attach(&mut self, element: ElementId, definition: Definition) -> DefId {
        let id = DefId(self.definitions.len() as u32);
        self.definitions.push(definition);
        self.elements[element.0 as usize].definitions.push(id);
        id
    }

    /// Typed accessor: property set behind a definition id
    pub fn property_set(&self, id: DefId) -> Option<&PropertySet> {
        self.definition(id).as_property_set()
    }

    pub fn property_set_mut(&mut self, id: DefId) -> Option<&mut PropertySet> {
        self.definition_mut(id).as_property_set_mut()
    }

    /// Typed accessor: quantity set behind a definition id
    pub fn element_quantity(&self, id: DefId) -> Option<&ElementQuantity> {
        self.definition(id).as_element_quantity()
    }

    pub fn element_quantity_mut(&mut self, id: DefId) -> Option<&mut ElementQuantity> {
        self.definition_mut(id).as_element_quantity_mut()
    }

    // ---- units ----------------------------------------------------------

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.0 as usize]
    }

    /// First unit of the given category; creates the SI default when the
    /// model has none. Count is unitless and always returns `None`.
    pub fn project_unit(&mut self, category: UnitCategory) -> Option<UnitId> {
        if let Some(i) = self.units.iter().position(|u| u.category == category) {
            return Some(UnitId(i as u32));
        }
        let unit = Unit::si(category)?;
        let id = UnitId(self.units.len() as u32);
        self.units.push(unit);
        Some(id)
    }
}
