// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed element data: property sets, quantity sets, classifications.
//!
//! Entity capabilities are a closed set of tagged variants with typed
//! accessors; there is no runtime attribute probing. Member lists are owned,
//! mutable, ordered collections that support update-in-place and append.

use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::store::DefId;
use crate::units::{UnitCategory, UnitId};
use serde::{Deserialize, Serialize};

/// A scalar property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Boolean(bool),
    /// Free text
    Text(String),
    /// Short identifier-like text
    Label(String),
    Real(f64),
    /// A physical measure; the unit lives on the owning [`Property`]
    Measure { category: UnitCategory, value: f64 },
}

impl PropertyValue {
    /// Construct a real value, rejecting non-finite input
    pub fn real(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::construction("real value", format!("{value} is not finite")));
        }
        Ok(PropertyValue::Real(value))
    }

    /// Construct a measure value, rejecting non-finite input
    pub fn measure(category: UnitCategory, value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::construction(
                "measure value",
                format!("{value} is not finite"),
            ));
        }
        Ok(PropertyValue::Measure { category, value })
    }

    /// Numeric content, if any
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Real(v) | PropertyValue::Measure { value: v, .. } => Some(*v),
            _ => None,
        }
    }

    /// Textual content, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) | PropertyValue::Label(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// A single named property inside a property set.
/// `value` may be absent for placeholder columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: Option<PropertyValue>,
    pub unit: Option<UnitId>,
}

/// Named bag of scalar properties attached to an element.
/// Property names are unique within a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    pub guid: Guid,
    pub name: String,
    pub properties: Vec<Property>,
}

impl PropertySet {
    pub fn new(name: impl Into<String>) -> Self {
        PropertySet {
            guid: Guid::new(),
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    pub fn push(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Measured quantity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Length,
    Area,
    Volume,
    Count,
    Weight,
}

impl QuantityKind {
    pub fn unit_category(self) -> UnitCategory {
        match self {
            QuantityKind::Length => UnitCategory::Length,
            QuantityKind::Area => UnitCategory::Area,
            QuantityKind::Volume => UnitCategory::Volume,
            QuantityKind::Count => UnitCategory::Count,
            QuantityKind::Weight => UnitCategory::Weight,
        }
    }
}

/// One typed quantity inside an element quantity set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub name: String,
    pub kind: QuantityKind,
    pub value: f64,
    pub unit: Option<UnitId>,
}

impl Quantity {
    /// Construct a quantity, rejecting non-finite values
    pub fn new(
        kind: QuantityKind,
        name: impl Into<String>,
        value: f64,
        unit: Option<UnitId>,
    ) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::construction(
                "quantity value",
                format!("{value} is not finite"),
            ));
        }
        Ok(Quantity {
            name: name.into(),
            kind,
            value,
            unit,
        })
    }
}

/// Named, ordered collection of typed quantities attached to an element.
/// Quantities are keyed by (name, kind); at most one per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementQuantity {
    pub guid: Guid,
    pub name: String,
    pub quantities: Vec<Quantity>,
}

impl ElementQuantity {
    pub fn new(name: impl Into<String>) -> Self {
        ElementQuantity {
            guid: Guid::new(),
            name: name.into(),
            quantities: Vec::new(),
        }
    }

    pub fn quantity(&self, name: &str, kind: QuantityKind) -> Option<&Quantity> {
        self.quantities
            .iter()
            .find(|q| q.kind == kind && q.name == name)
    }

    pub fn quantity_mut(&mut self, name: &str, kind: QuantityKind) -> Option<&mut Quantity> {
        self.quantities
            .iter_mut()
            .find(|q| q.kind == kind && q.name == name)
    }

    /// First quantity with the given name regardless of kind
    pub fn quantity_by_name(&self, name: &str) -> Option<&Quantity> {
        self.quantities.iter().find(|q| q.name == name)
    }

    pub fn push(&mut self, quantity: Quantity) {
        self.quantities.push(quantity);
    }
}

/// Element-scoped property definition: either a property set or a quantity
/// set. Discriminated explicitly; accessors return `None` for the other
/// variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Definition {
    PropertySet(PropertySet),
    ElementQuantity(ElementQuantity),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::PropertySet(p) => &p.name,
            Definition::ElementQuantity(q) => &q.name,
        }
    }

    pub fn as_property_set(&self) -> Option<&PropertySet> {
        match self {
            Definition::PropertySet(p) => Some(p),
            Definition::ElementQuantity(_) => None,
        }
    }

    pub fn as_property_set_mut(&mut self) -> Option<&mut PropertySet> {
        match self {
            Definition::PropertySet(p) => Some(p),
            Definition::ElementQuantity(_) => None,
        }
    }

    pub fn as_element_quantity(&self) -> Option<&ElementQuantity> {
        match self {
            Definition::ElementQuantity(q) => Some(q),
            Definition::PropertySet(_) => None,
        }
    }

    pub fn as_element_quantity_mut(&mut self) -> Option<&mut ElementQuantity> {
        match self {
            Definition::ElementQuantity(q) => Some(q),
            Definition::PropertySet(_) => None,
        }
    }
}

/// Association between an element and a code within a classification scheme.
/// Created by upstream authoring tools; read-only from the engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ClassificationRef {
    /// Referenced source scheme, e.g. "OEBB"
    pub source: Option<String>,
    /// Classification system name, e.g. "RC2"
    pub scheme: Option<String>,
    /// Reference name (often a human-readable title)
    pub name: Option<String>,
    /// The classification code itself
    pub identification: Option<String>,
}

impl ClassificationRef {
    /// Concatenated display form: all non-empty bits joined with `" : "`.
    /// This is the string the classification resolver splits to recover the
    /// code (the text after the final separator).
    pub fn display(&self) -> String {
        let bits: Vec<&str> = [
            self.source.as_deref(),
            self.scheme.as_deref(),
            self.name.as_deref(),
            self.identification.as_deref(),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
        bits.join(" : ")
    }
}

/// One element in the model: an identity plus attached data.
/// Elements are owned by the store; engines only read them and attach
/// property data through the store's mutation API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub guid: Guid,
    /// Type tag, e.g. "Wall", "Slab"
    pub class: String,
    pub name: Option<String>,
    pub classifications: Vec<ClassificationRef>,
    /// Attached property/quantity definitions, in attachment order
    pub definitions: Vec<DefId>,
}

impl Element {
    /// Display name, empty when unnamed
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Concatenated display strings of all classification references
    pub fn classification_strings(&self) -> Vec<String> {
        self.classifications
            .iter()
            .map(ClassificationRef::display)
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_finite_values_are_rejected() {
        assert!(PropertyValue::real(f64::NAN).is_err());
        assert!(PropertyValue::measure(UnitCategory::Volume, f64::INFINITY).is_err());
        assert!(Quantity::new(QuantityKind::Area, "GrossArea", f64::NAN, None).is_err());
        assert!(PropertyValue::real(1.5).is_ok());
    }

    #[test]
    fn test_quantity_keyed_by_name_and_kind() {
        let mut qset = ElementQuantity::new("WallBaseQuantities");
        qset.push(Quantity::new(QuantityKind::Volume, "VOLUME_GROSS", 2.0, None).unwrap());
        qset.push(Quantity::new(QuantityKind::Area, "VOLUME_GROSS", 6.0, None).unwrap());

        assert_eq!(
            qset.quantity("VOLUME_GROSS", QuantityKind::Volume).unwrap().value,
            2.0
        );
        assert_eq!(
            qset.quantity("VOLUME_GROSS", QuantityKind::Area).unwrap().value,
            6.0
        );
        assert!(qset.quantity("VOLUME_NET", QuantityKind::Volume).is_none());
    }

    #[test]
    fn test_classification_display() {
        let full = ClassificationRef {
            source: Some("OEBB".into()),
            scheme: Some("RC2".into()),
            name: Some("Wand".into()),
            identification: Some("100".into()),
        };
        assert_eq!(full.display(), "OEBB : RC2 : Wand : 100");

        let code_only = ClassificationRef {
            identification: Some("200".into()),
            ..Default::default()
        };
        assert_eq!(code_only.display(), "200");
        assert_eq!(ClassificationRef::default().display(), "");
    }
}
