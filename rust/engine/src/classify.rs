// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Classification resolver.
//!
//! Element classifications travel as concatenated display strings
//! ("scheme : code"); the code is the text after the final separator,
//! trimmed. The resolver keeps codes that key into the mapping table,
//! first-seen order, de-duplicated, case-sensitive. An empty result means
//! the element is out of scope for mapped takeoff — callers skip it.

use crate::mapping::MappingTable;
use qto_lite_model::Element;

/// Extract the classification code from a concatenated display string
pub fn extract_code(display: &str) -> &str {
    match display.rfind(':') {
        Some(i) => display[i + 1..].trim(),
        None => display.trim(),
    }
}

/// Ordered, de-duplicated classification codes of an element that appear in
/// the mapping table
pub fn resolve_codes(element: &Element, mapping: &MappingTable) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for display in element.classification_strings() {
        let code = extract_code(&display);
        if code.is_empty() || !mapping.contains(code) {
            continue;
        }
        if codes.iter().any(|c| c == code) {
            continue;
        }
        codes.push(code.to_string());
    }
    codes
}
