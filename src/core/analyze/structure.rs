//! Structural page snapshot types
//!
//! A [`PageStructure`] is a purely descriptive snapshot of a loaded page:
//! forms, fields, buttons, links, menu items, tables, and label/value
//! pairs. It encodes no business meaning, which is what lets the same
//! snapshot feed live extraction, navigation planning, and the `inspect`
//! command's structural documentation.
//!
//! Every collection defaults to empty on deserialization so a partial or
//! malformed collector payload still yields a usable (if sparse) snapshot.

use serde::{Deserialize, Serialize};

/// Structural snapshot of one loaded page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageStructure {
    /// Page URL at capture time
    #[serde(default)]
    pub url: String,

    /// Document title
    #[serde(default)]
    pub title: String,

    /// Every form with its fields
    #[serde(default)]
    pub forms: Vec<FormStructure>,

    /// Every visible button
    #[serde(default)]
    pub buttons: Vec<ButtonStructure>,

    /// Every link: text + destination
    #[serde(default)]
    pub links: Vec<LinkStructure>,

    /// Menu/list navigation items
    #[serde(default)]
    pub menu_items: Vec<MenuItemStructure>,

    /// Every table: header row, rows, row count
    #[serde(default)]
    pub tables: Vec<TableStructure>,

    /// Label/value pairs harvested from th/td, dt/dd, and label+sibling
    #[serde(default)]
    pub labeled_values: Vec<LabeledValue>,
}

impl PageStructure {
    /// Snapshot with nothing in it, used when collection itself failed.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Visible link texts, for navigation diagnostics.
    pub fn link_texts(&self) -> Vec<String> {
        self.links.iter().map(|l| l.text.clone()).collect()
    }

    /// All fields across all forms.
    pub fn all_fields(&self) -> impl Iterator<Item = &FieldStructure> {
        self.forms.iter().flat_map(|f| f.fields.iter())
    }

    /// First labeled value whose label contains any of the given terms
    /// (case-insensitive).
    pub fn labeled_value(&self, terms: &[&str]) -> Option<&LabeledValue> {
        self.labeled_values.iter().find(|lv| {
            let label = lv.label.to_lowercase();
            terms.iter().any(|t| label.contains(&t.to_lowercase()))
        })
    }

    /// True when the collector found nothing at all.
    pub fn is_blank(&self) -> bool {
        self.forms.is_empty()
            && self.buttons.is_empty()
            && self.links.is_empty()
            && self.tables.is_empty()
            && self.labeled_values.is_empty()
    }
}

/// One form and its fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormStructure {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldStructure>,
}

/// One input/select/textarea within a form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldStructure {
    /// `name` attribute, when present
    #[serde(default)]
    pub name: Option<String>,

    /// `id` attribute, when present
    #[serde(default)]
    pub id: Option<String>,

    /// CSS selector the collector derived for this field
    #[serde(default)]
    pub selector: String,

    /// Inferred input type (text, date, select, password, ...)
    #[serde(default)]
    pub field_type: String,

    /// Associated label text, when one could be resolved
    #[serde(default)]
    pub label: Option<String>,

    /// Whether the field is marked required
    #[serde(default)]
    pub required: bool,

    /// Options for choice fields
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldStructure {
    /// Every textual hook a matcher can bind to: name, id, label.
    pub fn match_texts(&self) -> Vec<&str> {
        let mut texts = Vec::new();
        if let Some(name) = &self.name {
            texts.push(name.as_str());
        }
        if let Some(id) = &self.id {
            texts.push(id.as_str());
        }
        if let Some(label) = &self.label {
            texts.push(label.as_str());
        }
        texts
    }
}

/// One visible button
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ButtonStructure {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub selector: String,

    /// `type` attribute (submit, button, ...)
    #[serde(default)]
    pub button_type: Option<String>,
}

/// One link: text + destination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkStructure {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub href: Option<String>,
}

/// One navigation menu/list item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemStructure {
    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub href: Option<String>,
}

/// One table's header row and rows
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableStructure {
    #[serde(default)]
    pub headers: Vec<String>,

    /// Cell text per row, in document order
    #[serde(default)]
    pub rows: Vec<Vec<String>>,

    /// Row count as seen in the DOM (may exceed `rows.len()` when capped)
    #[serde(default)]
    pub row_count: usize,
}

impl TableStructure {
    /// True when any header contains any of the given terms
    /// (case-insensitive).
    pub fn has_header(&self, terms: &[&str]) -> bool {
        self.headers.iter().any(|h| {
            let header = h.to_lowercase();
            terms.iter().any(|t| header.contains(&t.to_lowercase()))
        })
    }

    /// Index of the first header containing any of the given terms.
    pub fn header_index(&self, terms: &[&str]) -> Option<usize> {
        self.headers.iter().position(|h| {
            let header = h.to_lowercase();
            terms.iter().any(|t| header.contains(&t.to_lowercase()))
        })
    }
}

/// A label/value pair read off the page
///
/// The value is the text of the element following the matched label
/// element, which is how detail pages lay out rejection code, reason,
/// and dates when no stable identifiers exist.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabeledValue {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_payload() {
        // A collector payload missing whole sections still parses
        let json = r#"{"url": "https://portal/claims", "tables": [{"headers": ["Claim"]}]}"#;
        let structure: PageStructure = serde_json::from_str(json).unwrap();

        assert_eq!(structure.url, "https://portal/claims");
        assert_eq!(structure.tables.len(), 1);
        assert!(structure.forms.is_empty());
        assert!(structure.links.is_empty());
    }

    #[test]
    fn test_blank_detection() {
        let structure = PageStructure::empty("about:blank");
        assert!(structure.is_blank());
    }

    #[test]
    fn test_labeled_value_lookup_case_insensitive() {
        let structure = PageStructure {
            labeled_values: vec![
                LabeledValue {
                    label: "Rejection Code".to_string(),
                    value: "MED-001".to_string(),
                },
                LabeledValue {
                    label: "سبب الرفض".to_string(),
                    value: "غير مغطى".to_string(),
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            structure.labeled_value(&["rejection code"]).unwrap().value,
            "MED-001"
        );
        assert_eq!(
            structure.labeled_value(&["سبب"]).unwrap().value,
            "غير مغطى"
        );
        assert!(structure.labeled_value(&["approval"]).is_none());
    }

    #[test]
    fn test_table_header_matching() {
        let table = TableStructure {
            headers: vec![
                "Claim Number".to_string(),
                "Member".to_string(),
                "Status".to_string(),
            ],
            rows: vec![],
            row_count: 0,
        };

        assert!(table.has_header(&["claim"]));
        assert_eq!(table.header_index(&["status"]), Some(2));
        assert_eq!(table.header_index(&["amount"]), None);
    }

    #[test]
    fn test_field_match_texts() {
        let field = FieldStructure {
            name: Some("fromDate".to_string()),
            id: Some("search-from".to_string()),
            label: Some("From Date".to_string()),
            ..Default::default()
        };
        assert_eq!(field.match_texts().len(), 3);
    }
}
