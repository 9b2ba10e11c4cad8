//! Marker configuration for review card extraction
//!
//! Centralized lookup table from logical field to the tag + class pair that
//! locates it in the saved markup.

use crate::domain::ReviewField;
use crate::infrastructure::config::review_markup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag name plus exact `class` attribute string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementMarker {
    pub tag: String,
    /// Compared verbatim against the raw attribute, not as a class set
    pub class: String,
}

impl ElementMarker {
    pub fn new(tag: &str, class: &str) -> Self {
        Self {
            tag: tag.to_string(),
            class: class.to_string(),
        }
    }
}

/// Where a field's value lives on the matched element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueSource {
    /// Concatenated descendant text, trimmed
    Text,
    /// A named attribute, trimmed
    Attribute { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMarker {
    #[serde(flatten)]
    pub element: ElementMarker,
    pub source: ValueSource,
}

impl FieldMarker {
    pub fn text(tag: &str, class: &str) -> Self {
        Self {
            element: ElementMarker::new(tag, class),
            source: ValueSource::Text,
        }
    }

    pub fn attribute(tag: &str, class: &str, name: &str) -> Self {
        Self {
            element: ElementMarker::new(tag, class),
            source: ValueSource::Attribute {
                name: name.to_string(),
            },
        }
    }
}

/// All markers needed to pull reviews out of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerTable {
    pub card: ElementMarker,
    pub fields: BTreeMap<ReviewField, FieldMarker>,
}

impl MarkerTable {
    pub fn field(&self, field: ReviewField) -> Option<&FieldMarker> {
        self.fields.get(&field)
    }
}

impl Default for MarkerTable {
    fn default() -> Self {
        use review_markup::{ATTR_RATING, CARD, FIELDS};

        let fields = FIELDS
            .iter()
            .map(|&(field, tag, class)| {
                let marker = if field == ReviewField::Rating {
                    FieldMarker::attribute(tag, class, ATTR_RATING)
                } else {
                    FieldMarker::text(tag, class)
                };
                (field, marker)
            })
            .collect();

        Self {
            card: ElementMarker::new(CARD.0, CARD.1),
            fields,
        }
    }
}
