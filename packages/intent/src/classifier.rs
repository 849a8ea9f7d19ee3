//! # Intent Classifier
//!
//! Labels a free-text message as `generate`, `edit`, `patch` or `unknown`.
//!
//! ## Precedence
//!
//! | keywords found        | document? | intent     | confidence |
//! |-----------------------|-----------|------------|------------|
//! | patch                 | any       | `patch`    | 0.9        |
//! | edit                  | yes       | `edit`     | 0.85       |
//! | edit                  | no        | `generate` | 0.6        |
//! | generate              | any       | `generate` | 0.8        |
//! | none                  | yes       | `edit`     | 0.6        |
//! | none                  | no        | `unknown`  | 0.5        |
//!
//! Target id, implied operations and metadata are extracted regardless of
//! the intent. Confidence is advisory only.

use crate::keywords::{implied_operations, keyword_hits};
use crate::target::{extract_component_name, extract_property_value, extract_target_id};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Generate,
    Edit,
    Patch,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Generate => "generate",
            Intent::Edit => "edit",
            Intent::Patch => "patch",
            Intent::Unknown => "unknown",
        }
    }

    /// Intents that operate on an existing document
    pub fn targets_document(&self) -> bool {
        matches!(self, Intent::Edit | Intent::Patch)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the caller knows about the conversation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyContext {
    #[serde(default, rename = "hasExistingDSL")]
    pub has_existing_dsl: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_asset_id: Option<String>,
}

impl ClassifyContext {
    pub fn with_document() -> Self {
        Self {
            has_existing_dsl: true,
            current_asset_id: None,
        }
    }

    pub fn has_document(&self) -> bool {
        self.has_existing_dsl || self.current_asset_id.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl IntentMetadata {
    pub fn is_empty(&self) -> bool {
        self.component_name.is_none() && self.property.is_none() && self.value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentClassification {
    pub intent: Intent,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patch_operations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<IntentMetadata>,
}

/// Classify a message. Pure and stateless.
pub fn classify(message: &str, context: &ClassifyContext) -> IntentClassification {
    let lower = message.to_lowercase();
    let hits = keyword_hits(&lower);
    let has_document = context.has_document();

    let (intent, confidence) = if hits.patch {
        (Intent::Patch, 0.9)
    } else if hits.edit && has_document {
        (Intent::Edit, 0.85)
    } else if hits.edit {
        // "change" with nothing to change is a creation request
        (Intent::Generate, 0.6)
    } else if hits.generate {
        (Intent::Generate, 0.8)
    } else if has_document {
        (Intent::Edit, 0.6)
    } else {
        (Intent::Unknown, 0.5)
    };

    let mut metadata = IntentMetadata {
        component_name: extract_component_name(message),
        ..IntentMetadata::default()
    };
    if let Some((property, value)) = extract_property_value(message) {
        metadata.property = Some(property);
        metadata.value = Some(value.into_value());
    }

    let classification = IntentClassification {
        intent,
        confidence,
        target_id: extract_target_id(message),
        patch_operations: implied_operations(&lower),
        metadata: Some(metadata).filter(|m| !m.is_empty()),
    };

    debug!(
        intent = %classification.intent,
        confidence = classification.confidence,
        target_id = ?classification.target_id,
        "Classified message"
    );

    classification
}
