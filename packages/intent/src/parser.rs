//! # Patch Intent Parser
//!
//! Turns a message into concrete patches against the current page.
//!
//! ## Target resolution
//!
//! 1. The supplied target id, resolved through tree addressing
//! 2. An id mentioned in the message (`data-ui-id="..."`, `#id`, `button-1`)
//! 3. The first component in tree order (`TARGET_FALLBACK` info)
//!
//! Patches always carry the node's real id, whichever form found it.
//!
//! ## Extraction
//!
//! The [`PatternRegistry`] is tried in priority order and the first match
//! wins. When nothing matches and a target exists, the `<prop> is <value>`
//! fallback runs at lower confidence. Every produced patch is validated;
//! invalid ones are kept and flagged with a `VALIDATION_FAILED` warning.

use crate::patterns::{FallbackPattern, MessageContext, PatchPattern, PatternMatch, PatternRegistry};
use crate::target::extract_target_id;
use canopy_document::{find_node, first_component, Diagnostic, DiagnosticCode, UiPage};
use canopy_editor::Patch;
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;

static BUILTIN_PATTERNS: Lazy<PatternRegistry> = Lazy::new(PatternRegistry::new);

/// Result of parsing one message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub patches: Vec<Patch>,
    /// Coarse signal for display, 0.0 when nothing matched
    pub confidence: f64,
    pub diagnostics: Vec<Diagnostic>,
    /// Real id of the node the patches target
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// Name of the pattern that produced the patches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<&'static str>,
}

impl ParseOutcome {
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }
}

/// Parse `message` against `page` with the built-in patterns
pub fn parse(message: &str, page: &UiPage, target_id: Option<&str>) -> ParseOutcome {
    parse_with(&BUILTIN_PATTERNS, message, page, target_id)
}

/// Parse with a caller-supplied pattern table
pub fn parse_with(
    patterns: &PatternRegistry,
    message: &str,
    page: &UiPage,
    target_id: Option<&str>,
) -> ParseOutcome {
    let mut diagnostics = Vec::new();
    let target = resolve_target(page, message, target_id, &mut diagnostics);

    let original = message.trim();
    let lower = original.to_lowercase();
    let context = MessageContext {
        original,
        lower: &lower,
        page,
        target: target.as_deref(),
    };

    let matched = patterns.first_match(&context).or_else(|| {
        FallbackPattern
            .extract(&context)
            .map(|m| (FallbackPattern.name(), m))
    });

    let Some((pattern, PatternMatch { patches, confidence })) = matched else {
        debug!(target_id = ?target, "No pattern matched");
        diagnostics.push(Diagnostic::info(
            DiagnosticCode::NoPatternMatched,
            format!("No edit pattern matched: {}", original),
        ));
        return ParseOutcome {
            patches: Vec::new(),
            confidence: 0.0,
            diagnostics,
            target_id: target,
            pattern: None,
        };
    };

    for patch in &patches {
        if let Err(err) = patch.validate() {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::ValidationFailed,
                format!("{} patch for '{}' is invalid: {}", patch.op.name(), patch.target_id, err),
            ));
        }
    }

    debug!(pattern, patches = patches.len(), confidence, "Parsed message");
    ParseOutcome {
        patches,
        confidence,
        diagnostics,
        target_id: target,
        pattern: Some(pattern),
    }
}

fn resolve_target(
    page: &UiPage,
    message: &str,
    supplied: Option<&str>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<String> {
    if let Some(id) = supplied {
        match find_node(page, id) {
            Some(node) => return Some(node.id().to_string()),
            None => diagnostics.push(Diagnostic::warning(
                DiagnosticCode::TargetNotFound,
                format!("Target '{}' is not in the document", id),
            )),
        }
    }

    if let Some(node) = extract_target_id(message).and_then(|id| find_node(page, &id)) {
        return Some(node.id().to_string());
    }

    match first_component(page) {
        Some(component) => {
            diagnostics.push(Diagnostic::info(
                DiagnosticCode::TargetFallback,
                format!("No target given, using first component '{}'", component.id),
            ));
            Some(component.id.clone())
        }
        None => {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::TargetNotFound,
                "No target could be resolved",
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_document::UiNode;

    #[test]
    fn test_supplied_target_resolves_by_data_ui_id() {
        let page = UiPage::new("p", "")
            .with_child(UiNode::component("button-1", "Button").with_data_ui_id("cta"));
        let outcome = parse("delete it", &page, Some("cta"));
        assert_eq!(outcome.target_id.as_deref(), Some("button-1"));
        assert_eq!(outcome.patches, vec![Patch::remove_node("button-1")]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_empty_page_has_no_target() {
        let page = UiPage::new("p", "");
        let outcome = parse("change variant to outline", &page, None);
        assert!(outcome.is_empty());
        let codes: Vec<_> = outcome.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::TargetNotFound, DiagnosticCode::NoPatternMatched]
        );
    }
}
