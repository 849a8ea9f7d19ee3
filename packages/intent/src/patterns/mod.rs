mod add_node;
mod fallback;
mod move_node;
mod remove_node;
mod set_copy;
mod set_prop;
mod toggle_variant;
mod wrap_with;

pub use add_node::AddNodePattern;
pub use fallback::FallbackPattern;
pub use move_node::MoveNodePattern;
pub use remove_node::RemoveNodePattern;
pub use set_copy::SetCopyPattern;
pub use set_prop::SetPropPattern;
pub use toggle_variant::ToggleVariantPattern;
pub use wrap_with::WrapWithPattern;

use canopy_document::UiPage;
use canopy_editor::Patch;

/// Confidence of an explicit phrasing match
pub const EXPLICIT_CONFIDENCE: f64 = 0.8;

/// Confidence of the `<prop> is <value>` fallback
pub const FALLBACK_CONFIDENCE: f64 = 0.6;

/// One message being parsed
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    /// Message as typed. Captures come from here so case is preserved.
    pub original: &'a str,
    /// Lower-cased copy for keyword checks
    pub lower: &'a str,
    pub page: &'a UiPage,
    /// Real id of the resolved target, if any
    pub target: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternMatch {
    pub patches: Vec<Patch>,
    pub confidence: f64,
}

impl PatternMatch {
    pub fn single(patch: Patch, confidence: f64) -> Self {
        Self {
            patches: vec![patch],
            confidence,
        }
    }
}

/// Trait for implementing message patterns
pub trait PatchPattern {
    /// Unique identifier for this pattern
    fn name(&self) -> &'static str;

    /// Patches for this message, or `None` when the phrasing does not match
    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch>;
}

/// Ordered pattern table. The first pattern that matches wins.
pub struct PatternRegistry {
    patterns: Vec<Box<dyn PatchPattern + Send + Sync>>,
}

impl PatternRegistry {
    /// Built-in patterns in priority order. Text changes come before
    /// generic prop changes since both match "change X to Y".
    pub fn new() -> Self {
        Self {
            patterns: vec![
                Box::new(SetCopyPattern),
                Box::new(SetPropPattern),
                Box::new(RemoveNodePattern),
                Box::new(AddNodePattern),
                Box::new(ToggleVariantPattern),
                Box::new(MoveNodePattern),
                Box::new(WrapWithPattern),
            ],
        }
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn patterns(&self) -> &[Box<dyn PatchPattern + Send + Sync>] {
        &self.patterns
    }

    /// Append a pattern with the lowest priority
    pub fn add_pattern(&mut self, pattern: Box<dyn PatchPattern + Send + Sync>) {
        self.patterns.push(pattern);
    }

    /// First match, with the name of the pattern that produced it
    pub fn first_match(&self, message: &MessageContext<'_>) -> Option<(&'static str, PatternMatch)> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.extract(message).map(|m| (pattern.name(), m)))
    }
}

impl Default for PatternRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternRegistry")
            .field("patterns", &format!("{} patterns", self.patterns.len()))
            .finish()
    }
}
