use crate::patterns::{MessageContext, PatchPattern, PatternMatch, EXPLICIT_CONFIDENCE};
use canopy_document::{new_id, UiNode};
use canopy_editor::Patch;
use once_cell::sync::Lazy;
use regex::Regex;

static WRAP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:wrap|group|envolva|envolver|embrulhe|agrupe|agrupar)\b").unwrap()
});

static GRID: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:grid|grade|columns|colunas)\b").unwrap());

/// Pattern for wrapping the target in a new section or grid
pub struct WrapWithPattern;

impl PatchPattern for WrapWithPattern {
    fn name(&self) -> &'static str {
        "wrapWith"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let target = message.target?;
        if !WRAP.is_match(message.lower) {
            return None;
        }

        let wrapper = if GRID.is_match(message.lower) {
            UiNode::grid(new_id())
        } else {
            UiNode::section(new_id())
        };
        Some(PatternMatch::single(
            Patch::wrap_with(target, wrapper),
            EXPLICIT_CONFIDENCE,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_document::{NodeKind, UiPage};
    use canopy_editor::PatchOp;

    fn wrapper_kind(lower: &str) -> Option<NodeKind> {
        let page = UiPage::new("p", "");
        let m = WrapWithPattern.extract(&MessageContext {
            original: lower,
            lower,
            page: &page,
            target: Some("card-1"),
        })?;
        match &m.patches[0].op {
            PatchOp::WrapWith { wrapper } => Some(wrapper.kind()),
            other => panic!("expected wrapWith, got {:?}", other),
        }
    }

    #[test]
    fn test_wrap_in_section_by_default() {
        assert_eq!(wrapper_kind("wrap it in a container"), Some(NodeKind::Section));
    }

    #[test]
    fn test_wrap_in_grid() {
        assert_eq!(wrapper_kind("wrap the card in a grid"), Some(NodeKind::Grid));
        assert_eq!(wrapper_kind("envolva em uma grade"), Some(NodeKind::Grid));
    }

    #[test]
    fn test_no_wrap_verb() {
        assert_eq!(wrapper_kind("make it a grid"), None);
    }
}
