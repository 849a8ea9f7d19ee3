use crate::patterns::{MessageContext, PatchPattern, PatternMatch};
use canopy_editor::Patch;
use once_cell::sync::Lazy;
use regex::Regex;

static REMOVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:remove|delete|drop|erase|get rid of|hide|remover|remova|apagar|apague|excluir|exclua|tirar|tire|esconder|esconda)\b",
    )
    .unwrap()
});

/// Pattern for deleting the target
pub struct RemoveNodePattern;

impl PatchPattern for RemoveNodePattern {
    fn name(&self) -> &'static str {
        "removeNode"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let target = message.target?;
        if !REMOVE.is_match(message.lower) {
            return None;
        }
        Some(PatternMatch::single(Patch::remove_node(target), 0.9))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_document::UiPage;
    use canopy_editor::PatchOp;

    fn extract(lower: &str) -> Option<PatternMatch> {
        let page = UiPage::new("p", "");
        RemoveNodePattern.extract(&MessageContext {
            original: lower,
            lower,
            page: &page,
            target: Some("card-1"),
        })
    }

    #[test]
    fn test_remove_phrasings() {
        for message in ["remove the card", "delete it", "get rid of this", "apague o cartão"] {
            let m = extract(message).unwrap();
            assert_eq!(m.patches[0].op, PatchOp::RemoveNode);
            assert_eq!(m.patches[0].target_id, "card-1");
        }
    }

    #[test]
    fn test_unrelated_message() {
        assert!(extract("make the card blue").is_none());
        assert!(extract("the removal was fine").is_none());
    }
}
