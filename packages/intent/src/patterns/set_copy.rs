use crate::coerce::Literal;
use crate::patterns::{MessageContext, PatchPattern, PatternMatch};
use canopy_editor::Patch;
use once_cell::sync::Lazy;
use regex::Regex;

/// "change the text to ...", "set label to ...", "mude o texto para ..."
static TEXT_CHANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:change|set|update|make|replace|mude|muda|mudar|altere|altera|troque|troca|defina|atualize)\s+(?:the\s+|its\s+|o\s+|a\s+)?(?:text|copy|label|caption|wording|content|texto|rótulo|rotulo|legenda|conteúdo|conteudo)\s+(?:to|as|with|into|=|para|como|por)\s+(.+)$",
    )
    .unwrap()
});

/// `say "..."`, `read "..."`, `diga "..."`
static SAYS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:say|says|read|reads|diga|dizer)\s+((?:"[^"]*"|'[^']*'|“[^”]*”).*)$"#).unwrap()
});

/// Pattern for replacing a component's text
pub struct SetCopyPattern;

impl PatchPattern for SetCopyPattern {
    fn name(&self) -> &'static str {
        "setCopy"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let target = message.target?;
        let caps = TEXT_CHANGE
            .captures(message.original)
            .or_else(|| SAYS.captures(message.original))?;
        let literal = Literal::parse(&caps[1])?;

        let confidence = match literal {
            Literal::Quoted(_) => 0.9,
            Literal::Bare(_) => 0.85,
        };
        Some(PatternMatch::single(
            Patch::set_copy(target, literal.into_string()),
            confidence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_document::UiPage;
    use canopy_editor::PatchOp;

    fn extract(original: &str) -> Option<PatternMatch> {
        let page = UiPage::new("p", "");
        let lower = original.to_lowercase();
        SetCopyPattern.extract(&MessageContext {
            original,
            lower: &lower,
            page: &page,
            target: Some("button-1"),
        })
    }

    fn copy_value(m: &PatternMatch) -> Option<&str> {
        match &m.patches[0].op {
            PatchOp::SetCopy { value } => value.as_ref().and_then(|v| v.as_deref()),
            _ => None,
        }
    }

    #[test]
    fn test_quoted_text_keeps_case() {
        let m = extract(r#"change text to "New Text""#).unwrap();
        assert_eq!(copy_value(&m), Some("New Text"));
        assert_eq!(m.confidence, 0.9);
    }

    #[test]
    fn test_bare_text_drops_trailing_punctuation() {
        let m = extract("Set the label to Buy Now!").unwrap();
        assert_eq!(copy_value(&m), Some("Buy Now"));
    }

    #[test]
    fn test_portuguese() {
        let m = extract("mude o texto para \"Comprar agora\"").unwrap();
        assert_eq!(copy_value(&m), Some("Comprar agora"));
    }

    #[test]
    fn test_says_phrasing() {
        let m = extract("make it say 'Sign up'").unwrap();
        assert_eq!(copy_value(&m), Some("Sign up"));
    }

    #[test]
    fn test_prop_change_is_not_copy() {
        assert!(extract("change variant to outline").is_none());
    }
}
