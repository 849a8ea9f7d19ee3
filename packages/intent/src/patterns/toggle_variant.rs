use crate::patterns::{MessageContext, PatchPattern, PatternMatch, EXPLICIT_CONFIDENCE};
use canopy_editor::Patch;
use once_cell::sync::Lazy;
use regex::Regex;

/// "the outline variant", "ghost style"
static NAMED_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([a-z][\w-]*)\s+(?:variant|style)\b").unwrap());

/// "variant outline", "variante ghost", "estilo outline"
static NAMED_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:variant|variante|estilo)\s+([a-z][\w-]*)\b").unwrap());

/// "toggle the variant", "next style", "alterne a variante"
static CYCLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:toggle|cycle|alternate|alterne|alternar)\b|\b(?:next|another|different|other|outra|próxima|proxima)\s+(?:variant|style|variante|estilo)\b|\b(?:switch|change|swap|troque|trocar|mude|mudar)\s+(?:the\s+|its\s+|a\s+|o\s+)?(?:variant|style|variante|estilo)\b",
    )
    .unwrap()
});

/// Words that precede or follow "variant" without naming one
const NOT_VARIANTS: [&str; 20] = [
    "the", "a", "an", "its", "this", "that", "next", "another", "different", "other", "to",
    "into", "for", "of", "para", "de", "da", "do", "outra", "próxima",
];

/// Pattern for switching or cycling a component's variant
pub struct ToggleVariantPattern;

impl PatchPattern for ToggleVariantPattern {
    fn name(&self) -> &'static str {
        "toggleVariant"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let target = message.target?;

        let named = [&*NAMED_BEFORE, &*NAMED_AFTER].into_iter().find_map(|re| {
            re.captures_iter(message.lower)
                .map(|caps| caps[1].to_string())
                .find(|word| !NOT_VARIANTS.contains(&word.as_str()))
        });

        let variant = match named {
            Some(variant) => Some(variant),
            None if CYCLE.is_match(message.lower) => None,
            None => return None,
        };

        Some(PatternMatch::single(
            Patch::toggle_variant(target, variant),
            EXPLICIT_CONFIDENCE,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_document::UiPage;
    use canopy_editor::PatchOp;

    fn variant_of(lower: &str) -> Option<Option<String>> {
        let page = UiPage::new("p", "");
        let m = ToggleVariantPattern.extract(&MessageContext {
            original: lower,
            lower,
            page: &page,
            target: Some("button-1"),
        })?;
        match &m.patches[0].op {
            PatchOp::ToggleVariant { variant } => Some(variant.clone().flatten()),
            other => panic!("expected toggleVariant, got {:?}", other),
        }
    }

    #[test]
    fn test_named_variant() {
        assert_eq!(variant_of("use the ghost variant"), Some(Some("ghost".to_string())));
        assert_eq!(variant_of("switch to outline style"), Some(Some("outline".to_string())));
        assert_eq!(variant_of("use a variante outline"), Some(Some("outline".to_string())));
    }

    #[test]
    fn test_cycle() {
        assert_eq!(variant_of("toggle the variant"), Some(None));
        assert_eq!(variant_of("try the next variant"), Some(None));
        assert_eq!(variant_of("alterne a variante"), Some(None));
    }

    #[test]
    fn test_no_variant_phrasing() {
        assert_eq!(variant_of("make it bigger"), None);
    }
}
