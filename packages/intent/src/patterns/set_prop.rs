use crate::coerce::Literal;
use crate::patterns::{MessageContext, PatchPattern, PatternMatch};
use canopy_editor::Patch;
use once_cell::sync::Lazy;
use regex::Regex;

/// "change variant to outline", "set the size to lg", "defina o tamanho para 3"
static PROP_CHANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:change|set|update|make|switch|mude|muda|mudar|altere|altera|troque|troca|defina|atualize)\s+(?:the\s+|its\s+|o\s+|a\s+)?([a-z][\w-]*)\s+(?:prop(?:erty)?\s+|propriedade\s+)?(?:(?:of|on|for|do|da|de|no|na)\s+(?:the\s+|o\s+|a\s+)?[\w#-]+\s+)?(?:to|=|as|para|como)\s+(.+)$",
    )
    .unwrap()
});

/// Words the capture can land on that are not prop names
const NOT_PROPS: [&str; 6] = ["it", "this", "that", "isso", "ele", "ela"];

/// Pattern for setting a prop from explicit phrasing
pub struct SetPropPattern;

impl PatchPattern for SetPropPattern {
    fn name(&self) -> &'static str {
        "setProp"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let target = message.target?;
        let caps = PROP_CHANGE.captures(message.original)?;
        let prop = caps[1].to_lowercase();
        if NOT_PROPS.contains(&prop.as_str()) {
            return None;
        }
        let literal = Literal::parse(&caps[2])?;

        Some(PatternMatch::single(
            Patch::set_prop(target, &prop, literal.into_value()),
            0.85,
        ))
    }
}
