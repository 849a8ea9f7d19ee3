use crate::coerce::Literal;
use crate::patterns::{MessageContext, PatchPattern, PatternMatch, FALLBACK_CONFIDENCE};
use canopy_editor::Patch;
use once_cell::sync::Lazy;
use regex::Regex;

/// "<prop> is <value>", "<prop> should be <value>", "<prop> deve ser <value>"
static PROP_IS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b([a-z][\w-]*)\s+(?:is|should\s+be|must\s+be|needs\s+to\s+be|deve\s+ser|precisa\s+ser|é)\s+(.+)$",
    )
    .unwrap()
});

const NOT_PROPS: [&str; 9] = ["it", "this", "that", "there", "what", "isso", "ele", "ela", "isto"];

/// Last-resort pattern, tried only when nothing in the registry matched
pub struct FallbackPattern;

impl PatchPattern for FallbackPattern {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let target = message.target?;
        let caps = PROP_IS.captures(message.original)?;
        let prop = caps[1].to_lowercase();
        if NOT_PROPS.contains(&prop.as_str()) {
            return None;
        }
        let literal = Literal::parse(&caps[2])?;

        Some(PatternMatch::single(
            Patch::set_prop(target, &prop, literal.into_value()),
            FALLBACK_CONFIDENCE,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_document::UiPage;
    use canopy_editor::PatchOp;
    use serde_json::Value;

    fn extract(original: &str) -> Option<PatternMatch> {
        let page = UiPage::new("p", "");
        let lower = original.to_lowercase();
        FallbackPattern.extract(&MessageContext {
            original,
            lower: &lower,
            page: &page,
            target: Some("button-1"),
        })
    }

    #[test]
    fn test_should_be_phrasing() {
        let m = extract("the size should be large").unwrap();
        assert_eq!(m.confidence, 0.6);
        assert_eq!(
            m.patches[0].op,
            PatchOp::SetProp {
                path: "props.size".to_string(),
                value: Value::from("large"),
            }
        );
    }

    #[test]
    fn test_is_phrasing_coerces() {
        let m = extract("disabled is true").unwrap();
        assert_eq!(
            m.patches[0].op,
            PatchOp::SetProp {
                path: "props.disabled".to_string(),
                value: Value::Bool(true),
            }
        );
    }

    #[test]
    fn test_pronoun_subject_is_ignored() {
        assert!(extract("it is fine").is_none());
    }
}
