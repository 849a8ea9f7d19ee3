//! Target and metadata extraction shared by the classifier and the parser

use crate::coerce::Literal;
use once_cell::sync::Lazy;
use regex::Regex;

static DATA_UI_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)data-ui-id\s*=\s*["']([^"']+)["']"#).unwrap());

static HASH_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([A-Za-z0-9_][\w-]*)").unwrap());

/// `button-1`, `hero-section`, `card_pricing` ...
static ROLE_PREFIXED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b((?:button|btn|card|section|grid|heading|header|hero|title|text|label|image|img|link|input|form|nav|navbar|footer|list|item|badge|modal|tabs?|container|column|row|icon|menu|avatar|table)[-_][\w-]+)",
    )
    .unwrap()
});

static COMPONENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(button|card|heading|text|image|link|input|form|badge|modal|tabs|avatar|icon|navbar|footer|header|hero|table|list|botão|botao|cartão|cartao|título|titulo|imagem)s?\b",
    )
    .unwrap()
});

static PROPERTY_VALUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\b([a-z][\w-]*)\s+(?:to|=|para|como)\s+("[^"]*"|'[^']*'|“[^”]*”|[^\s,;!?]+)"#,
    )
    .unwrap()
});

/// Candidate target id mentioned in a message, most explicit form first
pub fn extract_target_id(message: &str) -> Option<String> {
    [&*DATA_UI_ID, &*HASH_ID, &*ROLE_PREFIXED_ID]
        .into_iter()
        .find_map(|re| re.captures(message))
        .map(|caps| caps[1].to_string())
}

/// Component type named in a message, as a registry-style type name
pub fn extract_component_name(message: &str) -> Option<String> {
    let caps = COMPONENT_NAME.captures(message)?;
    let word = caps[1].to_lowercase();
    let canonical = match word.as_str() {
        "botão" | "botao" => "button",
        "cartão" | "cartao" => "card",
        "título" | "titulo" => "heading",
        "imagem" => "image",
        other => other,
    };
    Some(capitalize(canonical))
}

/// `(property, value)` from phrasing like "variant to outline"
pub fn extract_property_value(message: &str) -> Option<(String, Literal)> {
    let caps = PROPERTY_VALUE.captures(message)?;
    let property = caps[1].to_lowercase();
    let value = Literal::parse(&caps[2])?;
    Some((property, value))
}

/// `button` → `Button`
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
