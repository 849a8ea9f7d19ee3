use crate::coerce::Literal;
use crate::patterns::{MessageContext, PatchPattern, PatternMatch, EXPLICIT_CONFIDENCE};
use crate::target::capitalize;
use canopy_document::{find_node, find_parent, new_id, NodeRef, UiNode};
use canopy_editor::{Patch, Position};
use once_cell::sync::Lazy;
use regex::Regex;

/// "add a button", "insert another Card", "adicione um botão"
static ADD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:add|insert|append|include|adicione|adicionar|insira|inserir|inclua|incluir)\s+(?:(?:a|an|another|one|new|more|um|uma|outro|outra|novo|nova|mais)\s+)*([\p{L}][\p{L}\d]*)",
    )
    .unwrap()
});

/// Quoted copy for the new node: `add a button saying "Buy"`
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"("[^"]*"|'[^']*'|“[^”]*”)"#).unwrap());

static AT_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:at the (?:top|start|beginning)|first|no (?:topo|início|inicio|começo|comeco))\b").unwrap()
});

/// Lower-case component words recognised without capitalization
const VOCABULARY: &[&str] = &[
    "button", "card", "heading", "text", "image", "link", "input", "form", "badge", "modal",
    "tabs", "avatar", "icon", "navbar", "footer", "hero", "table", "list", "section", "grid",
];

/// Never a component name, even when capitalized
const NOT_COMPONENTS: &[&str] = &[
    "it", "this", "that", "these", "those", "them", "some", "any", "few", "several", "something",
    "isso", "isto", "algum", "alguma", "alguns", "algumas",
];

/// Pattern for inserting a new component
pub struct AddNodePattern;

impl PatchPattern for AddNodePattern {
    fn name(&self) -> &'static str {
        "addNode"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let caps = ADD.captures(message.original)?;
        let component = component_type(&caps[1])?;

        let mut node = UiNode::component(new_id(), component);
        if let Some(copy) = QUOTED
            .captures(message.original)
            .and_then(|c| Literal::parse(&c[1]))
        {
            node = node.with_copy(copy.into_string());
        }

        let position = if AT_START.is_match(message.lower) {
            Position::Start
        } else {
            Position::End
        };

        let container = insertion_container(message);
        Some(PatternMatch::single(
            Patch::add_node(container, node, Some(position)),
            EXPLICIT_CONFIDENCE,
        ))
    }
}

/// The target itself when it holds children, else its parent. The page
/// root when there is no target.
fn insertion_container(message: &MessageContext<'_>) -> String {
    let page = message.page;
    let Some(target) = message.target else {
        return page.id.clone();
    };

    match find_node(page, target) {
        Some(node) if node.is_container() => node.id().to_string(),
        Some(NodeRef::Node(_)) => find_parent(page, target)
            .map(|parent| parent.parent_id)
            .unwrap_or_else(|| page.id.clone()),
        _ => page.id.clone(),
    }
}

/// Registry-style type name for a word in the message. Only known
/// component words and capitalized names qualify.
fn component_type(word: &str) -> Option<String> {
    let lower = word.to_lowercase();
    if NOT_COMPONENTS.contains(&lower.as_str()) {
        return None;
    }
    let singular = lower
        .strip_suffix('s')
        .filter(|stem| VOCABULARY.contains(stem))
        .unwrap_or(&lower);

    let canonical = match singular {
        "botão" | "botao" | "btn" => "button",
        "cartão" | "cartao" => "card",
        "título" | "titulo" | "header" => "heading",
        "imagem" | "img" => "image",
        "texto" => "text",
        "seção" | "secao" => "section",
        "lista" => "list",
        known if VOCABULARY.contains(&known) => known,
        _ if word.starts_with(char::is_uppercase) => return Some(capitalize(word)),
        _ => return None,
    };
    Some(capitalize(canonical))
}
