use crate::patterns::{MessageContext, PatchPattern, PatternMatch, EXPLICIT_CONFIDENCE};
use canopy_document::{find_node, NodeRef};
use canopy_editor::{Direction, Patch, Position};
use once_cell::sync::Lazy;
use regex::Regex;

static MOVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:move|put|place|shift|mover|mova|coloque|colocar|posicione)\b").unwrap()
});

/// Keywords meaning towards the start of the container
static BEFORE_ISH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:up|above|before|top|start|beginning|first|left|earlier|acima|antes|cima|topo|início|inicio|começo|comeco|esquerda|primeiro)\b",
    )
    .unwrap()
});

/// "into the sidebar", "top of #footer", "para dentro de grid-1"
static DESTINATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:into|inside|to|in|under|of|para dentro de|dentro de|para|em|no|na)\s+(?:the\s+|o\s+|a\s+)?#?([\w-]+)",
    )
    .unwrap()
});

/// Direction words that can follow "to"/"in" without naming a container
const NOT_DESTINATIONS: [&str; 18] = [
    "top", "bottom", "start", "end", "beginning", "front", "back", "left", "right", "up",
    "down", "topo", "fim", "final", "início", "inicio", "cima", "baixo",
];

/// Pattern for moving the target into a container, or one step among its siblings
pub struct MoveNodePattern;

impl PatchPattern for MoveNodePattern {
    fn name(&self) -> &'static str {
        "moveNode"
    }

    fn extract(&self, message: &MessageContext<'_>) -> Option<PatternMatch> {
        let target = message.target?;
        if !MOVE.is_match(message.lower) {
            return None;
        }
        let towards_start = BEFORE_ISH.is_match(message.lower);

        let patch = match destination(message, target) {
            Some(container) => {
                let position = if towards_start {
                    Position::Start
                } else {
                    Position::End
                };
                Patch::move_node(target, container, Some(position))
            }
            None => {
                let direction = if towards_start {
                    Direction::Up
                } else {
                    Direction::Down
                };
                Patch::reorder(target, direction)
            }
        };

        Some(PatternMatch::single(patch, EXPLICIT_CONFIDENCE))
    }
}

/// Real id of a container named in the message, other than the target
fn destination(message: &MessageContext<'_>, target: &str) -> Option<String> {
    DESTINATION
        .captures_iter(message.original)
        .map(|caps| caps[1].to_string())
        .filter(|word| !NOT_DESTINATIONS.contains(&word.to_lowercase().as_str()))
        .find_map(|word| match find_node(message.page, &word)? {
            NodeRef::Root(page) => Some(page.id.clone()),
            NodeRef::Node(node) if node.is_container() && node.id() != target => {
                Some(node.id().to_string())
            }
            NodeRef::Node(_) => None,
        })
}
