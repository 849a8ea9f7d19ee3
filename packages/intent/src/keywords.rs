//! Bilingual (English/Portuguese) keyword tables.
//!
//! Every table is a single word-boundary regex matched against the
//! lower-cased message.

use once_cell::sync::Lazy;
use regex::Regex;

pub static GENERATE_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(create|generate|build|design|scaffold|new|criar|crie|cria|gerar|gere|gera|construir|construa|projete|novo|nova)\b",
    )
    .unwrap()
});

pub static EDIT_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(change|modify|update|edit|adjust|tweak|alter|replace|improve|set|make|mudar|mude|muda|alterar|altere|altera|modificar|modifique|editar|edite|ajustar|ajuste|trocar|troque|troca|atualizar|atualize|definir|defina|deixe)\b",
    )
    .unwrap()
});

pub static PATCH_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(remove|delete|drop|hide|add|insert|append|move|wrap|rename|toggle|reorder|swap|remover|remova|apagar|apague|excluir|exclua|esconder|esconda|adicionar|adicione|inserir|insira|mover|mova|envolver|envolva|renomear|renomeie|alternar|alterne|reordenar|reordene)\b",
    )
    .unwrap()
});

/// Verb groups hinting at each patch operation, in wire order
static OPERATION_HINTS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("setProp", r"\b(set|change|update|color|colour|size|prop|property|defina|mude|altere|cor|tamanho)\b"),
        ("setCopy", r"\b(text|copy|label|wording|caption|texto|rótulo|rotulo|legenda)\b"),
        ("toggleVariant", r"\b(variant|toggle|variante|alterne|alternar)\b"),
        ("addNode", r"\b(add|insert|append|adicionar|adicione|inserir|insira)\b"),
        ("removeNode", r"\b(remove|delete|drop|hide|remover|remova|apagar|apague|excluir|exclua|esconda)\b"),
        ("moveNode", r"\b(move|put|place|mover|mova|coloque)\b"),
        ("wrapWith", r"\b(wrap|group|envolver|envolva|agrupe)\b"),
        ("reorder", r"\b(reorder|swap|up|down|reordenar|reordene)\b"),
        ("rename", r"\b(rename|renomear|renomeie)\b"),
        ("setToken", r"\b(spacing|padding|margin|gap|token|espaçamento|espacamento|margem)\b"),
    ]
    .into_iter()
    .map(|(op, pattern)| (op, Regex::new(pattern).unwrap()))
    .collect()
});

/// Keyword hits for one message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    pub generate: bool,
    pub edit: bool,
    pub patch: bool,
}

pub fn keyword_hits(lower: &str) -> KeywordHits {
    KeywordHits {
        generate: GENERATE_KEYWORDS.is_match(lower),
        edit: EDIT_KEYWORDS.is_match(lower),
        patch: PATCH_KEYWORDS.is_match(lower),
    }
}

/// Patch operations implied by the verbs present in a lower-cased message
pub fn implied_operations(lower: &str) -> Vec<String> {
    OPERATION_HINTS
        .iter()
        .filter(|(_, re)| re.is_match(lower))
        .map(|(op, _)| op.to_string())
        .collect()
}
