//! # Canopy Intent
//!
//! Natural-language front end for the patch engine.
//!
//! ```text
//! message ──► classify ──► generate | edit | patch | unknown
//!    │
//!    └──────► parse(page, target?) ──► [Patch] + diagnostics
//! ```
//!
//! Both steps are heuristic and stateless. Neither touches the page: the
//! parser only proposes patches, and applying them is up to the caller.
//! English and Portuguese phrasing are recognised.

mod classifier;
mod coerce;
mod keywords;
mod parser;
pub mod patterns;
mod target;

pub use classifier::{classify, ClassifyContext, Intent, IntentClassification, IntentMetadata};
pub use coerce::{coerce, Literal};
pub use keywords::{implied_operations, keyword_hits, KeywordHits};
pub use parser::{parse, parse_with, ParseOutcome};
pub use patterns::{MessageContext, PatchPattern, PatternMatch, PatternRegistry};
pub use target::{extract_component_name, extract_property_value, extract_target_id};
