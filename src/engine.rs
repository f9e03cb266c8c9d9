//! Instruction → edit pipeline and the assistant's reply text.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::diagram::Diagram;
use crate::intent::{self, Intent};
use crate::markup_parser::decode_entities;
use crate::mutator::{self, ReplaceScope};

pub const MAX_LISTED_COMPONENTS: usize = 10;
pub const NO_COMPONENTS_PLACEHOLDER: &str = "no components detected yet";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditOptions {
    pub replace_scope: ReplaceScope,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub markup: String,
    /// The intent that was applied, or `Unrecognized` when nothing changed.
    pub intent: Intent,
    pub changes: Vec<String>,
}

impl EditOutcome {
    pub fn applied(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Runs `instruction` against `markup`. Candidate intents are tried in
/// priority order and the first transform that changes something wins. When
/// nothing applies, or the markup cannot be parsed, the input text comes back
/// untouched.
pub fn apply_instruction(markup: &str, instruction: &str, options: &EditOptions) -> EditOutcome {
    let unchanged = || EditOutcome {
        markup: markup.to_string(),
        intent: Intent::Unrecognized,
        changes: Vec::new(),
    };

    let diagram = match Diagram::parse(markup) {
        Ok(diagram) => diagram,
        Err(e) => {
            debug!(error = %e, "document is not editable");
            return unchanged();
        }
    };

    for intent in intent::candidates(instruction) {
        let mut candidate = diagram.clone();
        let changes = mutator::apply(&mut candidate, &intent, instruction, options.replace_scope);
        if changes.is_empty() {
            debug!(?intent, "transform did not apply, falling through");
            continue;
        }
        info!(kind = ?intent.kind(), changes = changes.len(), "instruction applied");
        return EditOutcome {
            markup: candidate.to_markup(),
            intent,
            changes,
        };
    }

    debug!(instruction, "no transform applied");
    unchanged()
}

/// Up to [`MAX_LISTED_COMPONENTS`] distinct component labels. Falls back to a
/// raw attribute scan when the markup does not parse, and to a single
/// placeholder when nothing is found.
pub fn component_labels(markup: &str) -> Vec<String> {
    let mut labels = match Diagram::parse(markup) {
        Ok(diagram) => diagram.node_labels(),
        Err(_) => scan_labels(markup),
    };
    labels.truncate(MAX_LISTED_COMPONENTS);
    if labels.is_empty() {
        labels.push(NO_COMPONENTS_PLACEHOLDER.to_string());
    }
    labels
}

fn scan_labels(markup: &str) -> Vec<String> {
    static LABEL_RE: OnceLock<Regex> = OnceLock::new();
    let re = LABEL_RE
        .get_or_init(|| Regex::new(r#"\b(?:value|label)="([^"]*)""#).expect("valid regex"));
    let mut labels: Vec<String> = Vec::new();
    for caps in re.captures_iter(markup) {
        let label = decode_entities(&caps[1]).trim().to_string();
        if !label.is_empty() && !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

/// Assistant reply for an outcome: the change list when something was applied,
/// otherwise guidance built from the components of `markup`.
pub fn reply(outcome: &EditOutcome, markup: &str) -> String {
    if outcome.applied() {
        summary(&outcome.changes)
    } else {
        guidance(markup)
    }
}

pub fn summary(changes: &[String]) -> String {
    let mut lines = vec!["Updated the diagram:".to_string()];
    lines.extend(changes.iter().map(|change| format!("• {change}")));
    lines.join("\n")
}

pub fn guidance(markup: &str) -> String {
    let components = component_labels(markup).join(", ");
    [
        "I couldn't turn that into a diagram change. Try something like:",
        "• \"remove GPU block\"",
        "• \"change GPU to CPU\"",
        "• \"remove the connection between CPU and RAM\" or \"delete all arrows\"",
        "• \"add a RAM component\"",
        "• \"set CPU size to 200\" or \"change CPU color to blue\"",
        "• \"make CPU bigger\"",
        format!("Components in the diagram: {components}").as_str(),
    ]
    .join("\n")
}
