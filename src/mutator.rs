//! Diagram transforms, one per intent.
//!
//! Every transform returns the change records it produced; an empty list means
//! it did not apply. Callers that need all-or-nothing semantics run transforms
//! on a clone (see `engine::apply_instruction`).

use regex::{NoExpand, RegexBuilder};

use crate::diagram::{Cell, Diagram, Edge, Geometry, Node, format_number};
use crate::intent::Intent;
use crate::markup_writer::write_element;
use crate::style::Style;

pub const NEW_NODE_STYLE: &str =
    "rounded=1;whiteSpace=wrap;html=1;fillColor=#dae8fc;strokeColor=#6c8ebf;";
pub const NEW_NODE_X: f64 = 400.0;
pub const NEW_NODE_Y: f64 = 200.0;
pub const NEW_NODE_WIDTH: f64 = 120.0;
pub const NEW_NODE_HEIGHT: f64 = 60.0;
pub const BIGGER_SIZE: f64 = 150.0;
pub const SMALLER_SIZE: f64 = 80.0;

const FILL_COLOR: &str = "fillColor";
const SIZE_KEYWORDS: [&str; 3] = ["size", "width", "height"];
const COLOR_KEYWORDS: [&str; 2] = ["color", "colour"];
const STOP_WORDS: &[&str] = &[
    "the", "and", "make", "bigger", "larger", "smaller", "please", "can", "you", "could",
    "would", "this", "that", "with", "for", "all", "more", "bit", "little", "lot", "much",
    "them", "its", "also", "too", "both",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplaceScope {
    /// Only node and edge labels are rewritten.
    #[default]
    Labels,
    /// Every attribute value of every cell, ids and styles included.
    Everywhere,
}

pub fn apply(diagram: &mut Diagram, intent: &Intent, instruction: &str, scope: ReplaceScope) -> Vec<String> {
    match intent {
        Intent::Remove { component } => remove_component(diagram, component),
        Intent::Replace { from, to } => replace_text(diagram, from, to, scope),
        Intent::DisconnectEdges { first, second } => {
            disconnect(diagram, first.as_deref(), second.as_deref())
        }
        Intent::Add { component } => add_component(diagram, component),
        Intent::ModifyProperty { component, value } => {
            modify_property(diagram, component, value, instruction)
        }
        Intent::ContextualBulkResize => bulk_resize(diagram, instruction),
        Intent::Unrecognized => Vec::new(),
    }
}

/// Drops every node whose label contains `name`, plus the edges attached to
/// the first of them.
pub fn remove_component(diagram: &mut Diagram, name: &str) -> Vec<String> {
    let Some(first_id) = diagram
        .nodes()
        .find(|node| node.label_contains(name))
        .map(|node| node.id.clone())
    else {
        return Vec::new();
    };

    let mut changes = Vec::new();
    diagram.cells.retain(|cell| match cell {
        Cell::Node(node) if node.label_contains(name) => {
            changes.push(format!("Removed component \"{}\"", display_name(node)));
            false
        }
        _ => true,
    });

    let before = diagram.cells.len();
    diagram
        .cells
        .retain(|cell| !matches!(cell, Cell::Edge(edge) if edge.references(&first_id)));
    let removed = before - diagram.cells.len();
    if removed > 0 {
        changes.push(format!("Removed {removed} connection(s) attached to \"{name}\""));
    }
    changes
}

/// Whole-word, case-insensitive replacement of `from` by `to` upper-cased.
pub fn replace_text(diagram: &mut Diagram, from: &str, to: &str, scope: ReplaceScope) -> Vec<String> {
    let pattern = format!(r"\b{}\b", regex::escape(from));
    let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        return Vec::new();
    };
    let replacement = to.to_uppercase();

    let mut count = 0;
    let mut rewrite = |value: &mut String| {
        let hits = re.find_iter(value.as_str()).count();
        if hits > 0 {
            let replaced = re.replace_all(value.as_str(), NoExpand(&replacement)).into_owned();
            *value = replaced;
            count += hits;
        }
    };

    match scope {
        ReplaceScope::Labels => {
            for cell in &mut diagram.cells {
                let label = match cell {
                    Cell::Node(node) => node.label.as_mut(),
                    Cell::Edge(edge) => edge.label.as_mut(),
                    Cell::Other(_) => None,
                };
                if let Some(label) = label {
                    rewrite(label);
                }
            }
        }
        ReplaceScope::Everywhere => {
            for cell in &mut diagram.cells {
                let mut element = cell.to_element();
                element.for_each_value_mut(&mut rewrite);
                *cell = Cell::from_element(element);
            }
        }
    }

    if count == 0 {
        return Vec::new();
    }
    vec![format!(
        "Replaced {count} occurrence(s) of \"{from}\" with \"{replacement}\""
    )]
}

/// With both names, drops the edges whose text mentions both; otherwise drops
/// every edge.
pub fn disconnect(diagram: &mut Diagram, first: Option<&str>, second: Option<&str>) -> Vec<String> {
    let keep: Vec<bool> = diagram
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Edge(edge) => match (first, second) {
                (Some(a), Some(b)) => {
                    let text = edge_text(diagram, edge);
                    !(text.contains(a) && text.contains(b))
                }
                _ => false,
            },
            _ => true,
        })
        .collect();
    let removed = keep.iter().filter(|&&k| !k).count();
    if removed == 0 {
        return Vec::new();
    }

    let mut flags = keep.into_iter();
    diagram.cells.retain(|_| flags.next().unwrap_or(true));

    match (first, second) {
        (Some(a), Some(b)) => vec![format!(
            "Removed {removed} connection(s) between \"{a}\" and \"{b}\""
        )],
        _ => vec![format!("Removed all {removed} connection(s)")],
    }
}

/// Searchable text of an edge: its markup plus the labels of its endpoints.
fn edge_text(diagram: &Diagram, edge: &Edge) -> String {
    let mut lines = Vec::new();
    write_element(&mut lines, &edge.to_element(), 0);
    for end in [&edge.source, &edge.target].into_iter().flatten() {
        if let Some(label) = diagram.node(end).and_then(|node| node.label.as_deref()) {
            lines.push(label.to_string());
        }
    }
    lines.join("\n")
}

pub fn add_component(diagram: &mut Diagram, name: &str) -> Vec<String> {
    let Some(id) = diagram.next_id() else {
        return Vec::new();
    };
    let id = id.to_string();
    let label = name.to_uppercase();
    let node = Node {
        id: id.clone(),
        label: Some(label.clone()),
        style: Style::parse(NEW_NODE_STYLE),
        parent: Some(diagram.default_parent()),
        geometry: Some(Geometry {
            x: Some(NEW_NODE_X),
            y: Some(NEW_NODE_Y),
            width: Some(NEW_NODE_WIDTH),
            height: Some(NEW_NODE_HEIGHT),
            ..Geometry::cell_default()
        }),
        ..Node::default()
    };
    diagram.cells.push(Cell::Node(node));
    vec![format!("Added component \"{label}\" (id {id})")]
}

/// Resizes or recolors the first node matching `component`. The branch is
/// picked from keywords in the instruction text.
pub fn modify_property(diagram: &mut Diagram, component: &str, value: &str, instruction: &str) -> Vec<String> {
    let lowered = instruction.to_lowercase();
    let wants_size = SIZE_KEYWORDS.iter().any(|k| lowered.contains(k));
    let wants_color = COLOR_KEYWORDS.iter().any(|k| lowered.contains(k));

    let Some(node) = diagram.first_node_mut(component) else {
        return Vec::new();
    };

    if wants_size {
        match value.parse::<f64>() {
            Ok(size) if size.is_finite() && size > 0.0 => {
                node.resize(size);
                vec![resized(node, size)]
            }
            _ => Vec::new(),
        }
    } else if wants_color {
        let fill = color_code(value);
        node.style.set(FILL_COLOR, &fill);
        vec![format!(
            "Changed fill color of \"{}\" to {fill}",
            display_name(node)
        )]
    } else {
        Vec::new()
    }
}

/// Resizes every component named in the instruction to a fixed size chosen
/// by "bigger"/"larger" or "smaller".
pub fn bulk_resize(diagram: &mut Diagram, instruction: &str) -> Vec<String> {
    let lowered = instruction.to_lowercase();
    let size = if lowered.contains("bigger") || lowered.contains("larger") {
        BIGGER_SIZE
    } else if lowered.contains("smaller") {
        SMALLER_SIZE
    } else {
        return Vec::new();
    };

    let mut touched: Vec<String> = Vec::new();
    let mut changes = Vec::new();
    let words = instruction
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
        .filter(|word| word.chars().count() > 2 && !is_stop_word(word));
    for word in words {
        let Some(node) = diagram.first_node_mut(word) else {
            continue;
        };
        if touched.contains(&node.id) {
            continue;
        }
        touched.push(node.id.clone());
        node.resize(size);
        changes.push(resized(node, size));
    }
    changes
}

/// Hex code for the fixed color names; anything else is returned as given.
pub fn color_code(name: &str) -> String {
    let code = match name.to_lowercase().as_str() {
        "red" => "#f8cecc",
        "blue" => "#dae8fc",
        "green" => "#d5e8d4",
        "yellow" => "#fff2cc",
        "orange" => "#ffe6cc",
        "purple" => "#e1d5e7",
        "pink" => "#ffd1dc",
        "gray" => "#f5f5f5",
        _ => return name.to_string(),
    };
    code.to_string()
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.iter().any(|stop| stop.eq_ignore_ascii_case(word))
}

fn resized(node: &Node, size: f64) -> String {
    let size = format_number(size);
    format!("Resized \"{}\" to {size}×{size}", display_name(node))
}

fn display_name(node: &Node) -> &str {
    node.label
        .as_deref()
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .unwrap_or(&node.id)
}
