//! Typed view of an mxGraph document.
//!
//! A [`Diagram`] keeps the surrounding markup (`mxfile`, `diagram`,
//! `mxGraphModel` and their attributes) untouched and lifts the children of
//! the first `<root>` element into [`Cell`]s. Mutations happen on the cells;
//! [`Diagram::to_markup`] splices them back in and re-serializes.

use crate::error::MarkupError;
use crate::markup_ast::{Attr, Element, Markup};
use crate::markup_parser::parse_markup;
use crate::markup_writer::write_markup;
use crate::style::Style;

const CELL_TAG: &str = "mxCell";
const WRAPPER_TAGS: [&str; 2] = ["object", "UserObject"];
const GEOMETRY_TAG: &str = "mxGeometry";
const ROOT_TAG: &str = "root";
const FALLBACK_PARENT: &str = "1";

#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    markup: Markup,
    root_path: Vec<usize>,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Node(Node),
    Edge(Edge),
    /// Layers, the model root cell and anything else carried verbatim.
    Other(Element),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub id: String,
    pub label: Option<String>,
    pub style: Style,
    pub parent: Option<String>,
    pub geometry: Option<Geometry>,
    pub extra_attrs: Vec<Attr>,
    pub extra_children: Vec<Element>,
    pub wrapper: Option<Wrapper>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Edge {
    pub id: String,
    pub label: Option<String>,
    pub style: Style,
    pub parent: Option<String>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub geometry: Option<Geometry>,
    pub extra_attrs: Vec<Attr>,
    pub extra_children: Vec<Element>,
    pub wrapper: Option<Wrapper>,
}

/// An `<object>` / `<UserObject>` element that carries a cell's id, its
/// `label` and custom data, with the geometry-bearing `mxCell` inside.
#[derive(Debug, Clone, PartialEq)]
pub struct Wrapper {
    pub name: String,
    /// Attributes in document order. `id` and `label` values are taken from
    /// the cell when writing.
    pub attrs: Vec<Attr>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub extra_attrs: Vec<Attr>,
    pub children: Vec<Element>,
}

impl Diagram {
    pub fn parse(input: &str) -> Result<Self, MarkupError> {
        let mut markup = parse_markup(input)?;
        let root_path = markup.root.find_path(ROOT_TAG).ok_or(MarkupError::MissingRoot)?;
        let root = markup
            .root
            .at_path_mut(&root_path)
            .ok_or(MarkupError::MissingRoot)?;
        let cells = std::mem::take(&mut root.children)
            .into_iter()
            .map(Cell::from_element)
            .collect();
        Ok(Self {
            markup,
            root_path,
            cells,
        })
    }

    pub fn to_markup(&self) -> String {
        let mut markup = self.markup.clone();
        if let Some(root) = markup.root.at_path_mut(&self.root_path) {
            root.children = self.cells.iter().map(Cell::to_element).collect();
        }
        write_markup(&markup)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Node(node) => Some(node),
            _ => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.cells.iter().filter_map(|cell| match cell {
            Cell::Edge(edge) => Some(edge),
            _ => None,
        })
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes().find(|node| node.id == id)
    }

    /// Mutable access to the first node whose label contains `name`.
    pub fn first_node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.cells.iter_mut().find_map(|cell| match cell {
            Cell::Node(node) if node.label_contains(name) => Some(node),
            _ => None,
        })
    }

    /// Non-empty node labels, deduplicated, in document order.
    pub fn node_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for label in self.nodes().filter_map(|node| node.label.as_deref()) {
            let label = label.trim();
            if !label.is_empty() && !labels.iter().any(|l| l == label) {
                labels.push(label.to_string());
            }
        }
        labels
    }

    /// One past the largest numeric id anywhere in the document, wrapper
    /// elements included. Non-numeric ids count as 0. `None` once the id
    /// space is exhausted.
    pub fn next_id(&self) -> Option<u64> {
        let mut ids = Vec::new();
        self.markup.root.collect_attr("id", &mut ids);
        for cell in &self.cells {
            cell.to_element().collect_attr("id", &mut ids);
        }
        ids.iter()
            .map(|id| numeric_id(id))
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    /// Id of the first layer cell (a plain cell that has a parent), which is
    /// where draw.io puts top-level shapes.
    pub fn default_parent(&self) -> String {
        self.cells
            .iter()
            .find_map(|cell| match cell {
                Cell::Other(el) if el.name == CELL_TAG && el.attr("parent").is_some() => {
                    el.attr("id").map(str::to_string)
                }
                _ => None,
            })
            .unwrap_or_else(|| FALLBACK_PARENT.to_string())
    }
}

impl Cell {
    pub fn from_element(element: Element) -> Self {
        if WRAPPER_TAGS.contains(&element.name.as_str()) {
            return Cell::from_wrapper(element);
        }
        if element.name != CELL_TAG || element.attr("id").is_none() {
            return Cell::Other(element);
        }
        if element.attr("vertex") == Some("1") {
            Cell::Node(Node::from_element(element))
        } else if element.attr("edge") == Some("1") {
            Cell::Edge(Edge::from_element(element))
        } else {
            Cell::Other(element)
        }
    }

    /// Lifts a wrapper around a single anonymous vertex or edge cell. Anything
    /// else stays opaque.
    fn from_wrapper(element: Element) -> Self {
        let liftable = element.attr("id").is_some()
            && element.text.is_none()
            && matches!(
                element.children.as_slice(),
                [cell] if cell.name == CELL_TAG
                    && cell.attr("id").is_none()
                    && cell.attr("value").is_none()
                    && (cell.attr("vertex") == Some("1") || cell.attr("edge") == Some("1"))
            );
        if !liftable {
            return Cell::Other(element);
        }

        let Element {
            name,
            attrs,
            mut children,
            ..
        } = element;
        let Some(cell) = children.pop() else {
            return Cell::Other(Element {
                name,
                attrs,
                text: None,
                children,
            });
        };
        let id = attrs
            .iter()
            .find(|a| a.name == "id")
            .map(|a| a.value.clone())
            .unwrap_or_default();
        let label = attrs
            .iter()
            .find(|a| a.name == "label")
            .map(|a| a.value.clone());
        let wrapper = Some(Wrapper { name, attrs });

        if cell.attr("vertex") == Some("1") {
            Cell::Node(Node {
                id,
                label,
                wrapper,
                ..Node::from_element(cell)
            })
        } else {
            Cell::Edge(Edge {
                id,
                label,
                wrapper,
                ..Edge::from_element(cell)
            })
        }
    }

    pub fn to_element(&self) -> Element {
        match self {
            Cell::Node(node) => node.to_element(),
            Cell::Edge(edge) => edge.to_element(),
            Cell::Other(element) => element.clone(),
        }
    }
}

impl Node {
    /// Case-sensitive substring match on the label. An empty needle matches nothing.
    pub fn label_contains(&self, name: &str) -> bool {
        !name.is_empty() && self.label.as_deref().is_some_and(|label| label.contains(name))
    }

    pub fn resize(&mut self, size: f64) {
        let geometry = self.geometry.get_or_insert_with(Geometry::cell_default);
        geometry.width = Some(size);
        geometry.height = Some(size);
    }

    fn from_element(element: Element) -> Self {
        let mut node = Node::default();
        for attr in element.attrs {
            match attr.name.as_str() {
                "id" => node.id = attr.value,
                "value" => node.label = Some(attr.value),
                "style" => node.style = Style::parse(&attr.value),
                "parent" => node.parent = Some(attr.value),
                "vertex" => {}
                _ => node.extra_attrs.push(attr),
            }
        }
        (node.geometry, node.extra_children) = split_geometry(element.children);
        node
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new(CELL_TAG);
        if self.wrapper.is_none() {
            element = element.with_attr("id", &self.id);
            if let Some(label) = &self.label {
                element = element.with_attr("value", label);
            }
        }
        if !self.style.is_empty() {
            element = element.with_attr("style", self.style.to_string());
        }
        element = element.with_attr("vertex", "1");
        if let Some(parent) = &self.parent {
            element = element.with_attr("parent", parent);
        }
        element.attrs.extend(self.extra_attrs.iter().cloned());
        if let Some(geometry) = &self.geometry {
            element.children.push(geometry.to_element());
        }
        element.children.extend(self.extra_children.iter().cloned());
        match &self.wrapper {
            Some(wrapper) => wrapper.wrap(&self.id, self.label.as_deref(), element),
            None => element,
        }
    }
}

impl Edge {
    pub fn references(&self, node_id: &str) -> bool {
        self.source.as_deref() == Some(node_id) || self.target.as_deref() == Some(node_id)
    }

    fn from_element(element: Element) -> Self {
        let mut edge = Edge::default();
        for attr in element.attrs {
            match attr.name.as_str() {
                "id" => edge.id = attr.value,
                "value" => edge.label = Some(attr.value),
                "style" => edge.style = Style::parse(&attr.value),
                "parent" => edge.parent = Some(attr.value),
                "source" => edge.source = Some(attr.value),
                "target" => edge.target = Some(attr.value),
                "edge" => {}
                _ => edge.extra_attrs.push(attr),
            }
        }
        (edge.geometry, edge.extra_children) = split_geometry(element.children);
        edge
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new(CELL_TAG);
        if self.wrapper.is_none() {
            element = element.with_attr("id", &self.id);
            if let Some(label) = &self.label {
                element = element.with_attr("value", label);
            }
        }
        if !self.style.is_empty() {
            element = element.with_attr("style", self.style.to_string());
        }
        element = element.with_attr("edge", "1");
        if let Some(parent) = &self.parent {
            element = element.with_attr("parent", parent);
        }
        if let Some(source) = &self.source {
            element = element.with_attr("source", source);
        }
        if let Some(target) = &self.target {
            element = element.with_attr("target", target);
        }
        element.attrs.extend(self.extra_attrs.iter().cloned());
        if let Some(geometry) = &self.geometry {
            element.children.push(geometry.to_element());
        }
        element.children.extend(self.extra_children.iter().cloned());
        match &self.wrapper {
            Some(wrapper) => wrapper.wrap(&self.id, self.label.as_deref(), element),
            None => element,
        }
    }
}

impl Wrapper {
    fn wrap(&self, id: &str, label: Option<&str>, cell: Element) -> Element {
        let mut element = Element::new(&self.name);
        for attr in &self.attrs {
            match attr.name.as_str() {
                "id" => element.attrs.push(Attr::new("id", id)),
                "label" => {
                    if let Some(label) = label {
                        element.attrs.push(Attr::new("label", label));
                    }
                }
                _ => element.attrs.push(attr.clone()),
            }
        }
        if let Some(label) = label {
            if element.attr("label").is_none() {
                element.attrs.insert(0, Attr::new("label", label));
            }
        }
        element.children.push(cell);
        element
    }
}

impl Geometry {
    pub fn cell_default() -> Self {
        Geometry {
            extra_attrs: vec![Attr::new("as", "geometry")],
            ..Geometry::default()
        }
    }

    fn from_element(element: Element) -> Self {
        let mut geometry = Geometry {
            children: element.children,
            ..Geometry::default()
        };
        for attr in element.attrs {
            let slot = match attr.name.as_str() {
                "x" => &mut geometry.x,
                "y" => &mut geometry.y,
                "width" => &mut geometry.width,
                "height" => &mut geometry.height,
                _ => {
                    geometry.extra_attrs.push(attr);
                    continue;
                }
            };
            match attr.value.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => *slot = Some(value),
                _ => geometry.extra_attrs.push(attr),
            }
        }
        geometry
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new(GEOMETRY_TAG);
        for (name, value) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ] {
            if let Some(value) = value {
                element = element.with_attr(name, format_number(value));
            }
        }
        element.attrs.extend(self.extra_attrs.iter().cloned());
        element.children = self.children.clone();
        element
    }
}

fn split_geometry(children: Vec<Element>) -> (Option<Geometry>, Vec<Element>) {
    let mut geometry = None;
    let mut rest = Vec::new();
    for child in children {
        if geometry.is_none() && child.name == GEOMETRY_TAG {
            geometry = Some(Geometry::from_element(child));
        } else {
            rest.push(child);
        }
    }
    (geometry, rest)
}

/// Digit-only ids too long for `u64` saturate instead of counting as 0.
fn numeric_id(id: &str) -> u64 {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    id.parse().unwrap_or(u64::MAX)
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
