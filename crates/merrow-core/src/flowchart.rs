//! Flowchart object model.
//!
//! A [`MermaidFlowchart`] is built incrementally by the flowchart parser:
//! nodes are registered under their id the first time the id is mentioned,
//! edges and subgraphs are appended in source order. Edges reference their
//! endpoints by node id rather than by pointer; resolution back to a
//! [`FlowchartNode`] happens at read time through [`MermaidFlowchart::node`].

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::ParseError;

/// Layout direction of a flowchart or of a subgraph override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Direction {
    /// `TD` / `TB`
    #[default]
    TopDown,
    /// `BT`
    BottomUp,
    /// `LR`
    LeftRight,
    /// `RL`
    RightLeft,
}

impl Direction {
    /// Maps a direction keyword (`TD`, `TB`, `BT`, `LR`, `RL`) to a
    /// direction. Any other word is not a direction.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "TD" | "TB" => Some(Self::TopDown),
            "BT" => Some(Self::BottomUp),
            "LR" => Some(Self::LeftRight),
            "RL" => Some(Self::RightLeft),
            _ => None,
        }
    }
}

/// Node shape, determined by the bracket pair that delimits the node text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ShapeKind {
    /// `[text]`, and the default for bare node references.
    #[default]
    Rectangle,
    /// `(text)`
    Rounded,
    /// `([text])`
    Stadium,
    /// `[[text]]`
    Subroutine,
    /// `{text}`
    Rhombus,
    /// `{{text}}`
    Hexagon,
    /// `((text))`
    Circle,
    /// `(((text)))`
    DoubleCircle,
    /// `>text]`
    Asymmetric,
    /// `[/text/]`
    Parallelogram,
    /// `[\text\]`
    Trapezoid,
}

/// Line style of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeStyle {
    Solid,
    Dotted,
    Thick,
    Invisible,
}

/// Arrowhead drawn at the edge's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArrowHead {
    /// Filled point (`-->`).
    Normal,
    /// Headless visible link (`---`).
    Open,
    /// `--x`
    Cross,
    /// `--o`
    Circle,
    /// No head at all; only invisible links carry this.
    None,
}

/// A single flowchart node. Identity is the `id`; `text` and `shape` come
/// from the first shaped occurrence, or default to the id and a rectangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowchartNode {
    pub id: String,
    pub text: String,
    pub shape: ShapeKind,
    /// 1-based line of the first mention.
    pub source_line: usize,
}

/// A directed connection between two registered nodes.
///
/// `from`/`to` are node ids into the owning diagram's node map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowchartEdge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    pub style: EdgeStyle,
    pub arrowhead: ArrowHead,
    /// Minimum rank distance the layout should keep between the endpoints;
    /// grows with the length of the link glyph (`---->` asks for 2).
    pub min_length: usize,
}

/// A named grouping of nodes, possibly nested and possibly carrying its
/// own direction override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowchartSubgraph {
    pub id: String,
    pub title: Option<String>,
    pub direction: Option<Direction>,
    pub has_custom_direction: bool,
    /// Member node ids, in the order they were attributed.
    pub nodes: IndexSet<String>,
    pub subgraphs: Vec<FlowchartSubgraph>,
}

impl FlowchartSubgraph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            direction: None,
            has_custom_direction: false,
            nodes: IndexSet::new(),
            subgraphs: Vec::new(),
        }
    }

    /// Attributes a registered node to this subgraph. Duplicate mentions
    /// keep the first position.
    pub fn add_node(&mut self, id: &str) {
        self.nodes.insert(id.to_string());
    }
}

/// A `classDef` declaration. Only the class name is recorded; the style
/// body is accepted syntactically and discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowchartStyle {
    pub class_name: String,
}

/// A parsed flowchart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MermaidFlowchart {
    pub direction: Direction,
    /// Nodes keyed by id, in first-mention order.
    pub nodes: IndexMap<String, FlowchartNode>,
    pub edges: Vec<FlowchartEdge>,
    pub subgraphs: Vec<FlowchartSubgraph>,
    pub styles: Vec<FlowchartStyle>,
    /// Append-only diagnostics; a non-empty list still leaves the rest of
    /// the model usable.
    pub errors: Vec<ParseError>,
}

impl MermaidFlowchart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the node registered under `id`, creating a default
    /// rectangle node with `text == id` on first mention.
    pub fn get_or_create_node(&mut self, id: &str, source_line: usize) -> &mut FlowchartNode {
        self.nodes.entry(id.to_string()).or_insert_with(|| FlowchartNode {
            id: id.to_string(),
            text: id.to_string(),
            shape: ShapeKind::default(),
            source_line,
        })
    }

    /// Registers a shaped node definition. A shaped occurrence always sets
    /// text and shape; bare references never overwrite them.
    pub fn define_node(
        &mut self,
        id: &str,
        text: impl Into<String>,
        shape: ShapeKind,
        source_line: usize,
    ) {
        let node = self.get_or_create_node(id, source_line);
        node.text = text.into();
        node.shape = shape;
    }

    /// Read-time endpoint resolution for edges and subgraph members.
    pub fn node(&self, id: &str) -> Option<&FlowchartNode> {
        self.nodes.get(id)
    }

    pub fn add_edge(&mut self, edge: FlowchartEdge) {
        self.edges.push(edge);
    }

    pub fn push_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }
}
