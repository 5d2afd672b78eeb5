//! Recursive-descent parser for the flowchart grammar.
//!
//! Grammar, informally:
//!
//! ```text
//! flowchart := ("flowchart" | "graph") direction? statement* EOF
//! statement := comment | subgraph | style | classDef | node-or-edge | <discard>
//! ```
//!
//! Statement dispatch guarantees forward progress: a token that starts no
//! known statement is consumed and discarded, so the parser never stalls.
//! Failures inside a statement are recorded on the diagram and recovery
//! resumes at the next statement boundary.

use log::debug;

use merrow_core::error::ParseError;
use merrow_core::flowchart::{
    ArrowHead, Direction, EdgeStyle, FlowchartEdge, FlowchartStyle, FlowchartSubgraph,
    MermaidFlowchart, ShapeKind,
};

use crate::cursor::Cursor;
use crate::error::{Result, SyntaxError};
use crate::lexer;
use crate::tokens::{Token, TokenKind, is_identifier_like};

/// Statement-starting keywords used as resynchronization anchors.
const SYNC_KEYWORDS: [TokenKind; 4] = [
    TokenKind::Subgraph,
    TokenKind::End,
    TokenKind::Style,
    TokenKind::ClassDef,
];

/// Parses flowchart source into a model.
///
/// Never fails: all diagnostics end up in the returned diagram's `errors`
/// list and the rest of the model is populated best-effort.
pub fn parse(source: &str) -> MermaidFlowchart {
    let tokens = lexer::scan_all(source);
    let token_count = tokens.len();
    debug!(token_count; "parsing flowchart source");
    let diagram = FlowchartParser::new(&tokens).parse();
    let node_count = diagram.nodes.len();
    let edge_count = diagram.edges.len();
    let error_count = diagram.errors.len();
    debug!(node_count, edge_count, error_count; "flowchart parse finished");
    diagram
}

/// Fixed classification of link tokens into line style and arrowhead.
/// Invisible links always pair with no arrowhead; headless visible links
/// carry the open head.
fn edge_parts(kind: TokenKind) -> Option<(EdgeStyle, ArrowHead)> {
    let parts = match kind {
        TokenKind::Arrow | TokenKind::BackArrow => (EdgeStyle::Solid, ArrowHead::Normal),
        TokenKind::Line => (EdgeStyle::Solid, ArrowHead::Open),
        TokenKind::DottedArrow => (EdgeStyle::Dotted, ArrowHead::Normal),
        TokenKind::DottedLine => (EdgeStyle::Dotted, ArrowHead::Open),
        TokenKind::ThickArrow => (EdgeStyle::Thick, ArrowHead::Normal),
        TokenKind::ThickLine => (EdgeStyle::Thick, ArrowHead::Open),
        TokenKind::InvisibleLine => (EdgeStyle::Invisible, ArrowHead::None),
        TokenKind::CircleArrow => (EdgeStyle::Solid, ArrowHead::Circle),
        TokenKind::CrossArrow => (EdgeStyle::Solid, ArrowHead::Cross),
        TokenKind::DottedCircleArrow => (EdgeStyle::Dotted, ArrowHead::Circle),
        TokenKind::DottedCrossArrow => (EdgeStyle::Dotted, ArrowHead::Cross),
        TokenKind::ThickCircleArrow => (EdgeStyle::Thick, ArrowHead::Circle),
        TokenKind::ThickCrossArrow => (EdgeStyle::Thick, ArrowHead::Cross),
        _ => return None,
    };
    Some(parts)
}

/// Extra glyph length asks the layout for a longer edge: `---->` wants a
/// minimum rank distance of 2.
fn link_min_length(token: &Token<'_>) -> usize {
    let count = |ch: char| token.text.chars().filter(|&c| c == ch).count();
    let raw = match token.kind {
        TokenKind::DottedArrow
        | TokenKind::DottedLine
        | TokenKind::DottedCircleArrow
        | TokenKind::DottedCrossArrow => count('.'),
        TokenKind::ThickArrow | TokenKind::ThickCircleArrow | TokenKind::ThickCrossArrow => {
            count('=').saturating_sub(1)
        }
        TokenKind::ThickLine => count('=').saturating_sub(2),
        TokenKind::InvisibleLine => count('~').saturating_sub(2),
        TokenKind::Line => count('-').saturating_sub(2),
        _ => count('-').saturating_sub(1),
    };
    raw.max(1)
}

/// Maps a shape-opening token to the node shape and the closing token it
/// requires.
fn shape_for_opener(kind: TokenKind) -> Option<(ShapeKind, TokenKind)> {
    let shape = match kind {
        TokenKind::LSquare => (ShapeKind::Rectangle, TokenKind::RSquare),
        TokenKind::LParen => (ShapeKind::Rounded, TokenKind::RParen),
        TokenKind::LStadium => (ShapeKind::Stadium, TokenKind::RStadium),
        TokenKind::LSubroutine => (ShapeKind::Subroutine, TokenKind::RSubroutine),
        TokenKind::LBrace => (ShapeKind::Rhombus, TokenKind::RBrace),
        TokenKind::LHexagon => (ShapeKind::Hexagon, TokenKind::RHexagon),
        TokenKind::LCircle => (ShapeKind::Circle, TokenKind::RCircle),
        TokenKind::LDoubleCircle => (ShapeKind::DoubleCircle, TokenKind::RDoubleCircle),
        TokenKind::AsymmetricOpen => (ShapeKind::Asymmetric, TokenKind::RSquare),
        TokenKind::LParallelogram => (ShapeKind::Parallelogram, TokenKind::RParallelogram),
        TokenKind::LTrapezoid => (ShapeKind::Trapezoid, TokenKind::RTrapezoid),
        _ => return None,
    };
    Some(shape)
}

struct FlowchartParser<'t, 'src> {
    cursor: Cursor<'t, 'src>,
    diagram: MermaidFlowchart,
}

impl<'t, 'src> FlowchartParser<'t, 'src> {
    fn new(tokens: &'t [Token<'src>]) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            diagram: MermaidFlowchart::new(),
        }
    }

    fn parse(mut self) -> MermaidFlowchart {
        self.skip_trivia();
        match self.cursor.peek_kind() {
            TokenKind::Flowchart | TokenKind::Graph => {
                self.cursor.advance();
                if self.cursor.at(TokenKind::DirectionValue) {
                    let token = self.cursor.advance();
                    if let Some(direction) = Direction::from_keyword(token.text) {
                        self.diagram.direction = direction;
                    }
                }
            }
            _ => {
                let token = self.cursor.peek();
                self.diagram.push_error(ParseError::new(
                    "expected 'flowchart' or 'graph' header",
                    token.line,
                    token.column,
                ));
            }
        }

        while !self.cursor.at_eof() {
            if let Err(err) = self.statement() {
                self.diagram.push_error(err.into_parse_error());
                self.cursor.synchronize(&SYNC_KEYWORDS);
            }
        }
        self.diagram
    }

    fn skip_trivia(&mut self) {
        while matches!(
            self.cursor.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Comment
        ) {
            self.cursor.advance();
        }
    }

    fn statement(&mut self) -> Result<()> {
        match self.cursor.peek_kind() {
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Comment => {
                self.cursor.advance();
                Ok(())
            }
            TokenKind::Subgraph => {
                let subgraph = self.subgraph()?;
                self.diagram.subgraphs.push(subgraph);
                Ok(())
            }
            TokenKind::Style => self.style_statement(),
            TokenKind::ClassDef => self.class_def_statement(),
            kind if is_identifier_like(kind) => self.node_or_edge_statement(),
            _ => {
                // Forward progress: discard anything unexpected.
                self.cursor.advance();
                Ok(())
            }
        }
    }

    /// Node definition, bare reference, or an edge chain like
    /// `A[Start] -->|label| B --> C`.
    fn node_or_edge_statement(&mut self) -> Result<()> {
        let mut source_id = self.node_clause()?;
        loop {
            let Some((style, arrowhead)) = edge_parts(self.cursor.peek_kind()) else {
                break;
            };
            let link = self.cursor.advance();
            let min_length = link_min_length(link);
            let reversed = link.kind == TokenKind::BackArrow;
            let label = self.edge_label()?;
            let dest_id = self.node_clause()?;
            let (from, to) = if reversed {
                (dest_id.clone(), source_id)
            } else {
                (source_id, dest_id.clone())
            };
            self.diagram.add_edge(FlowchartEdge {
                from,
                to,
                label,
                style,
                arrowhead,
                min_length,
            });
            // The destination seeds the next hop of the chain.
            source_id = dest_id;
        }
        Ok(())
    }

    /// An identifier optionally followed by a shape definition. Registers
    /// the node and returns its id.
    fn node_clause(&mut self) -> Result<String> {
        let token = self.cursor.peek();
        if !is_identifier_like(token.kind) {
            return Err(SyntaxError::at(token, "expected node identifier"));
        }
        let token = self.cursor.advance();
        let id = token.text.to_string();
        let line = token.line;

        if let Some((shape, closer)) = shape_for_opener(self.cursor.peek_kind()) {
            self.cursor.advance();
            let text = self.shape_text(closer)?;
            self.diagram.define_node(&id, text, shape, line);
        } else {
            self.diagram.get_or_create_node(&id, line);
        }
        Ok(id)
    }

    /// Accumulates node text up to `closer`. Pipe characters are edge-label
    /// delimiters, not content, and are dropped. Words are rejoined with
    /// single spaces, except that no space goes before trailing punctuation
    /// or right after an opening bracket.
    fn shape_text(&mut self, closer: TokenKind) -> Result<String> {
        let mut text = String::new();
        let mut prev: Option<TokenKind> = None;
        loop {
            let token = self.cursor.peek();
            if token.kind == closer {
                self.cursor.advance();
                break;
            }
            match token.kind {
                TokenKind::Newline | TokenKind::Eof => {
                    return Err(SyntaxError::at(
                        token,
                        format!("expected '{closer}' to close node text"),
                    ));
                }
                TokenKind::Pipe => {
                    self.cursor.advance();
                }
                _ => {
                    let token = self.cursor.advance();
                    if !text.is_empty() && space_before(prev, token.kind) {
                        text.push(' ');
                    }
                    if token.kind == TokenKind::StringLit {
                        text.push_str(token.string_value());
                    } else {
                        text.push_str(token.text);
                    }
                    prev = Some(token.kind);
                }
            }
        }
        Ok(text)
    }

    /// Optional `|label|` after a link token.
    fn edge_label(&mut self) -> Result<Option<String>> {
        if !self.cursor.bump_if(TokenKind::Pipe) {
            return Ok(None);
        }
        let mut text = String::new();
        loop {
            let token = self.cursor.peek();
            match token.kind {
                TokenKind::Pipe => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Newline | TokenKind::Eof => {
                    return Err(SyntaxError::at(token, "expected '|' to close edge label"));
                }
                _ => {
                    let token = self.cursor.advance();
                    if !text.is_empty() {
                        text.push(' ');
                    }
                    if token.kind == TokenKind::StringLit {
                        text.push_str(token.string_value());
                    } else {
                        text.push_str(token.text);
                    }
                }
            }
        }
        Ok(Some(text))
    }

    /// `subgraph id ["title"]? ... end`, possibly nested.
    ///
    /// Body scanning is a shallow membership pass: identifier tokens that
    /// name an already-registered node join the subgraph's node set,
    /// nested subgraphs recurse, everything else is skipped.
    fn subgraph(&mut self) -> Result<FlowchartSubgraph> {
        self.cursor.advance();
        let token = self.cursor.peek();
        if !is_identifier_like(token.kind) {
            return Err(SyntaxError::at(token, "expected subgraph identifier"));
        }
        let token = self.cursor.advance();
        let mut subgraph = FlowchartSubgraph::new(token.text);

        if self.cursor.bump_if(TokenKind::LSquare) {
            let title = self.shape_text(TokenKind::RSquare)?;
            subgraph.title = Some(title);
        } else if self.cursor.at(TokenKind::StringLit) {
            let token = self.cursor.advance();
            subgraph.title = Some(token.string_value().to_string());
        }

        loop {
            let token = self.cursor.peek();
            match token.kind {
                TokenKind::End => {
                    self.cursor.advance();
                    break;
                }
                TokenKind::Eof => {
                    return Err(SyntaxError::at(token, "expected 'end' to close subgraph"));
                }
                TokenKind::Subgraph => {
                    let child = self.subgraph()?;
                    subgraph.subgraphs.push(child);
                }
                TokenKind::DirectionKw => {
                    self.cursor.advance();
                    let token = self.cursor.peek();
                    if token.kind != TokenKind::DirectionValue {
                        return Err(SyntaxError::at(token, "expected direction after 'direction'"));
                    }
                    let token = self.cursor.advance();
                    if let Some(direction) = Direction::from_keyword(token.text) {
                        subgraph.direction = Some(direction);
                        subgraph.has_custom_direction = true;
                    }
                }
                kind if is_identifier_like(kind) => {
                    let token = self.cursor.advance();
                    if self.diagram.nodes.contains_key(token.text) {
                        subgraph.add_node(token.text);
                    }
                }
                _ => {
                    self.cursor.advance();
                }
            }
        }
        Ok(subgraph)
    }

    /// `style <target> ...` — target required, properties discarded.
    fn style_statement(&mut self) -> Result<()> {
        self.cursor.advance();
        let token = self.cursor.peek();
        if !is_identifier_like(token.kind) {
            return Err(SyntaxError::at(token, "expected style target"));
        }
        self.cursor.advance();
        self.skip_to_statement_end();
        Ok(())
    }

    /// `classDef <name> ...` — the declaration and its name are recorded,
    /// the style body is discarded.
    fn class_def_statement(&mut self) -> Result<()> {
        self.cursor.advance();
        let token = self.cursor.peek();
        if !is_identifier_like(token.kind) {
            return Err(SyntaxError::at(token, "expected classDef name"));
        }
        let token = self.cursor.advance();
        self.diagram.styles.push(FlowchartStyle {
            class_name: token.text.to_string(),
        });
        self.skip_to_statement_end();
        Ok(())
    }

    fn skip_to_statement_end(&mut self) {
        while !matches!(
            self.cursor.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        ) {
            self.cursor.advance();
        }
    }
}

/// Space-insertion heuristic for reconstructed node text: no space before
/// closing punctuation, none right after an opening bracket.
fn space_before(prev: Option<TokenKind>, kind: TokenKind) -> bool {
    if matches!(
        kind,
        TokenKind::Question
            | TokenKind::Bang
            | TokenKind::Comma
            | TokenKind::Colon
            | TokenKind::Semicolon
            | TokenKind::Percent
    ) {
        return false;
    }
    !matches!(
        prev,
        Some(TokenKind::LParen | TokenKind::LSquare | TokenKind::LBrace)
    )
}
