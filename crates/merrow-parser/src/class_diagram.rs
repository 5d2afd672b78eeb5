//! Recursive-descent parser for the class diagram grammar.
//!
//! ```text
//! classDiagram := "classDiagram" statement* EOF
//! statement    := title | class | relation-or-reference | comment | <discard>
//! ```
//!
//! Member parsing needs real lookahead: `-` is both the private-visibility
//! marker and the first character of several link glyphs, and `Type name`
//! must be told apart from a bare `name`. Both are resolved by peeking (or
//! snapshotting and restoring the cursor) — tokens are never mutated.

use log::debug;

use merrow_core::class_diagram::{
    MermaidClassDiagram, MermaidClassMember, MermaidRelation, RelationType, Visibility,
};
use merrow_core::error::ParseError;

use crate::cursor::Cursor;
use crate::error::{Result, SyntaxError};
use crate::lexer;
use crate::tokens::{Token, TokenKind, is_identifier_like};

/// Statement-starting keywords used as resynchronization anchors.
const SYNC_KEYWORDS: [TokenKind; 2] = [TokenKind::Class, TokenKind::Title];

/// Parses class diagram source into a model.
///
/// Never fails: all diagnostics end up in the returned diagram's `errors`
/// list and the rest of the model is populated best-effort.
pub fn parse(source: &str) -> MermaidClassDiagram {
    let tokens = lexer::scan_all(source);
    let token_count = tokens.len();
    debug!(token_count; "parsing class diagram source");
    let diagram = ClassDiagramParser::new(&tokens).parse();
    let class_count = diagram.classes.len();
    let relation_count = diagram.relations.len();
    let error_count = diagram.errors.len();
    debug!(class_count, relation_count, error_count; "class diagram parse finished");
    diagram
}

/// Classification of relation glyph tokens, keyed entirely on the token
/// kind the lexer produced. Unrecognized link glyphs deliberately fall
/// back to a plain association rather than an error.
fn relation_type_of(kind: TokenKind) -> Option<RelationType> {
    let relation = match kind {
        TokenKind::Triangle | TokenKind::BackTriangle => RelationType::Inheritance,
        TokenKind::DotsTriangle | TokenKind::BackDotsTriangle => RelationType::Realization,
        TokenKind::StarLink => RelationType::Composition,
        TokenKind::CircleLink | TokenKind::CircleArrow => RelationType::Aggregation,
        TokenKind::DotsArrow
        | TokenKind::BackDotsArrow
        | TokenKind::Dots
        | TokenKind::DottedArrow
        | TokenKind::DottedLine
        | TokenKind::DottedCircleArrow
        | TokenKind::DottedCrossArrow => RelationType::Dependency,
        TokenKind::Arrow
        | TokenKind::BackArrow
        | TokenKind::Line
        | TokenKind::ThickArrow
        | TokenKind::ThickLine
        | TokenKind::InvisibleLine
        | TokenKind::CrossArrow
        | TokenKind::ThickCircleArrow
        | TokenKind::ThickCrossArrow => RelationType::Association,
        _ => return None,
    };
    Some(relation)
}

struct ClassDiagramParser<'t, 'src> {
    cursor: Cursor<'t, 'src>,
    diagram: MermaidClassDiagram,
}

impl<'t, 'src> ClassDiagramParser<'t, 'src> {
    fn new(tokens: &'t [Token<'src>]) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            diagram: MermaidClassDiagram::new(),
        }
    }

    fn parse(mut self) -> MermaidClassDiagram {
        self.skip_trivia();
        if self.cursor.at(TokenKind::ClassDiagram) {
            self.cursor.advance();
        } else {
            let token = self.cursor.peek();
            self.diagram.push_error(ParseError::new(
                "expected 'classDiagram' header",
                token.line,
                token.column,
            ));
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
            TokenKind::Title => self.title_statement(),
            TokenKind::Class => self.class_statement(),
            TokenKind::DirectionKw => {
                // `direction LR` — accepted and ignored.
                self.cursor.advance();
                self.cursor.bump_if(TokenKind::DirectionValue);
                Ok(())
            }
            kind if is_identifier_like(kind) => self.relation_statement(),
            _ => {
                self.cursor.advance();
                Ok(())
            }
        }
    }

    /// `title <rest of line>`
    fn title_statement(&mut self) -> Result<()> {
        self.cursor.advance();
        let text = self.join_until_line_end();
        if !text.is_empty() {
            self.diagram.title = Some(text);
        }
        Ok(())
    }

    /// `class Name` with an optional `{ members }` body.
    fn class_statement(&mut self) -> Result<()> {
        self.cursor.advance();
        let token = self.cursor.peek();
        if !is_identifier_like(token.kind) {
            return Err(SyntaxError::at(token, "expected class name after 'class'"));
        }
        let token = self.cursor.advance();
        let name = token.text.to_string();
        let line = token.line;
        self.diagram.get_or_create_class(&name, line);

        if self.cursor.bump_if(TokenKind::LBrace) {
            loop {
                self.skip_trivia();
                let token = self.cursor.peek();
                match token.kind {
                    TokenKind::RBrace => {
                        self.cursor.advance();
                        break;
                    }
                    TokenKind::Eof => {
                        return Err(SyntaxError::at(token, "expected '}' to close class body"));
                    }
                    _ => match self.member()? {
                        Some(member) => {
                            self.diagram.get_or_create_class(&name, line).members.push(member);
                        }
                        // Not a member at all; skip the stray token and
                        // keep scanning the body.
                        None => {
                            self.cursor.advance();
                        }
                    },
                }
            }
        }
        Ok(())
    }

    /// One member production. Returns `Ok(None)` when the upcoming tokens
    /// are not a member; in that case the cursor is restored to where the
    /// production started.
    fn member(&mut self) -> Result<Option<MermaidClassMember>> {
        let start = self.cursor.snapshot();
        let mut visibility = Visibility::default();
        match self.cursor.peek_kind() {
            TokenKind::Plus => {
                self.cursor.advance();
                visibility = Visibility::Public;
            }
            TokenKind::Hash => {
                self.cursor.advance();
                visibility = Visibility::Protected;
            }
            TokenKind::Tilde => {
                self.cursor.advance();
                visibility = Visibility::Package;
            }
            TokenKind::Minus => {
                // `-` only marks private visibility when a name follows;
                // otherwise this is not a member at all.
                self.cursor.advance();
                if is_identifier_like(self.cursor.peek_kind()) {
                    visibility = Visibility::Private;
                } else {
                    self.cursor.restore(start);
                    return Ok(None);
                }
            }
            _ => {}
        }

        if !is_identifier_like(self.cursor.peek_kind()) {
            self.cursor.restore(start);
            return Ok(None);
        }
        // `Type name` versus bare `name`: two identifiers in a row mean
        // the first was a type.
        let mut type_name: Option<String> = None;
        if is_identifier_like(self.cursor.nth_kind(1)) {
            let first = self.cursor.advance();
            type_name = Some(first.text.to_string());
        }
        let name = self.cursor.advance().text.to_string();

        let mut is_method = false;
        if self.cursor.bump_if(TokenKind::LParen) {
            is_method = true;
            // Parameters are skipped verbatim; they are not modeled.
            loop {
                let token = self.cursor.peek();
                match token.kind {
                    TokenKind::RParen => {
                        self.cursor.advance();
                        break;
                    }
                    TokenKind::Newline | TokenKind::Eof => {
                        return Err(SyntaxError::at(
                            token,
                            "expected ')' to close parameter list",
                        ));
                    }
                    _ => {
                        self.cursor.advance();
                    }
                }
            }
        }

        if self.cursor.bump_if(TokenKind::Colon) {
            let mut annotation = String::new();
            let mut reclassified = false;
            loop {
                match self.cursor.peek_kind() {
                    TokenKind::Newline
                    | TokenKind::Semicolon
                    | TokenKind::RBrace
                    | TokenKind::Eof
                    | TokenKind::Plus
                    | TokenKind::Minus
                    | TokenKind::Hash => break,
                    // A parameter list after the annotation means the
                    // annotation was a return type: this is a method.
                    TokenKind::LParen => {
                        is_method = true;
                        reclassified = true;
                        break;
                    }
                    _ => {
                        let token = self.cursor.advance();
                        if !annotation.is_empty() {
                            annotation.push(' ');
                        }
                        annotation.push_str(token.text);
                    }
                }
            }
            if !reclassified && !annotation.is_empty() {
                type_name = Some(annotation);
            }
        }

        // Trailing decorations are discarded up to the next member start
        // or end of line.
        while !matches!(
            self.cursor.peek_kind(),
            TokenKind::Newline
                | TokenKind::Semicolon
                | TokenKind::RBrace
                | TokenKind::Eof
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Hash
                | TokenKind::Tilde
        ) {
            self.cursor.advance();
        }

        Ok(Some(MermaidClassMember {
            name,
            is_method,
            visibility,
            type_name,
        }))
    }

    /// Relation statement (`Dog --|> Animal : label`) or a bare class
    /// reference registering the name.
    fn relation_statement(&mut self) -> Result<()> {
        let first = self.cursor.advance();
        let from = first.text.to_string();
        self.diagram.get_or_create_class(&from, first.line);

        let Some(relation_type) = relation_type_of(self.cursor.peek_kind()) else {
            // `Name : member` attaches a member to the class; a lone name
            // is just a bare reference.
            if self.cursor.bump_if(TokenKind::Colon) {
                match self.member()? {
                    Some(member) => {
                        self.diagram
                            .get_or_create_class(&from, first.line)
                            .members
                            .push(member);
                    }
                    None => self.skip_statement_remainder(),
                }
            }
            return Ok(());
        };
        self.cursor.advance();

        let token = self.cursor.peek();
        if !is_identifier_like(token.kind) {
            return Err(SyntaxError::at(
                token,
                "expected class name after relationship arrow",
            ));
        }
        let dest = self.cursor.advance();
        let to = dest.text.to_string();
        self.diagram.get_or_create_class(&to, dest.line);

        let label = if self.cursor.bump_if(TokenKind::Colon) {
            let text = self.join_until_line_end();
            if text.is_empty() { None } else { Some(text) }
        } else {
            None
        };

        self.diagram.add_relation(MermaidRelation {
            from,
            to,
            relation_type,
            label,
        });
        Ok(())
    }

    fn skip_statement_remainder(&mut self) {
        while !matches!(
            self.cursor.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        ) {
            self.cursor.advance();
        }
    }

    /// Space-joins the remaining tokens of the current statement.
    fn join_until_line_end(&mut self) -> String {
        let mut text = String::new();
        while !matches!(
            self.cursor.peek_kind(),
            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
        ) {
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
        text
    }
}
