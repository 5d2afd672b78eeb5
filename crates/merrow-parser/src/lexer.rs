//! Single-pass tokenizer shared by both diagram grammars.
//!
//! [`scan_all`] is total: it never fails, an unrecognized character becomes
//! a [`TokenKind::Unknown`] token for the parser to skip or reject, and the
//! returned buffer always ends with exactly one [`TokenKind::Eof`] token.
//!
//! Multi-character glyphs are matched longest first, so `(((` never lexes
//! as `((` + `(`, and `-.->`, `==>`, `<|--` and friends come out as single
//! tokens. Intra-line whitespace is skipped without emitting anything; each
//! physical line break yields one newline token.

use crate::tokens::{Token, TokenKind};

/// Scans the whole source into a materialized token sequence.
pub fn scan_all(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

struct Lexer<'src> {
    src: &'src str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn char_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn bump_many(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    /// Length of the run of `ch` starting at the current position.
    fn run_len(&self, ch: char) -> usize {
        self.rest().chars().take_while(|&c| c == ch).count()
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.bump();
        }
    }

    /// True when the character after the upcoming arrowhead cannot continue
    /// an identifier. `A --o B` carries a circle head; `A --oak` is a plain
    /// line running into the identifier `oak`.
    fn head_terminates(&self) -> bool {
        match self.char_at(1) {
            Some(c) => !(c.is_alphanumeric() || c == '_'),
            None => true,
        }
    }

    fn next_token(&mut self) -> Token<'src> {
        self.skip_spaces();
        let start = self.pos;
        let line = self.line;
        let column = self.column;

        let kind = match self.peek() {
            None => TokenKind::Eof,
            Some('\n') => {
                self.bump();
                TokenKind::Newline
            }
            Some('%') if self.rest().starts_with("%%") => self.scan_comment(),
            Some('%') => {
                self.bump();
                TokenKind::Percent
            }
            Some('"') => self.scan_string(),
            Some('(') => {
                if self.rest().starts_with("(((") {
                    self.bump_many(3);
                    TokenKind::LDoubleCircle
                } else if self.rest().starts_with("((") {
                    self.bump_many(2);
                    TokenKind::LCircle
                } else if self.rest().starts_with("([") {
                    self.bump_many(2);
                    TokenKind::LStadium
                } else {
                    self.bump();
                    TokenKind::LParen
                }
            }
            Some(')') => {
                if self.rest().starts_with(")))") {
                    self.bump_many(3);
                    TokenKind::RDoubleCircle
                } else if self.rest().starts_with("))") {
                    self.bump_many(2);
                    TokenKind::RCircle
                } else {
                    self.bump();
                    TokenKind::RParen
                }
            }
            Some('[') => {
                if self.rest().starts_with("[[") {
                    self.bump_many(2);
                    TokenKind::LSubroutine
                } else if self.rest().starts_with("[/") {
                    self.bump_many(2);
                    TokenKind::LParallelogram
                } else if self.rest().starts_with("[\\") {
                    self.bump_many(2);
                    TokenKind::LTrapezoid
                } else {
                    self.bump();
                    TokenKind::LSquare
                }
            }
            Some(']') => {
                if self.rest().starts_with("]]") {
                    self.bump_many(2);
                    TokenKind::RSubroutine
                } else if self.rest().starts_with("])") {
                    self.bump_many(2);
                    TokenKind::RStadium
                } else {
                    self.bump();
                    TokenKind::RSquare
                }
            }
            Some('{') => {
                if self.rest().starts_with("{{") {
                    self.bump_many(2);
                    TokenKind::LHexagon
                } else {
                    self.bump();
                    TokenKind::LBrace
                }
            }
            Some('}') => {
                if self.rest().starts_with("}}") {
                    self.bump_many(2);
                    TokenKind::RHexagon
                } else {
                    self.bump();
                    TokenKind::RBrace
                }
            }
            Some('/') => {
                if self.rest().starts_with("/]") {
                    self.bump_many(2);
                    TokenKind::RParallelogram
                } else {
                    self.bump();
                    TokenKind::Slash
                }
            }
            Some('\\') => {
                if self.rest().starts_with("\\]") {
                    self.bump_many(2);
                    TokenKind::RTrapezoid
                } else {
                    self.bump();
                    TokenKind::Backslash
                }
            }
            Some('>') => {
                self.bump();
                TokenKind::AsymmetricOpen
            }
            Some('-') => self.scan_dash(),
            Some('=') => self.scan_equals(),
            Some('~') => self.scan_tilde(),
            Some('.') => self.scan_dots(),
            Some('<') => self.scan_langle(),
            Some('*') => self.scan_star(),
            Some('o') => self.scan_circle_link_or_word(),
            Some(c) if c.is_alphanumeric() || c == '_' => self.scan_word(),
            Some('|') => self.single(TokenKind::Pipe),
            Some(':') => self.single(TokenKind::Colon),
            Some(';') => self.single(TokenKind::Semicolon),
            Some(',') => self.single(TokenKind::Comma),
            Some('+') => self.single(TokenKind::Plus),
            Some('#') => self.single(TokenKind::Hash),
            Some('?') => self.single(TokenKind::Question),
            Some('!') => self.single(TokenKind::Bang),
            Some('&') => self.single(TokenKind::Amp),
            Some(_) => self.single(TokenKind::Unknown),
        };

        Token {
            kind,
            text: &self.src[start..self.pos],
            line,
            column,
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn scan_comment(&mut self) -> TokenKind {
        self.bump_many(2);
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        TokenKind::Comment
    }

    fn scan_string(&mut self) -> TokenKind {
        self.bump();
        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    self.bump();
                    break;
                }
                // Unterminated literal: stop at the line break so the rest
                // of the source still lexes.
                '\n' => break,
                _ => {
                    self.bump();
                }
            }
        }
        TokenKind::StringLit
    }

    fn scan_dash(&mut self) -> TokenKind {
        let dashes = self.run_len('-');
        if dashes >= 2 {
            self.bump_many(dashes);
            return match self.peek() {
                Some('>') => {
                    self.bump();
                    TokenKind::Arrow
                }
                Some('|') if self.char_at(1) == Some('>') => {
                    self.bump_many(2);
                    TokenKind::Triangle
                }
                Some('o') if self.head_terminates() => {
                    self.bump();
                    TokenKind::CircleArrow
                }
                Some('x') if self.head_terminates() => {
                    self.bump();
                    TokenKind::CrossArrow
                }
                _ => TokenKind::Line,
            };
        }

        // A dotted link is `-` `.`+ `-`+ with an optional head; anything
        // else starting with a lone dash is the minus punctuation.
        if self.char_at(1) == Some('.') {
            let mut i = 1;
            while self.char_at(i) == Some('.') {
                i += 1;
            }
            if self.char_at(i) == Some('-') {
                self.bump();
                let dots = self.run_len('.');
                self.bump_many(dots);
                let trailing = self.run_len('-');
                self.bump_many(trailing);
                return match self.peek() {
                    Some('>') => {
                        self.bump();
                        TokenKind::DottedArrow
                    }
                    Some('o') if self.head_terminates() => {
                        self.bump();
                        TokenKind::DottedCircleArrow
                    }
                    Some('x') if self.head_terminates() => {
                        self.bump();
                        TokenKind::DottedCrossArrow
                    }
                    _ => TokenKind::DottedLine,
                };
            }
        }

        self.bump();
        TokenKind::Minus
    }

    fn scan_equals(&mut self) -> TokenKind {
        let equals = self.run_len('=');
        if equals >= 2 {
            self.bump_many(equals);
            return match self.peek() {
                Some('>') => {
                    self.bump();
                    TokenKind::ThickArrow
                }
                Some('o') if self.head_terminates() => {
                    self.bump();
                    TokenKind::ThickCircleArrow
                }
                Some('x') if self.head_terminates() => {
                    self.bump();
                    TokenKind::ThickCrossArrow
                }
                _ => TokenKind::ThickLine,
            };
        }
        self.bump();
        TokenKind::Equals
    }

    fn scan_tilde(&mut self) -> TokenKind {
        let tildes = self.run_len('~');
        if tildes >= 3 {
            self.bump_many(tildes);
            return TokenKind::InvisibleLine;
        }
        self.bump();
        TokenKind::Tilde
    }

    fn scan_dots(&mut self) -> TokenKind {
        let dots = self.run_len('.');
        if dots >= 2 {
            self.bump_many(dots);
            return match self.peek() {
                Some('|') if self.char_at(1) == Some('>') => {
                    self.bump_many(2);
                    TokenKind::DotsTriangle
                }
                Some('>') => {
                    self.bump();
                    TokenKind::DotsArrow
                }
                _ => TokenKind::Dots,
            };
        }
        self.bump();
        TokenKind::Dot
    }

    fn scan_langle(&mut self) -> TokenKind {
        if self.char_at(1) == Some('|') {
            if self.char_at(2) == Some('-') && self.char_at(3) == Some('-') {
                self.bump_many(2);
                let dashes = self.run_len('-');
                self.bump_many(dashes);
                return TokenKind::BackTriangle;
            }
            if self.char_at(2) == Some('.') && self.char_at(3) == Some('.') {
                self.bump_many(2);
                let dots = self.run_len('.');
                self.bump_many(dots);
                return TokenKind::BackDotsTriangle;
            }
        }
        if self.char_at(1) == Some('-') && self.char_at(2) == Some('-') {
            self.bump();
            let dashes = self.run_len('-');
            self.bump_many(dashes);
            // `<-->` points both ways; the forward head wins.
            if self.peek() == Some('>') {
                self.bump();
                return TokenKind::Arrow;
            }
            return TokenKind::BackArrow;
        }
        if self.char_at(1) == Some('.') && self.char_at(2) == Some('.') {
            self.bump();
            let dots = self.run_len('.');
            self.bump_many(dots);
            return TokenKind::BackDotsArrow;
        }
        self.bump();
        TokenKind::Lt
    }

    fn scan_star(&mut self) -> TokenKind {
        if self.char_at(1) == Some('-') && self.char_at(2) == Some('-') {
            self.bump();
            let dashes = self.run_len('-');
            self.bump_many(dashes);
            return TokenKind::StarLink;
        }
        self.bump();
        TokenKind::Star
    }

    /// Leading `o--` is the aggregation glyph, unless the dash run ends in
    /// `>` — then `o` is an identifier and the dashes are a link, so
    /// `o-->p` still means "node o points at p".
    fn scan_circle_link_or_word(&mut self) -> TokenKind {
        if self.char_at(1) == Some('-') && self.char_at(2) == Some('-') {
            let mut i = 1;
            while self.char_at(i) == Some('-') {
                i += 1;
            }
            if self.char_at(i) != Some('>') {
                self.bump();
                let dashes = self.run_len('-');
                self.bump_many(dashes);
                return TokenKind::CircleLink;
            }
        }
        self.scan_word()
    }

    fn scan_word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        keyword_kind(&self.src[start..self.pos]).unwrap_or(TokenKind::Ident)
    }
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "flowchart" => TokenKind::Flowchart,
        "graph" => TokenKind::Graph,
        "subgraph" => TokenKind::Subgraph,
        "end" => TokenKind::End,
        "style" => TokenKind::Style,
        "classDef" => TokenKind::ClassDef,
        "direction" => TokenKind::DirectionKw,
        "classDiagram" => TokenKind::ClassDiagram,
        "class" => TokenKind::Class,
        "title" => TokenKind::Title,
        "TD" | "TB" | "BT" | "LR" | "RL" => TokenKind::DirectionValue,
        _ => return None,
    };
    Some(kind)
}
