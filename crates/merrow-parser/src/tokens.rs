//! Token types shared by the flowchart and class diagram grammars.

use std::fmt;

/// Lexical category of a token.
///
/// Multi-character glyphs (shape delimiters, link arrows, class relation
/// arrows) are produced whole by the lexer, longest match first, so the
/// parsers never inspect lexeme substrings to classify them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Flowchart,
    Graph,
    Subgraph,
    End,
    Style,
    ClassDef,
    /// The word `direction` (subgraph direction override).
    DirectionKw,
    ClassDiagram,
    Class,
    Title,
    /// One of `TD`, `TB`, `BT`, `LR`, `RL`; the lexeme says which.
    DirectionValue,

    // Shape delimiters
    /// `[`
    LSquare,
    /// `]`
    RSquare,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `([`
    LStadium,
    /// `])`
    RStadium,
    /// `[[`
    LSubroutine,
    /// `]]`
    RSubroutine,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `{{`
    LHexagon,
    /// `}}`
    RHexagon,
    /// `((`
    LCircle,
    /// `))`
    RCircle,
    /// `(((`
    LDoubleCircle,
    /// `)))`
    RDoubleCircle,
    /// `>` opening an asymmetric node (closed by `]`)
    AsymmetricOpen,
    /// `[/`
    LParallelogram,
    /// `/]`
    RParallelogram,
    /// `[\`
    LTrapezoid,
    /// `\]`
    RTrapezoid,

    // Flowchart links
    /// `-->`
    Arrow,
    /// `---`
    Line,
    /// `-.->`
    DottedArrow,
    /// `-.-`
    DottedLine,
    /// `==>`
    ThickArrow,
    /// `===`
    ThickLine,
    /// `~~~`
    InvisibleLine,
    /// `--o`
    CircleArrow,
    /// `--x`
    CrossArrow,
    /// `-.-o`
    DottedCircleArrow,
    /// `-.-x`
    DottedCrossArrow,
    /// `==o`
    ThickCircleArrow,
    /// `==x`
    ThickCrossArrow,
    /// `<--`
    BackArrow,

    // Class relation glyphs
    /// `--|>`
    Triangle,
    /// `<|--`
    BackTriangle,
    /// `..|>`
    DotsTriangle,
    /// `<|..`
    BackDotsTriangle,
    /// `..>`
    DotsArrow,
    /// `<..`
    BackDotsArrow,
    /// `..`
    Dots,
    /// `*--`
    StarLink,
    /// `o--`
    CircleLink,

    // Punctuation
    Pipe,
    Colon,
    Semicolon,
    Comma,
    Plus,
    Minus,
    Hash,
    Tilde,
    Star,
    Slash,
    Backslash,
    Question,
    Bang,
    Percent,
    Dot,
    Lt,
    Equals,
    Amp,

    // Literals and trivia
    Ident,
    StringLit,
    Comment,
    Newline,
    Unknown,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Flowchart => "flowchart",
            TokenKind::Graph => "graph",
            TokenKind::Subgraph => "subgraph",
            TokenKind::End => "end",
            TokenKind::Style => "style",
            TokenKind::ClassDef => "classDef",
            TokenKind::DirectionKw => "direction",
            TokenKind::ClassDiagram => "classDiagram",
            TokenKind::Class => "class",
            TokenKind::Title => "title",
            TokenKind::DirectionValue => "direction keyword",

            TokenKind::LSquare => "[",
            TokenKind::RSquare => "]",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LStadium => "([",
            TokenKind::RStadium => "])",
            TokenKind::LSubroutine => "[[",
            TokenKind::RSubroutine => "]]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LHexagon => "{{",
            TokenKind::RHexagon => "}}",
            TokenKind::LCircle => "((",
            TokenKind::RCircle => "))",
            TokenKind::LDoubleCircle => "(((",
            TokenKind::RDoubleCircle => ")))",
            TokenKind::AsymmetricOpen => ">",
            TokenKind::LParallelogram => "[/",
            TokenKind::RParallelogram => "/]",
            TokenKind::LTrapezoid => "[\\",
            TokenKind::RTrapezoid => "\\]",

            TokenKind::Arrow => "-->",
            TokenKind::Line => "---",
            TokenKind::DottedArrow => "-.->",
            TokenKind::DottedLine => "-.-",
            TokenKind::ThickArrow => "==>",
            TokenKind::ThickLine => "===",
            TokenKind::InvisibleLine => "~~~",
            TokenKind::CircleArrow => "--o",
            TokenKind::CrossArrow => "--x",
            TokenKind::DottedCircleArrow => "-.-o",
            TokenKind::DottedCrossArrow => "-.-x",
            TokenKind::ThickCircleArrow => "==o",
            TokenKind::ThickCrossArrow => "==x",
            TokenKind::BackArrow => "<--",

            TokenKind::Triangle => "--|>",
            TokenKind::BackTriangle => "<|--",
            TokenKind::DotsTriangle => "..|>",
            TokenKind::BackDotsTriangle => "<|..",
            TokenKind::DotsArrow => "..>",
            TokenKind::BackDotsArrow => "<..",
            TokenKind::Dots => "..",
            TokenKind::StarLink => "*--",
            TokenKind::CircleLink => "o--",

            TokenKind::Pipe => "|",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Hash => "#",
            TokenKind::Tilde => "~",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Backslash => "\\",
            TokenKind::Question => "?",
            TokenKind::Bang => "!",
            TokenKind::Percent => "%",
            TokenKind::Dot => ".",
            TokenKind::Lt => "<",
            TokenKind::Equals => "=",
            TokenKind::Amp => "&",

            TokenKind::Ident => "identifier",
            TokenKind::StringLit => "string",
            TokenKind::Comment => "comment",
            TokenKind::Newline => "newline",
            TokenKind::Unknown => "unknown character",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

/// A lexical unit: category, raw lexeme and 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub line: usize,
    pub column: usize,
}

impl<'src> Token<'src> {
    /// Interior of a string literal token, quotes stripped.
    pub fn string_value(&self) -> &'src str {
        let text = self.text.strip_prefix('"').unwrap_or(self.text);
        text.strip_suffix('"').unwrap_or(text)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

/// Tokens the parsers accept wherever a name is expected. Keywords double
/// as identifiers in name position; only structural keywords are excluded
/// so statement dispatch stays unambiguous.
pub(crate) fn is_identifier_like(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::DirectionValue
            | TokenKind::Flowchart
            | TokenKind::Graph
            | TokenKind::ClassDiagram
            | TokenKind::Class
            | TokenKind::Title
    )
}
