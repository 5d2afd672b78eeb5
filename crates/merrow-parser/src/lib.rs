//! Merrow Parser
//!
//! Lexing and recursive-descent parsing for two Mermaid diagram grammars,
//! sharing one tokenizer and one error model:
//!
//! - [`flowchart::parse`] — `flowchart`/`graph` sources into a
//!   [`merrow_core::flowchart::MermaidFlowchart`]
//! - [`class_diagram::parse`] — `classDiagram` sources into a
//!   [`merrow_core::class_diagram::MermaidClassDiagram`]
//!
//! Both entry points are total: they never return an error to the caller.
//! Each top-level statement is parsed inside a local failure boundary; a
//! malformed statement becomes a [`merrow_core::error::ParseError`] on the
//! returned diagram and the parser resynchronizes at the next statement
//! boundary, so a single typo never blanks the whole diagram.
//!
//! The token buffer is materialized up front by [`lexer::scan_all`] and
//! walked with a single integer cursor; lookahead is implemented by
//! snapshotting and restoring the cursor position, never by mutating
//! tokens. Each parse call builds its own one-shot parser, so concurrent
//! parses of independent sources need no coordination.

pub mod class_diagram;
mod cursor;
mod error;
pub mod flowchart;
pub mod lexer;
pub mod tokens;

pub use class_diagram::parse as parse_class_diagram;
pub use flowchart::parse as parse_flowchart;

#[cfg(test)]
mod parser_tests;
