//! Merrow Core Types and Definitions
//!
//! This crate provides the foundational types for the Merrow Mermaid
//! parsing pipeline. It includes:
//!
//! - **Flowchart model**: nodes, edges, subgraphs and style declarations
//!   ([`flowchart`] module)
//! - **Class diagram model**: classes, members and relations
//!   ([`class_diagram`] module)
//! - **Diagnostics**: the [`error::ParseError`] record owned by each
//!   diagram's append-only error list
//!
//! Models are populated by the parsers in `merrow-parser` during a single
//! parse call and are plain value aggregates afterwards. Downstream layout
//! and rendering consume them read-only, in source order.

pub mod class_diagram;
pub mod error;
pub mod flowchart;
