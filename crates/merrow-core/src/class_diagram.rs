//! Class diagram object model.
//!
//! Built incrementally by the class diagram parser. Classes are registered
//! under their name the first time the name is mentioned, whether as a
//! `class` declaration, a member owner, or a relation endpoint; relations
//! reference their endpoints by class name.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ParseError;

/// Member visibility marker (`+`, `-`, `#`, `~`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Visibility {
    /// `+`, and the default when no marker is present.
    #[default]
    Public,
    /// `-`
    Private,
    /// `#`
    Protected,
    /// `~`
    Package,
}

/// Semantic kind of a class relation, determined by its arrow glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelationType {
    Inheritance,
    Composition,
    Aggregation,
    Realization,
    Dependency,
    Association,
}

/// A field or method of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MermaidClassMember {
    pub name: String,
    pub is_method: bool,
    pub visibility: Visibility,
    /// Declared or annotated type; `None` for name-only members.
    pub type_name: Option<String>,
}

/// A class and its members, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MermaidClass {
    pub name: String,
    pub members: Vec<MermaidClassMember>,
    /// 1-based line of the first mention.
    pub source_line: usize,
}

/// A typed connection between two registered classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MermaidRelation {
    pub from: String,
    pub to: String,
    pub relation_type: RelationType,
    pub label: Option<String>,
}

/// A parsed class diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MermaidClassDiagram {
    pub title: Option<String>,
    /// Classes keyed by name, in first-mention order.
    pub classes: IndexMap<String, MermaidClass>,
    pub relations: Vec<MermaidRelation>,
    pub errors: Vec<ParseError>,
}

impl MermaidClassDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the class registered under `name`, creating an empty class
    /// on first mention.
    pub fn get_or_create_class(&mut self, name: &str, source_line: usize) -> &mut MermaidClass {
        self.classes.entry(name.to_string()).or_insert_with(|| MermaidClass {
            name: name.to_string(),
            members: Vec::new(),
            source_line,
        })
    }

    pub fn class(&self, name: &str) -> Option<&MermaidClass> {
        self.classes.get(name)
    }

    pub fn add_relation(&mut self, relation: MermaidRelation) {
        self.relations.push(relation);
    }

    pub fn push_error(&mut self, error: ParseError) {
        self.errors.push(error);
    }
}
