//! Cross-cutting tests for both grammars.

use proptest::prelude::*;

use merrow_core::class_diagram::{RelationType, Visibility};
use merrow_core::flowchart::{ArrowHead, Direction, EdgeStyle, ShapeKind};

use crate::tokens::TokenKind;
use crate::{class_diagram, flowchart, lexer};

// ---------------------------------------------------------------------
// Flowchart grammar
// ---------------------------------------------------------------------

#[test]
fn test_basic_flowchart() {
    let diagram = flowchart::parse("flowchart TD\nA[Start] --> B[End]");

    assert!(diagram.errors.is_empty(), "errors: {:?}", diagram.errors);
    assert_eq!(diagram.direction, Direction::TopDown);
    assert_eq!(diagram.nodes.len(), 2);

    let a = diagram.node("A").unwrap();
    assert_eq!(a.text, "Start");
    assert_eq!(a.shape, ShapeKind::Rectangle);
    let b = diagram.node("B").unwrap();
    assert_eq!(b.text, "End");
    assert_eq!(b.shape, ShapeKind::Rectangle);

    assert_eq!(diagram.edges.len(), 1);
    let edge = &diagram.edges[0];
    assert_eq!(edge.from, "A");
    assert_eq!(edge.to, "B");
    assert_eq!(edge.style, EdgeStyle::Solid);
    assert_eq!(edge.arrowhead, ArrowHead::Normal);
    assert_eq!(edge.label, None);
    assert_eq!(edge.min_length, 1);
}

#[test]
fn test_graph_header_and_semicolons() {
    let diagram = flowchart::parse("graph LR; A-->B; B-->C;");
    assert!(diagram.errors.is_empty());
    assert_eq!(diagram.direction, Direction::LeftRight);
    assert_eq!(diagram.edges.len(), 2);
}

#[test]
fn test_edge_labels_keep_source_order() {
    let diagram = flowchart::parse("flowchart LR\nA -->|Yes| B\nA -->|No| C");

    assert!(diagram.errors.is_empty());
    let ids: Vec<&str> = diagram.nodes.keys().map(String::as_str).collect();
    assert_eq!(ids, ["A", "B", "C"]);

    assert_eq!(diagram.edges.len(), 2);
    assert_eq!(diagram.edges[0].from, "A");
    assert_eq!(diagram.edges[0].to, "B");
    assert_eq!(diagram.edges[0].label.as_deref(), Some("Yes"));
    assert_eq!(diagram.edges[1].to, "C");
    assert_eq!(diagram.edges[1].label.as_deref(), Some("No"));
}

#[test]
fn test_edge_chain() {
    let diagram = flowchart::parse("flowchart TD\nA --> B --> C");
    assert_eq!(diagram.edges.len(), 2);
    assert_eq!((diagram.edges[0].from.as_str(), diagram.edges[0].to.as_str()), ("A", "B"));
    assert_eq!((diagram.edges[1].from.as_str(), diagram.edges[1].to.as_str()), ("B", "C"));
}

#[test]
fn test_all_eleven_shapes() {
    let source = "flowchart TD\n\
                  a[Rect]\n\
                  b(Round)\n\
                  c([Stadium])\n\
                  d[[Sub]]\n\
                  e{Rhombus}\n\
                  f{{Hex}}\n\
                  g((Circle))\n\
                  h(((Double)))\n\
                  i>Asym]\n\
                  j[/Para/]\n\
                  k[\\Trap\\]";
    let diagram = flowchart::parse(source);
    assert!(diagram.errors.is_empty(), "errors: {:?}", diagram.errors);

    let expected = [
        ("a", ShapeKind::Rectangle),
        ("b", ShapeKind::Rounded),
        ("c", ShapeKind::Stadium),
        ("d", ShapeKind::Subroutine),
        ("e", ShapeKind::Rhombus),
        ("f", ShapeKind::Hexagon),
        ("g", ShapeKind::Circle),
        ("h", ShapeKind::DoubleCircle),
        ("i", ShapeKind::Asymmetric),
        ("j", ShapeKind::Parallelogram),
        ("k", ShapeKind::Trapezoid),
    ];
    for (id, shape) in expected {
        assert_eq!(diagram.node(id).unwrap().shape, shape, "node {id}");
    }
}

#[test]
fn test_node_text_space_heuristic() {
    let diagram = flowchart::parse("flowchart TD\nA[Is it good?]\nB[Wait, what!]");
    assert_eq!(diagram.node("A").unwrap().text, "Is it good?");
    assert_eq!(diagram.node("B").unwrap().text, "Wait, what!");
}

#[test]
fn test_pipes_inside_node_text_are_dropped() {
    let diagram = flowchart::parse("flowchart TD\nA[left|right]");
    assert_eq!(diagram.node("A").unwrap().text, "left right");
}

#[test]
fn test_bare_reference_preserves_shaped_definition() {
    let diagram = flowchart::parse("flowchart TD\nA{Choice}\nA --> B");
    let a = diagram.node("A").unwrap();
    assert_eq!(a.shape, ShapeKind::Rhombus);
    assert_eq!(a.text, "Choice");
}

#[test]
fn test_missing_closer_is_recoverable() {
    let diagram = flowchart::parse("flowchart TD\nA[Broken\nB --> C");

    assert_eq!(diagram.errors.len(), 1);
    assert!(diagram.errors[0].message.contains("']'"), "{}", diagram.errors[0].message);
    assert_eq!(diagram.errors[0].line, 2);

    // The statement after the newline still parsed.
    assert!(diagram.node("B").is_some());
    assert!(diagram.node("C").is_some());
    assert_eq!(diagram.edges.len(), 1);
}

#[test]
fn test_missing_header_is_recorded_and_parsing_continues() {
    let diagram = flowchart::parse("A --> B");
    assert_eq!(diagram.errors.len(), 1);
    assert!(diagram.errors[0].message.contains("flowchart"));
    assert_eq!(diagram.edges.len(), 1);
}

#[test]
fn test_empty_input_reports_error_at_origin() {
    let diagram = flowchart::parse("");
    assert_eq!(diagram.errors.len(), 1);
    assert_eq!((diagram.errors[0].line, diagram.errors[0].column), (1, 1));
    assert!(diagram.nodes.is_empty());
}

#[test]
fn test_link_styles_and_heads() {
    let source = "flowchart TD\n\
                  A --> B\n\
                  A --- C\n\
                  A -.-> D\n\
                  A ==> E\n\
                  A ~~~ F\n\
                  A --o G\n\
                  A --x H";
    let diagram = flowchart::parse(source);
    assert!(diagram.errors.is_empty());

    let expected = [
        (EdgeStyle::Solid, ArrowHead::Normal),
        (EdgeStyle::Solid, ArrowHead::Open),
        (EdgeStyle::Dotted, ArrowHead::Normal),
        (EdgeStyle::Thick, ArrowHead::Normal),
        (EdgeStyle::Invisible, ArrowHead::None),
        (EdgeStyle::Solid, ArrowHead::Circle),
        (EdgeStyle::Solid, ArrowHead::Cross),
    ];
    assert_eq!(diagram.edges.len(), expected.len());
    for (edge, (style, head)) in diagram.edges.iter().zip(expected) {
        assert_eq!(edge.style, style);
        assert_eq!(edge.arrowhead, head);
    }
}

#[test]
fn test_longer_glyphs_raise_min_length() {
    let diagram = flowchart::parse("flowchart TD\nA ---> B\nC -..-> D");
    assert_eq!(diagram.edges[0].min_length, 2);
    assert_eq!(diagram.edges[1].min_length, 2);
}

#[test]
fn test_back_arrow_reverses_endpoints() {
    let diagram = flowchart::parse("flowchart TD\nA <-- B");
    assert_eq!(diagram.edges.len(), 1);
    assert_eq!(diagram.edges[0].from, "B");
    assert_eq!(diagram.edges[0].to, "A");
    assert_eq!(diagram.edges[0].arrowhead, ArrowHead::Normal);
}

#[test]
fn test_subgraph_membership_and_title() {
    let source = "flowchart TD\n\
                  A --> B\n\
                  subgraph grp [Group Title]\n\
                  A\n\
                  B\n\
                  end";
    let diagram = flowchart::parse(source);
    assert!(diagram.errors.is_empty());
    assert_eq!(diagram.subgraphs.len(), 1);

    let sg = &diagram.subgraphs[0];
    assert_eq!(sg.id, "grp");
    assert_eq!(sg.title.as_deref(), Some("Group Title"));
    let members: Vec<&str> = sg.nodes.iter().map(String::as_str).collect();
    assert_eq!(members, ["A", "B"]);
}

#[test]
fn test_subgraph_ignores_unregistered_names() {
    let diagram = flowchart::parse("flowchart TD\nA\nsubgraph s\nA\nZ\nend");
    let sg = &diagram.subgraphs[0];
    assert!(sg.nodes.contains("A"));
    assert!(!sg.nodes.contains("Z"));
}

#[test]
fn test_subgraph_direction_override() {
    let source = "flowchart LR\nX --> Y\nsubgraph s\ndirection BT\nX\nend";
    let diagram = flowchart::parse(source);
    let sg = &diagram.subgraphs[0];
    assert_eq!(sg.direction, Some(Direction::BottomUp));
    assert!(sg.has_custom_direction);
}

#[test]
fn test_nested_subgraphs() {
    let source = "flowchart TD\nsubgraph outer\nsubgraph inner\nend\nend";
    let diagram = flowchart::parse(source);
    assert!(diagram.errors.is_empty());
    assert_eq!(diagram.subgraphs.len(), 1);
    assert_eq!(diagram.subgraphs[0].id, "outer");
    assert_eq!(diagram.subgraphs[0].subgraphs.len(), 1);
    assert_eq!(diagram.subgraphs[0].subgraphs[0].id, "inner");
}

#[test]
fn test_missing_end_is_recoverable() {
    let diagram = flowchart::parse("flowchart TD\nsubgraph s\nA");
    assert_eq!(diagram.errors.len(), 1);
    assert!(diagram.errors[0].message.contains("'end'"));
}

#[test]
fn test_class_def_records_name_and_style_is_shallow() {
    let diagram = flowchart::parse("flowchart TD\nclassDef hot fill:#f00\nstyle A fill:#00f");
    assert!(diagram.errors.is_empty());
    assert_eq!(diagram.styles.len(), 1);
    assert_eq!(diagram.styles[0].class_name, "hot");
}

#[test]
fn test_comments_are_skipped() {
    let diagram = flowchart::parse("flowchart TD\n%% a note\nA --> B");
    assert!(diagram.errors.is_empty());
    assert_eq!(diagram.edges.len(), 1);
}

#[test]
fn test_flowchart_idempotence() {
    let source = "flowchart LR\nA[Start] -->|go| B{Choice}\nsubgraph s\nA\nend";
    assert_eq!(flowchart::parse(source), flowchart::parse(source));
}

// ---------------------------------------------------------------------
// Class diagram grammar
// ---------------------------------------------------------------------

#[test]
fn test_class_body_members() {
    let diagram = class_diagram::parse("classDiagram\nclass Animal {\n+name: String\n+speak()\n}");
    assert!(diagram.errors.is_empty(), "errors: {:?}", diagram.errors);

    let animal = diagram.class("Animal").unwrap();
    assert_eq!(animal.members.len(), 2);

    let name = &animal.members[0];
    assert_eq!(name.name, "name");
    assert_eq!(name.visibility, Visibility::Public);
    assert!(!name.is_method);
    assert_eq!(name.type_name.as_deref(), Some("String"));

    let speak = &animal.members[1];
    assert_eq!(speak.name, "speak");
    assert!(speak.is_method);
}

#[test]
fn test_single_line_class_body() {
    let diagram = class_diagram::parse("classDiagram\nclass Animal { +name: String +speak() }");
    let animal = diagram.class("Animal").unwrap();
    assert_eq!(animal.members.len(), 2);
    assert_eq!(animal.members[0].type_name.as_deref(), Some("String"));
    assert!(animal.members[1].is_method);
}

#[test]
fn test_inheritance_relation() {
    for source in ["classDiagram\nDog --|> Animal", "classDiagram\nDog <|-- Animal"] {
        let diagram = class_diagram::parse(source);
        assert!(diagram.errors.is_empty());
        assert_eq!(diagram.relations.len(), 1);
        let relation = &diagram.relations[0];
        assert_eq!(relation.relation_type, RelationType::Inheritance);
        assert_eq!(relation.from, "Dog");
        assert_eq!(relation.to, "Animal");
        assert!(diagram.class("Dog").is_some());
        assert!(diagram.class("Animal").is_some());
    }
}

#[test]
fn test_relation_glyph_classification() {
    let cases = [
        ("Car *-- Engine", RelationType::Composition),
        ("Pond o-- Duck", RelationType::Aggregation),
        ("Duck --o Pond", RelationType::Aggregation),
        ("Shape ..|> Drawable", RelationType::Realization),
        ("App ..> Logger", RelationType::Dependency),
        ("A -- B", RelationType::Association),
        ("A --> B", RelationType::Association),
    ];
    for (line, expected) in cases {
        let diagram = class_diagram::parse(&format!("classDiagram\n{line}"));
        assert_eq!(diagram.relations.len(), 1, "line: {line}");
        assert_eq!(diagram.relations[0].relation_type, expected, "line: {line}");
    }
}

#[test]
fn test_relation_label() {
    let diagram = class_diagram::parse("classDiagram\nDog --> Owner : walks with");
    assert_eq!(diagram.relations[0].label.as_deref(), Some("walks with"));
}

#[test]
fn test_title_statement() {
    let diagram = class_diagram::parse("classDiagram\ntitle Pet Hierarchy\nclass Dog");
    assert_eq!(diagram.title.as_deref(), Some("Pet Hierarchy"));
    assert!(diagram.class("Dog").is_some());
}

#[test]
fn test_visibility_markers() {
    let diagram =
        class_diagram::parse("classDiagram\nclass C {\n-secret\n#guarded\n~shared\nplain\n}");
    let class = diagram.class("C").unwrap();
    let vis: Vec<Visibility> = class.members.iter().map(|m| m.visibility).collect();
    assert_eq!(
        vis,
        [
            Visibility::Private,
            Visibility::Protected,
            Visibility::Package,
            Visibility::Public,
        ]
    );
}

#[test]
fn test_minus_rollback_skips_stray_tokens() {
    // A lone `-` and a stray arrow inside a body are not members.
    let diagram = class_diagram::parse("classDiagram\nclass C {\n-\n-->\n-ok\n}");
    assert!(diagram.errors.is_empty(), "errors: {:?}", diagram.errors);
    let class = diagram.class("C").unwrap();
    assert_eq!(class.members.len(), 1);
    assert_eq!(class.members[0].name, "ok");
    assert_eq!(class.members[0].visibility, Visibility::Private);
}

#[test]
fn test_type_then_name_member() {
    let diagram = class_diagram::parse("classDiagram\nclass C {\n+String name\n}");
    let member = &diagram.class("C").unwrap().members[0];
    assert_eq!(member.name, "name");
    assert_eq!(member.type_name.as_deref(), Some("String"));
}

#[test]
fn test_method_parameters_are_skipped() {
    let diagram = class_diagram::parse("classDiagram\nclass C {\n+add(int a, int b)\n}");
    let member = &diagram.class("C").unwrap().members[0];
    assert_eq!(member.name, "add");
    assert!(member.is_method);
    assert_eq!(member.type_name, None);
}

#[test]
fn test_trailing_annotation_sets_type() {
    let diagram = class_diagram::parse("classDiagram\nclass C {\n+speak() : void\n}");
    let member = &diagram.class("C").unwrap().members[0];
    assert!(member.is_method);
    assert_eq!(member.type_name.as_deref(), Some("void"));
}

#[test]
fn test_paren_mid_annotation_reclassifies_as_method() {
    let diagram = class_diagram::parse("classDiagram\nclass C {\n+calc: int (x)\n}");
    let member = &diagram.class("C").unwrap().members[0];
    assert_eq!(member.name, "calc");
    assert!(member.is_method);
    assert_eq!(member.type_name, None);
}

#[test]
fn test_colon_member_form() {
    let diagram = class_diagram::parse("classDiagram\nAnimal : +int age");
    let animal = diagram.class("Animal").unwrap();
    assert_eq!(animal.members.len(), 1);
    let member = &animal.members[0];
    assert_eq!(member.name, "age");
    assert_eq!(member.type_name.as_deref(), Some("int"));
    assert_eq!(member.visibility, Visibility::Public);
}

#[test]
fn test_bare_class_reference() {
    let diagram = class_diagram::parse("classDiagram\nAnimal");
    assert!(diagram.class("Animal").is_some());
    assert!(diagram.relations.is_empty());
}

#[test]
fn test_missing_relation_target_is_recoverable() {
    let diagram = class_diagram::parse("classDiagram\nDog -->\nCat --|> Animal");
    assert_eq!(diagram.errors.len(), 1);
    assert!(diagram.class("Dog").is_some());
    // Recovery resumed in time for the next statement.
    assert_eq!(diagram.relations.len(), 1);
    assert_eq!(diagram.relations[0].from, "Cat");
}

#[test]
fn test_missing_class_name_resynchronizes_at_keyword() {
    let diagram = class_diagram::parse("classDiagram\nclass {\nclass Dog");
    assert_eq!(diagram.errors.len(), 1);
    assert!(diagram.class("Dog").is_some());
}

#[test]
fn test_missing_class_header() {
    let diagram = class_diagram::parse("Dog --|> Animal");
    assert_eq!(diagram.errors.len(), 1);
    assert!(diagram.errors[0].message.contains("classDiagram"));
    assert_eq!(diagram.relations.len(), 1);
}

#[test]
fn test_class_idempotence() {
    let source = "classDiagram\ntitle T\nclass A {\n+x: int\n}\nA <|-- B : kind";
    assert_eq!(class_diagram::parse(source), class_diagram::parse(source));
}

// ---------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_flowchart_never_panics_and_edges_resolve(source in any::<String>()) {
        let diagram = flowchart::parse(&source);
        for edge in &diagram.edges {
            prop_assert!(diagram.nodes.contains_key(&edge.from));
            prop_assert!(diagram.nodes.contains_key(&edge.to));
        }
    }

    #[test]
    fn prop_class_diagram_never_panics_and_relations_resolve(source in any::<String>()) {
        let diagram = class_diagram::parse(&source);
        for relation in &diagram.relations {
            prop_assert!(diagram.classes.contains_key(&relation.from));
            prop_assert!(diagram.classes.contains_key(&relation.to));
        }
    }

    #[test]
    fn prop_lexer_is_total(source in any::<String>()) {
        let tokens = lexer::scan_all(&source);
        let eof_count = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eof_count, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn prop_reparse_is_idempotent(source in any::<String>()) {
        prop_assert_eq!(flowchart::parse(&source), flowchart::parse(&source));
    }
}
