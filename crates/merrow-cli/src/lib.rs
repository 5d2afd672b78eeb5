//! CLI logic for the Merrow diagram parser.
//!
//! Reads a Mermaid source file, runs the selected grammar over it, and
//! prints either a one-line summary or the parsed model as JSON. Parse
//! diagnostics are not failures here — they come back in the [`Report`]
//! and the binary decides the exit status.

mod args;

pub use args::{Args, Grammar};

use std::fs;
use std::io;

use log::info;
use thiserror::Error;

use merrow_core::error::ParseError;

/// Errors the CLI can fail with before or outside of parsing.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize model: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outcome of a run: the rendered output plus the diagnostics the parse
/// produced.
#[derive(Debug)]
pub struct Report {
    pub rendered: String,
    pub errors: Vec<ParseError>,
}

/// Run the Merrow CLI application
///
/// Parses the input file with the selected grammar and renders the result.
///
/// # Errors
///
/// Returns [`CliError`] for file I/O and serialization failures. Malformed
/// diagram source is not an error at this level; see [`Report::errors`].
pub fn run(args: &Args) -> Result<Report, CliError> {
    info!(input_path = args.input; "parsing diagram source");

    let source = fs::read_to_string(&args.input).map_err(|source| CliError::Io {
        path: args.input.clone(),
        source,
    })?;

    let (rendered, errors) = match args.grammar {
        Grammar::Flowchart => {
            let diagram = merrow_parser::flowchart::parse(&source);
            let rendered = if args.json {
                serde_json::to_string_pretty(&diagram)?
            } else {
                format!(
                    "flowchart: {} nodes, {} edges, {} subgraphs",
                    diagram.nodes.len(),
                    diagram.edges.len(),
                    diagram.subgraphs.len()
                )
            };
            (rendered, diagram.errors)
        }
        Grammar::Class => {
            let diagram = merrow_parser::class_diagram::parse(&source);
            let rendered = if args.json {
                serde_json::to_string_pretty(&diagram)?
            } else {
                format!(
                    "class diagram: {} classes, {} relations",
                    diagram.classes.len(),
                    diagram.relations.len()
                )
            };
            (rendered, diagram.errors)
        }
    };

    let error_count = errors.len();
    info!(error_count; "parse finished");

    Ok(Report { rendered, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn args_for(path: &str, grammar: Grammar) -> Args {
        Args {
            input: path.to_string(),
            grammar,
            json: false,
            log_level: "off".to_string(),
        }
    }

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        file.write_all(contents.as_bytes()).expect("write fixture");
        file
    }

    #[test]
    fn test_run_flowchart_fixture() {
        let file = write_fixture("flowchart TD\nA[Start] --> B[End]\n");
        let report = run(&args_for(file.path().to_str().unwrap(), Grammar::Flowchart)).unwrap();
        assert!(report.errors.is_empty());
        assert!(report.rendered.contains("2 nodes"));
        assert!(report.rendered.contains("1 edges"));
    }

    #[test]
    fn test_run_reports_parse_errors() {
        let file = write_fixture("flowchart TD\nA[Broken\n");
        let report = run(&args_for(file.path().to_str().unwrap(), Grammar::Flowchart)).unwrap();
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_run_class_json_output() {
        let file = write_fixture("classDiagram\nDog --|> Animal\n");
        let mut args = args_for(file.path().to_str().unwrap(), Grammar::Class);
        args.json = true;
        let report = run(&args).unwrap();
        assert!(report.errors.is_empty());
        assert!(report.rendered.contains("\"Inheritance\""));
    }

    #[test]
    fn test_run_missing_file_is_io_error() {
        let result = run(&args_for("/nonexistent/diagram.mmd", Grammar::Flowchart));
        assert!(matches!(result, Err(CliError::Io { .. })));
    }
}
