//! Error adapter for converting SkyplanError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use skyplan::{GraphError, SkyplanError, identifier::Id};

/// Adapter for [`SkyplanError`].
///
/// Engine errors carry no source spans, so only a code and a help message
/// are attached.
pub struct ErrorAdapter<'a>(pub &'a SkyplanError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            SkyplanError::Io(_) => "skyplan::io",
            SkyplanError::Graph(GraphError::Document(_)) => "skyplan::document",
            SkyplanError::Graph(_) => "skyplan::graph",
            SkyplanError::Config(_) => "skyplan::config",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help: Box<dyn fmt::Display + 'a> = match &self.0 {
            SkyplanError::Io(_) => return None,
            SkyplanError::Graph(GraphError::Document(_)) => Box::new(
                "the input must be a diagram document with nodes, groups and edges arrays",
            ),
            SkyplanError::Graph(GraphError::InvalidParent { parent, .. }) => {
                Box::new(format!("declare a group with id '{parent}' or drop the parentId"))
            }
            SkyplanError::Graph(GraphError::ParentCycle { node, .. }) => {
                Box::new(format!("'{node}' must not enclose one of its own ancestors"))
            }
            SkyplanError::Graph(GraphError::DuplicateNode(id))
            | SkyplanError::Graph(GraphError::DuplicateEdge(id)) => Box::new(duplicate_help(*id)),
            SkyplanError::Graph(_) => return None,
            SkyplanError::Config(_) => {
                Box::new("see `skyplan --help` for accepted values and the config file search order")
            }
        };
        Some(help)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

fn duplicate_help(id: Id) -> String {
    format!("ids must be unique across the document; rename one of the '{id}' entries")
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Error(e) => e.help(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Converts a [`SkyplanError`] into the diagnostics to render.
pub fn to_reportables(err: &SkyplanError) -> Vec<Reportable<'_>> {
    vec![Reportable::Error(ErrorAdapter(err))]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(err: &SkyplanError) -> String {
        ErrorAdapter(err)
            .code()
            .map(|code| code.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_codes() {
        let io = SkyplanError::Io(std::io::Error::other("disk on fire"));
        let config = SkyplanError::Config("bad".to_string());
        let graph = SkyplanError::Graph(GraphError::NodeNotFound(Id::new("x")));

        assert_eq!(code_of(&io), "skyplan::io");
        assert_eq!(code_of(&config), "skyplan::config");
        assert_eq!(code_of(&graph), "skyplan::graph");
    }

    #[test]
    fn test_document_errors_get_help() {
        let parse = skyplan::diagram::DiagramGraph::from_json("{ not json")
            .expect_err("invalid document");
        let err = SkyplanError::from(parse);

        assert_eq!(code_of(&err), "skyplan::document");
        assert!(ErrorAdapter(&err).help().is_some());
    }

    #[test]
    fn test_to_reportables_renders() {
        let err = SkyplanError::Config("Unknown view mode 'x'".to_string());
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        let mut rendered = String::new();
        miette::GraphicalReportHandler::new()
            .render_report(&mut rendered, &reportables[0])
            .expect("render");
        assert!(rendered.contains("Unknown view mode"));
    }
}
