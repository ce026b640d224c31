//! Drives one visualization request end to end: parser call, graph build,
//! layout, scene composition. Owns the only mutable state in the system and
//! replaces it atomically, so a failed request never disturbs what is
//! already displayed.

use tracing::{debug, info};

use crate::config::LayoutConfig;
use crate::error::Error;
use crate::ir::Graph;
use crate::layout::{LayoutResult, compute_layout};
use crate::parser::{ParseResponse, ParserClient};
use crate::scene::{Scene, compose};
use crate::theme::Theme;

/// Everything the display needs for the current graph. Lives exactly as
/// long as the next successful request takes to replace it.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub graph: Graph,
    pub layout: LayoutResult,
    pub scene: Scene,
    pub ast: String,
}

/// Runs the full pipeline on one parser response. Used by [`Visualizer`]
/// and by callers that already hold a captured response.
pub fn run_pipeline(
    response: ParseResponse,
    config: &LayoutConfig,
    theme: &Theme,
) -> Result<ViewState, Error> {
    let graph = Graph::build(&response.nodes, &response.edges)?;
    let layout = compute_layout(&graph, config)?;
    let scene = compose(&layout, theme);
    Ok(ViewState {
        graph,
        layout,
        scene,
        ast: response.ast,
    })
}

pub struct Visualizer<P> {
    parser: P,
    config: LayoutConfig,
    theme: Theme,
    state: Option<ViewState>,
}

impl<P: ParserClient> Visualizer<P> {
    pub fn new(parser: P, config: LayoutConfig, theme: Theme) -> Self {
        Self {
            parser,
            config,
            theme,
            state: None,
        }
    }

    /// One round trip: source text in, scene out. The current state is
    /// swapped only after the whole pipeline succeeds; any failure leaves
    /// the previous scene untouched.
    pub fn visualize(&mut self, code: &str) -> Result<&Scene, Error> {
        let response = self.parser.parse(code)?;
        self.apply(response)
    }

    /// Same pipeline, skipping the parser call. Lets callers replay a
    /// captured response.
    pub fn visualize_response(&mut self, response: ParseResponse) -> Result<&Scene, Error> {
        self.apply(response)
    }

    fn apply(&mut self, response: ParseResponse) -> Result<&Scene, Error> {
        debug!(
            nodes = response.nodes.len(),
            edges = response.edges.len(),
            "pipeline start"
        );
        let state = run_pipeline(response, &self.config, &self.theme)?;
        info!(
            nodes = state.scene.nodes.len(),
            width = state.scene.width,
            height = state.scene.height,
            "scene replaced"
        );
        Ok(&self.state.insert(state).scene)
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.state.as_ref().map(|state| &state.scene)
    }

    pub fn layout(&self) -> Option<&LayoutResult> {
        self.state.as_ref().map(|state| &state.layout)
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.state.as_ref().map(|state| &state.graph)
    }

    /// Raw AST dump from the parser, untouched, for side-by-side display.
    pub fn ast_text(&self) -> Option<&str> {
        self.state.as_ref().map(|state| state.ast.as_str())
    }

    /// Consumes the visualizer, yielding the current state if one exists.
    pub fn into_state(self) -> Option<ViewState> {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{RawEdge, RawNode};

    struct FixedParser(ParseResponse);

    impl ParserClient for FixedParser {
        fn parse(&self, _code: &str) -> Result<ParseResponse, Error> {
            Ok(self.0.clone())
        }
    }

    struct DownParser;

    impl ParserClient for DownParser {
        fn parse(&self, _code: &str) -> Result<ParseResponse, Error> {
            Err(Error::ParserUnavailable(std::io::Error::other(
                "connection refused",
            )))
        }
    }

    fn linear_response() -> ParseResponse {
        ParseResponse {
            nodes: vec![
                RawNode {
                    id: "n1".into(),
                    kind: "assignment".into(),
                    label: "x = 1".into(),
                },
                RawNode {
                    id: "n2".into(),
                    kind: "io".into(),
                    label: "print(x)".into(),
                },
            ],
            edges: vec![RawEdge {
                source: "n1".into(),
                target: "n2".into(),
                branch_id: None,
                label: None,
            }],
            ast: "Module(body=[Assign, Expr])".into(),
        }
    }

    #[test]
    fn visualize_replaces_state_and_keeps_ast() {
        let mut viz = Visualizer::new(
            FixedParser(linear_response()),
            LayoutConfig::default(),
            Theme::default(),
        );
        assert!(viz.scene().is_none());
        let scene = viz.visualize("x = 1\nprint(x)").unwrap();
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(viz.ast_text(), Some("Module(body=[Assign, Expr])"));
        assert_eq!(viz.graph().unwrap().nodes.len(), 2);
    }

    #[test]
    fn failed_parse_leaves_previous_scene_untouched() {
        let mut viz = Visualizer::new(
            FixedParser(linear_response()),
            LayoutConfig::default(),
            Theme::default(),
        );
        viz.visualize("x = 1").unwrap();

        // second request comes back malformed: dangling edge
        let mut bad = linear_response();
        bad.edges[0].target = "ghost".into();
        let err = viz.visualize_response(bad).unwrap_err();
        assert!(matches!(err, Error::MalformedGraph(_)));

        // the first scene is still on display
        let scene = viz.scene().unwrap();
        assert_eq!(scene.nodes.len(), 2);
        assert!(scene.nodes.iter().any(|node| node.id == "n2"));
    }

    #[test]
    fn transport_failure_surfaces_without_state() {
        let mut viz = Visualizer::new(DownParser, LayoutConfig::default(), Theme::default());
        let err = viz.visualize("x = 1").unwrap_err();
        assert!(matches!(err, Error::ParserUnavailable(_)));
        assert!(viz.scene().is_none());
    }
}
