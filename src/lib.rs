#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod kind;
pub mod layout;
pub mod orchestrator;
pub mod parser;
pub mod render;
pub mod scene;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use error::{Error, GraphDefect};
pub use ir::{Branch, Direction, Graph, NodeKind, RawEdge, RawNode};
pub use kind::{BranchSide, Port, PortId, Shape, Side};
pub use layout::{EdgeLayout, LayoutResult, NodeLayout, compute_layout};
pub use orchestrator::{ViewState, Visualizer, run_pipeline};
pub use parser::{CommandParser, ParseResponse, ParserClient};
pub use render::render_svg;
pub use scene::{Scene, SceneEdge, SceneNode, compose};
pub use theme::Theme;
