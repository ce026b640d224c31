use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ir::Direction;
use crate::kind::BranchSide;
use crate::theme::Theme;

/// Fixed node dimensions in pixels, matching the original visualizer.
pub const DEFAULT_NODE_WIDTH: f32 = 180.0;
pub const DEFAULT_NODE_HEIGHT: f32 = 60.0;
/// Gap between consecutive ranks along the flow axis.
pub const DEFAULT_RANK_SPACING: f32 = 90.0;
/// Gap between siblings within one rank.
pub const DEFAULT_NODE_SPACING: f32 = 60.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub node_width: f32,
    pub node_height: f32,
    pub rank_spacing: f32,
    pub node_spacing: f32,
    /// Cosmetic choice of which side a decision's `yes` branch leaves from.
    pub yes_side: BranchSide,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::TopToBottom,
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            rank_spacing: DEFAULT_RANK_SPACING,
            node_spacing: DEFAULT_NODE_SPACING,
            yes_side: BranchSide::Left,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub theme: Theme,
}

/// Loads a json5 config file; `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = json5::from_str(&contents)?;
    Ok(config)
}
