//! Scene Controller plus the configuration-driven scene pipeline.
//!
//! Each scene is a [`SceneConfig`] value. [`resolve_scene`] turns the loaded
//! tables into datasets and [`render_scene`] draws them; the
//! [`SceneController`] decides which scene is live and which loads are stale.

mod config;
mod controller;
mod dashboard;
mod pipeline;
mod story;

pub use config::{
    AxisRule, CalloutSpec, ChartSceneConfig, DashboardConfig, DatasetSpec, FieldRef,
    LeaderboardConfig, ReferenceSpec, SceneConfig, SceneKind, SeriesSpec, TooltipLine, XDomain,
};
pub use controller::{LoadTicket, SceneController, SceneTransition};
pub use dashboard::{
    DashboardData, DashboardSelect, DashboardState, DashboardView, PLAYER_TABLE_GROUP,
    TEAM_CHART_GROUP, TEAM_TABLE_GROUP,
};
pub use pipeline::{
    ChartTooltips, NO_DATA_AVAILABLE, ResolvedChart, ResolvedScene, SceneContent, SceneLayout,
    SceneView, format_stat, render_chart, render_scene, resolve_scene, unavailable_scene,
};
pub use story::{
    AMBER, GREEN, LEAGUE_GRAY, PRIMARY_BLUE, ROCKETS_RED, WARRIORS_BLUE, story, story_with,
};
