//! Terminal UI: mouse and keyboard input, the game view, and drop
//! animations driven by the engine's trajectories.

pub mod animation;
mod app;
pub mod game_view;
pub mod pointer;

pub use animation::RenderConfig;
pub use app::App;
