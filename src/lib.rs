//! # Drop Four
//!
//! Two-player Connect Four in the terminal, with pieces that fall and bounce
//! into place. Built with Ratatui and Crossterm (mouse capture enabled).
//!
//! ## Modules
//!
//! - [`game`]: Core game logic: board, players, win detection, turn engine
//! - [`physics`]: Bouncing fall trajectories for dropped and cleared pieces
//! - [`ui`]: Terminal UI: pointer mapping, animations, game view
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod physics;
pub mod ui;
