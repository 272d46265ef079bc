//! UI rendering module for the Demoras CLI
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components.

pub mod gates;
pub mod help_overlay;
pub mod overview;
pub mod routes;
pub mod widgets;

pub use gates::render as render_gates;
pub use help_overlay::render as render_help_overlay;
pub use overview::render as render_overview;
pub use routes::render as render_routes;
