//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod roster_panel;

pub use app::RosterApp;
