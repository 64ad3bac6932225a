//! nexus: a terminal link directory.
//!
//! Links come from a TOML catalog of categories and subcategories. Favorites
//! and the dark/light theme are kept in a small SQLite preference table so they
//! survive restarts.

pub mod app;
pub mod catalog;
pub mod config;
pub mod keybindings;
pub mod search;
pub mod state;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
