//! Terminal user interface.
//!
//! # Module Structure
//!
//! - `loop_runner` - main event loop and terminal management
//! - `input` - keyboard dispatch for the page, search bar and help overlay
//! - `render` - frame layout and size guard
//! - `navbar` - logo, search box and theme indicator
//! - `tabs` - favorites and category tabs
//! - `page` - hero banner and link sections
//! - `status` - status bar
//! - `help` - keybinding overlay

mod help;
mod input;
mod loop_runner;
mod navbar;
mod page;
mod render;
mod status;
mod tabs;

pub use loop_runner::{run, Action};
