//! Core shprompt library (styled text, layout, rendering, VCS, config).

pub mod cache;
pub mod config;
pub mod env;
pub mod layout;
pub mod prompt;
pub mod shell;
pub mod style;
pub mod util;
pub mod vcs;
