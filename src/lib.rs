// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod config;
pub mod content;
pub mod cues;
pub mod game;
pub mod hover;
pub mod pointer;
pub mod runtime;
pub mod session;
pub mod targets;
pub mod util;
