//! Tidbit: Feedback-Steered Educational Snippets
//!
//! Generates short educational snippets per topic on a recurring schedule,
//! steering each generation pass with the feedback recorded on earlier ones.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod logging;
pub mod provider;
pub mod scheduler;
pub mod types;
