pub mod cli;
pub mod config;
pub mod detect;
pub mod logging;
