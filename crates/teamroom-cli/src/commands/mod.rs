pub mod completions;
pub mod config;
pub mod poker;
pub mod retro;
