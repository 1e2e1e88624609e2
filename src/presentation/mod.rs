// Presentation layer - Command line interface
pub mod cli;
pub mod commands;
