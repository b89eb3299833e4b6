//! CLI module for the quiz platform API

pub mod serve;

use clap::{Parser, Subcommand};

/// Quiz Platform API - quiz generation and analysis service
#[derive(Parser)]
#[command(name = "quiz-platform-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,
}
