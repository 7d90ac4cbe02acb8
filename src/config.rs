//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::presets::MAX_PRESET_MINUTES;
use crate::state::Presets;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "focus-timer")]
#[command(about = "A state-managed HTTP server driving a pomodoro countdown timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "25080")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Focus session length in minutes
    #[arg(long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..=MAX_PRESET_MINUTES))]
    pub focus: u64,

    /// Short break length in minutes
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u64).range(1..=MAX_PRESET_MINUTES))]
    pub short: u64,

    /// Long break length in minutes
    #[arg(long, default_value = "15", value_parser = clap::value_parser!(u64).range(1..=MAX_PRESET_MINUTES))]
    pub long: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Get the configured preset table
    pub fn presets(&self) -> Presets {
        Presets::new(self.focus, self.short, self.long)
    }
}
