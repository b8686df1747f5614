mod auth;
mod briefing;
mod calendar;
mod cli;
mod config;
mod expenses;
mod mcp;
mod services;
mod store;
mod tasks;
mod timeparse;
mod tool_args;
mod tool_defs;
mod tool_exec;
mod transcript;

use clap::Parser;
use log::info;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::store::Store;
use crate::tool_exec::ToolContext;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging goes to stderr; stdout is reserved for MCP frames.
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = Config::from_env();
    let store = Store::new(&config.db_path);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            store.ensure_schema()?;
            info!("store ready at {}", config.db_path.display());
            let ctx = ToolContext {
                config: &config,
                store: &store,
            };
            mcp::run_server(&ctx)
        }
        Command::InitDb => {
            store.ensure_schema()?;
            println!("store ready: {}", config.db_path.display());
            Ok(())
        }
        Command::Login { port } => {
            let auth = auth::GoogleAuth::from_config(&config)?;
            auth.login(port)
        }
        Command::Briefing => {
            println!("{}", briefing::daily_briefing(&config));
            Ok(())
        }
    }
}
