use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "biseo")]
#[command(about = "Personal secretary MCP tool server", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the MCP server over stdio (the default).
    Serve,

    /// Create the store schema and exit.
    InitDb,

    /// Run the interactive Google OAuth flow and cache the token.
    Login {
        /// Local callback port.
        #[arg(long, default_value_t = 8385)]
        port: u16,
    },

    /// Print today's briefing to stdout.
    Briefing,
}
