use clap::{Parser, Subcommand};

/// `fetchbot` - chat-driven media downloader for Telegram.
#[derive(Parser, Debug)]
#[command(name = "fetchbot")]
#[command(version)]
#[command(about = "Download media from links sent to a Telegram bot.", long_about = None)]
pub struct Cli {
    /// Log at DEBUG instead of INFO
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Connect to Telegram and serve download requests until interrupted
    Run,

    /// Check the bot token and the downloader binary, then exit
    Doctor,
}
