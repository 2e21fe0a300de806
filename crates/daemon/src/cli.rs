use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "roomwatchd", version, about = "Room sensor alert daemon")]
pub struct Args {
    #[arg(short, long, env = "ROOMWATCH_CONFIG", help = "Configuration file path")]
    pub config: PathBuf,
}
