mod analyse;
mod analysis;
mod fleet;
mod heartbeat;
mod store;

use clap::{Parser, Subcommand};

pub use self::{analyse::AnalyseArgs, fleet::FleetArgs};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyse the consumption of a single tank.
    #[clap(name = "analyse", alias = "analyze")]
    Analyse(Box<AnalyseArgs>),

    /// Analyse every tank and summarise the fleet.
    #[clap(name = "fleet")]
    Fleet(Box<FleetArgs>),
}
