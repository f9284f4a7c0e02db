//! Run command implementation

use crate::config::Config;
use crate::engine::Engine;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let mut engine = Engine::new(config)?;
        engine.run().await
    }
}
