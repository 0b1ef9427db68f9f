use std::path::PathBuf;

use clap::Args;
use toastkit_core::error::Result;
use toastkit_core::{Scenario, ToastConfig};

#[derive(Args)]
pub struct SimulateArgs {
    /// Scenario file (TOML)
    pub script: PathBuf,
    /// Override the queue capacity for this run
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Pretty-print each frame
    #[arg(long)]
    pub pretty: bool,
}

/// Prints one JSON frame per observed state.
pub fn run(args: SimulateArgs) -> Result<()> {
    let mut config = ToastConfig::load()?;
    let mut scenario = Scenario::load(&args.script)?;
    if let Some(capacity) = args.capacity {
        config.queue.capacity = capacity;
        config.validate()?;
        scenario.capacity = None;
    }

    let frames = scenario.run(&config)?;
    tracing::info!(frames = frames.len(), "scenario finished");
    for frame in &frames {
        let line = if args.pretty {
            serde_json::to_string_pretty(frame)?
        } else {
            serde_json::to_string(frame)?
        };
        println!("{line}");
    }
    Ok(())
}
