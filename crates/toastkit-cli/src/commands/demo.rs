use std::time::Duration;

use clap::Args;
use toastkit_core::error::Result;
use toastkit_core::{ToastConfig, ToastDuration, ToastRequest, ToastState, Toaster, Variant};

const MESSAGES: [(&str, &str, Variant); 3] = [
    ("Order received", "Order #1042: 6 kg heirloom tomatoes", Variant::Default),
    ("Payment confirmed", "Payout scheduled for Friday", Variant::Success),
    ("Stock low", "Only 3 crates of pears left", Variant::Destructive),
];

#[derive(Args)]
pub struct DemoArgs {
    /// Override the queue capacity
    #[arg(long)]
    pub capacity: Option<usize>,
    /// Visible duration of each toast
    #[arg(long, default_value = "1500")]
    pub duration_ms: u64,
    /// Pause between toasts
    #[arg(long, default_value = "500")]
    pub interval_ms: u64,
}

fn print_state(state: &ToastState) {
    match serde_json::to_string(state) {
        Ok(line) => println!("{line}"),
        Err(e) => tracing::warn!(error = %e, "failed to serialize state"),
    }
}

pub fn run(args: DemoArgs) -> Result<()> {
    let mut config = ToastConfig::load()?;
    if let Some(capacity) = args.capacity {
        config.queue.capacity = capacity;
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    runtime.block_on(async move {
        let toaster = Toaster::new(&config);
        let _watch = toaster.watch(print_state);
        let driver = toaster.spawn_driver();

        for (title, description, variant) in MESSAGES {
            toaster.toast(
                ToastRequest::new()
                    .title(title)
                    .description(description)
                    .variant(variant)
                    .duration(ToastDuration::Millis(args.duration_ms)),
            );
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }

        while !toaster.snapshot().is_empty() {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        driver.shutdown().await;
    });
    Ok(())
}
