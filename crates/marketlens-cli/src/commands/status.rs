use anyhow::Result;
use marketlens_client::ClientConfig;

use super::context::build_controller;

pub async fn run(config: ClientConfig) -> Result<()> {
    let controller = build_controller(config, None)?;
    let status = controller.check_capabilities().await;

    match status.healthy {
        Some(true) => println!("Backend: healthy"),
        Some(false) => println!("Backend: degraded"),
        None => println!("Backend: unreachable"),
    }
    for provider in &status.providers {
        println!(
            "  {:<24} {}",
            provider.name,
            if provider.available { "available" } else { "unavailable" }
        );
    }
    for local in &status.local {
        println!("  {:<24} available (local)", local.name);
    }
    Ok(())
}
