use anyhow::Result;
use vyper_guard::Network;

pub fn run() -> Result<()> {
    println!("{:<10} {:<30} Explorer API", "Network", "Key variable");
    println!("{}", "-".repeat(90));

    for network in Network::ALL {
        println!(
            "{:<10} {:<30} {}",
            network.as_str(),
            network.api_key_var(),
            network.default_api_url()
        );
    }

    println!("\nTotal: {} networks", Network::ALL.len());
    Ok(())
}
