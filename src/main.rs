use std::error::Error;

use symbio::{process_requests, EngineConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let (suppliers, receivers) = symbio::fly_ash_demo();
    let outcome = process_requests(&suppliers, &receivers, &EngineConfig::default())?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
