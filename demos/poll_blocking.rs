use clap::Parser;
use gpsd_fix::{DEFAULT_HOST, DEFAULT_PORT, client::blocking};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Number of polls before exiting
    #[arg(short, long, default_value_t = 5)]
    count: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut client = blocking::GpsdClient::connect(&args.host, args.port)?;

    match client.device_info() {
        Ok(device) => println!(
            "Device: {} ({} bps, driver {})",
            device.path.as_deref().unwrap_or("?"),
            device.bps.map_or_else(|| "?".to_string(), |bps| bps.to_string()),
            device.driver.as_deref().unwrap_or("?")
        ),
        Err(e) => println!("Device: {e}"),
    }

    for _ in 0..args.count {
        let fix = client.poll_fix()?;
        println!("{fix}, {} satellites in view", fix.satellites_in_view());

        match fix.position_precision() {
            Ok((horizontal, vertical)) => {
                println!("  precision: ±{horizontal:.1} m horizontal, ±{vertical:.1} m vertical")
            }
            Err(e) => println!("  {e}"),
        }
        if let Ok(speed) = fix.speed() {
            println!("  speed: {speed:.2} m/s");
        }
        if let Ok(url) = fix.map_url() {
            println!("  map: {url}");
        }

        std::thread::sleep(std::time::Duration::from_secs(1));
    }

    Ok(())
}
