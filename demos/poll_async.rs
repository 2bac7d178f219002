use clap::Parser;
use gpsd_fix::{DEFAULT_HOST, DEFAULT_PORT, client::GpsdClient};

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

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut client = GpsdClient::connect(&args.host, args.port).await?;
    if let Some(watch) = client.state().watch() {
        println!("Watch enabled: {:?}", watch.enable);
    }

    for _ in 0..args.count {
        let fix = client.poll_fix().await?;
        println!("{fix}");

        match fix.movement() {
            Ok(movement) => println!(
                "  moving {:.2} m/s on {:.0}°, climbing {:.2} m/s (filtered {:.2})",
                movement.speed,
                movement.track,
                movement.climb,
                fix.vertical_speed_filtered()
            ),
            Err(e) => println!("  {e}"),
        }

        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
    }

    Ok(())
}
