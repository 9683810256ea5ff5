//! CLI application for controlling lights through a Hue bridge.
//!
//! Run with: cargo run --example hue_cli -- --help

use std::time::Duration;

use clap::{Parser, Subcommand};
use hue_bridge_rs::{Bridge, Brightness, Color, LightUpdate, PowerMode, Status, TransitionTime};

#[derive(Parser)]
#[command(name = "hue-cli")]
#[command(about = "Control Hue lights from the command line", long_about = None)]
struct Cli {
    /// Host name or IP address of the bridge
    #[arg(short = 'H', long)]
    host: String,

    /// Username issued by the bridge during pairing
    #[arg(short, long, env = "HUE_USERNAME")]
    username: Option<String>,

    /// Client key issued by the bridge during pairing (32 hex characters)
    #[arg(short = 'k', long, env = "HUE_CLIENT_KEY")]
    client_key: Option<String>,

    /// Transition time in milliseconds
    #[arg(short, long)]
    transition: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair with the bridge (press the link button first)
    Pair {
        #[arg(default_value = "hue_cli")]
        app: String,
        #[arg(default_value = "cli")]
        device: String,
    },

    /// Print the full bridge state
    Info,

    /// List lights
    Lights,

    /// Turn a light on
    On { light: String },

    /// Turn a light off
    Off { light: String },

    /// Set hue (0-65535), saturation and brightness (0-255)
    Hsb {
        light: String,
        hue: u16,
        sat: u8,
        bri: u8,
    },

    /// Set CIE xy colour (0-0.8 each)
    Xy { light: String, x: f64, y: f64 },

    /// Set brightness as a fraction (0-1)
    Brightness { light: String, level: f64 },

    /// Turn a whole group on or off
    Group {
        group: String,
        #[arg(value_parser = ["on", "off"])]
        power: String,
    },

    /// Stream a red/blue alternation to the given light ids
    Stream {
        #[arg(required = true)]
        lights: Vec<u16>,
        /// Number of frames to send
        #[arg(short, long, default_value = "100")]
        frames: u32,
    },
}

fn report(bridge: &Bridge) {
    match bridge.status() {
        Some(Status::Ok) => println!("ok"),
        Some(Status::Error) => {
            if let Some(err) = bridge.error() {
                eprintln!("error: {err}");
            }
        }
        None => {}
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let transition = cli.transition.map(TransitionTime::from_millis);

    let mut bridge = Bridge::new(&cli.host);
    if let Some(username) = &cli.username {
        bridge = bridge.with_credentials(username, cli.client_key.as_deref());
    }

    match cli.command {
        Commands::Pair { app, device } => {
            let bridge = bridge.authorize(&app, &device).await;
            report(&bridge);
            if let Some(username) = bridge.username() {
                println!("username:   {username}");
            }
            if let Some(key) = bridge.client_key() {
                println!("client key: {key}");
            }
        }

        Commands::Info => {
            println!("{}", serde_json::to_string_pretty(&bridge.info().await?)?);
        }

        Commands::Lights => {
            println!("{}", serde_json::to_string_pretty(&bridge.lights().await?)?);
        }

        Commands::On { light } => report(&bridge.turn_on(light, transition).await),

        Commands::Off { light } => report(&bridge.turn_off(light, transition).await),

        Commands::Hsb {
            light,
            hue,
            sat,
            bri,
        } => {
            let color = Color::hsb(hue, sat, bri);
            report(&bridge.set_color(light, &color, transition).await);
        }

        Commands::Xy { light, x, y } => {
            let color = Color::xy(x, y).ok_or("x and y must be within 0-0.8")?;
            report(&bridge.set_color(light, &color, transition).await);
        }

        Commands::Brightness { light, level } => {
            let brightness =
                Brightness::from_fraction(level).ok_or("brightness must be within 0-1")?;
            report(&bridge.set_brightness(light, &brightness, transition).await);
        }

        Commands::Group { group, power } => {
            let power = PowerMode::from(power == "on");
            report(&bridge.set_group_power(group, power, transition).await);
        }

        Commands::Stream { lights, frames } => {
            bridge.open_stream().await?;
            println!("streaming {frames} frames to {} light(s)", lights.len());

            for i in 0..frames {
                let (red, blue) = if i % 20 < 10 { (255, 0) } else { (0, 255) };
                let updates: Vec<LightUpdate> = lights
                    .iter()
                    .map(|&id| LightUpdate::from_rgb8(id, red, 0, blue))
                    .collect();
                bridge.stream_colors(&updates).await?;
                tokio::time::sleep(Duration::from_millis(40)).await;
            }

            bridge.close_stream().await?;
        }
    }

    Ok(())
}
