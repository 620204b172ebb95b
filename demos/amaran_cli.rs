//! CLI application for controlling Amaran lights.
//!
//! Run with: cargo run --example amaran_cli -- --help
//! Set RUST_LOG=debug to see the wire traffic.

use std::sync::Arc;

use amaran_lights_rs::{
    Brightness, Color, ControllerConfig, HueSaturation, Kelvin, Light, Registry, Session, TurnOn,
};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "amaran-cli")]
#[command(about = "Control Amaran lights through their desktop controller", long_about = None)]
struct Cli {
    /// Controller host
    #[arg(long, global = true, default_value = "localhost")]
    host: String,

    /// Controller WebSocket port
    #[arg(short, long, global = true, default_value_t = ControllerConfig::DEFAULT_PORT)]
    port: u16,

    /// Base64-encoded API key from the controller settings
    #[arg(short = 'k', long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List devices with their ids and capabilities
    Devices,

    /// List quickshots stored on the controller
    Quickshots,

    /// List presets stored on the controller
    Presets,

    /// Read the current state of a light
    Status { device: String },

    /// Turn a light on
    On { device: String },

    /// Turn a light off
    Off { device: String },

    /// Toggle a light on/off
    Toggle { device: String },

    /// Set brightness (0-255)
    Brightness { device: String, level: u8 },

    /// Set color temperature in Kelvin, clamped to the light's range
    Temperature { device: String, kelvin: u16 },

    /// Set hue (0-360) and saturation (0-100)
    Hs {
        device: String,
        #[arg(value_parser = clap::value_parser!(u16).range(0..=360))]
        hue: u16,
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        saturation: u8,
    },

    /// Set RGB color (0-255 for each component)
    Color {
        device: String,
        red: u8,
        green: u8,
        blue: u8,
    },

    /// Apply a preset by id
    Preset { device: String, preset_id: String },

    /// Apply a quickshot by id
    Quickshot { device: String, quickshot_id: String },

    /// Get detailed diagnostics for a light
    Diagnostics { device: String },
}

fn print_state(light: &Light) {
    let state = light.state();
    println!("{} ({})", light.name(), light.device_id());
    println!("  Power: {}", if state.is_on() { "ON" } else { "OFF" });
    if let Some(brightness) = state.brightness() {
        println!("  Brightness: {}", brightness.value());
    }
    println!("  Mode: {:?}", state.color_mode());
    if let Some(temp) = state.color_temp() {
        println!("  Temperature: {}K", temp.kelvin());
    }
    if let Some(hs) = state.hs_color() {
        println!("  Hue/Saturation: {}/{}", hs.hue(), hs.saturation());
    }
    if let Some(color) = state.rgb_color() {
        println!(
            "  Color: RGB({}, {}, {})",
            color.red(),
            color.green(),
            color.blue()
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let api_key = cli
        .api_key
        .ok_or("An API key is required. Use --api-key <KEY>")?;
    let session = Arc::new(Session::new(ControllerConfig::new(
        &cli.host, cli.port, &api_key,
    )));
    if !session.connect().await {
        return Err(format!("Cannot reach controller at {}:{}", cli.host, cli.port).into());
    }

    let mut registry = Registry::discover(session.clone()).await;

    match cli.command {
        Commands::Devices => {
            if registry.is_empty() {
                println!("No devices found.");
            }
            for light in registry.devices() {
                println!(
                    "  {:32}  node: {:12}  {:?}  {}",
                    light.device_id(),
                    light.node_id(),
                    light.supported_mode(),
                    light.name()
                );
            }
        }

        Commands::Quickshots => {
            for (id, label) in registry.quickshot_options() {
                println!("  {id:>6}  {label}");
            }
        }

        Commands::Presets => {
            for group in registry.presets() {
                println!("{}:", group.kind);
                for preset in &group.list {
                    println!(
                        "  {:>6}  {}",
                        preset.id,
                        preset.name.as_deref().unwrap_or("-")
                    );
                }
            }
        }

        Commands::Preset { device, preset_id } => {
            registry.apply_preset(&device, &preset_id).await?;
            println!("Preset {preset_id} applied to {device}");
        }

        Commands::Quickshot {
            device,
            quickshot_id,
        } => {
            registry.apply_quickshot(&device, &quickshot_id).await?;
            println!("Quickshot {quickshot_id} applied to {device}");
        }

        Commands::Status { ref device }
        | Commands::On { ref device }
        | Commands::Off { ref device }
        | Commands::Toggle { ref device }
        | Commands::Brightness { ref device, .. }
        | Commands::Temperature { ref device, .. }
        | Commands::Hs { ref device, .. }
        | Commands::Color { ref device, .. }
        | Commands::Diagnostics { ref device } => {
            let light = registry
                .device_mut(device)
                .ok_or_else(|| format!("Unknown device {device}. Use the devices command."))?;
            light.update().await;

            match cli.command {
                Commands::Status { .. } => print_state(light),
                Commands::On { .. } => light.turn_on(&TurnOn::new()).await,
                Commands::Off { .. } => light.turn_off().await,
                Commands::Toggle { .. } => light.toggle().await,
                Commands::Brightness { level, .. } => {
                    light.turn_on(&TurnOn::from(Brightness::create(level))).await
                }
                Commands::Temperature { kelvin, .. } => {
                    light.turn_on(&TurnOn::from(Kelvin::new(kelvin))).await
                }
                Commands::Hs {
                    hue, saturation, ..
                } => {
                    let hs = HueSaturation::create(hue, saturation)
                        .ok_or("Hue must be 0-360 and saturation 0-100")?;
                    light.turn_on(&TurnOn::from(hs)).await
                }
                Commands::Color {
                    red, green, blue, ..
                } => {
                    light
                        .turn_on(&TurnOn::from(Color::rgb(red, green, blue)))
                        .await
                }
                Commands::Diagnostics { .. } => {
                    let diag = light.diagnostics().await;
                    println!("{}", serde_json::to_string_pretty(&diag)?);
                }
                _ => unreachable!(),
            }

            if !matches!(
                cli.command,
                Commands::Status { .. } | Commands::Diagnostics { .. }
            ) {
                print_state(light);
            }
        }
    }

    session.close().await;
    Ok(())
}
