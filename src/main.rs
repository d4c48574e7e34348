// src/main.rs
//! GPS Logger - serial NMEA fix logger with CSV output

use clap::Parser;
use gps_logger::{config::LoggerConfig, logger, GpsLogger, Result};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gps-logger", about = "Log GPS fixes from a serial NMEA receiver to CSV")]
struct Cli {
    /// Serial port the GPS receiver is attached to
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// CSV file to append completed fixes to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Persist the effective settings to the config file
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if cli.list_ports {
        return logger::list_serial_ports();
    }

    let mut config = LoggerConfig::load().unwrap_or_default();
    if let Some(port) = cli.port {
        config.serial_port = port;
    }
    if let Some(baud) = cli.baud {
        config.baudrate = baud;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    if cli.save_config {
        config.save()?;
    }

    GpsLogger::new().run(&config).await
}
