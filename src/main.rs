use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod blink;
mod constants;
mod controller;
mod display;
mod error;
mod layout;
mod loader;
mod notice;
mod operator;
mod page;
mod state;
mod surface;
mod texture_loader;

use crate::constants::*;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Present a PDF full-screen on one display while operating it from another",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// PDF to open on startup
    pdf: Option<PathBuf>,

    /// Cover image (png/jpg) to load on startup
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Output display, 1-based as shown in the operator window
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    display: u16,

    /// PDF rasterisation zoom factor
    #[arg(long, default_value_t = RENDER_SCALE)]
    scale: f32,

    /// Blink period of the stop/cover buttons, in seconds
    #[arg(long, default_value_t = BLINK_INTERVAL)]
    blink: f32,
}

#[derive(Subcommand)]
enum Command {
    /// Audience window driven by the operator over stdin
    #[command(hide = true)]
    Output {
        #[arg(long)]
        display: usize,
    },
    /// Labelled test window for one display
    #[command(hide = true)]
    Identify {
        #[arg(long)]
        display: usize,
        #[arg(long)]
        label: String,
    },
}

fn main() {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .try_init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        tracing::error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Command::Output { display }) => surface::window::run(display).context("output window"),
        Some(Command::Identify { display: index, label }) => display::run_identify(index, &label).context("test window"),
        None => {
            // Children are this same binary with a subcommand
            let program = env::current_exe().context("cannot locate own executable")?;
            operator::run(operator::Options {
                program,
                display: usize::from(cli.display) - 1,
                scale: cli.scale,
                blink: cli.blink,
                pdf: cli.pdf,
                cover: cli.cover,
            })
            .context("operator window")
        }
    }
}
