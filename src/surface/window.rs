use std::io;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use raylib::prelude::*;

use crate::constants::*;
use crate::display::place_on_monitor;
use crate::surface::protocol::{read_command, Command};
use crate::texture_loader::{draw_fitted, load_png_texture};

/// Body of the `output` child: a borderless full-screen window drawing
/// whatever image the operator streams in.
pub fn run(display: usize) -> Result<()> {
    let commands = spawn_reader()?;

    let (mut rl, thread) = raylib::init()
        .size(1280, 720)
        .title("PDF Slideshow - Output")
        .undecorated()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    rl.set_exit_key(None);
    place_on_monitor(&mut rl, display);

    // The original image is kept; it is re-fitted to the window every frame
    let mut texture: Option<Texture2D> = None;

    'main: while !rl.window_should_close() {
        while let Ok(command) = commands.try_recv() {
            match command {
                Command::Image(png) => match load_png_texture(&mut rl, &thread, &png) {
                    Ok(loaded) => texture = Some(loaded),
                    Err(e) => {
                        tracing::error!("Dropping undecodable image: {}", e);
                        texture = None;
                    }
                },
                Command::Clear => texture = None,
                Command::Display(index) => place_on_monitor(&mut rl, index),
                Command::Quit => break 'main,
            }
        }

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        if let Some(texture) = &texture {
            let bounds = Rectangle::new(0.0, 0.0, d.get_screen_width() as f32, d.get_screen_height() as f32);
            draw_fitted(&mut d, texture, bounds);
        }
    }

    // Textures must go before the GL context
    drop(texture);
    Ok(())
}

fn spawn_reader() -> Result<mpsc::Receiver<Command>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("output-stdin".into())
        .spawn(move || {
            let mut stdin = io::stdin().lock();
            loop {
                let command = match read_command(&mut stdin) {
                    Ok(Some(command)) => command,
                    Ok(None) => Command::Quit,
                    Err(e) => {
                        tracing::error!("Bad command from operator: {}", e);
                        Command::Quit
                    }
                };
                let quit = command == Command::Quit;
                if tx.send(command).is_err() || quit {
                    break;
                }
            }
        })
        .context("failed to start stdin reader")?;
    Ok(rx)
}
