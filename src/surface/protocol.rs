//! Commands streamed from the operator to the output process over its stdin.
//!
//! Each command is one ASCII header line; `IMAGE` is followed by exactly
//! `<len>` bytes of PNG data.

use std::io::{self, BufRead, Read, Write};

const MAX_IMAGE_BYTES: usize = 256 * 1024 * 1024;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Command {
    Image(Vec<u8>),
    Clear,
    Display(usize),
    Quit,
}

pub fn write_command<W: Write>(w: &mut W, command: &Command) -> io::Result<()> {
    match command {
        Command::Image(png) => {
            writeln!(w, "IMAGE {}", png.len())?;
            w.write_all(png)?;
        }
        Command::Clear => writeln!(w, "CLEAR")?,
        Command::Display(index) => writeln!(w, "DISPLAY {}", index)?,
        Command::Quit => writeln!(w, "QUIT")?,
    }
    w.flush()
}

/// Reads the next command; `Ok(None)` at a clean end of stream.
pub fn read_command<R: BufRead>(r: &mut R) -> io::Result<Option<Command>> {
    let mut line = String::new();
    if r.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let mut parts = line.trim_end().splitn(2, ' ');
    let command = match (parts.next().unwrap_or(""), parts.next()) {
        ("IMAGE", Some(len)) => {
            let len = parse_arg(len)?;
            if len > MAX_IMAGE_BYTES {
                return Err(invalid(format!("image of {} bytes exceeds limit", len)));
            }
            let mut png = vec![0; len];
            r.read_exact(&mut png)?;
            Command::Image(png)
        }
        ("DISPLAY", Some(index)) => Command::Display(parse_arg(index)?),
        ("CLEAR", None) => Command::Clear,
        ("QUIT", None) => Command::Quit,
        _ => return Err(invalid(format!("unknown command {:?}", line.trim_end()))),
    };
    Ok(Some(command))
}

fn parse_arg(arg: &str) -> io::Result<usize> {
    arg.parse().map_err(|_| invalid(format!("bad argument {:?}", arg)))
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
