use std::io;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::error::Result;
use crate::page::Page;
use crate::surface::OutputSurface;
use crate::surface::protocol::{self, Command as Wire};

/// Output surface living in a child `pdfshow output` process, driven
/// through its stdin.
pub struct OutputProcess {
    program: PathBuf,
    child: Option<(Child, ChildStdin)>,
    image: Option<Page>,
}

impl OutputProcess {
    pub fn new(program: PathBuf) -> Self {
        Self { program, child: None, image: None }
    }

    fn spawn(&mut self, display: usize) -> io::Result<()> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .args(["output", "--display", &display.to_string()])
            .spawn()?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "output process has no stdin"))?;
        tracing::info!("Output window started on display {} (pid {})", display + 1, child.id());
        self.child = Some((child, stdin));
        Ok(())
    }

    fn send(&mut self, command: &Wire) -> Result<()> {
        let Some((_, stdin)) = self.child.as_mut() else {
            return Ok(());
        };
        if let Err(e) = protocol::write_command(stdin, command) {
            // The window was closed behind our back; next show starts a fresh one
            tracing::warn!("Output window stopped accepting commands: {}", e);
            self.hide();
            return Err(e.into());
        }
        Ok(())
    }

    fn send_image(&mut self) -> Result<()> {
        let command = match &self.image {
            Some(page) => Wire::Image(page.png.to_vec()),
            None => Wire::Clear,
        };
        self.send(&command)
    }
}

impl OutputSurface for OutputProcess {
    fn show(&mut self, display: usize) -> Result<()> {
        if self.child.is_some() {
            return self.send(&Wire::Display(display));
        }
        self.spawn(display)?;
        self.send_image()
    }

    fn set_image(&mut self, image: Option<&Page>) -> Result<()> {
        self.image = image.cloned();
        self.send_image()
    }

    fn hide(&mut self) {
        if let Some((mut child, mut stdin)) = self.child.take() {
            let _ = protocol::write_command(&mut stdin, &Wire::Quit);
            drop(stdin);
            match child.wait() {
                Ok(status) => tracing::info!("Output window closed ({})", status),
                Err(e) => tracing::error!("Failed to wait for output process: {}", e),
            }
        }
    }

    fn is_visible(&self) -> bool {
        self.child.is_some()
    }
}

impl Drop for OutputProcess {
    fn drop(&mut self) {
        self.hide();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Arc;

    use crate::error::ShowError;

    /// Stand-in output program that swallows commands until stdin closes.
    fn sink_program(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("pdfshow-{}-{}.sh", name, std::process::id()));
        fs::write(&path, "#!/bin/sh\nexec cat > /dev/null\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn page() -> Page {
        Page { width: 1, height: 1, png: Arc::new(vec![0x89, b'P', b'N', b'G']) }
    }

    #[test]
    fn dead_output_is_reported_then_respawned() {
        let program = sink_program("respawn");
        let mut output = OutputProcess::new(program.clone());
        output.show(0).unwrap();
        assert!(output.is_visible());

        // Window closed behind the operator's back
        let (child, _) = output.child.as_mut().unwrap();
        child.kill().unwrap();
        child.wait().unwrap();

        let err = output.set_image(Some(&page())).unwrap_err();
        assert!(matches!(err, ShowError::Surface(_)));
        assert!(!output.is_visible());

        output.show(1).unwrap();
        assert!(output.is_visible());
        output.set_image(None).unwrap();

        output.hide();
        assert!(!output.is_visible());
        fs::remove_file(program).unwrap();
    }

    #[test]
    fn unspawnable_output_stays_hidden() {
        let mut output = OutputProcess::new("/nonexistent/pdfshow".into());
        assert!(matches!(output.show(0), Err(ShowError::Surface(_))));
        assert!(!output.is_visible());
        // Nothing to push to while hidden
        output.set_image(Some(&page())).unwrap();
    }
}
