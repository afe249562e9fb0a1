//! Terminal graphics: probing support and placing images at cell positions.
//!
//! The probe uses `ratatui-image`'s terminal query; placement goes through
//! the [`GraphicsBackend`] seam, which by default shells out to
//! `kitten icat`.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use ratatui_image::picker::{Picker, ProtocolType};
use sift_core::{CellRect, GraphicsSupport};

/// Something that can draw an image file into a rectangle of cells.
pub trait GraphicsBackend: Send {
    fn place(&mut self, path: &Path, rect: CellRect) -> anyhow::Result<()>;
    fn clear(&mut self) -> anyhow::Result<()>;
}

/// Maps the probe result to the support level the preview controller uses.
pub fn support_from_probe(picker: Option<&Picker>) -> GraphicsSupport {
    match picker.map(|p| p.protocol_type()) {
        Some(ProtocolType::Kitty) => GraphicsSupport::Compatible,
        Some(_) => GraphicsSupport::Unsupported,
        None => GraphicsSupport::Unknown,
    }
}

/// Drives `kitten icat` for placing and clearing images.
#[derive(Debug, Clone)]
pub struct KittenIcat {
    program: String,
}

impl KittenIcat {
    pub fn new() -> Self {
        Self {
            program: "kitten".to_string(),
        }
    }

    fn run(&self, args: &[String]) -> anyhow::Result<()> {
        tracing::debug!(program = %self.program, ?args, "running graphics command");
        let output = Command::new(&self.program)
            .arg("icat")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to run {}", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("{}", stderr.trim());
        }
        Ok(())
    }
}

impl Default for KittenIcat {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for KittenIcat {
    fn place(&mut self, path: &Path, rect: CellRect) -> anyhow::Result<()> {
        self.run(&place_args(path, rect))
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        self.run(&["--stdin=no".to_string(), "--clear".to_string()])
    }
}

fn place_args(path: &Path, rect: CellRect) -> Vec<String> {
    vec![
        "--stdin=no".to_string(),
        "--transfer-mode=file".to_string(),
        "--scale-up".to_string(),
        format!(
            "--place={}x{}@{}x{}",
            rect.width, rect.height, rect.x, rect.y
        ),
        path.display().to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_probe_is_unknown() {
        assert_eq!(support_from_probe(None), GraphicsSupport::Unknown);
    }

    #[test]
    fn place_args_encode_the_rectangle() {
        let args = place_args(Path::new("/tmp/thumb.jpg"), CellRect::new(41, 4, 38, 15));
        assert!(args.contains(&"--place=38x15@41x4".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/thumb.jpg"));
    }

    #[test]
    fn missing_program_is_an_error() {
        let mut backend = KittenIcat {
            program: "sift-no-such-program".to_string(),
        };
        let err = backend.clear().unwrap_err();
        assert!(format!("{err:#}").contains("failed to run sift-no-such-program"));
    }
}
