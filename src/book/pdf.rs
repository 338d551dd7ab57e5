//! PDF compilation via img2pdf
//!
//! img2pdf embeds JPEGs losslessly, which matters at print resolution.

use crate::book::DocumentRenderer;
use crate::error::{FabulaError, FabulaResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

pub struct Img2pdfRenderer {
    program: &'static str,
}

impl Img2pdfRenderer {
    pub fn new() -> Self {
        Self { program: "img2pdf" }
    }
}

impl Default for Img2pdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `img2pdf <images...> -o <output>`
fn build_args(images: &[PathBuf], output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = images
        .iter()
        .map(|image| image.as_os_str().to_os_string())
        .collect();
    args.push("-o".into());
    args.push(output.as_os_str().to_os_string());
    args
}

#[async_trait]
impl DocumentRenderer for Img2pdfRenderer {
    async fn render(&self, images: &[PathBuf], output: &Path) -> FabulaResult<()> {
        if images.is_empty() {
            return Err(FabulaError::User(
                "no page images to compile into a book".to_string(),
            ));
        }

        let result = Command::new(self.program)
            .args(build_args(images, output))
            .output()
            .await
            .map_err(|e| FabulaError::command_failed(self.program, e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(FabulaError::command_exec(self.program, stderr));
        }

        debug!("Wrote {}", output.display());
        Ok(())
    }
}
