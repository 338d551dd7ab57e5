//! Print framing via ImageMagick
//!
//! A framed page is the generated image resized to the exact content
//! dimensions, placed on a white canvas with bleed on all sides, with light
//! guide lines marking the trim box and the center fold of a two-page
//! spread.

use crate::error::{FabulaError, FabulaResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

/// Print content area in pixels, ~3:2
pub const CONTENT_WIDTH: u32 = 3507;
pub const CONTENT_HEIGHT: u32 = 2334;

/// Bleed added on every side
pub const BLEED: u32 = 36;

/// Canvas size including bleed
pub const FULL_WIDTH: u32 = CONTENT_WIDTH + 2 * BLEED;
pub const FULL_HEIGHT: u32 = CONTENT_HEIGHT + 2 * BLEED;

/// Fold line position for two-page spreads
pub const CENTER_GUTTER: u32 = 1789;

const GUIDE_COLOR: &str = "rgb(200,200,200)";
const JPEG_QUALITY: &str = "95";

/// `{stem}-framed.jpg` next to the source image; reframing overwrites
pub fn framed_path(image: &Path) -> PathBuf {
    match image.file_stem() {
        Some(stem) => image.with_file_name(format!("{}-framed.jpg", stem.to_string_lossy())),
        None => image.with_extension("framed.jpg"),
    }
}

/// Trim-box edges and the center fold, spanning the full canvas
fn guide_lines() -> [String; 5] {
    [
        format!("line 0,{BLEED} {FULL_WIDTH},{BLEED}"),
        format!(
            "line 0,{} {FULL_WIDTH},{}",
            FULL_HEIGHT - BLEED,
            FULL_HEIGHT - BLEED
        ),
        format!("line {BLEED},0 {BLEED},{FULL_HEIGHT}"),
        format!(
            "line {},0 {},{FULL_HEIGHT}",
            FULL_WIDTH - BLEED,
            FULL_WIDTH - BLEED
        ),
        format!("line {CENTER_GUTTER},0 {CENTER_GUTTER},{FULL_HEIGHT}"),
    ]
}

/// ImageMagick arguments: force-resize to the content size, extend onto a
/// white canvas offset by the bleed, then draw the guides
fn build_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![input.as_os_str().to_os_string()];

    for arg in [
        "-resize".to_string(),
        format!("{CONTENT_WIDTH}x{CONTENT_HEIGHT}!"),
        "-background".to_string(),
        "white".to_string(),
        "-gravity".to_string(),
        "northwest".to_string(),
        "-extent".to_string(),
        format!("{FULL_WIDTH}x{FULL_HEIGHT}-{BLEED}-{BLEED}"),
        "-stroke".to_string(),
        GUIDE_COLOR.to_string(),
        "-strokewidth".to_string(),
        "1".to_string(),
    ] {
        args.push(arg.into());
    }

    for line in guide_lines() {
        args.push("-draw".into());
        args.push(line.into());
    }

    args.push("-quality".into());
    args.push(JPEG_QUALITY.into());
    args.push(output.as_os_str().to_os_string());
    args
}

/// Shells out to `magick` for the actual pixel work
pub struct FrameTool {
    program: &'static str,
}

impl FrameTool {
    pub fn new() -> Self {
        Self { program: "magick" }
    }

    /// Frame one image and return the framed path
    pub async fn frame(&self, image: &Path) -> FabulaResult<PathBuf> {
        if !image.is_file() {
            return Err(FabulaError::PathNotFound(image.to_path_buf()));
        }

        let output = framed_path(image);
        let result = Command::new(self.program)
            .args(build_args(image, &output))
            .output()
            .await
            .map_err(|e| FabulaError::command_failed(self.program, e))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(FabulaError::command_exec(self.program, stderr));
        }

        debug!("Framed {} -> {}", image.display(), output.display());
        Ok(output)
    }
}

impl Default for FrameTool {
    fn default() -> Self {
        Self::new()
    }
}
