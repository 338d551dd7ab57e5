//! Frame command - add print bleed and fold guides to one image

use crate::book::FrameTool;
use crate::cli::args::FrameArgs;
use crate::config::Config;
use crate::error::FabulaResult;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the frame command
pub async fn execute(args: FrameArgs, config: &Config) -> FabulaResult<()> {
    let ctx = UiContext::detect().with_plain(config.ui.plain);

    let tool = FrameTool::new();
    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Framing {}...", args.image.display()));

    match tool.frame(&args.image).await {
        Ok(framed) => {
            spinner.stop(&format!("Framed {}", framed.display()));
            Ok(())
        }
        Err(e) => {
            spinner.stop_error("Framing failed");
            Err(e)
        }
    }
}
