//! Completions command - emit shell completion scripts

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::FabulaResult;
use clap::CommandFactory;

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> FabulaResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
