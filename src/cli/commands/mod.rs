//! CLI command implementations

pub mod book;
pub mod check;
pub mod completions;
pub mod config;
pub mod frame;
pub mod generate;
pub mod init;
pub mod merge;
pub mod pick;
pub mod prompt;
pub mod text;
pub mod versions;

pub use book::execute as book;
pub use check::execute as check;
pub use completions::execute as completions;
pub use config::execute as config;
pub use frame::execute as frame;
pub use generate::execute as generate;
pub use init::execute as init;
pub use merge::execute as merge;
pub use pick::execute as pick;
pub use prompt::execute as prompt;
pub use text::execute as text;
pub use versions::execute as versions;
