pub mod commands;
pub mod dispatch;
pub mod status;

pub use commands::{Cli, Commands};
pub use dispatch::{build_pipeline, dispatch};
