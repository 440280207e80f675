pub mod actions;
pub mod error_surface;
pub mod handler;

pub use actions::{BotCommand, CallbackAction, parse_command};
pub use error_surface::ErrorSurface;
pub use handler::{Outcome, Pipeline, PipelineParts, RequestOutcome};
