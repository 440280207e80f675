pub mod reporter;
pub mod stage;
pub mod stats;

pub use reporter::StatusReporter;
pub use stage::Stage;
pub use stats::{UsageSnapshot, UsageStats};
