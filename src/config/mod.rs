pub mod schema;

pub use schema::{
    Config, DeliveryConfig, DownloadConfig, MembershipConfig, ReliabilityConfig, TelegramConfig,
};
