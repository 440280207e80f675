#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::unnecessary_literal_bound,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod delivery;
pub mod download;
pub mod error;
pub mod links;
pub mod membership;
pub mod pipeline;
pub mod status;
pub mod transport;

pub use config::Config;
pub use error::{FetchError, Result};
