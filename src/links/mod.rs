pub mod classifier;

pub use classifier::{LinkClass, LinkClassifier, Provider};
