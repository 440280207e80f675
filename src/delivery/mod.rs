pub mod policy;

pub use policy::{DeliveryDecision, DeliveryPolicy, INLINE_LIMIT_BYTES};
