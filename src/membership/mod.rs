pub mod gate;
pub mod lookup;
pub mod store;

pub use gate::MembershipGate;
pub use lookup::{MemberRole, MembershipLookup};
pub use store::{InMemoryMembershipStore, MembershipStore};
