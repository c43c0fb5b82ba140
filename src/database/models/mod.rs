/// Enrolled group chats
pub mod group;

pub use group::*;
