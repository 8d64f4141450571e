pub mod common;
pub mod contact;
pub mod messages;

pub use common::*;
pub use contact::*;
pub use messages::*;
