pub mod channel;
pub use channel::*;

pub mod error;
pub use error::*;

pub mod lobby;
pub use lobby::*;

pub mod server;
pub use server::*;
