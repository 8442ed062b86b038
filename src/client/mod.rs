pub mod client;
pub use client::*;

pub mod membership;
pub use membership::*;
