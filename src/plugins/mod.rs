//! The three gate tools and the language support they share.

pub mod compliance;
pub mod quality;
pub mod stories;
pub mod syntax;
