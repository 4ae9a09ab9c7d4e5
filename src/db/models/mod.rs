//! Database models split into domain-specific modules.

pub mod common;
pub mod movie;
pub mod settings;
pub mod user;

pub use common::*;
pub use movie::*;
pub use settings::*;
pub use user::*;
