//! Auth-domain models: bearer tokens, decoded claims, and login credentials.

pub mod claims;
pub mod credentials;
pub mod token;

pub use claims::*;
pub use credentials::*;
pub use token::*;
