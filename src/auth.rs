//! Bearer credentials, the shared auth context, and the token provider that refreshes them.

pub mod context;
pub mod credential;
pub mod provider;

pub use context::*;
pub use credential::*;
pub use provider::*;
