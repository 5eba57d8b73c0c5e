//! Client-side authentication state: the logged-in session, its on-disk
//! store and the guard protected commands pass through.

pub mod guard;
pub mod session;
pub mod store;

pub use guard::{Access, RouteGuard};
pub use session::{token_expiry, Session};
pub use store::SessionStore;
