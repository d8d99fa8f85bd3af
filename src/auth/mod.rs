//! Auth Core (AC): minimal bearer-JWT verification.
//!
//! AC itself is an external collaborator — this module only implements
//! the contract this crate consumes from it: a bearer token
//! comes in, a `user_id` comes out. No login/registration flow lives here.

mod jwt;
mod middleware;

pub use jwt::{BearerAuthenticator, Claims, JwtAuthenticator};
pub use middleware::{auth_middleware, AuthenticatedUser};
