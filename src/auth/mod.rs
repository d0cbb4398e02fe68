// Token-based authentication
// Stateless HMAC-signed access/refresh tokens, password hashing, and the
// request-boundary authorization gate.

pub mod middleware;
pub mod password;
pub mod token;

pub use middleware::AuthenticatedUser;
pub use token::{Claims, TokenIssuer, TokenPair, TokenService};
