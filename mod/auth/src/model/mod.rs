mod session;
mod user;

pub use session::{Claims, Session, TokenPair};
pub use user::{Role, UpdateRoleRequest, User};
