//! Well-known role name constants.
//!
//! Tokens are issued by the authentication service; these must match the
//! role names it embeds in the `role` claim.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EMPLOYER: &str = "employer";
pub const ROLE_USER: &str = "user";
