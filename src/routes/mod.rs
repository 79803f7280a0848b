/// Router Module Index
///
/// Routes are split by the access group they belong to. Everything except
/// `public` is wrapped in the access guard by `create_router`.

/// Unguarded endpoints: health check and dashboard widgets.
pub mod public;

/// Login and signup pages (the public `Auth` group).
pub mod auth;

/// Pages for any signed-in staff member (the `Employee` group).
pub mod employee;

/// HR administration pages (the `Admin` group).
pub mod admin;
