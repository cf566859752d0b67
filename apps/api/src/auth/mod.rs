//! Cookie-session authentication: signup/login/logout endpoints, Argon2
//! password handling and the middleware layers that gate the rest of the
//! API (valid session, then active trial or premium plan).

pub mod handlers;
pub mod middleware;
pub mod passwords;
pub mod sessions;
