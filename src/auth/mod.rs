pub mod auth;
pub mod handlers;
pub mod password;
pub mod token;
