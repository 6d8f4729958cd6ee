pub mod auth;
pub mod health;
pub mod mood;
pub mod profile;
