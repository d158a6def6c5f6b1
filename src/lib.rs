pub mod auth;
pub mod cache;
pub mod classroom;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

#[cfg(test)]
mod test_support;
