pub mod api_client;
pub mod config;
pub mod errors;
pub mod features;
pub mod models;
pub mod notifications;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
