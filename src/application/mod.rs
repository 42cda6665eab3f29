// Application layer - Use cases and the ports they depend on
pub mod disease_provider;
pub mod error;
pub mod sinks;
pub mod statistics_service;
