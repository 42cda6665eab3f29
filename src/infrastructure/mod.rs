// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod disease_sh_client;
pub mod http_response;
pub mod trace_file;
pub mod webhook_notifier;
