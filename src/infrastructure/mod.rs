// Infrastructure layer - External dependencies and adapters
pub mod assets;
pub mod config;
pub mod homarr_client;
pub mod http_probe;
