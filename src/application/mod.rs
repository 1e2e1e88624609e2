// Application layer - Onboarding use cases and the ports they depend on
pub mod onboarding_client;
pub mod onboarding_service;
pub mod service_probe;
