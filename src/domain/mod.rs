// Domain layer - Branding document and onboarding plan
pub mod api_key;
pub mod branding;
pub mod color;
pub mod error;
pub mod onboarding;
pub mod secret;
