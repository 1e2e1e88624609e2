// Branding contract for the Homarr first-boot onboarding adapter
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
