// Port for checking that the cockpit tile points at a live service
use crate::domain::error::BrandingError;
use async_trait::async_trait;
use reqwest::Url;

#[async_trait]
pub trait ServiceProbe: Send + Sync {
    /// Succeeds when the target answers at all, whatever the HTTP status.
    async fn probe(&self, target: &Url) -> Result<(), BrandingError>;
}
