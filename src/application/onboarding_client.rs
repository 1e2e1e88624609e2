// Port for the dashboard's onboarding API
use crate::domain::error::OnboardingError;
use crate::domain::onboarding::{AnalyticsSettings, BoardSpec, CrawlingSettings, ThemeSettings};
use crate::domain::secret::Secret;
use async_trait::async_trait;

#[async_trait]
pub trait OnboardingClient: Send + Sync {
    async fn create_admin(&self, username: &str, password: &Secret) -> Result<(), OnboardingError>;

    async fn apply_theme(&self, theme: &ThemeSettings) -> Result<(), OnboardingError>;

    /// Create the board with its tile and return the dashboard's id for it
    async fn create_board(&self, board: &BoardSpec) -> Result<String, OnboardingError>;

    async fn set_homepage(&self, board_id: &str) -> Result<(), OnboardingError>;

    async fn apply_settings(
        &self,
        analytics: &AnalyticsSettings,
        crawling: &CrawlingSettings,
    ) -> Result<(), OnboardingError>;
}
