// Dashboard API key in Homarr's `{id}.{token}` format
use super::error::OnboardingError;
use super::secret::Secret;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiKey {
    pub id: String,
    token: Secret,
}

impl ApiKey {
    pub fn parse(raw: &str) -> Result<Self, OnboardingError> {
        let raw = raw.trim();
        let (id, token) = raw
            .split_once('.')
            .ok_or_else(|| OnboardingError::InvalidApiKey("expected <id>.<token>".to_string()))?;

        if id.is_empty() || token.is_empty() {
            return Err(OnboardingError::InvalidApiKey(
                "id and token must both be non-empty".to_string(),
            ));
        }

        Ok(Self {
            id: id.to_string(),
            token: Secret::new(token),
        })
    }

    /// Value for the `ApiKey` request header.
    pub fn header_value(&self) -> String {
        format!("{}.{}", self.id, self.token.expose())
    }
}
