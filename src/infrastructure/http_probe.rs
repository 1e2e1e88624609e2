// HTTP reachability check
use crate::application::service_probe::ServiceProbe;
use crate::domain::error::BrandingError;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        // Cockpit ships a self-signed certificate; reachability is all we check
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ServiceProbe for HttpProbe {
    async fn probe(&self, target: &Url) -> Result<(), BrandingError> {
        tracing::debug!("Probing {}", target);

        match self.client.get(target.clone()).send().await {
            Ok(response) => {
                tracing::debug!("{} answered with {}", target, response.status());
                Ok(())
            }
            Err(e) => Err(BrandingError::Unreachable {
                target: target.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
