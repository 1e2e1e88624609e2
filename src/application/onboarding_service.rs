// Onboarding service - Use case for applying a plan to the dashboard
use crate::application::onboarding_client::OnboardingClient;
use crate::domain::error::OnboardingError;
use crate::domain::onboarding::{OnboardingPlan, OnboardingStep};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OnboardingReport {
    pub completed: Vec<&'static str>,
    pub home_board_id: Option<String>,
}

#[derive(Clone)]
pub struct OnboardingService {
    client: Arc<dyn OnboardingClient>,
}

impl OnboardingService {
    pub fn new(client: Arc<dyn OnboardingClient>) -> Self {
        Self { client }
    }

    /// Run every step in order and stop at the first failure. No retries.
    pub async fn apply(&self, plan: &OnboardingPlan) -> Result<OnboardingReport, OnboardingError> {
        let mut report = OnboardingReport::default();
        let mut board_ids: HashMap<String, String> = HashMap::new();

        for step in &plan.steps {
            tracing::info!("Onboarding step {}", step.name());

            self.run_step(step, &mut board_ids, &mut report)
                .await
                .map_err(|source| {
                    tracing::error!("Onboarding step {} failed: {}", step.name(), source);
                    OnboardingError::Step {
                        step: step.name(),
                        source: Box::new(source),
                    }
                })?;

            report.completed.push(step.name());
        }

        tracing::info!("Onboarding finished after {} steps", report.completed.len());
        Ok(report)
    }

    async fn run_step(
        &self,
        step: &OnboardingStep,
        board_ids: &mut HashMap<String, String>,
        report: &mut OnboardingReport,
    ) -> Result<(), OnboardingError> {
        match step {
            OnboardingStep::CreateAdmin { username, password } => {
                self.client.create_admin(username, password).await
            }
            OnboardingStep::ApplyTheme(theme) => self.client.apply_theme(theme).await,
            OnboardingStep::CreateBoard(board) => {
                let id = self.client.create_board(board).await?;
                tracing::debug!("Board {} created with id {}", board.name, id);
                board_ids.insert(board.name.clone(), id);
                Ok(())
            }
            OnboardingStep::SetHomepage { board } => {
                let id = board_ids
                    .get(board)
                    .ok_or_else(|| OnboardingError::UnknownBoard(board.clone()))?;
                self.client.set_homepage(id).await?;
                report.home_board_id = Some(id.clone());
                Ok(())
            }
            OnboardingStep::ApplySettings {
                analytics,
                crawling,
            } => self.client.apply_settings(analytics, crawling).await,
        }
    }
}
