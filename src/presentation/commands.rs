// Command handlers
use crate::application::onboarding_service::OnboardingService;
use crate::application::service_probe::ServiceProbe;
use crate::domain::api_key::ApiKey;
use crate::domain::branding::Branding;
use crate::domain::onboarding::OnboardingPlan;
use crate::infrastructure::assets::{require_served, verify_assets};
use crate::infrastructure::config::{load_adapter_settings, load_branding};
use crate::infrastructure::homarr_client::HomarrClient;
use crate::infrastructure::http_probe::HttpProbe;
use crate::presentation::cli::{Cli, Commands};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let branding = load_branding(&cli.config)
        .with_context(|| format!("invalid branding document {}", cli.config.display()))?;

    match cli.command {
        Commands::Validate { check_assets, probe } => {
            if check_assets {
                let assets = verify_assets(&branding, &cli.asset_dir)?;
                require_served(&assets, &cli.asset_dir)?;
            }
            if probe {
                let prober = HttpProbe::new(PROBE_TIMEOUT)?;
                prober.probe(&branding.board.cockpit.target).await?;
            }
            println!("{}: ok", cli.config.display());
        }
        Commands::Show => println!("{}", render_branding(&branding)?),
        Commands::Plan => println!("{}", render_plan(&branding, &cli.asset_dir)?),
        Commands::Apply => apply(&branding, &cli.asset_dir).await?,
    }

    Ok(())
}

/// Normalized document as pretty JSON. The password is redacted.
pub fn render_branding(branding: &Branding) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(branding)?)
}

pub fn render_plan(branding: &Branding, asset_dir: &Path) -> anyhow::Result<String> {
    let plan = OnboardingPlan::from_branding(branding, asset_dir);
    Ok(serde_json::to_string_pretty(&plan)?)
}

async fn apply(branding: &Branding, asset_dir: &Path) -> anyhow::Result<()> {
    // The dashboard can only load assets from the directory it serves
    let assets = verify_assets(branding, asset_dir)?;
    require_served(&assets, asset_dir)?;

    let settings = load_adapter_settings().context("failed to load adapter settings")?;
    let raw_key = std::fs::read_to_string(&settings.api_key_file)
        .with_context(|| format!("failed to read API key from {}", settings.api_key_file.display()))?;
    let api_key = ApiKey::parse(&raw_key)?;

    tracing::info!("Applying branding to {} with key {}", settings.dashboard_url, api_key.id);

    let client = HomarrClient::new(
        settings.dashboard_url,
        api_key,
        asset_dir.to_path_buf(),
        settings.asset_url_base,
        Duration::from_secs(settings.request_timeout_secs),
    )?;
    let service = OnboardingService::new(Arc::new(client));

    let plan = OnboardingPlan::from_branding(branding, asset_dir);
    let report = service.apply(&plan).await?;

    println!(
        "onboarding complete: {} steps, home board {}",
        report.completed.len(),
        report.home_board_id.as_deref().unwrap_or("-")
    );
    Ok(())
}
