// Onboarding plan domain model
use super::branding::{BoardLayout, Branding, ThemeMode, TileType};
use super::color::Color;
use super::secret::Secret;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Ordered list of dashboard calls that turn a fresh Homarr into a branded one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingPlan {
    pub steps: Vec<OnboardingStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum OnboardingStep {
    CreateAdmin { username: String, password: Secret },
    ApplyTheme(ThemeSettings),
    CreateBoard(BoardSpec),
    SetHomepage { board: String },
    ApplySettings {
        analytics: AnalyticsSettings,
        crawling: CrawlingSettings,
    },
}

impl OnboardingStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateAdmin { .. } => "create_admin",
            Self::ApplyTheme(_) => "apply_theme",
            Self::CreateBoard(_) => "create_board",
            Self::SetHomepage { .. } => "set_homepage",
            Self::ApplySettings { .. } => "apply_settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeSettings {
    pub product_name: String,
    pub mode: ThemeMode,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub logo: PathBuf,
    pub favicon: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSpec {
    pub name: String,
    pub layout: BoardLayout,
    pub columns: u32,
    pub tile: TileSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSpec {
    pub title: String,
    pub kind: TileType,
    pub href: String,
}

/// Homarr's `analytics` server setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSettings {
    pub enable_general: bool,
    pub enable_widget_data: bool,
    pub enable_integration_data: bool,
    pub enable_user_data: bool,
}

impl AnalyticsSettings {
    pub fn all(enabled: bool) -> Self {
        Self {
            enable_general: enabled,
            enable_widget_data: enabled,
            enable_integration_data: enabled,
            enable_user_data: enabled,
        }
    }
}

/// Homarr's `crawlingAndIndexing` server setting. The flags are negative,
/// so allowing crawlers clears all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlingSettings {
    pub no_index: bool,
    pub no_follow: bool,
    pub no_translate: bool,
    pub no_site_links_search_box: bool,
}

impl CrawlingSettings {
    pub fn allow(enabled: bool) -> Self {
        Self {
            no_index: !enabled,
            no_follow: !enabled,
            no_translate: !enabled,
            no_site_links_search_box: !enabled,
        }
    }
}

const COCKPIT_TILE_TITLE: &str = "Cockpit";

impl OnboardingPlan {
    /// Build the plan. Asset paths are resolved against `asset_dir`.
    pub fn from_branding(branding: &Branding, asset_dir: &Path) -> Self {
        let identity = &branding.identity;
        let board = &branding.board;

        let steps = vec![
            OnboardingStep::CreateAdmin {
                username: branding.credentials.username.clone(),
                password: branding.credentials.password.clone(),
            },
            OnboardingStep::ApplyTheme(ThemeSettings {
                product_name: identity.name.clone(),
                mode: branding.theme.mode,
                primary_color: branding.theme.primary_color.clone(),
                secondary_color: branding.theme.secondary_color.clone(),
                logo: asset_dir.join(&identity.logo_path),
                favicon: asset_dir.join(&identity.favicon_path),
            }),
            OnboardingStep::CreateBoard(BoardSpec {
                name: board.name.clone(),
                layout: board.layout,
                columns: board.columns.get(),
                tile: TileSpec {
                    title: COCKPIT_TILE_TITLE.to_string(),
                    kind: board.cockpit.tile_type,
                    href: board.cockpit.target.to_string(),
                },
            }),
            OnboardingStep::SetHomepage {
                board: board.name.clone(),
            },
            OnboardingStep::ApplySettings {
                analytics: AnalyticsSettings::all(branding.settings.analytics_enabled),
                crawling: CrawlingSettings::allow(branding.settings.crawling_enabled),
            },
        ];

        Self { steps }
    }
}
