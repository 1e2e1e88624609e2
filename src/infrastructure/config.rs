// Configuration loading: the branding document and the adapter's runtime settings
use crate::domain::branding::{
    Board, BoardLayout, Branding, CockpitTile, Credentials, DEFAULT_BOARD_COLUMNS,
    DEFAULT_COCKPIT_TARGET, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR, Identity, Settings,
    Theme, ThemeMode, TileType,
};
use crate::domain::color::{COLOR_FORMS, Color};
use crate::domain::error::BrandingError;
use crate::domain::secret::Secret;
use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

pub const BRANDING_CONFIG_PATH: &str = "/etc/halos-homarr-branding/branding.toml";
pub const ASSET_DIR: &str = "/usr/share/halos-homarr-branding";
pub const ADAPTER_SETTINGS_PATH: &str = "/etc/halos-homarr-branding/adapter";
pub const ENV_PREFIX: &str = "HOMARR_BRANDING";

// Raw document as written on disk. Every field is optional here so that
// absence can be reported as a missing section/field instead of a serde error.

#[derive(Debug, Deserialize)]
struct RawDocument {
    identity: Option<RawIdentity>,
    theme: Option<RawTheme>,
    credentials: Option<RawCredentials>,
    board: Option<RawBoard>,
    settings: Option<RawSettings>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawIdentity {
    name: Option<String>,
    logo_path: Option<PathBuf>,
    favicon_path: Option<PathBuf>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawTheme {
    mode: Option<String>,
    primary_color: Option<String>,
    secondary_color: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawCredentials {
    username: Option<String>,
    password: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawBoard {
    name: Option<String>,
    layout: Option<String>,
    columns: Option<i64>,
    cockpit: Option<RawCockpit>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

impl RawBoard {
    /// A `[board.cockpit]` header creates the `board` table on its own; without
    /// any board field of its own it does not count as a `[board]` section.
    fn is_implicit(&self) -> bool {
        self.name.is_none()
            && self.layout.is_none()
            && self.columns.is_none()
            && self.unknown.is_empty()
            && self.cockpit.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct RawCockpit {
    tile_type: Option<String>,
    target: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    analytics_enabled: Option<bool>,
    crawling_enabled: Option<bool>,
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

/// Parse and validate a branding document. Pure: no filesystem or network access.
pub fn parse_branding(text: &str) -> Result<Branding, BrandingError> {
    let raw: RawDocument = toml::from_str(text)?;
    warn_unknown("", &raw.unknown);

    let identity = raw.identity.ok_or(BrandingError::MissingSection("identity"))?;
    let credentials = raw.credentials.ok_or(BrandingError::MissingSection("credentials"))?;
    let board = raw
        .board
        .filter(|board| !board.is_implicit())
        .ok_or(BrandingError::MissingSection("board"))?;

    Ok(Branding {
        identity: build_identity(identity)?,
        theme: build_theme(raw.theme)?,
        credentials: build_credentials(credentials)?,
        board: build_board(board)?,
        settings: build_settings(raw.settings),
    })
}

/// Read the branding document from disk and validate it.
pub fn load_branding(path: &Path) -> Result<Branding, BrandingError> {
    let text = std::fs::read_to_string(path).map_err(|source| BrandingError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded {} bytes of branding from {}", text.len(), path.display());
    parse_branding(&text)
}

fn build_identity(raw: RawIdentity) -> Result<Identity, BrandingError> {
    warn_unknown("identity", &raw.unknown);

    let name = required_text("identity.name", raw.name)?;
    let logo_path = raw.logo_path.ok_or(BrandingError::MissingField {
        section: "identity",
        field: "logo_path",
    })?;
    let favicon_path = raw.favicon_path.ok_or(BrandingError::MissingField {
        section: "identity",
        field: "favicon_path",
    })?;

    if logo_path.as_os_str().is_empty() {
        return Err(BrandingError::invalid("identity.logo_path", "", "must not be empty"));
    }
    if favicon_path.as_os_str().is_empty() {
        return Err(BrandingError::invalid("identity.favicon_path", "", "must not be empty"));
    }

    Ok(Identity {
        name,
        logo_path,
        favicon_path,
    })
}

fn build_theme(raw: Option<RawTheme>) -> Result<Theme, BrandingError> {
    let raw = raw.unwrap_or_else(|| {
        tracing::debug!("No [theme] section, using defaults");
        RawTheme {
            mode: None,
            primary_color: None,
            secondary_color: None,
            unknown: BTreeMap::new(),
        }
    });
    warn_unknown("theme", &raw.unknown);

    let mode = match raw.mode {
        Some(mode) => ThemeMode::parse(&mode)
            .ok_or_else(|| BrandingError::invalid("theme.mode", &mode, one_of(ThemeMode::ALLOWED)))?,
        None => ThemeMode::default(),
    };

    Ok(Theme {
        mode,
        primary_color: color("theme.primary_color", raw.primary_color, DEFAULT_PRIMARY_COLOR)?,
        secondary_color: color("theme.secondary_color", raw.secondary_color, DEFAULT_SECONDARY_COLOR)?,
    })
}

fn build_credentials(raw: RawCredentials) -> Result<Credentials, BrandingError> {
    warn_unknown("credentials", &raw.unknown);

    let username = required_text("credentials.username", raw.username)?;
    let password = raw.password.ok_or(BrandingError::MissingField {
        section: "credentials",
        field: "password",
    })?;

    // Never echo the password back in the error
    if password.is_empty() {
        return Err(BrandingError::invalid("credentials.password", "", "must not be empty"));
    }

    Ok(Credentials {
        username,
        password: Secret::new(password),
    })
}

fn build_board(raw: RawBoard) -> Result<Board, BrandingError> {
    warn_unknown("board", &raw.unknown);

    let name = required_text("board.name", raw.name)?;

    let layout = match raw.layout {
        Some(layout) => BoardLayout::parse(&layout)
            .ok_or_else(|| BrandingError::invalid("board.layout", &layout, one_of(BoardLayout::ALLOWED)))?,
        None => BoardLayout::default(),
    };

    let columns = match raw.columns {
        Some(columns) if columns <= 0 => {
            return Err(BrandingError::invalid("board.columns", columns, "must be a positive integer"));
        }
        Some(columns) => u32::try_from(columns)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| {
                BrandingError::invalid("board.columns", columns, format!("out of range, at most {}", u32::MAX))
            })?,
        None => DEFAULT_BOARD_COLUMNS,
    };

    Ok(Board {
        name,
        layout,
        columns,
        cockpit: build_cockpit(raw.cockpit)?,
    })
}

fn build_cockpit(raw: Option<RawCockpit>) -> Result<CockpitTile, BrandingError> {
    let raw = raw.unwrap_or_else(|| {
        tracing::debug!("No [board.cockpit] section, using defaults");
        RawCockpit {
            tile_type: None,
            target: None,
            unknown: BTreeMap::new(),
        }
    });
    warn_unknown("board.cockpit", &raw.unknown);

    let tile_type = match raw.tile_type {
        Some(tile_type) => TileType::parse(&tile_type).ok_or_else(|| {
            BrandingError::invalid("board.cockpit.tile_type", &tile_type, one_of(TileType::ALLOWED))
        })?,
        None => TileType::default(),
    };

    let target = raw.target.unwrap_or_else(|| DEFAULT_COCKPIT_TARGET.to_string());
    let url = Url::parse(&target)
        .map_err(|e| BrandingError::invalid("board.cockpit.target", &target, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(BrandingError::invalid(
            "board.cockpit.target",
            &target,
            "must be an absolute http(s) URL",
        ));
    }

    Ok(CockpitTile {
        tile_type,
        target: url,
    })
}

fn build_settings(raw: Option<RawSettings>) -> Settings {
    let Some(raw) = raw else {
        tracing::debug!("No [settings] section, analytics and crawling stay disabled");
        return Settings::default();
    };
    warn_unknown("settings", &raw.unknown);

    Settings {
        analytics_enabled: raw.analytics_enabled.unwrap_or(false),
        crawling_enabled: raw.crawling_enabled.unwrap_or(false),
    }
}

/// `path` is `section.field`.
fn required_text(path: &'static str, value: Option<String>) -> Result<String, BrandingError> {
    let (section, field) = path.split_once('.').unwrap_or(("", path));
    let value = value.ok_or(BrandingError::MissingField { section, field })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BrandingError::invalid(path, &value, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn color(field: &'static str, value: Option<String>, default: &str) -> Result<Color, BrandingError> {
    let value = value.unwrap_or_else(|| default.to_string());
    Color::parse(&value).ok_or_else(|| BrandingError::invalid(field, &value, COLOR_FORMS))
}

fn one_of(allowed: &[&str]) -> String {
    format!("expected one of: {}", allowed.join(", "))
}

fn warn_unknown(section: &str, unknown: &BTreeMap<String, toml::Value>) {
    for key in unknown.keys() {
        if section.is_empty() {
            tracing::warn!("Ignoring unrecognized section or key `{}`", key);
        } else {
            tracing::warn!("Ignoring unrecognized key `{}` in [{}]", key, section);
        }
    }
}

/// Runtime settings for talking to the dashboard.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AdapterSettings {
    pub dashboard_url: String,
    pub api_key_file: PathBuf,
    pub asset_url_base: String,
    pub request_timeout_secs: u64,
}

pub fn load_adapter_settings() -> anyhow::Result<AdapterSettings> {
    build_adapter_settings(
        Path::new(ADAPTER_SETTINGS_PATH),
        config::Environment::with_prefix(ENV_PREFIX),
    )
}

/// `file` is given without extension; any format `config` knows is accepted.
fn build_adapter_settings(
    file: &Path,
    environment: config::Environment,
) -> anyhow::Result<AdapterSettings> {
    let settings = config::Config::builder()
        .set_default("dashboard_url", "http://localhost:7575")?
        .set_default("api_key_file", "/var/lib/homarr-container-adapter/bootstrap-api-key")?
        .set_default("asset_url_base", "/branding")?
        .set_default("request_timeout_secs", 10_i64)?
        .add_source(config::File::with_name(&file.to_string_lossy()).required(false))
        .add_source(environment.try_parsing(true))
        .build()?;

    Ok(settings.try_deserialize()?)
}
