// Branding domain model
use super::color::Color;
use super::secret::Secret;
use reqwest::Url;
use serde::{Serialize, Serializer};
use std::num::NonZeroU32;
use std::path::PathBuf;

pub const DEFAULT_PRIMARY_COLOR: &str = "#fa5252";
pub const DEFAULT_SECONDARY_COLOR: &str = "#fd7e14";
pub const DEFAULT_BOARD_COLUMNS: NonZeroU32 = NonZeroU32::new(10).unwrap();
pub const DEFAULT_COCKPIT_TARGET: &str = "http://localhost:9090";

/// A fully validated `branding.toml`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branding {
    pub identity: Identity,
    pub theme: Theme,
    pub credentials: Credentials,
    pub board: Board,
    pub settings: Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identity {
    pub name: String,
    pub logo_path: PathBuf,
    pub favicon_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub mode: ThemeMode,
    pub primary_color: Color,
    pub secondary_color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub const ALLOWED: &'static [&'static str] = &["dark", "light"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }
}

/// Admin account created on first boot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: Secret,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Board {
    pub name: String,
    pub layout: BoardLayout,
    pub columns: NonZeroU32,
    pub cockpit: CockpitTile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardLayout {
    #[default]
    Grid,
    List,
}

impl BoardLayout {
    pub const ALLOWED: &'static [&'static str] = &["grid", "list"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "grid" => Some(Self::Grid),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
        }
    }
}

/// The tile linking the board to the Cockpit web console.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CockpitTile {
    pub tile_type: TileType,
    #[serde(serialize_with = "serialize_url")]
    pub target: Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    #[default]
    App,
    Iframe,
}

impl TileType {
    pub const ALLOWED: &'static [&'static str] = &["app", "iframe"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "app" => Some(Self::App),
            "iframe" => Some(Self::Iframe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Iframe => "iframe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Settings {
    pub analytics_enabled: bool,
    pub crawling_enabled: bool,
}

fn serialize_url<S: Serializer>(url: &Url, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(url.as_str())
}
