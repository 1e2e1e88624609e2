// Theme color values
use serde::Serialize;

pub const COLOR_FORMS: &str = "expected #rgb, #rrggbb or #rrggbbaa";

/// A hex color, normalized to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn parse(value: &str) -> Option<Self> {
        let digits = value.trim().strip_prefix('#')?;
        if !matches!(digits.len(), 3 | 6 | 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
