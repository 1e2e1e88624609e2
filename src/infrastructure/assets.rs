// Installed asset checks
use crate::domain::branding::Branding;
use crate::domain::error::BrandingError;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedAssets {
    pub logo: PathBuf,
    pub favicon: PathBuf,
}

/// Relative paths are taken from the asset directory, absolute ones as-is.
pub fn resolve_asset(asset_dir: &Path, path: &Path) -> PathBuf {
    asset_dir.join(path)
}

/// Check that the logo and favicon exist as regular files.
pub fn verify_assets(branding: &Branding, asset_dir: &Path) -> Result<VerifiedAssets, BrandingError> {
    let logo = verify_file("identity.logo_path", asset_dir, &branding.identity.logo_path)?;
    let favicon = verify_file("identity.favicon_path", asset_dir, &branding.identity.favicon_path)?;
    Ok(VerifiedAssets { logo, favicon })
}

/// Path of an installed asset relative to the asset directory, which is what
/// the dashboard serves. `None` when the asset lives elsewhere.
pub fn served_path(asset_dir: &Path, resolved: &Path) -> Option<PathBuf> {
    let relative = resolved.strip_prefix(asset_dir).ok()?;
    let inside = relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    (inside && !relative.as_os_str().is_empty()).then(|| relative.to_path_buf())
}

/// Check that verified assets can be served from the asset directory.
pub fn require_served(assets: &VerifiedAssets, asset_dir: &Path) -> Result<(), BrandingError> {
    for (field, path) in [
        ("identity.logo_path", &assets.logo),
        ("identity.favicon_path", &assets.favicon),
    ] {
        if served_path(asset_dir, path).is_none() {
            return Err(BrandingError::AssetNotServed {
                field,
                path: path.clone(),
                asset_dir: asset_dir.to_path_buf(),
            });
        }
    }
    Ok(())
}

fn verify_file(field: &'static str, asset_dir: &Path, path: &Path) -> Result<PathBuf, BrandingError> {
    let resolved = resolve_asset(asset_dir, path);
    if resolved.is_file() {
        tracing::debug!("{} resolved to {}", field, resolved.display());
        Ok(resolved)
    } else {
        Err(BrandingError::MissingAsset {
            field,
            path: resolved,
        })
    }
}
