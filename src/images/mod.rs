//! Hero image resolution.
//!
//! The data set references hero images by their original web address. Those
//! addresses are not fetched; instead a closed table maps each known address
//! to an image bundled next to the application. The rest of the crate only
//! talks to the [`ImageResolver`] trait, so a network-backed loader can be
//! dropped in without touching the store or the filter.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::warn;

use crate::config::ImageConfig;
use crate::domain::HeroImageRef;

/// Image bytes ready for display, or the placeholder shown before (or instead
/// of) a successful resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageData {
    #[default]
    Placeholder,
    Loaded(Rc<[u8]>),
}

impl ImageData {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageData::Placeholder)
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            ImageData::Placeholder => &[],
            ImageData::Loaded(bytes) => bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to read image {name} at {path}: {source}")]
    Read {
        name: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Image {0} is empty")]
    Empty(String),
}

pub trait ImageResolver {
    /// Map a raw `hero_image` address to a reference, or `None` when the
    /// address is not resolvable by this resolver.
    fn lookup(&self, address: &str) -> Option<HeroImageRef>;

    /// Load the image behind a reference previously returned by `lookup`.
    fn resolve(&self, image: &HeroImageRef) -> Result<ImageData, ImageError>;
}

/// Resolve `image`, falling back to the placeholder on any failure.
pub fn resolve_or_placeholder(resolver: &dyn ImageResolver, image: &HeroImageRef) -> ImageData {
    match resolver.resolve(image) {
        Ok(data) => data,
        Err(e) => {
            warn!(image = %image, error = %e, "Using placeholder hero image");
            ImageData::Placeholder
        }
    }
}

/// Addresses used by the bundled article set and the asset each maps to.
pub fn default_table() -> BTreeMap<String, String> {
    [
        (
            "https://i.kinja-img.com/gawker-media/image/upload/s--swRlLlgJ--/c_scale,dpr_2.0,f_auto,fl_progressive,q_80,w_800/egad24b4d3w3qizatlba.jpg",
            "mcdonalds",
        ),
        (
            "https://cdn.arstechnica.net/wp-content/uploads/2019/02/singer2HR-800x480.jpg",
            "pluto",
        ),
        (
            "https://i2.wp.com/www.synthtopia.com/wp-content/uploads/2019/03/QuBit-Prism-closeup.jpeg?resize=708%2C300",
            "prism",
        ),
        (
            "https://cdn-images-1.medium.com/max/1200/1*B-6U0rpniq0HWs9KQIXbSg.jpeg",
            "customerSupport",
        ),
        (
            "https://media.npr.org/assets/img/2019/01/31/gettyimages-987348078_wide-ebdf36860dc41366f67f12b365e8ef54a4273bab-s700-c85.jpg",
            "sodas",
        ),
    ]
    .into_iter()
    .map(|(address, name)| (address.to_string(), name.to_string()))
    .collect()
}

/// Resolves addresses through an exact-match table to files in an asset
/// directory (`<assets_dir>/<name>.<extension>`).
#[derive(Debug, Clone)]
pub struct BundledImageResolver {
    assets_dir: PathBuf,
    extension: String,
    table: BTreeMap<String, String>,
}

impl BundledImageResolver {
    pub fn new(
        assets_dir: impl Into<PathBuf>,
        extension: impl Into<String>,
        table: BTreeMap<String, String>,
    ) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            extension: extension.into(),
            table,
        }
    }

    pub fn from_config(config: &ImageConfig, assets_dir: &Path) -> Self {
        Self::new(assets_dir, config.extension.clone(), config.table.clone())
    }

    fn asset_path(&self, image: &HeroImageRef) -> PathBuf {
        self.assets_dir
            .join(image.as_str())
            .with_extension(&self.extension)
    }
}

impl ImageResolver for BundledImageResolver {
    fn lookup(&self, address: &str) -> Option<HeroImageRef> {
        self.table.get(address).map(HeroImageRef::new)
    }

    fn resolve(&self, image: &HeroImageRef) -> Result<ImageData, ImageError> {
        let path = self.asset_path(image);
        let bytes = fs::read(&path).map_err(|e| ImageError::Read {
            name: image.to_string(),
            path,
            source: e,
        })?;

        if bytes.is_empty() {
            return Err(ImageError::Empty(image.to_string()));
        }

        Ok(ImageData::Loaded(bytes.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLUTO: &str = "https://cdn.arstechnica.net/wp-content/uploads/2019/02/singer2HR-800x480.jpg";

    fn resolver(dir: &Path) -> BundledImageResolver {
        BundledImageResolver::new(dir, "jpg", default_table())
    }

    #[test]
    fn test_lookup_known_address() {
        let dir = tempfile::tempdir().unwrap();
        let image = resolver(dir.path()).lookup(PLUTO).unwrap();
        assert_eq!(image.as_str(), "pluto");
    }

    #[test]
    fn test_lookup_is_exact_match() {
        let dir = tempfile::tempdir().unwrap();
        let r = resolver(dir.path());
        assert!(r
            .lookup("https://www.betterup.co/wp-content/uploads/2018/10/betterup-facebook-share.png")
            .is_none());
        assert!(r.lookup(&format!("{}?v=2", PLUTO)).is_none());
        assert!(r.lookup("").is_none());
    }

    #[test]
    fn test_resolve_reads_asset_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pluto.jpg"), b"jpeg bytes").unwrap();

        let data = resolver(dir.path())
            .resolve(&HeroImageRef::new("pluto"))
            .unwrap();
        assert_eq!(data.bytes(), b"jpeg bytes");
        assert!(!data.is_placeholder());
    }

    #[test]
    fn test_resolve_missing_asset_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolver(dir.path())
            .resolve(&HeroImageRef::new("prism"))
            .unwrap_err();
        assert!(matches!(err, ImageError::Read { .. }));
    }

    #[test]
    fn test_resolve_or_placeholder_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sodas.jpg"), b"").unwrap();

        let r = resolver(dir.path());
        assert!(resolve_or_placeholder(&r, &HeroImageRef::new("sodas")).is_placeholder());
        assert!(resolve_or_placeholder(&r, &HeroImageRef::new("missing")).is_placeholder());
    }

    #[test]
    fn test_default_table_has_bundled_assets() {
        let table = default_table();
        assert_eq!(table.len(), 5);
        let mut names: Vec<_> = table.values().map(String::as_str).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["customerSupport", "mcdonalds", "pluto", "prism", "sodas"]
        );
    }
}
