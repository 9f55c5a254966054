//! Scene source classification.

use std::fmt;
use std::path::PathBuf;

use url::Url;

/// Where a scene is loaded from.
///
/// Hosts pass a single string; it is either an absolute URL (remote scene
/// or `file://`) or a bundled asset path. Scenes packaged as `.zip`
/// archives are extracted by the engine before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSource {
    /// An absolute URL (`http`, `https` or `file`).
    Remote(Url),

    /// A path into the host's bundled assets.
    Asset(PathBuf),
}

impl SceneSource {
    /// Classifies a caller-supplied scene string.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("scene url is empty".into());
        }

        match Url::parse(trimmed) {
            Ok(url) => match url.scheme() {
                "http" | "https" | "file" => Ok(Self::Remote(url)),
                scheme => Err(format!("unsupported scheme: {scheme}")),
            },
            // Not an absolute URL: treat it as a bundled asset path.
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::Asset(PathBuf::from(trimmed))),
            Err(e) => Err(format!("invalid scene url: {e}")),
        }
    }

    /// Returns true if the scene is packaged as a zip archive.
    pub fn is_archive(&self) -> bool {
        match self {
            Self::Remote(url) => url.path().ends_with(".zip"),
            Self::Asset(path) => path.extension().is_some_and(|ext| ext == "zip"),
        }
    }
}

impl fmt::Display for SceneSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Asset(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_https_url() {
        let source = SceneSource::parse("https://cdn.example.com/scenes/intro.json").unwrap();
        assert!(matches!(source, SceneSource::Remote(_)));
        assert!(!source.is_archive());
    }

    #[test]
    fn test_parse_asset_path() {
        let source = SceneSource::parse("assets/animations/confetti.json").unwrap();
        assert_eq!(
            source,
            SceneSource::Asset(PathBuf::from("assets/animations/confetti.json"))
        );
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(SceneSource::parse("").is_err());
        assert!(SceneSource::parse("   ").is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_scheme() {
        assert!(SceneSource::parse("ftp://example.com/scene.json").is_err());
    }

    #[test]
    fn test_archive_detection() {
        let remote = SceneSource::parse("https://cdn.example.com/scenes/pack.zip").unwrap();
        assert!(remote.is_archive());

        let asset = SceneSource::parse("assets/pack.zip").unwrap();
        assert!(asset.is_archive());
    }
}
