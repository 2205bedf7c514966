//! Upstream compose manifest: fetching and image extraction.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{ImageSyncError, Result};

/// Mapping from service name to image reference.
///
/// Built once per run from the parsed manifest and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageMap {
    images: BTreeMap<String, String>,
}

impl ImageMap {
    /// Image pinned for `service`, or `MissingImage` if the manifest has none.
    pub fn image_for(&self, service: &str) -> Result<&str> {
        self.get(service)
            .ok_or_else(|| ImageSyncError::MissingImage(service.to_string()))
    }

    pub fn get(&self, service: &str) -> Option<&str> {
        self.images.get(service).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.images.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<BTreeMap<String, String>> for ImageMap {
    fn from(images: BTreeMap<String, String>) -> Self {
        ImageMap { images }
    }
}

#[derive(Debug, Deserialize)]
struct ComposeFile {
    services: BTreeMap<String, Option<ComposeService>>,
}

#[derive(Debug, Deserialize)]
struct ComposeService {
    #[serde(default)]
    image: Option<String>,
}

/// Images extracted from a manifest plus the services that declare none.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedManifest {
    pub images: ImageMap,
    pub services_without_image: Vec<String>,
}

/// Parses a compose document of shape `{ services: { <name>: { image: <ref> } } }`.
///
/// Keys other than `services` and `image` are ignored. A document without a
/// `services` mapping is rejected.
pub fn parse_manifest(text: &str) -> Result<ParsedManifest> {
    let compose: ComposeFile = serde_yaml::from_str(text)?;

    let mut images = BTreeMap::new();
    let mut services_without_image = Vec::new();

    for (service, definition) in compose.services {
        match definition.and_then(|d| d.image) {
            Some(image) if !image.trim().is_empty() => {
                images.insert(service, image.trim().to_string());
            }
            _ => services_without_image.push(service),
        }
    }

    Ok(ParsedManifest {
        images: ImageMap::from(images),
        services_without_image,
    })
}

/// Where the manifest text comes from.
pub trait ManifestSource {
    /// Returns the raw manifest document.
    fn fetch_manifest(&self) -> Result<String>;

    /// Human-readable location, for progress output.
    fn describe(&self) -> String;
}

/// Downloads the manifest over HTTP(S).
pub struct HttpManifest {
    client: Client,
    url: String,
}

impl HttpManifest {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        HttpManifest {
            client,
            url: url.into(),
        }
    }
}

impl ManifestSource for HttpManifest {
    fn fetch_manifest(&self) -> Result<String> {
        tracing::debug!(url = %self.url, "fetching manifest");

        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImageSyncError::manifest(format!(
                "GET {} returned {}",
                self.url, status
            )));
        }

        Ok(response.text()?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the manifest from a local file.
pub struct FileManifest {
    path: PathBuf,
}

impl FileManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileManifest { path: path.into() }
    }
}

impl ManifestSource for FileManifest {
    fn fetch_manifest(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            ImageSyncError::manifest(format!("cannot read {}: {}", self.path.display(), e))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
