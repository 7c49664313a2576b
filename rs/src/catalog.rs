//! Catalog sources
//!
//! The engine never fetches products itself. A [`CatalogSource`] hands it the
//! candidate gifts for one search, either from JSON on disk or from memory.

use crate::models::Gift;
use anyhow::Context;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Catalog-specific errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog path not found: {}", .path.display())]
    NotFound { path: PathBuf },
}

/// Supplies the candidate gifts for a search
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load_catalog(&self) -> crate::Result<Vec<Gift>>;
}

/// Catalog stored as JSON on disk
///
/// The path is either a single file holding a JSON array of gifts, or a
/// directory of `*.json` files holding one gift each.
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_file(path: &Path) -> Result<Vec<Gift>, CatalogError> {
        let content = fs::read_to_string(path).await?;
        let gifts: Vec<Gift> = serde_json::from_str(&content)?;
        Ok(gifts)
    }

    async fn load_gift(path: &Path) -> Result<Gift, CatalogError> {
        let content = fs::read_to_string(path).await?;
        let gift: Gift = serde_json::from_str(&content)?;
        Ok(gift)
    }

    /// Load every `*.json` gift in the directory; unreadable files are skipped
    async fn load_directory(dir: &Path) -> Result<Vec<Gift>, CatalogError> {
        let mut paths = Vec::new();
        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        let mut gifts = Vec::with_capacity(paths.len());
        for path in paths {
            match Self::load_gift(&path).await {
                Ok(gift) => gifts.push(gift),
                Err(e) => {
                    tracing::warn!("Skipping catalog entry {}: {}", path.display(), e);
                }
            }
        }
        Ok(gifts)
    }
}

#[async_trait]
impl CatalogSource for FileCatalog {
    async fn load_catalog(&self) -> crate::Result<Vec<Gift>> {
        if !fs::try_exists(&self.path).await.unwrap_or(false) {
            return Err(CatalogError::NotFound {
                path: self.path.clone(),
            }
            .into());
        }

        let start = std::time::Instant::now();
        let metadata = fs::metadata(&self.path)
            .await
            .with_context(|| format!("Failed to stat catalog {}", self.path.display()))?;

        let gifts = if metadata.is_dir() {
            Self::load_directory(&self.path).await
        } else {
            Self::load_file(&self.path).await
        }
        .with_context(|| format!("Failed to load catalog from {}", self.path.display()))?;

        tracing::info!(
            "Loaded {} gifts from {} in {:?}",
            gifts.len(),
            self.path.display(),
            start.elapsed()
        );
        Ok(gifts)
    }
}

/// Catalog held in memory, for tests and embedding hosts
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    gifts: Vec<Gift>,
}

impl InMemoryCatalog {
    pub fn new(gifts: Vec<Gift>) -> Self {
        Self { gifts }
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn load_catalog(&self) -> crate::Result<Vec<Gift>> {
        Ok(self.gifts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TWO_GIFTS: &str = r#"[
        {"productName": "Yoga mat", "description": "Kurk", "priceRange": "€40", "tags": ["yoga"]},
        {"productName": "Smart speaker", "priceRange": "€25-€50", "rating": 4.4, "reviews": 120}
    ]"#;

    #[tokio::test]
    async fn test_load_array_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        std::fs::write(&path, TWO_GIFTS).unwrap();

        let gifts = FileCatalog::new(&path).load_catalog().await.unwrap();
        assert_eq!(gifts.len(), 2);
        assert_eq!(gifts[0].product_name, "Yoga mat");
        assert_eq!(gifts[1].review_count, Some(120));
        assert!(gifts[1].retailers.is_empty());
    }

    #[tokio::test]
    async fn test_load_directory_skips_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("b.json"),
            r#"{"productName": "Boek", "priceRange": "€15"}"#,
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("a.json"),
            r#"{"productName": "Agenda", "priceRange": "€20"}"#,
        )
        .unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let gifts = FileCatalog::new(temp_dir.path()).load_catalog().await.unwrap();
        let names: Vec<_> = gifts.iter().map(|g| g.product_name.as_str()).collect();
        assert_eq!(names, vec!["Agenda", "Boek"]);
    }

    #[tokio::test]
    async fn test_missing_path_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileCatalog::new(temp_dir.path().join("nope.json"))
            .load_catalog()
            .await;
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_array_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        std::fs::write(&path, r#"{"productName": "not an array"}"#).unwrap();

        assert!(FileCatalog::new(&path).load_catalog().await.is_err());
    }

    #[tokio::test]
    async fn test_in_memory_catalog() {
        let catalog = InMemoryCatalog::new(vec![Gift::new("Sokken", "", "€10")]);
        let gifts = catalog.load_catalog().await.unwrap();
        assert_eq!(gifts.len(), 1);
        assert!(InMemoryCatalog::default().load_catalog().await.unwrap().is_empty());
    }
}
