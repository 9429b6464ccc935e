//! Image lookup collaborator. Failures never abort a request; callers store
//! `None` instead of a link.

use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageLookupError {
    #[error("image lookup is disabled")]
    Disabled,
    #[error("invalid image search URL: {0}")]
    InvalidUrl(String),
}

pub trait ImageLookup: Send + Sync {
    fn lookup(&self, recipe_name: &str) -> Result<String, ImageLookupError>;

    /// Lookup with failures mapped to "no image".
    fn image_link(&self, recipe_name: &str) -> Option<String> {
        match self.lookup(recipe_name) {
            Ok(link) => Some(link),
            Err(err) => {
                tracing::debug!(recipe = recipe_name, error = %err, "no image for recipe");
                None
            }
        }
    }
}

/// Lookup that never finds an image.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageLookup for NoImages {
    fn lookup(&self, _recipe_name: &str) -> Result<String, ImageLookupError> {
        Err(ImageLookupError::Disabled)
    }
}

/// Builds an image-search link from a base URL, e.g.
/// `https://www.bing.com/images/search` + `?q=<recipe name>`.
#[derive(Debug, Clone)]
pub struct SearchUrlImages {
    base_url: String,
}

impl SearchUrlImages {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl ImageLookup for SearchUrlImages {
    fn lookup(&self, recipe_name: &str) -> Result<String, ImageLookupError> {
        let url = Url::parse_with_params(&self.base_url, &[("q", recipe_name)])
            .map_err(|e| ImageLookupError::InvalidUrl(e.to_string()))?;
        Ok(url.to_string())
    }
}
