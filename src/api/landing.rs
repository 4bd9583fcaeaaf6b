//! Landing page data, fetched as a fan-out that tolerates partial failure.

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use crate::domain::aggregates::{CategoryNode, FilterState, Product};
use crate::domain::value_objects::SortOption;
use super::{ApiError, CatalogApi};

/// One independently loaded part of a page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded(T),
    Failed(String),
}

impl<T> From<Result<T, ApiError>> for Section<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(v) => Self::Loaded(v),
            Err(e) => {
                tracing::warn!(error = %e, "landing section failed");
                Self::Failed(e.to_string())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Landing {
    pub featured: Section<Vec<Product>>,
    pub categories: Section<Vec<CategoryNode>>,
    pub brands: Section<Vec<String>>,
}

/// Issues every landing request at once and waits for all of them. Returns
/// `None` if `cancel` fires first, so a caller that went away never receives
/// stale data.
pub async fn load_landing(api: &dyn CatalogApi, featured_count: usize, cancel: &CancellationToken) -> Option<Landing> {
    let featured = async {
        api.search(&FilterState::default(), SortOption::Relevance, featured_count).await.map(|r| r.into_items())
    };
    let all = futures::future::join3(featured, api.categories(), api.brands());
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("landing load cancelled");
            None
        }
        (featured, categories, brands) = all => Some(Landing {
            featured: featured.into(),
            categories: categories.into(),
            brands: brands.into(),
        }),
    }
}
