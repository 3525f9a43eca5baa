//! Process-wide state shared by the HTTP handlers and the CLI.
//!
//! Startup never fails because of the catalog or the embedding model: a
//! missing catalog file yields an empty catalog, and an unavailable model
//! leaves the coach in rule-based mode. Both are logged.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::embedding::{create_provider, EmbeddingProvider};
use crate::index::EmbeddingIndex;
use crate::loader::load_catalog;

/// An embedding provider paired with the index it produced.
pub struct Retrieval {
    pub provider: Arc<dyn EmbeddingProvider>,
    pub index: EmbeddingIndex,
}

/// Read-only after construction.
pub struct AppContext {
    config: Config,
    catalog: Catalog,
    retrieval: Option<Retrieval>,
}

impl AppContext {
    pub fn new(config: Config, catalog: Catalog, retrieval: Option<Retrieval>) -> Self {
        Self {
            config,
            catalog,
            retrieval,
        }
    }

    /// Load the catalog and, when embeddings are enabled, build the index.
    pub async fn initialize(config: Config) -> Self {
        let catalog = match load_catalog(&config.catalog.path) {
            Ok(catalog) => {
                tracing::info!(
                    path = %config.catalog.path.display(),
                    exercises = catalog.len(),
                    "catalog loaded"
                );
                catalog
            }
            Err(e) => {
                tracing::error!("Error loading exercise data: {:#}", e);
                Catalog::default()
            }
        };

        let retrieval = if catalog.is_empty() {
            tracing::warn!("catalog is empty; coach will use rule-based answers");
            None
        } else {
            build_retrieval(&config, &catalog).await
        };

        Self::new(config, catalog, retrieval)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn retrieval(&self) -> Option<&Retrieval> {
        self.retrieval.as_ref()
    }

    /// Random source for one workout request. Seeded from `[workout].seed`
    /// when set, otherwise from OS entropy.
    pub fn workout_rng(&self) -> StdRng {
        match self.config.workout.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

async fn build_retrieval(config: &Config, catalog: &Catalog) -> Option<Retrieval> {
    let provider = match create_provider(&config.embedding).await {
        Ok(Some(provider)) => provider,
        Ok(None) => {
            tracing::info!("embeddings disabled; coach will use rule-based answers");
            return None;
        }
        Err(e) => {
            tracing::error!("Error loading embedding model: {:#}", e);
            return None;
        }
    };

    match EmbeddingIndex::build(catalog, provider.as_ref(), config.embedding.batch_size).await {
        Ok(index) => {
            tracing::info!(
                model = provider.model_name(),
                rows = index.len(),
                "embedding index built"
            );
            Some(Retrieval { provider, index })
        }
        Err(e) => {
            tracing::error!("Error building embedding index: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_catalog_degrades_to_empty() {
        let mut config = Config::default();
        config.catalog.path = "/nonexistent/exercises.csv".into();
        let ctx = AppContext::initialize(config).await;
        assert!(ctx.catalog().is_empty());
        assert!(ctx.retrieval().is_none());
    }

    #[tokio::test]
    async fn test_disabled_embeddings_skip_index() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "id,name,level,equipment,primaryMuscles").unwrap();
        writeln!(file, "Squat,Squat,beginner,barbell,\"['quadriceps']\"").unwrap();

        let mut config = Config::default();
        config.catalog.path = file.path().to_path_buf();
        config.embedding.provider = "disabled".to_string();
        let ctx = AppContext::initialize(config).await;
        assert_eq!(ctx.catalog().len(), 1);
        assert!(ctx.retrieval().is_none());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let mut config = Config::default();
        config.workout.seed = Some(7);
        let ctx = AppContext::new(config, Catalog::default(), None);
        let a: u64 = ctx.workout_rng().gen();
        let b: u64 = ctx.workout_rng().gen();
        assert_eq!(a, b);
    }
}
