//! Embedding index over the catalog.
//!
//! Row `i` of the index is the embedding of catalog entry `i`. The index is
//! built once at startup and never updated; a catalog change would require a
//! full rebuild, which the service does not support.

use anyhow::{bail, Result};

use crate::catalog::Catalog;
use crate::embedding::{similarity_scores, EmbeddingProvider};

/// Vectors row-aligned with a [`Catalog`].
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingIndex {
    /// Embed every catalog entry's summary text, `batch_size` texts per
    /// provider call.
    pub async fn build(
        catalog: &Catalog,
        provider: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Self> {
        let texts: Vec<String> = catalog
            .exercises()
            .iter()
            .map(|ex| ex.embedding_text())
            .collect();

        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size.max(1)) {
            let embedded = provider.embed(batch).await?;
            if embedded.len() != batch.len() {
                bail!(
                    "Embedding provider returned {} vectors for {} texts",
                    embedded.len(),
                    batch.len()
                );
            }
            vectors.extend(embedded);
        }

        let dims = provider.dims();
        if let Some(bad) = vectors.iter().position(|v| v.len() != dims) {
            bail!(
                "Embedding for catalog entry {} has {} dims, expected {} ({})",
                bad,
                vectors[bad].len(),
                dims,
                provider.model_name()
            );
        }

        Self::from_vectors(vectors, catalog)
    }

    /// Wrap precomputed vectors. Fails unless there is exactly one vector per
    /// catalog entry.
    pub fn from_vectors(vectors: Vec<Vec<f32>>, catalog: &Catalog) -> Result<Self> {
        if vectors.len() != catalog.len() {
            bail!(
                "Embedding index has {} rows but catalog has {} exercises",
                vectors.len(),
                catalog.len()
            );
        }
        Ok(Self { vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Catalog positions of the `k` rows most similar to `query`, best first.
    pub fn nearest(&self, query: &[f32], k: usize) -> Vec<usize> {
        rank_top_k(&similarity_scores(query, &self.vectors), k)
    }
}

/// Indices of the `k` highest scores, descending. Equal scores keep their
/// original relative order; NaN ranks below every number.
pub fn rank_top_k(scores: &[f32], k: usize) -> Vec<usize> {
    let key = |i: usize| {
        let score = scores[i];
        if score.is_nan() {
            f32::NEG_INFINITY
        } else {
            // Fold -0.0 into 0.0 so the two compare equal.
            score + 0.0
        }
    };
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| key(b).total_cmp(&key(a)));
    order.truncate(k);
    order
}
