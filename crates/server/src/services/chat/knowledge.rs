//! FAQ lookup for questions the keyword router cannot place.
//!
//! An exact case-insensitive question match scores 1.0. Otherwise the query
//! is compared against the department's FAQ questions with TF-IDF cosine
//! similarity (smoothed idf, l2-normalized raw term counts, tokens of two or
//! more word characters).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use erp_assistant_core::{Department, FaqId};

use crate::db::{FaqRepository, RepositoryError};
use crate::models::Faq;

/// Minimum similarity for a FAQ to count as an answer.
pub const MATCH_THRESHOLD: f64 = 0.8;

/// A FAQ that answers a query.
#[derive(Debug, Clone, PartialEq)]
pub struct FaqMatch {
    pub faq_id: FaqId,
    pub answer: String,
    pub score: f64,
}

type CacheKey = (Department, String);

/// Cached FAQ search.
///
/// Results, including misses, are cached per department and normalized
/// query until [`KnowledgeBase::invalidate`] is called.
#[derive(Clone)]
pub struct KnowledgeBase {
    faqs: Arc<dyn FaqRepository>,
    cache: Cache<CacheKey, Option<FaqMatch>>,
}

impl KnowledgeBase {
    #[must_use]
    pub fn new(faqs: Arc<dyn FaqRepository>) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(3600))
            .build();
        Self { faqs, cache }
    }

    /// Best FAQ answer for `query` within `department`, if any scores above
    /// [`MATCH_THRESHOLD`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the FAQs cannot be loaded.
    #[instrument(skip(self), fields(department = %department))]
    pub async fn lookup(
        &self,
        department: Department,
        query: &str,
    ) -> Result<Option<FaqMatch>, RepositoryError> {
        let key = (department, normalize(query));
        if let Some(cached) = self.cache.get(&key).await {
            debug!(hit = cached.is_some(), "FAQ cache hit");
            return Ok(cached);
        }

        let faqs = self.faqs.list_by_department(department).await?;
        let result = best_match(query, &faqs);
        self.cache.insert(key, result.clone()).await;
        Ok(result)
    }

    /// Drop every cached lookup. Call after any FAQ write.
    pub fn invalidate(&self) {
        self.cache.invalidate_all();
    }
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("cached_entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

fn normalize(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .collect()
}

/// Pure FAQ search over an already-loaded department.
#[must_use]
pub fn best_match(query: &str, faqs: &[Faq]) -> Option<FaqMatch> {
    let normalized = normalize(query);
    if let Some(faq) = faqs.iter().find(|f| normalize(&f.question) == normalized) {
        return Some(FaqMatch {
            faq_id: faq.id,
            answer: faq.answer.clone(),
            score: 1.0,
        });
    }

    let (index, score) = tfidf_scores(query, faqs)
        .into_iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;

    if score > MATCH_THRESHOLD {
        faqs.get(index).map(|faq| FaqMatch {
            faq_id: faq.id,
            answer: faq.answer.clone(),
            score,
        })
    } else {
        None
    }
}

/// Cosine similarity of `query` against each FAQ question.
fn tfidf_scores(query: &str, faqs: &[Faq]) -> Vec<f64> {
    let mut documents: Vec<Vec<String>> = faqs.iter().map(|f| tokenize(&f.question)).collect();
    documents.push(tokenize(query));

    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for doc in &documents {
        let mut seen: Vec<&str> = doc.iter().map(String::as_str).collect();
        seen.sort_unstable();
        seen.dedup();
        for term in seen {
            *document_frequency.entry(term).or_insert(0) += 1;
        }
    }

    #[allow(clippy::cast_precision_loss)] // Document counts are tiny
    let n = documents.len() as f64;
    let idf = |term: &str| -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let df = document_frequency.get(term).copied().unwrap_or(0) as f64;
        ((1.0 + n) / (1.0 + df)).ln() + 1.0
    };

    let vectors: Vec<HashMap<&str, f64>> = documents
        .iter()
        .map(|doc| {
            let mut counts: HashMap<&str, f64> = HashMap::new();
            for term in doc {
                *counts.entry(term.as_str()).or_insert(0.0) += 1.0;
            }
            for (term, weight) in &mut counts {
                *weight *= idf(*term);
            }
            let norm = counts.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in counts.values_mut() {
                    *weight /= norm;
                }
            }
            counts
        })
        .collect();

    let Some((query_vec, faq_vecs)) = vectors.split_last() else {
        return Vec::new();
    };

    faq_vecs
        .iter()
        .map(|faq_vec| {
            query_vec
                .iter()
                .map(|(term, w)| w * faq_vec.get(term).copied().unwrap_or(0.0))
                .sum()
        })
        .collect()
}
