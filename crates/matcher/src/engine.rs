use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use corpus::Corpus;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use similarity::{round_confidence, SimilarityIndex, TokenCatalog};
use store::KeyValueStore;
use tokenize::Tokenizer;
use tracing::{debug, info, warn};

use crate::cache::ResultCache;
use crate::types::{AnswerResult, MatchConfig, MatchError, CONFIDENCE_THRESHOLD};


/// Answers free-text queries against a loaded [`Corpus`].
///
/// Per query: cache lookup, then (on a miss) every corpus question is scored
/// on a bounded worker pool, filtered by [`CONFIDENCE_THRESHOLD`], ranked,
/// truncated, and written back to the cache.
pub struct MatchEngine {
    corpus: Arc<Corpus>,
    candidates: Vec<(String, String)>,
    index: SimilarityIndex,
    cache: ResultCache,
    pool: ThreadPool,
    config: MatchConfig,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("candidates", &self.candidates.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl MatchEngine {
    /// Engine with the bundled tokenizer, a fresh token catalog and an
    /// in-memory result cache.
    pub fn new(corpus: Corpus, config: MatchConfig) -> Result<Self, MatchError> {
        let index = SimilarityIndex::new(Arc::new(TokenCatalog::new()), Tokenizer::new()?);
        Self::with_parts(Arc::new(corpus), index, ResultCache::in_memory(), config)
    }

    /// Engine over explicit collaborators.
    pub fn with_parts(
        corpus: Arc<Corpus>,
        index: SimilarityIndex,
        cache: ResultCache,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        config.validate()?;

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.worker_threads())
            .thread_name(|i| format!("faq-score-{i}"))
            .build()?;

        let mut candidates: Vec<(String, String)> = corpus
            .entries()
            .iter()
            .map(|(q, a)| (q.clone(), a.clone()))
            .collect();
        candidates.sort_unstable();

        debug!(
            questions = candidates.len(),
            workers = pool.current_num_threads(),
            "match_engine_ready"
        );

        Ok(Self {
            corpus,
            candidates,
            index,
            cache,
            pool,
            config,
        })
    }

    /// Convenience for wiring a configured store.
    pub fn with_store(
        corpus: Corpus,
        store: Arc<dyn KeyValueStore>,
        config: MatchConfig,
    ) -> Result<Self, MatchError> {
        let index = SimilarityIndex::new(Arc::new(TokenCatalog::new()), Tokenizer::new()?);
        Self::with_parts(Arc::new(corpus), index, ResultCache::new(store), config)
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Ranked answers for `query`, or [`MatchError::NotFound`].
    ///
    /// The cache key is the query exactly as given; a hit is returned without
    /// rescoring. Cache failures are logged and never fail the call.
    pub fn find_best_answer(&self, query: &str) -> Result<Vec<AnswerResult>, MatchError> {
        let start = Instant::now();

        if let Some(cached) = self.cached(query) {
            debug!(
                query,
                results = cached.len(),
                elapsed_micros = start.elapsed().as_micros() as u64,
                "match_cache_hit"
            );
            return Ok(cached);
        }

        let results = self.rank(query);
        let elapsed_micros = start.elapsed().as_micros() as u64;

        if results.is_empty() {
            info!(
                query,
                candidates = self.candidates.len(),
                elapsed_micros,
                "match_not_found"
            );
            return Err(MatchError::NotFound {
                query: query.to_string(),
            });
        }

        if let Err(err) = self.cache.set(query, &results, self.config.cache_ttl()) {
            warn!(query, error = %err, "cache_write_failure");
        }

        info!(
            query,
            results = results.len(),
            top_confidence = results[0].confidence,
            candidates = self.candidates.len(),
            elapsed_micros,
            "match_success"
        );
        Ok(results)
    }

    /// Seed the cache by running every corpus question through
    /// [`find_best_answer`](Self::find_best_answer). Entries land in the same
    /// key space and shape as query-time entries. Returns the number of
    /// questions that produced a cached list.
    pub fn warm_cache(&self) -> usize {
        let start = Instant::now();
        let seeded = self
            .candidates
            .iter()
            .filter(|(question, _)| self.find_best_answer(question).is_ok())
            .count();
        info!(
            seeded,
            questions = self.candidates.len(),
            elapsed_micros = start.elapsed().as_micros() as u64,
            "cache_warmed"
        );
        seeded
    }

    fn cached(&self, query: &str) -> Option<Vec<AnswerResult>> {
        match self.cache.get(query) {
            Ok(hit) => hit,
            Err(err) => {
                warn!(query, error = %err, "cache_read_failure");
                None
            }
        }
    }

    /// Score all candidates in parallel, keep those whose unrounded score is
    /// above the threshold, and return at most `max_answers`, best first.
    fn rank(&self, query: &str) -> Vec<AnswerResult> {
        let query_set = self.index.token_set(query);
        let timestamp = Utc::now();

        let mut results: Vec<AnswerResult> = self.pool.install(|| {
            self.candidates
                .par_iter()
                .filter_map(|(question, answer)| {
                    let score = self.index.score_against(&query_set, question);
                    (score > CONFIDENCE_THRESHOLD).then(|| AnswerResult {
                        query: query.to_string(),
                        matched_question: question.clone(),
                        answer: answer.clone(),
                        confidence: round_confidence(score),
                        timestamp,
                    })
                })
                .collect()
        });

        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.matched_question.cmp(&b.matched_question))
        });
        results.truncate(self.config.effective_max_answers());
        results
    }
}
