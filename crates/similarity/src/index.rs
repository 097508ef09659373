use std::sync::Arc;

use roaring::RoaringBitmap;
use tokenize::Tokenizer;

use crate::catalog::TokenCatalog;

/// Set of token IDs for one text. Repeated tokens count once.
pub type TokenSet = RoaringBitmap;

/// Builds token sets against a shared [`TokenCatalog`] and scores them.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    catalog: Arc<TokenCatalog>,
    tokenizer: Tokenizer,
}

impl SimilarityIndex {
    pub fn new(catalog: Arc<TokenCatalog>, tokenizer: Tokenizer) -> Self {
        Self { catalog, tokenizer }
    }

    pub fn catalog(&self) -> &Arc<TokenCatalog> {
        &self.catalog
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Tokenize `text` and map every token to its catalog ID.
    pub fn token_set(&self, text: &str) -> TokenSet {
        let mut set = RoaringBitmap::new();
        for token in self.tokenizer.tokenize(text) {
            set.insert(self.catalog.id_for(&token.text));
        }
        set
    }

    /// Unrounded Dice score between two texts.
    pub fn score(&self, query: &str, candidate: &str) -> f64 {
        let query_set = self.token_set(query);
        self.score_against(&query_set, candidate)
    }

    /// Score `candidate` against a query set built once per request.
    pub fn score_against(&self, query_set: &TokenSet, candidate: &str) -> f64 {
        dice(query_set, &self.token_set(candidate))
    }
}

/// Dice coefficient `2|A∩B| / (|A|+|B|)`.
///
/// Two empty sets score 0. Callers round with [`round_confidence`] for display.
pub fn dice(a: &TokenSet, b: &TokenSet) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    let overlap = a.intersection_len(b);
    2.0 * overlap as f64 / total as f64
}

/// Round to two decimal places.
#[inline]
pub fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SimilarityIndex {
        SimilarityIndex::new(Arc::new(TokenCatalog::new()), Tokenizer::new().unwrap())
    }

    fn has_two_decimals(v: f64) -> bool {
        ((v * 100.0) - (v * 100.0).round()).abs() < 1e-9
    }

    #[test]
    fn scores_overlap_with_dice() {
        let idx = index();
        // {what, is, your, name} vs {what, is, your, name?}: 2*3 / 8
        assert_eq!(idx.score("what is your name", "What is your name?"), 0.75);
        // {what, is, your, name} vs {what, time, is, it?}: 2*2 / 8
        assert_eq!(idx.score("what is your name", "What time is it?"), 0.5);
    }

    #[test]
    fn score_is_symmetric_and_bounded() {
        let idx = index();
        let texts = [
            "how do I reset my password",
            "Reset password",
            "where is the nearest branch",
            "คุณชื่ออะไร",
            "ชื่อ คุณ",
            "a a a b",
        ];
        for q in &texts {
            for c in &texts {
                let forward = idx.score(q, c);
                let backward = idx.score(c, q);
                assert_eq!(forward, backward, "{q:?} vs {c:?}");
                assert!((0.0..=1.0).contains(&forward));
                assert!(has_two_decimals(round_confidence(forward)));
            }
        }
    }

    #[test]
    fn repeated_tokens_count_once() {
        let idx = index();
        assert_eq!(idx.score("hello hello hello", "hello"), 1.0);
    }

    #[test]
    fn empty_sets_score_zero() {
        let idx = index();
        assert_eq!(idx.score("", ""), 0.0);
        assert_eq!(idx.score("", "something"), 0.0);
    }

    #[test]
    fn rounding_to_two_places() {
        let idx = index();
        // 2*1 / 3 = 0.666..
        let raw = idx.score("alpha", "alpha beta");
        assert!((raw - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(round_confidence(raw), 0.67);
        assert_eq!(round_confidence(0.125), 0.13);
    }

    #[test]
    fn score_keeps_full_precision() {
        let idx = index();
        // 8 shared tokens, 8 + 21 total: 16/29
        let candidate = "a b c d e f g h i j k l m n o p q r s t u";
        let raw = idx.score("a b c d e f g h", candidate);
        assert_eq!(raw, 16.0 / 29.0);
        assert!(raw > 0.55);
        assert_eq!(round_confidence(raw), 0.55);
    }

    #[test]
    fn identical_tokens_share_ids_across_texts() {
        let idx = index();
        let a = idx.token_set("Rust is fast");
        let b = idx.token_set("fast RUST");
        assert_eq!(a.intersection_len(&b), 2);
        assert_eq!(idx.catalog().len(), 3);
    }
}
