//! Deterministic weighted selection
//!
//! Picks one candidate from the top of the ranking with softmax weights. The
//! pseudo-random draw is seeded from a SHA-256 digest of the user id and the
//! scored candidates, so identical inputs always pick the same item while
//! different users and sessions still see variety. No ambient randomness is
//! consulted.

use goodwatch_core::CatalogItem;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};
use std::cmp::Ordering;
use tracing::debug;
use uuid::Uuid;

/// A candidate with its final score
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub item: &'a CatalogItem,
    pub score: f64,
}

/// Softmax sampler over the top-k candidates
#[derive(Debug, Clone, Copy)]
pub struct SelectionSampler {
    top_k: usize,
    temperature: f64,
}

impl SelectionSampler {
    pub fn new(top_k: usize, temperature: f64) -> Self {
        Self {
            top_k: top_k.max(1),
            temperature,
        }
    }

    /// Choose one candidate, or `None` when there are none
    pub fn select<'a>(
        &self,
        user_id: &Uuid,
        candidates: &[ScoredCandidate<'a>],
    ) -> Option<ScoredCandidate<'a>> {
        if candidates.is_empty() {
            return None;
        }

        let ranked = Self::rank(candidates, self.top_k);
        let weights = self.softmax(&ranked);
        let seed = Self::seed(user_id, candidates);
        let draw: f64 = StdRng::from_seed(seed).gen();

        let index = Self::pick_index(&weights, draw);
        let chosen = ranked[index];

        debug!(
            user_id = %user_id,
            candidates = candidates.len(),
            ranked = ranked.len(),
            seed = %hex::encode(&seed[..8]),
            chosen = %chosen.item.id,
            score = chosen.score,
            "Selected candidate"
        );

        Some(chosen)
    }

    /// Top `k` by score descending, ties broken by id ascending
    pub fn rank<'a>(candidates: &[ScoredCandidate<'a>], k: usize) -> Vec<ScoredCandidate<'a>> {
        let mut ranked = candidates.to_vec();
        ranked.sort_by(Self::ranking_order);
        ranked.truncate(k);
        ranked
    }

    fn ranking_order(a: &ScoredCandidate<'_>, b: &ScoredCandidate<'_>) -> Ordering {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.item.id.cmp(&b.item.id))
    }

    /// Normalized softmax weights at the sampler's temperature
    pub fn softmax(&self, ranked: &[ScoredCandidate<'_>]) -> Vec<f64> {
        let max = ranked
            .iter()
            .map(|c| c.score)
            .fold(f64::NEG_INFINITY, f64::max);
        let raw: Vec<f64> = ranked
            .iter()
            .map(|c| ((c.score - max) / self.temperature).exp())
            .collect();
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|w| w / total).collect()
    }

    /// Seed from the user id and every candidate (id, score), ordered by id
    pub fn seed(user_id: &Uuid, candidates: &[ScoredCandidate<'_>]) -> [u8; 32] {
        let mut ordered: Vec<&ScoredCandidate<'_>> = candidates.iter().collect();
        ordered.sort_by(|a, b| a.item.id.cmp(&b.item.id));

        let mut hasher = Sha256::new();
        hasher.update(user_id.as_bytes());
        for candidate in ordered {
            hasher.update(candidate.item.id.as_bytes());
            hasher.update([0u8]);
            hasher.update(candidate.score.to_bits().to_be_bytes());
        }
        hasher.finalize().into()
    }

    /// Walk cumulative weights until they pass `draw`
    fn pick_index(weights: &[f64], draw: f64) -> usize {
        let mut cumulative = 0.0;
        for (i, weight) in weights.iter().enumerate() {
            cumulative += weight;
            if draw < cumulative {
                return i;
            }
        }
        weights.len() - 1
    }
}
