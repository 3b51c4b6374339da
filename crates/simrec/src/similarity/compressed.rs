//! Cosine similarity between key-to-value maps.
//!
//! A compressed map stores a vector over an open key universe, such as
//! co-occurrence counts keyed by item id. Two maps need not share keys: the
//! comparison aligns them over the union of their keys, treating an absent key
//! as zero.

use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use super::scalar::cosine_similarity;

/// Cosine similarity of two compressed maps.
///
/// The union of keys is laid out as `map1`'s keys followed by `map2`'s keys
/// that `map1` lacks, and both maps are expanded into aligned dense arrays
/// over it. Runs in O(|union|).
///
/// An empty or all-zero map yields NaN.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use simrec::similarity::compressed_cosine;
///
/// let likes: HashMap<&str, f64> = [("tea", 2.0), ("jazz", 1.0)].into_iter().collect();
/// let other: HashMap<&str, f64> = [("tea", 2.0), ("rock", 1.0)].into_iter().collect();
///
/// // dot = 4, both norms are sqrt(5)
/// assert!((compressed_cosine(&likes, &other) - 0.8).abs() < 1e-12);
/// ```
#[must_use]
pub fn compressed_cosine<K, S>(map1: &HashMap<K, f64, S>, map2: &HashMap<K, f64, S>) -> f64
where
    K: Hash + Eq,
    S: BuildHasher,
{
    let union = map1.keys().chain(map2.keys().filter(|key| !map1.contains_key(*key)));

    let (a, b): (Vec<f64>, Vec<f64>) = union
        .map(|key| (map1.get(key).copied().unwrap_or(0.0), map2.get(key).copied().unwrap_or(0.0)))
        .unzip();

    cosine_similarity(&a, &b)
}

/// Cosine similarity of `map` against every member of `collection`.
///
/// The result is keyed by the collection's own keys.
#[must_use]
pub fn compressed_cosine_against_collection<C, K, S>(
    map: &HashMap<K, f64, S>,
    collection: &HashMap<C, HashMap<K, f64, S>, S>,
) -> HashMap<C, f64>
where
    C: Hash + Eq + Clone,
    K: Hash + Eq,
    S: BuildHasher,
{
    collection
        .iter()
        .map(|(id, other)| (id.clone(), compressed_cosine(map, other)))
        .collect()
}
