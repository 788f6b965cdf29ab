use std::hash::BuildHasher;

use rustc_hash::FxHasher;

use crate::relation::EqRelation;
use crate::traits::ElementIndex;

/// Hash functor for relations.
///
/// `EqRelation` hashes its canonical group labeling, so equal relations hash
/// equally whatever their internal forest looks like. Use `ErHash` as the hasher
/// of a `HashSet`/`HashMap` keyed by relations, or call `digest` directly.
#[derive(Clone, Copy, Debug, Default)]
pub struct ErHash;

impl BuildHasher for ErHash
{
    type Hasher = FxHasher;

    fn build_hasher(&self) -> FxHasher {
        FxHasher::default()
    }
}

impl ErHash
{
    /// Returns the digest of `relation`
    pub fn digest<T: ElementIndex>(&self, relation: &EqRelation<T>) -> u64 {
        self.hash_one(relation)
    }
}
