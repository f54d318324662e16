use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexSet;
use itertools::Itertools;

/// An insertion-ordered set of states usable as a transition-table key.
///
/// Equality is plain set equality, and the hash XOR-folds the element
/// hashes, so two sets with the same members always land on the same table
/// slot no matter the order their elements were discovered in. Subset
/// construction relies on this to reuse a canonical set for every frontier
/// set it rediscovers.
#[derive(Clone, Debug)]
pub struct StateSet<Q>
where
    Q: Eq + Hash,
{
    inner: IndexSet<Q>,
}

impl<Q> StateSet<Q>
where
    Q: Eq + Hash,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: IndexSet::new(),
        }
    }

    #[inline]
    pub fn singleton(state: Q) -> Self {
        let mut inner = IndexSet::new();
        inner.insert(state);
        Self { inner }
    }

    #[inline]
    pub fn insert(&mut self, state: Q) -> bool {
        self.inner.insert(state)
    }

    #[inline]
    pub fn contains(&self, state: &Q) -> bool {
        self.inner.contains(state)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> indexmap::set::Iter<'_, Q> {
        self.inner.iter()
    }
}

impl<Q> Default for StateSet<Q>
where
    Q: Eq + Hash,
{
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> PartialEq for StateSet<Q>
where
    Q: Eq + Hash,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Q> Eq for StateSet<Q> where Q: Eq + Hash {}

impl<Q> Hash for StateSet<Q>
where
    Q: Eq + Hash,
{
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut folded = 0u64;
        for member in &self.inner {
            let mut hasher = DefaultHasher::new();
            member.hash(&mut hasher);
            folded ^= hasher.finish();
        }
        state.write_u64(folded);
    }
}

impl<Q> From<IndexSet<Q>> for StateSet<Q>
where
    Q: Eq + Hash,
{
    #[inline]
    fn from(inner: IndexSet<Q>) -> Self {
        Self { inner }
    }
}

impl<Q> FromIterator<Q> for StateSet<Q>
where
    Q: Eq + Hash,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = Q>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<Q> Extend<Q> for StateSet<Q>
where
    Q: Eq + Hash,
{
    #[inline]
    fn extend<I: IntoIterator<Item = Q>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl<'a, Q> IntoIterator for &'a StateSet<Q>
where
    Q: Eq + Hash,
{
    type Item = &'a Q;
    type IntoIter = indexmap::set::Iter<'a, Q>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<Q> IntoIterator for StateSet<Q>
where
    Q: Eq + Hash,
{
    type Item = Q;
    type IntoIter = indexmap::set::IntoIter<Q>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<Q> fmt::Display for StateSet<Q>
where
    Q: Eq + Hash + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.inner.iter().join(","))
    }
}
