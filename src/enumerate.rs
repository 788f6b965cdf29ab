use log::debug;

use crate::error::Error;
use crate::relation::EqRelation;
use crate::traits::{ElementIndex, Incrementable};
use crate::{set_partitions, DefaultIndex};

/// Returns every equivalence relation over `size` elements, `bell(size)` in total.
///
/// Relations of size `n` are built from those of size `n - 1` by placing the new
/// last element into each existing group in turn, then into a group of its own.
/// The result is ordered lexicographically by canonical group labeling, so
/// truncating every relation by `k` elements yields the enumeration of size
/// `size - k` with each entry repeated in one contiguous run.
pub fn enumerate<T: ElementIndex>(size: usize) -> Vec<EqRelation<T>>
{
    let mut relations = vec![EqRelation::new(0)];
    for len in 0..size {
        let capacity = set_partitions(len + 1)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        let mut extended = Vec::with_capacity(capacity);

        for relation in &relations {
            for first in first_members(relation) {
                let mut r = relation.clone();
                r.append_element();
                r.merge(first, len);
                extended.push(r);
            }
            let mut r = relation.clone();
            r.append_element();
            extended.push(r);
        }

        debug!("enumerated {} relations of size {}", extended.len(), len + 1);
        relations = extended;
    }
    relations
}

// smallest element of each group, in order of group number
fn first_members<T: ElementIndex>(relation: &EqRelation<T>) -> Vec<usize> {
    let mut firsts = Vec::with_capacity(relation.n_groups());
    for (x, label) in relation.canonical_group_labeling().iter().enumerate() {
        if label.to_index() == firsts.len() {
            firsts.push(x);
        }
    }
    firsts
}

/// Lazily yields all relations of a given size, in the same order as `enumerate`.
///
/// Steps through canonical group labelings (restricted growth strings) in
/// lexicographic order, see <http://www-cs-faculty.stanford.edu/~uno/fasc3b.ps.gz>
/// page 27 for the algorithm.
#[derive(Clone, Debug)]
pub struct Partitions<T: ElementIndex = DefaultIndex>
{
    // current labeling
    a: Vec<T>,
    // b[j] is the largest label allowed at position j
    b: Vec<T>,
    // largest label allowed at the last position
    m: T,
    done: bool
}

impl<T: ElementIndex> Partitions<T>
{
    /// Start at the universal relation of `size` elements.
    ///
    /// # Panics
    ///
    /// If `size` exceeds `T::max_value()`.
    pub fn new(size: usize) -> Self {
        if T::try_from_index(size).is_none() {
            panic!("{}", Error::TooLarge {size});
        }
        Partitions {
            a: vec![T::zero(); size],
            b: vec![T::one(); size.saturating_sub(1)],
            m: if size > 1 {T::one()} else {T::zero()},
            done: false
        }
    }

    /// Returns the size of the relations being enumerated
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Returns `true` when enumerating relations over no elements
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    #[inline]
    fn increment(&mut self) -> bool {
        if let Some(al) = self.a.last_mut() {
            if *al != self.m {
                al.increment();
                return true;
            }
        } else {
            return false;
        }

        self.increment_slowpath()
    }

    fn increment_slowpath(&mut self) -> bool {
        let n = self.len();
        if n <= 1 {
            return false;
        }

        let mut j = n - 2;
        while self.a[j] == self.b[j] {
            j -= 1;
        }
        if j == 0 {
            return false;
        }

        self.a[j].increment();
        let bj = self.b[j];
        let m = if self.a[j] == bj {bj.incremented()} else {bj};
        j += 1;

        for ak in &mut self.a[j..] {
            *ak = T::zero();
        }
        for bk in &mut self.b[j..] {
            *bk = m;
        }
        self.m = m;
        true
    }
}

impl<T: ElementIndex> Iterator for Partitions<T>
{
    type Item = EqRelation<T>;

    fn next(&mut self) -> Option<EqRelation<T>> {
        if self.done {
            return None;
        }
        let current = EqRelation::from_labeling_unchecked(self.a.clone());
        self.done = !self.increment();
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::traits::ElementIndex;
    use crate::{bell, enumerate, universal_relation, EqRelation, ErHash, Partitions};

    fn labels<T: ElementIndex>(r: &EqRelation<T>) -> Vec<usize> {
        r.canonical_group_labeling().iter().map(|l| l.to_index()).collect()
    }

    #[test]
    fn counts() {
        for n in 0..=10 {
            assert_eq!(enumerate::<u16>(n).len() as u64, bell(n));
        }
        assert_eq!(enumerate::<u8>(5).len(), 52);
    }

    #[test]
    fn lazy_counts() {
        for n in 0..=10 {
            assert_eq!(Partitions::<u32>::new(n).count() as u64, bell(n));
        }
    }

    #[test]
    fn empty() {
        assert_eq!(enumerate::<u16>(0), vec![EqRelation::new(0)]);
        assert_eq!(enumerate::<u16>(1), vec![EqRelation::new(1)]);
    }

    #[test]
    fn distinct() {
        for n in 0..7 {
            let all = enumerate::<u16>(n);
            let set: HashSet<_, ErHash> = all.iter().cloned().collect();
            assert_eq!(set.len(), all.len());
        }
    }

    #[test]
    fn lexicographic() {
        for n in 0..7 {
            let all = enumerate::<u16>(n);
            for pair in all.windows(2) {
                assert!(labels(&pair[0]) < labels(&pair[1]));
            }
            assert_eq!(all[0], universal_relation(n));
            assert_eq!(all[all.len() - 1], EqRelation::new(n));
        }
    }

    #[test]
    fn lazy_matches_eager() {
        for n in 0..8 {
            let lazy: Vec<EqRelation<u8>> = Partitions::new(n).collect();
            assert_eq!(lazy, enumerate::<u8>(n));
            for (a, b) in lazy.iter().zip(enumerate::<u8>(n)) {
                assert_eq!(a.n_groups(), b.n_groups());
            }
        }
    }

    #[test]
    fn truncation_correspondence() {
        for n in 0..7 {
            let large = enumerate::<u16>(n);
            for m in 0..=n {
                let mut truncated: Vec<EqRelation<u16>> = large.iter().map(|r| r - (n - m)).collect();
                // equal relations must be adjacent, so dedup leaves one of each
                truncated.dedup();
                assert_eq!(truncated, enumerate::<u16>(m));
            }
        }
    }

    #[test]
    fn partitions_len() {
        let p = Partitions::<u16>::new(4);
        assert_eq!(p.len(), 4);
        assert!(!p.is_empty());
        assert!(Partitions::<u16>::new(0).is_empty());
    }
}
