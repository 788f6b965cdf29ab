use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops;

use log::{debug, trace};
use num_traits::ToPrimitive;

use crate::error::Error;
use crate::traits::{ElementIndex, Incrementable};
use crate::DefaultIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Element<T>
{
    parent: T,
    rank: u8
}

impl<T: ElementIndex> Element<T>
{
    fn root(at: usize) -> Self {
        Element {parent: T::from_index(at), rank: 0}
    }

    fn child_of(root: usize) -> Self {
        Element {parent: T::from_index(root), rank: 0}
    }
}

/// Outcome of comparing two relations of the same size by fineness.
///
/// Refinement is a partial order, so two relations may be `Unordered`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fineness
{
    /// The left relation is strictly finer (it can be turned into the right one by merges)
    Less,
    /// The left relation is strictly coarser
    Greater,
    /// Both relations describe the same partition
    Equal,
    /// Neither relation is finer than the other
    Unordered
}

impl From<Fineness> for Option<Ordering>
{
    fn from(f: Fineness) -> Self {
        match f {
            Fineness::Less => Some(Ordering::Less),
            Fineness::Greater => Some(Ordering::Greater),
            Fineness::Equal => Some(Ordering::Equal),
            Fineness::Unordered => None
        }
    }
}

/// An equivalence relation over the indices `0..len()`.
///
/// Elements start out in their own groups and are joined with `merge`. Internally
/// this is a union-find forest (union by rank, path halving on merges); the
/// canonical group labeling is derived from it lazily and cached until the next
/// mutation.
///
/// Indices are stored as `T`, so a relation holds at most `T::max_value()` elements.
///
/// The cache lives in a `OnceCell`, so relations are not `Sync`: even read-only
/// access from several threads at once is not allowed. Clones are deep.
#[derive(Clone)]
pub struct EqRelation<T: ElementIndex = DefaultIndex>
{
    elements: Vec<Element<T>>,
    n_groups: T,
    // empty while stale
    cgl: OnceCell<Vec<T>>
}

impl<T: ElementIndex> EqRelation<T>
{
    /// Create a relation of `size` elements, each in its own group.
    ///
    /// # Panics
    ///
    /// If `size` exceeds `T::max_value()`.
    pub fn new(size: usize) -> Self {
        Self::try_new(size).unwrap_or_else(|e| panic!("{}", e))
    }

    /// Create a relation of `size` singleton groups, or fail if the index type is too narrow.
    pub fn try_new(size: usize) -> Result<Self, Error> {
        let n_groups = T::try_from_index(size).ok_or(Error::TooLarge {size})?;
        Ok(EqRelation {
            elements: (0..size).map(Element::root).collect(),
            n_groups,
            cgl: OnceCell::new()
        })
    }

    /// Create a relation from its canonical group labeling.
    ///
    /// The first entry must be 0 and every entry must be at most one more than the
    /// largest entry before it.
    pub fn try_from_labeling<I>(labels: I) -> Result<Self, Error>
        where I: IntoIterator<Item = T>
    {
        let labels: Vec<T> = labels.into_iter().collect();
        if T::try_from_index(labels.len()).is_none() {
            return Err(Error::TooLarge {size: labels.len()});
        }
        if let Some(index) = first_non_canonical(&labels) {
            return Err(Error::NotCanonical {index});
        }
        Ok(Self::from_labeling_unchecked(labels))
    }

    /// Checks if a sequence is a canonical group labeling.
    pub fn is_canonical<I>(labels: I) -> bool
        where I: IntoIterator<Item = T>
    {
        let labels: Vec<T> = labels.into_iter().collect();
        first_non_canonical(&labels).is_none()
    }

    pub(crate) fn from_labeling_unchecked(labels: Vec<T>) -> Self {
        let mut elements: Vec<Element<T>> = Vec::with_capacity(labels.len());
        let mut firsts: Vec<usize> = Vec::new();
        for (x, label) in labels.iter().enumerate() {
            let g = label.to_index();
            if g == firsts.len() {
                firsts.push(x);
                elements.push(Element::root(x));
            } else {
                let root = firsts[g];
                elements[root].rank = 1;
                elements.push(Element::child_of(root));
            }
        }

        EqRelation {
            elements,
            n_groups: T::from_index(firsts.len()),
            cgl: OnceCell::from(labels)
        }
    }

    /// Returns the number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` for the relation over no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the number of groups. Never touches the labeling cache.
    pub fn n_groups(&self) -> usize {
        self.n_groups.to_index()
    }

    fn leader(&self, mut x: usize) -> usize {
        loop {
            let parent = self.elements[x].parent.to_index();
            if parent == x {
                return x;
            }
            x = parent;
        }
    }

    // path halving; the partition itself is untouched
    fn leader_mut(&mut self, mut x: usize) -> usize {
        loop {
            let parent = self.elements[x].parent.to_index();
            if parent == x {
                return x;
            }
            let grandparent = self.elements[parent].parent;
            self.elements[x].parent = grandparent;
            x = grandparent.to_index();
        }
    }

    fn invalidate(&mut self) {
        self.cgl.take();
    }

    /// Make the elements at `x` and `y` equivalent, merging their groups.
    ///
    /// Has no effect if they already are.
    ///
    /// # Panics
    ///
    /// If `x` or `y` is out of range.
    pub fn merge(&mut self, x: usize, y: usize) {
        let x = self.leader_mut(x);
        let y = self.leader_mut(y);
        if x == y {
            return;
        }

        let (rx, ry) = (self.elements[x].rank, self.elements[y].rank);
        let (parent, child) = if rx < ry {(y, x)} else {(x, y)};
        if rx == ry {
            self.elements[parent].rank += 1;
        }
        self.elements[child].parent = T::from_index(parent);
        self.n_groups = self.n_groups - T::one();
        self.invalidate();
    }

    /// Tests if the elements at `x` and `y` are in the same group.
    ///
    /// # Panics
    ///
    /// If `x` or `y` is out of range.
    pub fn equivalent(&self, x: usize, y: usize) -> bool {
        self.leader(x) == self.leader(y)
    }

    /// Append one element at the end, in a new group of its own.
    pub fn append_element(&mut self) {
        let at = self.len();
        grown_size::<T>(at, 1);
        self.elements.push(Element::root(at));
        self.n_groups.increment();
        self.invalidate();
    }

    /// Returns the canonical group labeling.
    ///
    /// Entry `x` is the group number of element `x`. Group numbers are handed out in
    /// ascending order of each group's smallest element, so element 0 is always in
    /// group 0. Two relations of the same size are equal iff their labelings are.
    ///
    /// The labeling is cached; it is only recomputed on the first call after a mutation.
    pub fn canonical_group_labeling(&self) -> &[T] {
        self.cgl.get_or_init(|| self.compute_labeling())
    }

    fn compute_labeling(&self) -> Vec<T> {
        trace!("recomputing labeling of {} elements", self.len());
        let mut labels: Vec<Option<T>> = vec![None; self.len()];
        let mut next = T::zero();
        (0..self.len())
            .map(|x| {
                let leader = self.leader(x);
                *labels[leader].get_or_insert_with(|| {
                    let label = next;
                    next.increment();
                    label
                })
            })
            .collect()
    }

    /// Returns the groups as sorted lists of indices, in order of group number.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.n_groups()];
        for (x, label) in self.canonical_group_labeling().iter().enumerate() {
            groups[label.to_index()].push(x);
        }
        groups
    }

    /// Returns the mirror image of this relation.
    ///
    /// With `n = len()`, `x` and `y` are equivalent here iff `n-1-x` and `n-1-y`
    /// are equivalent in the result.
    pub fn reverse(&self) -> Self {
        let n = self.len();
        let mut reversed = Self::new(n);
        let mut firsts: Vec<Option<usize>> = vec![None; self.n_groups()];
        for (x, label) in self.canonical_group_labeling().iter().enumerate() {
            let mirrored = n - 1 - x;
            let slot = &mut firsts[label.to_index()];
            match *slot {
                Some(first) => reversed.merge(first, mirrored),
                None => *slot = Some(mirrored)
            }
        }
        reversed
    }

    fn concat(&mut self, other: &Self) {
        if other.is_empty() {
            return;
        }

        let offset = self.len();
        grown_size::<T>(offset, other.len());
        self.elements.extend(other.elements.iter().map(|e| Element {
            parent: T::from_index(e.parent.to_index() + offset),
            rank: e.rank
        }));
        self.n_groups = self.n_groups + other.n_groups;
        self.invalidate();
    }

    fn truncate(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        assert!(count <= self.len(), "cannot remove {} elements from a relation of {}", count, self.len());

        let len = self.len() - count;
        // leaders have to be found before any link is rewritten
        let leaders: Vec<usize> = (0..len).map(|x| self.leader(x)).collect();
        let mut roots: Vec<Option<usize>> = vec![None; self.len()];
        let mut n_groups = T::zero();
        let mut rerooted = 0;

        self.elements.truncate(len);
        for (x, leader) in leaders.into_iter().enumerate() {
            let root = roots[leader];
            match root {
                Some(root) => {
                    self.elements[root].rank = 1;
                    self.elements[x] = Element::child_of(root);
                }
                None => {
                    if leader >= len {
                        rerooted += 1;
                    }
                    roots[leader] = Some(x);
                    self.elements[x] = Element::root(x);
                    n_groups.increment();
                }
            }
        }
        if rerooted > 0 {
            debug!("re-rooted {} groups whose leader was among the {} removed elements", rerooted, count);
        }

        self.n_groups = n_groups;
        self.invalidate();
    }

    /// Returns `true` if every group of `self` lies inside a single group of `other`.
    ///
    /// # Panics
    ///
    /// If the relations differ in size.
    pub fn finer_than(&self, other: &Self) -> bool {
        assert_eq!(self.len(), other.len(), "cannot compare relations of different sizes");
        if self.n_groups() < other.n_groups() {
            return false;
        }

        let mut image: Vec<Option<T>> = vec![None; self.n_groups()];
        self.canonical_group_labeling()
            .iter()
            .zip(other.canonical_group_labeling())
            .all(|(mine, theirs)| *image[mine.to_index()].get_or_insert(*theirs) == *theirs)
    }

    /// Compares fineness.
    ///
    /// # Panics
    ///
    /// If the relations differ in size.
    pub fn compare(&self, other: &Self) -> Fineness {
        match (self.finer_than(other), other.finer_than(self)) {
            (true, true) => Fineness::Equal,
            (true, false) => Fineness::Less,
            (false, true) => Fineness::Greater,
            (false, false) => Fineness::Unordered
        }
    }
}

// size after adding `extra` elements to `len`, which must still fit into T
fn grown_size<T: ElementIndex>(len: usize, extra: usize) -> usize {
    let size = len + extra;
    if T::try_from_index(size).is_none() {
        panic!("{}", Error::TooLarge {size});
    }
    size
}

fn first_non_canonical<T: ElementIndex>(labels: &[T]) -> Option<usize> {
    let mut m = 0usize;
    for (x, label) in labels.iter().enumerate() {
        match label.to_usize() {
            Some(g) if g < m => {}
            Some(g) if g == m => m += 1,
            _ => return Some(x)
        }
    }
    None
}

/// Returns the relation of `size` elements that are all equivalent.
pub fn universal_relation<T: ElementIndex>(size: usize) -> EqRelation<T>
{
    grown_size::<T>(size, 0);
    let n_groups = T::from_index(size.min(1));
    let mut elements: Vec<Element<T>> = (0..size).map(|_| Element::child_of(0)).collect();
    if let Some(first) = elements.first_mut() {
        first.rank = if size > 1 {1} else {0};
    }

    EqRelation {
        elements,
        n_groups,
        cgl: OnceCell::from(vec![T::zero(); size])
    }
}

impl<T: ElementIndex> Default for EqRelation<T>
{
    fn default() -> Self {
        Self::new(0)
    }
}

impl<T: ElementIndex> PartialEq for EqRelation<T>
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.canonical_group_labeling() == other.canonical_group_labeling()
    }
}

impl<T: ElementIndex> Eq for EqRelation<T> {}

impl<T: ElementIndex> PartialOrd for EqRelation<T>
{
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).into()
    }
}

impl<T: ElementIndex> Hash for EqRelation<T>
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical_group_labeling().hash(state);
    }
}

impl<T: ElementIndex> fmt::Display for EqRelation<T>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut labels = self.canonical_group_labeling().iter();
        if let Some(first) = labels.next() {
            write!(f, "{}", first)?;
            for label in labels {
                write!(f, " {}", label)?;
            }
        }
        Ok(())
    }
}

// derive would print the forest, which says nothing about the partition
impl<T: ElementIndex> fmt::Debug for EqRelation<T>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EqRelation")
            .field("len", &self.len())
            .field("n_groups", &self.n_groups())
            .field("labeling", &self.canonical_group_labeling())
            .finish()
    }
}

impl<T: ElementIndex> ops::AddAssign<&EqRelation<T>> for EqRelation<T>
{
    fn add_assign(&mut self, other: &EqRelation<T>) {
        self.concat(other);
    }
}

impl<T: ElementIndex> ops::AddAssign for EqRelation<T>
{
    fn add_assign(&mut self, other: EqRelation<T>) {
        self.concat(&other);
    }
}

impl<T: ElementIndex> ops::Add<&EqRelation<T>> for &EqRelation<T>
{
    type Output = EqRelation<T>;

    fn add(self, other: &EqRelation<T>) -> EqRelation<T> {
        let mut r = self.clone();
        r.concat(other);
        r
    }
}

impl<T: ElementIndex> ops::Add<&EqRelation<T>> for EqRelation<T>
{
    type Output = EqRelation<T>;

    fn add(mut self, other: &EqRelation<T>) -> EqRelation<T> {
        self.concat(other);
        self
    }
}

impl<T: ElementIndex> ops::Add for EqRelation<T>
{
    type Output = EqRelation<T>;

    fn add(mut self, other: EqRelation<T>) -> EqRelation<T> {
        self.concat(&other);
        self
    }
}

/// Removing `n` elements drops the last `n` indices.
///
/// Panics if `n` exceeds `len()`.
impl<T: ElementIndex> ops::SubAssign<usize> for EqRelation<T>
{
    fn sub_assign(&mut self, n: usize) {
        self.truncate(n);
    }
}

impl<T: ElementIndex> ops::Sub<usize> for &EqRelation<T>
{
    type Output = EqRelation<T>;

    fn sub(self, n: usize) -> EqRelation<T> {
        let mut r = self.clone();
        r.truncate(n);
        r
    }
}

impl<T: ElementIndex> ops::Sub<usize> for EqRelation<T>
{
    type Output = EqRelation<T>;

    fn sub(mut self, n: usize) -> EqRelation<T> {
        self.truncate(n);
        self
    }
}
