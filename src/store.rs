use std::cell::RefCell;

use indexmap::IndexSet;
use log::debug;

use crate::error::Error;
use crate::hash::ErHash;
use crate::relation::EqRelation;
use crate::traits::ElementIndex;
use crate::DefaultIndex;

/// Content-addressable store mapping relations to dense ids and back.
///
/// Ids start at 0 and are handed out in the order relations are first seen.
/// Equal relations (see `EqRelation`'s `PartialEq`) always get the same id.
#[derive(Clone, Debug)]
pub struct ErStore<T: ElementIndex = DefaultIndex>
{
    relations: IndexSet<EqRelation<T>, ErHash>
}

impl<T: ElementIndex> Default for ErStore<T>
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ElementIndex> ErStore<T>
{
    /// Create an empty store
    pub fn new() -> Self {
        ErStore {relations: IndexSet::with_hasher(ErHash)}
    }

    /// Returns the id of `relation`, storing a copy under the next free id if it is new.
    pub fn get_id(&mut self, relation: &EqRelation<T>) -> usize {
        if let Some(id) = self.relations.get_index_of(relation) {
            return id;
        }
        let (id, _) = self.relations.insert_full(relation.clone());
        debug!("stored relation [{}] under id {}", relation, id);
        id
    }

    /// Returns the relation stored under `id`.
    pub fn get_er(&self, id: usize) -> Result<&EqRelation<T>, Error> {
        self.relations.get_index(id).ok_or(Error::UnknownId(id))
    }

    /// Returns the number of stored relations
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Returns `true` if nothing has been stored yet
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

thread_local! {
    static STORE: RefCell<ErStore> = RefCell::new(ErStore::new());
}

/// Returns the id of `relation` in this thread's default store.
pub fn get_id(relation: &EqRelation) -> usize
{
    STORE.with(|store| store.borrow_mut().get_id(relation))
}

/// Returns a copy of the relation stored under `id` in this thread's default store.
pub fn get_er(id: usize) -> Result<EqRelation, Error>
{
    STORE.with(|store| store.borrow().get_er(id).cloned())
}
