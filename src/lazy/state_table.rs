use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Mutex;

use crate::StateId;

/// Bijection between expansion tuples (for instance `(s1, s2, filter)` in
/// composition) and the dense state ids of the delayed result. Ids are
/// allocated in first-seen order, so the output numbering is deterministic
/// for a deterministic expansion order.
pub struct StateTable<T: Hash + Eq + Clone> {
    table: Mutex<StateTableInner<T>>,
}

struct StateTableInner<T> {
    tuple_to_id: HashMap<T, StateId>,
    id_to_tuple: Vec<T>,
}

impl<T: Hash + Eq + Clone> StateTable<T> {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(StateTableInner {
                tuple_to_id: HashMap::new(),
                id_to_tuple: vec![],
            }),
        }
    }

    /// Id of `tuple`, allocating a fresh one on first sight.
    pub fn find_id(&self, tuple: T) -> StateId {
        let mut table = self.table.lock().unwrap();
        if let Some(&id) = table.tuple_to_id.get(&tuple) {
            return id;
        }
        let id = table.id_to_tuple.len();
        table.id_to_tuple.push(tuple.clone());
        table.tuple_to_id.insert(tuple, id);
        id
    }

    /// Like [`find_id`](StateTable::find_id) but clones only on insertion.
    pub fn find_id_from_ref(&self, tuple: &T) -> StateId {
        let mut table = self.table.lock().unwrap();
        if let Some(&id) = table.tuple_to_id.get(tuple) {
            return id;
        }
        let id = table.id_to_tuple.len();
        table.id_to_tuple.push(tuple.clone());
        table.tuple_to_id.insert(tuple.clone(), id);
        id
    }

    /// Tuple interned under `id`.
    ///
    /// Panics if `id` was never allocated; ids only come from `find_id`.
    pub fn find_tuple(&self, id: StateId) -> T {
        let table = self.table.lock().unwrap();
        table.id_to_tuple[id].clone()
    }

    pub fn len(&self) -> usize {
        self.table.lock().unwrap().id_to_tuple.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Hash + Eq + Clone> Default for StateTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq + Clone + Debug> Debug for StateTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let table = self.table.lock().unwrap();
        f.debug_struct("StateTable")
            .field("id_to_tuple", &table.id_to_tuple)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_table_bijection() {
        let table = StateTable::<(usize, usize)>::new();
        let a = table.find_id((0, 0));
        let b = table.find_id((0, 1));
        assert_eq!(a, 0);
        assert_eq!(b, 1);
        assert_eq!(table.find_id((0, 0)), a);
        assert_eq!(table.find_tuple(b), (0, 1));
        assert_eq!(table.len(), 2);
    }
}
