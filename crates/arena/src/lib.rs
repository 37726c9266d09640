//! Generational Arena
//!
//! Slot storage for host-tree elements. Every handle carries the generation
//! of the slot it was issued for, so a handle to an element the host has
//! since destroyed resolves to `None` instead of aliasing whatever element
//! reused the slot.

use std::fmt;

/// Handle to a value stored in an [`Arena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenIndex {
    pub index: u32,
    pub generation: u32,
}

impl fmt::Debug for GenIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

enum Slot<T> {
    Occupied { generation: u32, value: T },
    Vacant { generation: u32, next_free: Option<u32> },
}

impl<T> Slot<T> {
    fn generation(&self) -> u32 {
        match self {
            Slot::Occupied { generation, .. } | Slot::Vacant { generation, .. } => *generation,
        }
    }
}

pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    /// Store `value` and return its handle. Vacant slots are reused with a
    /// bumped generation.
    pub fn allocate(&mut self, value: T) -> GenIndex {
        self.len += 1;
        match self.free_head {
            Some(i) => {
                let slot = &mut self.slots[i as usize];
                let (generation, next_free) = match slot {
                    Slot::Vacant { generation, next_free } => (*generation, *next_free),
                    Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
                };
                self.free_head = next_free;
                *slot = Slot::Occupied { generation, value };
                GenIndex { index: i, generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot::Occupied { generation: 0, value });
                GenIndex { index, generation: 0 }
            }
        }
    }

    pub fn get(&self, id: GenIndex) -> Option<&T> {
        match self.slots.get(id.index as usize)? {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: GenIndex) -> Option<&mut T> {
        match self.slots.get_mut(id.index as usize)? {
            Slot::Occupied { generation, value } if *generation == id.generation => Some(value),
            _ => None,
        }
    }

    /// Free the slot behind `id`. Stale or already-freed handles return `None`.
    pub fn deallocate(&mut self, id: GenIndex) -> Option<T> {
        if self.get(id).is_none() {
            return None;
        }
        let slot = &mut self.slots[id.index as usize];
        let vacant = Slot::Vacant {
            generation: slot.generation().wrapping_add(1),
            next_free: self.free_head,
        };
        let old = std::mem::replace(slot, vacant);
        self.free_head = Some(id.index);
        self.len -= 1;
        match old {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn contains(&self, id: GenIndex) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Live values in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (GenIndex, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Occupied { generation, value } => Some((
                GenIndex {
                    index: i as u32,
                    generation: *generation,
                },
                value,
            )),
            Slot::Vacant { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_get() {
        let mut arena = Arena::new();
        let id = arena.allocate("row");
        assert_eq!(arena.get(id), Some(&"row"));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stale_handle_after_reuse() {
        let mut arena = Arena::new();
        let old = arena.allocate("old list");
        assert_eq!(arena.deallocate(old), Some("old list"));
        let new = arena.allocate("new list");
        assert_eq!(old.index, new.index);
        assert_ne!(old.generation, new.generation);
        assert_eq!(arena.get(old), None);
        assert_eq!(arena.get(new), Some(&"new list"));
    }

    #[test]
    fn double_deallocate_is_none() {
        let mut arena = Arena::new();
        let id = arena.allocate(7);
        assert_eq!(arena.deallocate(id), Some(7));
        assert_eq!(arena.deallocate(id), None);
        assert!(arena.is_empty());
    }

    #[test]
    fn free_list_is_lifo() {
        let mut arena = Arena::new();
        let a = arena.allocate(1);
        let b = arena.allocate(2);
        arena.deallocate(a);
        arena.deallocate(b);
        assert_eq!(arena.allocate(3).index, b.index);
        assert_eq!(arena.allocate(4).index, a.index);
    }

    #[test]
    fn iter_skips_vacant() {
        let mut arena = Arena::new();
        arena.allocate(10);
        let b = arena.allocate(20);
        arena.allocate(30);
        arena.deallocate(b);
        let values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![10, 30]);
    }

    #[test]
    fn get_mut_modifies_in_place() {
        let mut arena = Arena::new();
        let id = arena.allocate(String::from("translateY(0px)"));
        arena.get_mut(id).unwrap().push_str(" scale(1)");
        assert_eq!(arena.get(id).unwrap(), "translateY(0px) scale(1)");
    }

    #[test]
    fn out_of_range_handle() {
        let arena: Arena<u8> = Arena::new();
        assert!(!arena.contains(GenIndex { index: 42, generation: 0 }));
    }
}
