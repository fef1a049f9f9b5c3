//! Entity handles and the id allocator
//!
//! Entities are lightweight handles (8 bytes). The numeric id is what the
//! rest of the engine logs and displays; the generation counter lets the
//! world reject handles that outlived the entity they pointed at.

use std::collections::VecDeque;
use std::fmt;

/// Raw numeric entity identifier. `0` is reserved.
pub type EntityId = u32;

/// Incremented every time an id is destroyed.
pub type Generation = u32;

/// Entity handle (id + generation)
///
/// Format: [32-bit generation | 32-bit id]
/// - Id: starts at 1, recycled in FIFO order after destruction
/// - Generation: bumped on destruction so stale handles stop matching
///
/// Example:
/// ```ignore
/// let entity = world.create_entity();
/// world.destroy_entity(entity);
/// let reused = world.create_entity();
/// assert_eq!(reused.id(), entity.id());
/// assert_ne!(reused, entity); // old handle is now stale
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: EntityId,
    generation: Generation,
}

impl Entity {
    /// The "none" sentinel. Never handed out by [`EntityRegistry::create`].
    pub const INVALID: Self = Self {
        id: 0,
        generation: 0,
    };

    pub(crate) const fn new(id: EntityId, generation: Generation) -> Self {
        Self { id, generation }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.id != 0
    }

    /// Pack into 64 bits (for debug tooling and logs)
    pub fn to_bits(&self) -> u64 {
        ((self.generation as u64) << 32) | (self.id as u64)
    }

    pub fn from_bits(bits: u64) -> Self {
        Self {
            id: bits as u32,
            generation: (bits >> 32) as u32,
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.id, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Allocates and recycles entity ids.
///
/// Does not know about components: whoever destroys an entity must also
/// purge it from every component store.
pub struct EntityRegistry {
    next_id: EntityId,
    free: VecDeque<EntityId>,
    // Indexed by id; slot 0 is the sentinel and never alive.
    generations: Vec<Generation>,
    alive: Vec<bool>,
    live: usize,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            free: VecDeque::new(),
            generations: vec![0],
            alive: vec![false],
            live: 0,
        }
    }

    /// Hand out a recycled id (oldest first) or mint the next one.
    pub fn create(&mut self) -> Entity {
        let id = match self.free.pop_front() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.generations.push(0);
                self.alive.push(false);
                id
            }
        };

        let slot = id as usize;
        self.alive[slot] = true;
        self.live += 1;
        Entity::new(id, self.generations[slot])
    }

    /// Mark `entity` dead and queue its id for reuse.
    ///
    /// Returns `false` (and does nothing) for the sentinel, for handles that
    /// were never issued and for handles that are already dead.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let slot = entity.id as usize;
        self.alive[slot] = false;
        self.generations[slot] = self.generations[slot].wrapping_add(1);
        self.free.push_back(entity.id);
        self.live -= 1;
        true
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.id as usize;
        entity.is_valid()
            && self.alive.get(slot).copied().unwrap_or(false)
            && self.generations[slot] == entity.generation
    }

    /// Current handle for a raw id, if that id is alive.
    pub fn resolve(&self, id: EntityId) -> Option<Entity> {
        let slot = id as usize;
        if id != 0 && self.alive.get(slot).copied().unwrap_or(false) {
            Some(Entity::new(id, self.generations[slot]))
        } else {
            None
        }
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Live handles in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(slot, _)| Entity::new(slot as EntityId, self.generations[slot]))
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}
