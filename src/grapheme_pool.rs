//! Reference-counted, process-wide pool for multi-codepoint grapheme clusters.
//!
//! Emoji, ZWJ sequences, and other multi-byte clusters are too complex to
//! represent as a single `char` in a packed cell, so the engine interns
//! their canonical byte sequence once and refers to it by a small
//! [`GraphemeId`] handle everywhere else (§4.4 of the design doc).
//!
//! # Design
//!
//! - Slots store UTF-8 bytes of grapheme clusters.
//! - 24-bit ID allows ~16M unique graphemes.
//! - Reference counting plus a free-list for O(1) slot reuse.
//! - A `HashMap<String, u32>` side index makes `intern` O(1) amortized
//!   instead of a linear scan, since `intern` runs on the buffer's hot
//!   edit path, not only in test code.
//!
//! # Invariants
//!
//! - Pool ID 0 is reserved/invalid (placeholder IDs use pool_id 0).
//! - Refcount starts at 1 on alloc.
//! - `decref` returns `true` if references remain, `false` if freed.
//! - `get` returns `None` for freed or invalid IDs.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::unicode::width::{WidthMethod, display_width_with_method};

/// Maximum pool ID (24-bit limit).
pub const MAX_POOL_ID: u32 = 0x00FF_FFFF;

const WIDTH_SHIFT: u32 = 24;
const WIDTH_MASK: u32 = 0x7F << WIDTH_SHIFT;
const ID_MASK: u32 = 0x00FF_FFFF;
const MAX_WIDTH: u8 = 127;

/// Opaque handle into the [`GraphemePool`].
///
/// Packs a 24-bit pool slot id and a 7-bit cached display width into one
/// `u32` so a buffer's cluster list can store handles inline instead of
/// boxed strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphemeId(u32);

impl GraphemeId {
    /// Build a handle from a pool id and a display width (saturated to 127).
    #[must_use]
    pub fn new(pool_id: u32, width: u8) -> Self {
        let pool_id = pool_id & ID_MASK;
        let width = width.min(MAX_WIDTH);
        Self(pool_id | (u32::from(width) << WIDTH_SHIFT))
    }

    /// The 24-bit pool slot id.
    #[must_use]
    pub const fn pool_id(self) -> u32 {
        self.0 & ID_MASK
    }

    /// The cached display width (0-127 columns).
    #[must_use]
    pub const fn width(self) -> u8 {
        ((self.0 & WIDTH_MASK) >> WIDTH_SHIFT) as u8
    }

    /// Whether this handle refers to the reserved invalid slot.
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.pool_id() == 0
    }
}

#[derive(Clone, Debug)]
struct Slot {
    bytes: String,
    refcount: u32,
    width: u8,
}

impl Slot {
    fn is_free(&self) -> bool {
        self.refcount == 0
    }
}

/// Reference-counted pool for grapheme clusters.
///
/// Stores multi-codepoint graphemes (emoji, ZWJ sequences, combining
/// characters) and provides O(1) access via [`GraphemeId`]. Not
/// thread-safe by itself; [`global`] wraps the process-wide instance in a
/// `Mutex`.
#[derive(Clone, Debug, Default)]
pub struct GraphemePool {
    /// Storage for grapheme slots. Index 0 is reserved (invalid).
    slots: Vec<Slot>,
    /// Stack of free slot indices for reuse.
    free_list: Vec<u32>,
    /// Byte-sequence -> pool id, for O(1) `intern`.
    index: HashMap<String, u32>,
}

impl GraphemePool {
    /// Create a new empty grapheme pool. Slot 0 is reserved as invalid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                bytes: String::new(),
                refcount: 0,
                width: 0,
            }],
            free_list: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create a pool with pre-allocated capacity (excludes reserved slot 0).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut pool = Self::new();
        pool.slots.reserve(capacity);
        pool.index.reserve(capacity);
        pool
    }

    /// Allocate a new grapheme in the pool with refcount 1.
    ///
    /// Does not consult the interning index; always creates a fresh slot.
    /// Width is computed under the `unicode` policy, matching the default
    /// cluster-width contract at the pool layer (callers that need a
    /// different policy's width should `intern` via the buffer/layout
    /// layer, which already knows the active [`WidthMethod`]).
    ///
    /// # Panics
    ///
    /// Panics if the pool exceeds 16M entries (24-bit ID limit).
    #[must_use]
    pub fn alloc(&mut self, grapheme: &str) -> GraphemeId {
        self.alloc_with_method(grapheme, WidthMethod::Unicode)
    }

    /// Allocate a new grapheme, computing its width under a specific policy.
    #[must_use]
    pub fn alloc_with_method(&mut self, grapheme: &str, method: WidthMethod) -> GraphemeId {
        let width = display_width_with_method(grapheme, method).min(usize::from(u8::MAX)) as u8;
        let slot = Slot {
            bytes: grapheme.to_owned(),
            refcount: 1,
            width,
        };

        let pool_id = if let Some(free_id) = self.free_list.pop() {
            self.slots[free_id as usize] = slot;
            free_id
        } else {
            let id = self.slots.len() as u32;
            assert!(id <= MAX_POOL_ID, "GraphemePool exceeded 16M entry limit");
            self.slots.push(slot);
            id
        };

        self.index.insert(grapheme.to_owned(), pool_id);
        GraphemeId::new(pool_id, width)
    }

    /// Intern a grapheme, returning an existing id (with bumped refcount)
    /// if already allocated, otherwise allocating a new slot.
    #[must_use]
    pub fn intern(&mut self, grapheme: &str) -> GraphemeId {
        self.intern_with_method(grapheme, WidthMethod::Unicode)
    }

    /// Intern a grapheme under a specific width policy.
    #[must_use]
    pub fn intern_with_method(&mut self, grapheme: &str, method: WidthMethod) -> GraphemeId {
        if let Some(&pool_id) = self.index.get(grapheme) {
            if self.slots[pool_id as usize].refcount > 0 {
                let width = self.slots[pool_id as usize].width;
                self.incref_by_pool_id(pool_id);
                return GraphemeId::new(pool_id, width);
            }
            self.index.remove(grapheme);
        }
        self.alloc_with_method(grapheme, method)
    }

    /// Increment the reference count for a grapheme id. No-op if invalid/freed.
    pub fn incref(&mut self, id: GraphemeId) {
        self.incref_by_pool_id(id.pool_id());
    }

    fn incref_by_pool_id(&mut self, pool_id: u32) {
        if let Some(slot) = self.slots.get_mut(pool_id as usize) {
            if slot.refcount > 0 {
                slot.refcount = slot.refcount.saturating_add(1);
            }
        }
    }

    /// Decrement the reference count. Returns `true` if references remain,
    /// `false` if the slot was freed (or was already invalid).
    pub fn decref(&mut self, id: GraphemeId) -> bool {
        let pool_id = id.pool_id();
        if let Some(slot) = self.slots.get_mut(pool_id as usize) {
            if slot.refcount > 0 {
                slot.refcount -= 1;
                if slot.refcount == 0 {
                    self.index.remove(&slot.bytes);
                    slot.bytes.clear();
                    self.free_list.push(pool_id);
                    return false;
                }
                return true;
            }
        }
        false
    }

    /// Get the grapheme string for an id. `None` if invalid or freed.
    #[must_use]
    pub fn get(&self, id: GraphemeId) -> Option<&str> {
        self.slots.get(id.pool_id() as usize).and_then(|slot| {
            if slot.is_free() {
                None
            } else {
                Some(slot.bytes.as_str())
            }
        })
    }

    /// Get the cached width for an id. 0 if invalid or freed.
    #[must_use]
    pub fn width(&self, id: GraphemeId) -> u8 {
        self.slots
            .get(id.pool_id() as usize)
            .filter(|slot| !slot.is_free())
            .map_or(0, |slot| slot.width)
    }

    /// Get the refcount for an id. 0 for invalid or freed ids.
    #[must_use]
    pub fn refcount(&self, id: GraphemeId) -> u32 {
        self.slots
            .get(id.pool_id() as usize)
            .map_or(0, |slot| slot.refcount)
    }

    /// Check if an id is allocated and not freed.
    #[must_use]
    pub fn is_valid(&self, id: GraphemeId) -> bool {
        self.slots
            .get(id.pool_id() as usize)
            .is_some_and(|slot| !slot.is_free())
    }

    /// Number of active (non-freed) graphemes in the pool.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().skip(1).filter(|s| !s.is_free()).count()
    }

    /// Total number of slots, excluding the reserved slot 0.
    #[must_use]
    pub fn total_slots(&self) -> usize {
        self.slots.len().saturating_sub(1)
    }

    /// Number of free slots available for reuse.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Clear the pool back to its initial state (slot 0 only).
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        self.free_list.clear();
        self.index.clear();
    }
}

/// The process-wide grapheme pool, guarded by a single mutex.
///
/// Buffers intern multi-byte clusters here so identical clusters across
/// (and within) documents share one allocation and compare by handle.
#[must_use]
pub fn global() -> &'static Mutex<GraphemePool> {
    static POOL: OnceLock<Mutex<GraphemePool>> = OnceLock::new();
    POOL.get_or_init(|| Mutex::new(GraphemePool::new()))
}
