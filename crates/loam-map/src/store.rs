//! Element storage with spatial-index bookkeeping.
//!
//! An [`ElementStore`] owns one kind's insertion-ordered record list
//! together with the spatial index over it. Every mutation goes through
//! the store, so the list and the index can never disagree: there is no
//! way for a caller to append, drop, or move an element without the
//! matching bucket update happening in the same call.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::records::Positioned;
use crate::rect::{spatial_key, Rect};

/// Slots of the elements whose position falls in one index cell, in
/// insertion order. Most cells hold at most a couple of elements.
type Bucket = SmallVec<[usize; 2]>;

#[derive(Debug)]
struct Entry<R> {
    record: R,
    /// Transient editing state: set when a region clear left this element
    /// in place, so a following copy skips it. Never serialized.
    pending_removal: bool,
}

/// One element kind's records plus the spatial index over them.
///
/// The index maps `(floor(x*2), floor(y*2))` cell keys to insertion-ordered
/// buckets of element slots. Buckets may become empty after removals; they
/// are never pruned, and queries treat an empty bucket and a missing bucket
/// identically.
#[derive(Debug)]
pub struct ElementStore<R> {
    entries: Vec<Entry<R>>,
    index: IndexMap<(i32, i32), Bucket>,
}

impl<R> Default for ElementStore<R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: IndexMap::new(),
        }
    }
}

impl<R: Positioned> ElementStore<R> {
    /// New empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored elements, pending-removal ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no elements.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All records in insertion (and serialization) order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|e| &e.record)
    }

    /// The record at a list position.
    pub fn get(&self, i: usize) -> Option<&R> {
        self.entries.get(i).map(|e| &e.record)
    }

    /// Append a record and index it under its position's cell key.
    pub fn insert(&mut self, record: R) {
        let key = spatial_key(record.position());
        let slot = self.entries.len();
        self.entries.push(Entry {
            record,
            pending_removal: false,
        });
        self.index.entry(key).or_default().push(slot);
    }

    /// Slots of every indexed element inside `rect`, cell-by-cell in
    /// row-major order, bucket-insertion order within a cell.
    fn rect_slots(&self, rect: Rect) -> impl Iterator<Item = usize> + '_ {
        (rect.y0..=rect.y1).flat_map(move |y| {
            (rect.x0..=rect.x1)
                .filter_map(move |x| self.index.get(&(x, y)))
                .flatten()
                .copied()
        })
    }

    /// Every record whose spatial key falls inside `rect`.
    pub fn in_rect(&self, rect: Rect) -> impl Iterator<Item = &R> + '_ {
        self.rect_slots(rect).map(|s| &self.entries[s].record)
    }

    /// Like [`ElementStore::in_rect`], but skipping elements flagged for
    /// pending removal.
    pub fn live_in_rect(&self, rect: Rect) -> impl Iterator<Item = &R> + '_ {
        self.rect_slots(rect)
            .filter(|&s| !self.entries[s].pending_removal)
            .map(|s| &self.entries[s].record)
    }

    /// Flag every element inside `rect` as pending removal.
    ///
    /// Flagged elements stay list members (and are still serialized); they
    /// are only invisible to [`ElementStore::live_in_rect`].
    pub fn mark_removed_in(&mut self, rect: Rect) {
        let slots: Vec<usize> = self.rect_slots(rect).collect();
        for slot in slots {
            self.entries[slot].pending_removal = true;
        }
    }

    /// Physically drop every element whose spatial key falls inside
    /// `rect`, from both the list and its index bucket.
    pub fn remove_in(&mut self, rect: Rect) -> usize {
        self.retain(|record| !rect.contains(spatial_key(record.position())))
    }

    /// Keep only elements satisfying `keep`, preserving relative order.
    ///
    /// Dropped elements are removed from their buckets; surviving slots
    /// are renumbered across the whole index. Returns the number of
    /// elements removed.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&R) -> bool,
    {
        let old = std::mem::take(&mut self.entries);
        let mut remap = vec![usize::MAX; old.len()];
        let mut kept = Vec::with_capacity(old.len());
        for (slot, entry) in old.into_iter().enumerate() {
            if keep(&entry.record) {
                remap[slot] = kept.len();
                kept.push(entry);
            } else {
                let key = spatial_key(entry.record.position());
                if let Some(bucket) = self.index.get_mut(&key) {
                    if let Some(i) = bucket.iter().position(|&s| s == slot) {
                        bucket.remove(i);
                    }
                }
            }
        }
        let removed = remap.len() - kept.len();
        self.entries = kept;
        for bucket in self.index.values_mut() {
            for slot in bucket.iter_mut() {
                *slot = remap[*slot];
            }
        }
        removed
    }

    /// Records bucketed under one index cell, in insertion order.
    pub fn bucket(&self, key: (i32, i32)) -> impl Iterator<Item = &R> + '_ {
        self.index
            .get(&key)
            .into_iter()
            .flatten()
            .map(|&s| &self.entries[s].record)
    }

    /// Index cells with at least one element.
    pub fn occupied_keys(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.index
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(&key, _)| key)
    }
}
