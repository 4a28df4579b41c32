//! In-memory tag store.
//!
//! [`InMemoryTagStore`] keeps entries and both tag indices in one state
//! struct behind a single `RwLock`, so a write batch and a cascade are
//! always applied atomically with respect to readers.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexSet;
use tracing::debug;

use tagdb_types::Value;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::{TagReader, TagWriter};

/// Insertion-ordered identifier set.
type TagSet = IndexSet<String>;

/// Lazily evaluated accessor for the value of an identifier visited by
/// [`TagReader::iter`].
pub struct ValueHandle<'a> {
    entries: &'a HashMap<String, Value>,
    id: &'a str,
}

impl ValueHandle<'_> {
    /// The identifier this handle resolves.
    pub fn id(&self) -> &str {
        self.id
    }

    /// Look the value up. `None` means the identifier is listed under the
    /// tag but has no entry of its own.
    pub fn get(&self) -> Option<Value> {
        self.entries.get(self.id).cloned()
    }
}

#[derive(Default)]
struct TagState {
    entries: HashMap<String, Value>,
    /// id -> tags it was tagged with.
    forward: HashMap<String, TagSet>,
    /// tag -> ids tagged with it, in insertion order.
    reverse: HashMap<String, TagSet>,
}

/// Identifiers seen and removed during one `invalidate` call.
#[derive(Default)]
struct Sweep {
    visited: HashSet<String>,
    deleted: Vec<String>,
}

/// One identifier whose members are being drained.
struct Frame {
    id: String,
    members: Vec<String>,
    next: usize,
}

impl TagState {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            forward: HashMap::with_capacity(capacity),
            reverse: HashMap::with_capacity(capacity),
        }
    }

    fn put(&mut self, id: &str, value: Value) {
        self.entries.insert(id.to_string(), value);
    }

    /// Returns the number of edges that did not exist before.
    fn tag(&mut self, id: &str, tags: &[String]) -> usize {
        let mut added = 0;
        for tag in tags {
            if self
                .reverse
                .entry(tag.clone())
                .or_default()
                .insert(id.to_string())
            {
                added += 1;
            }
            self.forward
                .entry(id.to_string())
                .or_default()
                .insert(tag.clone());
        }
        added
    }

    fn invalidate(&mut self, ids: &[String]) -> Vec<String> {
        let mut sweep = Sweep::default();
        for id in ids {
            self.cascade(id, &mut sweep);
        }
        sweep.deleted
    }

    /// Depth-first deletion from `root`, driven by an explicit frame stack
    /// so chain length is bounded by the heap, not the thread stack.
    fn cascade(&mut self, root: &str, sweep: &mut Sweep) {
        let mut stack: Vec<Frame> = self.enter(root, sweep).into_iter().collect();
        while let Some(frame) = stack.last_mut() {
            if frame.next < frame.members.len() {
                let member = std::mem::take(&mut frame.members[frame.next]);
                frame.next += 1;
                if let Some(child) = self.enter(&member, sweep) {
                    stack.push(child);
                }
            } else if let Some(done) = stack.pop() {
                self.leave(&done.id);
            }
        }
    }

    /// First visit of `id`: delete its entry and snapshot its members.
    fn enter(&mut self, id: &str, sweep: &mut Sweep) -> Option<Frame> {
        if !sweep.visited.insert(id.to_string()) {
            return None;
        }

        if self.entries.remove(id).is_some() {
            self.unlink_forward(id);
            sweep.deleted.push(id.to_string());
        }

        let members = self
            .reverse
            .get(id)
            .map(|m| m.iter().cloned().collect())
            .unwrap_or_default();
        Some(Frame {
            id: id.to_string(),
            members,
            next: 0,
        })
    }

    /// All members of `id` drained: clear its reverse set.
    fn leave(&mut self, id: &str) {
        // Whatever is still listed has no entry (pure tags, or members
        // still being drained lower in the frame stack).
        if let Some(survivors) = self.reverse.remove(id) {
            for member in &survivors {
                self.drop_forward_edge(member, id);
            }
        }
    }

    /// Remove `id` from the reverse set of every tag it carries.
    fn unlink_forward(&mut self, id: &str) {
        let Some(tags) = self.forward.remove(id) else {
            return;
        };
        for tag in &tags {
            if let Some(members) = self.reverse.get_mut(tag) {
                members.shift_remove(id);
                if members.is_empty() {
                    self.reverse.remove(tag);
                }
            }
        }
    }

    fn drop_forward_edge(&mut self, id: &str, tag: &str) {
        if let Some(tags) = self.forward.get_mut(id) {
            tags.shift_remove(tag);
            if tags.is_empty() {
                self.forward.remove(id);
            }
        }
    }

    fn verify(&self) -> StoreResult<()> {
        for (tag, members) in &self.reverse {
            for id in members {
                if !self.forward.get(id).is_some_and(|tags| tags.contains(tag)) {
                    return Err(StoreError::IndexInconsistent {
                        id: id.clone(),
                        tag: tag.clone(),
                        reason: "reverse edge without matching forward edge".into(),
                    });
                }
            }
        }
        for (id, tags) in &self.forward {
            for tag in tags {
                if !self.reverse.get(tag).is_some_and(|members| members.contains(id)) {
                    return Err(StoreError::IndexInconsistent {
                        id: id.clone(),
                        tag: tag.clone(),
                        reason: "forward edge without matching reverse edge".into(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Writer handle passed to [`InMemoryTagStore::update`].
///
/// Only exists while the store's write lock is held.
pub struct StoreWriter<'a> {
    state: &'a mut TagState,
    puts: usize,
    edges: usize,
    deleted: usize,
}

impl TagWriter for StoreWriter<'_> {
    fn put(&mut self, id: &str, value: Value) {
        self.state.put(id, value);
        self.puts += 1;
    }

    fn tag(&mut self, id: &str, tags: &[String]) {
        self.edges += self.state.tag(id, tags);
    }

    fn invalidate(&mut self, ids: &[String]) -> Vec<String> {
        let deleted = self.state.invalidate(ids);
        debug!(
            requested = ids.len(),
            deleted = deleted.len(),
            "invalidated identifiers"
        );
        self.deleted += deleted.len();
        deleted
    }
}

/// In-memory, tag-indexed store.
///
/// Reads share a `RwLock` read guard; [`update`](Self::update) holds the
/// write guard for a whole batch. The lock is not reentrant: calling back
/// into the store from inside `update` or a fill producer deadlocks.
pub struct InMemoryTagStore {
    state: RwLock<TagState>,
}

impl InMemoryTagStore {
    /// Create a new empty store with default configuration.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            state: RwLock::new(TagState::with_capacity(config.initial_capacity)),
        }
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, TagState>> {
        self.state
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, TagState>> {
        self.state
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    /// Run `f` with exclusive write access.
    ///
    /// Returns whatever `f` returns. Mutations applied before `f` fails are
    /// kept.
    pub fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut StoreWriter<'_>) -> Result<T, E>,
        E: From<StoreError>,
    {
        let mut state = self.write_state()?;
        let mut writer = StoreWriter {
            state: &mut *state,
            puts: 0,
            edges: 0,
            deleted: 0,
        };
        let result = f(&mut writer);
        debug!(
            puts = writer.puts,
            edges = writer.edges,
            deleted = writer.deleted,
            ok = result.is_ok(),
            "write scope closed"
        );
        result
    }

    /// Number of entries currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.entries.len())
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_state()?.entries.is_empty())
    }

    /// Sorted list of all identifiers that have an entry.
    pub fn ids(&self) -> StoreResult<Vec<String>> {
        let state = self.read_state()?;
        let mut ids: Vec<String> = state.entries.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Tags `id` was tagged with, in insertion order.
    pub fn forward_tags(&self, id: &str) -> StoreResult<Vec<String>> {
        let state = self.read_state()?;
        Ok(state
            .forward
            .get(id)
            .map(|tags| tags.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Identifiers tagged with `tag`, in insertion order.
    pub fn tagged_with(&self, tag: &str) -> StoreResult<Vec<String>> {
        let state = self.read_state()?;
        Ok(state
            .reverse
            .get(tag)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Check that the forward and reverse indices mirror each other.
    pub fn verify_index(&self) -> StoreResult<()> {
        self.read_state()?.verify()
    }
}

impl Default for InMemoryTagStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TagReader for InMemoryTagStore {
    fn get(&self, id: &str) -> StoreResult<Option<Value>> {
        let state = self.read_state()?;
        Ok(state.entries.get(id).cloned())
    }

    fn contains(&self, id: &str) -> StoreResult<bool> {
        Ok(self.read_state()?.entries.contains_key(id))
    }

    fn get_or_fill(
        &self,
        id: &str,
        produce: &mut dyn FnMut() -> Option<Value>,
    ) -> StoreResult<Option<Value>> {
        {
            let state = self.read_state()?;
            if let Some(value) = state.entries.get(id) {
                return Ok(Some(value.clone()));
            }
        }

        // Re-check under the write lock so concurrent misses fill once.
        let mut state = self.write_state()?;
        if let Some(value) = state.entries.get(id) {
            return Ok(Some(value.clone()));
        }

        match produce() {
            Some(value) => {
                state.put(id, value.clone());
                debug!(id, "filled missing entry");
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn iter(
        &self,
        tag: &str,
        visit: &mut dyn FnMut(&str, &ValueHandle<'_>) -> bool,
    ) -> StoreResult<()> {
        let state = self.read_state()?;
        let Some(members) = state.reverse.get(tag) else {
            return Ok(());
        };
        for id in members {
            let handle = ValueHandle {
                entries: &state.entries,
                id: id.as_str(),
            };
            if !visit(id.as_str(), &handle) {
                break;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for InMemoryTagStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("InMemoryTagStore");
        match self.state.read() {
            Ok(state) => s
                .field("entry_count", &state.entries.len())
                .field("tag_count", &state.reverse.len())
                .finish(),
            Err(_) => s.field("poisoned", &true).finish(),
        }
    }
}
