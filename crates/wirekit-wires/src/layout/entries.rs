//! Ordered entry storage and attribute subscription bookkeeping.

use indexmap::IndexMap;
use wirekit_core::SubscriptionId;
use wirekit_scene::{Attribute, NodeId};

use super::entry::LayoutEntry;
use super::grid::Slot;

/// Entries keyed by child id, in insertion order.
///
/// Also remembers the attribute subscription made for every
/// (child id, attribute) pair so removing a child can release exactly its own
/// registrations.
#[derive(Debug, Default)]
pub struct LayoutEntries {
    entries: IndexMap<String, LayoutEntry>,
    registrations: IndexMap<(String, Attribute), SubscriptionId>,
}

impl LayoutEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, entry: LayoutEntry) {
        self.entries.insert(id.into(), entry);
    }

    pub fn get(&self, id: &str) -> Option<&LayoutEntry> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut LayoutEntry> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Id of the entry that positions `node`.
    pub fn key_of(&self, node: NodeId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, entry)| entry.node() == node)
            .map(|(id, _)| id.as_str())
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.entries.get_index_of(id)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &LayoutEntry)> {
        self.entries
            .get_index(index)
            .map(|(id, entry)| (id.as_str(), entry))
    }

    /// Record the subscription made for `attribute` of child `id`.
    pub fn register(&mut self, id: &str, attribute: Attribute, subscription: SubscriptionId) {
        self.registrations
            .insert((id.to_string(), attribute), subscription);
    }

    /// Remove an entry and return its subscriptions.
    pub fn remove(&mut self, id: &str) -> Option<(LayoutEntry, Vec<SubscriptionId>)> {
        let entry = self.entries.shift_remove(id)?;
        let mut subscriptions = Vec::new();
        self.registrations.retain(|(child, _), subscription| {
            if child == id {
                subscriptions.push(*subscription);
                false
            } else {
                true
            }
        });
        Some((entry, subscriptions))
    }

    /// Drop every entry and return all subscriptions.
    pub fn clear(&mut self) -> Vec<SubscriptionId> {
        self.entries.clear();
        self.registrations.drain(..).map(|(_, s)| s).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayoutEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Requested cells of all entries, in insertion order.
    pub fn slots(&self) -> Vec<Slot> {
        self.entries
            .values()
            .map(|entry| (entry.row(), entry.column()))
            .collect()
    }
}
