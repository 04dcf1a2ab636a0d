//! Fixed-capacity application slot table
//!
//! Reconciliation is purely positional: slot `i` tracks entry `i` of the
//! latest report regardless of what the entry contains.

use std::sync::Arc;

use tracing::debug;

use crate::application::CardApplication;
use crate::types::{AppType, ApplicationStatus};

/// Ordered, fixed-capacity table of card applications
#[derive(Debug)]
pub struct ApplicationSlotTable {
    slots: Vec<Option<Arc<CardApplication>>>,
}

impl ApplicationSlotTable {
    /// Create an empty table with `capacity` slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Number of slots in the table
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Bring slot occupancy in line with `entries`
    ///
    /// New slots get a fresh application, persisting slots are updated in
    /// place and slots past the end of `entries` are disposed and cleared.
    pub fn reconcile(&mut self, entries: &[ApplicationStatus]) {
        if entries.len() > self.capacity() {
            debug!(
                reported = entries.len(),
                capacity = self.capacity(),
                "Ignoring applications beyond slot capacity"
            );
        }

        for (index, slot) in self.slots.iter_mut().enumerate() {
            match (slot.take(), entries.get(index)) {
                (None, Some(entry)) => {
                    *slot = Some(Arc::new(CardApplication::new(index, entry)));
                }
                (Some(app), None) => app.dispose(),
                (Some(app), Some(entry)) => {
                    app.update(entry);
                    *slot = Some(app);
                }
                (None, None) => {}
            }
        }
    }

    /// Dispose and clear every occupied slot
    pub fn dispose_all(&mut self) {
        for slot in &mut self.slots {
            if let Some(app) = slot.take() {
                app.dispose();
            }
        }
    }

    /// Application at `index`, `None` when out of range or empty
    pub fn get(&self, index: usize) -> Option<&Arc<CardApplication>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Number of occupied slots
    pub fn occupied(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// First application of the given type
    pub fn find_type(&self, app_type: AppType) -> Option<&Arc<CardApplication>> {
        self.iter().find(|app| app.app_type() == app_type)
    }

    /// Iterate over occupied slots in index order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CardApplication>> {
        self.slots.iter().flatten()
    }
}
