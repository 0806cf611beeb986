//! Arena of loaded objects.
//!
//! The store is the only owner of [`ObjectRecord`]s. Every other component
//! refers to them through [`RecordRef`] handles, which stay valid until the
//! next [`ObjectStore::clear`].

use std::collections::HashMap;
use std::ops::Index;

use crate::catalogs::{Catalog, CatalogDesignation, NUMERIC_CATALOG_COUNT};
use crate::object::ObjectRecord;

/// Handle to a record in an [`ObjectStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordRef(u32);

impl RecordRef {
    /// Slot index within the store.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owns every loaded record plus the lookup tables built at insertion.
#[derive(Debug, Default)]
pub struct ObjectStore {
    records: Vec<ObjectRecord>,
    by_id: HashMap<u32, RecordRef>,
    by_number: [HashMap<u32, RecordRef>; NUMERIC_CATALOG_COUNT],
    by_ced: HashMap<String, RecordRef>,
}

impl ObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `record` and index it.
    ///
    /// When two records share an internal id or a catalog designation the
    /// first one inserted keeps the lookup entry.
    pub fn insert(&mut self, record: ObjectRecord) -> RecordRef {
        let handle = RecordRef(self.records.len() as u32);

        if record.internal_id != 0 {
            self.by_id.entry(record.internal_id).or_insert(handle);
        }
        for (slot, &number) in record.catalog_numbers.raw_numbers().iter().enumerate() {
            if number != 0 {
                self.by_number[slot].entry(number).or_insert(handle);
            }
        }
        if let Some(ced) = record.catalog_numbers.ced() {
            self.by_ced.entry(ced.to_uppercase()).or_insert(handle);
        }

        self.records.push(record);
        handle
    }

    /// Drop every record. All outstanding handles become invalid.
    pub fn clear(&mut self) {
        self.records.clear();
        self.by_id.clear();
        for map in self.by_number.iter_mut() {
            map.clear();
        }
        self.by_ced.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, handle: RecordRef) -> Option<&ObjectRecord> {
        self.records.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: RecordRef) -> Option<&mut ObjectRecord> {
        self.records.get_mut(handle.index())
    }

    /// Records in insertion order, with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (RecordRef, &ObjectRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RecordRef(i as u32), r))
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut ObjectRecord> + '_ {
        self.records.iter_mut()
    }

    pub fn find_by_id(&self, internal_id: u32) -> Option<RecordRef> {
        if internal_id == 0 {
            return None;
        }
        self.by_id.get(&internal_id).copied()
    }

    /// Record carrying `designation` in `catalog`. Cederblad designators are
    /// compared case-insensitively.
    pub fn find_by_catalog(
        &self,
        catalog: Catalog,
        designation: &CatalogDesignation,
    ) -> Option<RecordRef> {
        match (catalog.slot(), designation) {
            (Some(_), CatalogDesignation::Number(0)) => None,
            (Some(slot), CatalogDesignation::Number(n)) => self.by_number[slot].get(n).copied(),
            (Some(slot), CatalogDesignation::Text(text)) => {
                let n: u32 = text.trim().parse().ok()?;
                self.by_number[slot].get(&n).copied()
            }
            (None, designation) => {
                let key = designation.to_string().trim().to_uppercase();
                if key.is_empty() {
                    return None;
                }
                self.by_ced.get(&key).copied()
            }
        }
    }

    /// Shorthand for numeric catalogs.
    pub fn find_by_number(&self, catalog: Catalog, number: u32) -> Option<RecordRef> {
        self.find_by_catalog(catalog, &CatalogDesignation::Number(number))
    }
}

impl Index<RecordRef> for ObjectStore {
    type Output = ObjectRecord;

    /// Panics on a handle from before the last `clear`.
    fn index(&self, handle: RecordRef) -> &ObjectRecord {
        &self.records[handle.index()]
    }
}
