//! Lookup of loaded objects by typed text, catalog number, id or position.

pub mod autocomplete;
pub mod designation;

use nalgebra::Vector3;
use tracing::debug;

use crate::catalogs::{Catalog, CatalogDesignation};
use crate::object::ObjectRecord;
use crate::store::{ObjectStore, RecordRef};

pub use autocomplete::match_object_name;
pub use designation::parse_designation;

/// Cosine of the largest separation [`NameResolver::find_nearest`] accepts.
pub const NEAREST_MIN_COS: f64 = 0.999;

/// Read-only query view over an [`ObjectStore`].
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    store: &'a ObjectStore,
}

impl<'a> NameResolver<'a> {
    pub fn new(store: &'a ObjectStore) -> Self {
        Self { store }
    }

    /// Resolve English text: proper names first, then aliases, then catalog
    /// designations. Case is ignored throughout.
    pub fn find_by_free_text(&self, text: &str) -> Option<RecordRef> {
        self.find_by_text(text, |r| (r.english_name(), r.name_aliases()))
    }

    /// Like [`find_by_free_text`](Self::find_by_free_text) but against
    /// localized names and aliases.
    pub fn find_by_localized_text(&self, text: &str) -> Option<RecordRef> {
        self.find_by_text(text, |r| (r.localized_name(), r.localized_name_aliases()))
    }

    fn find_by_text<F>(&self, text: &str, names: F) -> Option<RecordRef>
    where
        F: Fn(&ObjectRecord) -> (&str, &[String]),
    {
        let wanted = text.trim().to_uppercase();
        if wanted.is_empty() {
            return None;
        }

        let by_name = self.store.iter().find(|(_, r)| {
            let (name, _) = names(r);
            !name.is_empty() && name.to_uppercase() == wanted
        });
        if let Some((handle, _)) = by_name {
            return Some(handle);
        }

        let by_alias = self.store.iter().find(|(_, r)| {
            let (_, aliases) = names(r);
            aliases.iter().any(|a| a.to_uppercase() == wanted)
        });
        if let Some((handle, _)) = by_alias {
            return Some(handle);
        }

        let found = self.find_by_designation(&wanted);
        if found.is_none() {
            debug!(text, "no deep-sky object matches");
        }
        found
    }

    /// Resolve a designation such as `M31` or `SH 2-155`.
    pub fn find_by_designation(&self, text: &str) -> Option<RecordRef> {
        let (catalog, designator) = parse_designation(text)?;
        self.resolve_by_catalog_number(catalog, &designator)
    }

    pub fn resolve_by_catalog_number(
        &self,
        catalog: Catalog,
        designator: &CatalogDesignation,
    ) -> Option<RecordRef> {
        self.store.find_by_catalog(catalog, designator)
    }

    pub fn find_by_id(&self, internal_id: u32) -> Option<RecordRef> {
        self.store.find_by_id(internal_id)
    }

    /// Object closest to `direction`, provided it lies within about 2.6°
    /// (cosine of the separation above [`NEAREST_MIN_COS`]).
    pub fn find_nearest(&self, direction: Vector3<f64>) -> Option<RecordRef> {
        let norm = direction.norm();
        if norm == 0.0 {
            return None;
        }
        let dir = direction / norm;
        self.store
            .iter()
            .map(|(h, r)| (h, r.direction().dot(&dir)))
            .filter(|&(_, cos)| cos > NEAREST_MIN_COS)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(h, _)| h)
    }

    pub fn autocomplete(
        &self,
        prefix: &str,
        max_results: usize,
        whole_words_only: bool,
        use_english_names: bool,
    ) -> Vec<String> {
        autocomplete::autocomplete(
            self.store,
            prefix,
            max_results,
            whole_words_only,
            use_english_names,
        )
    }
}
