//! Catalog loading and the [`DsoCatalog`] facade.
//!
//! A catalog set lives in `<data_dir>/<set>/` and consists of:
//!
//! * `catalog.dat`, the binary records
//! * `catalog.txt`, the optional legacy text source of `catalog.dat`
//! * `names.dat`, the default fixed-column names
//!
//! Loading decodes into a staging buffer first. The store and spatial index
//! are only replaced once the whole file has decoded, so a failed load keeps
//! whatever was loaded before.

use std::path::{Path, PathBuf};

use nalgebra::Vector3;
use tracing::{debug, info, warn};

use crate::catalogs::binary::BinaryCatalogReader;
use crate::catalogs::legacy::{convert_legacy_catalog, ConvertSummary};
use crate::catalogs::names::{
    load_fixed_column_names_file, load_sky_culture_names_file, NameLoadSummary,
};
use crate::catalogs::{Catalog, CatalogDesignation};
use crate::error::Result;
use crate::filter::{CatalogFilterMask, FilterConfig, FilterEngine, TypeFilterMask};
use crate::listing::{self, ListingCode};
use crate::object::ObjectRecord;
use crate::resolver::NameResolver;
use crate::skyindex::{ConvexRegion, RegionQuery, SpatialIndex, DEFAULT_CELL_COUNT};
use crate::store::{ObjectStore, RecordRef};
use crate::translate::{IdentityTranslator, Translator};

pub const BINARY_CATALOG_FILE: &str = "catalog.dat";
pub const LEGACY_CATALOG_FILE: &str = "catalog.txt";
pub const NAMES_FILE: &str = "names.dat";

/// Where catalog sets live and how they are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Directory holding one subdirectory per catalog set.
    pub data_dir: PathBuf,
    /// Regenerate `catalog.dat` from `catalog.txt` before every load.
    pub convert_legacy: bool,
    /// Legacy coordinates are decimal degrees rather than sexagesimal.
    pub decimal_coordinates: bool,
    /// Requested number of spatial index cells.
    pub cell_count: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("nebulae"),
            convert_legacy: false,
            decimal_coordinates: true,
            cell_count: DEFAULT_CELL_COUNT,
        }
    }
}

impl LoaderConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn set_dir(&self, set_name: &str) -> PathBuf {
        self.data_dir.join(set_name)
    }

    pub fn catalog_path(&self, set_name: &str) -> PathBuf {
        self.set_dir(set_name).join(BINARY_CATALOG_FILE)
    }

    pub fn legacy_path(&self, set_name: &str) -> PathBuf {
        self.set_dir(set_name).join(LEGACY_CATALOG_FILE)
    }

    pub fn names_path(&self, set_name: &str) -> PathBuf {
        self.set_dir(set_name).join(NAMES_FILE)
    }
}

/// Outcome of one successful load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    /// Records decoded from the binary file.
    pub decoded: usize,
    /// Records in a displayed catalog, now in the store.
    pub accepted: usize,
    /// Records dropped by the catalog filter.
    pub rejected: usize,
    /// Present when the legacy catalog was converted first.
    pub conversion: Option<ConvertSummary>,
}

/// Reads catalog sets into a store and a spatial index.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    config: LoaderConfig,
}

impl CatalogLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Replace the contents of `store` and `index` with the records of
    /// `set_name` that pass `filters`.
    ///
    /// On error `store` and `index` are left as they were.
    pub fn load(
        &self,
        set_name: &str,
        filters: &FilterEngine,
        store: &mut ObjectStore,
        index: &mut SpatialIndex,
    ) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        if self.config.convert_legacy {
            let legacy = self.config.legacy_path(set_name);
            let target = self.config.catalog_path(set_name);
            match convert_legacy_catalog(&legacy, &target, self.config.decimal_coordinates) {
                Ok(conversion) => summary.conversion = Some(conversion),
                Err(e) => warn!("Cannot convert legacy catalog for set {}: {}", set_name, e),
            }
        }

        let path = self.config.catalog_path(set_name);
        info!("Loading deep-sky catalog from {}", path.display());
        let reader = BinaryCatalogReader::open(&path)?;

        let mut staged: Vec<ObjectRecord> = Vec::new();
        for record in reader {
            let record = record?;
            summary.decoded += 1;
            if filters.accepts(&record) {
                staged.push(record);
            } else {
                summary.rejected += 1;
            }
        }

        store.clear();
        index.clear();
        for record in staged {
            let direction = record.direction();
            let handle = store.insert(record);
            index.insert(handle, direction);
        }
        summary.accepted = store.len();

        info!(
            "Loaded {}/{} deep-sky objects from set {} ({} outside displayed catalogs)",
            summary.accepted, summary.decoded, set_name, summary.rejected
        );
        Ok(summary)
    }
}

/// A loaded deep-sky catalog with its filters, names and query interface.
///
/// Changing the catalog mask reloads the set; everything else is applied in
/// place. Callers that share a catalog across threads must hold an
/// exclusive lock for the duration of any call that reloads.
pub struct DsoCatalog {
    loader: CatalogLoader,
    set_name: String,
    store: ObjectStore,
    index: SpatialIndex,
    filters: FilterEngine,
    translator: Box<dyn Translator>,
    sky_culture_names: Option<PathBuf>,
    shown: bool,
    generation: u64,
}

impl DsoCatalog {
    /// An empty catalog; nothing is read until [`DsoCatalog::load_set`].
    pub fn new(config: LoaderConfig, filter_config: &FilterConfig) -> Self {
        let index = SpatialIndex::new(config.cell_count);
        Self {
            loader: CatalogLoader::new(config),
            set_name: String::new(),
            store: ObjectStore::new(),
            index,
            filters: FilterEngine::from_config(filter_config),
            translator: Box::new(IdentityTranslator),
            sky_culture_names: None,
            shown: true,
            generation: 0,
        }
    }

    /// Create a catalog and load `set_name` into it.
    pub fn open(
        config: LoaderConfig,
        filter_config: &FilterConfig,
        set_name: &str,
    ) -> Result<Self> {
        let mut catalog = Self::new(config, filter_config);
        catalog.load_set(set_name)?;
        Ok(catalog)
    }

    /// Load (or switch to) the catalog set `set_name`, then attach names.
    pub fn load_set(&mut self, set_name: &str) -> Result<LoadSummary> {
        let previous = std::mem::replace(&mut self.set_name, set_name.to_string());
        let result = self.reload();
        if result.is_err() {
            self.set_name = previous;
        }
        result
    }

    /// Reload the current set with the current catalog mask.
    ///
    /// The catalog is hidden while the store is rebuilt and its visibility
    /// restored afterwards. On success names and translations are
    /// reapplied and [`generation`](Self::generation) advances.
    pub fn reload(&mut self) -> Result<LoadSummary> {
        let was_shown = self.shown;
        self.shown = false;
        let result = self.loader.load(
            &self.set_name,
            &self.filters,
            &mut self.store,
            &mut self.index,
        );
        self.shown = was_shown;

        let summary = result?;
        let culture = self.sky_culture_names.clone();
        if let Err(e) = self.update_sky_culture(culture.as_deref()) {
            warn!("Deep-sky names not loaded: {}", e);
        }
        self.generation += 1;
        Ok(summary)
    }

    /// Counter bumped by every successful reload. Record handles obtained
    /// before a bump are stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn set_shown(&mut self, shown: bool) {
        self.shown = shown;
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn get(&self, handle: RecordRef) -> Option<&ObjectRecord> {
        self.store.get(handle)
    }

    /// Apply a new catalog mask, reloading when it differs from the current
    /// one. Returns whether a reload happened.
    ///
    /// If the reload fails the previous mask is restored and the loaded
    /// objects are unchanged.
    pub fn set_catalog_mask(&mut self, mask: CatalogFilterMask) -> Result<bool> {
        let previous = self.filters.catalog_mask();
        if !self.filters.set_catalog_mask(mask) {
            return Ok(false);
        }
        if let Err(e) = self.reload() {
            self.filters.set_catalog_mask(previous);
            return Err(e);
        }
        Ok(true)
    }

    /// Apply a new type mask. Never reloads.
    pub fn set_type_mask(&mut self, mask: TypeFilterMask) -> bool {
        self.filters.set_type_mask(mask)
    }

    pub fn set_use_type_filters(&mut self, enabled: bool) -> bool {
        self.filters.set_use_type_filters(enabled)
    }

    /// Apply every option of `config`, reloading only if the catalog
    /// selection changed.
    pub fn apply_filter_config(&mut self, config: &FilterConfig) -> Result<bool> {
        self.filters.set_type_mask(config.type_mask());
        self.filters.set_use_type_filters(config.use_type_filters);
        self.set_catalog_mask(config.catalog_mask())
    }

    /// Switch locale: install `translator` and recompute localized names.
    pub fn set_translator(&mut self, translator: Box<dyn Translator>) {
        self.translator = translator;
        self.refresh_translations();
    }

    pub fn refresh_translations(&mut self) {
        let translator = self.translator.as_ref();
        for record in self.store.records_mut() {
            record.translate_names(translator);
        }
    }

    /// Replace every object name.
    ///
    /// Names come from the sky-culture file `culture_names` when given and
    /// present, otherwise from the set's default `names.dat`. Translations
    /// are refreshed either way. The choice is remembered for later reloads.
    pub fn update_sky_culture(
        &mut self,
        culture_names: Option<&Path>,
    ) -> Result<NameLoadSummary> {
        self.sky_culture_names = culture_names.map(Path::to_path_buf);
        for record in self.store.records_mut() {
            record.remove_all_names();
        }

        let result = match culture_names.filter(|p| p.is_file()) {
            Some(path) => load_sky_culture_names_file(path, &mut self.store),
            None => {
                if let Some(path) = culture_names {
                    debug!("No sky culture names at {}; using defaults", path.display());
                }
                let default_names = self.loader.config().names_path(&self.set_name);
                load_fixed_column_names_file(&default_names, &mut self.store)
            }
        };
        self.refresh_translations();
        result
    }

    /// Objects whose position lies in `region`.
    pub fn objects_in_region<'a>(&'a self, region: &'a ConvexRegion) -> RegionQuery<'a> {
        self.index.query_region(region)
    }

    fn resolver(&self) -> NameResolver<'_> {
        NameResolver::new(&self.store)
    }

    /// Object named or designated by `text` (English names).
    pub fn resolve(&self, text: &str) -> Option<RecordRef> {
        self.resolver().find_by_free_text(text)
    }

    /// Object named or designated by `text` (localized names).
    pub fn resolve_localized(&self, text: &str) -> Option<RecordRef> {
        self.resolver().find_by_localized_text(text)
    }

    pub fn autocomplete(
        &self,
        prefix: &str,
        max_results: usize,
        whole_words_only: bool,
        use_english_names: bool,
    ) -> Vec<String> {
        self.resolver()
            .autocomplete(prefix, max_results, whole_words_only, use_english_names)
    }

    pub fn get_by_catalog_number(
        &self,
        catalog: Catalog,
        designator: impl Into<CatalogDesignation>,
    ) -> Option<RecordRef> {
        self.resolver()
            .resolve_by_catalog_number(catalog, &designator.into())
    }

    pub fn find_by_id(&self, internal_id: u32) -> Option<RecordRef> {
        self.resolver().find_by_id(internal_id)
    }

    pub fn find_nearest(&self, direction: Vector3<f64>) -> Option<RecordRef> {
        self.resolver().find_nearest(direction)
    }

    /// Objects within `limit_fov_deg` of `direction`; none while hidden.
    pub fn search_around(&self, direction: Vector3<f64>, limit_fov_deg: f64) -> Vec<RecordRef> {
        if !self.shown {
            return Vec::new();
        }
        self.index.query_cone(direction, limit_fov_deg.to_radians())
    }

    pub fn list_all(&self, use_english: bool) -> Vec<String> {
        listing::list_all(&self.store, use_english)
    }

    pub fn list_by_type(&self, code: ListingCode, use_english: bool) -> Vec<String> {
        listing::list_by_type(&self.store, &self.filters, code, use_english)
    }

    pub fn objects_by_type(&self, code: ListingCode) -> Vec<RecordRef> {
        listing::objects_by_type(&self.store, &self.filters, code)
    }
}
