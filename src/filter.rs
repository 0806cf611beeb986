//! Catalog and type visibility filters.
//!
//! Two independent masks gate what the rest of the crate sees:
//!
//! - [`CatalogFilterMask`] is evaluated at load time. Changing it means the
//!   catalog has to be reloaded, because rejected records are never kept.
//! - [`TypeFilterMask`] is evaluated at query time by type listings only.
//!   It never triggers a reload and never hides objects from region queries.

use bitflags::bitflags;

use crate::catalogs::Catalog;
use crate::object::{ObjectRecord, TypeTag};

bitflags! {
    /// Enabled catalogs.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CatalogFilterMask: u32 {
        const NGC = 0x0000_0001;
        const IC = 0x0000_0002;
        const M = 0x0000_0004;
        const C = 0x0000_0008;
        const B = 0x0000_0010;
        const SH2 = 0x0000_0020;
        const LBN = 0x0000_0040;
        const LDN = 0x0000_0080;
        const RCW = 0x0000_0100;
        const VDB = 0x0000_0200;
        const CR = 0x0000_0400;
        const MEL = 0x0000_0800;
        const PGC = 0x0000_1000;
        const UGC = 0x0000_2000;
        const CED = 0x0000_4000;
    }
}

bitflags! {
    /// Enabled coarse object categories.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TypeFilterMask: u32 {
        const GALAXIES = 0x0000_0001;
        const ACTIVE_GALAXIES = 0x0000_0002;
        const INTERACTING_GALAXIES = 0x0000_0004;
        const STAR_CLUSTERS = 0x0000_0008;
        const HYDROGEN_REGIONS = 0x0000_0010;
        const BRIGHT_NEBULAE = 0x0000_0020;
        const DARK_NEBULAE = 0x0000_0040;
        const PLANETARY_NEBULAE = 0x0000_0080;
        const SUPERNOVA_REMNANTS = 0x0000_0100;
        const OTHER = 0x0000_0200;
    }
}

/// Whether `record` belongs to a catalog enabled in `mask`.
///
/// True when at least one of the record's designations is in an enabled
/// catalog. A mask with every catalog enabled also admits records that are
/// in no catalog at all; no partial mask ever does.
pub fn in_displayed_catalog(record: &ObjectRecord, mask: CatalogFilterMask) -> bool {
    if mask == CatalogFilterMask::all() {
        return true;
    }
    record
        .catalog_numbers
        .catalogs()
        .any(|cat| mask.contains(cat.mask()))
}

/// Named on/off options from which the two masks are built.
///
/// Defaults show NGC, IC and Messier objects of every type, with type
/// filtering switched off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub show_ngc: bool,
    pub show_ic: bool,
    pub show_m: bool,
    pub show_c: bool,
    pub show_b: bool,
    pub show_sh2: bool,
    pub show_vdb: bool,
    pub show_lbn: bool,
    pub show_ldn: bool,
    pub show_rcw: bool,
    pub show_cr: bool,
    pub show_mel: bool,
    pub show_pgc: bool,
    pub show_ced: bool,
    pub show_ugc: bool,

    pub use_type_filters: bool,
    pub show_galaxies: bool,
    pub show_active_galaxies: bool,
    pub show_interacting_galaxies: bool,
    pub show_clusters: bool,
    pub show_bright_nebulae: bool,
    pub show_dark_nebulae: bool,
    pub show_planetary_nebulae: bool,
    pub show_hydrogen_regions: bool,
    pub show_supernova_remnants: bool,
    pub show_other: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            show_ngc: true,
            show_ic: true,
            show_m: true,
            show_c: false,
            show_b: false,
            show_sh2: false,
            show_vdb: false,
            show_lbn: false,
            show_ldn: false,
            show_rcw: false,
            show_cr: false,
            show_mel: false,
            show_pgc: false,
            show_ced: false,
            show_ugc: false,
            use_type_filters: false,
            show_galaxies: true,
            show_active_galaxies: true,
            show_interacting_galaxies: true,
            show_clusters: true,
            show_bright_nebulae: true,
            show_dark_nebulae: true,
            show_planetary_nebulae: true,
            show_hydrogen_regions: true,
            show_supernova_remnants: true,
            show_other: true,
        }
    }
}

impl FilterConfig {
    /// Every catalog enabled, which also admits catalog-less objects.
    pub fn all_catalogs() -> Self {
        Self {
            show_c: true,
            show_b: true,
            show_sh2: true,
            show_vdb: true,
            show_lbn: true,
            show_ldn: true,
            show_rcw: true,
            show_cr: true,
            show_mel: true,
            show_pgc: true,
            show_ced: true,
            show_ugc: true,
            ..Self::default()
        }
    }

    pub fn catalog_mask(&self) -> CatalogFilterMask {
        let flags = [
            (self.show_ngc, CatalogFilterMask::NGC),
            (self.show_ic, CatalogFilterMask::IC),
            (self.show_m, CatalogFilterMask::M),
            (self.show_c, CatalogFilterMask::C),
            (self.show_b, CatalogFilterMask::B),
            (self.show_sh2, CatalogFilterMask::SH2),
            (self.show_vdb, CatalogFilterMask::VDB),
            (self.show_lbn, CatalogFilterMask::LBN),
            (self.show_ldn, CatalogFilterMask::LDN),
            (self.show_rcw, CatalogFilterMask::RCW),
            (self.show_cr, CatalogFilterMask::CR),
            (self.show_mel, CatalogFilterMask::MEL),
            (self.show_pgc, CatalogFilterMask::PGC),
            (self.show_ced, CatalogFilterMask::CED),
            (self.show_ugc, CatalogFilterMask::UGC),
        ];
        flags
            .into_iter()
            .filter(|(on, _)| *on)
            .fold(CatalogFilterMask::empty(), |acc, (_, bit)| acc | bit)
    }

    pub fn type_mask(&self) -> TypeFilterMask {
        let flags = [
            (self.show_galaxies, TypeFilterMask::GALAXIES),
            (self.show_active_galaxies, TypeFilterMask::ACTIVE_GALAXIES),
            (self.show_interacting_galaxies, TypeFilterMask::INTERACTING_GALAXIES),
            (self.show_clusters, TypeFilterMask::STAR_CLUSTERS),
            (self.show_bright_nebulae, TypeFilterMask::BRIGHT_NEBULAE),
            (self.show_dark_nebulae, TypeFilterMask::DARK_NEBULAE),
            (self.show_planetary_nebulae, TypeFilterMask::PLANETARY_NEBULAE),
            (self.show_hydrogen_regions, TypeFilterMask::HYDROGEN_REGIONS),
            (self.show_supernova_remnants, TypeFilterMask::SUPERNOVA_REMNANTS),
            (self.show_other, TypeFilterMask::OTHER),
        ];
        flags
            .into_iter()
            .filter(|(on, _)| *on)
            .fold(TypeFilterMask::empty(), |acc, (_, bit)| acc | bit)
    }
}

/// Current catalog and type masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEngine {
    catalog_mask: CatalogFilterMask,
    type_mask: TypeFilterMask,
    use_type_filters: bool,
}

impl Default for FilterEngine {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

impl FilterEngine {
    pub fn new(catalog_mask: CatalogFilterMask, type_mask: TypeFilterMask) -> Self {
        Self {
            catalog_mask,
            type_mask,
            use_type_filters: false,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            catalog_mask: config.catalog_mask(),
            type_mask: config.type_mask(),
            use_type_filters: config.use_type_filters,
        }
    }

    pub fn catalog_mask(&self) -> CatalogFilterMask {
        self.catalog_mask
    }

    pub fn type_mask(&self) -> TypeFilterMask {
        self.type_mask
    }

    pub fn use_type_filters(&self) -> bool {
        self.use_type_filters
    }

    /// Replace the catalog mask. Returns `false`, and changes nothing, when
    /// the mask is the one already in effect.
    pub fn set_catalog_mask(&mut self, mask: CatalogFilterMask) -> bool {
        if mask == self.catalog_mask {
            return false;
        }
        self.catalog_mask = mask;
        true
    }

    /// Replace the type mask. Returns whether it changed.
    pub fn set_type_mask(&mut self, mask: TypeFilterMask) -> bool {
        if mask == self.type_mask {
            return false;
        }
        self.type_mask = mask;
        true
    }

    /// Switch query-time type filtering on or off. Returns whether it changed.
    pub fn set_use_type_filters(&mut self, enabled: bool) -> bool {
        if enabled == self.use_type_filters {
            return false;
        }
        self.use_type_filters = enabled;
        true
    }

    /// Whether `catalog` is currently enabled.
    pub fn catalog_enabled(&self, catalog: Catalog) -> bool {
        self.catalog_mask.contains(catalog.mask())
    }

    /// Load-time gate: whether `record` is in a displayed catalog.
    pub fn accepts(&self, record: &ObjectRecord) -> bool {
        in_displayed_catalog(record, self.catalog_mask)
    }

    /// Query-time gate used by type listings. Always true while type
    /// filtering is switched off.
    pub fn accepts_type(&self, tag: TypeTag) -> bool {
        !self.use_type_filters || self.type_mask.contains(tag.group())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::CatalogNumberSet;

    fn record_with(numbers: CatalogNumberSet) -> ObjectRecord {
        let mut rec = ObjectRecord::new(1, 0.0, 0.0);
        rec.catalog_numbers = numbers;
        rec
    }

    #[test]
    fn default_config_matches_stock_catalog_selection() {
        let cfg = FilterConfig::default();
        assert_eq!(
            cfg.catalog_mask(),
            CatalogFilterMask::NGC | CatalogFilterMask::IC | CatalogFilterMask::M
        );
        assert_eq!(cfg.type_mask(), TypeFilterMask::all());
        assert_eq!(FilterConfig::all_catalogs().catalog_mask(), CatalogFilterMask::all());
    }

    #[test]
    fn accepts_when_any_enabled_catalog_matches() {
        let rec = record_with(CatalogNumberSet::new().with(Catalog::Ngc, 7000));
        assert!(in_displayed_catalog(&rec, CatalogFilterMask::NGC));
        assert!(in_displayed_catalog(
            &rec,
            CatalogFilterMask::NGC | CatalogFilterMask::M
        ));
        assert!(!in_displayed_catalog(&rec, CatalogFilterMask::M));
        assert!(!in_displayed_catalog(&rec, CatalogFilterMask::empty()));
    }

    #[test]
    fn ced_text_slot_counts_as_membership() {
        let rec = record_with(CatalogNumberSet::new().with_ced("55a"));
        assert!(in_displayed_catalog(&rec, CatalogFilterMask::CED));
        assert!(!in_displayed_catalog(&rec, CatalogFilterMask::NGC));
    }

    #[test]
    fn catalog_less_records_only_pass_the_full_mask() {
        let rec = record_with(CatalogNumberSet::new());
        assert!(in_displayed_catalog(&rec, CatalogFilterMask::all()));
        let almost_all = CatalogFilterMask::all() - CatalogFilterMask::UGC;
        assert!(!in_displayed_catalog(&rec, almost_all));
    }

    #[test]
    fn filter_invariant_over_every_single_catalog_mask() {
        for cat in Catalog::ALL {
            let numbers = match cat {
                Catalog::Ced => CatalogNumberSet::new().with_ced("12"),
                _ => CatalogNumberSet::new().with(cat, 12),
            };
            let rec = record_with(numbers);
            for other in Catalog::ALL {
                assert_eq!(
                    in_displayed_catalog(&rec, other.mask()),
                    cat == other,
                    "record in {cat} under mask {other}"
                );
            }
        }
    }

    #[test]
    fn unchanged_masks_report_no_change() {
        let mut engine = FilterEngine::default();
        let mask = engine.catalog_mask();
        assert!(!engine.set_catalog_mask(mask));
        assert!(engine.set_catalog_mask(CatalogFilterMask::M));
        assert!(!engine.set_catalog_mask(CatalogFilterMask::M));
        assert!(!engine.set_type_mask(TypeFilterMask::all()));
        assert!(engine.set_type_mask(TypeFilterMask::GALAXIES));
    }

    #[test]
    fn type_gate_only_applies_when_enabled() {
        let mut engine = FilterEngine::new(CatalogFilterMask::all(), TypeFilterMask::GALAXIES);
        assert!(engine.accepts_type(TypeTag::DarkNebula));
        engine.set_use_type_filters(true);
        assert!(!engine.accepts_type(TypeTag::DarkNebula));
        assert!(engine.accepts_type(TypeTag::Galaxy));
    }
}
