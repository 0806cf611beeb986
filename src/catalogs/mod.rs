//! Historical deep-sky catalogs and the per-object cross-identification set.
//!
//! Every object carries at most one designation per catalog. Fourteen catalogs
//! use positive integers; Cederblad uses alphanumeric designators (`Ced 55a`).
//!
//! Submodules handle the on-disk formats:
//!
//! - [`binary`]: the versioned binary record stream (`catalog.dat`)
//! - [`legacy`]: the tab-separated text catalog (`catalog.txt`) and its conversion
//! - [`names`]: the fixed-column and sky-culture name files

pub mod binary;
pub mod legacy;
pub mod names;

use std::fmt;

use crate::filter::CatalogFilterMask;

/// Number of catalogs that use integer designations.
pub const NUMERIC_CATALOG_COUNT: usize = 14;

/// One historical deep-sky catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Catalog {
    /// New General Catalogue
    Ngc,
    /// Index Catalogue
    Ic,
    /// Messier
    M,
    /// Caldwell
    C,
    /// Barnard (dark nebulae)
    B,
    /// Sharpless (HII regions), written `Sh2-n`
    Sh2,
    /// Van den Bergh (reflection nebulae)
    VdB,
    /// Rodgers, Campbell & Whiteoak (H-α emission regions)
    Rcw,
    /// Lynds' Catalogue of Dark Nebulae
    Ldn,
    /// Lynds' Catalogue of Bright Nebulae
    Lbn,
    /// Collinder (open clusters)
    Cr,
    /// Melotte (star clusters)
    Mel,
    /// Principal Galaxies Catalogue
    Pgc,
    /// Uppsala General Catalogue of Galaxies
    Ugc,
    /// Cederblad (bright diffuse nebulae), alphanumeric
    Ced,
}

impl Catalog {
    /// All catalogs in resolution priority order. The first fourteen are also
    /// the order of the numeric slots in the binary record.
    pub const ALL: [Catalog; 15] = [
        Catalog::Ngc,
        Catalog::Ic,
        Catalog::M,
        Catalog::C,
        Catalog::B,
        Catalog::Sh2,
        Catalog::VdB,
        Catalog::Rcw,
        Catalog::Ldn,
        Catalog::Lbn,
        Catalog::Cr,
        Catalog::Mel,
        Catalog::Pgc,
        Catalog::Ugc,
        Catalog::Ced,
    ];

    /// The integer-designated catalogs in binary slot order.
    pub const NUMERIC: [Catalog; NUMERIC_CATALOG_COUNT] = [
        Catalog::Ngc,
        Catalog::Ic,
        Catalog::M,
        Catalog::C,
        Catalog::B,
        Catalog::Sh2,
        Catalog::VdB,
        Catalog::Rcw,
        Catalog::Ldn,
        Catalog::Lbn,
        Catalog::Cr,
        Catalog::Mel,
        Catalog::Pgc,
        Catalog::Ugc,
    ];

    /// Position of this catalog's number in [`CatalogNumberSet`], or `None`
    /// for Cederblad.
    pub fn slot(self) -> Option<usize> {
        Self::NUMERIC.iter().position(|&c| c == self)
    }

    /// Whether designations in this catalog are integers.
    pub fn is_numeric(self) -> bool {
        self != Catalog::Ced
    }

    /// Upper-case prefix used when matching typed identifiers.
    pub fn search_prefix(self) -> &'static str {
        match self {
            Catalog::Ngc => "NGC",
            Catalog::Ic => "IC",
            Catalog::M => "M",
            Catalog::C => "C",
            Catalog::B => "B",
            Catalog::Sh2 => "SH",
            Catalog::VdB => "VDB",
            Catalog::Rcw => "RCW",
            Catalog::Ldn => "LDN",
            Catalog::Lbn => "LBN",
            Catalog::Cr => "CR",
            Catalog::Mel => "MEL",
            Catalog::Pgc => "PGC",
            Catalog::Ugc => "UGC",
            Catalog::Ced => "CED",
        }
    }

    /// Short human-readable name, as used in UI listings.
    pub fn label(self) -> &'static str {
        match self {
            Catalog::Ngc => "NGC",
            Catalog::Ic => "IC",
            Catalog::M => "M",
            Catalog::C => "C",
            Catalog::B => "B",
            Catalog::Sh2 => "Sh2",
            Catalog::VdB => "VdB",
            Catalog::Rcw => "RCW",
            Catalog::Ldn => "LDN",
            Catalog::Lbn => "LBN",
            Catalog::Cr => "Cr",
            Catalog::Mel => "Mel",
            Catalog::Pgc => "PGC",
            Catalog::Ugc => "UGC",
            Catalog::Ced => "Ced",
        }
    }

    /// Identifier written without a separator, in the spelling accepted by
    /// search: `M31`, `SH2-31`, `Ced55a`.
    pub fn compact_form(self, designator: &str) -> String {
        match self {
            Catalog::Sh2 => format!("SH2-{designator}"),
            Catalog::Ced => format!("Ced{designator}"),
            _ => format!("{}{designator}", self.search_prefix()),
        }
    }

    /// Identifier with a separating space: `M 31`, `SH 2-31`, `Ced 55a`.
    pub fn spaced_form(self, designator: &str) -> String {
        match self {
            Catalog::Sh2 => format!("SH 2-{designator}"),
            Catalog::Ced => format!("Ced {designator}"),
            _ => format!("{} {designator}", self.search_prefix()),
        }
    }

    /// Identifier in display spelling: `NGC 224`, `M 31`, `SH 2-31`, `VdB 5`,
    /// `Cr 399`, `Mel 111`.
    pub fn display_form(self, designator: &str) -> String {
        match self {
            Catalog::Sh2 => format!("SH 2-{designator}"),
            _ => format!("{} {designator}", self.label()),
        }
    }

    /// Filter bit for this catalog.
    pub fn mask(self) -> CatalogFilterMask {
        match self {
            Catalog::Ngc => CatalogFilterMask::NGC,
            Catalog::Ic => CatalogFilterMask::IC,
            Catalog::M => CatalogFilterMask::M,
            Catalog::C => CatalogFilterMask::C,
            Catalog::B => CatalogFilterMask::B,
            Catalog::Sh2 => CatalogFilterMask::SH2,
            Catalog::VdB => CatalogFilterMask::VDB,
            Catalog::Rcw => CatalogFilterMask::RCW,
            Catalog::Ldn => CatalogFilterMask::LDN,
            Catalog::Lbn => CatalogFilterMask::LBN,
            Catalog::Cr => CatalogFilterMask::CR,
            Catalog::Mel => CatalogFilterMask::MEL,
            Catalog::Pgc => CatalogFilterMask::PGC,
            Catalog::Ugc => CatalogFilterMask::UGC,
            Catalog::Ced => CatalogFilterMask::CED,
        }
    }

    /// Catalog for a name-file prefix column (`IC`, `M`, `SH2`, `CED`, ...).
    /// Matching is case-insensitive; unknown prefixes yield `None`.
    pub fn from_name_file_prefix(prefix: &str) -> Option<Catalog> {
        let upper = prefix.trim().to_uppercase();
        let cat = match upper.as_str() {
            "NGC" => Catalog::Ngc,
            "IC" => Catalog::Ic,
            "M" => Catalog::M,
            "C" => Catalog::C,
            "B" => Catalog::B,
            "SH2" => Catalog::Sh2,
            "VDB" => Catalog::VdB,
            "RCW" => Catalog::Rcw,
            "LDN" => Catalog::Ldn,
            "LBN" => Catalog::Lbn,
            "CR" => Catalog::Cr,
            "MEL" => Catalog::Mel,
            "PGC" => Catalog::Pgc,
            "UGC" => Catalog::Ugc,
            "CED" => Catalog::Ced,
            _ => return None,
        };
        Some(cat)
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A designation within one catalog: an integer, or Cederblad's free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogDesignation {
    Number(u32),
    Text(String),
}

impl fmt::Display for CatalogDesignation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogDesignation::Number(n) => write!(f, "{n}"),
            CatalogDesignation::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for CatalogDesignation {
    fn from(n: u32) -> Self {
        CatalogDesignation::Number(n)
    }
}

impl From<&str> for CatalogDesignation {
    fn from(s: &str) -> Self {
        CatalogDesignation::Text(s.to_string())
    }
}

/// Cross-identification of one object across all supported catalogs.
///
/// A numeric slot of `0` and an empty Cederblad string both mean "not in
/// this catalog".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogNumberSet {
    numbers: [u32; NUMERIC_CATALOG_COUNT],
    ced: String,
}

impl CatalogNumberSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter for a numeric catalog. Setting Cederblad through
    /// this method is ignored; use [`CatalogNumberSet::with_ced`].
    pub fn with(mut self, catalog: Catalog, number: u32) -> Self {
        self.set_number(catalog, number);
        self
    }

    pub fn with_ced(mut self, designator: &str) -> Self {
        self.set_ced(designator);
        self
    }

    /// Number in `catalog`, or `None` when unset or when `catalog` is Cederblad.
    pub fn number(&self, catalog: Catalog) -> Option<u32> {
        let slot = catalog.slot()?;
        match self.numbers[slot] {
            0 => None,
            n => Some(n),
        }
    }

    /// Cederblad designator, if any.
    pub fn ced(&self) -> Option<&str> {
        if self.ced.is_empty() {
            None
        } else {
            Some(&self.ced)
        }
    }

    pub fn set_number(&mut self, catalog: Catalog, number: u32) {
        if let Some(slot) = catalog.slot() {
            self.numbers[slot] = number;
        }
    }

    pub fn set_ced(&mut self, designator: &str) {
        self.ced = designator.trim().to_string();
    }

    /// Designation in `catalog`, numeric or text.
    pub fn designation(&self, catalog: Catalog) -> Option<CatalogDesignation> {
        match catalog {
            Catalog::Ced => self.ced().map(|s| CatalogDesignation::Text(s.to_string())),
            _ => self.number(catalog).map(CatalogDesignation::Number),
        }
    }

    /// Whether the object has a designation in `catalog`.
    pub fn contains(&self, catalog: Catalog) -> bool {
        match catalog {
            Catalog::Ced => !self.ced.is_empty(),
            _ => self.number(catalog).is_some(),
        }
    }

    /// True when the object is in no catalog at all.
    pub fn is_empty(&self) -> bool {
        self.numbers.iter().all(|&n| n == 0) && self.ced.is_empty()
    }

    /// Raw numeric slots in binary order, `0` meaning unset.
    pub fn raw_numbers(&self) -> &[u32; NUMERIC_CATALOG_COUNT] {
        &self.numbers
    }

    pub(crate) fn from_raw(numbers: [u32; NUMERIC_CATALOG_COUNT], ced: String) -> Self {
        Self { numbers, ced }
    }

    /// Catalogs this object belongs to, in resolution priority order.
    pub fn catalogs(&self) -> impl Iterator<Item = Catalog> + '_ {
        Catalog::ALL.into_iter().filter(|&c| self.contains(c))
    }
}
