use nalgebra::Vector3;

use crate::catalogs::{Catalog, CatalogNumberSet};
use crate::filter::TypeFilterMask;
use crate::translate::Translator;

/// Magnitude value meaning "unknown".
pub const UNKNOWN_MAGNITUDE: f32 = 99.0;

/// Morphological class of a deep-sky object.
///
/// The discriminant is the stable numeric code stored in binary catalogs and
/// used by type listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum TypeTag {
    Galaxy = 0,
    ActiveGalaxy = 1,
    RadioGalaxy = 2,
    InteractingGalaxy = 3,
    Quasar = 4,
    Cluster = 5,
    OpenCluster = 6,
    GlobularCluster = 7,
    StellarAssociation = 8,
    StarCloud = 9,
    BrightNebula = 10,
    PlanetaryNebula = 11,
    DarkNebula = 12,
    ReflectionNebula = 13,
    BipolarNebula = 14,
    EmissionNebula = 15,
    ClusterWithNebulosity = 16,
    HydrogenRegion = 17,
    SupernovaRemnant = 18,
    InterstellarMatter = 19,
    EmissionObject = 20,
    BLLac = 21,
    Blazar = 22,
    MolecularCloud = 23,
    YoungStellarObject = 24,
    PossibleQuasar = 25,
    PossiblePlanetaryNebula = 26,
    ProtoplanetaryNebula = 27,
    Star = 28,
    Unknown = 29,
}

/// Unit of [`ObjectRecord::distance`], implied by the object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Megaparsec,
    Kiloparsec,
}

impl TypeTag {
    /// All tags in code order.
    pub const ALL: [TypeTag; 30] = [
        TypeTag::Galaxy,
        TypeTag::ActiveGalaxy,
        TypeTag::RadioGalaxy,
        TypeTag::InteractingGalaxy,
        TypeTag::Quasar,
        TypeTag::Cluster,
        TypeTag::OpenCluster,
        TypeTag::GlobularCluster,
        TypeTag::StellarAssociation,
        TypeTag::StarCloud,
        TypeTag::BrightNebula,
        TypeTag::PlanetaryNebula,
        TypeTag::DarkNebula,
        TypeTag::ReflectionNebula,
        TypeTag::BipolarNebula,
        TypeTag::EmissionNebula,
        TypeTag::ClusterWithNebulosity,
        TypeTag::HydrogenRegion,
        TypeTag::SupernovaRemnant,
        TypeTag::InterstellarMatter,
        TypeTag::EmissionObject,
        TypeTag::BLLac,
        TypeTag::Blazar,
        TypeTag::MolecularCloud,
        TypeTag::YoungStellarObject,
        TypeTag::PossibleQuasar,
        TypeTag::PossiblePlanetaryNebula,
        TypeTag::ProtoplanetaryNebula,
        TypeTag::Star,
        TypeTag::Unknown,
    ];

    pub fn code(self) -> u32 {
        self as u32
    }

    /// Tag for a stored code; codes outside the table decode to `Unknown`.
    pub fn from_code(code: u32) -> TypeTag {
        Self::ALL
            .get(code as usize)
            .copied()
            .unwrap_or(TypeTag::Unknown)
    }

    /// Tag for an object-type token of the legacy text catalog.
    ///
    /// Several tokens share a tag (`G` and `GX` are both galaxies, `LIN`
    /// marks a LINER-type active galaxy). Matching is case-insensitive and
    /// unrecognized tokens are `Unknown`.
    pub fn from_token(token: &str) -> TypeTag {
        match token.trim().to_uppercase().as_str() {
            "G" | "GX" => TypeTag::Galaxy,
            "GC" => TypeTag::GlobularCluster,
            "OC" => TypeTag::OpenCluster,
            "NB" => TypeTag::BrightNebula,
            "PN" => TypeTag::PlanetaryNebula,
            "DN" | "SFR" => TypeTag::DarkNebula,
            "RN" | "RNE" => TypeTag::ReflectionNebula,
            "C+N" => TypeTag::ClusterWithNebulosity,
            "HII" | "GNE" => TypeTag::HydrogenRegion,
            "SNR" => TypeTag::SupernovaRemnant,
            "BN" => TypeTag::BipolarNebula,
            "EN" => TypeTag::EmissionNebula,
            "SA" => TypeTag::StellarAssociation,
            "SC" => TypeTag::StarCloud,
            "CL" => TypeTag::Cluster,
            "IG" | "GIG" => TypeTag::InteractingGalaxy,
            "RG" => TypeTag::RadioGalaxy,
            "AGX" | "LIN" => TypeTag::ActiveGalaxy,
            "QSO" => TypeTag::Quasar,
            "ISM" | "RAD" => TypeTag::InterstellarMatter,
            "EMO" => TypeTag::EmissionObject,
            "BLL" => TypeTag::BLLac,
            "BLA" => TypeTag::Blazar,
            "MOC" | "IR" => TypeTag::MolecularCloud,
            "YSO" => TypeTag::YoungStellarObject,
            "Q?" => TypeTag::PossibleQuasar,
            "PN?" => TypeTag::PossiblePlanetaryNebula,
            "*" | "**" | "MUL" => TypeTag::Star,
            "PPN" => TypeTag::ProtoplanetaryNebula,
            _ => TypeTag::Unknown,
        }
    }

    /// Coarse group used by the type filter.
    pub fn group(self) -> TypeFilterMask {
        use TypeTag::*;
        match self {
            Galaxy => TypeFilterMask::GALAXIES,
            ActiveGalaxy | RadioGalaxy | Quasar | PossibleQuasar | BLLac | Blazar => {
                TypeFilterMask::ACTIVE_GALAXIES
            }
            InteractingGalaxy => TypeFilterMask::INTERACTING_GALAXIES,
            Cluster | OpenCluster | GlobularCluster | StellarAssociation | StarCloud => {
                TypeFilterMask::STAR_CLUSTERS
            }
            BrightNebula | ReflectionNebula | BipolarNebula | EmissionNebula => {
                TypeFilterMask::BRIGHT_NEBULAE
            }
            DarkNebula | MolecularCloud => TypeFilterMask::DARK_NEBULAE,
            PlanetaryNebula | PossiblePlanetaryNebula | ProtoplanetaryNebula => {
                TypeFilterMask::PLANETARY_NEBULAE
            }
            HydrogenRegion | InterstellarMatter => TypeFilterMask::HYDROGEN_REGIONS,
            SupernovaRemnant => TypeFilterMask::SUPERNOVA_REMNANTS,
            ClusterWithNebulosity | EmissionObject | YoungStellarObject | Star | Unknown => {
                TypeFilterMask::OTHER
            }
        }
    }

    /// Whether the object lies outside the Milky Way.
    pub fn is_extragalactic(self) -> bool {
        let galaxies = TypeFilterMask::GALAXIES
            | TypeFilterMask::ACTIVE_GALAXIES
            | TypeFilterMask::INTERACTING_GALAXIES;
        galaxies.contains(self.group())
    }

    pub fn distance_unit(self) -> DistanceUnit {
        if self.is_extragalactic() {
            DistanceUnit::Megaparsec
        } else {
            DistanceUnit::Kiloparsec
        }
    }
}

/// Outcome of [`ObjectRecord::assign_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameAssignment {
    /// The object had no name; this one became its proper name.
    ProperName,
    /// The object already had a different name; this one was added as an alias.
    Alias,
    /// The name was already the proper name or a known alias.
    Unchanged,
}

/// One deep-sky object.
///
/// The position is stored as J2000 right ascension and declination; the
/// direction vector is derived from them, so two records with equal
/// coordinates always have bit-identical directions. Records are immutable
/// once inserted into a store, except for their names.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// Catalog-wide identifier, `0` when none is assigned.
    pub internal_id: u32,
    ra_rad: f64,
    dec_rad: f64,
    direction: Vector3<f64>,
    pub magnitude_b: f32,
    pub magnitude_v: f32,
    pub object_type: TypeTag,
    pub morphological_type: String,
    pub major_axis_deg: f32,
    pub minor_axis_deg: f32,
    pub orientation_deg: i32,
    pub redshift: f32,
    pub redshift_error: f32,
    pub parallax_mas: f32,
    pub parallax_error: f32,
    /// Mpc for galaxies, kpc otherwise; see [`TypeTag::distance_unit`].
    pub distance: f32,
    pub distance_error: f32,
    pub catalog_numbers: CatalogNumberSet,
    proper_name: Option<String>,
    localized_name: String,
    name_aliases: Vec<String>,
    localized_name_aliases: Vec<String>,
}

impl Default for ObjectRecord {
    fn default() -> Self {
        Self {
            internal_id: 0,
            ra_rad: 0.0,
            dec_rad: 0.0,
            direction: radec_to_uvec(0.0, 0.0),
            magnitude_b: UNKNOWN_MAGNITUDE,
            magnitude_v: UNKNOWN_MAGNITUDE,
            object_type: TypeTag::Unknown,
            morphological_type: String::new(),
            major_axis_deg: 0.0,
            minor_axis_deg: 0.0,
            orientation_deg: 0,
            redshift: 0.0,
            redshift_error: 0.0,
            parallax_mas: 0.0,
            parallax_error: 0.0,
            distance: 0.0,
            distance_error: 0.0,
            catalog_numbers: CatalogNumberSet::default(),
            proper_name: None,
            localized_name: String::new(),
            name_aliases: Vec::new(),
            localized_name_aliases: Vec::new(),
        }
    }
}

impl ObjectRecord {
    /// Create an object at the given J2000 position with every other field
    /// at its "unknown" value.
    pub fn new(internal_id: u32, ra_rad: f64, dec_rad: f64) -> Self {
        let mut record = Self {
            internal_id,
            ..Default::default()
        };
        record.set_position(ra_rad, dec_rad);
        record
    }

    pub fn ra_rad(&self) -> f64 {
        self.ra_rad
    }

    pub fn dec_rad(&self) -> f64 {
        self.dec_rad
    }

    /// Unit vector pointing to the object on the celestial sphere.
    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    pub fn set_position(&mut self, ra_rad: f64, dec_rad: f64) {
        self.ra_rad = ra_rad;
        self.dec_rad = dec_rad;
        self.direction = radec_to_uvec(ra_rad, dec_rad);
    }

    /// Brightest known magnitude, or [`UNKNOWN_MAGNITUDE`].
    pub fn brightest_magnitude(&self) -> f32 {
        self.magnitude_v.min(self.magnitude_b)
    }

    pub fn type_group(&self) -> TypeFilterMask {
        self.object_type.group()
    }

    /// Primary designation, e.g. `M 31` for the Andromeda galaxy.
    ///
    /// Catalogs are tried in the order M, C, NGC, IC, B, Sh2, VdB, RCW, LDN,
    /// LBN, Cr, Mel, PGC, UGC, Ced. Empty when the object is in no catalog.
    pub fn designation(&self) -> String {
        const ORDER: [Catalog; 15] = [
            Catalog::M,
            Catalog::C,
            Catalog::Ngc,
            Catalog::Ic,
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
        ORDER
            .iter()
            .find_map(|&cat| {
                self.catalog_numbers
                    .designation(cat)
                    .map(|d| cat.display_form(&d.to_string()))
            })
            .unwrap_or_default()
    }

    /// English proper name, if any.
    pub fn proper_name(&self) -> Option<&str> {
        self.proper_name.as_deref()
    }

    /// Proper name, or the empty string.
    pub fn english_name(&self) -> &str {
        self.proper_name.as_deref().unwrap_or("")
    }

    /// Proper name in the current locale, or the empty string.
    pub fn localized_name(&self) -> &str {
        &self.localized_name
    }

    pub fn name_aliases(&self) -> &[String] {
        &self.name_aliases
    }

    pub fn localized_name_aliases(&self) -> &[String] {
        &self.localized_name_aliases
    }

    /// Attach a name without ever replacing an existing proper name.
    ///
    /// The first name becomes the proper name; any later, different name is
    /// appended to the aliases.
    pub fn assign_name(&mut self, name: &str) -> NameAssignment {
        let name = name.trim();
        if name.is_empty() {
            return NameAssignment::Unchanged;
        }
        match &self.proper_name {
            None => {
                self.proper_name = Some(name.to_string());
                self.localized_name = name.to_string();
                NameAssignment::ProperName
            }
            Some(current) if current == name => NameAssignment::Unchanged,
            Some(_) => {
                if self.name_aliases.iter().any(|a| a == name) {
                    return NameAssignment::Unchanged;
                }
                self.name_aliases.push(name.to_string());
                self.localized_name_aliases.push(name.to_string());
                NameAssignment::Alias
            }
        }
    }

    /// Forget every name and alias, e.g. before switching sky culture.
    pub fn remove_all_names(&mut self) {
        self.proper_name = None;
        self.localized_name.clear();
        self.name_aliases.clear();
        self.localized_name_aliases.clear();
    }

    /// Recompute localized names from the English ones.
    pub fn translate_names(&mut self, translator: &dyn Translator) {
        self.localized_name = self
            .proper_name
            .as_deref()
            .map(|n| translator.translate(n))
            .unwrap_or_default();
        self.localized_name_aliases = self
            .name_aliases
            .iter()
            .map(|a| translator.translate(a))
            .collect();
    }
}

/// Unit vector for a J2000 right ascension / declination pair.
pub fn radec_to_uvec(ra_rad: f64, dec_rad: f64) -> Vector3<f64> {
    let (sin_ra, cos_ra) = ra_rad.sin_cos();
    let (sin_dec, cos_dec) = dec_rad.sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}
