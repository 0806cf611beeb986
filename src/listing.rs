//! Object lists for browsing: by type, by catalog and a few curated lists.
//!
//! Listing codes:
//!
//! | code | list |
//! |---|---|
//! | 0 | bright galaxies (magnitude 10 or brighter) |
//! | 1-29 | objects with that [`TypeTag`] code |
//! | 100-114 | catalog exports: M, C, B, Sh2, VdB, RCW, Cr, Mel, NGC, IC, LBN, LDN, PGC, UGC, Ced |
//! | 150 | dwarf galaxies |
//! | 151 | Herschel 400 |

use std::collections::HashSet;

use crate::catalogs::Catalog;
use crate::filter::FilterEngine;
use crate::object::{ObjectRecord, TypeTag};
use crate::store::{ObjectStore, RecordRef};

/// Faintest magnitude included in the bright-galaxy list.
pub const BRIGHT_GALAXY_LIMIT: f32 = 10.0;

/// PGC numbers of notable dwarf galaxies.
pub const DWARF_GALAXIES: [u32; 16] = [
    3589, 3792, 6830, 10074, 19441, 28913, 29194, 29653, 50779, 54074, 60095, 63287, 69519,
    88608, 2807155, 3097691,
];

/// NGC numbers of the Herschel 400 list.
pub const HERSCHEL_400: [u32; 400] = [
    40, 129, 136, 157, 185, 205, 225, 246, 247, 253, 278, 288, 381, 404, 436, 457, 488, 524, 559,
    584, 596, 598, 613, 615, 637, 650, 654, 659, 663, 720, 752, 772, 779, 869, 884, 891, 908, 936,
    1022, 1023, 1027, 1052, 1055, 1084, 1245, 1342, 1407, 1444, 1501, 1502, 1513, 1528, 1535,
    1545, 1647, 1664, 1788, 1817, 1857, 1907, 1931, 1961, 1964, 1980, 1999, 2022, 2024, 2126,
    2129, 2158, 2169, 2185, 2186, 2194, 2204, 2215, 2232, 2244, 2251, 2264, 2266, 2281, 2286,
    2301, 2304, 2311, 2324, 2335, 2343, 2353, 2354, 2355, 2360, 2362, 2371, 2372, 2392, 2395,
    2403, 2419, 2420, 2421, 2422, 2423, 2438, 2440, 2479, 2482, 2489, 2506, 2509, 2527, 2539,
    2548, 2567, 2571, 2613, 2627, 2655, 2681, 2683, 2742, 2768, 2775, 2782, 2787, 2811, 2841,
    2859, 2903, 2950, 2964, 2974, 2976, 2985, 3034, 3077, 3079, 3115, 3147, 3166, 3169, 3184,
    3190, 3193, 3198, 3226, 3227, 3242, 3245, 3277, 3294, 3310, 3344, 3377, 3379, 3384, 3395,
    3412, 3414, 3432, 3486, 3489, 3504, 3521, 3556, 3593, 3607, 3608, 3610, 3613, 3619, 3621,
    3626, 3628, 3631, 3640, 3655, 3665, 3675, 3686, 3726, 3729, 3810, 3813, 3877, 3893, 3898,
    3900, 3912, 3938, 3941, 3945, 3949, 3953, 3962, 3982, 3992, 3998, 4026, 4027, 4030, 4036,
    4039, 4041, 4051, 4085, 4088, 4102, 4111, 4143, 4147, 4150, 4151, 4179, 4203, 4214, 4216,
    4245, 4251, 4258, 4261, 4273, 4274, 4278, 4281, 4293, 4303, 4314, 4346, 4350, 4361, 4365,
    4371, 4394, 4414, 4419, 4429, 4435, 4438, 4442, 4448, 4449, 4450, 4459, 4473, 4477, 4478,
    4485, 4490, 4494, 4526, 4527, 4535, 4536, 4546, 4548, 4550, 4559, 4565, 4570, 4594, 4596,
    4618, 4631, 4636, 4643, 4654, 4656, 4660, 4665, 4666, 4689, 4697, 4698, 4699, 4725, 4753,
    4754, 4762, 4781, 4800, 4845, 4856, 4866, 4900, 4958, 4995, 5005, 5033, 5054, 5195, 5248,
    5273, 5322, 5363, 5364, 5466, 5473, 5474, 5557, 5566, 5576, 5631, 5634, 5676, 5689, 5694,
    5746, 5846, 5866, 5897, 5907, 5982, 6118, 6144, 6171, 6207, 6217, 6229, 6235, 6284, 6287,
    6293, 6304, 6316, 6342, 6355, 6356, 6369, 6401, 6426, 6440, 6445, 6451, 6514, 6517, 6520,
    6522, 6528, 6540, 6543, 6544, 6553, 6568, 6569, 6583, 6624, 6629, 6633, 6638, 6642, 6645,
    6664, 6712, 6755, 6756, 6781, 6802, 6818, 6823, 6826, 6830, 6834, 6866, 6882, 6885, 6905,
    6910, 6934, 6939, 6940, 6946, 7000, 7006, 7008, 7009, 7044, 7062, 7086, 7128, 7142, 7160,
    7209, 7217, 7243, 7296, 7331, 7380, 7448, 7479, 7510, 7606, 7662, 7686, 7723, 7727, 7789,
    7790, 7814,
];

/// Catalog exports in listing-code order starting at 100.
const CATALOG_EXPORTS: [Catalog; 15] = [
    Catalog::M,
    Catalog::C,
    Catalog::B,
    Catalog::Sh2,
    Catalog::VdB,
    Catalog::Rcw,
    Catalog::Cr,
    Catalog::Mel,
    Catalog::Ngc,
    Catalog::Ic,
    Catalog::Lbn,
    Catalog::Ldn,
    Catalog::Pgc,
    Catalog::Ugc,
    Catalog::Ced,
];

const BRIGHT_GALAXY_LABELS: [Catalog; 4] = [Catalog::Ngc, Catalog::Ic, Catalog::M, Catalog::C];

const TYPE_LABELS: [Catalog; 12] = [
    Catalog::Ngc,
    Catalog::Ic,
    Catalog::M,
    Catalog::C,
    Catalog::B,
    Catalog::Sh2,
    Catalog::VdB,
    Catalog::Rcw,
    Catalog::Lbn,
    Catalog::Ldn,
    Catalog::Cr,
    Catalog::Mel,
];

/// A browsable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingCode {
    BrightGalaxies,
    Type(TypeTag),
    Catalog(Catalog),
    DwarfGalaxies,
    Herschel400,
}

impl ListingCode {
    pub fn from_code(code: u32) -> Option<ListingCode> {
        match code {
            0 => Some(ListingCode::BrightGalaxies),
            1..=29 => Some(ListingCode::Type(TypeTag::from_code(code))),
            100..=114 => Some(ListingCode::Catalog(CATALOG_EXPORTS[(code - 100) as usize])),
            150 => Some(ListingCode::DwarfGalaxies),
            151 => Some(ListingCode::Herschel400),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            ListingCode::BrightGalaxies => 0,
            ListingCode::Type(tag) => tag.code(),
            ListingCode::Catalog(cat) => {
                100 + CATALOG_EXPORTS.iter().position(|&c| c == cat).unwrap_or(0) as u32
            }
            ListingCode::DwarfGalaxies => 150,
            ListingCode::Herschel400 => 151,
        }
    }
}

/// How a catalog export spells its entries: compact for Messier and
/// Caldwell (`M31`), display form for everything else (`SH 2-155`).
fn export_label(catalog: Catalog, designator: &str) -> String {
    match catalog {
        Catalog::M | Catalog::C => catalog.compact_form(designator),
        _ => catalog.display_form(designator),
    }
}

fn name_or_label(record: &ObjectRecord, use_english: bool, fallback: &[Catalog]) -> Option<String> {
    if !record.english_name().is_empty() {
        let name = if use_english {
            record.english_name()
        } else {
            record.localized_name()
        };
        return Some(name.to_string());
    }
    fallback.iter().find_map(|&cat| {
        record
            .catalog_numbers
            .designation(cat)
            .map(|d| cat.display_form(&d.to_string()))
    })
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|s| seen.insert(s.clone())).collect()
}

fn is_bright_galaxy(record: &ObjectRecord) -> bool {
    record.object_type == TypeTag::Galaxy && record.brightest_magnitude() <= BRIGHT_GALAXY_LIMIT
}

/// Names of every named object, English or localized.
pub fn list_all(store: &ObjectStore, use_english: bool) -> Vec<String> {
    store
        .iter()
        .filter(|(_, r)| !r.english_name().is_empty())
        .map(|(_, r)| {
            if use_english {
                r.english_name().to_string()
            } else {
                r.localized_name().to_string()
            }
        })
        .collect()
}

/// Records selected by `code`, in store order.
///
/// When type filtering is switched on, objects of a disabled type group are
/// left out.
pub fn objects_by_type(
    store: &ObjectStore,
    filters: &FilterEngine,
    code: ListingCode,
) -> Vec<RecordRef> {
    let visible = |r: &ObjectRecord| filters.accepts_type(r.object_type);
    match code {
        ListingCode::BrightGalaxies => store
            .iter()
            .filter(|(_, r)| is_bright_galaxy(r) && visible(r))
            .map(|(h, _)| h)
            .collect(),
        ListingCode::Type(tag) => store
            .iter()
            .filter(|(_, r)| r.object_type == tag && visible(r))
            .map(|(h, _)| h)
            .collect(),
        ListingCode::Catalog(cat) => store
            .iter()
            .filter(|(_, r)| r.catalog_numbers.contains(cat) && visible(r))
            .map(|(h, _)| h)
            .collect(),
        ListingCode::DwarfGalaxies => resolve_list(store, Catalog::Pgc, &DWARF_GALAXIES, visible),
        ListingCode::Herschel400 => resolve_list(store, Catalog::Ngc, &HERSCHEL_400, visible),
    }
}

fn resolve_list<F>(store: &ObjectStore, catalog: Catalog, numbers: &[u32], visible: F) -> Vec<RecordRef>
where
    F: Fn(&ObjectRecord) -> bool,
{
    let mut seen = HashSet::new();
    numbers
        .iter()
        .filter_map(|&n| store.find_by_number(catalog, n))
        .filter(|&h| visible(&store[h]) && seen.insert(h))
        .collect()
}

/// Labels for the list selected by `code`, duplicates removed.
///
/// Type lists show an object's name when it has one, otherwise its first
/// designation. The curated lists are fixed designations and do not depend
/// on what is loaded.
pub fn list_by_type(
    store: &ObjectStore,
    filters: &FilterEngine,
    code: ListingCode,
    use_english: bool,
) -> Vec<String> {
    let labels: Vec<String> = match code {
        ListingCode::BrightGalaxies => objects_by_type(store, filters, code)
            .into_iter()
            .filter_map(|h| name_or_label(&store[h], use_english, &BRIGHT_GALAXY_LABELS))
            .collect(),
        ListingCode::Type(_) => objects_by_type(store, filters, code)
            .into_iter()
            .filter_map(|h| name_or_label(&store[h], use_english, &TYPE_LABELS))
            .collect(),
        ListingCode::Catalog(cat) => objects_by_type(store, filters, code)
            .into_iter()
            .filter_map(|h| {
                store[h]
                    .catalog_numbers
                    .designation(cat)
                    .map(|d| export_label(cat, &d.to_string()))
            })
            .collect(),
        ListingCode::DwarfGalaxies => DWARF_GALAXIES
            .iter()
            .map(|n| Catalog::Pgc.display_form(&n.to_string()))
            .collect(),
        ListingCode::Herschel400 => HERSCHEL_400
            .iter()
            .map(|n| Catalog::Ngc.display_form(&n.to_string()))
            .collect(),
    };
    dedup_in_order(labels)
}
