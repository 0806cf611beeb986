//! Parsing of typed catalog designations such as `M31`, `NGC 224`,
//! `Sh2-155`, `Col 399` or `Ced 55a`.
//!
//! Input is matched case-insensitively against the whole string, so a
//! longer prefix always wins over a shorter one it starts with: `MEL 20` is
//! Melotte and never Messier, `CR 399` is Collinder and never Caldwell.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalogs::{Catalog, CatalogDesignation};

static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(NGC|IC|MEL|M|CR|COL|C|B|VDB|RCW|LDN|LBN|PGC|UGC)\s*(\d+)$")
        .expect("valid designation regex")
});

static SH2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^SH\s*2\s*-\s*(\d+)$").expect("valid Sh2 regex"));

static CED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CED\s*(\S.*)$").expect("valid Ced regex"));

/// Catalog and designator named by `text`, if it is a catalog designation.
///
/// Numeric designators must be positive; `M 0` names nothing.
pub fn parse_designation(text: &str) -> Option<(Catalog, CatalogDesignation)> {
    let upper = text.trim().to_uppercase();

    if let Some(caps) = NUMERIC_RE.captures(&upper) {
        let catalog = match &caps[1] {
            "NGC" => Catalog::Ngc,
            "IC" => Catalog::Ic,
            "M" => Catalog::M,
            "C" => Catalog::C,
            "B" => Catalog::B,
            "VDB" => Catalog::VdB,
            "RCW" => Catalog::Rcw,
            "LDN" => Catalog::Ldn,
            "LBN" => Catalog::Lbn,
            "CR" | "COL" => Catalog::Cr,
            "MEL" => Catalog::Mel,
            "PGC" => Catalog::Pgc,
            "UGC" => Catalog::Ugc,
            _ => return None,
        };
        return positive(&caps[2]).map(|n| (catalog, CatalogDesignation::Number(n)));
    }

    if let Some(caps) = SH2_RE.captures(&upper) {
        return positive(&caps[1]).map(|n| (Catalog::Sh2, CatalogDesignation::Number(n)));
    }

    CED_RE.captures(&upper).map(|caps| {
        (
            Catalog::Ced,
            CatalogDesignation::Text(caps[1].trim().to_string()),
        )
    })
}

fn positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|&n| n > 0)
}
