//! End-to-end behavior of a loaded catalog: conversion, catalog filtering,
//! name resolution, autocompletion, listings and reloads.


use dsocat::catalogs::binary::BinaryCatalogReader;
use dsocat::filter::in_displayed_catalog;
use dsocat::{
    Catalog, CatalogFilterMask, DsoCatalog, FilterConfig, ListingCode, LoadError, ObjectRecord,
    TypeFilterMask, TypeTag,
};
use fixtures::{init_tracing, scenario_set, SET};

fn open_with_mask(mask: CatalogFilterMask) -> (tempfile::TempDir, DsoCatalog) {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let config = scenario_set(dir.path());
    let mut catalog = DsoCatalog::open(config, &FilterConfig::default(), SET).expect("load");
    catalog.set_catalog_mask(mask).expect("mask applied");
    (dir, catalog)
}

fn ids(catalog: &DsoCatalog) -> Vec<u32> {
    let mut ids: Vec<u32> = catalog.store().iter().map(|(_, r)| r.internal_id).collect();
    ids.sort_unstable();
    ids
}

#[test]
fn messier_only() {
    let (_dir, catalog) = open_with_mask(CatalogFilterMask::M);
    assert_eq!(ids(&catalog), vec![1]);

    assert!(catalog.resolve("M31").is_some());
    assert!(catalog.resolve("NGC 224").is_some());
    assert_eq!(catalog.resolve("NGC 7000"), None);
    assert_eq!(catalog.resolve("North America Nebula"), None);

    assert_eq!(
        catalog.list_by_type(ListingCode::Catalog(Catalog::M), true),
        vec!["M31"]
    );
    assert_eq!(catalog.list_all(true), vec!["Andromeda Galaxy"]);
}

#[test]
fn ngc_and_messier() {
    let (_dir, catalog) = open_with_mask(CatalogFilterMask::NGC | CatalogFilterMask::M);
    assert_eq!(ids(&catalog), vec![1, 2]);

    let nan = catalog.resolve("north america nebula").expect("named");
    assert_eq!(catalog.resolve("NGC7000"), Some(nan));
    // still resolvable through a catalog that is not displayed
    assert_eq!(catalog.resolve("C 20"), Some(nan));

    let mut ngc = catalog.list_by_type(ListingCode::Catalog(Catalog::Ngc), true);
    ngc.sort();
    assert_eq!(ngc, vec!["NGC 224", "NGC 7000"]);
    assert_eq!(
        catalog.list_by_type(ListingCode::Type(TypeTag::BrightNebula), true),
        vec!["North America Nebula"]
    );
    assert_eq!(catalog.list_by_type(ListingCode::BrightGalaxies, true), vec!["Andromeda Galaxy"]);
}

#[test]
fn all_catalogs_admit_uncatalogued_objects() {
    let (_dir, catalog) = open_with_mask(CatalogFilterMask::all());
    assert_eq!(ids(&catalog), vec![1, 2, 3]);

    let orphan = catalog.find_by_id(3).expect("loaded");
    assert_eq!(catalog.get(orphan).map(|r| r.designation()), Some(String::new()));
    // too faint for the bright galaxy list
    assert_eq!(catalog.list_by_type(ListingCode::BrightGalaxies, true).len(), 1);
    assert_eq!(catalog.objects_by_type(ListingCode::Type(TypeTag::Galaxy)).len(), 2);
}

#[test]
fn type_filter_narrows_listings_only() {
    let (_dir, mut catalog) = open_with_mask(CatalogFilterMask::all());
    catalog.set_use_type_filters(true);
    catalog.set_type_mask(TypeFilterMask::BRIGHT_NEBULAE);

    assert!(catalog.objects_by_type(ListingCode::Type(TypeTag::Galaxy)).is_empty());
    assert!(catalog.list_by_type(ListingCode::Catalog(Catalog::M), true).is_empty());
    assert_eq!(catalog.objects_by_type(ListingCode::Catalog(Catalog::Ngc)).len(), 1);

    // lookups and spatial queries are not type filtered
    assert!(catalog.resolve("M31").is_some());
    assert_eq!(catalog.len(), 3);

    catalog.set_use_type_filters(false);
    assert_eq!(catalog.objects_by_type(ListingCode::Type(TypeTag::Galaxy)).len(), 2);
}

#[test]
fn catalog_filter_invariant_holds_for_every_mask() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let config = scenario_set(dir.path());
    let mut catalog =
        DsoCatalog::open(config.clone(), &FilterConfig::default(), SET).expect("initial load");

    let source: Vec<ObjectRecord> = BinaryCatalogReader::open(&config.catalog_path(SET))
        .expect("converted catalog")
        .collect::<Result<_, _>>()
        .expect("decode");
    assert_eq!(source.len(), 3);

    for (bits, expected_len) in [
        (0x1, 2),
        (0x4, 1),
        (0x8, 1),
        (0x5, 2),
        (0xc, 2),
        (0x3fff, 2),
        (0x7fff, 3),
    ] {
        let mask = CatalogFilterMask::from_bits_truncate(bits);
        catalog.set_catalog_mask(mask).expect("reload");
        for (_, record) in catalog.store().iter() {
            let displayed = mask == CatalogFilterMask::all()
                || record.catalog_numbers.catalogs().any(|c| mask.contains(c.mask()));
            assert!(displayed, "record {} loaded under {mask:?}", record.internal_id);
        }

        // and nothing the mask admits was left out
        let mut admitted: Vec<u32> = source
            .iter()
            .filter(|r| in_displayed_catalog(r, mask))
            .map(|r| r.internal_id)
            .collect();
        admitted.sort_unstable();
        assert_eq!(ids(&catalog), admitted, "under {mask:?}");
        assert_eq!(catalog.len(), expected_len, "under {mask:?}");
    }
}

#[test]
fn reload_advances_generation_and_keeps_names() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let config = scenario_set(dir.path());
    let mut catalog =
        DsoCatalog::open(config.clone(), &FilterConfig::default(), SET).expect("initial load");
    let first = catalog.generation();

    assert!(catalog.set_catalog_mask(CatalogFilterMask::all()).expect("reload"));
    assert_eq!(catalog.generation(), first + 1);
    assert!(catalog.resolve("Andromeda Galaxy").is_some());
    assert!(catalog.is_shown());

    // same mask again: nothing to do
    assert!(!catalog.set_catalog_mask(CatalogFilterMask::all()).expect("no-op"));
    assert_eq!(catalog.generation(), first + 1);

    // a broken catalog file leaves the loaded objects and the mask alone
    std::fs::remove_file(config.legacy_path(SET)).expect("remove legacy");
    std::fs::write(config.catalog_path(SET), b"DSOB").expect("truncate");
    let err = catalog
        .set_catalog_mask(CatalogFilterMask::NGC)
        .expect_err("truncated header");
    assert!(matches!(err, LoadError::Decode(_)), "{err}");
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.filters().catalog_mask(), CatalogFilterMask::all());
    assert_eq!(catalog.generation(), first + 1);
    assert!(catalog.resolve("North America Nebula").is_some());
}

#[test]
fn hidden_catalog_keeps_answering_lookups() {
    let (_dir, mut catalog) = open_with_mask(CatalogFilterMask::all());
    let m31 = catalog.resolve("M 31").expect("loaded");
    let direction = catalog.get(m31).expect("record").direction();

    assert_eq!(catalog.search_around(direction, 0.5), vec![m31]);
    assert_eq!(catalog.find_nearest(direction), Some(m31));
    catalog.set_shown(false);
    assert!(catalog.search_around(direction, 0.5).is_empty());
    assert_eq!(catalog.find_nearest(direction), Some(m31));
}

#[test]
fn autocomplete_over_loaded_objects() {
    let (_dir, catalog) = open_with_mask(CatalogFilterMask::all());
    assert_eq!(catalog.autocomplete("NGC 7", 10, true, true), vec!["NGC 7000"]);
    assert_eq!(catalog.autocomplete("ngc2", 10, true, true), vec!["NGC224"]);
    assert_eq!(catalog.autocomplete("M3", 10, true, true), vec!["M31"]);
    assert_eq!(catalog.autocomplete("C2", 10, true, true), vec!["C20"]);
    assert_eq!(
        catalog.autocomplete("north", 10, true, true),
        vec!["North America Nebula"]
    );
}

#[test]
fn missing_set_reports_path() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dsocat::LoaderConfig::new(dir.path());
    let err = DsoCatalog::open(config, &FilterConfig::default(), "nowhere")
        .err()
        .expect("no such set");
    match err {
        LoadError::SourceUnavailable { path, .. } => assert!(path.ends_with("nowhere/catalog.dat")),
        other => panic!("unexpected error {other}"),
    }
}
