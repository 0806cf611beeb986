//! Random catalogs written to disk, loaded back and queried spatially.


use std::f64::consts::PI;
use std::fs::File;

use dsocat::catalogs::binary::{write_catalog, BinaryCatalogReader};
use dsocat::{
    radec_to_uvec, Catalog, CatalogNumberSet, ConvexRegion, DsoCatalog, FilterConfig,
    ObjectRecord, TypeTag,
};
use fixtures::{init_tracing, write_binary_set, SET};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_records(rng: &mut StdRng, count: u32) -> Vec<ObjectRecord> {
    (1..=count)
        .map(|id| {
            let ra = rng.gen_range(0.0..2.0 * PI);
            let dec = rng.gen_range(-1.0f64..1.0).asin();
            let mut record = ObjectRecord::new(id, ra, dec);
            record.magnitude_b = rng.gen_range(2.0..16.0);
            record.object_type = TypeTag::from_code(rng.gen_range(0..30));
            record.major_axis_deg = rng.gen_range(0.0..2.0);
            record.orientation_deg = rng.gen_range(0..180);
            record.morphological_type = if id % 3 == 0 { "SA(s)b".into() } else { String::new() };

            let mut numbers = CatalogNumberSet::new();
            for catalog in Catalog::NUMERIC {
                if rng.gen_bool(0.15) {
                    numbers.set_number(catalog, id);
                }
            }
            if rng.gen_bool(0.05) {
                numbers.set_ced(&format!("{id}a"));
            }
            record.catalog_numbers = numbers;
            record
        })
        .collect()
}

#[test]
fn file_round_trip_preserves_every_field() {
    let mut rng = StdRng::seed_from_u64(42);
    let records = random_records(&mut rng, 500);

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.dat");
    let mut file = File::create(&path).expect("create");
    assert_eq!(write_catalog(&records, &mut file).expect("write"), 500);
    drop(file);

    let decoded: Vec<ObjectRecord> = BinaryCatalogReader::open(&path)
        .expect("open")
        .collect::<Result<_, _>>()
        .expect("decode");
    assert_eq!(decoded, records);
}

#[test]
fn polygon_queries_are_complete() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(7);
    let records = random_records(&mut rng, 3000);

    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_binary_set(dir.path(), &records);
    let catalog =
        DsoCatalog::open(config, &FilterConfig::all_catalogs(), SET).expect("load");
    assert_eq!(catalog.len(), records.len());

    for _ in 0..100 {
        let ra = rng.gen_range(0.0..2.0 * PI);
        let dec = rng.gen_range(-1.2..1.2);
        let half = rng.gen_range(0.01..0.3);
        let corners = [
            radec_to_uvec(ra - half, dec - half),
            radec_to_uvec(ra + half, dec - half),
            radec_to_uvec(ra + half, dec + half),
            radec_to_uvec(ra - half, dec + half),
        ];
        let margin = rng.gen_range(0.0..0.02);
        let Some(region) = ConvexRegion::polygon(&corners, margin) else {
            continue;
        };

        let mut found: Vec<u32> = catalog
            .objects_in_region(&region)
            .map(|h| catalog.get(h).expect("live handle").internal_id)
            .collect();
        found.sort_unstable();

        let mut expected: Vec<u32> = catalog
            .store()
            .iter()
            .filter(|(_, r)| region.contains(&r.direction()))
            .map(|(_, r)| r.internal_id)
            .collect();
        expected.sort_unstable();

        assert_eq!(found, expected);
    }
}

#[test]
fn reloading_the_same_file_keeps_lookups_stable() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(99);
    let records = random_records(&mut rng, 200);

    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_binary_set(dir.path(), &records);
    let mut catalog =
        DsoCatalog::open(config, &FilterConfig::all_catalogs(), SET).expect("load");

    let before: Vec<(u32, Option<u32>)> = (1..=200)
        .map(|id| {
            let found = catalog
                .find_by_id(id)
                .and_then(|h| catalog.get(h))
                .and_then(|r| r.catalog_numbers.number(Catalog::Ngc));
            (id, found)
        })
        .collect();
    let generation = catalog.generation();

    catalog.reload().expect("reload");
    assert_eq!(catalog.generation(), generation + 1);
    for (id, ngc) in before {
        let record = catalog.find_by_id(id).and_then(|h| catalog.get(h)).expect("present");
        assert_eq!(record.catalog_numbers.number(Catalog::Ngc), ngc);
        if let Some(n) = ngc {
            assert_eq!(catalog.get_by_catalog_number(Catalog::Ngc, n), catalog.find_by_id(id));
        }
    }
}
