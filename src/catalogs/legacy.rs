//! Legacy tab-separated text catalog and its conversion to the binary format.
//!
//! Each data line has 31 tab-separated fields:
//!
//! ```text
//! id  ra  dec  bmag  vmag  type  morph  major'  minor'  orient
//! z  z_err  plx  plx_err  dist  dist_err
//! NGC IC M C B Sh2 VdB RCW LDN LBN Cr Mel PGC UGC Ced
//! ```
//!
//! Lines starting with `#` or `//` are comments. Coordinates are decimal
//! degrees or sexagesimal (`H:M:S` for RA, `D:M:S` for Dec, colon or space
//! separated). Axis sizes are in arcminutes. An empty numeric field reads
//! as zero.

use std::f64::consts::PI;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::catalogs::binary;
use crate::catalogs::{Catalog, CatalogNumberSet};
use crate::error::{ConvertError, LoadError};
use crate::object::{ObjectRecord, TypeTag, UNKNOWN_MAGNITUDE};

pub const LEGACY_FIELD_COUNT: usize = 31;

const FIELD_NAMES: [&str; LEGACY_FIELD_COUNT] = [
    "id", "ra", "dec", "bmag", "vmag", "type", "morph", "major", "minor", "orientation", "z",
    "z_err", "plx", "plx_err", "dist", "dist_err", "NGC", "IC", "M", "C", "B", "Sh2", "VdB",
    "RCW", "LDN", "LBN", "Cr", "Mel", "PGC", "UGC", "Ced",
];

/// Column of the first catalog number; the 14 numeric catalogs follow in
/// binary slot order, then Cederblad.
const FIRST_CATALOG_FIELD: usize = 16;

/// A row that could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

/// Outcome of reading a legacy catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertSummary {
    /// Data rows seen, comments and blank lines excluded.
    pub rows_seen: usize,
    pub converted: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Convert the fields of one catalog line.
///
/// With `decimal_coordinates` the RA and Dec fields are decimal degrees,
/// otherwise sexagesimal hours and degrees.
pub fn convert_legacy_row(
    fields: &[&str],
    decimal_coordinates: bool,
) -> Result<ObjectRecord, ConvertError> {
    if fields.len() < LEGACY_FIELD_COUNT {
        return Err(ConvertError::MissingField {
            expected: LEGACY_FIELD_COUNT,
            found: fields.len(),
        });
    }
    let field = |i: usize| fields[i].trim();

    let internal_id: u32 = parse_num(0, field(0))?;
    let coordinate = |i: usize| -> Result<f64, ConvertError> {
        let value = if decimal_coordinates {
            parse_num::<f64>(i, field(i))?
        } else {
            parse_sexagesimal(field(i))?
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConvertError::InvalidCoordinate {
                value: field(i).to_string(),
            })
        }
    };
    let (ra, dec) = if decimal_coordinates {
        (coordinate(1)?.to_radians(), coordinate(2)?.to_radians())
    } else {
        (coordinate(1)? * PI / 12.0, coordinate(2)? * PI / 180.0)
    };

    let mut record = ObjectRecord::new(internal_id, ra, dec);
    record.magnitude_b = magnitude(parse_float(3, field(3))?);
    record.magnitude_v = magnitude(parse_float(4, field(4))?);
    record.object_type = TypeTag::from_token(field(5));
    record.morphological_type = field(6).to_string();
    record.major_axis_deg = parse_float::<f32>(7, field(7))? / 60.0;
    record.minor_axis_deg = parse_float::<f32>(8, field(8))? / 60.0;
    record.orientation_deg = parse_float::<f64>(9, field(9))?.round() as i32;
    record.redshift = parse_float(10, field(10))?;
    record.redshift_error = parse_float(11, field(11))?;
    record.parallax_mas = parse_float(12, field(12))?;
    record.parallax_error = parse_float(13, field(13))?;
    record.distance = parse_float(14, field(14))?;
    record.distance_error = parse_float(15, field(15))?;

    let mut numbers = CatalogNumberSet::new();
    for (offset, catalog) in Catalog::NUMERIC.into_iter().enumerate() {
        let column = FIRST_CATALOG_FIELD + offset;
        numbers.set_number(catalog, parse_num(column, field(column))?);
    }
    numbers.set_ced(field(LEGACY_FIELD_COUNT - 1));
    record.catalog_numbers = numbers;

    Ok(record)
}

/// Magnitudes at or below zero mean "no measurement".
fn magnitude(value: f32) -> f32 {
    if value <= 0.0 {
        UNKNOWN_MAGNITUDE
    } else {
        value
    }
}

fn parse_num<T>(column: usize, text: &str) -> Result<T, ConvertError>
where
    T: FromStr + Default,
{
    if text.is_empty() {
        return Ok(T::default());
    }
    text.parse().map_err(|_| ConvertError::InvalidNumber {
        field: FIELD_NAMES[column],
        value: text.to_string(),
    })
}

/// Like [`parse_num`], but `nan` and the infinities are rejected.
fn parse_float<T>(column: usize, text: &str) -> Result<T, ConvertError>
where
    T: FromStr + Default + Copy + Into<f64>,
{
    let value: T = parse_num(column, text)?;
    if value.into().is_finite() {
        Ok(value)
    } else {
        Err(ConvertError::InvalidNumber {
            field: FIELD_NAMES[column],
            value: text.to_string(),
        })
    }
}

/// Value of a `D:M:S` (or `D M S`) string in units of its first component.
/// The sign comes from a leading `-` on the first component, so `-00:30:00`
/// is negative.
pub fn parse_sexagesimal(text: &str) -> Result<f64, ConvertError> {
    let invalid = || ConvertError::InvalidCoordinate {
        value: text.to_string(),
    };
    let parts: Vec<&str> = if text.contains(':') {
        text.split(':').map(str::trim).collect()
    } else {
        text.split_whitespace().collect()
    };
    if parts.len() < 3 {
        return Err(invalid());
    }
    let component = |s: &str| -> Result<f64, ConvertError> {
        if s.is_empty() {
            return Ok(0.0);
        }
        s.parse::<f64>().map_err(|_| invalid())
    };
    let whole = component(parts[0])?.abs();
    let minutes = component(parts[1])?;
    let seconds = component(parts[2])?;
    let value = whole + minutes / 60.0 + seconds / 3600.0;
    if !value.is_finite() {
        return Err(invalid());
    }
    if parts[0].starts_with('-') {
        Ok(-value)
    } else {
        Ok(value)
    }
}

/// Parse a legacy catalog from `reader`.
///
/// Rows that fail to convert are logged with their line number, counted in
/// the summary and otherwise ignored. Line numbers are physical lines of the
/// input, comments and blank lines included.
pub fn read_legacy_catalog<R: Read>(
    reader: R,
    decimal_coordinates: bool,
) -> (Vec<ObjectRecord>, ConvertSummary) {
    let mut records = Vec::new();
    let mut summary = ConvertSummary::default();
    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line_number = idx as u64 + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                summary.rows_seen += 1;
                warn!("Unreadable row at line {} of legacy catalog: {}", line_number, e);
                summary.skipped.push(SkippedRow {
                    line: line_number,
                    reason: e.to_string(),
                });
                continue;
            }
            Err(e) => {
                warn!("Stopped reading legacy catalog at line {}: {}", line_number, e);
                break;
            }
        };
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            continue;
        }
        summary.rows_seen += 1;

        let fields: Vec<&str> = line.split('\t').collect();
        match convert_legacy_row(&fields, decimal_coordinates) {
            Ok(record) => {
                records.push(record);
                summary.converted += 1;
            }
            Err(e) => {
                warn!(line = line_number, error = %e, "skipping legacy catalog row");
                summary.skipped.push(SkippedRow {
                    line: line_number,
                    reason: e.to_string(),
                });
            }
        }
    }
    (records, summary)
}

/// Convert the text catalog at `input` into a binary catalog at `output`.
///
/// The binary catalog is written to a temporary file next to `output` and
/// moved into place once complete, so `output` is never left half written.
pub fn convert_legacy_catalog(
    input: &Path,
    output: &Path,
    decimal_coordinates: bool,
) -> Result<ConvertSummary, LoadError> {
    let file = File::open(input).map_err(|e| LoadError::unavailable(input, e))?;
    let (records, summary) = read_legacy_catalog(file, decimal_coordinates);

    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| LoadError::unavailable(output, e))?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        binary::write_catalog(&records, &mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| LoadError::unavailable(output, e))?;
    }
    staged
        .persist(output)
        .map_err(|e| LoadError::unavailable(output, e.error))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = summary.rows_seen,
        converted = summary.converted,
        skipped = summary.skipped.len(),
        "converted legacy deep-sky catalog"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::binary::BinaryCatalogReader;

    fn row(values: &[(usize, &str)]) -> Vec<String> {
        let mut fields = vec![String::new(); LEGACY_FIELD_COUNT];
        for &(i, v) in values {
            fields[i] = v.to_string();
        }
        fields
    }

    fn as_strs(fields: &[String]) -> Vec<&str> {
        fields.iter().map(String::as_str).collect()
    }

    #[test]
    fn decimal_row() {
        let fields = row(&[
            (0, "1"),
            (1, "10.6847"),
            (2, "41.2687"),
            (3, "4.36"),
            (4, "3.44"),
            (5, "G"),
            (6, "SA(s)b"),
            (7, "190"),
            (8, "60"),
            (9, "35"),
            (16, "224"),
            (18, "31"),
        ]);
        let rec = convert_legacy_row(&as_strs(&fields), true).unwrap();
        assert_eq!(rec.internal_id, 1);
        assert!((rec.ra_rad() - 10.6847_f64.to_radians()).abs() < 1e-12);
        assert!((rec.dec_rad() - 41.2687_f64.to_radians()).abs() < 1e-12);
        assert_eq!(rec.object_type, TypeTag::Galaxy);
        assert!((rec.major_axis_deg - 190.0 / 60.0).abs() < 1e-6);
        assert_eq!(rec.orientation_deg, 35);
        assert_eq!(rec.catalog_numbers.number(Catalog::Ngc), Some(224));
        assert_eq!(rec.catalog_numbers.number(Catalog::M), Some(31));
        assert_eq!(rec.catalog_numbers.ced(), None);
    }

    #[test]
    fn empty_and_non_positive_magnitudes_are_unknown() {
        let fields = row(&[(0, "2"), (1, "0"), (2, "0"), (3, "0"), (4, "-1.5")]);
        let rec = convert_legacy_row(&as_strs(&fields), true).unwrap();
        assert_eq!(rec.magnitude_b, UNKNOWN_MAGNITUDE);
        assert_eq!(rec.magnitude_v, UNKNOWN_MAGNITUDE);
        assert_eq!(rec.object_type, TypeTag::Unknown);
    }

    #[test]
    fn sexagesimal_coordinates() {
        let fields = row(&[(0, "3"), (1, "05:34:31.9"), (2, "-05 23 28")]);
        let rec = convert_legacy_row(&as_strs(&fields), false).unwrap();
        let ra_hours = 5.0 + 34.0 / 60.0 + 31.9 / 3600.0;
        let dec_deg: f64 = -(5.0 + 23.0 / 60.0 + 28.0 / 3600.0);
        assert!((rec.ra_rad() - ra_hours * PI / 12.0).abs() < 1e-12);
        assert!((rec.dec_rad() - dec_deg.to_radians()).abs() < 1e-12);

        assert!((parse_sexagesimal("-00:30:00").unwrap() + 0.5).abs() < 1e-12);
        assert!(matches!(
            parse_sexagesimal("05:34"),
            Err(ConvertError::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn row_errors() {
        let short = ["1", "2", "3"];
        assert_eq!(
            convert_legacy_row(&short, true),
            Err(ConvertError::MissingField {
                expected: 31,
                found: 3
            })
        );
        let fields = row(&[(0, "1"), (16, "abc")]);
        assert_eq!(
            convert_legacy_row(&as_strs(&fields), true),
            Err(ConvertError::InvalidNumber {
                field: "NGC",
                value: "abc".into()
            })
        );
    }

    #[test]
    fn comments_blank_lines_and_bad_rows() {
        let good = row(&[(0, "1"), (1, "10"), (2, "20"), (5, "OC"), (30, "55a")]).join("\t");
        let bad = row(&[(0, "x")]).join("\t");
        let text = format!("# header\n// old comment\n{good}\n\n{bad}\n1\t2\n");
        let (records, summary) = read_legacy_catalog(text.as_bytes(), true);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].catalog_numbers.ced(), Some("55a"));
        assert_eq!(summary.rows_seen, 3);
        assert_eq!(summary.converted, 1);
        let lines: Vec<u64> = summary.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![5, 6]);
    }

    #[test]
    fn conversion_writes_a_readable_binary_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("catalog.txt");
        let output = dir.path().join("catalog.dat");
        let lines = [
            row(&[(0, "1"), (1, "10.68"), (2, "41.27"), (5, "G"), (16, "224"), (18, "31")]),
            row(&[(0, "2"), (1, "314.7"), (2, "44.3"), (5, "NB"), (16, "7000")]),
        ];
        let text: Vec<String> = lines.iter().map(|l| l.join("\t")).collect();
        std::fs::write(&input, text.join("\n")).unwrap();

        let summary = convert_legacy_catalog(&input, &output, true).unwrap();
        assert_eq!(summary.converted, 2);

        let decoded: Vec<ObjectRecord> = BinaryCatalogReader::open(&output)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].object_type, TypeTag::BrightNebula);

        let missing = convert_legacy_catalog(&dir.path().join("nope.txt"), &output, true);
        assert!(matches!(missing, Err(LoadError::SourceUnavailable { .. })));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let nan_ra = row(&[(0, "7"), (1, "nan"), (2, "10")]);
        assert_eq!(
            convert_legacy_row(&as_strs(&nan_ra), true),
            Err(ConvertError::InvalidCoordinate { value: "nan".into() })
        );
        let inf_dec = row(&[(0, "7"), (1, "10"), (2, "-inf")]);
        assert!(matches!(
            convert_legacy_row(&as_strs(&inf_dec), true),
            Err(ConvertError::InvalidCoordinate { .. })
        ));
        let sexagesimal = row(&[(0, "7"), (1, "inf:00:00"), (2, "10:00:00")]);
        assert!(matches!(
            convert_legacy_row(&as_strs(&sexagesimal), false),
            Err(ConvertError::InvalidCoordinate { .. })
        ));
        let nan_mag = row(&[(0, "7"), (1, "10"), (2, "10"), (3, "NaN")]);
        assert_eq!(
            convert_legacy_row(&as_strs(&nan_mag), true),
            Err(ConvertError::InvalidNumber {
                field: "bmag",
                value: "NaN".into()
            })
        );
        let inf_axis = row(&[(0, "7"), (1, "10"), (2, "10"), (7, "infinity")]);
        assert!(matches!(
            convert_legacy_row(&as_strs(&inf_axis), true),
            Err(ConvertError::InvalidNumber { field: "major", .. })
        ));
    }

    #[test]
    fn bad_coordinates_do_not_reach_the_binary_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("catalog.txt");
        let output = dir.path().join("catalog.dat");
        let good = row(&[(0, "1"), (1, "10"), (2, "20"), (16, "224")]).join("\t");
        let bad = row(&[(0, "7"), (1, "nan"), (2, "20"), (16, "225")]).join("\t");
        std::fs::write(&input, format!("{good}\n{bad}\n")).unwrap();

        let summary = convert_legacy_catalog(&input, &output, true).unwrap();
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].line, 2);

        let decoded: Vec<ObjectRecord> = BinaryCatalogReader::open(&output)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].internal_id, 1);
    }

    #[test]
    fn failed_conversion_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("catalog.txt");
        let good = row(&[(0, "1"), (1, "10"), (2, "20")]).join("\t");
        std::fs::write(&input, good).unwrap();

        // the target is a directory, so moving the finished file there fails
        let output = dir.path().join("catalog.dat");
        std::fs::create_dir(&output).unwrap();
        let err = convert_legacy_catalog(&input, &output, true).unwrap_err();
        assert!(matches!(err, LoadError::SourceUnavailable { .. }));

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["catalog.dat", "catalog.txt"]);
        assert!(output.is_dir());
    }
}
