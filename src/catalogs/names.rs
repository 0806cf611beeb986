//! Name files that attach proper names and aliases to loaded objects.
//!
//! Two formats are read:
//!
//! * **Fixed-column** (`names.dat`): characters 1-5 hold a catalog prefix,
//!   6-20 the designator within that catalog, 22 onwards the name. Only a
//!   name written as `_("text")` is attached. An unrecognized prefix means
//!   the designator is an internal object id.
//! * **Sky culture** (`dso_names.fab`): `identifier |_("native name") refs`,
//!   where the identifier is any text that resolves to an object, such as
//!   `M 31` or `NGC 224`.
//!
//! In both, lines that are blank or start with `#` are ignored.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::catalogs::{Catalog, CatalogDesignation};
use crate::error::{LoadError, ParseError};
use crate::object::NameAssignment;
use crate::resolver::NameResolver;
use crate::store::{ObjectStore, RecordRef};

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*#.*|\s*)$").expect("valid comment regex"));

static TRANSLATABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^_\("(.*)"\)$"#).expect("valid translatable regex"));

static CULTURE_RECORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*([\w\s]+)\s*\|_\("(.*)"\)\s*([,\d\s]*)$"#).expect("valid record regex")
});

/// Outcome of reading one name file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameLoadSummary {
    /// Non-comment lines.
    pub total: usize,
    /// Lines that referred to a loaded object.
    pub matched: usize,
    /// Lines whose name was attached to an object (as proper name or alias,
    /// or already present).
    pub applied: usize,
    pub skipped_lines: Vec<ParseError>,
}

impl NameLoadSummary {
    fn skip(&mut self, line: usize, reason: impl Into<String>) {
        let err = ParseError {
            line,
            reason: reason.into(),
        };
        warn!(line, reason = %err.reason, "skipping name record");
        self.skipped_lines.push(err);
    }
}

/// Substring of `line` by character position, like a fixed-width column.
fn column(line: &str, start: usize, len: Option<usize>) -> &str {
    let mut indices = line.char_indices().map(|(i, _)| i).chain(std::iter::once(line.len()));
    let Some(begin) = indices.nth(start) else {
        return "";
    };
    let end = match len {
        Some(0) => begin,
        Some(n) => line
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(line.len()))
            .nth(start + n)
            .unwrap_or(line.len()),
        None => line.len(),
    };
    &line[begin..end]
}

fn apply_name(store: &mut ObjectStore, handle: RecordRef, name: &str) -> Option<NameAssignment> {
    store.get_mut(handle).map(|record| record.assign_name(name))
}

/// Read fixed-column names from `reader` into `store`.
pub fn load_fixed_column_names<R: BufRead>(
    reader: R,
    store: &mut ObjectStore,
) -> io::Result<NameLoadSummary> {
    let mut summary = NameLoadSummary::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        if COMMENT_RE.is_match(&line) {
            continue;
        }
        summary.total += 1;

        let prefix = column(&line, 0, Some(5)).trim();
        let designator = column(&line, 5, Some(15)).trim().to_uppercase();
        let name = column(&line, 21, None).trim();

        let handle = match Catalog::from_name_file_prefix(prefix) {
            Some(Catalog::Ced) => {
                store.find_by_catalog(Catalog::Ced, &CatalogDesignation::Text(designator.clone()))
            }
            Some(catalog) => match designator.parse::<u32>() {
                Ok(number) => store.find_by_number(catalog, number),
                Err(_) => {
                    summary.skip(
                        line_number,
                        format!("invalid {catalog} designator {designator:?}"),
                    );
                    continue;
                }
            },
            None => match designator.parse::<u32>() {
                Ok(id) => store.find_by_id(id),
                Err(_) => {
                    summary.skip(line_number, format!("invalid object id {designator:?}"));
                    continue;
                }
            },
        };

        let Some(handle) = handle else {
            debug!(line = line_number, prefix, designator = %designator, "no loaded object for name record");
            continue;
        };
        summary.matched += 1;

        if let Some(caps) = TRANSLATABLE_RE.captures(name) {
            if apply_name(store, handle, caps[1].trim()).is_some() {
                summary.applied += 1;
            }
        }
    }
    Ok(summary)
}

/// Read sky-culture names from `reader` into `store`.
///
/// Identifiers are resolved the same way as typed search text.
pub fn load_sky_culture_names<R: BufRead>(
    reader: R,
    store: &mut ObjectStore,
) -> io::Result<NameLoadSummary> {
    let mut summary = NameLoadSummary::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = idx + 1;
        let line = line.trim_end_matches(['\r', '\n']);
        if COMMENT_RE.is_match(line) {
            continue;
        }
        summary.total += 1;

        let Some(caps) = CULTURE_RECORD_RE.captures(line) else {
            summary.skip(line_number, "cannot parse record");
            continue;
        };
        let identifier = caps[1].trim();
        let native_name = caps[2].trim();

        let Some(handle) = NameResolver::new(store).find_by_free_text(identifier) else {
            summary.skip(line_number, format!("unknown object {identifier:?}"));
            continue;
        };
        summary.matched += 1;
        if apply_name(store, handle, native_name).is_some() {
            summary.applied += 1;
        }
    }
    Ok(summary)
}

fn open(path: &Path) -> Result<BufReader<File>, LoadError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| LoadError::unavailable(path, e))
}

/// [`load_fixed_column_names`] over a file.
pub fn load_fixed_column_names_file(
    path: &Path,
    store: &mut ObjectStore,
) -> Result<NameLoadSummary, LoadError> {
    let summary =
        load_fixed_column_names(open(path)?, store).map_err(|e| LoadError::unavailable(path, e))?;
    info!(
        path = %path.display(),
        matched = summary.matched,
        total = summary.total,
        "loaded deep-sky object names"
    );
    Ok(summary)
}

/// [`load_sky_culture_names`] over a file.
pub fn load_sky_culture_names_file(
    path: &Path,
    store: &mut ObjectStore,
) -> Result<NameLoadSummary, LoadError> {
    let summary =
        load_sky_culture_names(open(path)?, store).map_err(|e| LoadError::unavailable(path, e))?;
    info!(
        path = %path.display(),
        matched = summary.matched,
        total = summary.total,
        "loaded native deep-sky object names"
    );
    Ok(summary)
}
