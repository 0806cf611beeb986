//! # dsocat
//!
//! A **deep-sky object catalog** for planetarium-style sky rendering and search.
//!
//! `dsocat` loads galaxies, clusters and nebulae from a compact binary catalog,
//! indexes them on the celestial sphere, attaches common names from name files
//! and answers the queries a sky map needs: what is in this field of view, what
//! does "M31" or "Andromeda Galaxy" refer to, what completes "NGC 70".
//!
//! ## Features
//!
//! - **Fifteen catalogs** per object: NGC, IC, Messier, Caldwell, Barnard, Sharpless,
//!   van den Bergh, RCW, LDN, LBN, Collinder, Melotte, PGC, UGC and Cederblad
//! - **Spatial index** over a fixed partition of the sphere, queried with convex
//!   polygons (with a margin) or cones
//! - **Catalog filters** decide which objects are loaded at all; **type filters**
//!   narrow listings
//! - **Name resolution** by proper name, alias or designation, in English or a
//!   localized language, plus prefix **autocompletion**
//! - **Legacy conversion** from the tab-separated text catalog to the binary format
//!
//! ## Example
//!
//! ```no_run
//! use dsocat::{Catalog, DsoCatalog, FilterConfig, LoaderConfig};
//!
//! let config = LoaderConfig {
//!     data_dir: "data/nebulae".into(),
//!     ..Default::default()
//! };
//! let catalog = DsoCatalog::open(config, &FilterConfig::default(), "default").unwrap();
//!
//! if let Some(m31) = catalog.resolve("Andromeda Galaxy") {
//!     let record = catalog.get(m31).unwrap();
//!     println!("{} at RA {:.3} rad", record.designation(), record.ra_rad());
//! }
//! assert_eq!(
//!     catalog.get_by_catalog_number(Catalog::Ngc, 224_u32),
//!     catalog.resolve("M31"),
//! );
//! for text in catalog.autocomplete("NGC 70", 5, true, true) {
//!     println!("{text}");
//! }
//! ```
//!
//! ## Data layout
//!
//! A catalog set is a directory `<data_dir>/<set>/` holding `catalog.dat`
//! (binary records), `names.dat` (default names) and optionally `catalog.txt`
//! (legacy text catalog, converted when [`LoaderConfig::convert_legacy`] is set).
//!

pub mod catalogs;
pub mod error;
pub mod filter;
pub mod listing;
pub mod loader;
pub mod object;
pub mod resolver;
pub mod skyindex;
pub mod store;
pub mod translate;

pub use catalogs::{Catalog, CatalogDesignation, CatalogNumberSet};
pub use error::{ConvertError, DecodeError, LoadError, ParseError};
pub use filter::{CatalogFilterMask, FilterConfig, FilterEngine, TypeFilterMask};
pub use listing::ListingCode;
pub use loader::{CatalogLoader, DsoCatalog, LoadSummary, LoaderConfig};
pub use object::{radec_to_uvec, DistanceUnit, NameAssignment, ObjectRecord, TypeTag};
pub use resolver::NameResolver;
pub use skyindex::{ConvexRegion, SpatialIndex};
pub use store::{ObjectStore, RecordRef};
pub use translate::{DictionaryTranslator, IdentityTranslator, Translator};
