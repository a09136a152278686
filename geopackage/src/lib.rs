//! GeoPackage geometry encoding and spatial indexing.
//!
//! The crate covers the part of a GeoPackage engine that deals with geometry values:
//!
//! * [`codec`] converts [`Geometry`](geopackage_types::Geometry) values to and from the GeoPackage binary
//!   geometry format (a small header with an optional envelope, followed by a WKB-like body).
//! * [`extract_envelope`] gets the 2d envelope of an encoded geometry without decoding it.
//! * [`validate`] checks geometry values against the declared type and Z/M policy of a [`GeometryColumn`].
//! * [`SpatialIndex`] keeps envelopes of feature geometries for fast bounding box queries.
//! * [`FeatureStore`] ties all of the above together: it keeps feature tables in memory and maintains their
//!   spatial indices on every write.
//!
//! ```
//! use geopackage::codec::{decode, encode, EnvelopeMode};
//! use geopackage::extract_envelope;
//! use geopackage::geopackage_types::{BoundingRect, Coord, Geometry};
//!
//! let point = Geometry::Point(Coord::xy(-122.4, 37.8));
//! let bytes = encode(Some(&point), 4326, EnvelopeMode::Xy)?;
//!
//! assert_eq!(&bytes[..2], b"GP");
//! assert_eq!(decode(&bytes)?.geometry, Some(point));
//! assert_eq!(
//!     extract_envelope(&bytes)?,
//!     Some(BoundingRect::new(-122.4, 37.8, -122.4, 37.8))
//! );
//! # Ok::<(), geopackage::GeoPackageError>(())
//! ```

pub use geopackage_types;

pub mod codec;
pub use codec::{decode, encode, DecodedGeometry, EnvelopeMode};

mod column;
pub use column::{DimensionPolicy, GeometryColumn};

mod envelope;
pub use envelope::{extract_envelope, EnvelopeSource};

pub mod error;
pub use error::{GeoPackageError, Result};

pub mod index;
pub use index::{BoxIndex, FeatureId, FeatureSource, MemoryBoxIndex, SpatialIndex};

mod store;
pub use store::{
    Extension, ExtensionRegistry, ExtensionScope, Feature, FeatureStore, FeatureStoreBuilder,
    Properties, StoreOptions, RTREE_INDEX_EXTENSION,
};

mod validate;
pub use validate::validate;
