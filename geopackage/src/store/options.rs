use serde::{Deserialize, Serialize};

use super::FeatureStore;
use crate::codec::EnvelopeMode;

/// Settings of a [`FeatureStore`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Header envelope written for new and updated geometries.
    pub envelope_mode: EnvelopeMode,
    /// If true, a spatial index is created together with every feature table.
    pub auto_index: bool,
}

/// Convenience type to initialize a [`FeatureStore`].
///
/// ```
/// use geopackage::{EnvelopeMode, FeatureStoreBuilder};
///
/// let store = FeatureStoreBuilder::default()
///     .with_envelope_mode(EnvelopeMode::Xyz)
///     .with_auto_index(true)
///     .build();
///
/// assert_eq!(store.options().envelope_mode, EnvelopeMode::Xyz);
/// assert!(store.options().auto_index);
/// ```
#[derive(Debug, Default)]
pub struct FeatureStoreBuilder {
    envelope_mode: Option<EnvelopeMode>,
    auto_index: Option<bool>,
}

impl FeatureStoreBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the header envelope written for geometries.
    ///
    /// Defaults to [`EnvelopeMode::Xy`].
    pub fn with_envelope_mode(mut self, envelope_mode: EnvelopeMode) -> Self {
        self.envelope_mode = Some(envelope_mode);
        self
    }

    /// Sets whether feature tables are spatially indexed on creation.
    ///
    /// Defaults to `false`.
    pub fn with_auto_index(mut self, auto_index: bool) -> Self {
        self.auto_index = Some(auto_index);
        self
    }

    /// Replaces all the settings set before with the given options.
    pub fn with_options(self, options: StoreOptions) -> Self {
        self.with_envelope_mode(options.envelope_mode)
            .with_auto_index(options.auto_index)
    }

    /// Consumes the builder and creates an empty store.
    pub fn build(self) -> FeatureStore {
        let FeatureStoreBuilder {
            envelope_mode,
            auto_index,
        } = self;
        let defaults = StoreOptions::default();

        FeatureStore::with_options(StoreOptions {
            envelope_mode: envelope_mode.unwrap_or(defaults.envelope_mode),
            auto_index: auto_index.unwrap_or(defaults.auto_index),
        })
    }
}
