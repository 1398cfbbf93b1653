//! Record of which layers contributed to a loaded configuration.

use std::sync::Arc;

use crate::{LoadError, SourceLayer};

/// A layer that was configured but could not be applied.
#[derive(Clone, Debug)]
pub struct LayerIssue {
    layer: SourceLayer,
    error: Arc<LoadError>,
}

impl LayerIssue {
    /// The layer that failed.
    #[must_use]
    pub const fn layer(&self) -> SourceLayer {
        self.layer
    }

    /// Why it failed.
    #[must_use]
    pub fn error(&self) -> &LoadError {
        &self.error
    }
}

/// Outcome of every layer considered during a load.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    applied: Vec<SourceLayer>,
    skipped: Vec<SourceLayer>,
    issues: Vec<LayerIssue>,
}

impl LoadReport {
    pub(crate) fn record_applied(&mut self, layer: SourceLayer) {
        self.applied.push(layer);
    }

    pub(crate) fn record_skipped(&mut self, layer: SourceLayer) {
        self.skipped.push(layer);
    }

    pub(crate) fn record_issue(&mut self, layer: SourceLayer, error: Arc<LoadError>) {
        self.issues.push(LayerIssue { layer, error });
    }

    /// Layers merged into the configuration, in application order.
    #[must_use]
    pub fn applied(&self) -> &[SourceLayer] {
        &self.applied
    }

    /// Layers that were not configured.
    #[must_use]
    pub fn skipped(&self) -> &[SourceLayer] {
        &self.skipped
    }

    /// Layers that were configured but treated as absent after failing.
    #[must_use]
    pub fn issues(&self) -> &[LayerIssue] {
        &self.issues
    }

    /// Whether any configured layer failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }
}
