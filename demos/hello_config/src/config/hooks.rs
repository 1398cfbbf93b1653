//! Callables run once the configuration is loaded.

use crate::loader::RootConfig;

// @AutoExecute
/// Record which layers contributed.
pub fn log_summary(config: &layerconf::LoadedConfig<RootConfig>) {
    let report = config.report();
    tracing::info!(
        applied = ?report.applied(),
        skipped = ?report.skipped(),
        issues = report.issues().len(),
        "configuration loaded"
    );
}
