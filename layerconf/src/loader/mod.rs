//! Loader that applies configuration layers in their fixed order.
//!
//! The generated `load` function seeds the aggregate with its defaults and
//! hands it to [`Loader::load`], which merges the file, remote and
//! command-line layers in that order. A configured layer that fails is logged,
//! recorded in the [`LoadReport`] and treated as absent unless the
//! application marked it as required with [`LoaderBuilder::require_layer`].

mod loaded;
mod report;

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8PathBuf;

use crate::sources::{RemoteSource, parse_args, read_file_layer};
use crate::{
    ConfigFormat, FlatValues, LayeredMerge, LoadError, LoadResult, SourceLayer,
    StructuredDecoder, Validator, is_not_blank,
};

pub use loaded::LoadedConfig;
pub use report::{LayerIssue, LoadReport};

/// Applies configuration layers over a seeded configuration value.
///
/// # Examples
///
/// ```rust,no_run
/// use std::time::Duration;
/// use layerconf::Loader;
///
/// let loader = Loader::builder()
///     .config_path("config/app.toml")
///     .remote("https://config.internal/app.toml")
///     .remote_timeout(Duration::from_secs(3))
///     .build()?;
/// # Ok::<(), std::sync::Arc<layerconf::LoadError>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Loader {
    external: bool,
    config_path: Option<Utf8PathBuf>,
    file_format: Option<ConfigFormat>,
    remote: Option<RemoteSource>,
    remote_format: Option<ConfigFormat>,
    args: Vec<String>,
    validator: Validator,
    decoder: Option<Arc<dyn StructuredDecoder>>,
    required: Vec<SourceLayer>,
}

impl Loader {
    /// Start configuring a loader.
    #[must_use]
    pub fn builder() -> LoaderBuilder {
        LoaderBuilder::default()
    }

    /// Merge every enabled layer over `seed` and snapshot the result.
    ///
    /// # Errors
    ///
    /// Returns the layer's error when a layer marked as required fails.
    /// Failures of other layers are recorded in the report instead.
    pub fn load<T: LayeredMerge>(&self, seed: T) -> LoadResult<LoadedConfig<T>> {
        let mut settings = seed;
        let mut report = LoadReport::default();
        report.record_applied(SourceLayer::Defaults);

        if !self.external {
            tracing::debug!("external configuration layers disabled; using defaults only");
            for layer in SourceLayer::MERGE_ORDER {
                report.record_skipped(layer);
            }
            return Ok(LoadedConfig::new(settings, report));
        }

        for layer in SourceLayer::MERGE_ORDER {
            match self.collect(layer) {
                None => report.record_skipped(layer),
                Some(Ok(values)) => {
                    tracing::debug!(%layer, keys = values.len(), "merging configuration layer");
                    settings.merge_layer(&values, "", self.validator);
                    report.record_applied(layer);
                }
                Some(Err(err)) => {
                    if self.required.contains(&layer) {
                        return Err(err);
                    }
                    tracing::warn!(
                        %layer,
                        error = %err,
                        "configuration layer unavailable; keeping values from earlier layers"
                    );
                    report.record_issue(layer, err);
                }
            }
        }
        Ok(LoadedConfig::new(settings, report))
    }

    /// Collect the flattened values for `layer`, or `None` when it is not
    /// configured.
    fn collect(&self, layer: SourceLayer) -> Option<LoadResult<FlatValues>> {
        match layer {
            SourceLayer::File => self.config_path.as_ref().map(|path| {
                let format = self
                    .file_format
                    .unwrap_or_else(|| ConfigFormat::infer(path.as_str()));
                read_file_layer(path, self.decoder_for(&format))
            }),
            SourceLayer::Remote => self.remote.as_ref().map(|remote| self.fetch_remote(remote)),
            SourceLayer::CommandLine => Some(Ok(parse_args(&self.args))),
            SourceLayer::Defaults => None,
        }
    }

    fn fetch_remote(&self, remote: &RemoteSource) -> LoadResult<FlatValues> {
        let format = self
            .remote_format
            .unwrap_or_else(|| ConfigFormat::infer(remote.address()));
        let bytes = remote.fetch()?;
        let value = self.decoder_for(&format).decode(remote.address(), &bytes)?;
        Ok(FlatValues::from_value(&value))
    }

    fn decoder_for<'a>(&'a self, format: &'a ConfigFormat) -> &'a dyn StructuredDecoder {
        self.decoder.as_deref().unwrap_or(format)
    }
}

/// Builder for [`Loader`].
#[derive(Clone, Debug)]
pub struct LoaderBuilder {
    external: bool,
    config_path: Option<Utf8PathBuf>,
    file_format: Option<ConfigFormat>,
    remote_enabled: bool,
    remote_address: String,
    remote_timeout: Option<Duration>,
    remote_retries: Option<u32>,
    remote_format: Option<ConfigFormat>,
    args: Option<Vec<String>>,
    validator: Validator,
    decoder: Option<Arc<dyn StructuredDecoder>>,
    required: Vec<SourceLayer>,
}

impl Default for LoaderBuilder {
    fn default() -> Self {
        Self {
            external: true,
            config_path: None,
            file_format: None,
            remote_enabled: false,
            remote_address: String::new(),
            remote_timeout: None,
            remote_retries: None,
            remote_format: None,
            args: None,
            validator: is_not_blank,
            decoder: None,
            required: Vec::new(),
        }
    }
}

impl LoaderBuilder {
    /// Enable or disable every layer other than defaults.
    #[must_use]
    pub const fn external(mut self, enabled: bool) -> Self {
        self.external = enabled;
        self
    }

    /// Read the file layer from `path`. A blank path disables the layer.
    #[must_use]
    pub fn config_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        let candidate: Utf8PathBuf = path.into();
        self.config_path = (!candidate.as_str().trim().is_empty()).then_some(candidate);
        self
    }

    /// Decode the file layer as `format` instead of inferring it.
    #[must_use]
    pub const fn file_format(mut self, format: ConfigFormat) -> Self {
        self.file_format = Some(format);
        self
    }

    /// Enable the remote layer and fetch it from `address`.
    #[must_use]
    pub fn remote(mut self, address: impl Into<String>) -> Self {
        self.remote_enabled = true;
        self.remote_address = address.into();
        self
    }

    /// Toggle the remote layer without changing its address.
    #[must_use]
    pub const fn remote_enabled(mut self, enabled: bool) -> Self {
        self.remote_enabled = enabled;
        self
    }

    /// Override the remote request timeout.
    #[must_use]
    pub const fn remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = Some(timeout);
        self
    }

    /// Override the number of retries for the remote fetch.
    #[must_use]
    pub const fn remote_retries(mut self, retries: u32) -> Self {
        self.remote_retries = Some(retries);
        self
    }

    /// Decode the remote payload as `format` instead of inferring it.
    #[must_use]
    pub const fn remote_format(mut self, format: ConfigFormat) -> Self {
        self.remote_format = Some(format);
        self
    }

    /// Use `args` for the command-line layer instead of the process arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the predicate deciding whether a layer value may override.
    #[must_use]
    pub const fn validator(mut self, validator: Validator) -> Self {
        self.validator = validator;
        self
    }

    /// Decode file and remote payloads with `decoder` regardless of format.
    #[must_use]
    pub fn decoder(mut self, decoder: Arc<dyn StructuredDecoder>) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Fail the load instead of degrading when `layer` cannot be applied.
    #[must_use]
    pub fn require_layer(mut self, layer: SourceLayer) -> Self {
        if !self.required.contains(&layer) {
            self.required.push(layer);
        }
        self
    }

    /// Validate the settings and build the loader.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Validation`] when the remote layer is enabled
    /// with a blank address, or a required layer is not configured.
    pub fn build(self) -> LoadResult<Loader> {
        if self.remote_enabled && self.remote_address.trim().is_empty() {
            return Err(LoadError::validation(
                "remote.address",
                "remote configuration address cannot be blank when the remote layer is enabled",
            ));
        }
        if self.required.contains(&SourceLayer::File) && self.config_path.is_none() {
            return Err(LoadError::validation(
                "file.path",
                "the file layer is required but no configuration path was given",
            ));
        }
        if self.required.contains(&SourceLayer::Remote) && !self.remote_enabled {
            return Err(LoadError::validation(
                "remote.address",
                "the remote layer is required but it is not enabled",
            ));
        }

        let remote = self.remote_enabled.then(|| {
            let mut source = RemoteSource::new(self.remote_address.trim());
            if let Some(timeout) = self.remote_timeout {
                source = source.with_timeout(timeout);
            }
            if let Some(retries) = self.remote_retries {
                source = source.with_max_retries(retries);
            }
            source
        });
        let args = self
            .args
            .unwrap_or_else(|| std::env::args().skip(1).collect());

        Ok(Loader {
            external: self.external,
            config_path: self.config_path,
            file_format: self.file_format,
            remote,
            remote_format: self.remote_format,
            args,
            validator: self.validator,
            decoder: self.decoder,
            required: self.required,
        })
    }
}
