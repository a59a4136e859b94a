//! Process-wide configuration and per-call options.
//!
//! The runtime mode is fixed once per process, either by [`setup`] or, if
//! nobody calls it, from the `IMUT_ENV` environment variable. Option
//! defaults can be changed at any time with [`set_default_options`]; fields
//! left as `None` keep their current value.

use parking_lot::RwLock;
use std::sync::OnceLock;
use thiserror::Error;

/// Environment variable consulted when [`setup`] was never called.
pub const MODE_ENV_VAR: &str = "IMUT_ENV";

/// Whether results are frozen by default.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum RuntimeMode {
    #[default]
    Development,
    Production,
}

impl RuntimeMode {
    /// Mode named by an `IMUT_ENV` value: `production` selects
    /// [`RuntimeMode::Production`], anything else development.
    pub fn from_env_value(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            RuntimeMode::Production
        } else {
            RuntimeMode::Development
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("runtime mode already configured as {current:?}")]
    AlreadyConfigured { current: RuntimeMode },
}

/// Overrides for a single update, or for the process defaults.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateOptions {
    /// Rebuild copied records through their class constructor so they keep
    /// their concrete type. Defaults to `true`.
    pub preserve_concrete_type: Option<bool>,
    /// Deep-freeze the returned root. Defaults to `true` outside
    /// [`RuntimeMode::Production`].
    pub freeze_result: Option<bool>,
}

impl UpdateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn preserve_concrete_type(mut self, preserve: bool) -> Self {
        self.preserve_concrete_type = Some(preserve);
        self
    }

    #[must_use]
    pub fn freeze_result(mut self, freeze: bool) -> Self {
        self.freeze_result = Some(freeze);
        self
    }

    /// `other`'s set fields over `self`.
    #[must_use]
    pub fn merge(self, other: &UpdateOptions) -> Self {
        UpdateOptions {
            preserve_concrete_type: other.preserve_concrete_type.or(self.preserve_concrete_type),
            freeze_result: other.freeze_result.or(self.freeze_result),
        }
    }

    /// Fill the remaining gaps from the mode defaults.
    pub(crate) fn resolve(&self, mode: RuntimeMode) -> Resolved {
        Resolved {
            preserve_concrete_type: self.preserve_concrete_type.unwrap_or(true),
            freeze_result: self
                .freeze_result
                .unwrap_or(mode != RuntimeMode::Production),
        }
    }
}

/// Options with every field decided.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Resolved {
    pub preserve_concrete_type: bool,
    pub freeze_result: bool,
}

static MODE: OnceLock<RuntimeMode> = OnceLock::new();
static DEFAULTS: RwLock<UpdateOptions> = RwLock::new(UpdateOptions {
    preserve_concrete_type: None,
    freeze_result: None,
});

/// Fix the runtime mode for the rest of the process.
///
/// Fails if the mode was already set, including implicitly by an update
/// that read it from `IMUT_ENV`.
pub fn setup(mode: RuntimeMode) -> Result<(), ConfigError> {
    MODE.set(mode).map_err(|_| ConfigError::AlreadyConfigured {
        current: runtime_mode(),
    })?;
    tracing::debug!(?mode, "runtime mode configured");
    Ok(())
}

/// The process runtime mode.
pub fn runtime_mode() -> RuntimeMode {
    *MODE.get_or_init(|| {
        let mode = std::env::var(MODE_ENV_VAR)
            .map(|value| RuntimeMode::from_env_value(&value))
            .unwrap_or_default();
        tracing::debug!(?mode, "runtime mode read from {MODE_ENV_VAR}");
        mode
    })
}

/// Merge `options` into the process-wide defaults.
pub fn set_default_options(options: UpdateOptions) {
    let mut defaults = DEFAULTS.write();
    *defaults = defaults.merge(&options);
}

/// Current process-wide defaults, unset fields included.
pub fn default_options() -> UpdateOptions {
    *DEFAULTS.read()
}

/// Options for one call: process defaults, then `overrides`, then the mode
/// defaults for whatever is still unset.
pub(crate) fn effective(overrides: Option<&UpdateOptions>) -> Resolved {
    let mut options = default_options();
    if let Some(overrides) = overrides {
        options = options.merge(overrides);
    }
    options.resolve(runtime_mode())
}
