//! Error types for pool operations
use thiserror::Error;

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pool operations.
///
/// Only [`Error::FactoryExhausted`] and [`Error::Exhausted`] can surface
/// from the acquire/spawn fast paths of a correctly configured pool; all
/// other internal shortfalls (a failed prewarm attempt, one fewer expansion
/// instance) degrade gracefully with a warning instead of propagating.
#[derive(Error, Debug)]
pub enum Error {
    /// An operation was called before the pool was initialized
    #[error("Pool is not initialized")]
    NotInitialized,

    /// No template is registered for the requested category
    #[error("No template registered for category '{category}'")]
    UnknownCategory {
        /// Debug rendering of the category value
        category: String,
    },

    /// The factory failed on the final single-instance fallback path
    #[error("Factory could not produce an instance for category '{category}'")]
    FactoryExhausted {
        /// Debug rendering of the category value
        category: String,
        /// The underlying factory error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The per-category creation cap was reached and no instance could be served
    #[error("Pool exhausted for category '{category}': {created}/{max} instances created")]
    Exhausted {
        /// Debug rendering of the category value
        category: String,
        /// Instances created so far for this category
        created: u64,
        /// The configured creation cap
        max: usize,
    },

    /// A factory implementation failed to produce an instance
    #[error("Factory error: {message}")]
    Factory {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Pool configuration is invalid
    #[error("Configuration error: {message}")]
    Configuration {
        /// The error message
        message: String,
    },
}

impl Error {
    /// Create a factory error from a message.
    ///
    /// Intended for [`Factory`](crate::Factory) implementations that have
    /// no richer error to wrap.
    pub fn factory<S: Into<String>>(message: S) -> Self {
        Self::Factory {
            message: message.into(),
            source: None,
        }
    }

    /// Create a factory error wrapping an underlying error.
    pub fn factory_with<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Factory {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn unknown_category<C: std::fmt::Debug>(category: C) -> Self {
        Self::UnknownCategory {
            category: format!("{category:?}"),
        }
    }

    pub(crate) fn exhausted<C: std::fmt::Debug>(category: C, created: u64, max: usize) -> Self {
        Self::Exhausted {
            category: format!("{category:?}"),
            created,
            max,
        }
    }

    pub(crate) fn factory_exhausted<C: std::fmt::Debug>(category: C, source: Option<Error>) -> Self {
        Self::FactoryExhausted {
            category: format!("{category:?}"),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Factory and exhaustion failures are transient: releasing or clearing
    /// instances (or a recovered factory) can make a later call succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::FactoryExhausted { .. } | Self::Exhausted { .. } | Self::Factory { .. }
        )
    }

    /// Get the category associated with this error (if any), in `Debug` form.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::UnknownCategory { category }
            | Self::FactoryExhausted { category, .. }
            | Self::Exhausted { category, .. } => Some(category),
            _ => None,
        }
    }
}
