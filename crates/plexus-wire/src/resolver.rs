//! Class resolver: the pluggable type-to-tag policy.
//!
//! The codec never consults the registry directly; every lookup goes
//! through a [`ClassResolver`] so embedding applications can swap the
//! resolution strategy (reject unknown types, add diagnostics) without
//! touching the codec.

use crate::error::Error;
use crate::registry::{Registration, TypeKey, TypeRegistry};
use std::sync::Arc;

/// Maps kinds to registrations during encode and wire tags back to
/// registrations during decode.
///
/// Implementations must be free of mutable shared state; one resolver
/// instance may serve concurrent encode/decode calls.
pub trait ClassResolver: Send + Sync {
    /// Registration for a kind. Called for every value encountered during
    /// encode, nested values included. An error here aborts the encode
    /// atomically and is surfaced to the caller unmodified.
    fn resolve(&self, key: &TypeKey) -> Result<Registration, Error>;

    /// Registration for a tag read from the stream.
    fn resolve_tag(&self, tag: i16) -> Result<Registration, Error>;
}

impl std::fmt::Debug for dyn ClassResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ClassResolver")
    }
}

/// The default resolver: a direct lookup into the configured registry.
pub struct DefaultClassResolver {
    registry: Arc<TypeRegistry>,
}

impl DefaultClassResolver {
    /// Create a resolver over a frozen registry.
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }
}

impl ClassResolver for DefaultClassResolver {
    fn resolve(&self, key: &TypeKey) -> Result<Registration, Error> {
        self.registry
            .registration(key)
            .cloned()
            .ok_or_else(|| Error::Unresolvable(key.to_string()))
    }

    fn resolve_tag(&self, tag: i16) -> Result<Registration, Error> {
        self.registry
            .registration_by_tag(tag)
            .cloned()
            .ok_or_else(|| Error::MalformedStream(format!("unknown wire tag {tag}")))
    }
}

/// Constructor for a resolver over the configured registry.
pub type ResolverFn = fn(Arc<TypeRegistry>) -> Arc<dyn ClassResolver>;

/// How a named resolver is built.
///
/// Same supply conventions as extension providers: plain constructor, an
/// `instance` singleton accessor, or a `get_instance` singleton accessor,
/// tried in that order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolverFactory {
    /// Plain construction.
    pub constructor: Option<ResolverFn>,
    /// Singleton accessor named `instance`.
    pub instance: Option<ResolverFn>,
    /// Singleton accessor named `get_instance`.
    pub get_instance: Option<ResolverFn>,
}

impl ResolverFactory {
    /// Factory backed by a plain constructor.
    pub fn from_constructor(f: ResolverFn) -> Self {
        Self {
            constructor: Some(f),
            ..Self::default()
        }
    }

    /// Factory backed by an `instance` singleton accessor.
    pub fn from_instance(f: ResolverFn) -> Self {
        Self {
            instance: Some(f),
            ..Self::default()
        }
    }

    /// Factory backed by a `get_instance` singleton accessor.
    pub fn from_get_instance(f: ResolverFn) -> Self {
        Self {
            get_instance: Some(f),
            ..Self::default()
        }
    }

    /// Build the resolver, trying constructor, `instance`, then
    /// `get_instance`.
    pub fn instantiate(
        &self,
        name: &str,
        registry: Arc<TypeRegistry>,
    ) -> Result<Arc<dyn ClassResolver>, Error> {
        self.constructor
            .or(self.instance)
            .or(self.get_instance)
            .map(|f| f(registry))
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "class resolver supplier `{name}` supplies no constructor, \
                     `instance`, or `get_instance` accessor"
                ))
            })
    }
}
