//! Declarative property specifications.
//!
//! A [`PropertySpec`] binds a lookup path to three accessors. Each accessor
//! is an [`Access`]: the default path-based behavior, disabled, or a custom
//! function that replaces the default entirely.
//!
//! ```rust
//! use propwrap::path;
//! use propwrap::property::PropertySpec;
//! use propwrap::value::Value;
//!
//! let owner: PropertySpec<Value> = PropertySpec::new(path!["labels", "owner"])
//!     .no_delete()
//!     .doc("team that owns the resource");
//! assert!(owner.get_access().is_enabled());
//! assert!(!owner.delete_access().is_enabled());
//! ```

use crate::errors::PropertyError;
use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The three things a property can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Get,
    Set,
    Delete,
}

impl Operation {
    pub const ALL: [Operation; 3] = [Operation::Get, Operation::Set, Operation::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Get => "get",
            Operation::Set => "set",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// CUSTOM ACCESSOR TYPES
// ============================================================================

/// Custom getter: receives the wrapped contents and the property's path.
pub type GetFn<C> = Arc<dyn Fn(&C, &Path) -> Result<C, PropertyError> + Send + Sync>;

/// Custom setter: receives the wrapped contents, the path and the new value.
pub type SetFn<C> = Arc<dyn Fn(&mut C, &Path, C) -> Result<(), PropertyError> + Send + Sync>;

/// Custom deleter: receives the wrapped contents and the path.
pub type DeleteFn<C> = Arc<dyn Fn(&mut C, &Path) -> Result<(), PropertyError> + Send + Sync>;

/// How one operation of a property behaves.
pub enum Access<F> {
    /// Resolve the property's path against the wrapped contents.
    Default,
    /// The operation does not exist for this property.
    Disabled,
    /// Call the given function instead of resolving the path.
    Custom(F),
}

impl<F> Access<F> {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Access::Disabled)
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Access::Custom(_))
    }
}

impl<F> Default for Access<F> {
    fn default() -> Self {
        Access::Default
    }
}

impl<F: Clone> Clone for Access<F> {
    fn clone(&self) -> Self {
        match self {
            Access::Default => Access::Default,
            Access::Disabled => Access::Disabled,
            Access::Custom(f) => Access::Custom(f.clone()),
        }
    }
}

impl<F> fmt::Debug for Access<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Default => write!(f, "Default"),
            Access::Disabled => write!(f, "Disabled"),
            Access::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// `true` keeps the default accessor and `false` disables it.
impl<F> From<bool> for Access<F> {
    fn from(enabled: bool) -> Self {
        if enabled {
            Access::Default
        } else {
            Access::Disabled
        }
    }
}

// ============================================================================
// PROPERTY SPEC
// ============================================================================

/// Describes one named property before it is bound into a schema.
pub struct PropertySpec<C> {
    path: Path,
    get: Access<GetFn<C>>,
    set: Access<SetFn<C>>,
    delete: Access<DeleteFn<C>>,
    doc: Option<String>,
}

/// Shorthand for [`PropertySpec::new`].
pub fn prop<C>(path: impl Into<Path>) -> PropertySpec<C> {
    PropertySpec::new(path)
}

impl<C> PropertySpec<C> {
    /// A property at `path` with all three default accessors enabled.
    pub fn new(path: impl Into<Path>) -> Self {
        Self {
            path: path.into(),
            get: Access::Default,
            set: Access::Default,
            delete: Access::Default,
            doc: None,
        }
    }

    pub fn get(mut self, access: impl Into<Access<GetFn<C>>>) -> Self {
        self.get = access.into();
        self
    }

    pub fn set(mut self, access: impl Into<Access<SetFn<C>>>) -> Self {
        self.set = access.into();
        self
    }

    pub fn delete(mut self, access: impl Into<Access<DeleteFn<C>>>) -> Self {
        self.delete = access.into();
        self
    }

    pub fn no_get(self) -> Self {
        self.get(false)
    }

    pub fn no_set(self) -> Self {
        self.set(false)
    }

    pub fn no_delete(self) -> Self {
        self.delete(false)
    }

    /// Disables both set and delete.
    pub fn read_only(self) -> Self {
        self.no_set().no_delete()
    }

    pub fn custom_get<F>(self, f: F) -> Self
    where
        F: Fn(&C, &Path) -> Result<C, PropertyError> + Send + Sync + 'static,
    {
        self.get(Access::Custom(Arc::new(f) as GetFn<C>))
    }

    pub fn custom_set<F>(self, f: F) -> Self
    where
        F: Fn(&mut C, &Path, C) -> Result<(), PropertyError> + Send + Sync + 'static,
    {
        self.set(Access::Custom(Arc::new(f) as SetFn<C>))
    }

    pub fn custom_delete<F>(self, f: F) -> Self
    where
        F: Fn(&mut C, &Path) -> Result<(), PropertyError> + Send + Sync + 'static,
    {
        self.delete(Access::Custom(Arc::new(f) as DeleteFn<C>))
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn doc_text(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn get_access(&self) -> &Access<GetFn<C>> {
        &self.get
    }

    pub fn set_access(&self) -> &Access<SetFn<C>> {
        &self.set
    }

    pub fn delete_access(&self) -> &Access<DeleteFn<C>> {
        &self.delete
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Path,
        Access<GetFn<C>>,
        Access<SetFn<C>>,
        Access<DeleteFn<C>>,
        Option<String>,
    ) {
        (self.path, self.get, self.set, self.delete, self.doc)
    }
}

impl<C> fmt::Debug for PropertySpec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySpec")
            .field("path", &self.path)
            .field("get", &self.get)
            .field("set", &self.set)
            .field("delete", &self.delete)
            .field("doc", &self.doc)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use crate::value::Value;

    #[test]
    fn defaults_enable_every_operation() {
        let spec: PropertySpec<Value> = prop(path!["a"]);
        assert!(spec.get_access().is_enabled());
        assert!(spec.set_access().is_enabled());
        assert!(spec.delete_access().is_enabled());
        assert_eq!(spec.doc_text(), None);
    }

    #[test]
    fn booleans_toggle_default_accessors() {
        let spec: PropertySpec<Value> = PropertySpec::new(path!["a"]).get(false).set(true);
        assert!(!spec.get_access().is_enabled());
        assert!(matches!(spec.set_access(), Access::Default));
    }

    #[test]
    fn custom_accessors_replace_defaults() {
        let spec: PropertySpec<Value> =
            PropertySpec::new(path!["a"]).custom_get(|_, _| Ok(Value::from("computed")));
        assert!(spec.get_access().is_custom());
        assert_eq!(format!("{:?}", spec.get_access()), "Custom(..)");
    }

    #[test]
    fn read_only_keeps_getter() {
        let spec: PropertySpec<Value> = PropertySpec::new(path!["a"]).read_only();
        assert!(spec.get_access().is_enabled());
        assert!(!spec.set_access().is_enabled());
        assert!(!spec.delete_access().is_enabled());
    }
}
