//! Building property specs into a frozen, shareable schema.
//!
//! A [`SchemaBuilder`] collects named [`PropertySpec`]s. [`SchemaBuilder::build`]
//! validates the whole table once (empty paths, blank or duplicate names),
//! resolves every accessor into its bound form and returns an
//! `Arc<Schema<C>>` shared by all wrappers of that type. Nothing about a
//! property is re-checked per access.
//!
//! ```rust
//! use propwrap::path;
//! use propwrap::property::PropertySpec;
//! use propwrap::schema::SchemaBuilder;
//! use propwrap::value::Value;
//!
//! let schema = SchemaBuilder::<Value>::new("Resource")
//!     .property("owner", PropertySpec::new(path!["labels", "owner"]))
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.names().collect::<Vec<_>>(), vec!["owner"]);
//! ```

use crate::container::Subscript;
use crate::errors::{PropertyError, PropertyResult};
use crate::path::Path;
use crate::property::{Access, DeleteFn, GetFn, Operation, PropertySpec, SetFn};
use crate::resolver;
use crate::wrapper::Wrapped;
use log::debug;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// An accessor after build: the default path walk or a custom function.
/// A disabled accessor is represented by its absence.
enum Bound<F> {
    Path,
    Custom(F),
}

impl<F: Clone> Clone for Bound<F> {
    fn clone(&self) -> Self {
        match self {
            Bound::Path => Bound::Path,
            Bound::Custom(f) => Bound::Custom(f.clone()),
        }
    }
}

fn bind<F>(access: Access<F>) -> Option<Bound<F>> {
    match access {
        Access::Default => Some(Bound::Path),
        Access::Disabled => None,
        Access::Custom(f) => Some(Bound::Custom(f)),
    }
}

// ============================================================================
// BOUND PROPERTY
// ============================================================================

/// One property of a built schema.
pub struct BoundProperty<C> {
    name: String,
    path: Path,
    doc: Option<String>,
    get: Option<Bound<GetFn<C>>>,
    set: Option<Bound<SetFn<C>>>,
    delete: Option<Bound<DeleteFn<C>>>,
}

impl<C> Clone for BoundProperty<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            path: self.path.clone(),
            doc: self.doc.clone(),
            get: self.get.clone(),
            set: self.set.clone(),
            delete: self.delete.clone(),
        }
    }
}

impl<C> BoundProperty<C> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Whether the property has an accessor for `operation`.
    pub fn allows(&self, operation: Operation) -> bool {
        match operation {
            Operation::Get => self.get.is_some(),
            Operation::Set => self.set.is_some(),
            Operation::Delete => self.delete.is_some(),
        }
    }

    /// Whether the accessor for `operation` is a custom function.
    pub fn is_custom(&self, operation: Operation) -> bool {
        match operation {
            Operation::Get => matches!(self.get, Some(Bound::Custom(_))),
            Operation::Set => matches!(self.set, Some(Bound::Custom(_))),
            Operation::Delete => matches!(self.delete, Some(Bound::Custom(_))),
        }
    }

    fn disabled(&self, operation: Operation) -> PropertyError {
        PropertyError::AccessDisabled {
            property: self.name.clone(),
            operation,
        }
    }

    fn broken(&self, operation: Operation, source: crate::errors::PathError) -> PropertyError {
        PropertyError::PathNotFound {
            property: self.name.clone(),
            operation,
            source,
        }
    }
}

impl<C: Subscript + Clone> BoundProperty<C> {
    /// Reads the property from `contents`.
    ///
    /// Default getters borrow from `contents`; custom getters return an owned value.
    pub fn get<'a>(&self, contents: &'a C) -> PropertyResult<Cow<'a, C>> {
        match &self.get {
            None => Err(self.disabled(Operation::Get)),
            Some(Bound::Path) => resolver::resolve_get(contents, &self.path)
                .map(Cow::Borrowed)
                .map_err(|e| self.broken(Operation::Get, e)),
            Some(Bound::Custom(f)) => f(contents, &self.path).map(Cow::Owned),
        }
    }

    /// Mutable access to the value behind a default getter.
    ///
    /// Requires both get and set to be enabled with default behavior.
    pub fn get_mut<'a>(&self, contents: &'a mut C) -> PropertyResult<&'a mut C> {
        match (&self.get, &self.set) {
            (Some(Bound::Path), Some(Bound::Path)) => {
                resolver::resolve_get_mut(contents, &self.path)
                    .map_err(|e| self.broken(Operation::Get, e))
            }
            (None, _) | (Some(Bound::Custom(_)), _) => Err(self.disabled(Operation::Get)),
            (_, None) | (_, Some(Bound::Custom(_))) => Err(self.disabled(Operation::Set)),
        }
    }

    /// Writes `value` into `contents` at the property's path.
    pub fn set(&self, contents: &mut C, value: C) -> PropertyResult<()> {
        match &self.set {
            None => Err(self.disabled(Operation::Set)),
            Some(Bound::Path) => resolver::resolve_set(contents, &self.path, value)
                .map_err(|e| self.broken(Operation::Set, e)),
            Some(Bound::Custom(f)) => f(contents, &self.path, value),
        }
    }

    /// Removes the property's value from `contents`.
    ///
    /// Returns the removed value for default deleters and `None` for custom ones.
    pub fn delete(&self, contents: &mut C) -> PropertyResult<Option<C>> {
        match &self.delete {
            None => Err(self.disabled(Operation::Delete)),
            Some(Bound::Path) => resolver::resolve_delete(contents, &self.path)
                .map(Some)
                .map_err(|e| self.broken(Operation::Delete, e)),
            Some(Bound::Custom(f)) => f(contents, &self.path).map(|()| None),
        }
    }

    /// Whether the property's path currently resolves inside `contents`.
    pub fn is_present(&self, contents: &C) -> bool {
        resolver::path_valid(contents, &self.path)
    }
}

impl<C> fmt::Debug for BoundProperty<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops: Vec<&str> = Operation::ALL
            .iter()
            .filter(|op| self.allows(**op))
            .map(|op| op.as_str())
            .collect();
        f.debug_struct("BoundProperty")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("operations", &ops)
            .field("doc", &self.doc)
            .finish()
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// The frozen property table of one wrapper type.
pub struct Schema<C> {
    type_name: String,
    properties: Vec<BoundProperty<C>>,
    index: HashMap<String, usize>,
}

impl<C> Schema<C> {
    /// The name the schema was built under, used in logs and listings.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Properties in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, BoundProperty<C>> {
        self.properties.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|p| p.name())
    }

    /// Looks up a property, failing with `UnknownProperty` for undeclared names.
    pub fn property(&self, name: &str) -> PropertyResult<&BoundProperty<C>> {
        self.index
            .get(name)
            .map(|i| &self.properties[*i])
            .ok_or_else(|| PropertyError::UnknownProperty {
                property: name.to_string(),
            })
    }

    /// Wraps `contents` with this schema.
    pub fn wrap(self: &Arc<Self>, contents: C) -> Wrapped<C> {
        Wrapped::new(Arc::clone(self), contents)
    }
}

impl<C> fmt::Debug for Schema<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Collects property specs for one wrapper type.
pub struct SchemaBuilder<C> {
    type_name: String,
    inherited: Vec<BoundProperty<C>>,
    specs: Vec<(String, PropertySpec<C>)>,
}

impl<C> SchemaBuilder<C> {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            inherited: Vec::new(),
            specs: Vec::new(),
        }
    }

    /// Starts from every property of `base`.
    ///
    /// Properties declared on this builder replace inherited ones of the same name.
    pub fn inherit(mut self, base: &Schema<C>) -> Self {
        self.inherited.extend(base.iter().cloned());
        self
    }

    pub fn property(mut self, name: impl Into<String>, spec: PropertySpec<C>) -> Self {
        self.specs.push((name.into(), spec));
        self
    }

    /// Adds every `(name, spec)` pair of `table`.
    pub fn properties<N, I>(mut self, table: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, PropertySpec<C>)>,
    {
        self.specs
            .extend(table.into_iter().map(|(name, spec)| (name.into(), spec)));
        self
    }

    /// Validates the table and freezes it into a schema.
    pub fn build(self) -> PropertyResult<Arc<Schema<C>>> {
        let mut properties: Vec<BoundProperty<C>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut declared: HashSet<String> = HashSet::new();

        for inherited in self.inherited {
            index.insert(inherited.name.clone(), properties.len());
            properties.push(inherited);
        }

        for (name, spec) in self.specs {
            if name.trim().is_empty() {
                return Err(PropertyError::configuration(&name, "property name is blank"));
            }
            if !declared.insert(name.clone()) {
                return Err(PropertyError::configuration(
                    &name,
                    "property is declared more than once",
                ));
            }
            let (path, get, set, delete, doc) = spec.into_parts();
            if path.is_empty() {
                return Err(PropertyError::configuration(&name, "path is empty"));
            }

            let bound = BoundProperty {
                name: name.clone(),
                path,
                doc,
                get: bind(get),
                set: bind(set),
                delete: bind(delete),
            };
            if Operation::ALL.iter().all(|op| !bound.allows(*op)) {
                debug!(
                    "{}: property '{}' has every accessor disabled",
                    self.type_name, name
                );
            }

            match index.get(&name).copied() {
                Some(i) => properties[i] = bound,
                None => {
                    index.insert(name, properties.len());
                    properties.push(bound);
                }
            }
        }

        debug!(
            "built schema {} with {} properties",
            self.type_name,
            properties.len()
        );
        Ok(Arc::new(Schema {
            type_name: self.type_name,
            properties,
            index,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use crate::property::PropertySpec;
    use crate::value::Value;

    fn data() -> Value {
        serde_json::from_str(r#"{"labels": {"owner": "alice"}}"#).unwrap()
    }

    #[test]
    fn rejects_empty_paths_at_build() {
        let err = SchemaBuilder::<Value>::new("T")
            .property("root", PropertySpec::new(path![]))
            .build()
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("path is empty"));
    }

    #[test]
    fn rejects_duplicate_and_blank_names() {
        let dup = SchemaBuilder::<Value>::new("T")
            .property("a", PropertySpec::new(path!["x"]))
            .property("a", PropertySpec::new(path!["y"]))
            .build()
            .unwrap_err();
        assert!(dup.is_configuration());

        let blank = SchemaBuilder::<Value>::new("T")
            .property(" ", PropertySpec::new(path!["x"]))
            .build()
            .unwrap_err();
        assert!(blank.is_configuration());
    }

    #[test]
    fn allows_fully_disabled_placeholders() {
        let schema = SchemaBuilder::<Value>::new("T")
            .property(
                "placeholder",
                PropertySpec::new(path!["x"]).no_get().no_set().no_delete(),
            )
            .build()
            .unwrap();
        let prop = schema.property("placeholder").unwrap();
        assert!(Operation::ALL.iter().all(|op| !prop.allows(*op)));
    }

    #[test]
    fn disabled_get_fails_even_when_path_exists() {
        let schema = SchemaBuilder::<Value>::new("T")
            .property("owner", PropertySpec::new(path!["labels", "owner"]).no_get())
            .build()
            .unwrap();
        let contents = data();
        let err = schema.property("owner").unwrap().get(&contents).unwrap_err();
        assert!(err.is_access_disabled());
    }

    #[test]
    fn unknown_names_fail_lookup() {
        let schema = SchemaBuilder::<Value>::new("T").build().unwrap();
        assert_eq!(
            schema.property("nope").unwrap_err(),
            PropertyError::UnknownProperty {
                property: "nope".into()
            }
        );
    }

    #[test]
    fn inherited_properties_can_be_overridden() {
        let base = SchemaBuilder::<Value>::new("Base")
            .property("owner", PropertySpec::new(path!["labels", "owner"]))
            .property("name", PropertySpec::new(path!["name"]))
            .build()
            .unwrap();
        let derived = SchemaBuilder::<Value>::new("Derived")
            .inherit(&base)
            .property("owner", PropertySpec::new(path!["spec", "owner"]).read_only())
            .property("extra", PropertySpec::new(path!["extra"]))
            .build()
            .unwrap();

        assert_eq!(
            derived.names().collect::<Vec<_>>(),
            vec!["owner", "name", "extra"]
        );
        let owner = derived.property("owner").unwrap();
        assert_eq!(owner.path(), &path!["spec", "owner"]);
        assert!(!owner.allows(Operation::Set));
        assert_eq!(base.property("owner").unwrap().path(), &path!["labels", "owner"]);
    }

    #[test]
    fn custom_getter_returns_owned_value() {
        let schema = SchemaBuilder::<Value>::new("T")
            .property(
                "shout",
                PropertySpec::new(path!["labels", "owner"]).custom_get(|c: &Value, p| {
                    let v = resolver::resolve_get(c, p)
                        .map_err(|e| PropertyError::custom("shout", e.to_string()))?;
                    Ok(Value::from(v.to_string().to_uppercase()))
                }),
            )
            .build()
            .unwrap();
        let contents = data();
        let value = schema.property("shout").unwrap().get(&contents).unwrap();
        assert!(matches!(value, Cow::Owned(_)));
        assert_eq!(value.into_owned(), Value::from("ALICE"));
    }
}
