//! Containers with named, path-bound properties.
//!
//! A [`Wrapped`] value owns its contents directly and shares its schema with
//! every other wrapper of the same type. It dereferences to the contents, so
//! subscripting, iterating and serializing behave exactly as they do on the
//! bare container; the properties only add named access on top.
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
//! let data: Value = serde_json::from_str(r#"{"labels": {"owner": "alice"}}"#).unwrap();
//! let mut resource = schema.wrap(data);
//!
//! assert_eq!(resource.get("owner").unwrap().as_str(), Some("alice"));
//! resource.set("owner", "bob").unwrap();
//! assert_eq!(serde_json::to_string(&resource).unwrap(), r#"{"labels":{"owner":"bob"}}"#);
//! resource.delete("owner").unwrap();
//! assert_eq!(serde_json::to_string(&*resource).unwrap(), r#"{"labels":{}}"#);
//! ```

use crate::container::Subscript;
use crate::errors::PropertyResult;
use crate::path::Path;
use crate::property::Operation;
use crate::schema::{BoundProperty, Schema};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// A container paired with the schema of its wrapper type.
pub struct Wrapped<C> {
    schema: Arc<Schema<C>>,
    contents: C,
}

impl<C> Wrapped<C> {
    pub fn new(schema: Arc<Schema<C>>, contents: C) -> Self {
        Self { schema, contents }
    }

    pub fn schema(&self) -> &Arc<Schema<C>> {
        &self.schema
    }

    pub fn contents(&self) -> &C {
        &self.contents
    }

    pub fn contents_mut(&mut self) -> &mut C {
        &mut self.contents
    }

    /// Drops the properties and returns the bare container.
    pub fn into_inner(self) -> C {
        self.contents
    }

    /// Replaces the contents, keeping the schema.
    pub fn replace(&mut self, contents: C) -> C {
        std::mem::replace(&mut self.contents, contents)
    }

    pub fn property(&self, name: &str) -> PropertyResult<&BoundProperty<C>> {
        self.schema.property(name)
    }

    /// Every property of the wrapper type, in declaration order.
    pub fn properties(&self) -> std::slice::Iter<'_, BoundProperty<C>> {
        self.schema.iter()
    }

    pub fn doc(&self, name: &str) -> PropertyResult<Option<&str>> {
        Ok(self.property(name)?.doc())
    }

    pub fn path_of(&self, name: &str) -> PropertyResult<&Path> {
        Ok(self.property(name)?.path())
    }

    pub fn allows(&self, name: &str, operation: Operation) -> PropertyResult<bool> {
        Ok(self.property(name)?.allows(operation))
    }
}

impl<C: Subscript + Clone> Wrapped<C> {
    /// Reads a property.
    pub fn get(&self, name: &str) -> PropertyResult<Cow<'_, C>> {
        self.schema.property(name)?.get(&self.contents)
    }

    /// Mutable access to a property's value, for properties with default get and set.
    pub fn get_mut(&mut self, name: &str) -> PropertyResult<&mut C> {
        self.schema.property(name)?.get_mut(&mut self.contents)
    }

    /// Writes a property.
    pub fn set(&mut self, name: &str, value: impl Into<C>) -> PropertyResult<()> {
        self.schema
            .property(name)?
            .set(&mut self.contents, value.into())
    }

    /// Deletes a property, returning the removed value when the default deleter ran.
    pub fn delete(&mut self, name: &str) -> PropertyResult<Option<C>> {
        self.schema.property(name)?.delete(&mut self.contents)
    }

    /// Whether the property's path resolves in the current contents.
    pub fn is_present(&self, name: &str) -> PropertyResult<bool> {
        Ok(self.schema.property(name)?.is_present(&self.contents))
    }
}

impl<C> Deref for Wrapped<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.contents
    }
}

impl<C> DerefMut for Wrapped<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.contents
    }
}

impl<C> AsRef<C> for Wrapped<C> {
    fn as_ref(&self) -> &C {
        &self.contents
    }
}

impl<C: Clone> Clone for Wrapped<C> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            contents: self.contents.clone(),
        }
    }
}

impl<C: PartialEq> PartialEq<C> for Wrapped<C> {
    fn eq(&self, other: &C) -> bool {
        &self.contents == other
    }
}

impl<C: fmt::Debug> fmt::Debug for Wrapped<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.schema.type_name())
            .field(&self.contents)
            .finish()
    }
}

// A wrapper serializes as its bare contents.
impl<C: Serialize> Serialize for Wrapped<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.contents.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use crate::property::PropertySpec;
    use crate::schema::SchemaBuilder;
    use serde_json::json;

    fn schema() -> Arc<Schema<serde_json::Value>> {
        SchemaBuilder::new("Pod")
            .property("owner", PropertySpec::new(path!["labels", "owner"]))
            .property("first", PropertySpec::new(path!["items", 0]).read_only())
            .build()
            .unwrap()
    }

    #[test]
    fn derefs_to_contents() {
        let pod = schema().wrap(json!({"labels": {"owner": "alice"}, "items": [1, 2]}));
        assert_eq!(pod["labels"]["owner"], "alice");
        assert_eq!(pod["items"].as_array().map(|a| a.len()), Some(2));
        assert!(pod.get("owner").unwrap().is_string());
    }

    #[test]
    fn direct_mutation_is_seen_by_properties() {
        let mut pod = schema().wrap(json!({"labels": {"owner": "alice"}, "items": [1]}));
        pod["labels"]["owner"] = json!("carol");
        assert_eq!(*pod.get("owner").unwrap(), json!("carol"));
    }

    #[test]
    fn instances_share_schema_but_not_contents() {
        let schema = schema();
        let mut a = schema.wrap(json!({"labels": {"owner": "a"}}));
        let b = schema.wrap(json!({"labels": {"owner": "b"}}));
        a.set("owner", json!("z")).unwrap();
        assert_eq!(*b.get("owner").unwrap(), json!("b"));
        assert!(Arc::ptr_eq(a.schema(), b.schema()));
    }

    #[test]
    fn get_mut_edits_in_place() {
        let mut pod = schema().wrap(json!({"labels": {"owner": "alice"}}));
        *pod.get_mut("owner").unwrap() = json!("dave");
        assert_eq!(pod, json!({"labels": {"owner": "dave"}}));
        assert!(pod.get_mut("first").unwrap_err().is_access_disabled());
    }

    #[test]
    fn serializes_as_bare_contents() {
        let pod = schema().wrap(json!({"items": [1]}));
        assert_eq!(serde_json::to_value(&pod).unwrap(), json!({"items": [1]}));
        assert_eq!(pod.into_inner(), json!({"items": [1]}));
    }

    #[test]
    fn metadata_lookups() {
        let pod = schema().wrap(json!({}));
        assert_eq!(pod.path_of("first").unwrap(), &path!["items", 0]);
        assert_eq!(pod.allows("first", Operation::Set).unwrap(), false);
        assert_eq!(pod.is_present("owner").unwrap(), false);
        assert!(pod.doc("missing").is_err());
        let names: Vec<&str> = pod.properties().map(|p| p.name()).collect();
        assert_eq!(names, vec!["owner", "first"]);
    }
}
