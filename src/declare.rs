//! Declaring named wrapper types.
//!
//! [`property_wrapper!`](crate::property_wrapper!) turns a property table into a newtype over
//! [`Wrapped<Value>`](crate::wrapper::Wrapped) with a getter, a `set_` method
//! and a `delete_` method per property. The schema is built once, on first use, and shared by every
//! instance. An invalid table surfaces as a configuration error from
//! `schema()` and `new()`, before any instance exists.
//!
//! ```rust
//! use propwrap::property_wrapper;
//! use propwrap::value::Value;
//!
//! property_wrapper! {
//!     /// A deployment manifest.
//!     pub struct Manifest {
//!         /// Team that owns the deployment.
//!         owner: ["metadata", "labels", "owner"],
//!         replicas: ["spec", "replicas"] { no_delete },
//!         image: ["spec", "containers", 0, "image"] { read_only },
//!     }
//! }
//!
//! let data: Value = serde_json::from_str(
//!     r#"{"metadata": {"labels": {"owner": "alice"}},
//!         "spec": {"replicas": 2, "containers": [{"image": "app:1"}]}}"#,
//! ).unwrap();
//! let mut manifest = Manifest::new(data).unwrap();
//! assert_eq!(manifest.owner().unwrap().as_str(), Some("alice"));
//! manifest.set_replicas(3_i64).unwrap();
//! assert_eq!(manifest.replicas().unwrap().as_i64(), Some(3));
//! assert!(manifest.set_image("app:2").is_err());
//! assert!(manifest.delete_replicas().is_err());
//! assert_eq!(manifest.doc("owner").unwrap(), Some("Team that owns the deployment."));
//! ```
//!
//! Property options are the [`PropertySpec`](crate::property::PropertySpec)
//! switches `no_get`, `no_set`, `no_delete` and `read_only`. Custom accessors
//! need a [`SchemaBuilder`](crate::schema::SchemaBuilder) instead.

#[doc(hidden)]
pub use once_cell::sync::Lazy;
#[doc(hidden)]
pub use paste::paste;

#[macro_export]
macro_rules! property_wrapper {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $prop:ident : [$($segment:expr),* $(,)?] $({ $($option:ident),* $(,)? })?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name($crate::wrapper::Wrapped<$crate::value::Value>);

        #[allow(dead_code)]
        impl $name {
            /// The shared schema of this wrapper type.
            pub fn schema() -> $crate::errors::PropertyResult<
                ::std::sync::Arc<$crate::schema::Schema<$crate::value::Value>>,
            > {
                static SCHEMA: $crate::declare::Lazy<
                    $crate::errors::PropertyResult<
                        ::std::sync::Arc<$crate::schema::Schema<$crate::value::Value>>,
                    >,
                > = $crate::declare::Lazy::new(|| {
                    $crate::schema::SchemaBuilder::new(stringify!($name))
                        $(
                            .property(stringify!($prop), {
                                let spec = $crate::property::PropertySpec::new(
                                    $crate::path::Path::new(vec![
                                        $($crate::path::PathSegment::from($segment)),*
                                    ]),
                                ) $($(.$option())*)?;
                                let doc: &str = concat!($($doc, "\n"),*);
                                if doc.trim().is_empty() {
                                    spec
                                } else {
                                    spec.doc(doc.trim())
                                }
                            })
                        )*
                        .build()
                });
                SCHEMA.clone()
            }

            /// Wraps `contents`, failing if the property table is invalid.
            pub fn new(
                contents: $crate::value::Value,
            ) -> $crate::errors::PropertyResult<Self> {
                Ok(Self(Self::schema()?.wrap(contents)))
            }

            pub fn into_inner(self) -> $crate::value::Value {
                self.0.into_inner()
            }

            $(
                $(#[doc = $doc])*
                pub fn $prop(
                    &self,
                ) -> $crate::errors::PropertyResult<::std::borrow::Cow<'_, $crate::value::Value>> {
                    self.0.get(stringify!($prop))
                }

                $crate::declare::paste! {
                    #[doc = "Writes the `" $prop "` property."]
                    pub fn [<set_ $prop>](
                        &mut self,
                        value: impl Into<$crate::value::Value>,
                    ) -> $crate::errors::PropertyResult<()> {
                        self.0.set(stringify!($prop), value)
                    }

                    #[doc = "Deletes the `" $prop "` property, returning the removed value."]
                    pub fn [<delete_ $prop>](
                        &mut self,
                    ) -> $crate::errors::PropertyResult<Option<$crate::value::Value>> {
                        self.0.delete(stringify!($prop))
                    }
                }
            )*
        }

        impl ::std::ops::Deref for $name {
            type Target = $crate::wrapper::Wrapped<$crate::value::Value>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl ::std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(&self.0, f)
            }
        }
    };
}
