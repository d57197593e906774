//! Typed Ids
//!
//! The gateway hands out opaque string identifiers. Wrapping them in a typed
//! id keeps a product id from being passed where a category id is expected.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    catalog::{Category, Product},
    home_sections::HomeSection,
    orders::Order,
    session::User,
};

/// Product Id
pub type ProductId = TypedId<Product>;

/// Category Id
pub type CategoryId = TypedId<Category>;

/// Order Id
pub type OrderId = TypedId<Order>;

/// Home Section Id
pub type HomeSectionId = TypedId<HomeSection>;

/// User Id
pub type UserId = TypedId<User>;

/// Opaque gateway identifier tagged with the entity it refers to.
pub struct TypedId<T>(String, PhantomData<T>);

impl<T> TypedId<T> {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into(), PhantomData)
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw identifier.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the identifier is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<String> for TypedId<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> From<&str> for TypedId<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> From<TypedId<T>> for String {
    fn from(value: TypedId<T>) -> Self {
        value.into_string()
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn ids_compare_by_raw_value() {
        let a = ProductId::new("p1");
        let b = ProductId::from("p1");

        assert_eq!(a, b);
        assert_ne!(a, ProductId::new("p2"));
    }

    #[test]
    fn ids_serialize_as_plain_strings() -> TestResult {
        let id = CategoryId::new("64f0c0ffee");

        let json = serde_json::to_string(&id)?;
        let back: CategoryId = serde_json::from_str(&json)?;

        assert_eq!(json, "\"64f0c0ffee\"");
        assert_eq!(back, id);

        Ok(())
    }

    #[test]
    fn blank_ids_are_detected() {
        assert!(ProductId::new("  ").is_blank());
        assert!(!ProductId::new("p1").is_blank());
    }
}
