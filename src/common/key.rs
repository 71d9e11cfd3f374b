use crate::{common::item::Item, error::Result};

use serde::Serialize;
use serde_dynamo::to_attribute_value;

/// Key component.
///
/// ```rust
/// use dynamodb_facade::common::key;
///
/// let key = key::Key {
///     name: "id".to_string(),
///     value: "1".to_string(),
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Key<T> {
    /// The attribute name of the key.
    pub name: String,
    /// The value of the key.
    pub value: T,
}

impl<T> Key<T> {
    /// Build a key component.
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Primary key (partition key and optional sort key).
///
/// ```rust
/// use dynamodb_facade::common::key;
///
/// let keys = key::Keys {
///     partition_key: key::Key::new("id", "1".to_string()),
///     sort_key: Some(key::Key::new("sk", "2024-01".to_string())),
/// };
/// assert!(keys.contains("sk"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keys<T> {
    /// The partition key (required).
    pub partition_key: Key<T>,
    /// The sort key (optional, only for tables with composite primary keys).
    pub sort_key: Option<Key<T>>,
}

impl<T> Keys<T> {
    /// Primary key made of a partition key only.
    pub fn partition(name: impl Into<String>, value: T) -> Self {
        Self {
            partition_key: Key::new(name, value),
            sort_key: None,
        }
    }

    /// Primary key made of a partition key and a sort key.
    pub fn composite(
        partition_name: impl Into<String>,
        partition_value: T,
        sort_name: impl Into<String>,
        sort_value: T,
    ) -> Self {
        Self {
            partition_key: Key::new(partition_name, partition_value),
            sort_key: Some(Key::new(sort_name, sort_value)),
        }
    }

    /// Whether `attribute` is one of the key attributes.
    pub fn contains(&self, attribute: &str) -> bool {
        self.partition_key.name == attribute
            || self
                .sort_key
                .as_ref()
                .is_some_and(|sort_key| sort_key.name == attribute)
    }
}

impl<T: Serialize> TryFrom<Keys<T>> for Item {
    type Error = crate::error::Error;

    fn try_from(key: Keys<T>) -> Result<Self> {
        let partition_key_value = to_attribute_value(key.partition_key.value)?;
        let mut keys = Self::from([(key.partition_key.name, partition_key_value)]);
        if let Some(sort_key) = key.sort_key {
            let sort_key_value = to_attribute_value(sort_key.value)?;
            keys.insert(sort_key.name, sort_key_value);
        }
        Ok(keys)
    }
}
