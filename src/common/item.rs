use crate::error::Result;

use aws_sdk_dynamodb::types;
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::{from_item, to_item};
use std::collections;

/// A record in wire format: attribute name to typed attribute value.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// Convert an application record into a wire item.
///
/// ```rust
/// use dynamodb_facade::common::item;
/// use serde_json::json;
///
/// let item = item::marshall_item(&json!({"id": "1", "age": 30})).unwrap();
/// assert_eq!(item.len(), 2);
/// ```
pub fn marshall_item<T: Serialize>(record: &T) -> Result<Item> {
    let item = to_item(record)?;
    Ok(item)
}

/// Convert a wire item back into an application record.
pub fn unmarshall_item<T: DeserializeOwned>(item: Item) -> Result<T> {
    let record = from_item(item)?;
    Ok(record)
}

pub(crate) fn unmarshall_items<T: DeserializeOwned>(items: Vec<Item>) -> Result<Vec<T>> {
    items.into_iter().map(unmarshall_item).collect()
}
