use crate::{
    common::{self, item::Item},
    error::{Error, Result},
    storage::Storage,
    write,
};

use serde::Serialize;

/// Wire request of a PutItem.
#[derive(Clone, Debug, PartialEq)]
pub struct PutItemInput {
    /// The full item to store.
    pub item: Item,
    /// Table, condition and placeholders.
    pub write_operation: write::common::WriteInput,
}

/// Put item operation.
///
/// ```rust,no_run
/// use dynamodb_facade::write;
/// use serde_json::json;
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let put_item = write::put_item::PutItem {
///     item: json!({"id": "1", "name": "John"}),
///     write_args: write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// let stored = put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PutItem<T> {
    /// The item to put into the table.
    pub item: T,
    /// Additional write operation arguments (table name, condition).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> PutItem<T> {
    fn into_input(self) -> Result<(PutItemInput, T)> {
        let item = common::item::marshall_item(&self.item)?;
        let write_operation: write::common::WriteInput = self.write_args.try_into()?;
        let operation = PutItemInput {
            item,
            write_operation,
        };
        Ok((operation, self.item))
    }

    /// Execute the put item operation and hand back the stored record.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_facade.put_item", skip_all, err)
    )]
    pub async fn send<S>(self, storage: &S) -> Result<T>
    where
        S: Storage + ?Sized,
    {
        let (put_item, item) = self.into_input()?;
        storage.put_item(put_item).await?;
        Ok(item)
    }
}

impl<T: Serialize> TryFrom<PutItem<T>> for PutItemInput {
    type Error = Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let (operation, _) = put_item.into_input()?;
        Ok(operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::stub::{Call, StubStorage};

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::collections;

    #[rstest]
    #[case::empty(
        PutItem {
            item: json!(
                {
                    "a": "b"
                }
            ),
            write_args: write::common::WriteArgs {
                table_name: "c".to_string(),
                ..Default::default()
            },
        },
        PutItemInput {
            item: Item::from(
                [(
                    "a".to_string(),
                    types::AttributeValue::S(
                        "b".to_string()
                    ),
                )]
            ),
            write_operation: write::common::WriteInput {
                return_values_on_condition_check_failure: Some(
                    types::ReturnValuesOnConditionCheckFailure::AllOld
                ),
                table_name: "c".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::full(
        PutItem {
            item: json!(
                {
                    "a": "b"
                }
            ),
            write_args: write::common::WriteArgs {
                condition: vec![
                    common::condition::KeyCondition::new(
                        "a",
                        common::condition::Condition::AttributeNotExists
                    ),
                ],
                table_name: "e".to_string(),
            },
        },
        PutItemInput {
            item: Item::from(
                [(
                    "a".to_string(),
                    types::AttributeValue::S(
                        "b".to_string()
                    ),
                )]
            ),
            write_operation: write::common::WriteInput {
                condition_expression: Some(
                    "attribute_not_exists(#field0)".to_string()
                ),
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#field0".to_string(), "a".to_string()),
                        ]
                    )
                ),
                return_values_on_condition_check_failure: Some(
                    types::ReturnValuesOnConditionCheckFailure::AllOld
                ),
                table_name: "e".to_string(),
                ..Default::default()
            },
        }
    )]
    fn test_put_item(#[case] args: PutItem<Value>, #[case] expected: PutItemInput) {
        let actual: PutItemInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_send_returns_record() {
        let storage = StubStorage::default();
        let put_item = PutItem {
            item: json!({"id": "1", "name": "John"}),
            write_args: write::common::WriteArgs {
                table_name: "users".to_string(),
                ..Default::default()
            },
        };
        let stored = put_item.send(&storage).await.unwrap();
        assert_eq!(stored, json!({"id": "1", "name": "John"}));
        assert!(matches!(&storage.calls()[..], [Call::PutItem(input)] if input.write_operation.table_name == "users"));
    }

    #[tokio::test]
    async fn test_send_normalizes_failure() {
        let storage = StubStorage::default();
        storage.push_put_item(Err(Error::backing_message(
            "put_item",
            "The conditional request failed",
        )));
        let put_item = PutItem {
            item: json!({"id": "1"}),
            write_args: write::common::WriteArgs {
                table_name: "users".to_string(),
                ..Default::default()
            },
        };
        let error = put_item.send(&storage).await.unwrap_err();
        assert_eq!(error.to_string(), "put_item failed: The conditional request failed");
    }
}
