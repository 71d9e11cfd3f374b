use crate::{
    common::{self, condition},
    error::{Error, Result},
    read,
    storage::Storage,
};

use serde::{Serialize, de::DeserializeOwned};

/// Wire request of a Scan page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanInput {
    /// Table, index, filter, placeholders and paging settings.
    pub multiple_read_operation: read::common::MultipleReadInput,
}

/// Scan operation.
///
/// ```rust,no_run
/// use dynamodb_facade::{common, read};
/// use serde_json::Value;
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let scan = read::scan::Scan {
///     filter: vec![common::condition::KeyCondition::new(
///         "status",
///         common::condition::Condition::Equal("active".to_string()),
///     )],
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// let users: Vec<Value> = scan.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scan<T> {
    /// Conditions every returned item must satisfy, joined with `AND`.
    pub filter: condition::ConditionSet<T>,
    /// Additional read operation arguments (table name, index, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
}

impl<T: Serialize> TryFrom<Scan<T>> for ScanInput {
    type Error = Error;

    fn try_from(scan: Scan<T>) -> Result<Self> {
        let mut multiple_read_operation: read::common::MultipleReadInput =
            scan.multiple_read_args.try_into()?;
        if let Some(filter) = condition::compile(scan.filter)? {
            let filter_expression = filter.merge_into(
                &mut multiple_read_operation.expression_attribute_names,
                &mut multiple_read_operation.expression_attribute_values,
            );
            multiple_read_operation.filter_expression = Some(filter_expression);
        }
        Ok(Self {
            multiple_read_operation,
        })
    }
}

impl<T: Serialize> Scan<T> {
    /// Execute the scan operation, following continuation tokens until exhausted or the limit is met.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_facade.scan", skip_all, err)
    )]
    pub async fn send<R, S>(self, storage: &S) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        S: Storage + ?Sized,
    {
        let scan: ScanInput = self.try_into()?;
        let start = scan.multiple_read_operation.exclusive_start_key.clone();
        let limit = scan.multiple_read_operation.limit;
        let items = read::common::paginate(start, limit, |token| {
            let mut page = scan.clone();
            page.multiple_read_operation.exclusive_start_key = token;
            storage.scan(page)
        })
        .await?;
        common::item::unmarshall_items(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        common::item::Item,
        storage::stub::{Call, StubStorage},
    };

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::collections;

    #[rstest]
    #[case::empty(
        Scan {
            multiple_read_args: read::common::MultipleReadArgs {
                table_name: "a".to_string(),
                ..Default::default()
            },
            ..Default::default()
        },
        ScanInput {
            multiple_read_operation: read::common::MultipleReadInput {
                table_name: "a".to_string(),
                ..Default::default()
            },
        }
    )]
    #[case::full(
        Scan {
            filter: vec![
                condition::KeyCondition::new(
                    "a",
                    condition::Condition::Equal(
                        Value::String(
                            "b".to_string()
                        )
                    )
                ),
                condition::KeyCondition::new(
                    "c",
                    condition::Condition::AttributeNotExists
                ),
            ],
            multiple_read_args: read::common::MultipleReadArgs {
                selection: Some(
                    common::selection::Selection::new(["d"])
                ),
                table_name: "e".to_string(),
                ..Default::default()
            },
        },
        ScanInput {
            multiple_read_operation: read::common::MultipleReadInput {
                expression_attribute_names: Some(
                    collections::HashMap::from(
                        [
                            ("#field0".to_string(), "a".to_string()),
                            ("#field2".to_string(), "c".to_string()),
                            ("#proj0".to_string(), "d".to_string()),
                        ]
                    )
                ),
                expression_attribute_values: Some(
                    Item::from(
                        [
                            (
                                ":val0".to_string(),
                                types::AttributeValue::S(
                                    "b".to_string()
                                )
                            ),
                        ]
                    )
                ),
                filter_expression: Some(
                    "#field0 = :val0 AND attribute_not_exists(#field2)".to_string()
                ),
                projection_expression: Some(
                    "#proj0".to_string()
                ),
                table_name: "e".to_string(),
                ..Default::default()
            },
        }
    )]
    fn test_scan(#[case] args: Scan<Value>, #[case] expected: ScanInput) {
        let actual: ScanInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_send_stops_at_limit() {
        let storage = StubStorage::default();
        let page = |ids: &[&str], more: bool| read::common::Page {
            items: ids
                .iter()
                .map(|id| common::item::marshall_item(&json!({ "id": id })).unwrap())
                .collect(),
            last_evaluated_key: more.then(|| {
                Item::from([("id".to_string(), types::AttributeValue::S(ids[ids.len() - 1].to_string()))])
            }),
        };
        storage.push_page(Ok(page(&["1", "2"], true)));
        storage.push_page(Ok(page(&["3", "4"], true)));
        storage.push_page(Ok(page(&["5"], false)));
        let scan: Scan<Value> = Scan {
            multiple_read_args: read::common::MultipleReadArgs {
                limit: Some(3),
                table_name: "users".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let users: Vec<Value> = scan.send(&storage).await.unwrap();
        assert_eq!(users.len(), 4);
        let calls = storage.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| matches!(call, Call::Scan(scan) if scan.multiple_read_operation.limit == Some(3))));
    }
}
