use crate::{
    common::{self, condition},
    error::{Error, Result},
    read,
    storage::Storage,
};

use serde::{Serialize, de::DeserializeOwned};
use std::collections;

/// Wire request of a Query page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryInput {
    /// Partition key equality, optionally followed by a sort key condition.
    pub key_condition_expression: String,
    /// Table, index, placeholders, projection and paging settings.
    pub multiple_read_operation: read::common::MultipleReadInput,
    /// `Some(false)` reads the index backwards.
    pub scan_index_forward: Option<bool>,
}

/// Query operation.
///
/// ```rust,no_run
/// use dynamodb_facade::{common, read};
/// use serde_json::Value;
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let query = read::query::Query {
///     partition_key: common::key::Key::new("user_id", "1".to_string()),
///     sort_key_condition: Some(common::condition::KeyCondition::new(
///         "created_at",
///         common::condition::Condition::GreaterThan("2024-01-01".to_string()),
///     )),
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "orders".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let orders: Vec<Value> = query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Additional read operation arguments (table name, index, selection, etc.).
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
    /// Optional condition to apply to the sort key.
    ///
    /// The exists family of operators is not allowed here.
    pub sort_key_condition: Option<condition::KeyCondition<T>>,
}

impl<T: Serialize> Query<T> {
    fn get_key_condition_expression(
        partition_key: common::key::Key<T>,
        sort_key: Option<condition::KeyCondition<T>>,
    ) -> Result<common::ExpressionInput> {
        let partition_value = serde_dynamo::to_attribute_value(partition_key.value)?;
        let partition_operation = common::ExpressionInput {
            expression: "#a = :b".to_string(),
            expression_attribute_names: collections::HashMap::from([(
                "#a".to_string(),
                partition_key.name,
            )]),
            expression_attribute_values: collections::HashMap::from([(
                ":b".to_string(),
                partition_value,
            )]),
        };
        if let Some(sort_key) = &sort_key {
            let operator = sort_key.condition.operator();
            if !operator.is_key_operator() {
                return Err(Error::InvalidOperator(operator.to_string()));
            }
        }
        let mut operations = vec![partition_operation];
        operations.extend(condition::compile(sort_key)?);
        Ok(common::ExpressionInput::merge(" AND ", operations))
    }
}

impl<T: Serialize> TryFrom<Query<T>> for QueryInput {
    type Error = Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let mut multiple_read_operation: read::common::MultipleReadInput =
            query.multiple_read_args.try_into()?;
        let key_condition_operation =
            Query::get_key_condition_expression(query.partition_key, query.sort_key_condition)?;
        let key_condition_expression = key_condition_operation.merge_into(
            &mut multiple_read_operation.expression_attribute_names,
            &mut multiple_read_operation.expression_attribute_values,
        );
        let operation = Self {
            key_condition_expression,
            multiple_read_operation,
            scan_index_forward: query.scan_index_forward,
        };
        Ok(operation)
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query, following continuation tokens until exhausted or the limit is met.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_facade.query", skip_all, err)
    )]
    pub async fn send<R, S>(self, storage: &S) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        S: Storage + ?Sized,
    {
        let query: QueryInput = self.try_into()?;
        let start = query.multiple_read_operation.exclusive_start_key.clone();
        let limit = query.multiple_read_operation.limit;
        let items = read::common::paginate(start, limit, |token| {
            let mut page = query.clone();
            page.multiple_read_operation.exclusive_start_key = token;
            storage.query(page)
        })
        .await?;
        common::item::unmarshall_items(items)
    }
}

/// Query with an equality or prefix condition on the sort key.
///
/// ```rust,no_run
/// use dynamodb_facade::{common, read};
/// use serde_json::Value;
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let query = read::query::QueryRange {
///     partition_key: common::key::Key::new("pk", "user#1".to_string()),
///     range_key_name: "sk".to_string(),
///     range_key_value: "2024-".to_string(),
///     fuzzy: true,
///     multiple_read_args: read::common::MultipleReadArgs {
///         table_name: "events".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let events: Vec<Value> = query.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryRange<T> {
    /// `true` for `begins_with` on the sort key, `false` for equality.
    pub fuzzy: bool,
    /// Additional read operation arguments.
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// Sort key attribute name.
    pub range_key_name: String,
    /// Sort key value or prefix.
    pub range_key_value: T,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
}

impl<T> From<QueryRange<T>> for Query<T> {
    fn from(query: QueryRange<T>) -> Self {
        let condition = if query.fuzzy {
            condition::Condition::BeginsWith(query.range_key_value)
        } else {
            condition::Condition::Equal(query.range_key_value)
        };
        Self {
            multiple_read_args: query.multiple_read_args,
            partition_key: query.partition_key,
            scan_index_forward: query.scan_index_forward,
            sort_key_condition: Some(condition::KeyCondition::new(query.range_key_name, condition)),
        }
    }
}

impl<T: Serialize> QueryRange<T> {
    /// Execute the query.
    pub async fn send<R, S>(self, storage: &S) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        S: Storage + ?Sized,
    {
        Query::from(self).send(storage).await
    }
}

/// Query with a `BETWEEN` condition on the sort key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryRangeBetween<T> {
    /// Additional read operation arguments.
    pub multiple_read_args: read::common::MultipleReadArgs<T>,
    /// The partition key value to query for.
    pub partition_key: common::key::Key<T>,
    /// Sort key attribute name.
    pub range_key_name: String,
    /// Inclusive upper bound of the sort key.
    pub range_key_value_max: T,
    /// Inclusive lower bound of the sort key.
    pub range_key_value_min: T,
    /// Whether to scan the index forward (ascending) or backward (descending).
    pub scan_index_forward: Option<bool>,
}

impl<T> From<QueryRangeBetween<T>> for Query<T> {
    fn from(query: QueryRangeBetween<T>) -> Self {
        let condition =
            condition::Condition::Between(query.range_key_value_min, query.range_key_value_max);
        Self {
            multiple_read_args: query.multiple_read_args,
            partition_key: query.partition_key,
            scan_index_forward: query.scan_index_forward,
            sort_key_condition: Some(condition::KeyCondition::new(query.range_key_name, condition)),
        }
    }
}

impl<T: Serialize> QueryRangeBetween<T> {
    /// Execute the query.
    pub async fn send<R, S>(self, storage: &S) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        S: Storage + ?Sized,
    {
        Query::from(self).send(storage).await
    }
}
