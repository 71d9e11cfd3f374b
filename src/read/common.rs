use crate::{
    common::{self, item::Item},
    error::Result,
};

use serde::Serialize;
use serde_dynamo::to_attribute_value;
use std::{collections, future::Future};

/// Request settings shared by single-key reads (GetItem, BatchGetItem chunks).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SingleReadInput {
    /// Strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Name placeholders of the projection.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Projection expression.
    pub projection_expression: Option<String>,
    /// Target table.
    pub table_name: String,
}

/// Arguments for single-item read operations (GetItem, BatchGetItem).
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct SingleReadArgs {
    /// Whether to use a consistent read.
    ///
    /// `true` for strongly consistent reads, `false` or `None` for eventually consistent reads.
    pub consistent_read: Option<bool>,
    /// Which attributes to retrieve. `None` retrieves them all.
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl From<SingleReadArgs> for SingleReadInput {
    fn from(single_read_args: SingleReadArgs) -> Self {
        let (expression_attribute_names, projection_expression) =
            common::selection::compile(single_read_args.selection);
        Self {
            consistent_read: single_read_args.consistent_read.filter(|consistent| *consistent),
            expression_attribute_names,
            projection_expression,
            table_name: single_read_args.table_name,
        }
    }
}

/// Request settings shared by paged reads (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadInput {
    /// Strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Continuation token of the page to fetch.
    pub exclusive_start_key: Option<Item>,
    /// Name placeholders referenced by any expression of the request.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Value placeholders referenced by any expression of the request.
    pub expression_attribute_values: Option<Item>,
    /// Filter applied after the read.
    pub filter_expression: Option<String>,
    /// Secondary index to read instead of the table.
    pub index_name: Option<String>,
    /// Page size.
    pub limit: Option<i32>,
    /// Projection expression.
    pub projection_expression: Option<String>,
    /// Target table.
    pub table_name: String,
}

/// Arguments for multiple-item read operations (Query, Scan).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultipleReadArgs<T> {
    /// Whether to use a consistent read.
    ///
    /// Queries can only read consistently from the table or a local secondary index.
    pub consistent_read: Option<bool>,
    /// Where to start reading, typically the last key of a previous read.
    pub exclusive_start_key: Option<collections::HashMap<String, T>>,
    /// The name of a global or local secondary index to read.
    pub index_name: Option<String>,
    /// Stop fetching further pages once at least this many items were collected.
    ///
    /// Also sent as the page size. The last page is never truncated, so more items than
    /// the limit may come back.
    pub limit: Option<i32>,
    /// Which attributes to retrieve. `None` retrieves them all.
    pub selection: Option<common::selection::Selection>,
    /// The name of the table to read from.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<MultipleReadArgs<T>> for MultipleReadInput {
    type Error = crate::error::Error;

    fn try_from(multiple_read_args: MultipleReadArgs<T>) -> Result<Self> {
        let exclusive_start_key = match multiple_read_args.exclusive_start_key {
            Some(exclusive_start_key) => {
                let mut serialized_exclusive_start_key =
                    collections::HashMap::with_capacity(exclusive_start_key.len());
                for (key, value) in exclusive_start_key {
                    let value = to_attribute_value(value)?;
                    serialized_exclusive_start_key.insert(key, value);
                }
                Some(serialized_exclusive_start_key)
            }
            None => None,
        };
        let (expression_attribute_names, projection_expression) =
            common::selection::compile(multiple_read_args.selection);
        let operation = Self {
            consistent_read: multiple_read_args.consistent_read.filter(|consistent| *consistent),
            exclusive_start_key,
            expression_attribute_names,
            index_name: multiple_read_args.index_name,
            limit: multiple_read_args.limit.filter(|limit| *limit > 0),
            projection_expression,
            table_name: multiple_read_args.table_name,
            ..Default::default()
        };
        Ok(operation)
    }
}

/// One page of a Query or Scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// Items of the page, possibly none.
    pub items: Vec<Item>,
    /// Continuation token; its absence is the only end-of-results signal.
    pub last_evaluated_key: Option<Item>,
}

/// Drive a paged read until it is exhausted or `limit` items were collected.
///
/// `fetch` receives the continuation token of the page to read (`start` for the first).
/// A page is requested again whenever the previous one returned a token and the limit,
/// if any, is not yet reached; an empty page carrying a token does not stop the loop.
/// Any failing page fails the whole read.
pub async fn paginate<F, Fut>(
    start: Option<Item>,
    limit: Option<i32>,
    mut fetch: F,
) -> Result<Vec<Item>>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<Page>>,
{
    let limit = limit
        .and_then(|limit| usize::try_from(limit).ok())
        .filter(|limit| *limit > 0);
    let mut items = Vec::new();
    let mut token = start;
    loop {
        let page = fetch(token).await?;
        #[cfg(feature = "tracing")]
        tracing::trace!(
            page_items = page.items.len(),
            more = page.last_evaluated_key.is_some(),
            "fetched page"
        );
        items.extend(page.items);
        token = page.last_evaluated_key;
        let below_limit = limit.is_none_or(|limit| items.len() < limit);
        if token.is_none() || !below_limit {
            return Ok(items);
        }
    }
}

/// apply common single read operation settings to a builder
#[doc(hidden)]
#[macro_export]
macro_rules! apply_single_read_operation {
    ($builder:expr, $single_read_operation:expr) => {
        $builder
            .set_consistent_read($single_read_operation.consistent_read)
            .set_expression_attribute_names($single_read_operation.expression_attribute_names)
            .set_projection_expression($single_read_operation.projection_expression)
            .table_name($single_read_operation.table_name)
    };
}

/// apply common multiple read operation settings to a builder
#[doc(hidden)]
#[macro_export]
macro_rules! apply_multiple_read_operation {
    ($builder:expr, $multiple_read_operation:expr) => {
        $builder
            .set_consistent_read($multiple_read_operation.consistent_read)
            .set_exclusive_start_key($multiple_read_operation.exclusive_start_key)
            .set_expression_attribute_names($multiple_read_operation.expression_attribute_names)
            .set_expression_attribute_values($multiple_read_operation.expression_attribute_values)
            .set_filter_expression($multiple_read_operation.filter_expression)
            .set_index_name($multiple_read_operation.index_name)
            .set_limit($multiple_read_operation.limit)
            .set_projection_expression($multiple_read_operation.projection_expression)
            .table_name($multiple_read_operation.table_name)
    };
}
