//! Common utilities for DynamoDB operations.
//!
//! This module provides shared types and utilities used across read and write operations,
//! including key handling, item marshalling, condition expressions, attribute selection
//! and the retry machinery behind batch operations.

/// Jittered backoff between batch retries.
pub mod backoff;

/// Chunked, concurrent batch dispatch that drains unprocessed units.
pub mod batch;

/// Condition expression building for filters, key conditions and conditional writes.
pub mod condition;

/// Wire items and conversions from and to application records.
pub mod item;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

/// Attribute selection for projection expressions.
pub mod selection;

use aws_sdk_dynamodb::types;
use std::collections;

fn get_expression(left: String, operator: &str, right: String) -> String {
    if left.is_empty() {
        right
    } else if right.is_empty() {
        left
    } else {
        format!("{left}{operator}{right}")
    }
}

/// Compiled expression: the expression text plus the placeholders it references.
///
/// Built fresh for every request and never mutated once handed to a request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionInput {
    /// Expression text, referencing names and values only through placeholders.
    pub expression: String,
    /// Name placeholders (`#...`) to real attribute names.
    pub expression_attribute_names: collections::HashMap<String, String>,
    /// Value placeholders (`:...`) to wire values.
    pub expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionInput {
    pub(crate) fn merge(operator: &str, items: Vec<Self>) -> Self {
        let mut operation = Self::default();
        for item in items {
            operation
                .expression_attribute_names
                .extend(item.expression_attribute_names);
            operation
                .expression_attribute_values
                .extend(item.expression_attribute_values);
            operation.expression = get_expression(operation.expression, operator, item.expression);
        }
        operation
    }

    /// Move the placeholders into a request's maps and hand back the expression.
    ///
    /// Empty maps are never materialized: the service rejects empty attribute maps.
    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        merge_map(names, self.expression_attribute_names);
        merge_map(values, self.expression_attribute_values);
        self.expression
    }
}

fn merge_map<V>(
    target: &mut Option<collections::HashMap<String, V>>,
    source: collections::HashMap<String, V>,
) {
    if source.is_empty() {
        return;
    }
    match target {
        Some(existing) => existing.extend(source),
        None => *target = Some(source),
    }
}
