use crate::{common, error::Result};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use std::collections;

/// Request settings shared by Put, Update and Delete.
///
/// The old image of the item is always requested on a failed condition check, so
/// the error reported by the service carries the item that blocked the write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteInput {
    /// Condition the item must satisfy for the write to happen.
    pub condition_expression: Option<String>,
    /// Name placeholders referenced by any expression of the request.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Value placeholders referenced by any expression of the request.
    pub expression_attribute_values: Option<common::item::Item>,
    /// Item image returned on success.
    pub return_values: Option<types::ReturnValue>,
    /// Item image returned when the condition check fails.
    pub return_values_on_condition_check_failure:
        Option<types::ReturnValuesOnConditionCheckFailure>,
    /// Target table.
    pub table_name: String,
}

impl WriteInput {
    /// Merge an expression operation into this write operation.
    pub(crate) fn merge_expression(&mut self, operation: common::ExpressionInput) -> String {
        operation.merge_into(
            &mut self.expression_attribute_names,
            &mut self.expression_attribute_values,
        )
    }
}

/// Arguments common to all write operations (Put, Update, Delete).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteArgs<T> {
    /// Conditions the existing item must satisfy, joined with `AND`.
    ///
    /// If any of them evaluates to false the write fails with a conditional check error.
    pub condition: common::condition::ConditionSet<T>,
    /// The name of the table to write to.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<WriteArgs<T>> for WriteInput {
    type Error = crate::error::Error;

    fn try_from(write_args: WriteArgs<T>) -> Result<Self> {
        let mut operation = Self {
            return_values_on_condition_check_failure: Some(
                types::ReturnValuesOnConditionCheckFailure::AllOld,
            ),
            table_name: write_args.table_name,
            ..Default::default()
        };
        if let Some(condition) = common::condition::compile(write_args.condition)? {
            let condition_expression = operation.merge_expression(condition);
            operation.condition_expression = Some(condition_expression);
        }
        Ok(operation)
    }
}

/// apply common write operation settings to a builder
#[doc(hidden)]
#[macro_export]
macro_rules! apply_write_operation {
    ($builder:expr, $write_operation:expr) => {
        $builder
            .set_condition_expression($write_operation.condition_expression)
            .set_expression_attribute_names($write_operation.expression_attribute_names)
            .set_expression_attribute_values($write_operation.expression_attribute_values)
            .set_return_values($write_operation.return_values)
            .set_return_values_on_condition_check_failure(
                $write_operation.return_values_on_condition_check_failure,
            )
            .table_name($write_operation.table_name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    #[case::unconditional(
        WriteArgs {
            table_name: "a".to_string(),
            ..Default::default()
        },
        WriteInput {
            return_values_on_condition_check_failure: Some(
                types::ReturnValuesOnConditionCheckFailure::AllOld
            ),
            table_name: "a".to_string(),
            ..Default::default()
        }
    )]
    #[case::conditional(
        WriteArgs {
            condition: vec![
                common::condition::KeyCondition::new(
                    "b",
                    common::condition::Condition::AttributeExists
                ),
                common::condition::KeyCondition::new(
                    "c",
                    common::condition::Condition::LessThan(
                        Value::from(3)
                    )
                ),
            ],
            table_name: "a".to_string(),
        },
        WriteInput {
            condition_expression: Some(
                "attribute_exists(#field0) AND #field2 < :val2".to_string()
            ),
            expression_attribute_names: Some(
                collections::HashMap::from(
                    [
                        ("#field0".to_string(), "b".to_string()),
                        ("#field2".to_string(), "c".to_string()),
                    ]
                )
            ),
            expression_attribute_values: Some(
                common::item::Item::from(
                    [
                        (
                            ":val2".to_string(),
                            types::AttributeValue::N(
                                "3".to_string()
                            )
                        ),
                    ]
                )
            ),
            return_values_on_condition_check_failure: Some(
                types::ReturnValuesOnConditionCheckFailure::AllOld
            ),
            table_name: "a".to_string(),
            ..Default::default()
        }
    )]
    fn test_write_args(#[case] args: WriteArgs<Value>, #[case] expected: WriteInput) {
        let actual: WriteInput = args.try_into().unwrap();
        assert_eq!(actual, expected);
    }
}
