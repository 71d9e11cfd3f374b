use crate::{
    common,
    error::{Error, Result},
};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::to_attribute_value;
use std::{collections, fmt, str};

/// Separator between the conditions of a set. Sets are conjunctions only.
const AND: &str = " AND ";

/// Comparison operators understood by the expression builder.
///
/// ```rust
/// use dynamodb_facade::common::condition::Operator;
///
/// let operator: Operator = "BeginsWith".parse().unwrap();
/// assert_eq!(operator, Operator::BeginsWith);
/// assert!("Contains".parse::<Operator>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `begins_with(field, value)`
    BeginsWith,
    /// `field = value`
    Equal,
    /// `field <> value`
    NotEqual,
    /// `field > value`
    GreaterThan,
    /// `field >= value`
    GreaterThanEqual,
    /// `field < value`
    LessThan,
    /// `field <= value`
    LessThanEqual,
    /// `field BETWEEN low AND high`
    Between,
    /// `attribute_exists(field)`
    AttributeExists,
    /// `attribute_not_exists(field)`
    AttributeNotExists,
}

impl Operator {
    /// Whether the operator may be used in a key condition (query sort key).
    pub fn is_key_operator(self) -> bool {
        !matches!(self, Self::AttributeExists | Self::AttributeNotExists)
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::BeginsWith => "BeginsWith",
            Self::Equal => "Equal",
            Self::NotEqual => "NotEqual",
            Self::GreaterThan => "GreaterThan",
            Self::GreaterThanEqual => "GreaterThanEqual",
            Self::LessThan => "LessThan",
            Self::LessThanEqual => "LessThanEqual",
            Self::Between => "Between",
            Self::AttributeExists => "AttributeExists",
            Self::AttributeNotExists => "AttributeNotExists",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl str::FromStr for Operator {
    type Err = Error;

    fn from_str(operator: &str) -> Result<Self> {
        let operator = match operator {
            "BeginsWith" => Self::BeginsWith,
            "Equal" => Self::Equal,
            "NotEqual" => Self::NotEqual,
            "GreaterThan" => Self::GreaterThan,
            "GreaterThanEqual" => Self::GreaterThanEqual,
            "LessThan" => Self::LessThan,
            "LessThanEqual" => Self::LessThanEqual,
            "Between" => Self::Between,
            "AttributeExists" => Self::AttributeExists,
            "AttributeNotExists" => Self::AttributeNotExists,
            other => return Err(Error::InvalidOperator(other.to_string())),
        };
        Ok(operator)
    }
}

/// Condition applied to a single attribute.
///
/// The variants carry exactly the values their operator needs, so a `Between`
/// without an upper bound cannot be expressed.
///
/// ```rust
/// use dynamodb_facade::common::condition;
///
/// let eq = condition::Condition::Equal("active".to_string());
/// let range = condition::Condition::Between(10, 20);
/// let exists: condition::Condition<String> = condition::Condition::AttributeExists;
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Condition<T> {
    /// Attribute begins with the given prefix.
    BeginsWith(T),
    /// Attribute equals the value.
    Equal(T),
    /// Attribute differs from the value.
    NotEqual(T),
    /// Attribute is greater than the value.
    GreaterThan(T),
    /// Attribute is greater than or equal to the value.
    GreaterThanOrEqual(T),
    /// Attribute is less than the value.
    LessThan(T),
    /// Attribute is less than or equal to the value.
    LessThanOrEqual(T),
    /// Attribute lies between the two values (inclusive).
    Between(T, T),
    /// Attribute is present on the item.
    AttributeExists,
    /// Attribute is absent from the item.
    AttributeNotExists,
}

impl<T> Condition<T> {
    /// Assemble a condition from an operator and loosely supplied values.
    ///
    /// `Between` needs both values, the exists family needs none, every other operator
    /// needs exactly the first one.
    pub fn from_parts(
        field: &str,
        operator: Operator,
        value: Option<T>,
        second_value: Option<T>,
    ) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidCondition {
            field: field.to_string(),
            reason: format!("{operator} {reason}"),
        };
        let condition = match (operator, value, second_value) {
            (Operator::Between, Some(low), Some(high)) => Self::Between(low, high),
            (Operator::Between, _, _) => return Err(invalid("requires two values")),
            (Operator::AttributeExists, None, None) => Self::AttributeExists,
            (Operator::AttributeNotExists, None, None) => Self::AttributeNotExists,
            (Operator::AttributeExists | Operator::AttributeNotExists, _, _) => {
                return Err(invalid("takes no value"));
            }
            (Operator::BeginsWith, Some(value), None) => Self::BeginsWith(value),
            (Operator::Equal, Some(value), None) => Self::Equal(value),
            (Operator::NotEqual, Some(value), None) => Self::NotEqual(value),
            (Operator::GreaterThan, Some(value), None) => Self::GreaterThan(value),
            (Operator::GreaterThanEqual, Some(value), None) => Self::GreaterThanOrEqual(value),
            (Operator::LessThan, Some(value), None) => Self::LessThan(value),
            (Operator::LessThanEqual, Some(value), None) => Self::LessThanOrEqual(value),
            (
                Operator::BeginsWith
                | Operator::Equal
                | Operator::NotEqual
                | Operator::GreaterThan
                | Operator::GreaterThanEqual
                | Operator::LessThan
                | Operator::LessThanEqual,
                _,
                _,
            ) => return Err(invalid("requires exactly one value")),
        };
        Ok(condition)
    }

    /// The operator of this condition.
    pub fn operator(&self) -> Operator {
        match self {
            Self::BeginsWith(_) => Operator::BeginsWith,
            Self::Equal(_) => Operator::Equal,
            Self::NotEqual(_) => Operator::NotEqual,
            Self::GreaterThan(_) => Operator::GreaterThan,
            Self::GreaterThanOrEqual(_) => Operator::GreaterThanEqual,
            Self::LessThan(_) => Operator::LessThan,
            Self::LessThanOrEqual(_) => Operator::LessThanEqual,
            Self::Between(_, _) => Operator::Between,
            Self::AttributeExists => Operator::AttributeExists,
            Self::AttributeNotExists => Operator::AttributeNotExists,
        }
    }
}

impl<T: Serialize> Condition<T> {
    fn get_expression(
        self,
        field_placeholder: &str,
        index: usize,
    ) -> Result<(String, collections::HashMap<String, types::AttributeValue>)> {
        let value_placeholder = format!(":val{index}");
        let mut expression_attribute_values = collections::HashMap::new();
        let mut bind = |placeholder: &str, value: T| -> Result<()> {
            let value = to_attribute_value(value)?;
            expression_attribute_values.insert(placeholder.to_string(), value);
            Ok(())
        };
        let expression = match self {
            Self::BeginsWith(value) => {
                bind(&value_placeholder, value)?;
                format!("begins_with({field_placeholder}, {value_placeholder})")
            }
            Self::Equal(value) => {
                bind(&value_placeholder, value)?;
                format!("{field_placeholder} = {value_placeholder}")
            }
            Self::NotEqual(value) => {
                bind(&value_placeholder, value)?;
                format!("{field_placeholder} <> {value_placeholder}")
            }
            Self::GreaterThan(value) => {
                bind(&value_placeholder, value)?;
                format!("{field_placeholder} > {value_placeholder}")
            }
            Self::GreaterThanOrEqual(value) => {
                bind(&value_placeholder, value)?;
                format!("{field_placeholder} >= {value_placeholder}")
            }
            Self::LessThan(value) => {
                bind(&value_placeholder, value)?;
                format!("{field_placeholder} < {value_placeholder}")
            }
            Self::LessThanOrEqual(value) => {
                bind(&value_placeholder, value)?;
                format!("{field_placeholder} <= {value_placeholder}")
            }
            Self::Between(low, high) => {
                let high_placeholder = format!(":val{}", index + 1);
                bind(&value_placeholder, low)?;
                bind(&high_placeholder, high)?;
                format!("{field_placeholder} BETWEEN {value_placeholder} AND {high_placeholder}")
            }
            Self::AttributeExists => format!("attribute_exists({field_placeholder})"),
            Self::AttributeNotExists => format!("attribute_not_exists({field_placeholder})"),
        };
        Ok((expression, expression_attribute_values))
    }
}

/// Condition applied to a named attribute.
///
/// ```rust
/// use dynamodb_facade::common::condition;
///
/// let condition = condition::KeyCondition::new(
///     "status",
///     condition::Condition::Equal("active".to_string()),
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct KeyCondition<T> {
    /// The condition to apply to the attribute.
    pub condition: Condition<T>,
    /// The name of the attribute to apply the condition to.
    pub name: String,
}

impl<T> KeyCondition<T> {
    /// Bind a condition to an attribute.
    pub fn new(name: impl Into<String>, condition: Condition<T>) -> Self {
        Self {
            condition,
            name: name.into(),
        }
    }
}

/// Conditions combined with `AND`, in order.
pub type ConditionSet<T> = Vec<KeyCondition<T>>;

/// Compile a condition set into an expression with placeholders.
///
/// Condition `i` (counting in steps of two, so a `BETWEEN` can use the slot after it)
/// gets the name placeholder `#field{i}` and the value placeholder `:val{i}`. An empty
/// set compiles to `None`: the caller must then omit the clause altogether.
///
/// ```rust
/// use dynamodb_facade::common::condition::{self, Condition, KeyCondition};
///
/// let compiled = condition::compile(vec![
///     KeyCondition::new("age", Condition::GreaterThan(18)),
///     KeyCondition::new("email", Condition::<i32>::AttributeExists),
/// ])
/// .unwrap()
/// .unwrap();
/// assert_eq!(
///     compiled.expression,
///     "#field0 > :val0 AND attribute_exists(#field2)"
/// );
/// ```
pub fn compile<T: Serialize>(
    conditions: impl IntoIterator<Item = KeyCondition<T>>,
) -> Result<Option<common::ExpressionInput>> {
    let mut operations = Vec::new();
    for (position, key_condition) in conditions.into_iter().enumerate() {
        let index = position * 2;
        let field_placeholder = format!("#field{index}");
        let (expression, expression_attribute_values) = key_condition
            .condition
            .get_expression(&field_placeholder, index)?;
        let expression_attribute_names =
            collections::HashMap::from([(field_placeholder, key_condition.name)]);
        operations.push(common::ExpressionInput {
            expression,
            expression_attribute_names,
            expression_attribute_values,
        });
    }
    if operations.is_empty() {
        return Ok(None);
    }
    Ok(Some(common::ExpressionInput::merge(AND, operations)))
}
