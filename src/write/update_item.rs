use crate::{
    common::{self, item::Item},
    error::Result,
    storage::Storage,
    write,
};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use serde::{Serialize, de::DeserializeOwned};
use serde_dynamo::to_attribute_value;
use std::collections;

/// Build `SET #attr0 = :attr0, ... REMOVE #attrN, ...` from the non-key fields.
///
/// Placeholders are numbered by one counter across both clauses. `None` when no
/// field is left to touch.
fn get_update_expression<T: Serialize>(
    keys: &common::key::Keys<T>,
    fields: IndexMap<String, T>,
    remove_fields: Vec<String>,
) -> Result<Option<common::ExpressionInput>> {
    let mut index = 0;
    let mut set_operations = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        if keys.contains(&name) {
            continue;
        }
        let name_placeholder = format!("#attr{index}");
        let value_placeholder = format!(":attr{index}");
        set_operations.push(common::ExpressionInput {
            expression: format!("{name_placeholder} = {value_placeholder}"),
            expression_attribute_names: collections::HashMap::from([(name_placeholder, name)]),
            expression_attribute_values: collections::HashMap::from([(
                value_placeholder,
                to_attribute_value(value)?,
            )]),
        });
        index += 1;
    }
    let mut remove_operations = Vec::with_capacity(remove_fields.len());
    for name in remove_fields {
        if keys.contains(&name) {
            continue;
        }
        let name_placeholder = format!("#attr{index}");
        remove_operations.push(common::ExpressionInput {
            expression: name_placeholder.clone(),
            expression_attribute_names: collections::HashMap::from([(name_placeholder, name)]),
            ..Default::default()
        });
        index += 1;
    }
    let mut clauses = Vec::with_capacity(2);
    for (keyword, operations) in [("SET", set_operations), ("REMOVE", remove_operations)] {
        if operations.is_empty() {
            continue;
        }
        let mut clause = common::ExpressionInput::merge(", ", operations);
        clause.expression = format!("{keyword} {}", clause.expression);
        clauses.push(clause);
    }
    if clauses.is_empty() {
        return Ok(None);
    }
    Ok(Some(common::ExpressionInput::merge(" ", clauses)))
}

/// Wire request of an UpdateItem.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItemInput {
    /// Primary key of the item to update.
    pub keys: Item,
    /// `SET`/`REMOVE` expression.
    pub update_expression: String,
    /// Table, condition, placeholders and return settings.
    pub write_operation: write::common::WriteInput,
}

/// Update item operation.
///
/// Fields named like a key attribute are dropped from both lists: keys are never
/// rewritten by an update.
///
/// ```rust,no_run
/// use dynamodb_facade::{common, write};
/// use indexmap::IndexMap;
/// use serde_json::{Value, json};
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let update_item = write::update_item::UpdateItem {
///     keys: common::key::Keys::partition("id", json!("1")),
///     fields: IndexMap::from([("name".to_string(), json!("Jane"))]),
///     remove_fields: vec!["nickname".to_string()],
///     write_args: write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// let updated: Option<Value> = update_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateItem<T> {
    /// Attributes to assign, in order.
    pub fields: IndexMap<String, T>,
    /// The primary key of the item to update.
    pub keys: common::key::Keys<T>,
    /// Attributes to remove.
    pub remove_fields: Vec<String>,
    /// Additional write operation arguments (table name, condition).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> UpdateItem<T> {
    /// Build the wire request, `None` when there is nothing to update.
    pub fn into_input(self) -> Result<Option<UpdateItemInput>> {
        let Some(operation) = get_update_expression(&self.keys, self.fields, self.remove_fields)?
        else {
            return Ok(None);
        };
        let keys = self.keys.try_into()?;
        let mut write_operation: write::common::WriteInput = self.write_args.try_into()?;
        write_operation.return_values = Some(types::ReturnValue::AllNew);
        let update_expression = write_operation.merge_expression(operation);
        let operation = UpdateItemInput {
            keys,
            update_expression,
            write_operation,
        };
        Ok(Some(operation))
    }

    /// Execute the update item operation and return the item as updated.
    ///
    /// Returns `None` without any request when no field is left to set or remove.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_facade.update_item", skip_all, err)
    )]
    pub async fn send<R, S>(self, storage: &S) -> Result<Option<R>>
    where
        R: DeserializeOwned,
        S: Storage + ?Sized,
    {
        let Some(update_item) = self.into_input()? else {
            #[cfg(feature = "tracing")]
            tracing::debug!("nothing to update");
            return Ok(None);
        };
        storage
            .update_item(update_item)
            .await?
            .map(common::item::unmarshall_item)
            .transpose()
    }
}
