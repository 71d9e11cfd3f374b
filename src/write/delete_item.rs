use crate::{
    common::{self, item::Item},
    error::{Error, Result},
    storage::Storage,
    write,
};

use serde::Serialize;

/// Wire request of a DeleteItem.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteItemInput {
    /// Primary key of the item to delete.
    pub keys: Item,
    /// Table, condition and placeholders.
    pub write_operation: write::common::WriteInput,
}

/// Delete item operation.
///
/// ```rust,no_run
/// use dynamodb_facade::{common, write};
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let delete_item = write::delete_item::DeleteItem {
///     keys: common::key::Keys::partition("id", "1".to_string()),
///     write_args: write::common::WriteArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// delete_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeleteItem<T> {
    /// The primary key of the item to delete.
    pub keys: common::key::Keys<T>,
    /// Additional write operation arguments (table name, condition).
    pub write_args: write::common::WriteArgs<T>,
}

impl<T: Serialize> TryFrom<DeleteItem<T>> for DeleteItemInput {
    type Error = Error;

    fn try_from(delete_item: DeleteItem<T>) -> Result<Self> {
        let keys = delete_item.keys.try_into()?;
        let write_operation: write::common::WriteInput = delete_item.write_args.try_into()?;
        let operation = Self {
            keys,
            write_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> DeleteItem<T> {
    /// Execute the delete item operation.
    ///
    /// Deleting a missing item succeeds unless a condition says otherwise.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_facade.delete_item", skip_all, err)
    )]
    pub async fn send<S>(self, storage: &S) -> Result<()>
    where
        S: Storage + ?Sized,
    {
        let delete_item: DeleteItemInput = self.try_into()?;
        storage.delete_item(delete_item).await
    }
}
