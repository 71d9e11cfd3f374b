use crate::{
    common::{self, item::Item},
    error::Result,
    read,
    storage::Storage,
};

use serde::{Serialize, de::DeserializeOwned};

/// Wire request of a GetItem.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItemInput {
    /// Primary key of the item.
    pub key: Item,
    /// Table, consistency and projection.
    pub single_read_operation: read::common::SingleReadInput,
}

/// Get item operation.
///
/// ```rust,no_run
/// use dynamodb_facade::{common, read};
/// use serde_json::Value;
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let get_item = read::get_item::GetItem {
///     keys: common::key::Keys::partition("id", "1".to_string()),
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
/// };
/// let user: Option<Value> = get_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetItem<T> {
    /// The primary key of the item to retrieve.
    pub keys: common::key::Keys<T>,
    /// Additional read operation arguments (table name, consistent read, selection).
    pub single_read_args: read::common::SingleReadArgs,
}

impl<T: Serialize> TryFrom<GetItem<T>> for GetItemInput {
    type Error = crate::error::Error;

    fn try_from(get_item: GetItem<T>) -> Result<Self> {
        let single_read_operation: read::common::SingleReadInput =
            get_item.single_read_args.into();
        let key = get_item.keys.try_into()?;
        let operation = Self {
            key,
            single_read_operation,
        };
        Ok(operation)
    }
}

impl<T: Serialize> GetItem<T> {
    /// Execute the get item operation, `None` when no item has the key.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "dynamodb_facade.get_item", skip_all, err)
    )]
    pub async fn send<R, S>(self, storage: &S) -> Result<Option<R>>
    where
        R: DeserializeOwned,
        S: Storage + ?Sized,
    {
        let get_item: GetItemInput = self.try_into()?;
        storage
            .get_item(get_item)
            .await?
            .map(common::item::unmarshall_item)
            .transpose()
    }
}
