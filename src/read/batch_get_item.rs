use crate::{
    common::{self, backoff, batch, item::Item},
    error::Result,
    read,
    storage::Storage,
};

use serde::{Serialize, de::DeserializeOwned};

/// Wire request of one BatchGetItem chunk, bound to a single table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItemInput {
    /// Keys of the chunk, at most [`batch::BATCH_GET_SIZE`].
    pub keys: Vec<Item>,
    /// Table, consistency and projection, shared by every chunk.
    pub single_read_operation: read::common::SingleReadInput,
}

/// What one BatchGetItem call resolved and what it left for later.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItemOutput {
    /// Items found.
    pub items: Vec<Item>,
    /// Keys the service did not get to.
    pub unprocessed_keys: Vec<Item>,
}

/// Batch get item operation.
///
/// Keys are deduplicated, split into requests of at most 100 keys sent
/// concurrently, and each request is retried with backoff until every key has
/// been processed. Items come back in no particular order.
///
/// ```rust,no_run
/// use dynamodb_facade::{common, read};
/// use serde_json::Value;
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let batch_get = read::batch_get_item::BatchGetItem {
///     keys: vec![
///         common::key::Keys::partition("id", "1".to_string()),
///         common::key::Keys::partition("id", "2".to_string()),
///     ],
///     single_read_args: read::common::SingleReadArgs {
///         table_name: "users".to_string(),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
/// let users: Vec<Value> = batch_get.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchGetItem<T> {
    /// Keys of the items to retrieve; duplicates are requested once.
    pub keys: Vec<common::key::Keys<T>>,
    /// Retry bound for unprocessed keys, unbounded by default.
    pub retry: backoff::RetryPolicy,
    /// Table name, consistent read and selection applied to every request.
    pub single_read_args: read::common::SingleReadArgs,
}

impl<T: Serialize> BatchGetItem<T> {
    /// Execute the batch get item operation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_facade.batch_get_item",
            skip_all,
            fields(table = %self.single_read_args.table_name, keys = self.keys.len()),
            err
        )
    )]
    pub async fn send<R, S>(self, storage: &S) -> Result<Vec<R>>
    where
        R: DeserializeOwned,
        S: Storage + ?Sized,
    {
        let mut keys = Vec::with_capacity(self.keys.len());
        for key in self.keys {
            keys.push(key.try_into()?);
        }
        let keys = batch::deduplicate(keys);
        let single_read_operation: read::common::SingleReadInput = self.single_read_args.into();
        let table_name = single_read_operation.table_name.clone();
        let items = batch::dispatch(
            &table_name,
            keys,
            batch::BATCH_GET_SIZE,
            self.retry,
            |keys| {
                let input = BatchGetItemInput {
                    keys,
                    single_read_operation: single_read_operation.clone(),
                };
                async move {
                    let output = storage.batch_get_item(input).await?;
                    Ok(batch::Attempt {
                        resolved: output.items,
                        unprocessed: output.unprocessed_keys,
                    })
                }
            },
        )
        .await?;
        common::item::unmarshall_items(items)
    }
}
