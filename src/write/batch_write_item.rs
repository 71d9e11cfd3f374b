use crate::{
    common::{self, backoff, batch},
    error::{Error, Result},
    storage::Storage,
};

use aws_sdk_dynamodb::types;
use serde::Serialize;

/// Wire request of one BatchWriteItem chunk, bound to a single table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItemInput {
    /// Put and delete requests of the chunk, at most [`batch::BATCH_WRITE_SIZE`].
    pub requests: Vec<types::WriteRequest>,
    /// Target table.
    pub table_name: String,
}

/// A single request within a batch write operation.
#[derive(Clone, Debug, PartialEq)]
pub enum BatchWriteItemRequest<T> {
    /// Creates or replaces an item.
    PutItem(T),
    /// Removes an item by its primary key.
    DeleteItem(common::key::Keys<T>),
}

impl<T: Serialize> TryFrom<BatchWriteItemRequest<T>> for types::WriteRequest {
    type Error = Error;

    fn try_from(write_request: BatchWriteItemRequest<T>) -> Result<Self> {
        let builder = match write_request {
            BatchWriteItemRequest::PutItem(item) => {
                let item = common::item::marshall_item(&item)?;
                let put_request = types::PutRequest::builder().set_item(Some(item)).build()?;
                Self::builder().set_put_request(Some(put_request))
            }
            BatchWriteItemRequest::DeleteItem(keys) => {
                let keys = keys.try_into()?;
                let delete_request = types::DeleteRequest::builder()
                    .set_key(Some(keys))
                    .build()?;
                Self::builder().set_delete_request(Some(delete_request))
            }
        };
        let request = builder.build();
        Ok(request)
    }
}

/// Batch write item operation.
///
/// Requests are split into groups of at most 25 sent concurrently; each group is
/// retried with backoff until the service has processed all of its requests.
///
/// ```rust,no_run
/// use dynamodb_facade::write;
/// use serde_json::json;
///
/// # async fn example(client: &aws_sdk_dynamodb::Client) -> dynamodb_facade::error::Result<()> {
/// let batch_put = write::batch_write_item::BatchWriteItem::put(
///     "users",
///     [json!({"id": "1", "name": "John"}), json!({"id": "2", "name": "Jane"})],
/// );
/// batch_put.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchWriteItem<T> {
    /// Put and delete requests, in any mix.
    pub requests: Vec<BatchWriteItemRequest<T>>,
    /// Retry bound for unprocessed requests, unbounded by default.
    pub retry: backoff::RetryPolicy,
    /// The name of the table to write to.
    pub table_name: String,
}

impl<T> BatchWriteItem<T> {
    /// Put every item of `items`.
    pub fn put(table_name: impl Into<String>, items: impl IntoIterator<Item = T>) -> Self {
        Self {
            requests: items
                .into_iter()
                .map(BatchWriteItemRequest::PutItem)
                .collect(),
            retry: backoff::RetryPolicy::default(),
            table_name: table_name.into(),
        }
    }

    /// Delete every item identified by `keys`.
    pub fn delete(
        table_name: impl Into<String>,
        keys: impl IntoIterator<Item = common::key::Keys<T>>,
    ) -> Self {
        Self {
            requests: keys
                .into_iter()
                .map(BatchWriteItemRequest::DeleteItem)
                .collect(),
            retry: backoff::RetryPolicy::default(),
            table_name: table_name.into(),
        }
    }
}

impl<T: Serialize> BatchWriteItem<T> {
    /// Execute the batch write item operation.
    ///
    /// Succeeds once every request has been processed.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_facade.batch_write_item",
            skip_all,
            fields(table = %self.table_name, requests = self.requests.len()),
            err
        )
    )]
    pub async fn send<S>(self, storage: &S) -> Result<()>
    where
        S: Storage + ?Sized,
    {
        let mut requests = Vec::with_capacity(self.requests.len());
        for request in self.requests {
            requests.push(types::WriteRequest::try_from(request)?);
        }
        let table_name = self.table_name;
        batch::dispatch(
            &table_name,
            requests,
            batch::BATCH_WRITE_SIZE,
            self.retry,
            |requests| {
                let input = BatchWriteItemInput {
                    requests,
                    table_name: table_name.clone(),
                };
                async move {
                    let unprocessed = storage.batch_write_item(input).await?;
                    Ok(batch::Attempt::<_, ()> {
                        resolved: Vec::new(),
                        unprocessed,
                    })
                }
            },
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::stub::{Call, StubStorage};

    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case::put(
        BatchWriteItemRequest::PutItem(
            json!(
                {
                    "a": "b"
                }
            )
        ),
        types::WriteRequest::builder()
            .set_put_request(
                Some(
                    types::PutRequest::builder()
                        .set_item(
                            Some(
                                common::item::Item::from(
                                    [(
                                        "a".to_string(),
                                        types::AttributeValue::S(
                                            "b".to_string()
                                        ),
                                    )]
                                )
                            )
                        )
                        .build()
                        .unwrap()
                )
            )
            .build()
    )]
    #[case::delete(
        BatchWriteItemRequest::DeleteItem(
            common::key::Keys::partition(
                "c",
                Value::String(
                    "d".to_string()
                )
            )
        ),
        types::WriteRequest::builder()
            .set_delete_request(
                Some(
                    types::DeleteRequest::builder()
                        .set_key(
                            Some(
                                common::item::Item::from(
                                    [(
                                        "c".to_string(),
                                        types::AttributeValue::S(
                                            "d".to_string()
                                        ),
                                    )]
                                )
                            )
                        )
                        .build()
                        .unwrap()
                )
            )
            .build()
    )]
    fn test_write_request(
        #[case] request: BatchWriteItemRequest<Value>,
        #[case] expected: types::WriteRequest,
    ) {
        let actual: types::WriteRequest = request.try_into().unwrap();
        assert_eq!(actual, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_drains_unprocessed() {
        let items: Vec<Value> = (0..25).map(|id| json!({ "id": id })).collect();
        let batch_put = BatchWriteItem::put("users", items);
        let requests: Vec<types::WriteRequest> = batch_put
            .requests
            .iter()
            .cloned()
            .map(|request| request.try_into().unwrap())
            .collect();
        let storage = StubStorage::default();
        storage.push_batch_write_item(Ok(requests[22..].to_vec()));
        storage.push_batch_write_item(Ok(Vec::new()));
        let start = tokio::time::Instant::now();
        batch_put.send(&storage).await.unwrap();
        assert!(start.elapsed() >= backoff::BASE_DELAY);
        let calls = storage.calls();
        let [Call::BatchWriteItem(first), Call::BatchWriteItem(retry)] = &calls[..] else {
            panic!("expected two batch write calls, got {calls:?}");
        };
        assert_eq!(first.requests, requests);
        assert_eq!(retry.requests, requests[22..].to_vec());
        assert_eq!(retry.table_name, "users");
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_chunks_requests() {
        let keys = (0..60).map(|id| common::key::Keys::partition("id", id));
        let batch_delete = BatchWriteItem::delete("users", keys);
        let storage = StubStorage::default();
        batch_delete.send(&storage).await.unwrap();
        let mut sizes: Vec<usize> = storage
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::BatchWriteItem(input) => input.requests.len(),
                call => panic!("unexpected call {call:?}"),
            })
            .collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![10, 25, 25]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_retry_ceiling() {
        let batch_put = BatchWriteItem {
            retry: backoff::RetryPolicy::bounded(1),
            ..BatchWriteItem::put("users", [json!({"id": 1})])
        };
        let unprocessed: types::WriteRequest =
            BatchWriteItemRequest::PutItem(json!({"id": 1})).try_into().unwrap();
        let storage = StubStorage::default();
        storage.push_batch_write_item(Ok(vec![unprocessed.clone()]));
        storage.push_batch_write_item(Ok(vec![unprocessed]));
        let error = batch_put.send(&storage).await.unwrap_err();
        assert!(matches!(
            error,
            Error::UnprocessedRemaining { ref table, remaining: 1 } if table == "users"
        ));
        assert_eq!(storage.calls().len(), 2);
    }
}
