//! Storage client seam.
//!
//! Every operation talks to the table through [`Storage`], one method per wire
//! call. The production implementation wraps [`aws_sdk_dynamodb::Client`]; the
//! process-wide client lives in [`connection`].

use crate::{
    common::item::Item,
    error::Result,
    read::{
        batch_get_item::{BatchGetItemInput, BatchGetItemOutput},
        common::Page,
        get_item::GetItemInput,
        query::QueryInput,
        scan::ScanInput,
    },
    write::{
        batch_write_item::BatchWriteItemInput, delete_item::DeleteItemInput,
        put_item::PutItemInput, update_item::UpdateItemInput,
    },
};

use async_trait::async_trait;
use aws_sdk_dynamodb::types;

/// Process-wide client, initialised once.
pub mod connection;

/// [`Storage`] over the AWS SDK client.
pub mod dynamodb;

#[cfg(test)]
pub(crate) mod stub;

pub use connection::connection;

/// One request, one response: the calls the facade needs from the table.
///
/// Implementations report every failure as [`crate::error::Error::Backing`] and
/// never retry on their own.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch one item by primary key.
    async fn get_item(&self, input: GetItemInput) -> Result<Option<Item>>;

    /// Store a full item.
    async fn put_item(&self, input: PutItemInput) -> Result<()>;

    /// Apply an update expression and return the item as updated.
    async fn update_item(&self, input: UpdateItemInput) -> Result<Option<Item>>;

    /// Delete one item by primary key.
    async fn delete_item(&self, input: DeleteItemInput) -> Result<()>;

    /// Fetch one page of a query.
    async fn query(&self, input: QueryInput) -> Result<Page>;

    /// Fetch one page of a scan.
    async fn scan(&self, input: ScanInput) -> Result<Page>;

    /// Get up to 100 items of one table.
    async fn batch_get_item(&self, input: BatchGetItemInput) -> Result<BatchGetItemOutput>;

    /// Write up to 25 requests on one table, returning those left unprocessed.
    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<Vec<types::WriteRequest>>;
}
