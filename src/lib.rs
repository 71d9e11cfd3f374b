#![deny(missing_docs)]

//! # DynamoDB Facade
//!
//! Get, put, update, delete, query, scan and batch operations over DynamoDB tables,
//! without hand-written expression strings.
//!
//! ## Overview
//!
//! Every operation is a plain struct turned into one wire request and sent through
//! a [`storage::Storage`]:
//! - conditions, key conditions, projections and updates compile to expressions
//!   whose names and values are always referenced through placeholders
//! - queries and scans follow continuation tokens until the results are exhausted
//!   or the requested limit is reached
//! - batch operations are chunked to the service limits, sent concurrently, and
//!   every chunk is retried with jittered backoff until nothing is left unprocessed
//! - storage failures surface as one [`error::Error::Backing`] carrying the service message
//!
//! ## Quick Example
//!
//! ```no_run
//! use dynamodb_facade::{common, config, read, storage, write};
//! use indexmap::IndexMap;
//! use serde_json::{Value, json};
//!
//! # async fn example() -> dynamodb_facade::error::Result<()> {
//! let client = storage::connection(&config::ConnectionConfig::from_env("eu-west-1")).await;
//!
//! // "SET #attr0 = :attr0 REMOVE #attr1", only if the item exists
//! let update_item = write::update_item::UpdateItem {
//!     keys: common::key::Keys::partition("id", json!("1")),
//!     fields: IndexMap::from([("name".to_string(), json!("Jane"))]),
//!     remove_fields: vec!["nickname".to_string()],
//!     write_args: write::common::WriteArgs {
//!         condition: vec![common::condition::KeyCondition::new(
//!             "id",
//!             common::condition::Condition::AttributeExists,
//!         )],
//!         table_name: "users".to_string(),
//!     },
//! };
//! let updated: Option<Value> = update_item.send(client).await?;
//!
//! // "#a = :b AND begins_with(#field0, :val0)"
//! let query = read::query::QueryRange {
//!     partition_key: common::key::Key::new("pk", json!("user#1")),
//!     range_key_name: "sk".to_string(),
//!     range_key_value: json!("2024-"),
//!     fuzzy: true,
//!     multiple_read_args: read::common::MultipleReadArgs {
//!         table_name: "events".to_string(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! let events: Vec<Value> = query.send(client).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`mod@common`] - Keys, conditions, selections, backoff and batch dispatch
//! - [`mod@read`] - Read operations (GetItem, Query, Scan, BatchGetItem)
//! - [`mod@write`] - Write operations (PutItem, UpdateItem, DeleteItem, BatchWriteItem)
//! - [`mod@storage`] - The storage seam and the process-wide client
//! - [`mod@config`] - Connection target selection
//!
//! ## Features
//!
//! - `tracing` (default): spans around every operation and retry events.

/// Common utilities for keys, conditions, and attribute selection.
pub mod common;

/// Connection target selection.
pub mod config;

/// Errors.
pub mod error;

/// Read operations for retrieving data from DynamoDB tables.
///
/// This module provides operations for:
/// - Getting individual items by key
/// - Querying items with key conditions
/// - Scanning entire tables
/// - Batch retrieving multiple items
pub mod read;

/// Storage client seam.
pub mod storage;

/// Write operations for modifying data in DynamoDB tables.
///
/// This module provides operations for:
/// - Putting new items or replacing existing ones
/// - Updating items by setting and removing attributes
/// - Deleting items by key
/// - Batch putting or deleting multiple items
pub mod write;
