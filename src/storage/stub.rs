//! Scripted [`Storage`] for tests.
//!
//! Responses are queued per method and consumed in order; an empty queue answers
//! with an empty success. Every request is recorded.

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
    storage::Storage,
    write::{
        batch_write_item::BatchWriteItemInput, delete_item::DeleteItemInput,
        put_item::PutItemInput, update_item::UpdateItemInput,
    },
};

use async_trait::async_trait;
use aws_sdk_dynamodb::types;
use std::{collections::VecDeque, sync::Mutex};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    GetItem(GetItemInput),
    PutItem(PutItemInput),
    UpdateItem(UpdateItemInput),
    DeleteItem(DeleteItemInput),
    Query(QueryInput),
    Scan(ScanInput),
    BatchGetItem(BatchGetItemInput),
    BatchWriteItem(BatchWriteItemInput),
}

#[derive(Debug, Default)]
pub(crate) struct StubStorage {
    calls: Mutex<Vec<Call>>,
    get_item: Mutex<VecDeque<Result<Option<Item>>>>,
    put_item: Mutex<VecDeque<Result<()>>>,
    update_item: Mutex<VecDeque<Result<Option<Item>>>>,
    delete_item: Mutex<VecDeque<Result<()>>>,
    pages: Mutex<VecDeque<Result<Page>>>,
    batch_get_item: Mutex<VecDeque<Result<BatchGetItemOutput>>>,
    batch_write_item: Mutex<VecDeque<Result<Vec<types::WriteRequest>>>>,
}

fn next<T: Default>(queue: &Mutex<VecDeque<Result<T>>>) -> Result<T> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Ok(T::default()))
}

impl StubStorage {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn push_get_item(&self, response: Result<Option<Item>>) {
        self.get_item.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_put_item(&self, response: Result<()>) {
        self.put_item.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_update_item(&self, response: Result<Option<Item>>) {
        self.update_item.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_delete_item(&self, response: Result<()>) {
        self.delete_item.lock().unwrap().push_back(response);
    }

    /// Queue a page for the next query or scan.
    pub(crate) fn push_page(&self, response: Result<Page>) {
        self.pages.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_batch_get_item(&self, response: Result<BatchGetItemOutput>) {
        self.batch_get_item.lock().unwrap().push_back(response);
    }

    pub(crate) fn push_batch_write_item(&self, response: Result<Vec<types::WriteRequest>>) {
        self.batch_write_item.lock().unwrap().push_back(response);
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Storage for StubStorage {
    async fn get_item(&self, input: GetItemInput) -> Result<Option<Item>> {
        self.record(Call::GetItem(input));
        next(&self.get_item)
    }

    async fn put_item(&self, input: PutItemInput) -> Result<()> {
        self.record(Call::PutItem(input));
        next(&self.put_item)
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<Option<Item>> {
        self.record(Call::UpdateItem(input));
        next(&self.update_item)
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<()> {
        self.record(Call::DeleteItem(input));
        next(&self.delete_item)
    }

    async fn query(&self, input: QueryInput) -> Result<Page> {
        self.record(Call::Query(input));
        next(&self.pages)
    }

    async fn scan(&self, input: ScanInput) -> Result<Page> {
        self.record(Call::Scan(input));
        next(&self.pages)
    }

    async fn batch_get_item(&self, input: BatchGetItemInput) -> Result<BatchGetItemOutput> {
        self.record(Call::BatchGetItem(input));
        next(&self.batch_get_item)
    }

    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<Vec<types::WriteRequest>> {
        self.record(Call::BatchWriteItem(input));
        next(&self.batch_write_item)
    }
}
