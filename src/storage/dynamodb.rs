use crate::{
    common::item::Item,
    error::{Error, Result},
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
use aws_sdk_dynamodb::{Client, types};
use std::collections;

#[async_trait]
impl Storage for Client {
    async fn get_item(&self, input: GetItemInput) -> Result<Option<Item>> {
        let builder = self.get_item().set_key(Some(input.key));
        let output = crate::apply_single_read_operation!(builder, input.single_read_operation)
            .send()
            .await
            .map_err(|error| Error::backing("get_item", error))?;
        Ok(output.item)
    }

    async fn put_item(&self, input: PutItemInput) -> Result<()> {
        let builder = self.put_item().set_item(Some(input.item));
        crate::apply_write_operation!(builder, input.write_operation)
            .send()
            .await
            .map_err(|error| Error::backing("put_item", error))?;
        Ok(())
    }

    async fn update_item(&self, input: UpdateItemInput) -> Result<Option<Item>> {
        let builder = self
            .update_item()
            .set_key(Some(input.keys))
            .update_expression(input.update_expression);
        let output = crate::apply_write_operation!(builder, input.write_operation)
            .send()
            .await
            .map_err(|error| Error::backing("update_item", error))?;
        Ok(output.attributes)
    }

    async fn delete_item(&self, input: DeleteItemInput) -> Result<()> {
        let builder = self.delete_item().set_key(Some(input.keys));
        crate::apply_write_operation!(builder, input.write_operation)
            .send()
            .await
            .map_err(|error| Error::backing("delete_item", error))?;
        Ok(())
    }

    async fn query(&self, input: QueryInput) -> Result<Page> {
        let builder = self
            .query()
            .key_condition_expression(input.key_condition_expression)
            .set_scan_index_forward(input.scan_index_forward);
        let output = crate::apply_multiple_read_operation!(builder, input.multiple_read_operation)
            .send()
            .await
            .map_err(|error| Error::backing("query", error))?;
        Ok(Page {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key,
        })
    }

    async fn scan(&self, input: ScanInput) -> Result<Page> {
        let builder = self.scan();
        let output = crate::apply_multiple_read_operation!(builder, input.multiple_read_operation)
            .send()
            .await
            .map_err(|error| Error::backing("scan", error))?;
        Ok(Page {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key,
        })
    }

    async fn batch_get_item(&self, input: BatchGetItemInput) -> Result<BatchGetItemOutput> {
        let single_read_operation = input.single_read_operation;
        let keys_and_attributes = types::KeysAndAttributes::builder()
            .set_consistent_read(single_read_operation.consistent_read)
            .set_expression_attribute_names(single_read_operation.expression_attribute_names)
            .set_keys(Some(input.keys))
            .set_projection_expression(single_read_operation.projection_expression)
            .build()?;
        let table_name = single_read_operation.table_name;
        let output = self
            .batch_get_item()
            .set_request_items(Some(collections::HashMap::from([(
                table_name.clone(),
                keys_and_attributes,
            )])))
            .send()
            .await
            .map_err(|error| Error::backing("batch_get_item", error))?;
        let items = output
            .responses
            .and_then(|mut responses| responses.remove(&table_name))
            .unwrap_or_default();
        let unprocessed_keys = output
            .unprocessed_keys
            .and_then(|mut unprocessed| unprocessed.remove(&table_name))
            .map(|keys_and_attributes| keys_and_attributes.keys)
            .unwrap_or_default();
        Ok(BatchGetItemOutput {
            items,
            unprocessed_keys,
        })
    }

    async fn batch_write_item(&self, input: BatchWriteItemInput) -> Result<Vec<types::WriteRequest>> {
        let output = self
            .batch_write_item()
            .set_request_items(Some(collections::HashMap::from([(
                input.table_name.clone(),
                input.requests,
            )])))
            .send()
            .await
            .map_err(|error| Error::backing("batch_write_item", error))?;
        let unprocessed = output
            .unprocessed_items
            .and_then(|mut unprocessed| unprocessed.remove(&input.table_name))
            .unwrap_or_default();
        Ok(unprocessed)
    }
}
