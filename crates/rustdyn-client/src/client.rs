//! The DynamoDB client.
//!
//! Every public operation converts native values to wire form, prefixes
//! table names, sends the request through the retry policy and converts the
//! response back. Composite operations (`list_all_tables`, `scan_all`,
//! `query_all`, `truncate`, the table wait helpers and `recreate_table`)
//! are built from the single-request ones.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use rustdyn_auth::{Credentials, signer_for};
use rustdyn_core::ClientConfig;
use rustdyn_model::codec::updates_from_json;
use rustdyn_model::input::{
    BatchGetItemInput, BatchWriteItemInput, CreateTableInput, DeleteItemInput, DeleteTableInput,
    DescribeTableInput, GetItemInput, ListTablesInput, PutItemInput, QueryInput, ScanInput,
    UpdateItemInput, UpdateTableInput,
};
use rustdyn_model::output::{
    BatchGetItemOutput, BatchWriteItemOutput, CreateTableOutput, DeleteItemOutput,
    DeleteTableOutput, DescribeTableOutput, GetItemOutput, ListTablesOutput, PutItemOutput,
    QueryOutput, ScanOutput, UpdateItemOutput, UpdateTableOutput,
};
use rustdyn_model::types::{
    BatchWriteRequestItems, KeysAndAttributes, ProvisionedThroughput, TableDescription,
    TableStatus, WriteRequest,
};
use rustdyn_model::{
    Item, KeySpec, Operation, UpdateAction, Value, WireItem, parse, stringify, to_keys,
    update_attributes,
};
use rustdyn_sts::{ProvideCredentials, SessionCredentialProvider, StaticCredentials, StsClient};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};
use crate::executor::{Clock, RequestExecutor};
use crate::options::{
    BatchGetMeta, BatchGetRequest, BatchWrite, BatchWriteMeta, CreateTableOptions,
    GetItemOptions, ItemMeta, ListTablesOptions, QueryMeta, QueryOptions, ScanMeta, ScanOptions,
    WaitOptions, WriteOptions, WriteResult,
};
use crate::prefix::TableNamePrefix;
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Most write entries one `BatchWriteItem` request may carry.
pub const MAX_BATCH_WRITE_ENTRIES: usize = 25;

/// Default bound on `BatchWriteItem` resubmission rounds.
pub const DEFAULT_MAX_BATCH_ROUNDS: usize = 16;

/// Default number of `truncate` batches in flight at once.
pub const DEFAULT_TRUNCATE_CONCURRENCY: usize = 4;

/// A DynamoDB client. Cloning is cheap and clones share one connection pool
/// and credential cache.
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<Inner>,
    deadline: Option<Duration>,
}

#[derive(Debug)]
struct Inner {
    executor: RequestExecutor,
    retry: RetryPolicy,
    prefix: TableNamePrefix,
    max_batch_rounds: usize,
    truncate_concurrency: usize,
}

/// Builds a [`Client`] with non-default parts.
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    credentials: Option<Arc<dyn ProvideCredentials>>,
    retry: RetryPolicy,
    max_batch_rounds: usize,
    truncate_concurrency: usize,
    clock: Option<Clock>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("transport", &self.transport)
            .field("credentials", &self.credentials)
            .field("retry", &self.retry)
            .field("max_batch_rounds", &self.max_batch_rounds)
            .field("truncate_concurrency", &self.truncate_concurrency)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Send requests through `transport`.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sign with credentials from `provider` instead of the configured keys.
    #[must_use]
    pub fn credentials(mut self, provider: Arc<dyn ProvideCredentials>) -> Self {
        self.credentials = Some(provider);
        self
    }

    /// Use `policy` for every request.
    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Bound the `BatchWriteItem` resubmission rounds per chunk.
    #[must_use]
    pub fn max_batch_rounds(mut self, rounds: usize) -> Self {
        self.max_batch_rounds = rounds.max(1);
        self
    }

    /// Bound how many delete batches `truncate` sends at once.
    #[must_use]
    pub fn truncate_concurrency(mut self, batches: usize) -> Self {
        self.truncate_concurrency = batches.max(1);
        self
    }

    /// Take signing timestamps from `clock`.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Validate the configuration and assemble the client.
    pub fn build(self) -> ClientResult<Client> {
        self.config.validate()?;
        let config = self.config;

        let http = reqwest::Client::new();
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::new(http.clone())));
        let credentials = self
            .credentials
            .unwrap_or_else(|| default_credentials(&config, http));
        let signer = signer_for(config.signing_scheme, &config.region);

        let mut executor = RequestExecutor::new(
            config.host(),
            &config.endpoint_url(),
            config.api_version.clone(),
            signer,
            credentials,
            transport,
        )?;
        if let Some(clock) = self.clock {
            executor = executor.with_clock(clock);
        }

        info!(
            host = %config.host(),
            scheme = ?config.signing_scheme,
            prefix = config.table_name_prefix.as_deref().unwrap_or(""),
            "created DynamoDB client"
        );
        Ok(Client {
            inner: Arc::new(Inner {
                executor,
                retry: self.retry,
                prefix: TableNamePrefix::new(config.table_name_prefix.as_deref()),
                max_batch_rounds: self.max_batch_rounds,
                truncate_concurrency: self.truncate_concurrency,
            }),
            deadline: None,
        })
    }
}

fn default_credentials(
    config: &ClientConfig,
    http: reqwest::Client,
) -> Arc<dyn ProvideCredentials> {
    let long_lived = Credentials::new(&config.access_key_id, &config.secret_access_key);
    if let Some(token) = &config.security_token {
        return Arc::new(StaticCredentials::new(long_lived.with_session_token(token)));
    }
    if config.session_credentials {
        return Arc::new(SessionCredentialProvider::new(
            long_lived,
            Arc::new(StsClient::new(http)),
        ));
    }
    Arc::new(StaticCredentials::new(long_lived))
}

impl Client {
    /// Create a client from `config` with the default transport and
    /// credential source.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        Self::builder(config).build()
    }

    /// Start building a client from `config`.
    #[must_use]
    pub fn builder(config: ClientConfig) -> ClientBuilder {
        ClientBuilder {
            config,
            transport: None,
            credentials: None,
            retry: RetryPolicy::default(),
            max_batch_rounds: DEFAULT_MAX_BATCH_ROUNDS,
            truncate_concurrency: DEFAULT_TRUNCATE_CONCURRENCY,
            clock: None,
        }
    }

    /// A clone whose requests each fail with
    /// [`ClientError::DeadlineExceeded`] if they take longer than `deadline`,
    /// retries included.
    #[must_use]
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            deadline: Some(deadline),
        }
    }

    /// The table-name prefix in effect.
    #[must_use]
    pub fn table_name_prefix(&self) -> &TableNamePrefix {
        &self.inner.prefix
    }

    async fn call<I, O>(&self, operation: Operation, input: &I) -> ClientResult<O>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let mut params = serde_json::to_value(input)?;
        self.inner.prefix.apply(&mut params);

        let params = &params;
        let executor = &self.inner.executor;
        let attempts = self
            .inner
            .retry
            .run(operation.as_str(), || executor.send(operation, params));
        let mut response = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, attempts)
                .await
                .map_err(|_| ClientError::DeadlineExceeded(deadline))??,
            None => attempts.await?,
        };

        self.inner.prefix.strip(&mut response);
        Ok(serde_json::from_value(response)?)
    }

    // -----------------------------------------------------------------------
    // Tables
    // -----------------------------------------------------------------------

    /// One page of table names.
    pub async fn list_tables(&self, options: ListTablesOptions) -> ClientResult<ListTablesOutput> {
        let input = ListTablesInput {
            exclusive_start_table_name: options.exclusive_start_table_name,
            limit: options.limit,
        };
        self.call(Operation::ListTables, &input).await
    }

    /// Every table name, following pagination.
    pub async fn list_all_tables(&self) -> ClientResult<Vec<String>> {
        let mut names = Vec::new();
        let mut options = ListTablesOptions::default();
        loop {
            let page = self.list_tables(options.clone()).await?;
            names.extend(page.table_names);
            match page.last_evaluated_table_name {
                Some(last) => options.exclusive_start_table_name = Some(last),
                None => return Ok(names),
            }
        }
    }

    /// Describe `table`.
    pub async fn describe_table(&self, table: &str) -> ClientResult<TableDescription> {
        let input = DescribeTableInput {
            table_name: table.to_owned(),
        };
        let output: DescribeTableOutput = self.call(Operation::DescribeTable, &input).await?;
        output.table.ok_or(ClientError::MalformedResponse("Table"))
    }

    /// Create `table`.
    pub async fn create_table(
        &self,
        table: &str,
        options: CreateTableOptions,
    ) -> ClientResult<TableDescription> {
        let input = CreateTableInput {
            table_name: table.to_owned(),
            key_schema: options.key_schema,
            provisioned_throughput: options.throughput,
        };
        let output: CreateTableOutput = self.call(Operation::CreateTable, &input).await?;
        info!(table, "created table");
        output
            .table_description
            .ok_or(ClientError::MalformedResponse("TableDescription"))
    }

    /// Delete `table`.
    pub async fn delete_table(&self, table: &str) -> ClientResult<TableDescription> {
        let input = DeleteTableInput {
            table_name: table.to_owned(),
        };
        let output: DeleteTableOutput = self.call(Operation::DeleteTable, &input).await?;
        info!(table, "deleted table");
        output
            .table_description
            .ok_or(ClientError::MalformedResponse("TableDescription"))
    }

    /// Change the provisioned throughput of `table`.
    pub async fn update_table(
        &self,
        table: &str,
        throughput: ProvisionedThroughput,
    ) -> ClientResult<TableDescription> {
        let input = UpdateTableInput {
            table_name: table.to_owned(),
            provisioned_throughput: throughput,
        };
        let output: UpdateTableOutput = self.call(Operation::UpdateTable, &input).await?;
        output
            .table_description
            .ok_or(ClientError::MalformedResponse("TableDescription"))
    }

    // -----------------------------------------------------------------------
    // Items
    // -----------------------------------------------------------------------

    /// Store `item`, replacing any item with the same key. Empty attributes
    /// are not sent.
    pub async fn put_item(
        &self,
        table: &str,
        item: &Item,
        options: WriteOptions,
    ) -> ClientResult<WriteResult> {
        let input = PutItemInput {
            table_name: table.to_owned(),
            item: stringify(item)?,
            expected: options.expected,
            return_values: options.return_values,
        };
        let output: PutItemOutput = self.call(Operation::PutItem, &input).await?;
        write_result(output.attributes.as_ref(), output.consumed_capacity_units)
    }

    /// Fetch the item with `key`. A missing item is `Ok((None, meta))`.
    pub async fn get_item(
        &self,
        table: &str,
        key: impl Into<KeySpec>,
        options: GetItemOptions,
    ) -> ClientResult<(Option<Item>, ItemMeta)> {
        let input = GetItemInput {
            table_name: table.to_owned(),
            key: to_keys(&key.into())?,
            attributes_to_get: options.attributes_to_get,
            consistent_read: options.consistent_read.then_some(true),
        };
        let output: GetItemOutput = self.call(Operation::GetItem, &input).await?;
        let item = parse(output.item.as_ref())?;
        Ok((
            item,
            ItemMeta {
                consumed_capacity_units: output.consumed_capacity_units,
            },
        ))
    }

    /// Apply `updates` to the item with `key`.
    pub async fn update_item(
        &self,
        table: &str,
        key: impl Into<KeySpec>,
        updates: &HashMap<String, UpdateAction>,
        options: WriteOptions,
    ) -> ClientResult<WriteResult> {
        let input = UpdateItemInput {
            table_name: table.to_owned(),
            key: to_keys(&key.into())?,
            attribute_updates: update_attributes(updates)?,
            expected: options.expected,
            return_values: options.return_values,
        };
        let output: UpdateItemOutput = self.call(Operation::UpdateItem, &input).await?;
        write_result(output.attributes.as_ref(), output.consumed_capacity_units)
    }

    /// [`update_item`](Self::update_item) with updates given as a JSON object
    /// whose values are bare values, `{"put": v}`, `{"add": v}`,
    /// `{"delete": v}` or `{"Action": "DELETE"}`.
    pub async fn update_item_json(
        &self,
        table: &str,
        key: impl Into<KeySpec>,
        updates: serde_json::Value,
        options: WriteOptions,
    ) -> ClientResult<WriteResult> {
        let updates = updates_from_json(updates)?;
        self.update_item(table, key, &updates, options).await
    }

    /// Delete the item with `key`.
    pub async fn delete_item(
        &self,
        table: &str,
        key: impl Into<KeySpec>,
        options: WriteOptions,
    ) -> ClientResult<WriteResult> {
        let input = DeleteItemInput {
            table_name: table.to_owned(),
            key: to_keys(&key.into())?,
            expected: options.expected,
            return_values: options.return_values,
        };
        let output: DeleteItemOutput = self.call(Operation::DeleteItem, &input).await?;
        write_result(output.attributes.as_ref(), output.consumed_capacity_units)
    }

    // -----------------------------------------------------------------------
    // Query & Scan
    // -----------------------------------------------------------------------

    /// One page of items whose hash key equals `hash_key`.
    pub async fn query(
        &self,
        table: &str,
        hash_key: impl Into<Value>,
        options: QueryOptions,
    ) -> ClientResult<(Vec<Item>, QueryMeta)> {
        let input = QueryInput {
            table_name: table.to_owned(),
            hash_key_value: to_keys(&KeySpec::Hash(hash_key.into()))?.hash_key_element,
            range_key_condition: options.range_key_condition,
            attributes_to_get: options.attributes_to_get,
            limit: options.limit,
            consistent_read: options.consistent_read,
            count: options.count,
            scan_index_forward: options.scan_index_forward,
            exclusive_start_key: options.exclusive_start_key,
        };
        let output: QueryOutput = self.call(Operation::Query, &input).await?;
        let items = parse_items(&output.items)?;
        Ok((
            items,
            QueryMeta {
                count: output.count,
                last_evaluated_key: output.last_evaluated_key,
                consumed_capacity_units: output.consumed_capacity_units,
            },
        ))
    }

    /// Every item whose hash key equals `hash_key`, following pagination.
    pub async fn query_all(
        &self,
        table: &str,
        hash_key: impl Into<Value>,
        mut options: QueryOptions,
    ) -> ClientResult<Vec<Item>> {
        let hash_key = hash_key.into();
        let mut items = Vec::new();
        loop {
            let (page, meta) = self.query(table, hash_key.clone(), options.clone()).await?;
            items.extend(page);
            match meta.last_evaluated_key {
                Some(key) => options.exclusive_start_key = Some(key),
                None => return Ok(items),
            }
        }
    }

    /// One page of a table scan.
    pub async fn scan(
        &self,
        table: &str,
        options: ScanOptions,
    ) -> ClientResult<(Vec<Item>, ScanMeta)> {
        let output = self.scan_page(table, options).await?;
        let items = parse_items(&output.items)?;
        Ok((
            items,
            ScanMeta {
                count: output.count,
                scanned_count: output.scanned_count,
                last_evaluated_key: output.last_evaluated_key,
                consumed_capacity_units: output.consumed_capacity_units,
            },
        ))
    }

    /// Every item of a table scan, following pagination.
    pub async fn scan_all(&self, table: &str, options: ScanOptions) -> ClientResult<Vec<Item>> {
        let wire = self.scan_all_wire(table, options).await?;
        parse_items(&wire)
    }

    async fn scan_page(&self, table: &str, options: ScanOptions) -> ClientResult<ScanOutput> {
        let input = ScanInput {
            table_name: table.to_owned(),
            scan_filter: options.scan_filter,
            attributes_to_get: options.attributes_to_get,
            limit: options.limit,
            count: options.count,
            exclusive_start_key: options.exclusive_start_key,
        };
        self.call(Operation::Scan, &input).await
    }

    async fn scan_all_wire(
        &self,
        table: &str,
        mut options: ScanOptions,
    ) -> ClientResult<Vec<WireItem>> {
        let mut items = Vec::new();
        loop {
            let page = self.scan_page(table, options.clone()).await?;
            items.extend(page.items);
            match page.last_evaluated_key {
                Some(key) => options.exclusive_start_key = Some(key),
                None => return Ok(items),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Batch operations
    // -----------------------------------------------------------------------

    /// Fetch items from several tables in one request.
    ///
    /// Returns the items by table plus the keys the service left unprocessed.
    pub async fn batch_get_item(
        &self,
        requests: HashMap<String, BatchGetRequest>,
    ) -> ClientResult<(HashMap<String, Vec<Item>>, BatchGetMeta)> {
        let mut request_items = HashMap::with_capacity(requests.len());
        for (table, request) in requests {
            let keys = request
                .keys
                .iter()
                .map(to_keys)
                .collect::<Result<Vec<_>, _>>()?;
            request_items.insert(
                table,
                KeysAndAttributes {
                    keys,
                    attributes_to_get: request.attributes_to_get,
                },
            );
        }

        let input = BatchGetItemInput { request_items };
        let output: BatchGetItemOutput = self.call(Operation::BatchGetItem, &input).await?;

        let mut items = HashMap::with_capacity(output.responses.len());
        let mut meta = BatchGetMeta {
            unprocessed_keys: output.unprocessed_keys,
            ..BatchGetMeta::default()
        };
        for (table, response) in output.responses {
            items.insert(table.clone(), parse_items(&response.items)?);
            meta.consumed_capacity_units
                .insert(table, response.consumed_capacity_units);
        }
        Ok((items, meta))
    }

    /// Put and delete items across tables.
    ///
    /// Requests with more than [`MAX_BATCH_WRITE_ENTRIES`] entries are split.
    /// Entries the service reports as unprocessed are resubmitted until none
    /// remain, failing with [`ClientError::BatchWriteNotConverged`] after the
    /// configured number of rounds.
    pub async fn batch_write_item(
        &self,
        requests: HashMap<String, Vec<BatchWrite>>,
    ) -> ClientResult<BatchWriteMeta> {
        let mut entries = Vec::new();
        for (table, writes) in requests {
            for write in writes {
                let request = match write {
                    BatchWrite::Put(item) => WriteRequest::put(stringify(&item)?),
                    BatchWrite::Delete(key) => WriteRequest::delete(to_keys(&key)?),
                };
                entries.push((table.clone(), request));
            }
        }

        let mut meta = BatchWriteMeta::default();
        for chunk in chunk_requests(entries, MAX_BATCH_WRITE_ENTRIES) {
            meta.absorb(self.write_until_processed(chunk).await?);
        }
        Ok(meta)
    }

    async fn write_until_processed(
        &self,
        mut pending: BatchWriteRequestItems,
    ) -> ClientResult<BatchWriteMeta> {
        let mut meta = BatchWriteMeta::default();
        while !pending.is_empty() {
            if meta.rounds >= self.inner.max_batch_rounds {
                warn!(rounds = meta.rounds, "batch write did not converge");
                return Err(ClientError::BatchWriteNotConverged {
                    rounds: meta.rounds,
                    unprocessed: pending,
                });
            }
            if meta.rounds > 0 {
                debug!(
                    round = meta.rounds + 1,
                    remaining = pending.values().map(Vec::len).sum::<usize>(),
                    "resubmitting unprocessed items"
                );
            }

            let input = BatchWriteItemInput {
                request_items: pending,
            };
            let output: BatchWriteItemOutput =
                self.call(Operation::BatchWriteItem, &input).await?;
            meta.rounds += 1;
            for (table, response) in output.responses {
                *meta.consumed_capacity_units.entry(table).or_default() +=
                    response.consumed_capacity_units;
            }
            pending = output
                .unprocessed_items
                .into_iter()
                .filter(|(_, writes)| !writes.is_empty())
                .collect();
        }
        Ok(meta)
    }

    /// Delete every item of `table` and return how many were deleted.
    ///
    /// Keys are read with a full scan and deleted in batches no larger than
    /// the table's write capacity (and never more than
    /// [`MAX_BATCH_WRITE_ENTRIES`]). At most
    /// [`ClientBuilder::truncate_concurrency`] batches are in flight at once.
    /// The first failing batch fails the call.
    pub async fn truncate(&self, table: &str) -> ClientResult<usize> {
        let description = self.describe_table(table).await?;
        let schema = description
            .key_schema
            .ok_or(ClientError::MalformedResponse("KeySchema"))?;
        let write_capacity = description
            .provisioned_throughput
            .map_or(MAX_BATCH_WRITE_ENTRIES, |t| {
                usize::try_from(t.write_capacity_units).unwrap_or(1)
            });
        let chunk_size = write_capacity.clamp(1, MAX_BATCH_WRITE_ENTRIES);

        let mut key_names = vec![schema.hash_key_element.attribute_name.clone()];
        if let Some(range) = &schema.range_key_element {
            key_names.push(range.attribute_name.clone());
        }
        let options = ScanOptions {
            attributes_to_get: key_names,
            ..ScanOptions::default()
        };
        let items = self.scan_all_wire(table, options).await?;
        let entries: Vec<_> = items
            .iter()
            .filter_map(|item| schema.key_of(item))
            .map(|key| (table.to_owned(), WriteRequest::delete(key)))
            .collect();
        let deleted = entries.len();

        let chunks = chunk_requests(entries, chunk_size);
        info!(table, items = deleted, batches = chunks.len(), "truncating table");
        stream::iter(chunks)
            .map(|chunk| self.write_until_processed(chunk))
            .buffer_unordered(self.inner.truncate_concurrency)
            .try_collect::<Vec<_>>()
            .await?;
        info!(table, items = deleted, "truncated table");
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Table lifecycle
    // -----------------------------------------------------------------------

    /// Poll until `table` is `ACTIVE`.
    pub async fn wait_for_table_active(
        &self,
        table: &str,
        options: WaitOptions,
    ) -> ClientResult<TableDescription> {
        for poll in 1..=options.max_polls {
            let description = self.describe_table(table).await?;
            if description.table_status == Some(TableStatus::Active) {
                return Ok(description);
            }
            debug!(
                table,
                poll,
                status = ?description.table_status,
                "waiting for table to become active"
            );
            tokio::time::sleep(options.interval).await;
        }
        Err(ClientError::TableWaitTimeout {
            table: table.to_owned(),
            polls: options.max_polls,
        })
    }

    /// Poll until `table` no longer exists.
    pub async fn wait_for_table_deleted(
        &self,
        table: &str,
        options: WaitOptions,
    ) -> ClientResult<()> {
        for poll in 1..=options.max_polls {
            match self.describe_table(table).await {
                Err(err) if err.is_resource_not_found() => return Ok(()),
                Err(err) => return Err(err),
                Ok(description) => {
                    debug!(
                        table,
                        poll,
                        status = ?description.table_status,
                        "waiting for table to be deleted"
                    );
                }
            }
            tokio::time::sleep(options.interval).await;
        }
        Err(ClientError::TableWaitTimeout {
            table: table.to_owned(),
            polls: options.max_polls,
        })
    }

    /// Drop `table` if it exists, create it again and wait until it is
    /// active.
    pub async fn recreate_table(
        &self,
        table: &str,
        options: CreateTableOptions,
        wait: WaitOptions,
    ) -> ClientResult<TableDescription> {
        match self.delete_table(table).await {
            Ok(_) => {}
            Err(err) if err.is_resource_not_found() => {
                debug!(table, "table did not exist");
            }
            Err(err) => return Err(err),
        }
        self.wait_for_table_deleted(table, wait).await?;
        self.create_table(table, options).await?;
        self.wait_for_table_active(table, wait).await
    }
}

fn write_result(
    attributes: Option<&WireItem>,
    consumed: Option<f64>,
) -> ClientResult<WriteResult> {
    Ok(WriteResult {
        attributes: parse(attributes)?,
        consumed_capacity_units: consumed,
    })
}

fn parse_items(items: &[WireItem]) -> ClientResult<Vec<Item>> {
    items
        .iter()
        .map(|item| -> ClientResult<Item> { Ok(parse(Some(item))?.unwrap_or_default()) })
        .collect()
}

/// Group `(table, request)` entries into per-request maps of at most `size`
/// entries each, keeping the input order.
fn chunk_requests(
    entries: Vec<(String, WriteRequest)>,
    size: usize,
) -> Vec<BatchWriteRequestItems> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(entries.len().div_ceil(size));
    let mut current = BatchWriteRequestItems::new();
    let mut count = 0;
    for (table, request) in entries {
        current.entry(table).or_default().push(request);
        count += 1;
        if count == size {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if count > 0 {
        chunks.push(current);
    }
    chunks
}
