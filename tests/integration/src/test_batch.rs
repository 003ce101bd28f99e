//! Batch and truncate tests.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rustdyn_client::options::{BatchGetRequest, BatchWrite, CreateTableOptions, ScanOptions};
    use rustdyn_model::value::item_from_json;
    use serde_json::json;

    use crate::{cleanup_table, client, create_test_table};

    #[tokio::test]
    #[ignore = "requires live endpoint"]
    async fn test_should_batch_write_get_and_truncate() -> anyhow::Result<()> {
        let client = client();
        let name = create_test_table(
            &client,
            "batch",
            CreateTableOptions::default().with_throughput(5, 10),
        )
        .await;

        let writes = (0..40)
            .map(|i| item_from_json(json!({"id": format!("k{i}"), "n": i})).map(BatchWrite::Put))
            .collect::<Result<Vec<_>, _>>()?;
        let meta = client
            .batch_write_item(HashMap::from([(name.clone(), writes)]))
            .await?;
        assert!(meta.rounds >= 2);

        let (items, _) = client
            .batch_get_item(HashMap::from([(
                name.clone(),
                BatchGetRequest::new(["k1", "k2", "k3"]),
            )]))
            .await?;
        assert_eq!(items[&name].len(), 3);

        assert_eq!(client.truncate(&name).await?, 40);
        assert!(client.scan_all(&name, ScanOptions::default()).await?.is_empty());

        cleanup_table(&client, &name).await;
        Ok(())
    }
}
