//! Table lifecycle tests.

#[cfg(test)]
mod tests {
    use rustdyn_client::options::CreateTableOptions;
    use rustdyn_model::types::{ProvisionedThroughput, ScalarAttributeType, TableStatus};

    use crate::{cleanup_table, client, create_test_table, test_table_name, wait_options};

    #[tokio::test]
    #[ignore = "requires live endpoint"]
    async fn test_should_create_describe_and_delete_table() {
        let client = client();
        let options = CreateTableOptions::default()
            .with_hash_key("pk", ScalarAttributeType::S)
            .with_range_key("sk", ScalarAttributeType::N)
            .with_throughput(5, 5);
        let name = create_test_table(&client, "lifecycle", options).await;

        let description = client.describe_table(&name).await.unwrap();
        assert_eq!(description.table_name, name);
        assert_eq!(description.table_status, Some(TableStatus::Active));
        let schema = description.key_schema.unwrap();
        assert_eq!(schema.hash_key_element.attribute_name, "pk");
        assert_eq!(schema.range_key_element.unwrap().attribute_name, "sk");

        assert!(client.list_all_tables().await.unwrap().contains(&name));

        cleanup_table(&client, &name).await;
        let err = client.describe_table(&name).await.unwrap_err();
        assert!(err.is_resource_not_found());
    }

    #[tokio::test]
    #[ignore = "requires live endpoint"]
    async fn test_should_update_throughput() {
        let client = client();
        let name = create_test_table(&client, "throughput", CreateTableOptions::default()).await;

        client
            .update_table(
                &name,
                ProvisionedThroughput {
                    read_capacity_units: 20,
                    write_capacity_units: 10,
                },
            )
            .await
            .unwrap();
        let description = client.wait_for_table_active(&name, wait_options()).await.unwrap();
        let throughput = description.provisioned_throughput.unwrap();
        assert_eq!(throughput.read_capacity_units, 20);
        assert_eq!(throughput.write_capacity_units, 10);

        cleanup_table(&client, &name).await;
    }

    #[tokio::test]
    #[ignore = "requires live endpoint"]
    async fn test_should_recreate_table() {
        let client = client();
        let name = test_table_name("recreate");
        let table = client
            .recreate_table(&name, CreateTableOptions::default(), wait_options())
            .await
            .unwrap();
        assert_eq!(table.table_status, Some(TableStatus::Active));

        cleanup_table(&client, &name).await;
    }
}
