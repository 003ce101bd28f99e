//! Item, query and scan tests.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rustdyn_client::options::{
        CreateTableOptions, GetItemOptions, QueryOptions, ScanOptions, WriteOptions, condition,
    };
    use rustdyn_model::types::{ComparisonOperator, ReturnValue, ScalarAttributeType};
    use rustdyn_model::value::item_from_json;
    use rustdyn_model::{KeySpec, UpdateAction, Value};
    use serde_json::json;

    use crate::{cleanup_table, client, create_test_table};

    #[tokio::test]
    #[ignore = "requires live endpoint"]
    async fn test_should_put_get_update_and_delete_item() {
        let client = client();
        let name = create_test_table(&client, "items", CreateTableOptions::default()).await;

        let item = item_from_json(json!({
            "id": "u-1",
            "name": "Ada",
            "visits": 1,
            "tags": ["a", "b"]
        }))
        .unwrap();
        client.put_item(&name, &item, WriteOptions::default()).await.unwrap();

        let (found, _) = client
            .get_item(&name, "u-1", GetItemOptions::default())
            .await
            .unwrap();
        let found = found.unwrap();
        assert_eq!(found["name"], Value::from("Ada"));
        assert_eq!(found["visits"].as_i64(), Some(1));

        let updates = HashMap::from([
            ("visits".to_owned(), UpdateAction::Add(Value::from(2))),
            ("name".to_owned(), UpdateAction::Delete),
        ]);
        let result = client
            .update_item(
                &name,
                "u-1",
                &updates,
                WriteOptions::default().returning(ReturnValue::AllNew),
            )
            .await
            .unwrap();
        let updated = result.attributes.unwrap();
        assert_eq!(updated["visits"].as_i64(), Some(3));
        assert!(!updated.contains_key("name"));

        let err = client
            .put_item(&name, &item, WriteOptions::default().expect_absent("id"))
            .await
            .unwrap_err();
        assert_eq!(
            err.service_error().map(|e| e.error_type.as_str()),
            Some("ConditionalCheckFailedException")
        );

        client.delete_item(&name, "u-1", WriteOptions::default()).await.unwrap();
        let (found, _) = client
            .get_item(&name, "u-1", GetItemOptions::default())
            .await
            .unwrap();
        assert!(found.is_none());

        cleanup_table(&client, &name).await;
    }

    #[tokio::test]
    #[ignore = "requires live endpoint"]
    async fn test_should_query_and_scan() {
        let client = client();
        let options = CreateTableOptions::default()
            .with_hash_key("user", ScalarAttributeType::S)
            .with_range_key("ts", ScalarAttributeType::N);
        let name = create_test_table(&client, "query", options).await;

        for ts in 0..5 {
            let item = item_from_json(json!({"user": "u", "ts": ts, "kind": "event"})).unwrap();
            client.put_item(&name, &item, WriteOptions::default()).await.unwrap();
        }

        let options = QueryOptions {
            range_key_condition: Some(
                condition(ComparisonOperator::Ge, [Value::from(2)]).unwrap(),
            ),
            ..QueryOptions::default()
        };
        let items = client.query_all(&name, "u", options).await.unwrap();
        assert_eq!(items.len(), 3);

        let items = client
            .scan_all(
                &name,
                ScanOptions {
                    limit: Some(2),
                    ..ScanOptions::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(items.len(), 5);

        let (missing, _) = client
            .get_item(&name, KeySpec::composite("u", 99), GetItemOptions::default())
            .await
            .unwrap();
        assert!(missing.is_none());

        cleanup_table(&client, &name).await;
    }
}
