//! Concurrent access to the store through the HTTP surface.

use std::collections::HashSet;

use model_server::Record;
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_get_unique_keys() {
    let server = common::start_server(common::VEHICLES).await;
    let client = common::client();

    let concurrency = 20;
    let requests_per_task = 10;

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let url = server.url("/models");
        tasks.push(tokio::spawn(async move {
            let mut keys = Vec::new();
            for i in 0..requests_per_task {
                let res = client
                    .post(&url)
                    .json(&json!({ "task": task, "i": i }))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(res.status(), StatusCode::CREATED);
                keys.push(res.headers()[LOCATION].to_str().unwrap().to_string());
            }
            keys
        }));
    }

    let mut keys = HashSet::new();
    for task in tasks {
        for key in task.await.unwrap() {
            assert!(keys.insert(key), "duplicate key issued");
        }
    }

    assert_eq!(keys.len(), concurrency * requests_per_task);
    assert_eq!(server.store.len(), 3 + concurrency * requests_per_task);

    let res = client.get(server.url("/models")).send().await.unwrap();
    let listed: Vec<String> = serde_json::from_value(res.json::<Value>().await.unwrap()).unwrap();
    assert_eq!(listed.len(), 3 + concurrency * requests_per_task);
    assert_eq!(listed.last().map(String::as_str), Some("203"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_put_delete_same_key() {
    let server = common::start_server(common::VEHICLES).await;
    let client = common::client();

    let mut tasks = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = server.url("/models/1");
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                let res = client.put(&url).json(&json!({ "writer": i })).send().await.unwrap();
                assert_eq!(res.status(), StatusCode::NO_CONTENT);
            } else {
                let res = client.delete(&url).send().await.unwrap();
                assert!(matches!(res.status(), StatusCode::OK | StatusCode::NOT_FOUND));
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    // Whatever interleaving happened, the key is either absent or holds one whole write
    match server.store.get("1") {
        None => {}
        Some(Record::Json(value)) => assert!(value.get("writer").is_some()),
        Some(other) => panic!("unexpected record {other:?}"),
    }
}
