use std::net::SocketAddr;

use petdir_core::{Pet, PetPool};
use petdir_server::{build_router, AppState, AverageAge};
use serde_json::{json, Value};
use tempfile::TempDir;

async fn spawn_server() -> (TempDir, SocketAddr) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pets.db");
    let pool = PetPool::open(path.to_str().expect("utf8 path"), 4).expect("open pool");
    let app = build_router(AppState::new(pool));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    (dir, addr)
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

async fn create(client: &reqwest::Client, addr: SocketAddr, body: Value) -> Pet {
    let resp = client
        .post(url(addr, "/pets"))
        .json(&body)
        .send()
        .await
        .expect("create request");
    assert_eq!(resp.status(), 201);
    resp.json().await.expect("created pet json")
}

#[tokio::test]
async fn create_filter_delete_scenario() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();

    let rex = create(
        &client,
        addr,
        json!({"name": "Rex", "species": "Dog", "age": 4, "owner": "Ana"}),
    )
    .await;
    assert_eq!(rex.name, "Rex");
    assert_eq!(rex.species, "Dog");
    assert_eq!(rex.age, 4.0);
    assert_eq!(rex.owner, "Ana");

    create(
        &client,
        addr,
        json!({"name": "Tom", "species": "Cat", "age": 2, "owner": "Luis"}),
    )
    .await;

    let dogs: Vec<Pet> = client
        .get(url(addr, "/pets?species=Dog"))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("list json");
    assert_eq!(dogs, vec![rex.clone()]);

    let all: Vec<Pet> = client
        .get(url(addr, "/pets"))
        .send()
        .await
        .expect("list all")
        .json()
        .await
        .expect("list all json");
    assert_eq!(all.len(), 2);

    let resp = client
        .delete(url(addr, &format!("/pets/{}", rex.id)))
        .send()
        .await
        .expect("delete");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("delete json");
    assert!(body["message"].is_string());

    let resp = client
        .get(url(addr, &format!("/pets/{}", rex.id)))
        .send()
        .await
        .expect("get deleted");
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.expect("404 json");
    assert!(body["error"].as_str().expect("error message").contains("not found"));
}

#[tokio::test]
async fn new_ids_are_distinct() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();
    let mut ids = Vec::new();
    for name in ["A", "B", "C"] {
        let pet = create(
            &client,
            addr,
            json!({"name": name, "species": "Fish", "age": 1, "owner": "Kim"}),
        )
        .await;
        assert!(!ids.contains(&pet.id));
        ids.push(pet.id);
    }
}

#[tokio::test]
async fn average_age_is_zero_when_empty() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(url(addr, "/pets/stats/average-age"))
        .send()
        .await
        .expect("average")
        .json()
        .await
        .expect("average json");
    assert_eq!(body["average"], json!(0.0));

    for age in [2, 4] {
        create(
            &client,
            addr,
            json!({"name": "P", "species": "Bird", "age": age, "owner": "O"}),
        )
        .await;
    }
    let avg: AverageAge = client
        .get(url(addr, "/pets/stats/average-age"))
        .send()
        .await
        .expect("average")
        .json()
        .await
        .expect("average json");
    assert_eq!(avg.average, 3.0);
}

#[tokio::test]
async fn update_replaces_fields_and_ignores_missing_ids() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();
    let rex = create(
        &client,
        addr,
        json!({"name": "Rex", "species": "Dog", "age": 4, "owner": "Ana"}),
    )
    .await;

    let resp = client
        .put(url(addr, &format!("/pets/{}", rex.id)))
        .json(&json!({"name": "Rex", "species": "Dog", "age": 5, "owner": "Bea"}))
        .send()
        .await
        .expect("update");
    assert_eq!(resp.status(), 200);

    let updated: Pet = client
        .get(url(addr, &format!("/pets/{}", rex.id)))
        .send()
        .await
        .expect("get")
        .json()
        .await
        .expect("get json");
    assert_eq!(updated.age, 5.0);
    assert_eq!(updated.owner, "Bea");

    let resp = client
        .put(url(addr, "/pets/9999"))
        .json(&json!({"name": "Ghost", "species": "Cat", "age": 1, "owner": "None"}))
        .send()
        .await
        .expect("update missing");
    assert_eq!(resp.status(), 200);

    let resp = client
        .delete(url(addr, "/pets/9999"))
        .send()
        .await
        .expect("delete missing");
    assert_eq!(resp.status(), 200);

    let all: Vec<Pet> = client
        .get(url(addr, "/pets"))
        .send()
        .await
        .expect("list")
        .json()
        .await
        .expect("list json");
    assert_eq!(all, vec![updated]);
}

#[tokio::test]
async fn partial_update_body_is_rejected() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .put(url(addr, "/pets/1"))
        .json(&json!({"age": 5}))
        .send()
        .await
        .expect("partial update");
    assert!(resp.status().is_client_error());
    let body: Value = resp.json().await.expect("rejection json");
    assert!(body["error"].as_str().expect("error message").contains("name"));
}

#[tokio::test]
async fn malformed_body_gets_json_error() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(url(addr, "/pets"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("malformed create");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("rejection json");
    assert!(body["error"].is_string());

    let resp = client
        .post(url(addr, "/pets"))
        .body(r#"{"name":"Rex","species":"Dog","age":4,"owner":"Ana"}"#)
        .send()
        .await
        .expect("create without content type");
    assert_eq!(resp.status(), 415);
    let body: Value = resp.json().await.expect("rejection json");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn non_numeric_id_gets_json_error() {
    let (_dir, addr) = spawn_server().await;
    let resp = reqwest::get(url(addr, "/pets/abc")).await.expect("get");
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("rejection json");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn fractional_age_is_accepted() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();
    let kit = create(
        &client,
        addr,
        json!({"name": "Kit", "species": "Cat", "age": 0.5, "owner": "Bo"}),
    )
    .await;
    assert_eq!(kit.age, 0.5);

    let fetched: Value = client
        .get(url(addr, &format!("/pets/{}", kit.id)))
        .send()
        .await
        .expect("get")
        .json()
        .await
        .expect("get json");
    assert_eq!(fetched["age"], json!(0.5));

    let avg: AverageAge = client
        .get(url(addr, "/pets/stats/average-age"))
        .send()
        .await
        .expect("average")
        .json()
        .await
        .expect("average json");
    assert_eq!(avg.average, 0.5);
}

#[tokio::test]
async fn health_reports_pet_count() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();
    create(
        &client,
        addr,
        json!({"name": "Rex", "species": "Dog", "age": 4, "owner": "Ana"}),
    )
    .await;
    let resp = client.get(url(addr, "/health")).send().await.expect("health");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("health json");
    assert_eq!(body, json!({"status": "ok", "pets": 1}));
}

#[tokio::test]
async fn preflight_gets_cors_headers() {
    let (_dir, addr) = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .request(reqwest::Method::OPTIONS, url(addr, "/pets"))
        .send()
        .await
        .expect("preflight");
    assert_eq!(resp.status(), 204);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn store_failure_is_500_with_error_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("pets.db");
    let pool = PetPool::open(path.to_str().expect("utf8 path"), 1).expect("open pool");
    pool.run(|db| {
        db.conn().execute_batch("DROP TABLE pets;")?;
        Ok(())
    })
    .await
    .expect("drop table");

    let app = build_router(AppState::new(pool));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    let resp = reqwest::get(url(addr, "/pets")).await.expect("list");
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.expect("error json");
    assert!(body["error"].as_str().expect("message").contains("no such table"));
}
