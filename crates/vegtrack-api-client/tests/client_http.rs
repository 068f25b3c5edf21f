//! HTTP-level tests for the catalog client against a mock server.

use vegtrack_api_client::{
    ApiError, CatalogClient, ClientConfig, NewCatalogItem, NewPriceRecord, UpdatePriceRecord,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> CatalogClient {
    CatalogClient::new(ClientConfig {
        base_url: server.uri(),
        ..Default::default()
    })
}

#[tokio::test]
async fn search_sends_query_and_parses_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vegetables"))
        .and(query_param("q", "toma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Tomato", "unit": "kg", "latest_price": 12.5},
            {"id": 2, "name": "Tomatillo", "unit": "kg"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let items = client_for(&server).search_items("toma").await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Tomato");
    assert_eq!(items[0].latest_price, Some(12.5));
    assert_eq!(items[1].latest_price, None);
}

#[tokio::test]
async fn bearer_token_is_attached_when_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vegetables"))
        .and(header("Authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.set_bearer(Some("secret-token".to_string()));
    client.list_items().await.unwrap();
}

#[tokio::test]
async fn unauthorized_maps_to_dedicated_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vegetables"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client_for(&server).list_items().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
}

#[tokio::test]
async fn create_item_posts_name_and_unit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vegetables"))
        .and(body_json(
            serde_json::json!({"name": "Tomato", "unit": "kg"}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({"id": 7, "name": "Tomato", "unit": "kg"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server)
        .create_item(&NewCatalogItem {
            name: "Tomato".into(),
            unit: "kg".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 7);
}

#[tokio::test]
async fn create_price_round_trips_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/vegetables/7/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 41,
            "vegetable_id": 7,
            "price": 12.5,
            "currency": "USD",
            "date": "2024-01-01"
        })))
        .mount(&server)
        .await;

    let record = client_for(&server)
        .create_price(
            7,
            &NewPriceRecord {
                price: 12.5,
                date: "2024-01-01".into(),
                currency: "USD".into(),
                market: String::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(record.id, 41);
    assert_eq!(record.vegetable_id, 7);
    assert_eq!(record.market, None);
}

#[tokio::test]
async fn list_prices_accepts_envelope_and_bare_array() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vegetables/7/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "prices": [
                {"id": 1, "vegetable_id": 7, "price": 3.0, "currency": "USD", "date": "2024-01-01"}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/vegetables/8/prices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 2, "vegetable_id": 8, "price": 4.0, "currency": "USD", "date": "2024-01-02"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let enveloped = client.list_prices(7).await.unwrap();
    assert_eq!(enveloped.len(), 1);
    let bare = client.list_prices(8).await.unwrap();
    assert_eq!(bare.len(), 1);
}

#[tokio::test]
async fn update_price_puts_to_price_route() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/prices/41"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 41,
            "vegetable_id": 7,
            "price": 9.75,
            "currency": "USD",
            "date": "2024-01-02"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let updated = client_for(&server)
        .update_price(
            41,
            &UpdatePriceRecord {
                price: 9.75,
                currency: "USD".into(),
                date: "2024-01-02".into(),
                market: String::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price, 9.75);
}

#[tokio::test]
async fn delete_failure_surfaces_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/prices/41"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).delete_price(41).await.unwrap_err();
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn export_reads_filename_from_content_disposition() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vegetables/7/export"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "Content-Disposition",
                    "attachment; filename=vegetable-7-tomato-kg-prices.csv",
                )
                .set_body_string("date,price\n2024-01-01,12.5\n"),
        )
        .mount(&server)
        .await;

    let export = client_for(&server).export_csv(7).await.unwrap();
    assert_eq!(
        export.filename.as_deref(),
        Some("vegetable-7-tomato-kg-prices.csv")
    );
    assert!(export.bytes.starts_with(b"date,price"));
}

#[tokio::test]
async fn export_without_header_has_no_filename() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vegetables/7/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string("date,price\n"))
        .mount(&server)
        .await;

    let export = client_for(&server).export_csv(7).await.unwrap();
    assert_eq!(export.filename, None);
}
