//! Tests of the reqwest transport against a local mock server.
//!
//! The blocking client must not run on an async worker thread, so every
//! client call happens inside `spawn_blocking`.

use std::net::TcpListener;
use std::time::Duration;

use markus_client::{Args, ClientConfig, MarkusClient, MarkusError};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AREAS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TheatreAreas>
  <TheatreArea><ID>1</ID><Name>Markus Cinema One</Name></TheatreArea>
</TheatreAreas>"#;

const SCHEDULE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Schedule>
  <PubDate>2014-04-27T06:12:41</PubDate>
  <Shows />
</Schedule>"#;

fn test_config(base_url: String) -> ClientConfig {
    ClientConfig::new(base_url)
        .with_timeout(Duration::from_secs(5))
        .with_max_retries(1)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_areas_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xml/TheatreAreas/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(AREAS_XML, "application/xml; charset=utf-8"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/xml", mock_server.uri()));
    let result = tokio::task::spawn_blocking(move || -> markus_client::Result<Value> {
        let client = MarkusClient::from_config(&config)?;
        client.areas(&Args::new())
    })
    .await
    .expect("blocking task panicked")
    .expect("areas request failed");

    assert_eq!(
        result,
        json!({"items": [{"id": 1, "name": "Markus Cinema One"}]})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_query_parameters_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xml/Schedule/"))
        .and(query_param("dt", "05.04.2014"))
        .and(query_param("nrOfDays", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SCHEDULE_XML, "application/xml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/xml/", mock_server.uri()));
    let result = tokio::task::spawn_blocking(move || -> markus_client::Result<Value> {
        let client = MarkusClient::from_config(&config)?;
        let args = json!({"date": "2014-04-05", "days_from_date": 12});
        client.shows(args.as_object().expect("object"))
    })
    .await
    .expect("blocking task panicked")
    .expect("shows request failed");

    assert_eq!(result, json!({"published": "2014-04-27", "items": []}));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xml/Languages/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(format!("{}/xml", mock_server.uri()))
        .with_timeout(Duration::from_secs(5));
    let err = tokio::task::spawn_blocking(move || -> markus_client::Result<Value> {
        let client = MarkusClient::from_config(&config)?;
        client.languages(&Args::new())
    })
    .await
    .expect("blocking task panicked")
    .expect_err("503 must fail");

    assert!(matches!(err, MarkusError::Status { status: 503, .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_connection_refused() {
    // Bind and drop a listener to get a port nothing listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("local addr").port()
    };

    let config = test_config(format!("http://127.0.0.1:{port}/xml"));
    let err = tokio::task::spawn_blocking(move || -> markus_client::Result<Value> {
        let client = MarkusClient::from_config(&config)?;
        client.areas(&Args::new())
    })
    .await
    .expect("blocking task panicked")
    .expect_err("nothing is listening");

    assert!(matches!(err, MarkusError::Transport { .. }));
    assert!(err.is_transport());
}
