use std::time::Duration;

use pretty_assertions::assert_eq;
use scrapedeck_engine::{
    ApiErrorKind, ApiSettings, JobApi, ReqwestJobApi, ResultsReply, StatusReply, WireItem,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ReqwestJobApi {
    api_with(server, ApiSettings::default())
}

fn api_with(server: &MockServer, settings: ApiSettings) -> ReqwestJobApi {
    ReqwestJobApi::new(ApiSettings {
        base_url: server.uri(),
        ..settings
    })
    .expect("valid base url")
}

#[tokio::test]
async fn start_posts_url_and_returns_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_scrape"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"url": "https://www.olx.in/items/q-car-cover"})))
        .respond_with(
            ResponseTemplate::new(202)
                .set_body_json(json!({"jobid": "5f2c", "message": "Job started"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = api_for(&server)
        .start("https://www.olx.in/items/q-car-cover")
        .await
        .expect("start ok");
    assert_eq!(reply.jobid.as_deref(), Some("5f2c"));
    assert_eq!(reply.message.as_deref(), Some("Job started"));
}

#[tokio::test]
async fn start_rejection_body_is_returned_without_job_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/start_scrape"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "URL is required"})))
        .mount(&server)
        .await;

    let reply = api_for(&server).start("").await.expect("structured reply");
    assert_eq!(reply.jobid, None);
}

#[tokio::test]
async fn status_accepts_items_found_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/j1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "running", "items_found": 7, "jobid": "j1"})),
        )
        .mount(&server)
        .await;

    let reply = api_for(&server).status("j1").await.expect("status ok");
    assert_eq!(
        reply,
        StatusReply {
            status: Some("running".into()),
            count: None,
            items_found: Some(7),
            error: None,
        }
    );
}

#[tokio::test]
async fn status_with_both_count_fields_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/j1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "running", "count": 3, "items_found": 4})),
        )
        .mount(&server)
        .await;

    let reply = api_for(&server).status("j1").await.expect("status ok");
    assert_eq!(reply.count, Some(3));
    assert_eq!(reply.items_found, Some(4));
}

#[tokio::test]
async fn unknown_job_error_body_is_parsed_from_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Unknown job id"})))
        .mount(&server)
        .await;

    let reply = api_for(&server).status("nope").await.expect("structured reply");
    assert_eq!(reply.status, None);
    assert_eq!(reply.error.as_deref(), Some("Unknown job id"));
}

#[tokio::test]
async fn html_error_page_is_an_http_status_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/j1"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw("<h1>Internal Server Error</h1>", "text/html"),
        )
        .mount(&server)
        .await;

    let err = api_for(&server).status("j1").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::HttpStatus(500));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = api_for(&server).results("j1").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Decode);
}

#[tokio::test]
async fn results_items_tolerate_missing_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"title": "Car cover", "price": "₹ 999", "link": "/item/car-cover-iid-1"},
                {"description": "no title here", "link": null}
            ]
        })))
        .mount(&server)
        .await;

    let reply = api_for(&server).results("j1").await.expect("results ok");
    assert_eq!(
        reply,
        ResultsReply {
            results: Some(vec![
                WireItem {
                    title: Some("Car cover".into()),
                    description: None,
                    price: Some("₹ 999".into()),
                    link: Some("/item/car-cover-iid-1".into()),
                },
                WireItem {
                    description: Some("no title here".into()),
                    ..WireItem::default()
                },
            ]),
            error: None,
        }
    );
}

#[tokio::test]
async fn status_times_out_on_slow_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"status": "running"})),
        )
        .mount(&server)
        .await;

    let api = api_with(
        &server,
        ApiSettings {
            request_timeout: Duration::from_millis(50),
            ..ApiSettings::default()
        },
    );
    let err = api.status("slow").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Timeout);
}

#[tokio::test]
async fn download_returns_raw_bytes() {
    let server = MockServer::start().await;
    let csv = "title,price\nCar cover,999\n";
    Mock::given(method("GET"))
        .and(path("/download/j1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(csv, "text/csv"))
        .mount(&server)
        .await;

    let bytes = api_for(&server).download("j1").await.expect("download ok");
    assert_eq!(bytes, csv.as_bytes());
}

#[tokio::test]
async fn download_of_unknown_job_fails_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_string("File not found"))
        .mount(&server)
        .await;

    let err = api_for(&server).download("nope").await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::HttpStatus(404));
    assert!(err.message.contains("File not found"), "{}", err.message);
}

#[tokio::test]
async fn download_rejects_oversized_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/download/big"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let api = api_with(
        &server,
        ApiSettings {
            max_body_bytes: 10,
            ..ApiSettings::default()
        },
    );
    let err = api.download("big").await.unwrap_err();
    assert_eq!(
        err.kind,
        ApiErrorKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}
