use std::time::Duration;

use serde_json::json;
use weather_core::{
    FetchError, OpenWeatherProvider, Settings, StatusPolicy, WeatherProvider, WeatherQuery,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn provider_for(server: &MockServer, settings: Settings) -> OpenWeatherProvider {
    let settings = settings.with_base_url(format!("{}/data/2.5/weather", server.uri()));
    OpenWeatherProvider::new(settings).expect("provider")
}

#[tokio::test]
async fn success_body_is_returned_unchanged() {
    let server = MockServer::start().await;
    let body = json!({"cod": 200, "main": {"temp": 23.5}, "name": "Cairo"});

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("appid", "KEY"))
        .and(query_param("q", "Cairo"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Settings::new("KEY"));
    let value = provider
        .fetch_weather(&WeatherQuery::default())
        .await
        .expect("fetch");

    assert_eq!(value, body);
}

#[tokio::test]
async fn nested_fields_are_not_touched() {
    let server = MockServer::start().await;
    let body = json!({
        "coord": {"lon": 31.2497, "lat": 30.0626},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 23.5, "feels_like": 22.9, "humidity": 40},
        "visibility": 10000,
        "name": "Cairo",
        "cod": 200
    });

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Settings::new("KEY"));
    let value = provider
        .fetch_weather(&WeatherQuery::new("Cairo"))
        .await
        .expect("fetch");

    assert_eq!(value, body);
}

#[tokio::test]
async fn city_with_spaces_reaches_server_intact() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "New York"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "New York"})))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, Settings::new("KEY"));
    let value = provider
        .fetch_weather(&WeatherQuery::from_input("  New York "))
        .await
        .expect("fetch");

    assert_eq!(value["name"], "New York");
}

#[tokio::test]
async fn provider_error_payload_passes_through_by_default() {
    let server = MockServer::start().await;
    let body = json!({"cod": "404", "message": "city not found"});

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(body.clone()))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Settings::new("KEY"));
    let value = provider
        .fetch_weather(&WeatherQuery::new("Atlantis"))
        .await
        .expect("error payload should be returned, not raised");

    assert_eq!(value, body);
}

#[tokio::test]
async fn strict_policy_turns_error_status_into_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"cod": 401, "message": "Invalid API key."})),
        )
        .mount(&server)
        .await;

    let provider = provider_for(
        &server,
        Settings::new("").with_status_policy(StatusPolicy::Strict),
    );
    let err = provider
        .fetch_weather(&WeatherQuery::default())
        .await
        .unwrap_err();

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid API key."));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Settings::new("KEY"));
    let err = provider
        .fetch_weather(&WeatherQuery::default())
        .await
        .unwrap_err();

    match err {
        FetchError::Decode { status, body, .. } => {
            assert_eq!(status.as_u16(), 502);
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"cod": 200}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let provider = provider_for(
        &server,
        Settings::new("KEY").with_timeout(Duration::from_millis(200)),
    );
    let err = provider
        .fetch_weather(&WeatherQuery::default())
        .await
        .unwrap_err();

    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn connection_failure_propagates() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let settings = Settings::new("KEY").with_base_url(format!("http://{addr}/data/2.5/weather"));
    let provider = OpenWeatherProvider::new(settings).expect("provider");

    let err = provider
        .fetch_weather(&WeatherQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_utf8_body_is_a_decode_error() {
    let server = MockServer::start().await;
    let mut body = br#"{"name": ""#.to_vec();
    body.extend_from_slice(&[0xff, 0xfe]);
    body.extend_from_slice(br#""}"#);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, Settings::new("KEY"));
    let err = provider
        .fetch_weather(&WeatherQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }), "got {err:?}");
}
