use weather_notify_core::{Coordinates, OpenWeatherClient, WeatherError, WeatherProvider};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

const LONDON: &str = r#"
{
  "coord": { "lon": -0.1257, "lat": 51.5085 },
  "weather": [ { "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" } ],
  "main": { "temp": 21.34, "feels_like": 20.87, "humidity": 40, "pressure": 1021 },
  "wind": { "speed": 3.2, "deg": 250 },
  "name": "London"
}
"#;

fn client(server: &MockServer) -> OpenWeatherClient {
    OpenWeatherClient::with_base_url(Some("KEY".to_string()), server.uri()).expect("client")
}

fn coord(lat: f64, lon: f64) -> Coordinates {
    Coordinates { lat, lon }
}

async fn mount_weather(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_alerts(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/onecall"))
        .respond_with(template)
        .mount(server)
        .await;
}

fn json(body: impl AsRef<str>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_ref().to_owned(), "application/json")
}

#[tokio::test]
async fn current_weather_is_extracted_and_rounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "KEY"))
        .and(query_param("units", "metric"))
        .respond_with(json(LONDON))
        .expect(1)
        .mount(&server)
        .await;

    let reading = client(&server).current("London").await.expect("reading");

    assert_eq!(reading.code, 800);
    assert_eq!(reading.description, "Clear sky");
    assert_eq!(reading.temperature_c, 21.3);
    assert_eq!(reading.feels_like_c, 20.9);
    assert_eq!(reading.humidity_pct, 40);
    assert_eq!(reading.wind_speed_mps, 3.2);
    assert_eq!(reading.coord, coord(51.5085, -0.1257));
}

#[tokio::test]
async fn non_success_status_names_the_city() {
    let server = MockServer::start().await;
    let body = r#"{"cod":"404","message":"city not found"}"#;
    mount_weather(
        &server,
        ResponseTemplate::new(404).set_body_raw(body, "application/json"),
    )
    .await;

    let err = client(&server).current("Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::Unavailable { .. }));
    assert_eq!(err.to_string(), "Could not retrieve weather data for Atlantis");
}

#[tokio::test]
async fn missing_wind_block_is_invalid_format() {
    let server = MockServer::start().await;
    let body = r#"{
        "coord": { "lon": -0.12, "lat": 51.5 },
        "weather": [ { "id": 800, "description": "clear sky" } ],
        "main": { "temp": 21.3, "feels_like": 20.9, "humidity": 40 }
    }"#;
    mount_weather(&server, json(body)).await;

    let err = client(&server).current("London").await.unwrap_err();

    assert!(err.to_string().contains("Invalid weather data format"));
}

#[tokio::test]
async fn undecodable_body_is_a_processing_error() {
    let server = MockServer::start().await;
    mount_weather(&server, json(r#"{"weather": "sunny"}"#)).await;

    let err = client(&server).current("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Processing(_)));
    assert!(err.to_string().starts_with("Error processing weather data"));
}

#[tokio::test]
async fn connection_failure_is_a_network_error() {
    // Nothing listens on the discard port.
    let client = OpenWeatherClient::with_base_url(Some("KEY".to_string()), "http://127.0.0.1:9")
        .expect("client");
    let err = client.current("London").await.unwrap_err();

    assert!(matches!(err, WeatherError::Network(_)));
    assert!(err.to_string().starts_with("Error fetching weather data"));
    assert!(!err.to_string().contains("appid"), "{err}");
}

#[tokio::test]
async fn alerts_request_excludes_detail_blocks() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/onecall"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .and(query_param("exclude", "minutely,hourly,daily"))
        .and(query_param("appid", "KEY"))
        .respond_with(json(
            r#"{"alerts": [{"event": "Flood Warning", "description": "River levels rising"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let block = client(&server).alert_block(coord(51.5, -0.12)).await;

    assert_eq!(block, "\n\n⚠️ Flood Warning: River levels rising");
}

#[tokio::test]
async fn unauthorized_alerts_yield_nothing() {
    let server = MockServer::start().await;
    mount_alerts(&server, ResponseTemplate::new(401)).await;

    let block = client(&server).alert_block(coord(1.0, 2.0)).await;
    assert_eq!(block, "");
}

#[tokio::test]
async fn server_error_on_alerts_yields_nothing() {
    let server = MockServer::start().await;
    mount_alerts(&server, ResponseTemplate::new(500)).await;

    let c = client(&server);
    assert!(c.fetch_alerts(coord(1.0, 2.0)).await.is_err());
    assert_eq!(c.alert_block(coord(1.0, 2.0)).await, "");
}

#[tokio::test]
async fn empty_or_absent_alert_list_yields_nothing() {
    for body in [r#"{"alerts": []}"#, r#"{"current": {}}"#] {
        let server = MockServer::start().await;
        mount_alerts(&server, json(body)).await;

        let block = client(&server).alert_block(coord(1.0, 2.0)).await;
        assert_eq!(block, "", "body {body}");
    }
}

#[tokio::test]
async fn long_alert_description_is_truncated() {
    let server = MockServer::start().await;
    let description = "a".repeat(150);
    let body = format!(r#"{{"alerts": [{{"description": "{description}"}}]}}"#);
    mount_alerts(&server, json(body)).await;

    let block = client(&server).alert_block(coord(1.0, 2.0)).await;

    assert_eq!(block, format!("\n\n⚠️ Weather Alert: {}...", "a".repeat(100)));
}

#[tokio::test]
async fn missing_api_key_skips_alerts_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::with_base_url(None, server.uri()).expect("client");
    assert_eq!(client.alert_block(coord(1.0, 2.0)).await, "");
    assert!(matches!(
        client.current("London").await,
        Err(WeatherError::MissingApiKey)
    ));
}
