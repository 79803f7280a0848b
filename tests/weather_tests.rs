mod common;

use axum::{
    Json, Router,
    body::Body,
    extract::Query,
    http::{Request, StatusCode},
    routing::get,
};
use common::{MockRepo, test_state};
use morva_hr::{
    WeatherClient, create_router,
    weather::{CurrentWeather, WeatherCondition, WeatherReport, classify_weather_code},
};
use serde_json::{Value, json};
use std::{collections::HashMap, time::Duration};
use tokio::net::TcpListener;
use tower::ServiceExt;

// --- Stub Open-Meteo server ---

async fn forecast(Query(params): Query<HashMap<String, String>>) -> Result<Json<Value>, StatusCode> {
    if params.get("current_weather").map(String::as_str) != Some("true")
        || !params.contains_key("latitude")
        || !params.contains_key("longitude")
    {
        return Err(StatusCode::BAD_REQUEST);
    }
    Ok(Json(json!({
        "latitude": 35.7,
        "longitude": 51.4,
        "current_weather": {
            "temperature": 18.4,
            "windspeed": 7.2,
            "winddirection": 250,
            "weathercode": 61,
            "time": "2026-10-16T09:00"
        }
    })))
}

async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

// --- Classification ---

#[test]
fn test_classify_weather_code_buckets() {
    let cases = [
        (0, WeatherCondition::Clear),
        (1, WeatherCondition::PartlyCloudy),
        (2, WeatherCondition::PartlyCloudy),
        (3, WeatherCondition::Overcast),
        (45, WeatherCondition::Fog),
        (48, WeatherCondition::Fog),
        (51, WeatherCondition::Drizzle),
        (57, WeatherCondition::Drizzle),
        (61, WeatherCondition::Rain),
        (67, WeatherCondition::Rain),
        (71, WeatherCondition::Snow),
        (77, WeatherCondition::Snow),
        (80, WeatherCondition::RainShowers),
        (82, WeatherCondition::RainShowers),
        (85, WeatherCondition::SnowShowers),
        (86, WeatherCondition::SnowShowers),
        (95, WeatherCondition::Thunderstorm),
        (99, WeatherCondition::Thunderstorm),
    ];
    for (code, expected) in cases {
        assert_eq!(classify_weather_code(code), expected, "code {code}");
    }
}

#[test]
fn test_unassigned_codes_are_unknown() {
    for code in [-1, 4, 44, 50, 58, 68, 78, 83, 87, 94, 100] {
        assert_eq!(classify_weather_code(code), WeatherCondition::Unknown, "code {code}");
    }
}

#[test]
fn test_report_carries_label_and_icon() {
    let report = WeatherReport::from(CurrentWeather {
        temperature: -3.0,
        windspeed: 12.5,
        weathercode: 73,
        time: "2026-01-10T07:00".to_string(),
    });

    assert_eq!(report.condition, WeatherCondition::Snow);
    assert_eq!(report.label, "Snow");
    assert_eq!(report.icon, "snowflake");
    assert_eq!(report.observed_at, "2026-01-10T07:00");
}

// --- Client ---

#[tokio::test]
async fn test_client_fetches_current_weather() {
    let base = spawn_stub(Router::new().route("/v1/forecast", get(forecast))).await;
    // Trailing slash is tolerated.
    let client = WeatherClient::new(&format!("{}/", base), 35.6892, 51.3890);
    assert_eq!(client.forecast_url(), format!("{}/v1/forecast", base));

    let report = client.current().await.unwrap();

    assert_eq!(report.temperature_c, 18.4);
    assert_eq!(report.wind_speed_kmh, 7.2);
    assert_eq!(report.weather_code, 61);
    assert_eq!(report.condition, WeatherCondition::Rain);
}

#[tokio::test]
async fn test_client_surfaces_upstream_errors() {
    let base = spawn_stub(Router::new().route(
        "/v1/forecast",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    ))
    .await;
    let client = WeatherClient::new(&base, 0.0, 0.0);

    assert!(client.current().await.is_err());
}

#[tokio::test]
async fn test_client_gives_up_on_slow_upstream() {
    let base = spawn_stub(Router::new().route(
        "/v1/forecast",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK
        }),
    ))
    .await;
    let client = WeatherClient::new(&base, 0.0, 0.0).with_timeout(Duration::from_millis(200));

    let result = tokio::time::timeout(Duration::from_secs(5), client.current())
        .await
        .expect("client should time out on its own");

    assert!(result.unwrap_err().is_timeout());
}

// --- Endpoint ---

#[tokio::test]
async fn test_weather_endpoint_is_public_and_maps_failure_to_bad_gateway() {
    // The test state points the client at a closed port.
    let app = create_router(test_state(MockRepo::default()));

    let response = app
        .oneshot(Request::builder().uri("/api/weather").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_weather_endpoint_reports_bad_gateway_when_upstream_hangs() {
    let base = spawn_stub(Router::new().route(
        "/v1/forecast",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK
        }),
    ))
    .await;
    let mut state = test_state(MockRepo::default());
    state.weather = WeatherClient::new(&base, 35.6892, 51.3890).with_timeout(Duration::from_millis(200));

    let response = tokio::time::timeout(
        Duration::from_secs(5),
        create_router(state)
            .oneshot(Request::builder().uri("/api/weather").body(Body::empty()).unwrap()),
    )
    .await
    .expect("endpoint should answer before the upstream does")
    .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_weather_endpoint_returns_report() {
    let base = spawn_stub(Router::new().route("/v1/forecast", get(forecast))).await;
    let mut state = test_state(MockRepo::default());
    state.weather = WeatherClient::new(&base, 35.6892, 51.3890);

    let response = create_router(state)
        .oneshot(Request::builder().uri("/api/weather").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let report: WeatherReport = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report.label, "Rain");
}
