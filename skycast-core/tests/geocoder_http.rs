//! Integration tests for the provider-backed geocoder.

use skycast_core::{Config, Geocode, GeocodeError, ProviderGeocoder, ProviderId};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn config_with(providers: &[(ProviderId, &str)]) -> Config {
    let mut cfg = Config::default();
    for (id, key) in providers {
        cfg.upsert_provider_api_key(*id, (*key).to_string());
    }
    cfg
}

#[tokio::test]
async fn openweather_geocoding_is_preferred() {
    let ow = MockServer::start().await;
    let wa = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "London"))
        .and(query_param("limit", "1"))
        .and(query_param("appid", "OW_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "London", "lat": 51.5074, "lon": -0.1278}
        ])))
        .expect(1)
        .mount(&ow)
        .await;

    // WeatherAPI must not be consulted when OpenWeather answers.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&wa)
        .await;

    let geocoder = ProviderGeocoder::from_config(&config_with(&[
        (ProviderId::OpenWeather, "OW_KEY"),
        (ProviderId::WeatherApi, "WA_KEY"),
    ]))
    .with_base_urls(ow.uri(), wa.uri());

    let (lat, lon) = geocoder.resolve("London").await.expect("resolve succeeds");
    assert!((lat - 51.5074).abs() < 1e-6);
    assert!((lon - -0.1278).abs() < 1e-6);
}

#[tokio::test]
async fn empty_openweather_result_falls_through_to_weatherapi() {
    let ow = MockServer::start().await;
    let wa = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&ow)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/search.json"))
        .and(query_param("key", "WA_KEY"))
        .and(query_param("q", "Kyiv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "Kyiv", "lat": 50.45, "lon": 30.52}
        ])))
        .expect(1)
        .mount(&wa)
        .await;

    let geocoder = ProviderGeocoder::from_config(&config_with(&[
        (ProviderId::OpenWeather, "OW_KEY"),
        (ProviderId::WeatherApi, "WA_KEY"),
    ]))
    .with_base_urls(ow.uri(), wa.uri());

    let (lat, lon) = geocoder.resolve("Kyiv").await.expect("resolve succeeds");
    assert!((lat - 50.45).abs() < 1e-6);
    assert!((lon - 30.52).abs() < 1e-6);
}

#[tokio::test]
async fn all_empty_results_fail_with_not_found() {
    let ow = MockServer::start().await;
    let wa = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&ow)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&wa)
        .await;

    let geocoder = ProviderGeocoder::from_config(&config_with(&[
        (ProviderId::OpenWeather, "OW_KEY"),
        (ProviderId::WeatherApi, "WA_KEY"),
    ]))
    .with_base_urls(ow.uri(), wa.uri());

    let err = geocoder.resolve("Atlantis").await.unwrap_err();
    assert!(matches!(err, GeocodeError::NotFound { .. }));
}

#[tokio::test]
async fn unconfigured_geocoder_fails_terminally() {
    let geocoder = ProviderGeocoder::from_config(&Config::default());
    let err = geocoder.resolve("London").await.unwrap_err();
    assert!(matches!(err, GeocodeError::NoProviderConfigured));
}
