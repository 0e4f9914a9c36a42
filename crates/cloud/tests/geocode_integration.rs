//! Integration tests for the geocoding client.
//!
//! Tests marked `#[ignore]` require network access to the public
//! Nominatim instance. Run with:
//! `cargo test -p lattica-cloud -- --ignored`

use lattica_cloud::{GeocoderClient, GeocoderOptions, GeocodingService, LookupOutcome};

fn client() -> GeocoderClient {
    GeocoderClient::new(GeocodingService::Nominatim, GeocoderOptions::default())
        .expect("failed to create client")
}

/// Forward-geocode a well-known place.
#[tokio::test]
#[ignore]
async fn geocode_known_city() {
    let point = client()
        .geocode("London, United Kingdom")
        .await
        .expect("lookup failed")
        .expect("no match for London");

    assert!((point.lat - 51.5).abs() < 0.5, "lat = {}", point.lat);
    assert!(point.lon.abs() < 0.5, "lon = {}", point.lon);
}

/// Reverse-geocode the coordinate back to an address.
#[tokio::test]
#[ignore]
async fn reverse_known_coordinate() {
    let point = client()
        .reverse(-0.1277, 51.5074)
        .await
        .expect("reverse lookup failed");

    let address = point.address.expect("no address components");
    assert_eq!(address.country_code.as_deref(), Some("gb"));
}

/// A batch with a nonsense query keeps going and annotates the failure.
#[tokio::test]
#[ignore]
async fn batch_survives_unmatchable_query() {
    let queries = vec![
        "Paris, France".to_string(),
        "zzzzqqqq-no-such-place-zzzzqqqq".to_string(),
        "Berlin, Germany".to_string(),
    ];
    let results = client().geocode_batch(&queries).await;

    assert_eq!(results.len(), 3);
    assert!(matches!(results[0].outcome, LookupOutcome::Found(_)));
    assert!(matches!(
        results[1].outcome,
        LookupOutcome::NoMatch | LookupOutcome::Failed(_)
    ));
    assert!(matches!(results[2].outcome, LookupOutcome::Found(_)));
}
