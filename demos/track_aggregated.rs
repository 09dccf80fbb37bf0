//! Collects attributes for a trip under one aggregation key and sends them as a single event.
//! Replace the placeholders with your RudderStack data plane URL and write key, or keep debug
//! mode on to only log the event.

use cdp_rs::aggregate::{AttributeValue, Attributes, WriteAction};
use cdp_rs::cdp::{RudderConfig, RudderStack, USER_ID_KEY};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RudderConfig::new("https://your-data-plane.example.com", "your-write-key")
        .with_debug(true);
    let cdp = RudderStack::new(config);
    cdp.start()?;

    cdp.identify(Some(Attributes::from([(
        USER_ID_KEY.to_string(),
        AttributeValue::from("example-user"),
    )])))?;

    cdp.aggregate_data("trip_finished", "started_at", "2024-05-01T08:00:00Z", None);
    cdp.aggregate_data("trip_finished", "alerts", 0, None);
    for _ in 0..3 {
        cdp.aggregate_data("trip_finished", "alerts", 1, Some(WriteAction::AddToExisting));
    }
    cdp.aggregate_data("trip_finished", "distance_km", 12.5f64, None);
    cdp.aggregate_data("trip_finished", "distance_km", 4.0f64, Some(WriteAction::AddToExisting));

    if let Some(trip) = cdp.aggregated("trip_finished") {
        println!("Aggregated trip: {trip:?}");
    }
    cdp.track_aggregated("trip_finished")?;

    Ok(())
}
