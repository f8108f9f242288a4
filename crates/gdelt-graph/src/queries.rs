//! Analytical queries against the loaded event graph.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::store::{GraphStore, JsonMap, StoreError};

/// Events above a Goldstein-scale threshold, joined to their actor and
/// (when present) location via a one-hop outbound traversal.
const HIGH_INTENSITY_AQL: &str = r#"
WITH Events, Actors, Locations, EventRelations
FOR event IN Events
    FILTER event.goldsteinScale > @min
    LET actor = (
        FOR v IN 1..1 OUTBOUND event EventRelations
            FILTER IS_SAME_COLLECTION("Actors", v)
            RETURN v
    )[0]
    LET location = (
        FOR v IN 1..1 OUTBOUND event EventRelations
            FILTER IS_SAME_COLLECTION("Locations", v)
            RETURN v
    )[0]
    RETURN {
        eventID: event._key,
        goldsteinScale: event.goldsteinScale,
        eventCode: event.eventCode,
        eventDate: event.date,
        actor: {
            type1Code: actor.type1Code,
            type2Code: actor.type2Code,
            countryCode: actor.countryCode
        },
        location: location ? {
            fullname: location.fullname,
            countryCode: location.countryCode,
            coordinates: [location.latitude, location.longitude]
        } : null
    }
"#;

/// Actor context joined to a high-intensity event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    #[serde(rename = "type1Code")]
    pub type1_code: Option<String>,
    #[serde(rename = "type2Code")]
    pub type2_code: Option<String>,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
}

/// Location context joined to a high-intensity event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationContext {
    pub fullname: Option<String>,
    #[serde(rename = "countryCode")]
    pub country_code: Option<String>,
    /// `[latitude, longitude]`
    pub coordinates: [Option<f64>; 2],
}

/// One result row of the high-intensity query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighIntensityEvent {
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(rename = "goldsteinScale")]
    pub goldstein_scale: Option<f64>,
    #[serde(rename = "eventCode")]
    pub event_code: Option<String>,
    #[serde(rename = "eventDate")]
    pub event_date: Option<i64>,
    pub actor: ActorContext,
    pub location: Option<LocationContext>,
}

/// Fetch events whose intensity score exceeds `min_goldstein`, with their
/// row-derived actor and location context.
pub async fn high_intensity_events(
    store: &dyn GraphStore,
    min_goldstein: f64,
) -> Result<Vec<HighIntensityEvent>, StoreError> {
    let mut bind_vars = JsonMap::new();
    bind_vars.insert("min".to_string(), json!(min_goldstein));

    let rows = store.query(HIGH_INTENSITY_AQL, bind_vars).await?;
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(row).map_err(|e| StoreError::InvalidResponse(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_row_deserializes() {
        let row = serde_json::json!({
            "eventID": "100",
            "goldsteinScale": 5.0,
            "eventCode": "043",
            "eventDate": 20240101,
            "actor": { "type1Code": "GOV", "type2Code": null, "countryCode": "USA" },
            "location": {
                "fullname": "Los Angeles, California",
                "countryCode": "US",
                "coordinates": [34.05, -118.25]
            }
        });
        let event: HighIntensityEvent = serde_json::from_value(row).unwrap();
        assert_eq!(event.event_id, "100");
        assert_eq!(event.actor.country_code.as_deref(), Some("USA"));
        assert_eq!(
            event.location.as_ref().unwrap().coordinates,
            [Some(34.05), Some(-118.25)]
        );
    }

    #[test]
    fn test_location_may_be_null() {
        let row = serde_json::json!({
            "eventID": "101",
            "goldsteinScale": 7.5,
            "eventCode": null,
            "eventDate": null,
            "actor": { "type1Code": null, "type2Code": null, "countryCode": null },
            "location": null
        });
        let event: HighIntensityEvent = serde_json::from_value(row).unwrap();
        assert!(event.location.is_none());
    }
}
