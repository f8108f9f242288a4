//! Row-to-entities mapper.
//!
//! Derives the Event, Actor, and (when coordinates allow) Location documents
//! plus their connecting edges from one parsed row. Pure: the result
//! describes what should be written, independent of any store.

use serde_json::{Map, Value};

use crate::error::{MapError, MapResult};
use crate::row::EventRow;
use crate::sanitize::{sanitize, CellValue};

/// Vertex collection names. Edge `_from`/`_to` handles embed these, so they
/// live here rather than in the provisioning layer.
pub const EVENTS: &str = "Events";
pub const ACTORS: &str = "Actors";
pub const LOCATIONS: &str = "Locations";
pub const RELATIONS: &str = "EventRelations";

pub const HAS_ACTOR: &str = "HAS_ACTOR";
pub const OCCURRED_AT: &str = "OCCURRED_AT";

/// A sparse vertex document: key plus only the fields that were present.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub fields: Map<String, Value>,
}

impl Document {
    /// Full document body including the `_key` attribute.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("_key".to_string(), Value::from(self.key.clone()));
        body.extend(self.fields.clone());
        body
    }
}

/// A directed, typed edge. Carries endpoint handles and the label only.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: &'static str,
}

impl Edge {
    pub fn to_json(&self) -> Map<String, Value> {
        let mut body = Map::new();
        body.insert("_from".to_string(), Value::from(self.from.clone()));
        body.insert("_to".to_string(), Value::from(self.to.clone()));
        body.insert("type".to_string(), Value::from(self.label));
        body
    }
}

/// Everything one row contributes to the graph.
#[derive(Debug, Clone)]
pub struct RowEntities {
    pub event: Document,
    pub actor: Document,
    pub location: Option<Document>,
    pub edges: Vec<Edge>,
}

fn put(fields: &mut Map<String, Value>, key: &str, cell: CellValue) {
    if let Some(value) = sanitize(&cell).into_json() {
        fields.insert(key.to_string(), value);
    }
}

/// Map one row into graph entities.
///
/// The event identifier is the only required field; without it no stable
/// vertex keys can be derived and the row fails as a whole. The Location
/// document and its `OCCURRED_AT` edge exist iff both coordinates survived
/// numeric coercion; a non-numeric latitude means no Location even when the
/// raw cell was non-empty.
pub fn map_row(row: &EventRow) -> MapResult<RowEntities> {
    let event_id = row.global_event_id.ok_or(MapError::MissingEventId)?;
    let event_key = event_id.to_string();
    let actor_key = format!("actor_{event_id}");

    let mut event_fields = Map::new();
    put(&mut event_fields, "eventCode", row.event_code.as_deref().into());
    put(&mut event_fields, "baseCode", row.event_base_code.as_deref().into());
    put(&mut event_fields, "rootCode", row.event_root_code.as_deref().into());
    put(&mut event_fields, "quadClass", row.quad_class.into());
    put(&mut event_fields, "goldsteinScale", row.goldstein_scale.into());
    put(&mut event_fields, "numMentions", row.num_mentions.into());
    put(&mut event_fields, "numSources", row.num_sources.into());
    put(&mut event_fields, "numArticles", row.num_articles.into());
    put(&mut event_fields, "avgTone", row.avg_tone.into());
    put(&mut event_fields, "date", row.day.into());
    put(&mut event_fields, "year", row.year.into());
    put(&mut event_fields, "monthYear", row.month_year.into());
    put(&mut event_fields, "fractionDate", row.fraction_date.into());

    let mut actor_fields = Map::new();
    put(&mut actor_fields, "type1Code", row.actor1_type1_code.as_deref().into());
    put(&mut actor_fields, "type2Code", row.actor1_type2_code.as_deref().into());
    put(&mut actor_fields, "type3Code", row.actor1_type3_code.as_deref().into());
    put(&mut actor_fields, "countryCode", row.actor1_country_code.as_deref().into());

    let mut edges = vec![Edge {
        from: format!("{EVENTS}/{event_key}"),
        to: format!("{ACTORS}/{actor_key}"),
        label: HAS_ACTOR,
    }];

    let location = match (row.actor1_geo_lat, row.actor1_geo_long) {
        (Some(lat), Some(long)) => {
            let location_key = format!("loc_{event_id}");
            let mut loc_fields = Map::new();
            put(&mut loc_fields, "type", row.actor1_geo_type.into());
            put(&mut loc_fields, "fullname", row.actor1_geo_fullname.as_deref().into());
            put(&mut loc_fields, "countryCode", row.actor1_geo_country_code.as_deref().into());
            put(&mut loc_fields, "adm1Code", row.actor1_geo_adm1_code.as_deref().into());
            put(&mut loc_fields, "adm2Code", row.actor1_geo_adm2_code.as_deref().into());
            put(&mut loc_fields, "latitude", Some(lat).into());
            put(&mut loc_fields, "longitude", Some(long).into());
            put(&mut loc_fields, "featureID", row.actor1_geo_feature_id.as_deref().into());

            edges.push(Edge {
                from: format!("{EVENTS}/{event_key}"),
                to: format!("{LOCATIONS}/{location_key}"),
                label: OCCURRED_AT,
            });
            Some(Document {
                key: location_key,
                fields: loc_fields,
            })
        }
        _ => None,
    };

    Ok(RowEntities {
        event: Document {
            key: event_key,
            fields: event_fields,
        },
        actor: Document {
            key: actor_key,
            fields: actor_fields,
        },
        location,
        edges,
    })
}
