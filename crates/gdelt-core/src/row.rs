//! Fixed-shape schema for one GDELT event-feed row.
//!
//! Every expected column is a typed `Option` field. The numeric columns use
//! lenient deserializers: unparseable text becomes `None` instead of failing
//! the whole row, mirroring best-effort numeric coercion on the source feed.

use serde::{Deserialize, Deserializer};

/// One parsed row of the GDELT event export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventRow {
    #[serde(rename = "GlobalEventID", deserialize_with = "lenient_i64", default)]
    pub global_event_id: Option<i64>,

    // Event classification (CAMEO codes keep leading zeros, so text)
    #[serde(rename = "EventCode", default)]
    pub event_code: Option<String>,
    #[serde(rename = "EventBaseCode", default)]
    pub event_base_code: Option<String>,
    #[serde(rename = "EventRootCode", default)]
    pub event_root_code: Option<String>,
    #[serde(rename = "QuadClass", deserialize_with = "lenient_i64", default)]
    pub quad_class: Option<i64>,

    // Scores and counts
    #[serde(rename = "GoldsteinScale", deserialize_with = "lenient_f64", default)]
    pub goldstein_scale: Option<f64>,
    #[serde(rename = "NumMentions", deserialize_with = "lenient_i64", default)]
    pub num_mentions: Option<i64>,
    #[serde(rename = "NumSources", deserialize_with = "lenient_i64", default)]
    pub num_sources: Option<i64>,
    #[serde(rename = "NumArticles", deserialize_with = "lenient_i64", default)]
    pub num_articles: Option<i64>,
    #[serde(rename = "AvgTone", deserialize_with = "lenient_f64", default)]
    pub avg_tone: Option<f64>,

    // Dates
    #[serde(rename = "Day", deserialize_with = "lenient_i64", default)]
    pub day: Option<i64>,
    #[serde(rename = "Year", deserialize_with = "lenient_i64", default)]
    pub year: Option<i64>,
    #[serde(rename = "MonthYear", deserialize_with = "lenient_i64", default)]
    pub month_year: Option<i64>,
    #[serde(rename = "FractionDate", deserialize_with = "lenient_f64", default)]
    pub fraction_date: Option<f64>,

    // Actor 1
    #[serde(rename = "Actor1Type1Code", default)]
    pub actor1_type1_code: Option<String>,
    #[serde(rename = "Actor1Type2Code", default)]
    pub actor1_type2_code: Option<String>,
    #[serde(rename = "Actor1Type3Code", default)]
    pub actor1_type3_code: Option<String>,
    #[serde(rename = "Actor1CountryCode", default)]
    pub actor1_country_code: Option<String>,

    // Actor 1 geography
    #[serde(rename = "Actor1Geo_Type", deserialize_with = "lenient_i64", default)]
    pub actor1_geo_type: Option<i64>,
    #[serde(rename = "Actor1Geo_Fullname", default)]
    pub actor1_geo_fullname: Option<String>,
    #[serde(rename = "Actor1Geo_CountryCode", default)]
    pub actor1_geo_country_code: Option<String>,
    #[serde(rename = "Actor1Geo_ADM1Code", default)]
    pub actor1_geo_adm1_code: Option<String>,
    #[serde(rename = "Actor1Geo_ADM2Code", default)]
    pub actor1_geo_adm2_code: Option<String>,
    #[serde(rename = "Actor1Geo_Lat", deserialize_with = "lenient_f64", default)]
    pub actor1_geo_lat: Option<f64>,
    #[serde(rename = "Actor1Geo_Long", deserialize_with = "lenient_f64", default)]
    pub actor1_geo_long: Option<f64>,
    #[serde(rename = "Actor1Geo_FeatureID", default)]
    pub actor1_geo_feature_id: Option<String>,
}

/// Best-effort f64 coercion: empty or unparseable cells become `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    // "NaN" parses successfully in Rust; treat non-finite values as missing
    Ok(raw.and_then(|s| s.trim().parse::<f64>().ok().filter(|f| f.is_finite())))
}

/// Best-effort i64 coercion.
///
/// Falls back to an integral float ("5.0" counts as 5) because upstream
/// exports sometimes render count columns with a trailing `.0`.
fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        s.parse::<i64>().ok().or_else(|| {
            s.parse::<f64>()
                .ok()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "GlobalEventID,EventCode,EventBaseCode,EventRootCode,QuadClass,GoldsteinScale,NumMentions,NumSources,NumArticles,AvgTone,Day,Year,MonthYear,FractionDate,Actor1Type1Code,Actor1Type2Code,Actor1Type3Code,Actor1CountryCode,Actor1Geo_Type,Actor1Geo_Fullname,Actor1Geo_CountryCode,Actor1Geo_ADM1Code,Actor1Geo_ADM2Code,Actor1Geo_Lat,Actor1Geo_Long,Actor1Geo_FeatureID";

    fn parse_one(line: &str) -> EventRow {
        let data = format!("{HEADER}\n{line}");
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        rdr.deserialize::<EventRow>()
            .next()
            .expect("one row")
            .expect("row deserializes")
    }

    /// Build a 26-column row from (zero-based column, value) pairs.
    fn row_with(cells: &[(usize, &str)]) -> String {
        let mut fields = vec![""; HEADER.split(',').count()];
        for (column, value) in cells {
            fields[*column] = value;
        }
        fields.join(",")
    }

    #[test]
    fn test_full_row_parses() {
        let row = parse_one(
            "100,043,043,04,1,5.0,10,2,10,2.5,20240101,2024,202401,2024.0027,GOV,,,USA,3,\"Los Angeles, California\",US,USCA,,34.05,-118.25,1662328",
        );
        assert_eq!(row.global_event_id, Some(100));
        assert_eq!(row.event_code.as_deref(), Some("043"));
        assert_eq!(row.quad_class, Some(1));
        assert_eq!(row.goldstein_scale, Some(5.0));
        assert_eq!(row.actor1_geo_lat, Some(34.05));
        assert_eq!(row.actor1_geo_long, Some(-118.25));
        // empty cells come through as None, not parse failures
        assert_eq!(row.actor1_type2_code, None);
    }

    #[test]
    fn test_non_numeric_cells_coerce_to_none() {
        let row = parse_one(&row_with(&[
            (0, "abc"),
            (4, "?"),
            (5, "bad"),
            (6, "x"),
            (23, "not-a-lat"),
            (24, "-118.25"),
        ]));
        assert_eq!(row.global_event_id, None);
        assert_eq!(row.quad_class, None);
        assert_eq!(row.goldstein_scale, None);
        assert_eq!(row.num_mentions, None);
        assert_eq!(row.actor1_geo_lat, None);
        assert_eq!(row.actor1_geo_long, Some(-118.25));
    }

    #[test]
    fn test_nan_coordinate_is_missing() {
        let row = parse_one(&row_with(&[(0, "100"), (23, "NaN"), (24, "-118.25")]));
        assert_eq!(row.actor1_geo_lat, None);
    }

    #[test]
    fn test_integral_float_counts_as_int() {
        let row = parse_one(&row_with(&[(0, "100"), (6, "5.0"), (7, "2.5")]));
        assert_eq!(row.num_mentions, Some(5));
        // fractional values are not silently truncated
        assert_eq!(row.num_sources, None);
    }
}
