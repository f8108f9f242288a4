//! Value sanitizer.
//!
//! Normalizes a raw cell value into one of three storable primitives or an
//! explicit `Absent` marker. Documents built from sanitized values are
//! sparse: an `Absent` field is omitted entirely, never stored as null.

use serde_json::Value;

/// A raw scalar cell as it comes out of the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// The parser found nothing, or numeric coercion failed.
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<Option<i64>> for CellValue {
    fn from(v: Option<i64>) -> Self {
        v.map_or(CellValue::Missing, CellValue::Int)
    }
}

impl From<Option<f64>> for CellValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(CellValue::Missing, CellValue::Float)
    }
}

impl From<Option<&str>> for CellValue {
    fn from(v: Option<&str>) -> Self {
        v.map_or(CellValue::Missing, |s| CellValue::Text(s.to_string()))
    }
}

/// A sanitized value ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Sanitized {
    /// The source value was missing or empty; omit the field.
    Absent,
    Int(i64),
    Float(f64),
    Text(String),
}

impl Sanitized {
    /// Project into a JSON value, or `None` for `Absent`.
    ///
    /// Non-finite floats have no JSON representation and are treated as
    /// absent rather than stored as null.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Sanitized::Absent => None,
            Sanitized::Int(i) => Some(Value::from(i)),
            Sanitized::Float(f) => serde_json::Number::from_f64(f).map(Value::Number),
            Sanitized::Text(s) => Some(Value::from(s)),
        }
    }
}

/// Normalize a raw cell value.
///
/// Missing markers and empty strings become `Absent`; numeric values keep
/// their type; everything else becomes its text form. Total over the input
/// domain, pure, and idempotent.
pub fn sanitize(value: &CellValue) -> Sanitized {
    match value {
        CellValue::Missing => Sanitized::Absent,
        CellValue::Text(s) if s.is_empty() => Sanitized::Absent,
        CellValue::Float(f) => Sanitized::Float(*f),
        CellValue::Int(i) => Sanitized::Int(*i),
        CellValue::Text(s) => Sanitized::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(s: &Sanitized) -> CellValue {
        match s {
            Sanitized::Absent => CellValue::Missing,
            Sanitized::Int(i) => CellValue::Int(*i),
            Sanitized::Float(f) => CellValue::Float(*f),
            Sanitized::Text(t) => CellValue::Text(t.clone()),
        }
    }

    #[test]
    fn test_missing_is_absent() {
        assert_eq!(sanitize(&CellValue::Missing), Sanitized::Absent);
    }

    #[test]
    fn test_empty_string_is_absent() {
        assert_eq!(sanitize(&CellValue::Text(String::new())), Sanitized::Absent);
    }

    #[test]
    fn test_numeric_values_keep_their_type() {
        assert_eq!(sanitize(&CellValue::Int(42)), Sanitized::Int(42));
        assert_eq!(sanitize(&CellValue::Int(-7)), Sanitized::Int(-7));
        match sanitize(&CellValue::Float(-5.2)) {
            Sanitized::Float(f) => assert!((f - (-5.2)).abs() < f64::EPSILON),
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_text_passes_through() {
        assert_eq!(
            sanitize(&CellValue::Text("USA".to_string())),
            Sanitized::Text("USA".to_string())
        );
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            CellValue::Missing,
            CellValue::Int(3),
            CellValue::Float(1.5),
            CellValue::Text("GOV".to_string()),
            CellValue::Text(String::new()),
        ];
        for input in &inputs {
            let once = sanitize(input);
            let twice = sanitize(&roundtrip(&once));
            assert_eq!(once, twice, "sanitize not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_json_projection_omits_absent() {
        assert_eq!(Sanitized::Absent.into_json(), None);
        assert_eq!(
            Sanitized::Int(100).into_json(),
            Some(serde_json::json!(100))
        );
    }
}
