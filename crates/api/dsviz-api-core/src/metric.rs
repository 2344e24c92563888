//! Distance / key values as reported by the engine.
//!
//! Finite values travel as JSON numbers; unreachable entries travel as the
//! string `"INF"`.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Finite(i64),
    Infinite,
}

impl Metric {
    pub fn is_finite(&self) -> bool {
        matches!(self, Metric::Finite(_))
    }

    pub fn as_finite(&self) -> Option<i64> {
        match self {
            Metric::Finite(v) => Some(*v),
            Metric::Infinite => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Finite(v) => write!(f, "{v}"),
            Metric::Infinite => f.write_str("INF"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Metric::Finite(v) => serializer.serialize_i64(*v),
            Metric::Infinite => serializer.serialize_str("INF"),
        }
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D>(deserializer: D) -> Result<Metric, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Int(i64),
            Float(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Int(v) => Ok(Metric::Finite(v)),
            Repr::Float(v) if v.is_finite() && v.fract() == 0.0 => Ok(Metric::Finite(v as i64)),
            Repr::Float(v) => Err(de::Error::custom(format!("non-integral metric {v}"))),
            Repr::Text(s) if s.eq_ignore_ascii_case("inf") => Ok(Metric::Infinite),
            Repr::Text(s) => Err(de::Error::custom(format!("unexpected metric '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_and_inf() {
        let parsed: Vec<Metric> = serde_json::from_str(r#"[0, "INF", 7]"#).unwrap();
        assert_eq!(
            parsed,
            vec![Metric::Finite(0), Metric::Infinite, Metric::Finite(7)]
        );
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"[0,"INF",7]"#);
    }

    #[test]
    fn rejects_other_text() {
        assert!(serde_json::from_str::<Metric>(r#""seven""#).is_err());
    }
}
