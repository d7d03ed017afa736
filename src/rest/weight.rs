//! Weight normalisation between GraphQL `Weight` and REST `grams`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A unit of weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeightUnit {
    /// Kilograms (`KILOGRAMS` / `kg`).
    Kilograms,
    /// Grams (`GRAMS` / `g`).
    Grams,
    /// Ounces (`OUNCES` / `oz`).
    Ounces,
    /// Pounds (`POUNDS` / `lb`).
    Pounds,
}

impl WeightUnit {
    /// Parses the GraphQL enum value.
    #[must_use]
    pub fn from_graphql(value: &str) -> Option<Self> {
        match value {
            "KILOGRAMS" => Some(Self::Kilograms),
            "GRAMS" => Some(Self::Grams),
            "OUNCES" => Some(Self::Ounces),
            "POUNDS" => Some(Self::Pounds),
            _ => None,
        }
    }

    /// Returns the GraphQL enum value.
    #[must_use]
    pub const fn as_graphql(self) -> &'static str {
        match self {
            Self::Kilograms => "KILOGRAMS",
            Self::Grams => "GRAMS",
            Self::Ounces => "OUNCES",
            Self::Pounds => "POUNDS",
        }
    }

    /// Returns the REST short symbol.
    #[must_use]
    pub const fn as_rest(self) -> &'static str {
        match self {
            Self::Kilograms => "kg",
            Self::Grams => "g",
            Self::Ounces => "oz",
            Self::Pounds => "lb",
        }
    }

    /// Grams per one unit.
    #[must_use]
    pub const fn grams_per_unit(self) -> f64 {
        match self {
            Self::Kilograms => 1000.0,
            Self::Grams => 1.0,
            Self::Ounces => 28.3495,
            Self::Pounds => 453.592,
        }
    }

    /// Converts a weight in this unit to whole grams, rounding to nearest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_grams(self, value: f64) -> i64 {
        (value * self.grams_per_unit()).round() as i64
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_rest())
    }
}

impl FromStr for WeightUnit {
    type Err = String;

    /// Parses a REST symbol (`kg`, `g`, `oz`, `lb`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kg" => Ok(Self::Kilograms),
            "g" => Ok(Self::Grams),
            "oz" => Ok(Self::Ounces),
            "lb" => Ok(Self::Pounds),
            other => Err(format!(
                "Unknown weight unit '{other}'. Expected one of kg, g, oz, lb."
            )),
        }
    }
}

impl Serialize for WeightUnit {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_rest())
    }
}

impl<'de> Deserialize<'de> for WeightUnit {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// REST `grams`/`weight`/`weight_unit` fields derived from a GraphQL
/// `Weight { value unit }` object.
///
/// All three are `null` when the weight is absent or its unit is unknown.
///
/// # Example
///
/// ```rust
/// use shopify_rest_shim::rest::weight::rest_weight;
/// use serde_json::json;
///
/// let fields = rest_weight(&json!({ "value": 1.0, "unit": "POUNDS" }));
/// assert_eq!(fields["grams"], 454);
/// assert_eq!(fields["weight_unit"], "lb");
/// ```
#[must_use]
pub fn rest_weight(weight: &Value) -> Value {
    let value = weight.get("value").and_then(Value::as_f64);
    let unit = weight
        .get("unit")
        .and_then(Value::as_str)
        .and_then(WeightUnit::from_graphql);

    match (value, unit) {
        (Some(value), Some(unit)) => json!({
            "grams": unit.to_grams(value),
            "weight": value,
            "weight_unit": unit.as_rest(),
        }),
        _ => json!({ "grams": null, "weight": null, "weight_unit": null }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions_round_to_nearest_gram() {
        assert_eq!(WeightUnit::Kilograms.to_grams(1.0), 1000);
        assert_eq!(WeightUnit::Ounces.to_grams(1.0), 28);
        assert_eq!(WeightUnit::Pounds.to_grams(1.0), 454);
        assert_eq!(WeightUnit::Grams.to_grams(1.0), 1);
        assert_eq!(WeightUnit::Kilograms.to_grams(0.25), 250);
    }

    #[test]
    fn test_rest_weight_from_graphql_measurement() {
        let fields = rest_weight(&json!({ "value": 2.5, "unit": "KILOGRAMS" }));
        assert_eq!(fields["grams"], 2500);
        assert_eq!(fields["weight"], 2.5);
        assert_eq!(fields["weight_unit"], "kg");
    }

    #[test]
    fn test_rest_weight_absent_or_unknown_is_null() {
        assert_eq!(rest_weight(&Value::Null)["grams"], Value::Null);
        let unknown = rest_weight(&json!({ "value": 1.0, "unit": "STONES" }));
        assert_eq!(unknown["weight_unit"], Value::Null);
    }

    #[test]
    fn test_rest_symbol_maps_back_to_graphql_enum() {
        let unit: WeightUnit = "LB".parse().unwrap();
        assert_eq!(unit.as_graphql(), "POUNDS");
        assert!("stone".parse::<WeightUnit>().is_err());
    }
}
