use mongodb::bson::oid::ObjectId;
use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::error::ItemError;

/// Database-assigned item identifier, exchanged with callers as a 24-char hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(ObjectId);

impl ItemId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for ItemId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for ItemId {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(Self)
            .map_err(|_| ItemError::InvalidId(s.to_string()))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObjectId::parse_str(&raw)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// Whole number that may arrive as an integer or as an integral float (`1958.0`).
struct Integral(i64);

impl<'de> Deserialize<'de> for Integral {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IntegralVisitor;

        impl Visitor<'_> for IntegralVisitor {
            type Value = Integral;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Integral, E> {
                Ok(Integral(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Integral, E> {
                i64::try_from(v)
                    .map(Integral)
                    .map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Integral, E> {
                // 2^53: beyond this an f64 no longer holds every integer
                if v.fract() == 0.0 && v.abs() <= 9_007_199_254_740_992.0 {
                    Ok(Integral(v as i64))
                } else {
                    Err(E::invalid_value(Unexpected::Float(v), &self))
                }
            }
        }

        deserializer.deserialize_any(IntegralVisitor)
    }
}

pub(crate) fn integral<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Integral::deserialize(deserializer).map(|n| n.0)
}

pub(crate) fn optional_integral<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Option::<Integral>::deserialize(deserializer).map(|n| n.map(|n| n.0))
}

/// Caller-supplied fields of a furniture design.
///
/// Unknown keys are rejected and every string must be non-empty. `category`
/// is not part of the body; it comes from the URL on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ItemPayload {
    /// Image URL
    #[validate(length(min = 1, message = "must not be empty"))]
    #[schema(example = "https://example.com/paimio.jpg")]
    pub photo: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    #[schema(example = "Paimio Chair")]
    pub design_name: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    #[schema(example = "Alvar Aalto")]
    pub designer: String,
    #[schema(example = json!(["birch plywood"]))]
    pub materials: Vec<String>,
    #[serde(deserialize_with = "integral")]
    #[schema(example = 1932)]
    pub year_created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "optional_integral",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_price: Option<f64>,
}

/// Body of a replace request.
///
/// Clients often send back a document they fetched, so `_id` and `category`
/// are dropped before the rest is read as an [`ItemPayload`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct ItemReplacement(pub ItemPayload);

impl TryFrom<Map<String, Value>> for ItemReplacement {
    type Error = serde_json::Error;

    fn try_from(mut body: Map<String, Value>) -> Result<Self, Self::Error> {
        body.remove("_id");
        body.remove("category");
        serde_json::from_value(Value::Object(body)).map(Self)
    }
}

impl Validate for ItemReplacement {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.0.validate()
    }
}

/// An item about to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub category: String,
    pub details: ItemPayload,
}

/// Stored furniture design as returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    #[serde(rename = "_id")]
    #[schema(value_type = String, example = "65f1c0ffee0ddba11ca7f00d")]
    pub id: ItemId,
    #[schema(example = "chairs")]
    pub category: String,
    #[serde(flatten)]
    pub details: ItemPayload,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemCreated {
    #[schema(example = "Item successfully added")]
    pub message: String,
    #[serde(rename = "insertedId")]
    #[schema(value_type = String, example = "65f1c0ffee0ddba11ca7f00d")]
    pub inserted_id: ItemId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_id_parse_and_display() {
        let id: ItemId = "65f1c0ffee0ddba11ca7f00d".parse().unwrap();
        assert_eq!(id.to_string(), "65f1c0ffee0ddba11ca7f00d");
        assert_eq!(serde_json::to_value(id).unwrap(), json!("65f1c0ffee0ddba11ca7f00d"));
    }

    #[test]
    fn test_item_id_rejects_malformed() {
        for raw in ["", "123", "not-an-object-id-at-all!", "65f1c0ffee0ddba11ca7f00z"] {
            assert!(matches!(raw.parse::<ItemId>(), Err(ItemError::InvalidId(_))));
        }
    }

    #[test]
    fn test_payload_missing_required_field() {
        let err = serde_json::from_value::<ItemPayload>(json!({
            "photo": "p.jpg",
            "design_name": "Egg",
            "designer": "Arne Jacobsen",
            "materials": ["leather"]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("missing field `year_created`"));
    }

    #[test]
    fn test_payload_wrong_type_and_unknown_key() {
        let wrong_type = serde_json::from_value::<ItemPayload>(json!({
            "photo": "p.jpg", "design_name": "Egg", "designer": "Arne Jacobsen",
            "materials": ["leather"], "year_created": "1958"
        }));
        assert!(wrong_type.is_err());

        let unknown = serde_json::from_value::<ItemPayload>(json!({
            "photo": "p.jpg", "design_name": "Egg", "designer": "Arne Jacobsen",
            "materials": ["leather"], "year_created": 1958, "colour": "red"
        }))
        .unwrap_err();
        assert!(unknown.to_string().contains("unknown field `colour`"));
    }

    #[test]
    fn test_payload_accepts_integral_floats_only() {
        let payload = serde_json::from_value::<ItemPayload>(json!({
            "photo": "p.jpg", "design_name": "Egg", "designer": "Arne Jacobsen",
            "materials": ["leather"], "year_created": 1958.0, "stock": 3.0
        }))
        .unwrap();
        assert_eq!(payload.year_created, 1958);
        assert_eq!(payload.stock, Some(3));

        let fractional = serde_json::from_value::<ItemPayload>(json!({
            "photo": "p.jpg", "design_name": "Egg", "designer": "Arne Jacobsen",
            "materials": ["leather"], "year_created": 1958.5
        }));
        assert!(fractional.is_err());

        let fractional_stock = serde_json::from_value::<ItemPayload>(json!({
            "photo": "p.jpg", "design_name": "Egg", "designer": "Arne Jacobsen",
            "materials": ["leather"], "year_created": 1958, "stock": 0.5
        }));
        assert!(fractional_stock.is_err());
    }

    #[test]
    fn test_payload_empty_strings_fail_validation() {
        let mut payload = fixtures::paimio();
        payload.designer = String::new();
        payload.brand = Some(String::new());

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("designer"));
        assert!(fields.contains_key("brand"));
        assert!(fixtures::paimio().validate().is_ok());
    }

    #[test]
    fn test_replacement_strips_id_and_category() {
        let body = json!({
            "_id": "65f1c0ffee0ddba11ca7f00d",
            "category": "chairs",
            "photo": "https://example.com/paimio.jpg",
            "design_name": "Paimio Chair",
            "designer": "Alvar Aalto",
            "materials": ["birch plywood"],
            "year_created": 1932
        });

        let ItemReplacement(payload) = serde_json::from_value(body).unwrap();
        assert_eq!(payload.design_name, "Paimio Chair");
        assert!(payload.style.is_none());
    }

    #[test]
    fn test_replacement_still_rejects_other_unknown_keys() {
        let err = serde_json::from_value::<ItemReplacement>(json!({
            "id": "x", "photo": "p.jpg", "design_name": "Egg", "designer": "Arne Jacobsen",
            "materials": [], "year_created": 1958
        }))
        .unwrap_err();
        assert!(err.to_string().contains("unknown field `id`"));
    }

    #[test]
    fn test_item_serializes_flat_and_omits_absent_fields() {
        let item = Item {
            id: "65f1c0ffee0ddba11ca7f00d".parse().unwrap(),
            category: "chairs".to_string(),
            details: fixtures::paimio(),
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["_id"], "65f1c0ffee0ddba11ca7f00d");
        assert_eq!(value["category"], "chairs");
        assert_eq!(value["year_created"], 1932);
        assert!(value.get("stock").is_none());
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_item_created_uses_inserted_id_key() {
        let created = ItemCreated {
            message: "Item successfully added".to_string(),
            inserted_id: "65f1c0ffee0ddba11ca7f00d".parse().unwrap(),
        };
        assert_eq!(
            serde_json::to_value(created).unwrap(),
            json!({"message": "Item successfully added", "insertedId": "65f1c0ffee0ddba11ca7f00d"})
        );
    }
}
