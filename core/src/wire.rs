//! JSON representations of `LocationScore`.
//!
//! # Design
//! Two shapes are supported:
//!
//! - `Shape::Normalized` groups related fields (`walk`, `transit`, `bike`,
//!   `originalCoordinates`, `snappedCoordinates`) and uses camelCase keys.
//! - `Shape::Wire` matches the service response verbatim: flat `walkscore`,
//!   `description`, `updated`, `snapped_lat`, `snapped_lon`, `ws_link`.
//!   It has no slot for the caller's address or coordinates.
//!
//! Both directions go through the DTOs below, whose leaves are raw
//! `serde_json::Value`s. Reading applies the `validate` primitives and then
//! the record's setters, so malformed payloads fail with the offending
//! field's name. Absent fields and `null` groups read as empty.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WalkScoreError;
use crate::score::LocationScore;
use crate::validate::{self, Constraint, ValidationError};

/// Which JSON layout to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Normalized,
    Wire,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct WalkGroup {
    score: Value,
    description: Value,
    updated: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct TransitGroup {
    score: Value,
    description: Value,
    summary: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct BikeGroup {
    score: Value,
    description: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct OriginalCoordinates {
    address: Value,
    latitude: Value,
    longitude: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SnappedCoordinates {
    latitude: Value,
    longitude: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct NormalizedScore {
    status: Value,
    walk: Option<WalkGroup>,
    transit: Option<TransitGroup>,
    bike: Option<BikeGroup>,
    original_coordinates: Option<OriginalCoordinates>,
    snapped_coordinates: Option<SnappedCoordinates>,
    logo_url: Value,
    more_info_icon: Value,
    more_info_link: Value,
    help_link: Value,
    property_page_link: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct WireScore {
    status: Value,
    walkscore: Value,
    description: Value,
    updated: Value,
    transit: Option<TransitGroup>,
    bike: Option<BikeGroup>,
    snapped_lat: Value,
    snapped_lon: Value,
    logo_url: Value,
    more_info_icon: Value,
    more_info_link: Value,
    help_link: Value,
    ws_link: Value,
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn read_dto<T: for<'de> Deserialize<'de>>(value: &Value) -> Result<T, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::new("record", Constraint::NotAnObject));
    }
    // Leaves are raw values, so this only fails when a group is not an object.
    serde_json::from_value(value.clone())
        .map_err(|_| ValidationError::new("group", Constraint::NotAnObject))
}

fn score(value: &Value, field: &'static str) -> Result<Option<i64>, ValidationError> {
    validate::integer(Some(value), field, true, Some(0), Some(100))
}

impl LocationScore {
    /// Serialize into the requested shape. Absent fields become `null`.
    pub fn to_representation(&self, shape: Shape) -> Value {
        let updated = self
            .walk_updated()
            .map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true));
        let transit = Some(TransitGroup {
            score: self.transit_score().into(),
            description: self.transit_description().into(),
            summary: self.transit_summary().into(),
        });
        let bike = Some(BikeGroup {
            score: self.bike_score().into(),
            description: self.bike_description().into(),
        });

        let serialized = match shape {
            Shape::Normalized => serde_json::to_value(NormalizedScore {
                status: self.status().into(),
                walk: Some(WalkGroup {
                    score: self.walk_score().into(),
                    description: self.walk_description().into(),
                    updated: updated.into(),
                }),
                transit,
                bike,
                original_coordinates: Some(OriginalCoordinates {
                    address: self.address().into(),
                    latitude: self.original_latitude().into(),
                    longitude: self.original_longitude().into(),
                }),
                snapped_coordinates: Some(SnappedCoordinates {
                    latitude: self.snapped_latitude().into(),
                    longitude: self.snapped_longitude().into(),
                }),
                logo_url: self.logo_url().into(),
                more_info_icon: self.more_info_icon().into(),
                more_info_link: self.more_info_link().into(),
                help_link: self.help_link().into(),
                property_page_link: self.property_page_link().into(),
            }),
            Shape::Wire => serde_json::to_value(WireScore {
                status: self.status().into(),
                walkscore: self.walk_score().into(),
                description: self.walk_description().into(),
                updated: updated.into(),
                transit,
                bike,
                snapped_lat: self.snapped_latitude().into(),
                snapped_lon: self.snapped_longitude().into(),
                logo_url: self.logo_url().into(),
                more_info_icon: self.more_info_icon().into(),
                more_info_link: self.more_info_link().into(),
                help_link: self.help_link().into(),
                ws_link: self.property_page_link().into(),
            }),
        };
        // DTOs hold only `Value` leaves and string keys.
        serialized.unwrap_or(Value::Null)
    }

    /// Build a record from a value in the requested shape.
    ///
    /// `null`, `""` and `{}` produce an empty record.
    pub fn from_representation(value: &Value, shape: Shape) -> Result<Self, ValidationError> {
        let mut out = LocationScore::new();
        if is_empty_payload(value) {
            return Ok(out);
        }

        let (transit, bike, status) = match shape {
            Shape::Normalized => {
                let dto: NormalizedScore = read_dto(value)?;
                let walk = dto.walk.unwrap_or_default();
                out.set_walk_score(score(&walk.score, "walk.score")?)?;
                out.set_walk_description(validate::string(Some(&walk.description), "walk.description", true)?);
                out.set_walk_updated(validate::timestamp(Some(&walk.updated), "walk.updated", true)?)?;

                let original = dto.original_coordinates.unwrap_or_default();
                out.set_address(validate::string(Some(&original.address), "originalCoordinates.address", true)?);
                out.set_original_coordinates(
                    validate::float(Some(&original.longitude), "originalCoordinates.longitude", true)?,
                    validate::float(Some(&original.latitude), "originalCoordinates.latitude", true)?,
                )?;

                let snapped = dto.snapped_coordinates.unwrap_or_default();
                out.set_snapped_coordinates(
                    validate::float(Some(&snapped.longitude), "snappedCoordinates.longitude", true)?,
                    validate::float(Some(&snapped.latitude), "snappedCoordinates.latitude", true)?,
                )?;

                out.set_logo_url(validate::url(Some(&dto.logo_url), "logoUrl", true)?)?;
                out.set_more_info_icon(validate::url(Some(&dto.more_info_icon), "moreInfoIcon", true)?)?;
                out.set_more_info_link(validate::url(Some(&dto.more_info_link), "moreInfoLink", true)?)?;
                out.set_help_link(validate::url(Some(&dto.help_link), "helpLink", true)?)?;
                out.set_property_page_link(validate::url(
                    Some(&dto.property_page_link),
                    "propertyPageLink",
                    true,
                )?)?;
                (dto.transit, dto.bike, dto.status)
            }
            Shape::Wire => {
                let dto: WireScore = read_dto(value)?;
                out.set_walk_score(score(&dto.walkscore, "walkscore")?)?;
                out.set_walk_description(validate::string(Some(&dto.description), "description", true)?);
                out.set_walk_updated(validate::timestamp(Some(&dto.updated), "updated", true)?)?;
                out.set_snapped_coordinates(
                    validate::float(Some(&dto.snapped_lon), "snapped_lon", true)?,
                    validate::float(Some(&dto.snapped_lat), "snapped_lat", true)?,
                )?;
                out.set_logo_url(validate::url(Some(&dto.logo_url), "logo_url", true)?)?;
                out.set_more_info_icon(validate::url(Some(&dto.more_info_icon), "more_info_icon", true)?)?;
                out.set_more_info_link(validate::url(Some(&dto.more_info_link), "more_info_link", true)?)?;
                out.set_help_link(validate::url(Some(&dto.help_link), "help_link", true)?)?;
                out.set_property_page_link(validate::url(Some(&dto.ws_link), "ws_link", true)?)?;
                (dto.transit, dto.bike, dto.status)
            }
        };

        out.set_status(validate::integer(Some(&status), "status", true, None, None)?);

        let transit = transit.unwrap_or_default();
        out.set_transit_score(score(&transit.score, "transit.score")?)?;
        out.set_transit_description(validate::string(Some(&transit.description), "transit.description", true)?);
        out.set_transit_summary(validate::string(Some(&transit.summary), "transit.summary", true)?);

        let bike = bike.unwrap_or_default();
        out.set_bike_score(score(&bike.score, "bike.score")?)?;
        out.set_bike_description(validate::string(Some(&bike.description), "bike.description", true)?);

        Ok(out)
    }

    /// Serialize to a compact JSON string in the requested shape.
    pub fn to_json(&self, shape: Shape) -> String {
        self.to_representation(shape).to_string()
    }

    /// Parse JSON text in the requested shape. Blank text yields an empty
    /// record.
    pub fn from_json(text: &str, shape: Shape) -> Result<Self, WalkScoreError> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value =
            serde_json::from_str(text).map_err(|e| WalkScoreError::Deserialization(e.to_string()))?;
        Ok(Self::from_representation(&value, shape)?)
    }

    /// True when `value` equals this record's representation in either shape.
    pub fn matches_representation(&self, value: &Value) -> bool {
        *value == self.to_representation(Shape::Normalized) || *value == self.to_representation(Shape::Wire)
    }
}
