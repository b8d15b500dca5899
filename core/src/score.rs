//! The location score record.
//!
//! # Design
//! Every field is private and optional. Setters validate before storing, so
//! a `LocationScore` never holds a score outside 0..=100, a malformed URL, or
//! a non-finite coordinate. Construction from JSON goes through the same
//! setters (see `wire`), as does `LocationScoreBuilder::build`.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::classify::SUCCESS_STATUS;
use crate::validate::{self, ValidationError};

const MIN_SCORE: i64 = 0;
const MAX_SCORE: i64 = 100;

/// Walk, transit and bike scores for one location, plus the coordinates
/// the service scored and the coordinates the caller asked about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationScore {
    status: Option<i64>,

    walk_score: Option<i64>,
    walk_description: Option<String>,
    walk_updated: Option<DateTime<Utc>>,

    transit_score: Option<i64>,
    transit_description: Option<String>,
    transit_summary: Option<String>,

    bike_score: Option<i64>,
    bike_description: Option<String>,

    logo_url: Option<String>,
    more_info_icon: Option<String>,
    more_info_link: Option<String>,
    help_link: Option<String>,
    property_page_link: Option<String>,

    address: Option<String>,
    original_latitude: Option<f64>,
    original_longitude: Option<f64>,
    snapped_latitude: Option<f64>,
    snapped_longitude: Option<f64>,
}

fn score(value: Option<i64>, field: &'static str) -> Result<Option<i64>, ValidationError> {
    value
        .map(|v| validate::check_bounds(v, field, Some(MIN_SCORE), Some(MAX_SCORE)))
        .transpose()
}

fn coordinate(value: Option<f64>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    value.map(|v| validate::check_finite(v, field)).transpose()
}

fn link(value: Option<String>, field: &'static str) -> Result<Option<String>, ValidationError> {
    match value {
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => validate::check_url(&raw, field).map(|_| Some(raw)),
        None => Ok(None),
    }
}

fn text(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl LocationScore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> LocationScoreBuilder {
        LocationScoreBuilder::default()
    }

    /// True only when the service reported a successful lookup.
    pub fn is_success(&self) -> bool {
        self.status == Some(SUCCESS_STATUS)
    }

    /// True when no field holds a value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn status(&self) -> Option<i64> {
        self.status
    }

    /// Any integer is accepted; only a handful of codes carry meaning.
    pub fn set_status(&mut self, value: Option<i64>) {
        self.status = value;
    }

    pub fn walk_score(&self) -> Option<i64> {
        self.walk_score
    }

    pub fn set_walk_score(&mut self, value: Option<i64>) -> Result<(), ValidationError> {
        self.walk_score = score(value, "walk_score")?;
        Ok(())
    }

    pub fn walk_description(&self) -> Option<&str> {
        self.walk_description.as_deref()
    }

    pub fn set_walk_description(&mut self, value: Option<String>) {
        self.walk_description = text(value);
    }

    pub fn walk_updated(&self) -> Option<DateTime<Utc>> {
        self.walk_updated
    }

    pub fn set_walk_updated(&mut self, value: Option<DateTime<Utc>>) -> Result<(), ValidationError> {
        self.walk_updated = value.map(|v| validate::check_timestamp(v, "walk_updated")).transpose()?;
        Ok(())
    }

    pub fn transit_score(&self) -> Option<i64> {
        self.transit_score
    }

    pub fn set_transit_score(&mut self, value: Option<i64>) -> Result<(), ValidationError> {
        self.transit_score = score(value, "transit_score")?;
        Ok(())
    }

    pub fn transit_description(&self) -> Option<&str> {
        self.transit_description.as_deref()
    }

    pub fn set_transit_description(&mut self, value: Option<String>) {
        self.transit_description = text(value);
    }

    pub fn transit_summary(&self) -> Option<&str> {
        self.transit_summary.as_deref()
    }

    pub fn set_transit_summary(&mut self, value: Option<String>) {
        self.transit_summary = text(value);
    }

    pub fn bike_score(&self) -> Option<i64> {
        self.bike_score
    }

    pub fn set_bike_score(&mut self, value: Option<i64>) -> Result<(), ValidationError> {
        self.bike_score = score(value, "bike_score")?;
        Ok(())
    }

    pub fn bike_description(&self) -> Option<&str> {
        self.bike_description.as_deref()
    }

    pub fn set_bike_description(&mut self, value: Option<String>) {
        self.bike_description = text(value);
    }

    /// URL of the WalkScore logo.
    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }

    pub fn set_logo_url(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        self.logo_url = link(value, "logo_url")?;
        Ok(())
    }

    /// URL of the question-mark icon shown next to a score.
    pub fn more_info_icon(&self) -> Option<&str> {
        self.more_info_icon.as_deref()
    }

    pub fn set_more_info_icon(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        self.more_info_icon = link(value, "more_info_icon")?;
        Ok(())
    }

    pub fn more_info_link(&self) -> Option<&str> {
        self.more_info_link.as_deref()
    }

    pub fn set_more_info_link(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        self.more_info_link = link(value, "more_info_link")?;
        Ok(())
    }

    /// URL of the "How Walk Score Works" page.
    pub fn help_link(&self) -> Option<&str> {
        self.help_link.as_deref()
    }

    pub fn set_help_link(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        self.help_link = link(value, "help_link")?;
        Ok(())
    }

    /// URL of the walkscore.com page for this location (`ws_link` on the wire).
    pub fn property_page_link(&self) -> Option<&str> {
        self.property_page_link.as_deref()
    }

    pub fn set_property_page_link(&mut self, value: Option<String>) -> Result<(), ValidationError> {
        self.property_page_link = link(value, "property_page_link")?;
        Ok(())
    }

    /// The address the caller asked about.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn set_address(&mut self, value: Option<String>) {
        self.address = text(value);
    }

    pub fn original_latitude(&self) -> Option<f64> {
        self.original_latitude
    }

    pub fn set_original_latitude(&mut self, value: Option<f64>) -> Result<(), ValidationError> {
        self.original_latitude = coordinate(value, "original_latitude")?;
        Ok(())
    }

    pub fn original_longitude(&self) -> Option<f64> {
        self.original_longitude
    }

    pub fn set_original_longitude(&mut self, value: Option<f64>) -> Result<(), ValidationError> {
        self.original_longitude = coordinate(value, "original_longitude")?;
        Ok(())
    }

    /// `(longitude, latitude)` as supplied by the caller.
    pub fn original_coordinates(&self) -> (Option<f64>, Option<f64>) {
        (self.original_longitude, self.original_latitude)
    }

    /// Set both original coordinates; neither changes if either is invalid.
    pub fn set_original_coordinates(
        &mut self,
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<(), ValidationError> {
        let longitude = coordinate(longitude, "original_longitude")?;
        let latitude = coordinate(latitude, "original_latitude")?;
        self.original_longitude = longitude;
        self.original_latitude = latitude;
        Ok(())
    }

    pub fn snapped_latitude(&self) -> Option<f64> {
        self.snapped_latitude
    }

    pub fn set_snapped_latitude(&mut self, value: Option<f64>) -> Result<(), ValidationError> {
        self.snapped_latitude = coordinate(value, "snapped_latitude")?;
        Ok(())
    }

    pub fn snapped_longitude(&self) -> Option<f64> {
        self.snapped_longitude
    }

    pub fn set_snapped_longitude(&mut self, value: Option<f64>) -> Result<(), ValidationError> {
        self.snapped_longitude = coordinate(value, "snapped_longitude")?;
        Ok(())
    }

    /// `(longitude, latitude)` the service actually scored.
    pub fn snapped_coordinates(&self) -> (Option<f64>, Option<f64>) {
        (self.snapped_longitude, self.snapped_latitude)
    }

    pub fn set_snapped_coordinates(
        &mut self,
        longitude: Option<f64>,
        latitude: Option<f64>,
    ) -> Result<(), ValidationError> {
        let longitude = coordinate(longitude, "snapped_longitude")?;
        let latitude = coordinate(latitude, "snapped_latitude")?;
        self.snapped_longitude = longitude;
        self.snapped_latitude = latitude;
        Ok(())
    }
}

impl fmt::Display for LocationScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationScore(address = '{}')", self.address.as_deref().unwrap_or(""))
    }
}

/// Collects raw field values and validates them all in `build`.
#[derive(Debug, Clone, Default)]
pub struct LocationScoreBuilder {
    record: LocationScore,
}

impl LocationScoreBuilder {
    pub fn status(mut self, value: i64) -> Self {
        self.record.status = Some(value);
        self
    }

    pub fn walk_score(mut self, value: i64) -> Self {
        self.record.walk_score = Some(value);
        self
    }

    pub fn walk_description(mut self, value: impl Into<String>) -> Self {
        self.record.walk_description = Some(value.into());
        self
    }

    pub fn walk_updated(mut self, value: DateTime<Utc>) -> Self {
        self.record.walk_updated = Some(value);
        self
    }

    pub fn transit_score(mut self, value: i64) -> Self {
        self.record.transit_score = Some(value);
        self
    }

    pub fn transit_description(mut self, value: impl Into<String>) -> Self {
        self.record.transit_description = Some(value.into());
        self
    }

    pub fn transit_summary(mut self, value: impl Into<String>) -> Self {
        self.record.transit_summary = Some(value.into());
        self
    }

    pub fn bike_score(mut self, value: i64) -> Self {
        self.record.bike_score = Some(value);
        self
    }

    pub fn bike_description(mut self, value: impl Into<String>) -> Self {
        self.record.bike_description = Some(value.into());
        self
    }

    pub fn logo_url(mut self, value: impl Into<String>) -> Self {
        self.record.logo_url = Some(value.into());
        self
    }

    pub fn more_info_icon(mut self, value: impl Into<String>) -> Self {
        self.record.more_info_icon = Some(value.into());
        self
    }

    pub fn more_info_link(mut self, value: impl Into<String>) -> Self {
        self.record.more_info_link = Some(value.into());
        self
    }

    pub fn help_link(mut self, value: impl Into<String>) -> Self {
        self.record.help_link = Some(value.into());
        self
    }

    pub fn property_page_link(mut self, value: impl Into<String>) -> Self {
        self.record.property_page_link = Some(value.into());
        self
    }

    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.record.address = Some(value.into());
        self
    }

    pub fn original_coordinates(mut self, longitude: f64, latitude: f64) -> Self {
        self.record.original_longitude = Some(longitude);
        self.record.original_latitude = Some(latitude);
        self
    }

    pub fn snapped_coordinates(mut self, longitude: f64, latitude: f64) -> Self {
        self.record.snapped_longitude = Some(longitude);
        self.record.snapped_latitude = Some(latitude);
        self
    }

    /// Run every field through its setter.
    pub fn build(self) -> Result<LocationScore, ValidationError> {
        let raw = self.record;
        let mut out = LocationScore::new();
        out.set_status(raw.status);
        out.set_walk_score(raw.walk_score)?;
        out.set_walk_description(raw.walk_description);
        out.set_walk_updated(raw.walk_updated)?;
        out.set_transit_score(raw.transit_score)?;
        out.set_transit_description(raw.transit_description);
        out.set_transit_summary(raw.transit_summary);
        out.set_bike_score(raw.bike_score)?;
        out.set_bike_description(raw.bike_description);
        out.set_logo_url(raw.logo_url)?;
        out.set_more_info_icon(raw.more_info_icon)?;
        out.set_more_info_link(raw.more_info_link)?;
        out.set_help_link(raw.help_link)?;
        out.set_property_page_link(raw.property_page_link)?;
        out.set_address(raw.address);
        out.set_original_coordinates(raw.original_longitude, raw.original_latitude)?;
        out.set_snapped_coordinates(raw.snapped_longitude, raw.snapped_latitude)?;
        Ok(out)
    }
}
