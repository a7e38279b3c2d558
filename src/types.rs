//! Core domain types for the village atlas.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a village record.
///
/// Identifiers are opaque strings assigned either by the remote store or by
/// the client at creation time. An empty string means "not yet assigned".
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VillageId(pub String);

impl VillageId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        VillageId(id.into())
    }

    /// True when no identifier has been assigned yet.
    pub fn is_unassigned(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for VillageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VillageId({})", self.0)
    }
}

impl fmt::Display for VillageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VillageId {
    fn from(id: &str) -> Self {
        VillageId(id.to_string())
    }
}

/// Visit status of a village.
///
/// The remote store carries status as a free-form string; this is the closed
/// representation used everywhere inside the crate. Values the decoder does
/// not recognize map to [`Status::Unknown`] rather than failing, so a stray
/// document can never abort a snapshot. `Unknown` is only ever produced by
/// decoding; application flows pick one of the three real statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Visited,
    Planned,
    NotVisited,
    Unknown,
}

impl Status {
    /// The three recognized statuses, in display order.
    pub const RECOGNIZED: [Status; 3] = [Status::Visited, Status::Planned, Status::NotVisited];

    /// Parse the wire form. Accepts both the kebab-case and the legacy
    /// underscore spelling of `not-visited`; anything else is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "visited" => Status::Visited,
            "planned" => Status::Planned,
            "not-visited" | "not_visited" => Status::NotVisited,
            _ => Status::Unknown,
        }
    }

    /// Canonical wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Visited => "visited",
            Status::Planned => "planned",
            Status::NotVisited => "not-visited",
            Status::Unknown => "unknown",
        }
    }

    /// Human-readable label (dashes replaced by spaces).
    pub fn label(&self) -> &'static str {
        match self {
            Status::Visited => "visited",
            Status::Planned => "planned",
            Status::NotVisited => "not visited",
            Status::Unknown => "unknown",
        }
    }

    /// True for one of the three recognized statuses.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Status::Unknown)
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        Status::parse(&value)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parent contact attached to a village.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub contact: String,
}

impl Contact {
    pub fn new(name: impl Into<String>, contact: impl Into<String>) -> Self {
        Contact {
            name: name.into(),
            contact: contact.into(),
        }
    }
}

fn unplaced_coords() -> [f64; 2] {
    [f64::NAN, f64::NAN]
}

fn coords_unplaced(coords: &[f64; 2]) -> bool {
    !(coords[0].is_finite() && coords[1].is_finite())
}

/// Decode a coordinate pair from whatever the remote document holds.
///
/// Anything other than an array whose first two entries are numbers (null,
/// a string, a short array, `[null, null]` as written back for an unplaced
/// record) becomes the NaN placeholder instead of failing, so one bad
/// coordinate field can never sink the whole document.
fn lenient_coords<'de, D>(deserializer: D) -> Result<[f64; 2], D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let pair = value.as_array().map(|a| {
        (
            a.first().and_then(serde_json::Value::as_f64),
            a.get(1).and_then(serde_json::Value::as_f64),
        )
    });
    Ok(match pair {
        Some((Some(lat), Some(lng))) => [lat, lng],
        _ => unplaced_coords(),
    })
}

/// One tracked village.
///
/// Every field tolerates being absent in the remote document; missing
/// coordinates decode to NaN placeholders which the map guard
/// ([`Village::map_position`]) then filters out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Village {
    /// Record identifier. Empty until assigned.
    #[serde(default)]
    pub id: VillageId,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Administrative region label (may be empty).
    #[serde(default, alias = "tehsil")]
    pub region: String,

    /// Geographic position as `[lat, lng]`. Unplaced records (NaN
    /// placeholders) serialize with the field omitted so they survive a
    /// save/resync round trip.
    #[serde(
        default = "unplaced_coords",
        deserialize_with = "lenient_coords",
        skip_serializing_if = "coords_unplaced"
    )]
    pub coords: [f64; 2],

    /// Population, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u64>,

    /// Visit status.
    #[serde(default)]
    pub status: Status,

    /// ISO date of the last interaction.
    #[serde(default, alias = "lastVisit", skip_serializing_if = "Option::is_none")]
    pub last_interaction: Option<String>,

    /// ISO date of the next planned visit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_visit_target: Option<String>,

    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Parent contacts. Empty means "no known contacts".
    #[serde(default)]
    pub parents: Vec<Contact>,
}

impl Village {
    /// Create a new, not-yet-saved village at the given position.
    pub fn new(name: impl Into<String>, coords: [f64; 2]) -> Self {
        Village {
            id: VillageId::default(),
            name: name.into(),
            region: String::new(),
            coords,
            population: None,
            status: Status::NotVisited,
            last_interaction: None,
            next_visit_target: None,
            notes: None,
            parents: Vec::new(),
        }
    }

    /// Position for map rendering.
    ///
    /// Returns `None` unless both coordinates are finite, so a record with
    /// malformed or missing coordinates is simply excluded from the map.
    pub fn map_position(&self) -> Option<[f64; 2]> {
        let [lat, lng] = self.coords;
        if lat.is_finite() && lng.is_finite() {
            Some([lat, lng])
        } else {
            None
        }
    }
}
