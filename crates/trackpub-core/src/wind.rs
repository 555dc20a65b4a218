//! Wind-vector math and grid construction.
//!
//! The weather upstream reports wind as speed (km/h) plus direction (degrees
//! clockwise from north, the direction the wind blows *from*). The map widget
//! consumes a grid-forecast JSON of eastward (u) and northward (v) components
//! in m/s, in the GRIB-derived shape used by velocity layers: a `data` array
//! of two records (u then v), each with a geometry header.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

// GRIB2: category 2 = momentum; parameter 2 = U component, 3 = V component.
const PARAMETER_CATEGORY_MOMENTUM: u32 = 2;
const PARAMETER_NUMBER_U: u32 = 2;
const PARAMETER_NUMBER_V: u32 = 3;

/// Convert a km/h speed to m/s.
pub fn kmh_to_ms(kmh: f64) -> f64 {
    kmh / 3.6
}

/// Meteorological decomposition of a wind vector into Cartesian components.
///
/// `direction_deg` is degrees clockwise from north; the result is
/// `u = -s * sin(theta)`, `v = -s * cos(theta)` with `s` in m/s.
pub fn wind_components(speed_ms: f64, direction_deg: f64) -> (f64, f64) {
    let theta = direction_deg.to_radians();
    (-speed_ms * theta.sin(), -speed_ms * theta.cos())
}

/// A single wind sample as reported by the weather upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct WindObservation {
    pub speed_kmh: f64,
    pub direction_deg: f64,
    /// Upstream timestamp, minute precision, no zone designator.
    pub time: Option<String>,
}

impl WindObservation {
    pub fn speed_ms(&self) -> f64 {
        kmh_to_ms(self.speed_kmh)
    }

    /// Derived (u, v) components in m/s.
    pub fn components(&self) -> (f64, f64) {
        wind_components(self.speed_ms(), self.direction_deg)
    }
}

/// Geometry of the synthesized output grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub nx: usize,
    pub ny: usize,
    pub center_lat: f64,
    pub center_lon: f64,
    pub spacing_deg: f64,
}

impl GridSpec {
    pub fn cells(&self) -> usize {
        self.nx * self.ny
    }

    /// North-west origin latitude (`la1`).
    fn la1(&self) -> f64 {
        self.center_lat + (self.ny as f64 - 1.0) / 2.0 * self.spacing_deg
    }

    /// North-west origin longitude (`lo1`).
    fn lo1(&self) -> f64 {
        self.center_lon - (self.nx as f64 - 1.0) / 2.0 * self.spacing_deg
    }
}

/// Header of one component record, mirroring the GRIB fields the velocity
/// layer reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordHeader {
    #[serde(rename = "parameterCategory")]
    pub parameter_category: u32,
    #[serde(rename = "parameterNumber")]
    pub parameter_number: u32,
    pub nx: usize,
    pub ny: usize,
    pub lo1: f64,
    pub la1: f64,
    pub lo2: f64,
    pub la2: f64,
    pub dx: f64,
    pub dy: f64,
    #[serde(rename = "refTime")]
    pub ref_time: String,
}

/// One component record: geometry header plus row-major samples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VelocityRecord {
    pub header: RecordHeader,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridHeader {
    #[serde(rename = "refTime")]
    pub ref_time: String,
}

/// The full grid-forecast payload: u record followed by v record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WindGrid {
    pub header: GridHeader,
    pub data: Vec<VelocityRecord>,
}

impl WindGrid {
    /// Expand one point sample into a uniform `nx x ny` grid.
    ///
    /// Every cell repeats the sample's (u, v); the header describes a
    /// north-west-origin, row-major grid with `spacing_deg` cell spacing.
    pub fn from_sample(observation: &WindObservation, spec: &GridSpec) -> WindGrid {
        let (u, v) = observation.components();
        let ref_time = observation
            .time
            .as_deref()
            .map(normalize_ref_time)
            .unwrap_or_else(now_ref_time);

        let la1 = spec.la1();
        let lo1 = spec.lo1();
        let la2 = la1 - (spec.ny as f64 - 1.0) * spec.spacing_deg;
        let lo2 = lo1 + (spec.nx as f64 - 1.0) * spec.spacing_deg;

        let component_record = |parameter_number: u32, value: f64| VelocityRecord {
            header: RecordHeader {
                parameter_category: PARAMETER_CATEGORY_MOMENTUM,
                parameter_number,
                nx: spec.nx,
                ny: spec.ny,
                lo1,
                la1,
                lo2,
                la2,
                dx: spec.spacing_deg,
                dy: spec.spacing_deg,
                ref_time: ref_time.clone(),
            },
            data: vec![value; spec.cells()],
        };

        WindGrid {
            header: GridHeader {
                ref_time: ref_time.clone(),
            },
            data: vec![
                component_record(PARAMETER_NUMBER_U, u),
                component_record(PARAMETER_NUMBER_V, v),
            ],
        }
    }
}

/// Normalize an upstream timestamp ("2026-08-06T10:15", minute precision, no
/// zone) to RFC 3339 UTC. Unparseable input is passed through unchanged.
pub fn normalize_ref_time(raw: &str) -> String {
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        }
    }
    raw.to_string()
}

fn now_ref_time() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
