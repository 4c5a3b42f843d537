//! Hospital lookup by pincode.
//!
//! Loads the empanelled-hospital directory and the pincode coordinate table
//! once at startup, both JSON arrays. Lookup resolves the pincode to a
//! coordinate exactly (no fuzzy matching; an unknown pincode yields an empty
//! result, not an error), filters hospitals to within 10 km by haversine
//! distance, and returns at most the first 10 in dataset order.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sevahealth_core::error::ToolError;
use sevahealth_core::tool::{Tool, ToolResult};
use thiserror::Error;
use tracing::{debug, info};

/// Search radius around the resolved pincode coordinate, in kilometers.
pub const SEARCH_RADIUS_KM: f64 = 10.0;

/// At most this many hospitals come back, in dataset order.
pub const MAX_RESULTS: usize = 10;

/// One row of the hospital directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub sno: u32,
    pub hospital_id: String,
    pub specialties: String,
    pub district: String,
    pub taluka: String,
    pub hospital_name: String,
    pub address: String,
    pub pincode: u32,
    pub contact_number: String,
    pub email: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One row of the pincode coordinate table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PincodeRow {
    pub pincode: u32,
    pub latitude: f64,
    pub longitude: f64,
}

/// A hospital row plus its distance from the query coordinate.
///
/// Serializes as the full hospital record with a `distance` field appended,
/// which is the shape the model is prompted to read.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyHospital {
    #[serde(flatten)]
    pub hospital: Hospital,
    pub distance: f64,
}

/// Failures loading the datasets at startup.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse dataset {path}: {reason}")]
    Parse { path: String, reason: String },
}

/// The in-memory hospital directory and pincode coordinate table.
///
/// Both datasets are read-only after load; dataset order is preserved so
/// lookups return rows in source order rather than nearest-first.
pub struct HospitalDirectory {
    hospitals: Vec<Hospital>,
    pincode_coords: HashMap<u32, (f64, f64)>,
}

impl HospitalDirectory {
    /// Build a directory from already-loaded rows.
    pub fn new(hospitals: Vec<Hospital>, pincodes: Vec<PincodeRow>) -> Self {
        let pincode_coords = pincodes
            .into_iter()
            .map(|row| (row.pincode, (row.latitude, row.longitude)))
            .collect();
        Self {
            hospitals,
            pincode_coords,
        }
    }

    /// Load both datasets from JSON files.
    pub fn load(
        hospitals_path: impl AsRef<Path>,
        pincodes_path: impl AsRef<Path>,
    ) -> Result<Self, DatasetError> {
        let hospitals: Vec<Hospital> = load_json(hospitals_path.as_ref())?;
        let pincodes: Vec<PincodeRow> = load_json(pincodes_path.as_ref())?;
        info!(
            hospitals = hospitals.len(),
            pincodes = pincodes.len(),
            "Loaded hospital datasets"
        );
        Ok(Self::new(hospitals, pincodes))
    }

    /// Number of hospital rows.
    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    /// Exact pincode to coordinate resolution.
    pub fn resolve_pincode(&self, pincode: u32) -> Option<(f64, f64)> {
        self.pincode_coords.get(&pincode).copied()
    }

    /// Hospitals within [`SEARCH_RADIUS_KM`] of the pincode's coordinate.
    ///
    /// An unresolvable pincode yields an empty list. Results keep dataset
    /// order and are capped at [`MAX_RESULTS`].
    pub fn nearby(&self, pincode: u32) -> Vec<NearbyHospital> {
        let Some((lat, lon)) = self.resolve_pincode(pincode) else {
            debug!(pincode, "No coordinates found for pincode");
            return Vec::new();
        };

        self.hospitals
            .iter()
            .filter_map(|h| {
                let distance = haversine_km(lat, lon, h.latitude, h.longitude);
                (distance <= SEARCH_RADIUS_KM).then(|| NearbyHospital {
                    hospital: h.clone(),
                    distance,
                })
            })
            .take(MAX_RESULTS)
            .collect()
    }
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let raw = std::fs::read_to_string(path).map_err(|e| DatasetError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&raw).map_err(|e| DatasetError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Great-circle distance in kilometers between two coordinates.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// The `find_hospitals` tool over a shared [`HospitalDirectory`].
pub struct FindHospitalsTool {
    directory: Arc<HospitalDirectory>,
}

impl FindHospitalsTool {
    pub fn new(directory: Arc<HospitalDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for FindHospitalsTool {
    fn name(&self) -> &str {
        "find_hospitals"
    }

    fn description(&self) -> &str {
        "Find empanelled hospitals within 10 km of an Indian pincode. Returns hospital names, addresses, specialties, contact numbers, and distances in kilometers. Returns an empty list when the pincode is unknown or no hospital is nearby."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "pincode": {
                    "type": "integer",
                    "description": "The 6-digit Indian postal pincode to search around"
                }
            },
            "required": ["pincode"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        // Models occasionally send the pincode as a string; accept both.
        let raw = arguments["pincode"]
            .as_u64()
            .or_else(|| {
                arguments["pincode"]
                    .as_str()
                    .and_then(|s| s.trim().parse().ok())
            })
            .ok_or_else(|| {
                ToolError::InvalidArguments("Missing or non-numeric 'pincode' argument".into())
            })?;

        let nearby = match u32::try_from(raw) {
            Ok(pincode) => self.directory.nearby(pincode),
            Err(_) => Vec::new(),
        };

        debug!(pincode = raw, results = nearby.len(), "Hospital lookup");

        let data = serde_json::to_value(&nearby).map_err(|e| ToolError::InvocationFailed {
            tool_name: "find_hospitals".into(),
            reason: e.to_string(),
        })?;

        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output: data.to_string(),
            data: Some(data),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital(sno: u32, name: &str, pincode: u32, lat: f64, lon: f64) -> Hospital {
        Hospital {
            sno,
            hospital_id: format!("HOSP{sno:04}"),
            specialties: "S6 Orthopaedics, S1 General Surgery".into(),
            district: "Pune".into(),
            taluka: "Pune City".into(),
            hospital_name: name.into(),
            address: "Station Road, Pune".into(),
            pincode,
            contact_number: "020-26126296".into(),
            email: "hospital@example.in".into(),
            latitude: lat,
            longitude: lon,
        }
    }

    /// Pune-area fixture: pincode 411001 resolves to (18.5196, 73.8554).
    fn pune_directory() -> HospitalDirectory {
        let hospitals = vec![
            hospital(1, "Sassoon General Hospital", 411001, 18.5286, 73.8692),
            hospital(2, "Ruby Hall Clinic", 411001, 18.5362, 73.8777),
            // Roughly 150 km away (Mumbai)
            hospital(3, "JJ Hospital Mumbai", 400008, 18.9633, 72.8343),
        ];
        let pincodes = vec![PincodeRow {
            pincode: 411001,
            latitude: 18.5196,
            longitude: 73.8554,
        }];
        HospitalDirectory::new(hospitals, pincodes)
    }

    #[test]
    fn haversine_zero_distance() {
        let d = haversine_km(18.5196, 73.8554, 18.5196, 73.8554);
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn haversine_pune_to_mumbai() {
        // Pune railway station to Mumbai CST is roughly 120 km by air
        let d = haversine_km(18.5196, 73.8554, 18.9398, 72.8355);
        assert!(d > 100.0 && d < 140.0, "got {d}");
    }

    #[test]
    fn nearby_filters_by_radius() {
        let directory = pune_directory();
        let results = directory.nearby(411001);

        assert_eq!(results.len(), 2);
        for r in &results {
            assert!(r.distance <= SEARCH_RADIUS_KM);
        }
        // Mumbai hospital filtered out
        assert!(!results.iter().any(|r| r.hospital.hospital_name.contains("Mumbai")));
    }

    #[test]
    fn nearby_preserves_dataset_order() {
        let directory = pune_directory();
        let results = directory.nearby(411001);

        // Source order, not nearest-first
        assert_eq!(results[0].hospital.sno, 1);
        assert_eq!(results[1].hospital.sno, 2);
    }

    #[test]
    fn nearby_caps_at_max_results() {
        let hospitals: Vec<Hospital> = (1..=25)
            .map(|i| hospital(i, &format!("Hospital {i}"), 411001, 18.52, 73.855))
            .collect();
        let pincodes = vec![PincodeRow {
            pincode: 411001,
            latitude: 18.5196,
            longitude: 73.8554,
        }];
        let directory = HospitalDirectory::new(hospitals, pincodes);

        let results = directory.nearby(411001);
        assert_eq!(results.len(), MAX_RESULTS);
        // The first ten rows, in order
        assert_eq!(results[0].hospital.sno, 1);
        assert_eq!(results[9].hospital.sno, 10);
    }

    #[test]
    fn unknown_pincode_yields_empty() {
        let directory = pune_directory();
        assert!(directory.nearby(0).is_empty());
        assert!(directory.nearby(999999).is_empty());
    }

    #[tokio::test]
    async fn tool_returns_hospitals_for_known_pincode() {
        let tool = FindHospitalsTool::new(Arc::new(pune_directory()));
        let result = tool
            .invoke(serde_json::json!({"pincode": 411001}))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("Sassoon General Hospital"));
        assert!(result.output.contains("distance"));

        let data = result.data.unwrap();
        assert_eq!(data.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn tool_returns_empty_list_for_unknown_pincode() {
        let tool = FindHospitalsTool::new(Arc::new(pune_directory()));
        let result = tool
            .invoke(serde_json::json!({"pincode": 0}))
            .await
            .unwrap();

        // Unresolvable pincode is a successful empty result, not an error
        assert!(result.success);
        assert_eq!(result.output, "[]");
    }

    #[tokio::test]
    async fn tool_accepts_string_pincode() {
        let tool = FindHospitalsTool::new(Arc::new(pune_directory()));
        let result = tool
            .invoke(serde_json::json!({"pincode": "411001"}))
            .await
            .unwrap();

        assert!(result.success);
        assert!(result.output.contains("Ruby Hall Clinic"));
    }

    #[tokio::test]
    async fn tool_rejects_missing_pincode() {
        let tool = FindHospitalsTool::new(Arc::new(pune_directory()));
        let result = tool.invoke(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }

    #[test]
    fn nearby_hospital_serializes_flat_with_distance() {
        let nearby = NearbyHospital {
            hospital: hospital(1, "Sassoon General Hospital", 411001, 18.5286, 73.8692),
            distance: 1.9,
        };
        let json = serde_json::to_value(&nearby).unwrap();
        // Flat record: hospital fields and distance at the same level
        assert_eq!(json["hospital_name"], "Sassoon General Hospital");
        assert_eq!(json["pincode"], 411001);
        assert!((json["distance"].as_f64().unwrap() - 1.9).abs() < 1e-9);
    }

    #[test]
    fn datasets_parse_from_json() {
        let raw = r#"[{
            "sno": 1,
            "hospital_id": "HOSP0001",
            "specialties": "S6 Orthopaedics",
            "district": "Pune",
            "taluka": "Pune City",
            "hospital_name": "Sassoon General Hospital",
            "address": "Near Pune Station",
            "pincode": 411001,
            "contact_number": "020-26126296",
            "email": "sassoon@example.in",
            "latitude": 18.5286,
            "longitude": 73.8692
        }]"#;
        let hospitals: Vec<Hospital> = serde_json::from_str(raw).unwrap();
        assert_eq!(hospitals.len(), 1);
        assert_eq!(hospitals[0].district, "Pune");

        let raw = r#"[{"pincode": 411001, "latitude": 18.5196, "longitude": 73.8554}]"#;
        let pincodes: Vec<PincodeRow> = serde_json::from_str(raw).unwrap();
        assert_eq!(pincodes[0].pincode, 411001);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = HospitalDirectory::load("/nonexistent/hospitals.json", "/nonexistent/pins.json")
            .unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
    }
}
