//! Built-in tool implementations for SevaHealth.
//!
//! Two capabilities back the assistant: locating empanelled hospitals near
//! a pincode, and searching the indexed health documents. Both read shared
//! in-memory data built once at startup; neither mutates anything.

pub mod document_search;
pub mod hospital_finder;

pub use document_search::{SearchDocumentsTool, TOP_K};
pub use hospital_finder::{
    DatasetError, FindHospitalsTool, Hospital, HospitalDirectory, NearbyHospital, PincodeRow,
    haversine_km, MAX_RESULTS, SEARCH_RADIUS_KM,
};

use std::sync::Arc;

use sevahealth_core::model::ModelProvider;
use sevahealth_core::tool::ToolRegistry;
use sevahealth_index::DocumentIndex;

/// Create the registry with both built-in tools.
pub fn build_registry(
    directory: Arc<HospitalDirectory>,
    index: Arc<DocumentIndex>,
    provider: Arc<dyn ModelProvider>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(FindHospitalsTool::new(directory)));
    registry.register(Box::new(SearchDocumentsTool::new(index, provider)));
    registry
}
