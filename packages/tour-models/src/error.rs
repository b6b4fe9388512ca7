use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid GeoJSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("GeoJSON document has no `features` array")]
    MissingFeatures,
}
