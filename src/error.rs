use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization error for {context}: {source}")]
    Serialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("feature #{index} has no name")]
    MissingName { index: usize },

    #[error("duplicate neighborhood name \"{name}\"")]
    DuplicateName { name: String },

    #[error("neighborhood \"{name}\": position has {len} coordinate(s), need at least 2")]
    ShortPosition { name: String, len: usize },

    #[error("neighborhood \"{name}\": ring has {vertices} distinct vertices, need at least 3")]
    DegenerateRing { name: String, vertices: usize },

    #[error("neighborhood \"{name}\" has no polygon rings")]
    EmptyBoundary { name: String },
}
