use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read feed file {path}: {source}")]
    FeedIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feed file {path}: {source}")]
    FeedParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("feed references unknown store slug \"{0}\"")]
    UnknownStore(String),

    #[error("feed item \"{name}\" rejected: {reason}")]
    Item { name: String, reason: String },

    #[error(transparent)]
    Db(#[from] trolley_db::DbError),
}
