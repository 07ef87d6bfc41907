#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown asset: {identifier}")]
    UnknownAsset { identifier: String },

    #[error("asset {identifier} is not a {expected}")]
    WrongAssetType {
        identifier: String,
        expected: &'static str,
    },

    #[error("malformed log: {reason}")]
    MalformedLog { reason: String },

    #[error("amount error: {reason}")]
    Amount { reason: String },

    #[error("registry error: {reason}")]
    Registry { reason: String },

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
