// SPDX-License-Identifier: MPL-2.0
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Image Error: {0}")]
    Image(String),

    #[error("SVG Error: {0}")]
    Svg(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("JSON Error: {0}")]
    Json(String),

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Encoding Error: {0}")]
    Encoding(String),

    /// The requested product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// An operation needed a selected product and none was selected.
    #[error("No product selected")]
    NoProductSelected,

    /// The design session already produced its cart line item.
    #[error("Design session already exported")]
    SessionFinished,
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<image_rs::ImageError> for Error {
    fn from(err: image_rs::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::Encoding(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn product_not_found_names_the_id() {
        let err = Error::ProductNotFound("iphone-15".into());
        assert_eq!(err.to_string(), "Product not found: iphone-15");
    }

    #[test]
    fn base64_error_maps_to_encoding() {
        use base64::Engine;
        let decode_err = base64::engine::general_purpose::STANDARD
            .decode("@@@")
            .unwrap_err();
        let err: Error = decode_err.into();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
