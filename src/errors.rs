use std::io;
#[cfg(feature = "aio")]
use tokio::time::error::Elapsed;

/// Errors that can occur while calling a SOAP method.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("IO Error: {0}")]
    /// I/O error
    IoError(#[from] io::Error),
    #[error("Reqwest error: {0}")]
    /// Connection, timeout or request building error
    ReqwestError(#[from] reqwest::Error),
    #[error("Error parsing URI: {0}")]
    /// Invalid service url
    InvalidUrl(#[from] url::ParseError),
    #[error("The service answered with HTTP status {0}: '{1}'")]
    /// Non-success HTTP status without a SOAP fault body
    HttpStatus(u16, String),
    #[error("The service returned a SOAP fault {code}: {message}")]
    /// Non-success HTTP status carrying a SOAP fault
    SoapFault {
        /// Content of `faultcode`
        code: String,
        /// Content of `faultstring`
        message: String,
    },
    #[error("The response from the service could not be parsed: {0}")]
    /// Response body is not well-formed XML
    XmlError(#[from] xmltree::ParseError),
    #[error("XML serialization error: {0}")]
    /// Result document could not be serialized
    XmlWriteError(#[from] xmltree::Error),
    #[error("The method name must not be empty")]
    /// Empty method name
    InvalidMethodName,
    #[error("No '{0}Response' element in the response")]
    /// The response carries no element for the called method
    MissingResponse(String),
    #[error("The response contains {count} '{method}Response' elements")]
    /// The response carries more than one element for the called method
    AmbiguousResponse {
        /// Called method
        method: String,
        /// Number of matching elements
        count: usize,
    },
    #[error("The result could not be deserialized: {0}")]
    /// Typed deserialization of a structured result failed
    DeserializeError(#[from] quick_xml::DeError),
    #[error("The scalar result could not be parsed: '{0}'")]
    /// Typed parsing of a scalar result failed
    InvalidScalar(String),
}

#[cfg(feature = "aio")]
impl From<Elapsed> for RequestError {
    fn from(_err: Elapsed) -> RequestError {
        RequestError::IoError(io::Error::new(io::ErrorKind::TimedOut, "soap call timed out"))
    }
}

/// A result type where the error is `xitsoap::RequestError`.
pub type Result<T = ()> = std::result::Result<T, RequestError>;
