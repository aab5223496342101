//! This library is a minimal SOAP 1.1 client.
//!
//! It builds the envelope of a method call from an ordered list of parameters, posts it
//! with the matching `SOAPAction` header, strips namespaces from the response and
//! extracts the result either as an XML fragment or as plain text.
//!
//! ```no_run
//! use xitsoap::{Authentication, SoapService, Result};
//!
//! fn main() -> Result {
//!     let mut service = SoapService::new("http://localhost/Service.asmx", "http://tempuri.org/");
//!     service
//!         .set_authentication(Authentication::basic("user", "password"))
//!         .add_parameter("id", 7);
//!     let result = service.invoke("GetCustomer")?;
//!     println!("{}", result.string_result);
//!     Ok(())
//! }
//! ```
#![deny(missing_docs)]

#[macro_use]
extern crate log;

#[cfg(feature = "aio")]
pub mod aio;
mod common;
mod errors;
mod result;
mod service;
mod session;

pub use self::common::parsing::{strip_namespaces, unwrap_result_element};
pub use self::common::{Authentication, InvokeOptions, ParametersMapper};
pub use self::errors::{RequestError, Result};
pub use self::result::{CallResult, ResultShape};
pub use self::service::SoapService;
pub use self::session::Session;
