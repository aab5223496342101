use std::fmt;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::common::{messages, parsing, Authentication, InvokeOptions, ParametersMapper};
use crate::errors::RequestError;
use crate::result::CallResult;
use crate::session::Session;

/// A SOAP endpoint together with everything needed to call one of its methods.
///
/// Parameters, headers and mappers are kept in insertion order. The session can be
/// shared between services to keep cookies across calls.
///
/// # Example
/// ```no_run
/// use xitsoap::{SoapService, Result};
///
/// fn main() -> Result {
///     let mut service = SoapService::new("http://www.dneonline.com/calculator.asmx", "http://tempuri.org/");
///     service.add_parameter("intA", "1").add_parameter("intB", "2");
///     let result = service.invoke("Add")?;
///     println!("1 + 2 = {}", result.string_result);
///     Ok(())
/// }
/// ```
pub struct SoapService {
    /// Endpoint the envelope is posted to.
    pub url: String,
    /// Namespace of the service methods.
    pub namespace: String,
    /// Method parameters, in envelope order.
    pub parameters: Vec<(String, String)>,
    /// Custom HTTP headers, attached verbatim and in order.
    pub headers: Vec<(String, String)>,
    /// Credentials sent in the `Authorization` header.
    pub authentication: Option<Authentication>,
    /// Transforms of the parameter fragment, applied in order.
    pub mappers: Vec<Box<dyn ParametersMapper>>,
    /// Cookie jar of the calls.
    pub session: Session,
    /// Limit on the whole exchange, request write and response read included.
    pub timeout: Option<Duration>,
}

/// Everything put on the wire for one call.
#[derive(Debug)]
pub(crate) struct SoapRequest {
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SoapService {
    /// A service with a fresh session and no parameters.
    pub fn new(url: impl Into<String>, namespace: impl Into<String>) -> SoapService {
        SoapService::with_session(url, namespace, Session::new())
    }

    /// A service reusing the cookies of `session`.
    pub fn with_session(url: impl Into<String>, namespace: impl Into<String>, session: Session) -> SoapService {
        SoapService {
            url: url.into(),
            namespace: namespace.into(),
            parameters: Vec::new(),
            headers: Vec::new(),
            authentication: None,
            mappers: Vec::new(),
            session,
            timeout: None,
        }
    }

    /// Set a parameter. An existing parameter of the same name keeps its position.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        let name = name.into();
        let value = value.to_string();
        match self.parameters.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.parameters.push((name, value)),
        }
        self
    }

    /// Remove every parameter, to reuse the service for another call.
    pub fn clear_parameters(&mut self) -> &mut Self {
        self.parameters.clear();
        self
    }

    /// Add a custom HTTP header. Headers with the same name are all sent.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send `authentication` as the `Authorization` header of every call.
    pub fn set_authentication(&mut self, authentication: Authentication) -> &mut Self {
        self.authentication = Some(authentication);
        self
    }

    /// Register a parameter mapper, run after the ones already registered.
    pub fn add_mapper(&mut self, mapper: impl ParametersMapper + 'static) -> &mut Self {
        self.mappers.push(Box::new(mapper));
        self
    }

    /// Call `method` with the default options (parameters encoded, no complement).
    pub fn invoke(&self, method: &str) -> Result<CallResult, RequestError> {
        self.invoke_with(method, &InvokeOptions::default())
    }

    /// Call `method` and deserialize its structured result.
    pub fn invoke_as<T: DeserializeOwned>(&self, method: &str) -> Result<T, RequestError> {
        self.invoke(method)?.deserialize()
    }

    /// Call `method`.
    pub fn invoke_with(&self, method: &str, options: &InvokeOptions) -> Result<CallResult, RequestError> {
        let request = self.build_request(method, options)?;
        let client = self.session.blocking_client(self.timeout)?;

        debug!("sending {} request to: {}", method, request.url);
        let mut builder = client.post(request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let resp = builder.body(request.body).send()?;

        let status = resp.status();
        debug!("handling {} response from: {}, status: {}", method, request.url, status);
        let body = resp.text()?;
        parsing::parse_response(status.as_u16(), &body, method)
    }

    pub(crate) fn build_request(&self, method: &str, options: &InvokeOptions) -> Result<SoapRequest, RequestError> {
        if method.is_empty() {
            return Err(RequestError::InvalidMethodName);
        }
        let url = Url::parse(&self.url)?;

        let action = messages::soap_action(&self.namespace, method, options.soap_action_complement.as_deref());
        let mut headers = vec![
            (messages::SOAP_ACTION_HEADER.to_owned(), action),
            (CONTENT_TYPE.as_str().to_owned(), messages::CONTENT_TYPE.to_owned()),
            (ACCEPT.as_str().to_owned(), messages::ACCEPT.to_owned()),
        ];
        if let Some(authentication) = &self.authentication {
            headers.push((AUTHORIZATION.as_str().to_owned(), authentication.value().to_owned()));
        }
        headers.extend(self.headers.iter().cloned());

        let body = messages::build_envelope(
            method,
            &self.namespace,
            &self.parameters,
            options.encode,
            &self.mappers,
        );
        trace!("{} envelope: {}", method, body);

        Ok(SoapRequest { url, headers, body })
    }
}

impl fmt::Debug for SoapService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoapService")
            .field("url", &self.url)
            .field("namespace", &self.namespace)
            .field("parameters", &self.parameters)
            .field("headers", &self.headers)
            .field("authentication", &self.authentication)
            .field("mappers", &self.mappers.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}
