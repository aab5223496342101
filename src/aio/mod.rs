//! Async flavour of the SOAP call, enabled with the `aio` feature.

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::timeout;

use crate::common::{parsing, InvokeOptions};
use crate::errors::RequestError;
use crate::result::CallResult;
use crate::service::SoapService;

mod soap;

impl SoapService {
    /// Call `method` with the default options, without blocking the current thread.
    pub async fn invoke_async(&self, method: &str) -> Result<CallResult, RequestError> {
        self.invoke_async_with(method, &InvokeOptions::default()).await
    }

    /// Call `method` and deserialize its structured result.
    pub async fn invoke_async_as<T: DeserializeOwned>(&self, method: &str) -> Result<T, RequestError> {
        self.invoke_async(method).await?.deserialize()
    }

    /// Call `method` without blocking the current thread.
    pub async fn invoke_async_with(&self, method: &str, options: &InvokeOptions) -> Result<CallResult, RequestError> {
        let request = self.build_request(method, options)?;
        let client = self.session.async_client()?;

        debug!("sending {} request to: {}", method, request.url);
        let (status, body) = run_with_timeout(self.timeout, soap::send_async(&client, request)).await??;

        debug!("handling {} response, status: {}", method, status);
        parsing::parse_response(status, &body, method)
    }
}

async fn run_with_timeout<F>(timeout_value: Option<Duration>, fut: F) -> Result<F::Output, RequestError>
where
    F: Future,
{
    match timeout_value {
        Some(t) => Ok(timeout(t, fut).await?),
        None => Ok(fut.await),
    }
}
