use crate::errors::RequestError;
use crate::service::SoapRequest;

/// Post `request` and read the whole response body.
///
/// Returns the HTTP status together with the body, which is read to the end before
/// returning so the connection is released on every path.
pub(crate) async fn send_async(client: &reqwest::Client, request: SoapRequest) -> Result<(u16, String), RequestError> {
    let mut builder = client.post(request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }

    let resp = builder.body(request.body).send().await?;
    let status = resp.status().as_u16();

    Ok((status, resp.text().await?))
}
