use quick_xml::escape::escape;

use crate::common::mapper::{apply_mappers, ParametersMapper};

pub const SOAP_ACTION_HEADER: &str = "SOAPAction";
pub const CONTENT_TYPE: &str = "text/xml; charset=utf-8";
pub const ACCEPT: &str = "text/xml";

const ENVELOPE_HEAD: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" "#,
    r#"xmlns:xsd="http://www.w3.org/2001/XMLSchema" "#,
    r#"xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
    "<soap:Body>"
);
const ENVELOPE_TAIL: &str = "</soap:Body></soap:Envelope>";

/// Render parameters as a flat `<name>value</name>` sequence, in the given order.
pub fn format_parameters(parameters: &[(String, String)], encode: bool) -> String {
    let mut fragment = String::new();
    for (name, value) in parameters {
        if encode {
            let name = escape(name.as_str());
            fragment.push_str(&format!("<{name}>{}</{name}>", escape(value.as_str())));
        } else {
            fragment.push_str(&format!("<{name}>{value}</{name}>"));
        }
    }
    fragment
}

/// Wrap the parameter fragment of `method` in a SOAP 1.1 envelope.
///
/// The namespace becomes the default namespace of the method element and is not validated.
pub fn format_envelope(method: &str, namespace: &str, parameters: &str) -> String {
    format!(r#"{ENVELOPE_HEAD}<{method} xmlns="{namespace}">{parameters}</{method}>{ENVELOPE_TAIL}"#)
}

/// Build the complete envelope: parameters, then mappers, then the envelope itself.
pub fn build_envelope(
    method: &str,
    namespace: &str,
    parameters: &[(String, String)],
    encode: bool,
    mappers: &[Box<dyn ParametersMapper>],
) -> String {
    let fragment = apply_mappers(mappers, format_parameters(parameters, encode));
    format_envelope(method, namespace, &fragment)
}

/// Value of the `SOAPAction` header: `{namespace}/{complement/}{method}`.
///
/// A single trailing slash of the namespace is removed first.
pub fn soap_action(namespace: &str, method: &str, complement: Option<&str>) -> String {
    let namespace = namespace.strip_suffix('/').unwrap_or(namespace);
    match complement {
        Some(complement) if !complement.is_empty() => format!("{namespace}/{complement}/{method}"),
        _ => format!("{namespace}/{method}"),
    }
}
