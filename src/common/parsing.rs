use xmltree::{Element, EmitterConfig, XMLNode};

use crate::errors::RequestError;
use crate::result::{CallResult, ResultShape};

/// Name of the wrapper element of `CallResult::xml_result`.
pub const RESULT_ROOT: &str = "root";

/// Parse a response body and derive the result of `method`.
///
/// Non-success statuses are turned into errors before the body is interpreted as a
/// regular response.
pub fn parse_response(status: u16, body: &str, method: &str) -> Result<CallResult, RequestError> {
    if !(200..300).contains(&status) {
        if let Some((code, message)) = parse_fault(body) {
            return Err(RequestError::SoapFault { code, message });
        }
        return Err(RequestError::HttpStatus(status, body.to_owned()));
    }

    let mut document = Element::parse(body.as_bytes())?;
    strip_namespaces(&mut document);
    extract_result(document, method)
}

/// Extract `faultcode` and `faultstring` from a SOAP fault body, if it is one.
pub fn parse_fault(body: &str) -> Option<(String, String)> {
    let mut document = Element::parse(body.as_bytes()).ok()?;
    strip_namespaces(&mut document);

    let fault = descendants_and_self(&document)
        .into_iter()
        .find(|element| element.name == "Fault")?;
    let text_of = |name: &str| {
        fault
            .get_child(name)
            .and_then(|child| child.get_text())
            .map(|text| text.trim().to_owned())
            .unwrap_or_default()
    };
    Some((text_of("faultcode"), text_of("faultstring")))
}

/// Remove namespace qualification from every element and attribute name of the tree.
///
/// Namespace declarations are dropped rather than renamed. Element order, attribute
/// order and text content are left untouched, and applying this twice is the same
/// as applying it once.
pub fn strip_namespaces(root: &mut Element) {
    let mut pending = vec![root];
    while let Some(element) = pending.pop() {
        strip_element(element);
        pending.extend(element.children.iter_mut().filter_map(|node| match node {
            XMLNode::Element(child) => Some(child),
            _ => None,
        }));
    }
}

fn strip_element(element: &mut Element) {
    element.prefix = None;
    element.namespace = None;
    element.namespaces = None;
    if let Some(local) = local_name(&element.name) {
        element.name = local.to_owned();
    }

    let attributes = std::mem::take(&mut element.attributes);
    for (name, value) in attributes {
        if is_namespace_declaration(&name) {
            continue;
        }
        let name = local_name(&name).map(str::to_owned).unwrap_or(name);
        element.attributes.insert(name, value);
    }
}

fn local_name(name: &str) -> Option<&str> {
    name.split_once(':').map(|(_, local)| local)
}

fn is_namespace_declaration(name: &str) -> bool {
    name == "xmlns" || name.starts_with("xmlns:")
}

/// Locate the single `{method}Response` element and build the result from it.
pub fn extract_result(document: Element, method: &str) -> Result<CallResult, RequestError> {
    let response_name = format!("{method}Response");
    let (xml_result, string_result, shape) = {
        let matches: Vec<&Element> = descendants(&document)
            .filter(|element| element.name == response_name)
            .collect();

        let response = match matches.as_slice() {
            [] => return Err(RequestError::MissingResponse(method.to_owned())),
            [response] => *response,
            _ => {
                return Err(RequestError::AmbiguousResponse {
                    method: method.to_owned(),
                    count: matches.len(),
                })
            }
        };

        match first_child(response) {
            Some(XMLNode::Element(_)) => {
                let xml_result = unwrap_result_element(response);
                let string_result = to_xml_string(&xml_result)?;
                (xml_result, string_result, ResultShape::Structured)
            }
            first => {
                // An empty response element gives an empty scalar.
                let text = first.map(node_string).unwrap_or_default();
                (scalar_root(&text), text, ResultShape::Scalar)
            }
        }
    };
    trace!("extracted {:?} result for {}: {}", shape, method, string_result);

    Ok(CallResult {
        soap_response: document,
        xml_result,
        string_result,
        shape,
    })
}

/// Copy the content of a structured response under a new `root` element.
///
/// SOAP toolkits wrap the returned value in a single `{method}Result` element, so
/// the first descendant of the response is skipped. Every other descendant element is
/// cloned into the root in document order; nested elements are therefore present both
/// inside their parent and as direct children of the root.
pub fn unwrap_result_element(response: &Element) -> Element {
    let mut root = Element::new(RESULT_ROOT);
    let content = descendants(response).skip(1);
    root.children.extend(content.map(|element| XMLNode::Element(element.clone())));
    root
}

fn scalar_root(text: &str) -> Element {
    let mut root = Element::new(RESULT_ROOT);
    if !text.is_empty() {
        root.children.push(XMLNode::Text(text.to_owned()));
    }
    root
}

/// First child that decides the result shape.
///
/// Whitespace-only text between elements is formatting, not a value, and is passed
/// over unless nothing else follows it.
fn first_child(element: &Element) -> Option<&XMLNode> {
    element
        .children
        .iter()
        .find(|node| !matches!(node, XMLNode::Text(text) if text.trim().is_empty()))
        .or_else(|| element.children.first())
}

fn node_string(node: &XMLNode) -> String {
    match node {
        XMLNode::Text(text) | XMLNode::CData(text) => text.clone(),
        XMLNode::Comment(comment) => format!("<!--{comment}-->"),
        XMLNode::ProcessingInstruction(target, Some(data)) => format!("<?{target} {data}?>"),
        XMLNode::ProcessingInstruction(target, None) => format!("<?{target}?>"),
        // elements take the structured path
        XMLNode::Element(_) => String::new(),
    }
}

/// All elements below `root` in document order, `root` excluded.
fn descendants(root: &Element) -> impl Iterator<Item = &Element> {
    descendants_and_self(root).into_iter().skip(1)
}

/// All elements of the tree in document order, `root` first.
fn descendants_and_self(root: &Element) -> Vec<&Element> {
    let mut found = Vec::new();
    let mut pending = vec![root];
    while let Some(element) = pending.pop() {
        found.push(element);
        let children = element.children.iter().filter_map(|node| match node {
            XMLNode::Element(child) => Some(child),
            _ => None,
        });
        // reversed so the first child is popped first
        pending.extend(children.rev());
    }
    found
}

/// Serialize an element without document declaration or indentation.
pub fn to_xml_string(element: &Element) -> Result<String, RequestError> {
    let mut buf = Vec::new();
    let config = EmitterConfig::new().write_document_declaration(false);
    element.write_with_config(&mut buf, config)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADD_RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soap:Body>
    <AddResponse xmlns="http://tempuri.org/">
      <AddResult>3</AddResult>
    </AddResponse>
  </soap:Body>
</soap:Envelope>"#;

    const SCALAR_RESPONSE: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><m:FooResponse xmlns:m="urn:foo">42</m:FooResponse></soap:Body></soap:Envelope>"#;

    const STRUCTURED_RESPONSE: &str = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><m:FooResponse xmlns:m="urn:foo"><m:FooResult><m:A>1</m:A><m:B>2</m:B></m:FooResult></m:FooResponse></soap:Body></soap:Envelope>"#;

    const STRUCTURED_INDENTED: &str = "<Body>\n  <FooResponse>\n    <FooResult>\n      <A>1</A>\n    </FooResult>\n  </FooResponse>\n</Body>";

    const NAMESPACED: &str = r#"<a:root xmlns:a="urn:a" xmlns:b="urn:b" xmlns="urn:default" b:kind="x" plain="y"><b:child b:id="1">text<inner xmlns="urn:other">deep</inner></b:child><other/></a:root>"#;

    fn stripped(xml: &str) -> Element {
        let mut document = Element::parse(xml.as_bytes()).unwrap();
        strip_namespaces(&mut document);
        document
    }

    #[test]
    fn strip_removes_prefixes_and_declarations() {
        let document = stripped(NAMESPACED);
        let serialized = to_xml_string(&document).unwrap();

        assert!(!serialized.contains("xmlns"), "{serialized}");
        assert!(!serialized.contains(':'), "{serialized}");
        assert_eq!(document.name, "root");
        assert_eq!(document.attributes.get("kind").map(String::as_str), Some("x"));
        assert_eq!(document.attributes.get("plain").map(String::as_str), Some("y"));

        let child = document.get_child("child").unwrap();
        assert_eq!(child.attributes.get("id").map(String::as_str), Some("1"));
        assert_eq!(child.get_text().unwrap(), "text");
        assert_eq!(child.get_child("inner").unwrap().get_text().unwrap(), "deep");
    }

    #[test]
    fn strip_is_idempotent() {
        let once = stripped(NAMESPACED);
        let mut twice = once.clone();
        strip_namespaces(&mut twice);

        assert_eq!(once, twice);
        assert_eq!(to_xml_string(&once).unwrap(), to_xml_string(&twice).unwrap());
    }

    #[test]
    fn strip_keeps_element_order() {
        let document = stripped(r#"<x:r xmlns:x="urn:x"><x:c/><x:a/><x:b/></x:r>"#);
        let names: Vec<&str> = document
            .children
            .iter()
            .filter_map(|node| node.as_element())
            .map(|element| element.name.as_str())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn strip_renames_prefixed_names_built_by_hand() {
        let mut element = Element::new("s:Envelope");
        element
            .attributes
            .insert("xmlns:s".to_owned(), "http://schemas.xmlsoap.org/soap/envelope/".to_owned());
        element.attributes.insert("s:encodingStyle".to_owned(), "enc".to_owned());

        strip_namespaces(&mut element);
        assert_eq!(element.name, "Envelope");
        assert_eq!(element.attributes.len(), 1);
        assert_eq!(element.attributes.get("encodingStyle").map(String::as_str), Some("enc"));
    }

    #[test]
    fn structured_result_skips_result_wrapper() {
        let result = extract_result(stripped(STRUCTURED_RESPONSE), "Foo").unwrap();

        assert_eq!(result.shape, ResultShape::Structured);
        assert_eq!(result.xml_result.name, RESULT_ROOT);
        assert!(result.xml_result.get_child("FooResult").is_none());
        assert_eq!(result.string_result, "<root><A>1</A><B>2</B></root>");
        assert_eq!(to_xml_string(&result.xml_result).unwrap(), result.string_result);
    }

    #[test]
    fn structured_result_flattens_nested_descendants() {
        let document = stripped(
            "<Envelope><Body><GetResponse><GetResult><Item><Id>7</Id></Item></GetResult></GetResponse></Body></Envelope>",
        );
        let result = extract_result(document, "Get").unwrap();
        assert_eq!(result.string_result, "<root><Item><Id>7</Id></Item><Id>7</Id></root>");
    }

    #[test]
    fn scalar_result_wraps_text() {
        let result = extract_result(stripped(SCALAR_RESPONSE), "Foo").unwrap();

        assert_eq!(result.shape, ResultShape::Scalar);
        assert_eq!(result.string_result, "42");
        assert_eq!(result.xml_result.name, RESULT_ROOT);
        assert_eq!(result.xml_result.get_text().unwrap(), "42");
        assert_eq!(to_xml_string(&result.xml_result).unwrap(), "<root>42</root>");
    }

    #[test]
    fn empty_response_is_empty_scalar() {
        let result = extract_result(stripped("<Body><FooResponse/></Body>"), "Foo").unwrap();

        assert_eq!(result.shape, ResultShape::Scalar);
        assert_eq!(result.string_result, "");
        assert!(result.xml_result.children.is_empty());
    }

    #[test]
    fn single_result_child_leaves_empty_root() {
        let result = extract_result(stripped(ADD_RESPONSE), "Add").unwrap();

        assert_eq!(result.shape, ResultShape::Structured);
        assert_eq!(result.string_result, "<root />");
        assert_eq!(result.soap_response.name, "Envelope");
    }

    #[test]
    fn response_name_is_case_sensitive() {
        let err = extract_result(stripped(ADD_RESPONSE), "add").unwrap_err();
        assert!(matches!(err, RequestError::MissingResponse(ref m) if m == "add"), "{err:?}");
    }

    #[test]
    fn multiple_responses_are_rejected() {
        let document = stripped("<Body><FooResponse>1</FooResponse><FooResponse>2</FooResponse></Body>");
        let err = extract_result(document, "Foo").unwrap_err();
        assert!(matches!(err, RequestError::AmbiguousResponse { count: 2, .. }), "{err:?}");
    }

    #[test]
    fn document_root_is_not_searched() {
        let err = extract_result(stripped("<FooResponse>ok</FooResponse>"), "Foo").unwrap_err();
        assert!(matches!(err, RequestError::MissingResponse(_)), "{err:?}");
    }

    #[test]
    fn leading_text_makes_a_scalar() {
        let document = stripped("<Body><FooResponse>hello<Extra>1</Extra></FooResponse></Body>");
        let result = extract_result(document, "Foo").unwrap();

        assert_eq!(result.shape, ResultShape::Scalar);
        assert_eq!(result.string_result, "hello");
        assert_eq!(to_xml_string(&result.xml_result).unwrap(), "<root>hello</root>");
    }

    #[test]
    fn leading_element_makes_a_structure() {
        let document = stripped("<Body><FooResponse><Extra>1</Extra>tail</FooResponse></Body>");
        let result = extract_result(document, "Foo").unwrap();

        assert_eq!(result.shape, ResultShape::Structured);
        assert_eq!(result.string_result, "<root />");
    }

    #[test]
    fn indentation_before_result_is_ignored() {
        let result = extract_result(stripped(STRUCTURED_INDENTED), "Foo").unwrap();

        assert_eq!(result.shape, ResultShape::Structured);
        assert_eq!(result.string_result, "<root><A>1</A></root>");
    }

    #[test]
    fn leading_cdata_makes_a_scalar() {
        let document = stripped("<Body><FooResponse><![CDATA[a < b]]></FooResponse></Body>");
        let result = extract_result(document, "Foo").unwrap();

        assert_eq!(result.shape, ResultShape::Scalar);
        assert_eq!(result.string_result, "a < b");
        assert_eq!(to_xml_string(&result.xml_result).unwrap(), "<root>a &lt; b</root>");
    }

    #[test]
    fn parse_response_strips_and_extracts() {
        let result = parse_response(200, STRUCTURED_RESPONSE, "Foo").unwrap();
        let envelope = to_xml_string(&result.soap_response).unwrap();
        assert!(!envelope.contains("xmlns"));
        assert_eq!(result.string_result, "<root><A>1</A><B>2</B></root>");
    }

    #[test]
    fn parse_response_rejects_malformed_xml() {
        let err = parse_response(200, "<Envelope><Body>", "Foo").unwrap_err();
        assert!(matches!(err, RequestError::XmlError(_)), "{err:?}");
    }

    #[test]
    fn parse_response_maps_faults() {
        let fault = r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><soap:Fault><faultcode>soap:Client</faultcode><faultstring>Server did not recognize the value of HTTP Header SOAPAction</faultstring></soap:Fault></soap:Body></soap:Envelope>"#;

        match parse_response(500, fault, "Foo") {
            Err(RequestError::SoapFault { code, message }) => {
                assert_eq!(code, "soap:Client");
                assert!(message.starts_with("Server did not recognize"));
            }
            other => panic!("Unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_response_maps_plain_error_status() {
        match parse_response(404, "Not Found", "Foo") {
            Err(RequestError::HttpStatus(404, body)) => assert_eq!(body, "Not Found"),
            other => panic!("Unexpected result: {other:?}"),
        }
    }
}
