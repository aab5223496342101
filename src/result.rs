use std::str::FromStr;

use serde::de::DeserializeOwned;
use xmltree::Element;

use crate::errors::RequestError;

/// Which of the two SOAP response shapes a result was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultShape {
    /// The response element had element children.
    Structured,
    /// The response element only carried text (or nothing).
    Scalar,
}

/// Outcome of a successful SOAP call.
///
/// For structured results, serializing `xml_result` gives back `string_result`. For
/// scalar results `string_result` is the bare text and `xml_result` is a `root`
/// element wrapping it.
#[derive(Clone, Debug)]
pub struct CallResult {
    /// The whole response document, namespaces stripped.
    pub soap_response: Element,
    /// The result content under a `root` element.
    pub xml_result: Element,
    /// Canonical string form of the result.
    pub string_result: String,
    /// Shape of the response element.
    pub shape: ResultShape,
}

impl CallResult {
    /// Deserialize a structured result into `T`.
    ///
    /// The fields of `T` map to the children of the `root` element.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        Ok(quick_xml::de::from_str(&self.string_result)?)
    }

    /// Parse a scalar result into `T`.
    pub fn parse<T: FromStr>(&self) -> Result<T, RequestError> {
        self.string_result
            .trim()
            .parse()
            .map_err(|_| RequestError::InvalidScalar(self.string_result.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::parsing::parse_response;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "PascalCase")]
    struct Person {
        name: String,
        age: u32,
    }

    #[test]
    fn structured_result_deserializes() {
        let body = "<Envelope><Body><GetPersonResponse><GetPersonResult><Name>Ada</Name><Age>36</Age></GetPersonResult></GetPersonResponse></Body></Envelope>";
        let result = parse_response(200, body, "GetPerson").unwrap();

        let person: Person = result.deserialize().unwrap();
        assert_eq!(
            person,
            Person {
                name: "Ada".to_owned(),
                age: 36
            }
        );
    }

    #[test]
    fn scalar_result_parses() {
        let result = parse_response(200, "<Envelope><Body><FooResponse>42</FooResponse></Body></Envelope>", "Foo").unwrap();

        assert_eq!(result.parse::<u32>().unwrap(), 42);
        assert!(matches!(result.parse::<bool>(), Err(RequestError::InvalidScalar(ref s)) if s == "42"));
    }
}
