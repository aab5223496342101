/// Rewrites the serialized parameter fragment before it is wrapped in the envelope.
///
/// Mappers receive the concatenated `<name>value</name>` fragment and return the
/// fragment to use instead, which lets callers inject nested structure that the flat
/// parameter list cannot express. Any `Fn(String) -> String` closure is a mapper.
pub trait ParametersMapper: Send + Sync {
    /// Transform the current parameter fragment.
    fn map(&self, parameters: String) -> String;
}

impl<F> ParametersMapper for F
where
    F: Fn(String) -> String + Send + Sync,
{
    fn map(&self, parameters: String) -> String {
        self(parameters)
    }
}

/// Run every mapper over `parameters`, in registration order.
pub fn apply_mappers(mappers: &[Box<dyn ParametersMapper>], parameters: String) -> String {
    mappers.iter().fold(parameters, |fragment, mapper| mapper.map(fragment))
}
