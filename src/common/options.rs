/// Per-call options of a SOAP invocation.
#[derive(Clone, Debug)]
pub struct InvokeOptions {
    /// Entity-encode parameter names and values before inserting them into the envelope.
    ///
    /// When disabled, parameters are inserted verbatim and the caller is responsible
    /// for keeping the envelope well-formed.
    pub encode: bool,
    /// Extra path segment inserted between the namespace and the method name in the
    /// `SOAPAction` header, e.g. `"ICalculator"` gives `{namespace}/ICalculator/{method}`.
    pub soap_action_complement: Option<String>,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self {
            encode: true,
            soap_action_complement: None,
        }
    }
}

impl InvokeOptions {
    /// Options with parameter encoding disabled.
    pub fn raw() -> Self {
        Self {
            encode: false,
            ..Default::default()
        }
    }
}
