use std::collections::HashMap;

/// An inbound request as handed over by the transport. Read-only to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    pub request_id: Option<String>,
    /// The prompt text, not JSON-wrapped.
    pub body: String,
    /// `None` when the request carried no query string at all.
    pub query_parameters: Option<HashMap<String, String>>,
    pub headers: HashMap<String, String>,
}

impl RawRequest {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_parameters
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_parameters(mut self, parameters: HashMap<String, String>) -> Self {
        self.query_parameters = Some(parameters);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn request_id(&self) -> &str {
        self.request_id.as_deref().unwrap_or("unknown")
    }
}
