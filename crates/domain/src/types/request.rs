//! Outbound request description
//!
//! A [`RequestDescriptor`] is built once through [`RequestDescriptorBuilder`]
//! and handed by value to the executor, which consumes it.

use serde_json::Value;

use crate::impl_domain_enum_conversions;

/// HTTP verbs used by the remote service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Upper-case wire form
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the verb changes remote state
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl_domain_enum_conversions!(HttpMethod {
    Get => "get",
    Post => "post",
    Put => "put",
    Patch => "patch",
    Delete => "delete",
});

/// Request body
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    /// Structured payload, sent as JSON
    Json(Value),
    /// Raw bytes; the JSON content type is omitted so multipart boundaries survive
    Binary { bytes: Vec<u8>, content_type: Option<String> },
}

impl RequestBody {
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }
}

/// Immutable description of one remote call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> RequestDescriptorBuilder {
        RequestDescriptorBuilder {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> RequestDescriptorBuilder {
        Self::builder(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> RequestDescriptorBuilder {
        Self::builder(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> RequestDescriptorBuilder {
        Self::builder(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> RequestDescriptorBuilder {
        Self::builder(HttpMethod::Delete, path)
    }

    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in insertion order
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub const fn body(&self) -> &RequestBody {
        &self.body
    }

    /// Descriptor-level header overrides
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Builder for [`RequestDescriptor`]
#[derive(Debug)]
pub struct RequestDescriptorBuilder {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    body: RequestBody,
    headers: Vec<(String, String)>,
}

impl RequestDescriptorBuilder {
    /// Append a query parameter; order is preserved on the wire.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Override or add a header for this request only.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn binary(mut self, bytes: Vec<u8>, content_type: Option<String>) -> Self {
        self.body = RequestBody::Binary { bytes, content_type };
        self
    }

    pub fn build(self) -> RequestDescriptor {
        RequestDescriptor {
            method: self.method,
            path: self.path,
            query: self.query,
            body: self.body,
            headers: self.headers,
        }
    }
}
