//! Log payload types.
//!
//! A payload is classified once, at the call boundary, into one of three
//! shapes. The enricher only ever borrows it.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LoggerError, LoggerResult};

/// Structured fields of a payload.
pub type Fields = Map<String, Value>;

/// What the caller asked to log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogPayload {
    /// Plain message.
    Text(String),
    /// Arbitrary structured object.
    Structured(Fields),
    /// An error with its message, stack and extra fields.
    Failure(Failure),
}

/// Error payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message: String,
    pub stack: Option<String>,
    pub fields: Fields,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
            fields: Fields::new(),
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Build a failure from an error and its `source()` chain.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let message = err.to_string();
        let mut stack = message.clone();
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Self::new(message).with_stack(stack)
    }

    /// Custom fields plus `message` and `stack`.
    fn own_fields(&self) -> Fields {
        let mut fields = self.fields.clone();
        fields.insert("message".to_string(), Value::String(self.message.clone()));
        if let Some(stack) = &self.stack {
            fields.insert("stack".to_string(), Value::String(stack.clone()));
        }
        fields
    }
}

impl LogPayload {
    pub fn text(message: impl Into<String>) -> Self {
        LogPayload::Text(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        LogPayload::Failure(Failure::new(message))
    }

    /// Classify an arbitrary JSON value.
    ///
    /// Strings stay text, objects become structured, and any other value is
    /// logged as its JSON rendering.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(s) => LogPayload::Text(s),
            Value::Object(map) => LogPayload::Structured(map),
            other => LogPayload::Text(other.to_string()),
        }
    }

    /// Serialize any value into a payload.
    pub fn try_structured<T: Serialize + ?Sized>(value: &T) -> LoggerResult<Self> {
        Ok(Self::from_value(serde_json::to_value(value)?))
    }

    /// Like [`LogPayload::try_structured`], but never fails: a value that
    /// cannot be serialized is replaced by an `unserializable` marker.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::try_structured(value)
            .unwrap_or_else(|err| Self::unserializable(std::any::type_name::<T>(), &err))
    }

    fn unserializable(type_name: &str, err: &LoggerError) -> Self {
        tracing::debug!(type_name, error = %err, "Payload could not be serialized");
        let mut fields = Fields::new();
        fields.insert("unserializable".to_string(), Value::Bool(true));
        fields.insert("type".to_string(), Value::String(type_name.to_string()));
        fields.insert("reason".to_string(), Value::String(err.to_string()));
        LogPayload::Structured(fields)
    }

    /// Fields seeding the entry metadata. Text has none.
    pub fn fields(&self) -> Fields {
        match self {
            LogPayload::Text(_) => Fields::new(),
            LogPayload::Structured(fields) => fields.clone(),
            LogPayload::Failure(failure) => failure.own_fields(),
        }
    }

    /// Message body appended after any request prefix.
    pub fn body(&self) -> String {
        match self {
            LogPayload::Text(message) => message.clone(),
            LogPayload::Failure(failure) => failure.message.clone(),
            LogPayload::Structured(fields) => match serde_json::to_string(fields) {
                Ok(json) => json,
                Err(err) => format!("[unserializable object: {}]", err),
            },
        }
    }
}

impl From<&str> for LogPayload {
    fn from(message: &str) -> Self {
        LogPayload::Text(message.to_string())
    }
}

impl From<String> for LogPayload {
    fn from(message: String) -> Self {
        LogPayload::Text(message)
    }
}

impl From<Value> for LogPayload {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Fields> for LogPayload {
    fn from(fields: Fields) -> Self {
        LogPayload::Structured(fields)
    }
}

impl From<Failure> for LogPayload {
    fn from(failure: Failure) -> Self {
        LogPayload::Failure(failure)
    }
}

impl From<&anyhow::Error> for LogPayload {
    fn from(err: &anyhow::Error) -> Self {
        // Debug rendering carries the cause chain and any captured backtrace.
        LogPayload::Failure(Failure::new(err.to_string()).with_stack(format!("{:?}", err)))
    }
}

impl From<anyhow::Error> for LogPayload {
    fn from(err: anyhow::Error) -> Self {
        Self::from(&err)
    }
}
