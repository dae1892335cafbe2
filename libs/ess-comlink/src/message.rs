//! Get-request / response messages

use std::fmt;

use bytes::Bytes;

use crate::ObjectId;

/// A raw value as it arrives off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireValue {
    Integer(i64),
    OctetString(Bytes),
}

impl WireValue {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            WireValue::Integer(v) => Some(*v),
            WireValue::OctetString(_) => None,
        }
    }

    pub fn as_octets(&self) -> Option<&[u8]> {
        match self {
            WireValue::Integer(_) => None,
            WireValue::OctetString(b) => Some(b),
        }
    }

    pub fn octets(value: impl Into<Bytes>) -> Self {
        WireValue::OctetString(value.into())
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Integer(v) => write!(f, "{}", v),
            WireValue::OctetString(b) => write!(f, "\"{}\"", String::from_utf8_lossy(b)),
        }
    }
}

impl From<i64> for WireValue {
    fn from(v: i64) -> Self {
        WireValue::Integer(v)
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        WireValue::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

/// Batched get-request; objects are answered in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetRequest {
    objects: Vec<ObjectId>,
}

impl GetRequest {
    pub fn new(objects: Vec<ObjectId>) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &[ObjectId] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Values of a successful get-request, in request order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetResponse {
    values: Vec<WireValue>,
}

impl GetResponse {
    pub fn new(values: Vec<WireValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[WireValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<WireValue> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
