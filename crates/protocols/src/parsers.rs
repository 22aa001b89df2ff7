//! Field access helpers for decoding Move objects.

use crate::error::ProviderError;
use crate::ledger::LedgerObject;
use clmm_rebalancer_domain::math::tick_from_bits;
use serde_json::{Map, Value};

/// Typed reads over the fields of one Move struct, reporting the object and field on failure.
#[derive(Debug, Clone, Copy)]
pub struct FieldReader<'a> {
    object_id: &'a str,
    path: &'a str,
    fields: &'a Map<String, Value>,
}

impl<'a> FieldReader<'a> {
    /// Reads the top level fields of a Move object.
    pub fn of(object: &'a LedgerObject) -> Result<Self, ProviderError> {
        let content = object
            .content
            .as_ref()
            .filter(|content| content.data_type == "moveObject")
            .ok_or_else(|| ProviderError::invalid(&object.object_id, "content", "not a move object"))?;
        let fields = content
            .fields
            .as_object()
            .ok_or_else(|| ProviderError::invalid(&object.object_id, "content.fields", "not a struct"))?;
        Ok(Self {
            object_id: &object.object_id,
            path: "",
            fields,
        })
    }

    /// Id of the object being read.
    pub fn object_id(&self) -> &'a str {
        self.object_id
    }

    fn error(&self, field: &str, reason: impl Into<String>) -> ProviderError {
        let field = if self.path.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.path)
        };
        ProviderError::invalid(self.object_id, &field, reason)
    }

    /// A field value, `None` when absent or null.
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    fn required(&self, field: &str) -> Result<&'a Value, ProviderError> {
        self.get(field).ok_or_else(|| self.error(field, "missing"))
    }

    /// Unsigned integer given either as a decimal string or a JSON number.
    pub fn u128(&self, field: &str) -> Result<u128, ProviderError> {
        match self.required(field)? {
            Value::String(text) => text
                .parse::<u128>()
                .map_err(|e| self.error(field, e.to_string())),
            Value::Number(number) => number
                .as_u64()
                .map(u128::from)
                .ok_or_else(|| self.error(field, "not an unsigned integer")),
            _ => Err(self.error(field, "not an integer")),
        }
    }

    /// Like [`FieldReader::u128`], bounded to `u64`.
    pub fn u64(&self, field: &str) -> Result<u64, ProviderError> {
        u64::try_from(self.u128(field)?).map_err(|_| self.error(field, "exceeds u64"))
    }

    /// Like [`FieldReader::u128`], bounded to `u32`.
    pub fn u32(&self, field: &str) -> Result<u32, ProviderError> {
        u32::try_from(self.u128(field)?).map_err(|_| self.error(field, "exceeds u32"))
    }

    /// A string field.
    pub fn string(&self, field: &str) -> Result<&'a str, ProviderError> {
        self.required(field)?
            .as_str()
            .ok_or_else(|| self.error(field, "not a string"))
    }

    /// Fields of a nested `{ type, fields }` struct value.
    pub fn nested(&self, field: &'a str) -> Result<FieldReader<'a>, ProviderError> {
        Self::struct_value(self.object_id, field, self.required(field)?)
    }

    fn struct_value(object_id: &'a str, path: &'a str, value: &'a Value) -> Result<Self, ProviderError> {
        value
            .get("fields")
            .and_then(Value::as_object)
            .map(|fields| Self {
                object_id,
                path,
                fields,
            })
            .ok_or_else(|| ProviderError::invalid(object_id, path, "not a struct"))
    }

    /// Elements of a vector of structs; a missing field reads as empty.
    pub fn struct_vec(&self, field: &'a str) -> Result<Vec<FieldReader<'a>>, ProviderError> {
        let Some(value) = self.get(field) else {
            return Ok(Vec::new());
        };
        value
            .as_array()
            .ok_or_else(|| self.error(field, "not a vector"))?
            .iter()
            .map(|element| Self::struct_value(self.object_id, field, element))
            .collect()
    }

    /// A signed tick stored as `{ fields: { bits } }` or as a bare integer.
    pub fn tick(&self, field: &str) -> Result<i32, ProviderError> {
        let value = self.required(field)?;
        let bits = match value.get("fields").and_then(|fields| fields.get("bits")) {
            Some(bits) => bits,
            None => value,
        };
        let bits = match bits {
            Value::Number(number) => number.as_u64().or_else(|| number.as_i64().map(|v| v as u64)),
            Value::String(text) => text
                .parse::<u64>()
                .ok()
                .or_else(|| text.parse::<i64>().ok().map(|v| v as u64)),
            _ => None,
        }
        .ok_or_else(|| self.error(field, "expected a tick index struct or integer"))?;
        Ok(tick_from_bits(bits))
    }

    /// A `TypeName` struct rendered as a coin type with a `0x` prefix.
    pub fn type_name(&self, field: &'a str) -> Result<Option<String>, ProviderError> {
        if self.get(field).is_none() {
            return Ok(None);
        }
        let name = self.nested(field)?.string("name")?;
        Ok(Some(if name.starts_with("0x") {
            name.to_string()
        } else {
            format!("0x{name}")
        }))
    }
}

/// Generic arguments of a Move type such as `0x1::pool::Pool<A, B>`.
pub fn extract_type_arguments(type_str: &str) -> Option<Vec<String>> {
    let trimmed = type_str.trim_end();
    if !trimmed.ends_with('>') {
        return None;
    }
    let open = trimmed.find('<')?;
    let inner = &trimmed[open + 1..trimmed.len() - 1];

    let mut arguments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '<' => {
                depth += 1;
                current.push(c);
            }
            '>' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                arguments.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        arguments.push(current.trim().to_string());
    }

    if arguments.is_empty() { None } else { Some(arguments) }
}
