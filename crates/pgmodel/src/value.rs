//! Bindable values and their declared kinds.
//!
//! Every parameter handed to the builder is converted into a [`Value`], which
//! carries one of four [`ParamKind`]s. Floating-point inputs are stored as
//! their decimal text and bound as `Text`.

use bytes::BytesMut;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{FromSql, IsNull, ToSql, Type};
use uuid::Uuid;

/// Declared kind of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Integer,
    Boolean,
    Text,
    Null,
}

impl ParamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKind::Integer => "integer",
            ParamKind::Boolean => "boolean",
            ParamKind::Text => "text",
            ParamKind::Null => "null",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parameter value or a decoded column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Text(String),
    Null,
}

impl Value {
    /// The kind this value is bound as.
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::Integer(_) => ParamKind::Integer,
            Value::Boolean(_) => ParamKind::Boolean,
            Value::Text(_) => ParamKind::Text,
            Value::Null => ParamKind::Null,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Null => f.write_str("NULL"),
        }
    }
}

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Integer(i64::from(v))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

fn is_text_type(ty: &Type) -> bool {
    <&str as ToSql>::accepts(ty)
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match (self, ty) {
            (Value::Null, _) => Ok(IsNull::Yes),
            (Value::Integer(v), &Type::INT2) => i16::try_from(*v)?.to_sql(ty, out),
            (Value::Integer(v), &Type::INT4) => i32::try_from(*v)?.to_sql(ty, out),
            (Value::Integer(v), &Type::INT8) => v.to_sql(ty, out),
            (Value::Integer(v), &Type::FLOAT4) => (*v as f32).to_sql(ty, out),
            (Value::Integer(v), &Type::FLOAT8) => (*v as f64).to_sql(ty, out),
            (Value::Integer(v), &Type::NUMERIC) => Decimal::from(*v).to_sql(ty, out),
            (Value::Integer(v), _) if is_text_type(ty) => v.to_string().to_sql(ty, out),
            (Value::Boolean(v), &Type::BOOL) => v.to_sql(ty, out),
            // Text is parsed into whatever the server inferred for the placeholder.
            (Value::Text(v), &Type::FLOAT4) => v.parse::<f32>()?.to_sql(ty, out),
            (Value::Text(v), &Type::FLOAT8) => v.parse::<f64>()?.to_sql(ty, out),
            (Value::Text(v), &Type::NUMERIC) => v.parse::<Decimal>()?.to_sql(ty, out),
            (Value::Text(v), &Type::DATE) => v.parse::<NaiveDate>()?.to_sql(ty, out),
            (Value::Text(v), &Type::TIME) => v.parse::<NaiveTime>()?.to_sql(ty, out),
            (Value::Text(v), &Type::TIMESTAMP) => parse_timestamp(v)?.to_sql(ty, out),
            (Value::Text(v), &Type::TIMESTAMPTZ) => DateTime::parse_from_rfc3339(v)?
                .with_timezone(&Utc)
                .to_sql(ty, out),
            (Value::Text(v), &Type::UUID) => Uuid::parse_str(v)?.to_sql(ty, out),
            (Value::Text(v), &Type::JSON | &Type::JSONB) => {
                serde_json::from_str::<serde_json::Value>(v)?.to_sql(ty, out)
            }
            (Value::Text(v), _) if is_text_type(ty) => v.as_str().to_sql(ty, out),
            _ => Err(format!("cannot bind {} value to parameter of type {}", self.kind(), ty).into()),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    tokio_postgres::types::to_sql_checked!();
}

/// Columns outside the integer and boolean types decode to their text form.
impl<'a> FromSql<'a> for Value {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        let value = match *ty {
            Type::INT2 => Value::Integer(i16::from_sql(ty, raw)?.into()),
            Type::INT4 => Value::Integer(i32::from_sql(ty, raw)?.into()),
            Type::INT8 => Value::Integer(i64::from_sql(ty, raw)?),
            Type::BOOL => Value::Boolean(bool::from_sql(ty, raw)?),
            Type::FLOAT4 => Value::Text(f32::from_sql(ty, raw)?.to_string()),
            Type::FLOAT8 => Value::Text(f64::from_sql(ty, raw)?.to_string()),
            Type::NUMERIC => Value::Text(Decimal::from_sql(ty, raw)?.to_string()),
            Type::DATE => Value::Text(NaiveDate::from_sql(ty, raw)?.to_string()),
            Type::TIME => Value::Text(NaiveTime::from_sql(ty, raw)?.to_string()),
            Type::TIMESTAMP => Value::Text(NaiveDateTime::from_sql(ty, raw)?.to_string()),
            Type::TIMESTAMPTZ => Value::Text(DateTime::<Utc>::from_sql(ty, raw)?.to_rfc3339()),
            Type::UUID => Value::Text(Uuid::from_sql(ty, raw)?.to_string()),
            Type::JSON | Type::JSONB => {
                Value::Text(serde_json::Value::from_sql(ty, raw)?.to_string())
            }
            Type::BYTEA => Value::Text(format!(
                "\\x{}",
                raw.iter().map(|b| format!("{b:02x}")).collect::<String>()
            )),
            _ => Value::Text(<&str>::from_sql(ty, raw)?.to_string()),
        };
        Ok(value)
    }

    fn from_sql_null(_ty: &Type) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(Value::Null)
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::BOOL
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::NUMERIC
                | Type::DATE
                | Type::TIME
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::UUID
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        ) || <&str as FromSql>::accepts(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_inference() {
        assert_eq!(Value::from(18).kind(), ParamKind::Integer);
        assert_eq!(Value::from(7u8).kind(), ParamKind::Integer);
        assert_eq!(Value::from(true).kind(), ParamKind::Boolean);
        assert_eq!(Value::from("alice").kind(), ParamKind::Text);
        assert_eq!(Value::from(None::<i32>).kind(), ParamKind::Null);
        assert_eq!(Value::from(()), Value::Null);
        assert_eq!(Value::from(Some(3i64)), Value::Integer(3));
    }

    #[test]
    fn floats_are_bound_as_text() {
        let v = Value::from(1.5f64);
        assert_eq!(v.kind(), ParamKind::Text);
        assert_eq!(v.as_str(), Some("1.5"));
    }

    #[test]
    fn integer_binds_to_narrow_int_column() {
        let mut out = BytesMut::new();
        let res = Value::Integer(42).to_sql(&Type::INT4, &mut out).unwrap();
        assert!(matches!(res, IsNull::No));
        assert_eq!(&out[..], &42i32.to_be_bytes());
    }

    #[test]
    fn integer_out_of_range_fails() {
        let mut out = BytesMut::new();
        assert!(Value::Integer(i64::MAX).to_sql(&Type::INT2, &mut out).is_err());
    }

    #[test]
    fn boolean_rejects_text_parameter() {
        let mut out = BytesMut::new();
        assert!(Value::Boolean(true).to_sql(&Type::TEXT, &mut out).is_err());
    }

    #[test]
    fn null_binds_to_any_type() {
        let mut out = BytesMut::new();
        let res = Value::Null.to_sql(&Type::INT8, &mut out).unwrap();
        assert!(matches!(res, IsNull::Yes));
        assert!(out.is_empty());
    }

    #[test]
    fn text_float_binds_to_float8() {
        let mut out = BytesMut::new();
        Value::from(2.25f64).to_sql(&Type::FLOAT8, &mut out).unwrap();
        assert_eq!(&out[..], &2.25f64.to_be_bytes());
    }

    #[test]
    fn decode_integer_and_null() {
        let raw = 5i32.to_be_bytes();
        assert_eq!(Value::from_sql(&Type::INT4, &raw).unwrap(), Value::Integer(5));
        assert_eq!(Value::from_sql_null(&Type::INT4).unwrap(), Value::Null);
        assert!(<Value as FromSql>::accepts(&Type::VARCHAR));
    }

    fn encode<T: ToSql>(value: T, ty: &Type) -> BytesMut {
        let mut out = BytesMut::new();
        value.to_sql(ty, &mut out).unwrap();
        out
    }

    fn decode(ty: &Type, raw: &[u8]) -> Value {
        assert!(<Value as FromSql>::accepts(ty), "{ty} not accepted");
        Value::from_sql(ty, raw).unwrap()
    }

    #[test]
    fn decode_numeric_and_temporal_columns_as_text() {
        let price: Decimal = "12.5".parse().unwrap();
        let raw = encode(price, &Type::NUMERIC);
        assert_eq!(decode(&Type::NUMERIC, &raw), Value::Text("12.5".into()));

        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let raw = encode(day, &Type::DATE);
        assert_eq!(decode(&Type::DATE, &raw), Value::Text("2024-01-02".into()));

        let at = day.and_hms_opt(3, 4, 5).unwrap();
        let raw = encode(at, &Type::TIMESTAMP);
        assert_eq!(decode(&Type::TIMESTAMP, &raw), Value::Text("2024-01-02 03:04:05".into()));

        let raw = encode(at.and_utc(), &Type::TIMESTAMPTZ);
        assert_eq!(
            decode(&Type::TIMESTAMPTZ, &raw),
            Value::Text("2024-01-02T03:04:05+00:00".into())
        );
    }

    #[test]
    fn decode_uuid_json_and_bytea_as_text() {
        let raw = encode(Uuid::nil(), &Type::UUID);
        assert_eq!(
            decode(&Type::UUID, &raw),
            Value::Text("00000000-0000-0000-0000-000000000000".into())
        );

        let raw = encode(serde_json::json!({"a": 1}), &Type::JSONB);
        assert_eq!(decode(&Type::JSONB, &raw), Value::Text(r#"{"a":1}"#.into()));

        let raw = encode(serde_json::json!([true]), &Type::JSON);
        assert_eq!(decode(&Type::JSON, &raw), Value::Text("[true]".into()));

        assert_eq!(decode(&Type::BYTEA, &[0xde, 0xad]), Value::Text("\\xdead".into()));
    }

    #[test]
    fn text_float_binds_to_numeric() {
        let raw = encode(Value::from(9.99f64), &Type::NUMERIC);
        let back = Decimal::from_sql(&Type::NUMERIC, &raw).unwrap();
        assert_eq!(back, "9.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn integer_binds_to_numeric_and_float4() {
        let raw = encode(Value::from(10), &Type::NUMERIC);
        assert_eq!(Decimal::from_sql(&Type::NUMERIC, &raw).unwrap(), Decimal::from(10));

        let raw = encode(Value::from(10), &Type::FLOAT4);
        assert_eq!(&raw[..], &10f32.to_be_bytes());
    }

    #[test]
    fn text_binds_to_temporal_uuid_and_json() {
        let raw = encode(Value::from("2024-01-02"), &Type::DATE);
        assert_eq!(
            NaiveDate::from_sql(&Type::DATE, &raw).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );

        let raw = encode(Value::from("2024-01-02T03:04:05+02:00"), &Type::TIMESTAMPTZ);
        let at = DateTime::<Utc>::from_sql(&Type::TIMESTAMPTZ, &raw).unwrap();
        assert_eq!(at.to_rfc3339(), "2024-01-02T01:04:05+00:00");

        let raw = encode(Value::from("2024-01-02 03:04:05"), &Type::TIMESTAMP);
        assert!(NaiveDateTime::from_sql(&Type::TIMESTAMP, &raw).is_ok());

        let raw = encode(Value::from("00000000-0000-0000-0000-000000000000"), &Type::UUID);
        assert_eq!(Uuid::from_sql(&Type::UUID, &raw).unwrap(), Uuid::nil());

        let raw = encode(Value::from(r#"{"a":1}"#), &Type::JSONB);
        assert_eq!(
            serde_json::Value::from_sql(&Type::JSONB, &raw).unwrap(),
            serde_json::json!({"a": 1})
        );
    }

    #[test]
    fn malformed_text_fails_to_bind() {
        let mut out = BytesMut::new();
        assert!(Value::from("abc").to_sql(&Type::NUMERIC, &mut out).is_err());
        assert!(Value::from("not-a-uuid").to_sql(&Type::UUID, &mut out).is_err());
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Integer(1),
            Value::Text("a".into()),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"a",null]"#);
    }
}
