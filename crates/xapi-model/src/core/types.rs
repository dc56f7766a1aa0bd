use crate::{
    core::{
        enums::{self, EnumSet},
        format::{FormatOptions, ISO_D, escape_html, format_timestamp, normalize},
        value::Value,
    },
    error::{ApiError, Result},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use std::{collections::HashMap, fmt};
use uuid::Uuid;

pub const DEFAULT_STRING_LENGTH: usize = 65535;

pub const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";
const LOCAL_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl TimeUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Millis => "ms",
            TimeUnit::Micros => "us",
            TimeUnit::Nanos => "ns",
        }
    }

    /// Units per second.
    pub fn base(&self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Millis => 1_000,
            TimeUnit::Micros => 1_000_000,
            TimeUnit::Nanos => 1_000_000_000,
        }
    }

    fn digits(&self) -> usize {
        match self {
            TimeUnit::Seconds => 0,
            TimeUnit::Millis => 3,
            TimeUnit::Micros => 6,
            TimeUnit::Nanos => 9,
        }
    }

    fn from_ms(&self, ms: i64) -> Option<i64> {
        match self {
            TimeUnit::Seconds => Some(ms.div_euclid(1_000)),
            TimeUnit::Millis => Some(ms),
            TimeUnit::Micros => ms.checked_mul(1_000),
            TimeUnit::Nanos => ms.checked_mul(1_000_000),
        }
    }

    fn to_ms(&self, v: i64) -> Option<i64> {
        match self {
            TimeUnit::Seconds => v.checked_mul(1_000),
            TimeUnit::Millis => Some(v),
            TimeUnit::Micros => Some(v.div_euclid(1_000)),
            TimeUnit::Nanos => Some(v.div_euclid(1_000_000)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Boolean,
    Integer { size: u8, min: i64, max: i64 },
    Float { size: u8 },
    AsciiString { length: usize },
    AsciiText,
    Utf8String { length: usize },
    Utf8Text,
    Html,
    Xml,
    Instant(TimeUnit),
    Duration(TimeUnit),
    /// Epoch milliseconds.
    DateTime,
    /// Epoch milliseconds at the start of a day.
    Date,
    LocalDateTime,
    LocalDate,
    Json,
    JsonArray,
    JsonObject,
    Enum(&'static EnumSet),
    Id,
    Uuid,
    Type,
    List(Box<XType>),
    Set(Box<XType>),
}

/// A registered value type.
#[derive(Debug, Clone, PartialEq)]
pub struct XType {
    name: String,
    safe_name: String,
    kind: TypeKind,
}

lazy_static! {
    static ref TYPE_MAP: HashMap<String, XType> = build_type_map();
}

impl XType {
    fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        // numeric and character types drop the parenthesis: int(4) -> int4
        let compact = matches!(
            kind,
            TypeKind::Integer { .. }
                | TypeKind::Float { .. }
                | TypeKind::AsciiString { .. }
                | TypeKind::Utf8String { .. }
        );
        let safe_name = name
            .replacen('(', if compact { "" } else { "_" }, 1)
            .replacen(')', "", 1);
        XType {
            name,
            safe_name,
            kind,
        }
    }

    fn list(value_type: XType) -> Self {
        let name = format!("list({})", value_type.name);
        let safe_name = format!("list_{}", value_type.safe_name);
        XType {
            name,
            safe_name,
            kind: TypeKind::List(Box::new(value_type)),
        }
    }

    fn set(value_type: XType) -> Self {
        let name = format!("set({})", value_type.name);
        let safe_name = format!("set_{}", value_type.safe_name);
        XType {
            name,
            safe_name,
            kind: TypeKind::Set(Box::new(value_type)),
        }
    }

    /// Looks up a registered type by name, case-insensitively.
    pub fn of(name: &str) -> Option<&'static XType> {
        TYPE_MAP.get(&name.trim().to_lowercase())
    }

    pub fn parse_name(name: &str) -> Result<&'static XType> {
        XType::of(name).ok_or_else(|| ApiError::unknown("type", name))
    }

    pub fn list_of(t: &XType) -> Option<&'static XType> {
        XType::of(&format!("list_{}", t.name))
    }

    pub fn set_of(t: &XType) -> Option<&'static XType> {
        XType::of(&format!("set_{}", t.name))
    }

    /// All registered names, including safe names and collection aliases.
    pub fn names() -> impl Iterator<Item = &'static str> {
        TYPE_MAP.keys().map(String::as_str)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn safe_name(&self) -> &str {
        &self.safe_name
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn value_type(&self) -> Option<&XType> {
        match &self.kind {
            TypeKind::List(t) | TypeKind::Set(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, TypeKind::Integer { .. } | TypeKind::Float { .. })
    }

    pub fn is_character(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::AsciiString { .. }
                | TypeKind::AsciiText
                | TypeKind::Utf8String { .. }
                | TypeKind::Utf8Text
                | TypeKind::Html
                | TypeKind::Xml
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Instant(_)
                | TypeKind::Duration(_)
                | TypeKind::DateTime
                | TypeKind::Date
                | TypeKind::LocalDateTime
                | TypeKind::LocalDate
        )
    }

    pub fn is_collection(&self) -> bool {
        matches!(self.kind, TypeKind::List(_) | TypeKind::Set(_))
    }

    /// Structural check with no coercion.
    pub fn is_instance(&self, v: &Value) -> bool {
        match (&self.kind, v) {
            (TypeKind::Boolean, Value::Boolean(_)) => true,
            (TypeKind::Integer { min, max, .. }, Value::Int(i)) => i >= min && i <= max,
            (TypeKind::Float { .. }, Value::Float(f)) => !f.is_nan(),
            (
                TypeKind::AsciiString { length } | TypeKind::Utf8String { length },
                Value::String(s),
            ) => s.chars().count() <= *length && normalize(s) == *s,
            (
                TypeKind::AsciiText | TypeKind::Utf8Text | TypeKind::Html | TypeKind::Xml,
                Value::String(_),
            ) => true,
            (
                TypeKind::Instant(_)
                | TypeKind::Duration(_)
                | TypeKind::DateTime
                | TypeKind::Date
                | TypeKind::Id,
                Value::Int(_),
            ) => true,
            (TypeKind::LocalDateTime, Value::String(s)) => {
                s.len() == 23 && NaiveDateTime::parse_from_str(s, LOCAL_DATETIME_FORMAT).is_ok()
            }
            (TypeKind::LocalDate, Value::String(s)) => {
                s.len() == 10 && NaiveDate::parse_from_str(s, LOCAL_DATE_FORMAT).is_ok()
            }
            (TypeKind::Json, Value::Json(j)) => j.is_array() || j.is_object(),
            (TypeKind::JsonArray, Value::Json(j)) => j.is_array(),
            (TypeKind::JsonObject, Value::Json(j)) => j.is_object(),
            (TypeKind::Enum(set), Value::Int(id)) => set.by_id(*id).is_some(),
            (TypeKind::Uuid, Value::Uuid(_)) => true,
            (TypeKind::Type, Value::String(s)) => XType::of(s).is_some(),
            (TypeKind::List(t) | TypeKind::Set(t), Value::List(items)) => {
                items.iter().all(|item| t.is_instance(item))
            }
            _ => false,
        }
    }

    /// Parses `v` into an instance of this type.
    ///
    /// Null and blank strings yield `None`, instances pass through unchanged
    /// and anything else goes through the type-specific parser.
    pub fn parse(&self, v: &Value) -> Result<Option<Value>> {
        match v {
            Value::Null => return Ok(None),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            _ => {}
        }
        if self.is_instance(v) {
            return Ok(Some(v.clone()));
        }
        self.parse_object(v).map(Some)
    }

    /// Renders `v` as text. Null and blank values format to an empty string.
    pub fn format(&self, v: &Value, opts: &FormatOptions) -> Result<String> {
        match self.parse(v)? {
            None => Ok(String::new()),
            Some(parsed) => self.format_object(&parsed, opts),
        }
    }

    fn invalid(&self, v: &Value, reason: impl Into<String>) -> ApiError {
        ApiError::parse(&self.name, v, reason)
    }

    /// `f` as an `i64`, only when no truncation or saturation happens.
    fn whole_number(&self, v: &Value, f: f64) -> Result<i64> {
        if !f.is_finite() || f.fract() != 0.0 {
            return Err(self.invalid(v, "not an integer"));
        }
        // i64::MAX as f64 rounds up to 2^63
        if f < i64::MIN as f64 || f >= i64::MAX as f64 {
            return Err(self.invalid(v, "out of range"));
        }
        Ok(f as i64)
    }

    fn parse_object(&self, v: &Value) -> Result<Value> {
        match &self.kind {
            TypeKind::Boolean => match v {
                Value::String(s) => match s.trim().to_lowercase().as_str() {
                    "true" | "t" | "1" => Ok(Value::Boolean(true)),
                    "false" | "f" | "0" => Ok(Value::Boolean(false)),
                    _ => Err(self.invalid(v, "not a boolean")),
                },
                Value::Int(i) => Ok(Value::Boolean(*i != 0)),
                Value::Float(f) => Ok(Value::Boolean(*f != 0.0)),
                _ => Err(self.invalid(v, "not a boolean")),
            },
            TypeKind::Integer { min, max, .. } => {
                let i = match v {
                    Value::String(s) => s
                        .trim()
                        .parse::<i64>()
                        .map_err(|_| self.invalid(v, "not an integer"))?,
                    Value::Int(i) => *i,
                    Value::Float(f) => self.whole_number(v, *f)?,
                    _ => return Err(self.invalid(v, "not an integer")),
                };
                if i < *min {
                    return Err(self.invalid(v, format!("less than {min}")));
                }
                if i > *max {
                    return Err(self.invalid(v, format!("greater than {max}")));
                }
                Ok(Value::Int(i))
            }
            TypeKind::Float { .. } => {
                let f = match v {
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    Value::Int(i) => Some(*i as f64),
                    _ => None,
                };
                match f {
                    Some(f) if !f.is_nan() => Ok(Value::Float(f)),
                    _ => Err(self.invalid(v, "not a float")),
                }
            }
            TypeKind::AsciiString { length } | TypeKind::Utf8String { length } => {
                let text = v.as_string().ok_or_else(|| self.invalid(v, "not a string"))?;
                let s = normalize(&text);
                if s.chars().count() > *length {
                    let preview: String = s.chars().take(16).collect();
                    return Err(ApiError::parse(
                        &self.name,
                        preview,
                        format!("length > {length}"),
                    ));
                }
                Ok(Value::String(s))
            }
            TypeKind::AsciiText | TypeKind::Utf8Text | TypeKind::Html | TypeKind::Xml => v
                .as_string()
                .map(Value::String)
                .ok_or_else(|| self.invalid(v, "not a string")),
            TypeKind::Instant(unit) => self.parse_instant(v, *unit),
            TypeKind::DateTime | TypeKind::Date => self.parse_instant(v, TimeUnit::Millis),
            TypeKind::Duration(_) | TypeKind::Id => match v {
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| self.invalid(v, "not an integer")),
                Value::Float(f) => self.whole_number(v, *f).map(Value::Int),
                _ => Err(self.invalid(v, "not an integer")),
            },
            TypeKind::LocalDateTime => self
                .parse_local(v)
                .map(|dt| Value::String(dt.format(LOCAL_DATETIME_FORMAT).to_string())),
            TypeKind::LocalDate => self
                .parse_local(v)
                .map(|dt| Value::String(dt.format(LOCAL_DATE_FORMAT).to_string())),
            TypeKind::Json | TypeKind::JsonArray | TypeKind::JsonObject => {
                let json = match v {
                    Value::String(s) => serde_json::from_str::<serde_json::Value>(s)
                        .map_err(|e| self.invalid(v, e.to_string()))?,
                    Value::List(_) | Value::Json(_) => v.to_json(),
                    _ => return Err(self.invalid(v, "not json")),
                };
                let shaped = match self.kind {
                    TypeKind::JsonArray => json.is_array(),
                    TypeKind::JsonObject => json.is_object(),
                    _ => json.is_array() || json.is_object(),
                };
                if shaped {
                    Ok(Value::Json(json))
                } else {
                    Err(self.invalid(v, "unexpected json shape"))
                }
            }
            TypeKind::Enum(set) => {
                let found = match v {
                    Value::Int(id) => set.by_id(*id),
                    Value::String(s) => match s.trim().parse::<i64>() {
                        Ok(id) => set.by_id(id),
                        Err(_) => set.by_name(s),
                    },
                    _ => None,
                };
                found
                    .map(|e| Value::Int(e.id))
                    .ok_or_else(|| self.invalid(v, "unknown value"))
            }
            TypeKind::Uuid => match v {
                Value::String(s) => Uuid::parse_str(s.trim())
                    .map(Value::Uuid)
                    .map_err(|e| self.invalid(v, e.to_string())),
                _ => Err(self.invalid(v, "not a uuid")),
            },
            TypeKind::Type => Err(self.invalid(v, "unknown type")),
            TypeKind::List(t) | TypeKind::Set(t) => {
                let items: Vec<Value> = match v {
                    Value::List(items) => items.clone(),
                    Value::Json(serde_json::Value::Array(items)) => {
                        items.iter().map(Value::from).collect()
                    }
                    Value::String(s) => match serde_json::from_str::<serde_json::Value>(s) {
                        Ok(serde_json::Value::Array(items)) => {
                            items.iter().map(Value::from).collect()
                        }
                        _ => return Err(self.invalid(v, "not a list")),
                    },
                    _ => return Err(self.invalid(v, "not a list")),
                };
                let mut parsed = Vec::with_capacity(items.len());
                for item in &items {
                    if let Some(p) = t.parse(item)? {
                        parsed.push(p);
                    }
                }
                Ok(Value::List(parsed))
            }
        }
    }

    fn parse_instant(&self, v: &Value, unit: TimeUnit) -> Result<Value> {
        let ts = match v {
            Value::String(s) => {
                if let Ok(i) = s.trim().parse::<i64>() {
                    return Ok(Value::Int(i));
                }
                parse_timestamp(s)
            }
            Value::Float(f) => return self.whole_number(v, *f).map(Value::Int),
            Value::Timestamp(ts) => Some(*ts),
            _ => None,
        };
        let ts = ts.ok_or_else(|| self.invalid(v, "not a timestamp"))?;
        unit.from_ms(ts.timestamp_millis())
            .map(Value::Int)
            .ok_or_else(|| self.invalid(v, "out of range"))
    }

    fn parse_local(&self, v: &Value) -> Result<NaiveDateTime> {
        let dt = match v {
            Value::String(s) => match s.trim().parse::<i64>() {
                Ok(ms) => DateTime::from_timestamp_millis(ms).map(|d| d.naive_utc()),
                Err(_) => parse_local_datetime(s),
            },
            Value::Int(ms) => DateTime::from_timestamp_millis(*ms).map(|d| d.naive_utc()),
            Value::Timestamp(ts) => Some(ts.naive_utc()),
            _ => None,
        };
        dt.ok_or_else(|| self.invalid(v, "not a local date time"))
    }

    fn format_object(&self, v: &Value, opts: &FormatOptions) -> Result<String> {
        match &self.kind {
            TypeKind::Boolean
            | TypeKind::Integer { .. }
            | TypeKind::Float { .. }
            | TypeKind::Id
            | TypeKind::Type
            | TypeKind::LocalDate => Ok(v.to_string()),
            TypeKind::AsciiString { .. }
            | TypeKind::AsciiText
            | TypeKind::Utf8String { .. }
            | TypeKind::Utf8Text
            | TypeKind::Html
            | TypeKind::Xml => {
                let s = v.to_string();
                if opts.safe {
                    return Ok(s);
                }
                // zero-width space after commas lets long lists wrap
                let s = s.replace(',', ",\u{200B}");
                if opts.html {
                    return Ok(escape_html(&s).replace('\n', "<br>"));
                }
                Ok(s)
            }
            TypeKind::Instant(unit) => self.format_instant(v, *unit, opts),
            TypeKind::DateTime => self.format_instant(v, TimeUnit::Millis, opts),
            TypeKind::Date => {
                if opts.format.is_none() && !opts.safe {
                    let opts = opts.clone().with_format(ISO_D);
                    return self.format_instant(v, TimeUnit::Millis, &opts);
                }
                self.format_instant(v, TimeUnit::Millis, opts)
            }
            TypeKind::LocalDateTime => {
                let s = v.to_string();
                if opts.safe {
                    return Ok(s);
                }
                let dt = NaiveDateTime::parse_from_str(&s, LOCAL_DATETIME_FORMAT)
                    .map_err(|e| self.invalid(v, e.to_string()))?;
                format_timestamp(&dt, opts)
            }
            TypeKind::Duration(unit) => {
                let n = v.as_i64().ok_or_else(|| self.invalid(v, "not an integer"))?;
                if opts.safe {
                    return Ok(n.to_string());
                }
                Ok(format_duration(n, *unit))
            }
            TypeKind::Json | TypeKind::JsonArray | TypeKind::JsonObject => {
                let pretty = serde_json::to_string_pretty(&v.to_json())
                    .map_err(|e| self.invalid(v, e.to_string()))?;
                if opts.html && !opts.safe {
                    return Ok(pretty.replace(' ', "&nbsp;").replace('\n', "<br>"));
                }
                Ok(pretty)
            }
            TypeKind::Enum(set) => {
                let id = v.as_i64().ok_or_else(|| self.invalid(v, "not an integer"))?;
                let e = set
                    .by_id(id)
                    .ok_or_else(|| self.invalid(v, "unknown value"))?;
                Ok(if opts.safe {
                    e.name.to_string()
                } else {
                    e.label.clone()
                })
            }
            TypeKind::Uuid => match v {
                Value::Uuid(u) => Ok(u.simple().to_string()),
                _ => Err(self.invalid(v, "not a uuid")),
            },
            TypeKind::List(t) | TypeKind::Set(t) => {
                let Value::List(items) = v else {
                    return Err(self.invalid(v, "not a list"));
                };
                if opts.safe {
                    return serde_json::to_string_pretty(&v.to_json())
                        .map_err(|e| self.invalid(v, e.to_string()));
                }
                if items.is_empty() {
                    return Ok("empty".to_string());
                }
                let formatted = items
                    .iter()
                    .map(|item| t.format(item, opts))
                    .collect::<Result<Vec<_>>>()?;
                Ok(formatted.join(", "))
            }
        }
    }

    fn format_instant(&self, v: &Value, unit: TimeUnit, opts: &FormatOptions) -> Result<String> {
        let n = v.as_i64().ok_or_else(|| self.invalid(v, "not an integer"))?;
        if opts.safe {
            return Ok(n.to_string());
        }
        let dt = unit
            .to_ms(n)
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| self.invalid(v, "out of range"))?;
        format_timestamp(&dt.naive_utc(), opts)
    }
}

impl fmt::Display for XType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Parses a wall-clock date or date time, keeping the local reading of an
/// offset timestamp.
pub fn parse_local_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for pattern in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, LOCAL_DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses an absolute timestamp. Inputs without an offset are read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_local_datetime(s).map(|dt| dt.and_utc())
}

fn format_duration(v: i64, unit: TimeUnit) -> String {
    if v == 0 {
        return format!("0{}", unit.suffix());
    }
    let sign = if v < 0 { "-" } else { "" };
    let abs = v.unsigned_abs();
    let base = unit.base() as u64;
    let (whole, frac) = (abs / base, abs % base);

    let days = whole / 86_400;
    let hours = (whole % 86_400) / 3_600;
    let minutes = (whole % 3_600) / 60;
    let seconds = whole % 60;

    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if seconds > 0 || frac > 0 {
        if frac == 0 {
            parts.push(format!("{seconds}s"));
        } else {
            let digits = format!("{frac:0width$}", width = unit.digits());
            parts.push(format!("{seconds}.{}s", digits.trim_end_matches('0')));
        }
    }
    format!("{sign}{}", parts.join(" "))
}

fn base_types() -> Vec<XType> {
    let mut types = Vec::new();

    for n in [1, 2, 4, 8, 16, 32, 64, 128, 256] {
        types.push(XType::new(
            format!("asciistring({n})"),
            TypeKind::AsciiString { length: n },
        ));
    }
    types.push(XType::new(
        "asciistring",
        TypeKind::AsciiString {
            length: DEFAULT_STRING_LENGTH,
        },
    ));
    for n in [8, 16, 32, 64, 128, 256] {
        types.push(XType::new(
            format!("asciivstring({n})"),
            TypeKind::AsciiString { length: n },
        ));
    }
    types.push(XType::new("asciitext", TypeKind::AsciiText));

    for n in [1, 2, 4, 8, 16, 32, 64, 128] {
        types.push(XType::new(
            format!("utf8string({n})"),
            TypeKind::Utf8String { length: n },
        ));
    }
    types.push(XType::new(
        "utf8string",
        TypeKind::Utf8String {
            length: DEFAULT_STRING_LENGTH,
        },
    ));
    for n in [8, 16, 32, 64, 128] {
        types.push(XType::new(
            format!("utf8vstring({n})"),
            TypeKind::Utf8String { length: n },
        ));
    }
    types.push(XType::new("utf8text", TypeKind::Utf8Text));
    types.push(XType::new("html", TypeKind::Html));
    types.push(XType::new("xml", TypeKind::Xml));

    types.push(XType::new("boolean", TypeKind::Boolean));
    for (size, min, max) in [
        (1, i8::MIN as i64, i8::MAX as i64),
        (2, i16::MIN as i64, i16::MAX as i64),
        (4, i32::MIN as i64, i32::MAX as i64),
        (8, i64::MIN, i64::MAX),
    ] {
        types.push(XType::new(
            format!("int({size})"),
            TypeKind::Integer { size, min, max },
        ));
    }
    types.push(XType::new("float(4)", TypeKind::Float { size: 4 }));
    types.push(XType::new("float(8)", TypeKind::Float { size: 8 }));

    types.push(XType::new("json", TypeKind::Json));
    types.push(XType::new("jsonobject", TypeKind::JsonObject));
    types.push(XType::new("jsonarray", TypeKind::JsonArray));

    types.push(XType::new("datetime", TypeKind::DateTime));
    types.push(XType::new("date", TypeKind::Date));
    types.push(XType::new("localdatetime", TypeKind::LocalDateTime));
    types.push(XType::new("localdate", TypeKind::LocalDate));
    for unit in [
        TimeUnit::Seconds,
        TimeUnit::Millis,
        TimeUnit::Micros,
        TimeUnit::Nanos,
    ] {
        types.push(XType::new(
            format!("instant({})", unit.suffix()),
            TypeKind::Instant(unit),
        ));
        types.push(XType::new(
            format!("duration({})", unit.suffix()),
            TypeKind::Duration(unit),
        ));
    }

    for set in enums::enum_sets() {
        types.push(XType::new(set.name(), TypeKind::Enum(set)));
    }

    for element in [
        "self", "blob", "database", "event", "field", "group", "log", "post", "record", "store",
        "task", "team", "user",
    ] {
        types.push(XType::new(format!("{element}_id"), TypeKind::Id));
    }

    types.push(XType::new("uuid", TypeKind::Uuid));
    types.push(XType::new("type", TypeKind::Type));
    types
}

fn build_type_map() -> HashMap<String, XType> {
    let mut map = HashMap::new();
    for t in base_types() {
        let list = XType::list(t.clone());
        let set = XType::set(t.clone());
        for name in [t.name.clone(), t.safe_name.clone()] {
            map.insert(format!("list({name})"), list.clone());
            map.insert(format!("list_{name}"), list.clone());
            map.insert(format!("set({name})"), set.clone());
            map.insert(format!("set_{name}"), set.clone());
            map.insert(name, t.clone());
        }
    }
    if let Some(wall_id) = map.get("asciivstring(32)").cloned() {
        map.insert("wall_id".to_string(), wall_id);
    }
    map
}
