//! Deferred-error attribute extraction.
//!
//! Parsers chain many lookups against one [`AttrGetter`] and check the outcome
//! once at the end. A failed lookup records the first error, hands back the
//! type's zero value and lets the rest of the lookups run.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::AttrError;
use crate::jid::Jid;
use crate::node::{AttrValue, Attrs};

/// Conversion from a wire attribute into a typed value.
///
/// String attributes are accepted for every type, since peers frequently
/// send numbers, booleans and JIDs in their textual form.
pub trait FromAttr: Sized + Default {
    /// Human-readable name of the expected type.
    const EXPECTED: &'static str;

    fn from_attr(value: &AttrValue) -> Option<Self>;
}

impl FromAttr for String {
    const EXPECTED: &'static str = "string";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Str(s) => Some(s.clone()),
            AttrValue::Jid(jid) => Some(jid.to_string()),
            _ => None,
        }
    }
}

impl FromAttr for i64 {
    const EXPECTED: &'static str = "int";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(i) => Some(*i),
            AttrValue::Str(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromAttr for u64 {
    const EXPECTED: &'static str = "unsigned int";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Int(i) => u64::try_from(*i).ok(),
            AttrValue::Str(s) => s.parse().ok(),
            _ => None,
        }
    }
}

impl FromAttr for bool {
    const EXPECTED: &'static str = "bool";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Bool(b) => Some(*b),
            AttrValue::Str(s) => match s.as_str() {
                "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
                "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl FromAttr for Jid {
    const EXPECTED: &'static str = "jid";

    fn from_attr(value: &AttrValue) -> Option<Self> {
        match value {
            AttrValue::Jid(jid) => Some(jid.clone()),
            AttrValue::Str(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Cursor over one attribute mapping holding at most one recorded failure.
#[derive(Debug)]
pub struct AttrGetter<'a> {
    attrs: &'a Attrs,
    error: Option<AttrError>,
}

impl<'a> AttrGetter<'a> {
    pub fn new(attrs: &'a Attrs) -> Self {
        Self { attrs, error: None }
    }

    fn record(&mut self, err: AttrError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn lookup<T: FromAttr>(&mut self, key: &str, required: bool) -> Option<T> {
        let attrs = self.attrs;
        let Some(value) = attrs.get(key) else {
            if required {
                self.record(AttrError::Missing(key.to_string()));
            }
            return None;
        };
        let parsed = T::from_attr(value);
        if parsed.is_none() {
            self.record(AttrError::Malformed {
                key: key.to_string(),
                expected: T::EXPECTED,
                got: format!("{} {:?}", value.kind(), value.to_string()),
            });
        }
        parsed
    }

    /// Required attribute; records a failure and returns `T::default()` if
    /// absent or malformed.
    pub fn get<T: FromAttr>(&mut self, key: &str) -> T {
        self.lookup(key, true).unwrap_or_default()
    }

    /// Optional attribute; absence is not a failure, a malformed value is.
    pub fn optional<T: FromAttr>(&mut self, key: &str) -> Option<T> {
        self.lookup(key, false)
    }

    pub fn string(&mut self, key: &str) -> String {
        self.get(key)
    }

    pub fn optional_string(&mut self, key: &str) -> Option<String> {
        self.optional(key)
    }

    pub fn int64(&mut self, key: &str) -> i64 {
        self.get(key)
    }

    pub fn optional_int64(&mut self, key: &str) -> Option<i64> {
        self.optional(key)
    }

    pub fn uint64(&mut self, key: &str) -> u64 {
        self.get(key)
    }

    pub fn optional_uint64(&mut self, key: &str) -> Option<u64> {
        self.optional(key)
    }

    pub fn bool(&mut self, key: &str) -> bool {
        self.get(key)
    }

    pub fn optional_bool(&mut self, key: &str) -> Option<bool> {
        self.optional(key)
    }

    pub fn jid(&mut self, key: &str) -> Jid {
        self.get(key)
    }

    /// Optional JID; an empty string counts as absent.
    pub fn optional_jid(&mut self, key: &str) -> Option<Jid> {
        if matches!(self.attrs.get(key), Some(AttrValue::Str(s)) if s.is_empty()) {
            return None;
        }
        self.optional(key)
    }

    /// Optional JID collapsed to the empty JID when absent or empty.
    pub fn optional_jid_or_empty(&mut self, key: &str) -> Jid {
        self.optional_jid(key).unwrap_or_default()
    }

    /// Integer unix seconds as an absolute time.
    pub fn unix_time(&mut self, key: &str) -> SystemTime {
        let secs = self.int64(key);
        let offset = Duration::from_secs(secs.unsigned_abs());
        let time = if secs >= 0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };
        time.unwrap_or_else(|| {
            self.record(AttrError::Malformed {
                key: key.to_string(),
                expected: "unix time",
                got: secs.to_string(),
            });
            UNIX_EPOCH
        })
    }

    pub fn ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn error(&self) -> Option<&AttrError> {
        self.error.as_ref()
    }

    /// Consume the cursor, returning the first recorded failure if any.
    pub fn finish(self) -> Result<(), AttrError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
