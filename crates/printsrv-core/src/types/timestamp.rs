//! Lexically sortable UTC timestamps.
//!
//! Every instant is stored as fixed-width RFC 3339 text with microsecond
//! precision (`2024-05-01T09:30:00.000000Z`). Fixed width plus a constant
//! `Z` suffix means SQL string comparison orders rows exactly like the
//! decoded instants, so range predicates can run inside SQLite.

use std::fmt;
use std::ops::Sub;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A UTC instant truncated to microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap a `chrono` instant, dropping sub-microsecond precision so that
    /// a value survives a store round trip unchanged.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let micros = dt.timestamp_micros();
        Self(DateTime::from_timestamp_micros(micros).unwrap_or(dt))
    }

    /// The wrapped `chrono` instant.
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Encode as fixed-width sortable text.
    pub fn encode(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    /// Decode text produced by [`Timestamp::encode`] (or any RFC 3339 value).
    pub fn decode(text: &str) -> Result<Self, AppError> {
        DateTime::parse_from_rfc3339(text)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| {
                AppError::with_source(
                    crate::error::ErrorKind::Persistence,
                    format!("Malformed stored timestamp '{text}'"),
                    e,
                )
            })
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl Sub<Duration> for Timestamp {
    type Output = Timestamp;

    /// Saturates at the earliest representable instant.
    fn sub(self, rhs: Duration) -> Self::Output {
        Self(
            self.0
                .checked_sub_signed(rhs)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(feature = "sqlx")]
impl sqlx::Type<sqlx::Sqlite> for Timestamp {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

#[cfg(feature = "sqlx")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Timestamp {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.encode(), buf)
    }
}

#[cfg(feature = "sqlx")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Timestamp {
    fn decode(
        value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let text = <&str as sqlx::Decode<'r, sqlx::Sqlite>>::decode(value)?;
        Ok(Self::decode(text)?)
    }
}
