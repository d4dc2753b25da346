use chrono::{DateTime, Utc};

/// strftime format of the `{timestamp}` token: ISO-8601 in UTC.
pub const ISO_TIME: &'static str = "%Y-%m-%dT%H:%M:%SZ";

/// ISO-8601 with `:` replaced by `-`, safe to embed in a file name.
pub const ARCHIVE_TIME: &'static str = "%Y-%m-%dT%H-%M-%SZ";

/// The instant a log call is processed, taken once and shared by all sinks.
#[derive(Clone, Copy)]
pub struct Timer(DateTime<Utc>);

impl std::ops::Deref for Timer {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Timer {
    pub fn new() -> Self {
        return Self(Utc::now());
    }

    pub fn at(t: DateTime<Utc>) -> Self {
        Self(t)
    }
}
