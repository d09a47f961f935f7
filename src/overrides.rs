//! Built-in preset for the Fitbit Web API.
//!
//! The pinned digest and the override table below were audited together
//! against one published revision of the Swagger document. If the digest
//! stops matching, both must be re-checked before the pin is updated.

use crate::patcher::{Override, PathSegment};
use serde_json::{json, Value};

/// Published location of the Swagger document
pub const FITBIT_API_JSON: &str =
    "https://dev.fitbit.com/build/reference/web-api/explore/fitbit-web-api-swagger.json";

/// SHA-256 of the audited revision of [`FITBIT_API_JSON`]
pub const FITBIT_API_SHA256: &str =
    "2bd9c196390f0e8fe11a05cb2ce8dfd736d8d9ce9e87f85d25477a8594ead719";

/// Time-series periods accepted by most `{period}` endpoints
/// Name the generated docstrings use for the published document
pub const FITBIT_API_NAME: &str = "Fitbit Web API";

pub const PERIODS: &[&str] = &["1d", "7d", "30d", "1w", "1m", "3m", "6m", "1y", "max"];

/// Heart rate series only go up to one month
pub const HEART_PERIODS: &[&str] = &["1d", "7d", "30d", "1w", "1m"];

/// Correction applied to one parameter of a `GET` operation
#[derive(Debug, Clone, Copy)]
enum Fix {
    Format(&'static str),
    DateOrTimestamp,
    Enum(&'static [&'static str]),
}

impl Fix {
    fn field(&self) -> &'static str {
        match self {
            Fix::Format(_) | Fix::DateOrTimestamp => "format",
            Fix::Enum(_) => "enum",
        }
    }

    fn value(&self) -> Value {
        match self {
            Fix::Format(format) => json!(format),
            Fix::DateOrTimestamp => json!(["date", "timestamp"]),
            Fix::Enum(values) => json!(values),
        }
    }
}

/// `(path template, parameter index, fix)`, in application order
const FIXES: &[(&str, i64, Fix)] = &[
    (
        "/1/user/-/activities/active-zone-minutes/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        2,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/active-zone-minutes/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        3,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/{period}.json",
        -1,
        Fix::Enum(PERIODS),
    ),
    (
        "/1/user/-/activities/active-zone-minutes/date/{start-date}/{end-date}/time/{start-time}/{end-time}.json",
        3,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/active-zone-minutes/date/{start-date}/{end-date}/time/{start-time}/{end-time}.json",
        4,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/tracker/{resource-path}/date/{date}/{period}.json",
        -1,
        Fix::Enum(PERIODS),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{base-date}/{end-date}/{detail-level}.json",
        3,
        Fix::Enum(&["1min", "15min"]),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/1d/{detail-level}.json",
        2,
        Fix::Enum(&["1min", "15min"]),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/{end-date}/{detail-level}/time/{start-time}/{end-time}.json",
        3,
        Fix::Enum(&["1min", "15min"]),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/{end-date}/{detail-level}/time/{start-time}/{end-time}.json",
        4,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/{end-date}/{detail-level}/time/{start-time}/{end-time}.json",
        5,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        2,
        Fix::Enum(&["1min", "15min"]),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        3,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/{resource-path}/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        4,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/list.json",
        0,
        Fix::DateOrTimestamp,
    ),
    (
        "/1/user/-/activities/list.json",
        1,
        Fix::DateOrTimestamp,
    ),
    (
        "/1/user/-/activities/list.json",
        2,
        Fix::Enum(&["asc", "desc"]),
    ),
    (
        "/1/user/-/activities/goals/{period}.json",
        -1,
        Fix::Enum(&["daily", "weekly"]),
    ),
    (
        "/1/user/-/body/log/fat/date/{date}/{period}.json",
        -1,
        Fix::Enum(PERIODS),
    ),
    (
        "/1/user/-/body/log/{goal-type}/goal.json",
        0,
        Fix::Enum(&["weight", "fat"]),
    ),
    (
        "/1/user/-/body/log/weight/date/{date}/{period}.json",
        -1,
        Fix::Enum(PERIODS),
    ),
    (
        "/1/user/-/body/{resource-path}/date/{date}/{period}.json",
        -1,
        Fix::Enum(PERIODS),
    ),
    (
        "/1/user/-/ecg/list.json",
        0,
        Fix::DateOrTimestamp,
    ),
    (
        "/1/user/-/ecg/list.json",
        1,
        Fix::DateOrTimestamp,
    ),
    (
        "/1/user/-/ecg/list.json",
        2,
        Fix::Enum(&["asc", "desc"]),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/{period}.json",
        -1,
        Fix::Enum(HEART_PERIODS),
    ),
    (
        "/1/user/-/activities/heart/date/{base-date}/{end-date}.json",
        0,
        Fix::Format("date"),
    ),
    (
        "/1/user/-/activities/heart/date/{base-date}/{end-date}.json",
        1,
        Fix::Format("date"),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/{end-date}/{detail-level}.json",
        2,
        Fix::Enum(&["1sec", "1min", "5min", "15min"]),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/{end-date}/{detail-level}/time/{start-time}/{end-time}.json",
        2,
        Fix::Enum(&["1sec", "1min", "5min", "15min"]),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/{end-date}/{detail-level}/time/{start-time}/{end-time}.json",
        3,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/{end-date}/{detail-level}/time/{start-time}/{end-time}.json",
        4,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/1d/{detail-level}.json",
        1,
        Fix::Enum(&["1sec", "1min", "5min", "15min"]),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        1,
        Fix::Enum(&["1sec", "1min", "5min", "15min"]),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        2,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/activities/heart/date/{date}/1d/{detail-level}/time/{start-time}/{end-time}.json",
        3,
        Fix::Format("time"),
    ),
    (
        "/1/user/-/foods/log/{resource-path}/date/{date}/{period}.json",
        -1,
        Fix::Enum(PERIODS),
    ),
    (
        "/1.2/user/-/sleep/list.json",
        0,
        Fix::DateOrTimestamp,
    ),
    (
        "/1.2/user/-/sleep/list.json",
        1,
        Fix::DateOrTimestamp,
    ),
    (
        "/1.2/user/-/sleep/list.json",
        2,
        Fix::Enum(&["asc", "desc"]),
    ),
];

/// Address of a field of one parameter of a `GET` operation
pub fn parameter_field(template: &str, index: i64, field: &str) -> Vec<PathSegment> {
    vec![
        PathSegment::from("paths"),
        PathSegment::from(template),
        PathSegment::from("get"),
        PathSegment::from("parameters"),
        PathSegment::from(index),
        PathSegment::from(field),
    ]
}

/// The override table for the audited Fitbit document
pub fn fitbit_overrides() -> Vec<Override> {
    FIXES
        .iter()
        .map(|(template, index, fix)| {
            Override::replace(parameter_field(template, *index, fix.field()), fix.value())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patcher;

    #[test]
    fn test_fitbit_overrides_shape() {
        let table = fitbit_overrides();
        assert_eq!(table.len(), FIXES.len());
        for entry in &table {
            assert_eq!(entry.path.len(), 6);
            assert_eq!(entry.path[2], PathSegment::from("get"));
            assert!(entry.replacement.is_some());
        }
    }

    #[test]
    fn test_fitbit_overrides_values() {
        let table = fitbit_overrides();
        let list = table
            .iter()
            .find(|o| {
                o.path[1] == PathSegment::from("/1/user/-/activities/list.json")
                    && o.path[4] == PathSegment::from(0)
            })
            .unwrap();
        assert_eq!(list.replacement, Some(json!(["date", "timestamp"])));

        let heart = table
            .iter()
            .find(|o| o.path[1] == PathSegment::from("/1/user/-/activities/heart/date/{date}/{period}.json"))
            .unwrap();
        assert_eq!(heart.replacement, Some(json!(["1d", "7d", "30d", "1w", "1m"])));
        assert_eq!(heart.path[4], PathSegment::Index(-1));
    }

    #[test]
    fn test_fitbit_overrides_apply_to_matching_document() {
        let template = "/1/user/-/ecg/list.json";
        let mut raw = json!({"paths": {template: {"get": {"parameters": [
            {"name": "beforeDate", "in": "query"},
            {"name": "afterDate", "in": "query"},
            {"name": "sort", "in": "query"},
        ]}}}});
        let table: Vec<Override> = fitbit_overrides()
            .into_iter()
            .filter(|o| o.path[1] == PathSegment::from(template))
            .collect();
        assert_eq!(table.len(), 3);

        raw = patcher::apply(raw, &table).unwrap();
        let params = &raw["paths"][template]["get"]["parameters"];
        assert_eq!(params[0]["format"], json!(["date", "timestamp"]));
        assert_eq!(params[2]["enum"], json!(["asc", "desc"]));
    }
}
