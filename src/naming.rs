//! Identifier helpers shared by the generator and the CLI.

use regex::Regex;
use std::sync::LazyLock;

static CAPITALISED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("Invalid regex"));

static LOWER_THEN_UPPER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("Invalid regex"));

/// Converts a camelCase (or PascalCase) identifier to snake_case.
///
/// A separator is first inserted before every capitalised word that follows
/// another character, then between a lowercase letter or digit and the
/// uppercase letter after it. The result is lowercased.
///
/// ```
/// use client_from_swagger::naming::camel_to_snake;
///
/// assert_eq!(camel_to_snake("getActivitiesByDate"), "get_activities_by_date");
/// assert_eq!(camel_to_snake("HTTPResponse"), "http_response");
/// ```
pub fn camel_to_snake(camel_cased: &str) -> String {
    let words = CAPITALISED_WORD.replace_all(camel_cased, "${1}_${2}");
    LOWER_THEN_UPPER
        .replace_all(&words, "${1}_${2}")
        .to_lowercase()
}

/// Turns a schema parameter name into the Python identifier used for it.
///
/// Hyphens are not valid in identifiers, so they become underscores before
/// the casing conversion.
pub fn parameter_identifier(name: &str) -> String {
    camel_to_snake(&name.replace('-', "_"))
}

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Whether `name` is a Python keyword and so cannot name an argument
pub fn is_python_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Whether `name` is an ASCII Python identifier (keywords included)
pub fn is_python_identifier(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_to_snake_simple() {
        assert_eq!(camel_to_snake("getProfile"), "get_profile");
        assert_eq!(camel_to_snake("getXById"), "get_x_by_id");
        assert_eq!(camel_to_snake("GetBadges"), "get_badges");
    }

    #[test]
    fn test_camel_to_snake_acronyms() {
        assert_eq!(camel_to_snake("getECGLogList"), "get_ecg_log_list");
        assert_eq!(camel_to_snake("getSpO2Summary"), "get_sp_o2_summary");
        assert_eq!(camel_to_snake("HTTPResponse"), "http_response");
    }

    #[test]
    fn test_camel_to_snake_digits() {
        assert_eq!(camel_to_snake("getAzm1dSeries"), "get_azm1d_series");
        assert_eq!(camel_to_snake("get2Things"), "get2_things");
    }

    #[test]
    fn test_camel_to_snake_keeps_snake_case() {
        for input in ["already_snake", "get_x_by_id", "a", "", "v1_2"] {
            assert_eq!(camel_to_snake(input), input);
        }
    }

    #[test]
    fn test_camel_to_snake_is_idempotent() {
        let inputs = [
            "getActivityTimeSeriesByDateRange",
            "getHeartByDateTimeSeries",
            "getIrnProfile",
            "getBrSummaryByDate",
            "ABCDef",
            "x9Y",
        ];
        for input in inputs {
            let once = camel_to_snake(input);
            assert_eq!(camel_to_snake(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_camel_to_snake_charset() {
        let inputs = ["getFoodsLocales", "getWaterGoal", "getActivityTCXByLogId", "getV2Data"];
        for input in inputs {
            let snake = camel_to_snake(input);
            assert!(
                snake
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "unexpected character in {snake}"
            );
        }
    }

    #[test]
    fn test_parameter_identifier_replaces_hyphens() {
        assert_eq!(parameter_identifier("detail-level"), "detail_level");
        assert_eq!(parameter_identifier("start-time"), "start_time");
        assert_eq!(parameter_identifier("beforeDate"), "before_date");
        assert_eq!(parameter_identifier("resource-path"), "resource_path");
    }

    #[test]
    fn test_python_identifiers_and_keywords() {
        assert!(is_python_identifier("before_date"));
        assert!(is_python_identifier("_private"));
        assert!(!is_python_identifier("2nd"));
        assert!(!is_python_identifier("ids[]"));
        assert!(!is_python_identifier(""));

        assert!(is_python_keyword("from"));
        assert!(is_python_keyword("None"));
        assert!(!is_python_keyword("none"));
        assert!(!is_python_keyword("date"));
    }
}
