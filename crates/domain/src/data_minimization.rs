//! Request-body checks for personal data a child account must never submit.

use serde_json::{Map, Value};

/// Keys stripped from inbound request bodies.
pub static PROHIBITED_REQUEST_FIELDS: &[&str] = &[
    "realName",
    "fullName",
    "address",
    "phoneNumber",
    "schoolName",
    "location",
    "geolocation",
    "socialSecurityNumber",
    "creditCard",
];

/// Returns the prohibited keys present in a body, in list order.
#[must_use]
pub fn find_prohibited_fields(body: &Map<String, Value>) -> Vec<&'static str> {
    PROHIBITED_REQUEST_FIELDS
        .iter()
        .copied()
        .filter(|field| body.contains_key(*field))
        .collect()
}

/// Returns whether a body carries no prohibited keys.
#[must_use]
pub fn is_data_minimized(body: &Map<String, Value>) -> bool {
    find_prohibited_fields(body).is_empty()
}

/// Removes prohibited keys regardless of their value and returns what was removed.
pub fn strip_prohibited_fields(body: &mut Map<String, Value>) -> Vec<&'static str> {
    let found = find_prohibited_fields(body);
    for field in &found {
        body.remove(*field);
    }

    found
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test: expected object"),
        }
    }

    #[test]
    fn clean_body_is_minimized() {
        let body = body(json!({ "username": "owl_eyes", "age": 9 }));
        assert!(is_data_minimized(&body));
    }

    #[test]
    fn strip_removes_falsy_and_truthy_values() {
        let mut body = body(json!({
            "username": "owl_eyes",
            "schoolName": "",
            "creditCard": "4111",
            "geolocation": null
        }));

        let stripped = strip_prohibited_fields(&mut body);
        assert_eq!(stripped, vec!["schoolName", "geolocation", "creditCard"]);
        assert!(is_data_minimized(&body));
        assert_eq!(body.get("username"), Some(&json!("owl_eyes")));
    }
}
