use serde_json::{Map, Value, json};

/// One entry in the fixed conformance plan.
pub struct TestCase {
    pub description: &'static str,
    pub request: Value,
}

fn request(id: u64, method: &str, params: Option<Value>) -> Value {
    let mut map = Map::new();
    map.insert("jsonrpc".to_string(), json!("2.0"));
    map.insert("id".to_string(), json!(id));
    map.insert("method".to_string(), json!(method));
    if let Some(params) = params {
        map.insert("params".to_string(), params);
    }
    Value::Object(map)
}

fn notification(method: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method
    })
}

/// The six-request conformance plan. Ids are fixed literals so the rendered
/// wire bytes are reproducible run to run.
pub fn plan() -> Vec<TestCase> {
    vec![
        TestCase {
            description: "Initialize handshake",
            request: request(
                1,
                "initialize",
                Some(json!({
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                })),
            ),
        },
        TestCase {
            description: "Initialized notification (no reply expected)",
            request: notification("notifications/initialized"),
        },
        TestCase {
            description: "List available tools",
            request: request(2, "tools/list", None),
        },
        TestCase {
            description: "Call get_restaurants tool",
            request: request(
                3,
                "tools/call",
                Some(json!({
                    "name": "get_restaurants",
                    "arguments": {}
                })),
            ),
        },
        TestCase {
            description: "Call get_menu tool for restaurant 1",
            request: request(
                4,
                "tools/call",
                Some(json!({
                    "name": "get_menu",
                    "arguments": {
                        "restaurant_id": 1
                    }
                })),
            ),
        },
        TestCase {
            description: "Invalid method (server must answer with an error)",
            request: request(5, "invalid_method", None),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_is_six_fixed_cases() {
        let cases = plan();
        let ids: Vec<Option<u64>> = cases
            .iter()
            .map(|case| case.request.get("id").and_then(|id| id.as_u64()))
            .collect();
        assert_eq!(ids, [Some(1), None, Some(2), Some(3), Some(4), Some(5)]);

        let methods: Vec<&str> = cases
            .iter()
            .map(|case| {
                case.request
                    .get("method")
                    .and_then(|method| method.as_str())
                    .expect("method present")
            })
            .collect();
        assert_eq!(
            methods,
            [
                "initialize",
                "notifications/initialized",
                "tools/list",
                "tools/call",
                "tools/call",
                "invalid_method"
            ]
        );
    }

    #[test]
    fn notification_carries_no_id_on_wire() {
        let cases = plan();
        let notification = &cases[1];
        assert!(notification.request.get("id").is_none());

        let serialized = serde_json::to_string(&notification.request).expect("serialize");
        let parsed: Value = serde_json::from_str(&serialized).expect("parse back");
        assert!(parsed.get("id").is_none());
    }

    #[test]
    fn serialization_round_trips() {
        for case in plan() {
            let serialized = serde_json::to_string(&case.request).expect("serialize");
            let parsed: Value = serde_json::from_str(&serialized).expect("parse back");
            assert_eq!(parsed, case.request, "{}", case.description);
        }
    }

    #[test]
    fn rendered_bytes_are_reproducible() {
        let first: Vec<String> = plan()
            .iter()
            .map(|case| serde_json::to_string(&case.request).expect("serialize"))
            .collect();
        let second: Vec<String> = plan()
            .iter()
            .map(|case| serde_json::to_string(&case.request).expect("serialize"))
            .collect();
        assert_eq!(first, second);
    }
}
