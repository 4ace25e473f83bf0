//! Verify request building and response handling against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Expected outputs are compared as parsed JSON, not raw strings, so key
//! ordering in the vector files does not matter.

use builder_core::{
    handle_response, HttpMethod, HttpResponse, JsonObject, RequestSpecBuilder, TransportError,
};

fn pairs(value: &serde_json::Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let expected = &case["expected_request"];

        let mut builder = RequestSpecBuilder::new();
        builder
            .set_base_address(input["base_address"].as_str().unwrap())
            .unwrap()
            .set_path(input["path"].as_str().unwrap())
            .set_method(serde_json::from_value(input["method"].clone()).unwrap());
        for (k, v) in pairs(&input["headers"]) {
            builder.add_header(&k, &v);
        }
        for (k, v) in pairs(&input["parameters"]) {
            builder.add_parameter(&k, &v);
        }

        let descriptor = builder.build().unwrap();
        let req = descriptor.request();
        let method: HttpMethod = serde_json::from_value(expected["method"].clone()).unwrap();
        assert_eq!(req.method, method, "{name}: method");
        assert_eq!(req.url, expected["url"].as_str().unwrap(), "{name}: url");
        assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let result = match case.get("simulated_error") {
            Some(error) => Err(TransportError::Connection(error.as_str().unwrap().to_string())),
            None => {
                let sim = &case["simulated_response"];
                Ok(HttpResponse {
                    status: sim["status"].as_u64().unwrap() as u16,
                    headers: Vec::new(),
                    body: sim["body"].as_str().unwrap().as_bytes().to_vec(),
                })
            }
        };

        let expected: Option<JsonObject> =
            serde_json::from_value(case["expected_output"].clone()).unwrap();
        assert_eq!(handle_response(result), expected, "{name}: output");
    }
}
