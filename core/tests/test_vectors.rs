//! Verify request building and form encoding against the JSON vectors in `test-vectors/`.
//!
//! Bodies are compared as parsed JSON, not raw strings, so field ordering in
//! the vector files does not matter.

use serde_json::Value;
use tuneshare_core::{
    encode_form, ApiClient, FileField, FormPayload, FormValue, HttpMethod, Payload,
};

const BASE_URL: &str = "http://localhost:8080";

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            (
                pair[0].as_str().unwrap().to_string(),
                pair[1].as_str().unwrap().to_string(),
            )
        })
        .collect()
}

fn file_field(value: &Value) -> FileField {
    serde_json::from_value(value.clone()).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let client = ApiClient::new(BASE_URL);
        if let Some(token) = case["token"].as_str() {
            client.set_authorization(token);
        }

        let overrides = pairs(&case["overrides"]);
        let overrides: Vec<(&str, &str)> = overrides
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let payload = match &case["body"] {
            Value::Null => Payload::None,
            body => Payload::Json(body),
        };
        let method = parse_method(case["method"].as_str().unwrap());
        let req = client
            .build_request(case["path"].as_str().unwrap(), method, payload, &overrides)
            .unwrap();

        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
        assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");

        match &expected["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            body => {
                let sent: Value = serde_json::from_str(req.json_body().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: body");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[test]
fn form_test_vectors() {
    let raw = include_str!("../../test-vectors/forms.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();

        let mut payload = FormPayload::new();
        for entry in case["entries"].as_array().unwrap() {
            let key = entry[0].as_str().unwrap();
            let value = &entry[1];
            let value = if let Some(text) = value.get("text") {
                Some(FormValue::Text(text.as_str().unwrap().to_string()))
            } else if let Some(file) = value.get("file") {
                Some(FormValue::File(file_field(file)))
            } else {
                None
            };
            payload.insert(key, value);
        }

        let form = encode_form(&payload);
        let expected = case["expected_parts"].as_array().unwrap();
        assert_eq!(form.parts.len(), expected.len(), "{name}: part count");
        for (part, want) in form.parts.iter().zip(expected) {
            assert_eq!(part.name, want["name"].as_str().unwrap(), "{name}: part name");
            match (&part.value, want.get("text"), want.get("file")) {
                (FormValue::Text(text), Some(want_text), None) => {
                    assert_eq!(text, want_text.as_str().unwrap(), "{name}: text of {}", part.name)
                }
                (FormValue::File(file), None, Some(want_file)) => {
                    assert_eq!(file, &file_field(want_file), "{name}: file {}", part.name)
                }
                (got, _, _) => panic!("{name}: unexpected part {got:?} for {want}"),
            }
        }

        // the same payload through post_form yields the same parts and a multipart header
        let req = ApiClient::new(BASE_URL).build_post_form("/post", &payload);
        assert_eq!(req.form(), Some(&form), "{name}: post_form parts");
        assert_eq!(req.header("content-type"), Some("multipart/form-data"), "{name}: content type");
    }
}
