//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use hub_core::{ApiError, ClientConfig, HttpMethod, HttpResponse, HubClient, PostPage, PostQuery};

const BASE_URL: &str = "http://localhost:5000";

fn client() -> HubClient {
    HubClient::new(ClientConfig::new(BASE_URL))
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    HttpResponse {
        status: case["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: case["body"].as_str().unwrap().to_string(),
    }
}

// ---------------------------------------------------------------------------
// List posts
// ---------------------------------------------------------------------------

#[test]
fn list_posts_test_vectors() {
    let raw = include_str!("../../test-vectors/list_posts.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let query = PostQuery::page(input["page"].as_u64().unwrap() as u32)
            .unwrap()
            .search(input["search"].as_str().unwrap());
        let expected_req = &case["expected_request"];

        // Verify build
        let req = c.build_list_posts(&query);
        assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{BASE_URL}{}", expected_req["path"].as_str().unwrap()), "{name}: url");
        assert!(req.body.is_none(), "{name}: body should be None");

        // Verify parse
        let page = c.parse_list_posts(simulated(&case["simulated_response"])).unwrap();
        let expected: PostPage = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(page, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected"];
        let err = c.parse_get_post(simulated(&case["response"])).unwrap_err();

        match expected["kind"].as_str().unwrap() {
            "not_found" => assert_eq!(err, ApiError::NotFound, "{name}"),
            "rejected" => {
                let want = ApiError::Rejected {
                    status: expected["status"].as_u64().unwrap() as u16,
                    message: expected["message"].as_str().map(str::to_string),
                };
                assert_eq!(err, want, "{name}");
            }
            other => panic!("{name}: unknown kind {other}"),
        }
    }
}
