use kolibri_envelope::{build_request, classify, MessageKind, INVALID_PARAMS, METHOD_NOT_FOUND};
use kolibri_protocol::params::{BrowseParams, CancelParams, UserAccountParams};
use kolibri_protocol::{
    Method, MethodParams, Protocol, ProtocolError, KNOWN_VERSIONS, V1_0, V2_1, V3_1, V3_3,
};
use kolibri_schema::ValidatorConfig;
use serde_json::{json, Value};

fn cancel(tid: Value) -> Value {
    json!({"jsonrpc": "2.0", "method": "kolibri.cancel", "id": 1, "params": {"tid": tid}})
}

#[test]
fn cancel_out_of_range_is_rejected_at_every_version() {
    for version in KNOWN_VERSIONS {
        let err = Protocol::new(version).inspect(&cancel(json!(70000))).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 1, "at {version}");
        assert_eq!(violations[0].path, "params.tid");
        assert_eq!(violations[0].rule, "unsigned16");
        assert!(err.to_string().contains("params.tid"));
    }
}

#[test]
fn cancel_error_response_is_sent_back() {
    let err = Protocol::new(V3_3)
        .inspect(&cancel(json!(70000)))
        .unwrap_err();
    let response = err.to_response().expect("requests get an error response");
    assert_eq!(classify(&response.to_value().unwrap()), MessageKind::Error);
    assert_eq!(response.id, Some(1));
    assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
}

#[test]
fn browse_detail_flag_needs_v2_1() {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 4,
        "method": "kolibri.node.browse",
        "params": {"path": "/plant", "detailed": true},
    });

    let old = Protocol::new(V1_0).inspect(&message).unwrap();
    let MethodParams::NodeBrowse(params) = old.call.unwrap().params else {
        panic!("expected browse params");
    };
    assert_eq!(params.path, "/plant");

    let strict = ValidatorConfig {
        strict_mode: true,
        ..ValidatorConfig::default()
    };
    let err = Protocol::with_config(V1_0, strict)
        .inspect(&message)
        .unwrap_err();
    assert_eq!(err.violations()[0].path, "params.detailed");
    assert_eq!(err.violations()[0].rule, "unknownField");

    let inbound = Protocol::with_config(V2_1, strict).inspect(&message).unwrap();
    assert_eq!(
        inbound.call.unwrap().params,
        MethodParams::NodeBrowse(BrowseParams {
            path: "/plant".into(),
            levels: None,
            detailed: Some(true),
        })
    );
}

#[test]
fn routed_requests_keep_their_tag_through_rejection() {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 12,
        "method": "kolibri.node.move",
        "params": {"path": "/a", "target": "/b"},
        "_server": "backend-7",
    });
    let err = Protocol::new(V3_1).inspect(&message).unwrap_err();
    assert!(matches!(err, ProtocolError::UnknownMethod { .. }));

    let response = err.to_response().unwrap();
    assert_eq!(response.kind(), MessageKind::ErrorRouted);
    assert_eq!(response.server.as_deref(), Some("backend-7"));
    assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
}

#[test]
fn partial_update_accepts_one_valid_field_by_default() {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "kolibri.user.modify",
        "params": {"user": "operator", "description": "x".repeat(300), "active": false},
    });
    assert!(Protocol::new(V3_3).inspect(&message).is_ok());

    let conjunctive = ValidatorConfig {
        conjunctive_partial_updates: true,
        ..ValidatorConfig::default()
    };
    let err = Protocol::with_config(V3_3, conjunctive)
        .inspect(&message)
        .unwrap_err();
    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].path, "params.description");
}

#[test]
fn masked_partial_update_fields_are_dropped_before_decoding() {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "kolibri.user.modify",
        "params": {"user": "ops", "active": true, "description": 5},
    });
    let inbound = Protocol::new(V3_3).inspect(&message).unwrap();
    assert_eq!(
        inbound.call.unwrap().params,
        MethodParams::UserModify(UserAccountParams {
            user: "ops".into(),
            password: None,
            description: None,
            active: Some(true),
            expires: None,
        })
    );
}

#[test]
fn cancel_accepts_integral_float_tid() {
    for version in KNOWN_VERSIONS {
        let inbound = Protocol::new(version).inspect(&cancel(json!(7.0))).unwrap();
        assert_eq!(
            inbound.call.unwrap().params,
            MethodParams::Cancel(CancelParams { tid: 7 }),
            "at {version}"
        );
    }
}

#[test]
fn partial_update_without_changes_is_rejected() {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 2,
        "method": "kolibri.project.modify",
        "params": {"project": "plant-7", "description": null},
    });
    let err = Protocol::new(V3_3).inspect(&message).unwrap_err();
    assert_eq!(err.violations()[0].path, "params");
    assert_eq!(err.violations()[0].rule, "atLeastOne");
}

#[test]
fn list_params_report_indexed_paths() {
    let message = json!({
        "jsonrpc": "2.0",
        "id": 3,
        "method": "kolibri.write",
        "params": [
            {"path": "/plant/a", "value": 1},
            {"path": "/plant//b", "value": 2, "quality": "perfect"},
        ],
    });
    let err = Protocol::new(V3_3).inspect(&message).unwrap_err();
    let paths: Vec<&str> = err.violations().iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, ["params[1].path", "params[1].quality"]);
}

#[test]
fn built_requests_pass_inspection() {
    let request = build_request(
        Method::UserCreate.as_str(),
        21,
        Some(json!({"user": "j.doe", "password": "secret", "expires": "2027-01-31"})),
        Some("backend-1"),
    );
    let value = request.to_value().unwrap();
    assert_eq!(classify(&value), MessageKind::RequestRouted);

    let inbound = Protocol::new(V3_1).inspect(&value).unwrap();
    let MethodParams::UserCreate(account) = inbound.call.unwrap().params else {
        panic!("expected user.create params");
    };
    assert_eq!(account.expires.as_deref(), Some("2027-01-31"));

    let err = Protocol::new(V3_1)
        .inspect(&json!({
            "jsonrpc": "2.0", "id": 22, "method": "kolibri.user.create",
            "params": {"user": "j.doe", "password": "secret", "expires": "2027-1-31"},
        }))
        .unwrap_err();
    assert_eq!(err.violations()[0].rule, "canonicalDate");
}

#[test]
fn bytes_that_are_not_json_are_malformed() {
    let err = Protocol::new(V3_3).inspect_slice(b"{not json").unwrap_err();
    assert!(matches!(err, ProtocolError::Malformed(_)));
    assert!(err.to_response().is_none());
}
