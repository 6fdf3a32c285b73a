// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Request parameter validation tests for arukas-sdk.

use arukas_sdk::{PLAN_FREE, PLAN_STANDARD_2, Port, REGION_JP_TOKYO, RequestParam, SdkError};

fn valid_create() -> RequestParam {
    RequestParam::new("test-app", "nginx:latest")
        .with_port(Port::tcp(80))
        .with_env("FOO", "BAR")
        .with_plan(PLAN_FREE)
}

fn invalid_field(result: arukas_sdk::Result<()>) -> &'static str {
    match result {
        Err(SdkError::Validation { field, .. }) => field,
        other => panic!("expected validation error, got {:?}", other),
    }
}

// ============================================================================
// Create
// ============================================================================

#[test]
fn test_create_valid() {
    assert!(valid_create().validate_for_create().is_ok());

    let full = valid_create()
        .with_instances(3)
        .with_port(Port::udp(34197))
        .with_command("nginx")
        .with_region(REGION_JP_TOKYO)
        .with_plan(PLAN_STANDARD_2)
        .with_sub_domain("my-app");
    assert!(full.validate_for_create().is_ok());
}

#[test]
fn test_create_rejects_invalid_params() {
    let cases: Vec<(&str, RequestParam, &str)> = vec![
        (
            "empty name",
            RequestParam {
                name: String::new(),
                ..valid_create()
            },
            "name",
        ),
        (
            "empty image",
            RequestParam {
                image: String::new(),
                ..valid_create()
            },
            "image",
        ),
        ("zero instances", valid_create().with_instances(0), "instances"),
        (
            "no ports",
            RequestParam {
                ports: Vec::new(),
                ..valid_create()
            },
            "ports",
        ),
        (
            "unsupported protocol",
            valid_create().with_port(Port::new("ssh", 22)),
            "ports",
        ),
        (
            "port out of range",
            valid_create().with_port(Port::tcp(65536)),
            "ports",
        ),
        ("port zero", valid_create().with_port(Port::tcp(0)), "ports"),
        (
            "missing plan",
            RequestParam {
                plan: None,
                ..valid_create()
            },
            "plan",
        ),
        ("unknown plan", valid_create().with_plan("foobar"), "plan"),
        ("unknown region", valid_create().with_region("foobar"), "region"),
    ];

    for (name, param, field) in cases {
        assert_eq!(
            invalid_field(param.validate_for_create()),
            field,
            "case: {}",
            name
        );
    }
}

#[test]
fn test_create_reports_first_invalid_field() {
    let param = RequestParam::default();
    assert_eq!(invalid_field(param.validate_for_create()), "name");

    let param = RequestParam::new("app", "").with_plan("foobar");
    assert_eq!(invalid_field(param.validate_for_create()), "image");
}

#[test]
fn test_uppercase_protocol_is_accepted() {
    let param = valid_create().with_port(Port::new("UDP", 53));
    assert!(param.validate_for_create().is_ok());
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_update_needs_only_image_and_instances() {
    let param = RequestParam::new("", "nginx:1.25");
    assert!(param.validate_for_update().is_ok());

    let param = RequestParam::new("", "nginx:1.25").with_instances(0);
    assert_eq!(invalid_field(param.validate_for_update()), "instances");

    let param = RequestParam::new("", "");
    assert_eq!(invalid_field(param.validate_for_update()), "image");
}

#[test]
fn test_update_checks_optional_fields_when_present() {
    let base = || RequestParam::new("", "nginx:latest");

    assert!(base().with_port(Port::udp(53)).validate_for_update().is_ok());
    assert!(base().with_plan(PLAN_FREE).validate_for_update().is_ok());

    assert_eq!(
        invalid_field(base().with_port(Port::new("ssh", 22)).validate_for_update()),
        "ports"
    );
    assert_eq!(
        invalid_field(base().with_plan("foobar").validate_for_update()),
        "plan"
    );
    assert_eq!(
        invalid_field(base().with_region("foobar").validate_for_update()),
        "region"
    );
}

// ============================================================================
// Plan IDs
// ============================================================================

#[test]
fn test_plan_id() {
    assert_eq!(valid_create().plan_id().as_deref(), Some("jp-tokyo/free"));
    assert_eq!(
        valid_create()
            .with_region(REGION_JP_TOKYO)
            .with_plan(PLAN_STANDARD_2)
            .plan_id()
            .as_deref(),
        Some("jp-tokyo/standard-2")
    );
    assert_eq!(RequestParam::new("a", "b").plan_id(), None);
}
