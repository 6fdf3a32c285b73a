// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Regions and service plans.

/// The "jp-tokyo" region.
pub const REGION_JP_TOKYO: &str = "jp-tokyo";

/// The "free" plan.
pub const PLAN_FREE: &str = "free";
/// The "hobby" plan.
pub const PLAN_HOBBY: &str = "hobby";
/// The "standard-1" plan.
pub const PLAN_STANDARD_1: &str = "standard-1";
/// The "standard-2" plan.
pub const PLAN_STANDARD_2: &str = "standard-2";

/// Regions accepted by the API.
pub const VALID_REGIONS: &[&str] = &[REGION_JP_TOKYO];

/// Plans accepted by the API.
pub const VALID_PLANS: &[&str] = &[PLAN_FREE, PLAN_HOBBY, PLAN_STANDARD_1, PLAN_STANDARD_2];

/// Region used when a request does not name one.
pub const DEFAULT_REGION: &str = REGION_JP_TOKYO;

/// Build a plan ID (`"<region>/<plan>"`) from a region and a plan name.
pub fn plan_id(region: &str, plan: &str) -> String {
    format!("{}/{}", region, plan)
}

/// Check whether `region` is a known region.
pub fn is_valid_region(region: &str) -> bool {
    VALID_REGIONS.contains(&region)
}

/// Check whether `plan` is a known plan.
pub fn is_valid_plan(plan: &str) -> bool {
    VALID_PLANS.contains(&plan)
}
