//! Execution plans from an external quote/router backend
//!
//! An external router responds to a quote request with zero or more candidate
//! plans, each a sequence of pre-built transaction steps. The first valid
//! candidate is authoritative: error-free, amounts populated, at least one
//! step.

use alloy_primitives::{Address, Bytes, U256};
use serde::Deserialize;

/// One pre-built transaction step of a candidate plan.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    /// Step kind as named by the router, e.g. `"approve"` or `"bridge"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub to: Address,
    pub data: Bytes,
    #[serde(default)]
    pub value: Option<U256>,
}

/// One candidate execution plan returned by the router.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub src_amount: Option<String>,
    #[serde(default)]
    pub dst_amount: Option<String>,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

impl ExecutionPlan {
    /// Error-free, amount-populated, and executable.
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
            && self.src_amount.is_some()
            && self.dst_amount.is_some()
            && !self.steps.is_empty()
    }
}

/// Picks the authoritative plan from the router's candidates: the first valid
/// one, in the order the router returned them.
pub fn select_plan(plans: &[ExecutionPlan]) -> Option<&ExecutionPlan> {
    plans.iter().find(|p| p.is_valid())
}
