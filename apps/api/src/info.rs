use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoveragePlan {
    pub plan_name: &'static str,
    pub description: &'static str,
}

const PLANS: [CoveragePlan; 2] = [
    CoveragePlan {
        plan_name: "Ontario Health Plan",
        description: "Covers basic healthcare.",
    },
    CoveragePlan {
        plan_name: "Extended Health Plan",
        description: "Covers additional services.",
    },
];

/// Static coverage plans shown on the public site.
pub async fn get_plans() -> Json<Vec<CoveragePlan>> {
    Json(PLANS.to_vec())
}

pub fn info_routes() -> Router {
    Router::new().route("/plans", get(get_plans))
}
