use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::{CategoryFilter, CourseRecord, ALL_CATEGORIES},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub title: String,
    pub top_n: Option<usize>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RuleRecommendQuery {
    pub title: String,
    pub top_n: Option<usize>,
    pub category: Option<String>,
    /// Substitute a category browse list when no rule matches
    #[serde(default = "default_fallback")]
    pub fallback: bool,
}

fn default_fallback() -> bool {
    true
}

/// Which strategy produced the courses
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Content,
    AssociationRules,
    CategoryBrowse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub strategy: Strategy,
    pub courses: Vec<CourseRecord>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Category choices, "All" first
pub async fn get_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let engine = state.engine().await?;
    let categories = std::iter::once(ALL_CATEGORIES.to_string())
        .chain(engine.categories().into_iter().map(str::to_string))
        .collect();
    Ok(Json(categories))
}

/// Course titles available for selection in a category
pub async fn get_course_titles(
    State(state): State<AppState>,
    Query(params): Query<CategoryQuery>,
) -> AppResult<Json<Vec<String>>> {
    let engine = state.engine().await?;
    let filter = CategoryFilter::from_param(params.category.as_deref());
    let titles = engine
        .titles_in(&filter)
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Json(titles))
}

/// Content-similarity recommendations
pub async fn recommend_content(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let top_n = state.limits().resolve(params.top_n)?;
    let filter = CategoryFilter::from_param(params.category.as_deref());

    tracing::info!(
        title = %params.title,
        top_n,
        category = ?filter,
        "Processing content recommendation request"
    );

    let engine = state.engine().await?;
    let courses = engine.recommend(&params.title, top_n, &filter)?;

    Ok(Json(RecommendationResponse {
        strategy: Strategy::Content,
        courses,
    }))
}

/// Rule-expansion recommendations, with the category browse fallback
pub async fn recommend_rules(
    State(state): State<AppState>,
    Query(params): Query<RuleRecommendQuery>,
) -> AppResult<Json<RecommendationResponse>> {
    let top_n = state.limits().resolve(params.top_n)?;
    let filter = CategoryFilter::from_param(params.category.as_deref());

    tracing::info!(
        title = %params.title,
        top_n,
        category = ?filter,
        fallback = params.fallback,
        "Processing rule recommendation request"
    );

    let engine = state.engine().await?;
    let courses = engine.recommend_with_apriori(&params.title, top_n, &filter)?;

    if courses.is_empty() && params.fallback {
        tracing::info!(title = %params.title, "No rule matches, falling back to category browse");
        return Ok(Json(RecommendationResponse {
            strategy: Strategy::CategoryBrowse,
            courses: engine.browse(top_n, &filter),
        }));
    }

    Ok(Json(RecommendationResponse {
        strategy: Strategy::AssociationRules,
        courses,
    }))
}
