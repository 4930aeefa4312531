use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;

use course_recommender::{
    api::{create_router, AppState, Limits},
    models::{AssociationRule, Course},
    services::{RecommendationEngine, RuleTable},
    sources::Catalog,
};

fn course(title: &str, category: &str, skills: &str, intro: &str) -> Course {
    Course {
        title: title.to_string(),
        category: category.to_string(),
        skills: skills.to_string(),
        short_intro: intro.to_string(),
        duration: "4 weeks".to_string(),
        url: format!("https://courses.example/{}", title.to_lowercase().replace(' ', "-")),
        ..Default::default()
    }
}

fn create_engine(with_rules: bool) -> RecommendationEngine {
    let catalog = Catalog::new(vec![
        course("Python Basics", "Data", "python, programming", "Start coding in python"),
        course("Pandas Workshop", "Data", "python, pandas", "Tabular data in python"),
        course("SQL Essentials", "Data", "sql, databases", "Query relational databases"),
        course("Watercolor", "Art", "painting", "Paint with water based colors"),
        course("Digital Sketching", "Art", "drawing, painting", "Sketch on a tablet"),
    ]);
    let rules = with_rules.then(|| {
        RuleTable::load(vec![
            AssociationRule::new(["python"], ["pandas"]),
            AssociationRule::new(["sql"], ["python"]),
        ])
    });
    RecommendationEngine::new(catalog, rules)
}

fn create_test_server(with_rules: bool) -> TestServer {
    let state = AppState::with_engine(create_engine(with_rules), Limits::default());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn titles(body: &Value) -> Vec<String> {
    body["courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["Title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server(true);
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_categories_start_with_all() {
    let server = create_test_server(true);
    let response = server.get("/api/v1/categories").await;
    response.assert_status_ok();
    let categories: Vec<String> = response.json();
    assert_eq!(categories, vec!["All", "Data", "Art"]);
}

#[tokio::test]
async fn test_course_titles_by_category() {
    let server = create_test_server(true);

    let response = server
        .get("/api/v1/courses")
        .add_query_param("category", "Art")
        .await;
    response.assert_status_ok();
    let titles: Vec<String> = response.json();
    assert_eq!(titles, vec!["Watercolor", "Digital Sketching"]);

    let all: Vec<String> = server.get("/api/v1/courses").await.json();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn test_content_recommendations() {
    let server = create_test_server(true);

    let response = server
        .get("/api/v1/recommendations/content")
        .add_query_param("title", "Python Basics")
        .add_query_param("top_n", 2)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["strategy"], "content");
    let titles = titles(&body);
    assert_eq!(titles.len(), 2);
    assert_eq!(titles[0], "Pandas Workshop");
    assert!(!titles.contains(&"Python Basics".to_string()));

    let first = &body["courses"][0];
    assert_eq!(first["Sub-Category"], "");
    assert_eq!(first["Duration"], "4 weeks");
    assert!(first.get("Rating").is_none());
}

#[tokio::test]
async fn test_content_recommendations_outside_category_is_not_found() {
    let server = create_test_server(true);

    let response = server
        .get("/api/v1/recommendations/content")
        .add_query_param("title", "Python Basics")
        .add_query_param("category", "Art")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Course not found in category 'Art': Python Basics"
    );
}

#[tokio::test]
async fn test_invalid_top_n_is_rejected() {
    let server = create_test_server(true);

    for top_n in [0, 11] {
        let response = server
            .get("/api/v1/recommendations/content")
            .add_query_param("title", "Python Basics")
            .add_query_param("top_n", top_n)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_rule_recommendations() {
    let server = create_test_server(true);

    let response = server
        .get("/api/v1/recommendations/rules")
        .add_query_param("title", "SQL Essentials")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["strategy"], "association_rules");
    // sql => python, catalog order
    assert_eq!(titles(&body), vec!["Python Basics", "Pandas Workshop"]);
}

#[tokio::test]
async fn test_rule_recommendations_fall_back_to_category_browse() {
    let server = create_test_server(true);

    let response = server
        .get("/api/v1/recommendations/rules")
        .add_query_param("title", "Watercolor")
        .add_query_param("category", "Art")
        .add_query_param("top_n", 1)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["strategy"], "category_browse");
    assert_eq!(titles(&body), vec!["Watercolor"]);
}

#[tokio::test]
async fn test_rule_recommendations_without_fallback_can_be_empty() {
    let server = create_test_server(true);

    let response = server
        .get("/api/v1/recommendations/rules")
        .add_query_param("title", "Watercolor")
        .add_query_param("fallback", false)
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["strategy"], "association_rules");
    assert!(titles(&body).is_empty());
}

#[tokio::test]
async fn test_rule_recommendations_errors() {
    let server = create_test_server(true);
    let response = server
        .get("/api/v1/recommendations/rules")
        .add_query_param("title", "Unknown Course")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let without_rules = create_test_server(false);
    let response = without_rules
        .get("/api/v1/recommendations/rules")
        .add_query_param("title", "Python Basics")
        .await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["error"], "Association rules not loaded");
}
