// ABOUTME: HTTP-level tests for the USDA FoodData Central analyzer against a mock server
// ABOUTME: Search-then-details resolution, per-100g scaling, response caching, and recipe totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Nourishly
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::time::Duration;

use nourishly_core::errors::ProviderError;
use nourishly_core::models::AnalysisType;
use nourishly_providers::macros::usda::{UsdaAnalyzer, CACHE_CAPACITY_OPTION};
use nourishly_providers::{MacroAnalyzer, ProviderConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn analyzer(server: &MockServer) -> UsdaAnalyzer {
    UsdaAnalyzer::new(
        ProviderConfig::new("usda", Duration::ZERO)
            .with_api_key("usda-key")
            .with_base_url(server.uri()),
    )
}

fn details(calories: f64, protein: f64) -> Value {
    json!({
        "fdcId": 1,
        "description": "food",
        "foodNutrients": [
            { "nutrient": { "id": 1008, "name": "Energy" }, "amount": calories },
            { "nutrient": { "id": 1003, "name": "Protein" }, "amount": protein },
            { "nutrient": { "id": 1089, "name": "Iron" }, "amount": 1.2 }
        ]
    })
}

async fn mount_food(server: &MockServer, query: &str, fdc_id: u64, description: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .and(query_param("query", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [{ "fdcId": fdc_id, "description": description, "dataType": "Foundation" }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/food/{fdc_id}")))
        .and(query_param("api_key", "usda-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn close(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-6)
}

#[tokio::test]
async fn test_ingredient_is_scaled_from_per_100g_values() {
    let server = MockServer::start().await;
    mount_food(&server, "apple", 171_688, "Apples, raw", details(52.0, 0.3)).await;

    let report = analyzer(&server)
        .analyze_ingredient("apple", 150.0)
        .await
        .unwrap();

    assert_eq!(report.analysis_type, AnalysisType::Ingredient);
    assert_eq!(report.provider, "usda");
    assert_eq!(report.serving_size_g, Some(150.0));
    assert!(close(report.macros.calories, 78.0));
    assert!(close(report.macros.protein, 0.45));
    assert!(report.macros.fat.is_none());
    assert!((report.confidence - 0.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_repeated_lookups_are_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [{ "fdcId": 7, "description": "Rice, white, cooked" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/food/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(details(130.0, 2.7)))
        .expect(1)
        .mount(&server)
        .await;

    let usda = analyzer(&server);
    let first = usda.analyze_ingredient("rice", 100.0).await.unwrap();
    let second = usda.analyze_ingredient("Rice", 200.0).await.unwrap();

    assert!(close(first.macros.calories, 130.0));
    assert!(close(second.macros.calories, 260.0));
}

#[tokio::test]
async fn test_full_cache_evicts_least_recently_used_food() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .and(query_param("query", "rice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [{ "fdcId": 7, "description": "Rice, white, cooked" }]
        })))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .and(query_param("query", "beans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [{ "fdcId": 8, "description": "Beans, black, cooked" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let usda = UsdaAnalyzer::new(
        ProviderConfig::new("usda", Duration::ZERO)
            .with_api_key("usda-key")
            .with_base_url(server.uri())
            .with_option(CACHE_CAPACITY_OPTION, "1"),
    );

    usda.search("rice", 1).await.unwrap();
    usda.search("beans", 1).await.unwrap();
    let again = usda.search("rice", 1).await.unwrap();

    assert_eq!(again[0].fdc_id, 7);
}

#[tokio::test]
async fn test_no_search_hit_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "foods": [] })))
        .mount(&server)
        .await;

    let err = analyzer(&server)
        .analyze_ingredient("unobtainium", 100.0)
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::NotFound { .. }));
}

#[tokio::test]
async fn test_missing_details_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/food/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = analyzer(&server).food_details(404).await.unwrap_err();

    assert!(matches!(err, ProviderError::NotFound { .. }));
}

#[tokio::test]
async fn test_recipe_estimates_weights_and_skips_unknown_foods() {
    let server = MockServer::start().await;
    mount_food(&server, "eggs", 1, "Egg, whole, raw", details(143.0, 12.6)).await;
    mount_food(&server, "rice", 2, "Rice, white, raw", details(130.0, 2.7)).await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .and(query_param("query", "unicorn dust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "foods": [] })))
        .mount(&server)
        .await;

    let report = analyzer(&server)
        .analyze_recipe("2 eggs\n1 cup rice\n3 oz unicorn dust", Some(4))
        .await
        .unwrap();

    assert_eq!(report.analysis_type, AnalysisType::Recipe);
    assert_eq!(report.food_name, "2 eggs");
    assert_eq!(report.ingredients.len(), 2);
    assert_eq!(report.ingredients[0].food_name, "Egg, whole, raw");
    assert!(close(report.ingredients[0].weight_g, 100.0));
    assert!(close(report.ingredients[1].weight_g, 184.8));
    assert!(close(report.macros.calories, 143.0 + 130.0 * 1.848));
    assert_eq!(report.servings, Some(4));
    assert!((report.confidence - 0.9).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_recipe_with_assumed_weights_has_lower_confidence() {
    let server = MockServer::start().await;
    mount_food(&server, "salt", 3, "Salt, table", details(0.0, 0.0)).await;

    let report = analyzer(&server)
        .analyze_recipe("salt", None)
        .await
        .unwrap();

    assert!(close(report.ingredients[0].weight_g, 100.0));
    assert!((report.confidence - 0.6).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_search_foods_returns_descriptions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/foods/search"))
        .and(query_param("pageSize", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "foods": [
                { "fdcId": 1, "description": "Cheddar cheese" },
                { "fdcId": 2, "description": "Swiss cheese" }
            ]
        })))
        .mount(&server)
        .await;

    let names = analyzer(&server).search_foods("cheese", 2).await.unwrap();

    assert_eq!(names, vec!["Cheddar cheese", "Swiss cheese"]);
}

#[test]
fn test_normalize_reads_both_nutrient_layouts() {
    let usda = UsdaAnalyzer::new(ProviderConfig::new("usda", Duration::ZERO));

    let from_details = usda.normalize(&details(89.0, 1.1)).unwrap();
    let from_search = usda
        .normalize(&json!({
            "foodNutrients": [
                { "nutrientId": 1008, "value": 89.0 },
                { "nutrientId": 1004, "value": 0.3 }
            ]
        }))
        .unwrap();

    assert_eq!(from_details.calories, Some(89.0));
    assert_eq!(from_search.calories, Some(89.0));
    assert_eq!(from_search.fat, Some(0.3));
    assert!(usda.normalize(&json!({ "foodNutrients": [] })).is_err());
    assert!(usda.normalize(&json!({})).is_err());
}
