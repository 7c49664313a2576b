//! Integration tests for the gift scoring engine
//!
//! These run whole searches through the public API: catalogs on disk, JSON
//! queries, TOML configs and shared feedback.

use gifteez_engine::models::TrendingBadge;
use gifteez_engine::{
    config, CatalogSource, Dimension, FeedbackAdapter, FeedbackEntry, FileCatalog, Gift,
    GiftEngine, GiftQuery, InMemoryCatalog, SortBy,
};
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {
        "productName": "Romantisch fotoboek",
        "description": "Persoonlijk fotoboek voor koppels",
        "priceRange": "€35",
        "tags": ["valentijn"],
        "rating": 4.6,
        "reviewCount": 230,
        "retailers": [{"name": "Bol.com", "affiliateLink": "https://www.bol.com/fotoboek"}]
    },
    {
        "productName": "Gaming muis",
        "description": "Draadloze gaming muis met RGB",
        "priceRange": "€45",
        "category": "Tech",
        "rating": 4.2,
        "reviewCount": 80
    },
    {
        "productName": "Bamboe lunchbox",
        "description": "Duurzame lunchbox",
        "priceRange": "€20",
        "sustainability": true
    },
    {
        "productName": "Designer horloge",
        "description": "Luxe horloge",
        "priceRange": "€300"
    }
]"#;

const VALENTINE_QUERY: &str = r#"{
    "recipient": "partner",
    "budgetMin": 30,
    "budgetMax": 50,
    "occasion": "Valentijnsdag",
    "interests": "fotografie, gaming"
}"#;

fn write_catalog(dir: &TempDir) -> FileCatalog {
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, CATALOG).unwrap();
    FileCatalog::new(path)
}

/// Test a full search from files on disk
#[tokio::test]
async fn test_valentine_search_from_file_catalog() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write_catalog(&temp_dir);
    let query: GiftQuery = serde_json::from_str(VALENTINE_QUERY).unwrap();
    assert_eq!(query.interests, vec!["fotografie", "gaming"]);

    let engine = GiftEngine::default();
    let results = engine
        .search_source(&catalog, &query, SortBy::Relevance)
        .await
        .unwrap();

    // The watch is over budget, the lunchbox under it
    let names: Vec<_> = results.iter().map(|r| r.gift.product_name.as_str()).collect();
    assert_eq!(names, vec!["Romantisch fotoboek", "Gaming muis"]);

    let top = &results[0];
    assert!((top.score.occasion_fit - 1.0).abs() < 1e-10);
    assert_eq!(top.score.explanations.len(), 2);
    assert_eq!(top.match_reason, "Romantisch cadeau perfect voor Valentijnsdag");
    assert_eq!(top.trending_badge, Some(TrendingBadge::TopRated));
    assert!(top.labels.contains(&Dimension::Romantic));
    assert!(top.score.total_score > results[1].score.total_score);
}

/// Test the JSON shape of search output
#[tokio::test]
async fn test_output_serializes_in_camel_case() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = write_catalog(&temp_dir);
    let query: GiftQuery = serde_json::from_str(VALENTINE_QUERY).unwrap();

    let results = GiftEngine::default()
        .search_source(&catalog, &query, SortBy::Relevance)
        .await
        .unwrap();
    let json = serde_json::to_value(&results).unwrap();

    let first = &json[0];
    assert_eq!(first["productName"], "Romantisch fotoboek");
    assert!(first["totalScore"].is_number());
    assert!(first["budgetFit"].is_number());
    assert!(first["relevanceScore"].is_number());
    assert_eq!(first["trendingBadge"], "top-rated");
    assert_eq!(first["labels"][0], "romantic");
    assert!(first["matchReason"].is_string());
}

/// Test that every score stays in range over a mixed catalog
#[tokio::test]
async fn test_score_bounds_over_catalog() {
    let catalog = InMemoryCatalog::new(vec![
        Gift::new("Smart watch", "Luxe tech gadget", "€250-€400"),
        Gift::new("Yoga mat", "Biologisch katoen, duurzaam", "€39,99"),
        Gift::new("Kookworkshop", "Samen koken beleving", "€75"),
        Gift::new("Grappige mok", "", "€9"),
        Gift::new("Cadeaubon", "", "Prijs op aanvraag"),
    ]);
    let gifts = catalog.load_catalog().await.unwrap();

    let engine = GiftEngine::default();
    let queries = [
        GiftQuery::default(),
        GiftQuery::new("partner", 20.0, 80.0, "jubileum").with_interests(["koken", "reizen"]),
        GiftQuery::new("kind", 5.0, 15.0, "verjaardag"),
        GiftQuery::new("collega", 0.0, 0.0, "kerst").with_interests(["tech"]),
    ];

    for query in &queries {
        for result in engine.search(&gifts, query, SortBy::Relevance) {
            let score = &result.score;
            for value in [
                score.total_score,
                score.budget_fit,
                score.occasion_fit,
                score.persona_fit,
                score.trend_score,
            ] {
                assert!((0.0..=1.0).contains(&value), "{} out of range for {}", value, result.gift.product_name);
            }
            assert!(score.explanations.len() <= 2);
            assert!(!result.match_reason.is_empty());
        }
    }
}

/// Test loading a TOML config that changes the weights
#[test]
fn test_config_changes_weights() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("engine.toml");
    std::fs::write(
        &path,
        "[weights]\nbudget_fit = 1.0\noccasion_fit = 0.0\npersona_fit = 0.0\ntrend_score = 0.0\n",
    )
    .unwrap();

    let engine_config = config::load(&path).unwrap();
    let engine = GiftEngine::new(engine_config, FeedbackAdapter::shared());

    let gifts = vec![
        Gift::new("Agenda", "", "€30"),
        Gift::new("Pen", "", "€45"),
        Gift::new("Tas", "", "€58"),
    ];
    let query = GiftQuery::new("", 30.0, 50.0, "");
    let results = engine.search(&gifts, &query, SortBy::Relevance);

    assert_eq!(results.len(), 3);
    for result in &results {
        assert!((result.score.total_score - result.score.budget_fit).abs() < 1e-10);
    }
    assert_eq!(results[0].gift.product_name, "Pen");
    assert_eq!(results[2].gift.product_name, "Tas");
}

/// Test that sorting by price is ascending and keeps ties stable
#[test]
fn test_sort_by_price() {
    let gifts = vec![
        Gift::new("Duur", "", "€90"),
        Gift::new("Goedkoop", "", "€10"),
        Gift::new("Midden A", "", "€40"),
        Gift::new("Midden B", "", "€30-€50"),
    ];
    let results = GiftEngine::default().search(&gifts, &GiftQuery::default(), SortBy::Price);

    let names: Vec<_> = results.iter().map(|r| r.gift.product_name.as_str()).collect();
    assert_eq!(names, vec!["Goedkoop", "Midden A", "Midden B", "Duur"]);
}

/// Test that engines sharing an adapter see each other's feedback
#[test]
fn test_shared_feedback_between_engines() {
    let feedback = FeedbackAdapter::shared();
    let first = GiftEngine::new(Default::default(), feedback.clone());
    let second = GiftEngine::new(Default::default(), feedback.clone());

    let gifts = vec![
        Gift::new("Gewone sokken", "", "€15"),
        Gift::new("Sport sokken", "", "€15"),
    ];
    let query = GiftQuery::new("", 10.0, 20.0, "");

    let before = second.search(&gifts, &query, SortBy::Relevance);
    assert_eq!(before[0].gift.product_name, "Gewone sokken");

    for _ in 0..3 {
        first
            .submit_feedback(FeedbackEntry::new("Meer sport cadeaus"))
            .unwrap();
    }
    assert_eq!(feedback.read().unwrap().keyword_weights().get("sport"), Some(&3));

    let after = second.search(&gifts, &query, SortBy::Relevance);
    assert_eq!(after[0].gift.product_name, "Sport sokken");
    assert!((after[0].relevance_score - after[1].relevance_score - 0.9).abs() < 1e-10);
}

/// Test that an empty catalog file yields no results rather than an error
#[tokio::test]
async fn test_empty_catalog_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.json");
    std::fs::write(&path, "[]").unwrap();

    let query: GiftQuery = serde_json::from_str(VALENTINE_QUERY).unwrap();
    let results = GiftEngine::default()
        .search_source(&FileCatalog::new(path), &query, SortBy::Rating)
        .await
        .unwrap();
    assert!(results.is_empty());
}
