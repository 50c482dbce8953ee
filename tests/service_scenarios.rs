mod common;

use chrono::TimeDelta;
use shortlink::domain::repositories::UrlMappingRepository;
use shortlink::utils::base62;

#[tokio::test]
async fn test_shorten_resolve_and_count() {
    let ctx = common::create_test_context();
    let state = &ctx.state;

    let code = state
        .shorten_service
        .allocate("https://example.com/long".to_string(), None, None)
        .await
        .unwrap();

    for _ in 0..3 {
        let url = state.resolve_service.resolve(&code).await.unwrap();
        assert_eq!(url, "https://example.com/long");
    }

    let stats = state.resolve_service.get_stats(&code).await.unwrap();
    assert_eq!(stats.click_count, 3);
    assert_eq!(stats.created_at, common::start_time());
}

#[tokio::test]
async fn test_alias_taken_leaves_store_unchanged() {
    let ctx = common::create_test_context();
    let state = &ctx.state;

    state
        .shorten_service
        .allocate(
            "https://first.example".to_string(),
            Some("promo".to_string()),
            None,
        )
        .await
        .unwrap();

    let err = state
        .shorten_service
        .allocate(
            "https://second.example".to_string(),
            Some("promo".to_string()),
            None,
        )
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(ctx.repository.len(), 1);
    assert_eq!(
        state.resolve_service.resolve("promo").await.unwrap(),
        "https://first.example"
    );
}

#[tokio::test]
async fn test_expired_link_resolves_then_disappears() {
    let ctx = common::create_test_context();
    let state = &ctx.state;

    let code = state
        .shorten_service
        .allocate("https://example.com".to_string(), None, Some(24))
        .await
        .unwrap();

    ctx.clock.advance(TimeDelta::hours(23));
    assert!(state.resolve_service.resolve(&code).await.is_ok());

    ctx.clock.advance(TimeDelta::hours(2));
    let err = state.resolve_service.resolve(&code).await.unwrap_err();
    assert_eq!(err.to_error_info().code, "not_found");

    // Still stored until swept.
    assert_eq!(ctx.repository.len(), 1);
}

#[tokio::test]
async fn test_sweep_removes_only_expired() {
    let ctx = common::create_test_context();
    let state = &ctx.state;

    let short_lived = state
        .shorten_service
        .allocate("https://a.example".to_string(), None, Some(1))
        .await
        .unwrap();
    let long_lived = state
        .shorten_service
        .allocate("https://b.example".to_string(), None, Some(48))
        .await
        .unwrap();
    let permanent = state
        .shorten_service
        .allocate("https://c.example".to_string(), Some("keep".to_string()), None)
        .await
        .unwrap();

    ctx.clock.advance(TimeDelta::hours(2));

    let deleted = state.sweep_service.sweep_expired().await.unwrap();

    assert_eq!(deleted, 1);
    assert!(ctx.repository.find_by_code(&short_lived).await.unwrap().is_none());
    assert!(ctx.repository.find_by_code(&long_lived).await.unwrap().is_some());
    assert!(ctx.repository.find_by_code(&permanent).await.unwrap().is_some());

    assert_eq!(state.sweep_service.sweep_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn test_derived_code_skips_alias_collision() {
    let ctx = common::create_test_context();
    let state = &ctx.state;

    // Alias takes id 1 but claims the code that id 2 would derive.
    state
        .shorten_service
        .allocate("https://a.example".to_string(), Some("2".to_string()), None)
        .await
        .unwrap();

    let code = state
        .shorten_service
        .allocate("https://b.example".to_string(), None, None)
        .await
        .unwrap();

    assert_eq!(code, "3");
    assert_eq!(
        state.resolve_service.resolve("2").await.unwrap(),
        "https://a.example"
    );
    assert_eq!(
        state.resolve_service.resolve("3").await.unwrap(),
        "https://b.example"
    );
}

#[tokio::test]
async fn test_derived_codes_follow_ids() {
    let ctx = common::create_test_context();
    let state = &ctx.state;

    for expected_id in 1..=70u64 {
        let code = state
            .shorten_service
            .allocate(format!("https://example.com/{expected_id}"), None, None)
            .await
            .unwrap();

        assert_eq!(code, base62::encode(expected_id));
    }

    assert_eq!(base62::decode("14"), Some(66));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_count_every_click() {
    let ctx = common::create_test_context();

    let code = ctx
        .state
        .shorten_service
        .allocate("https://example.com".to_string(), None, None)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..50 {
        let service = ctx.state.resolve_service.clone();
        let code = code.clone();
        handles.push(tokio::spawn(async move {
            service.resolve(&code).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stats = ctx.state.resolve_service.get_stats(&code).await.unwrap();
    assert_eq!(stats.click_count, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_shortens_get_distinct_codes() {
    let ctx = common::create_test_context();

    let mut handles = Vec::new();
    for i in 0..40 {
        let service = ctx.state.shorten_service.clone();
        handles.push(tokio::spawn(async move {
            service
                .allocate(format!("https://example.com/{i}"), None, None)
                .await
                .unwrap()
        }));
    }

    let mut codes = Vec::new();
    for handle in handles {
        codes.push(handle.await.unwrap());
    }
    codes.sort();
    codes.dedup();

    assert_eq!(codes.len(), 40);
}
