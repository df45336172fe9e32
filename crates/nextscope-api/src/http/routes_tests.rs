
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use nextscope_analyzer::{AnalyzerConfig, AnalyzerError, PageAnalyzer, PageProvider, TrackedPage};
    use serde_json::Value;
    use tower::ServiceExt;

    /// Provider without a browser behind it.
    #[derive(Default)]
    struct UnavailableProvider {
        acquired: AtomicUsize,
    }

    #[async_trait]
    impl PageProvider for UnavailableProvider {
        async fn acquire_page(&self) -> Result<Arc<dyn TrackedPage>, AnalyzerError> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Err(AnalyzerError::PageUnavailable("no browser".to_string()))
        }

        async fn release_page(&self, _page: Arc<dyn TrackedPage>) {}
    }

    fn create_test_router() -> (Router, Arc<UnavailableProvider>) {
        let provider = Arc::new(UnavailableProvider::default());
        let analyzer = PageAnalyzer::new(provider.clone(), AnalyzerConfig::default());
        let state = Arc::new(AppState::new(Arc::new(analyzer)));
        (create_router(state), provider)
    }

    fn analyze_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = create_test_router();
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_analyze_rejects_invalid_url() {
        let (app, provider) = create_test_router();
        let response = app
            .oneshot(analyze_request(serde_json::json!({"url": "ftp://example.com"})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Invalid URL provided");
        assert!(body["details"].as_str().unwrap().contains("ftp"));
        assert_eq!(provider.acquired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_unreachable_is_still_ok() {
        let (app, provider) = create_test_router();
        let response = app
            .oneshot(analyze_request(
                serde_json::json!({"url": "example.com", "forceFresh": true}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["isReachable"], false);
        assert_eq!(body["isNextJs"], false);
        assert_eq!(body["hasRSC"], false);
        assert_eq!(body["details"][0], "Error: Page unavailable: no browser");
        assert!(body.get("analysis").is_none());
        assert_eq!(provider.acquired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_rejects_missing_url() {
        let (app, provider) = create_test_router();
        let response = app
            .oneshot(analyze_request(serde_json::json!({"forceFresh": false})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Invalid URL provided");
        assert!(body["details"].as_str().unwrap().contains("url"));
        assert_eq!(provider.acquired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_string_url() {
        let (app, provider) = create_test_router();
        let response = app
            .oneshot(analyze_request(serde_json::json!({"url": 42})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Invalid URL provided");
        assert_eq!(provider.acquired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_analyze_rejects_malformed_json() {
        let (app, _) = create_test_router();
        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from("{\"url\": "))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid URL provided");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (app, _) = create_test_router();
        let response = app
            .oneshot(Request::builder().uri("/api/unknown").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
