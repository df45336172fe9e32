
    use super::*;

    #[test]
    fn test_analyze_request_deserialize() {
        let json = r#"{"url": "https://example.com", "forceFresh": true}"#;
        let req: AnalyzeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.url, "https://example.com");
        assert!(req.force_fresh);
    }

    #[test]
    fn test_analyze_request_force_fresh_defaults_off() {
        let req: AnalyzeRequest = serde_json::from_str(r#"{"url": "example.com"}"#).unwrap();
        assert!(!req.force_fresh);
    }

    #[test]
    fn test_validate_url_accepts_http_and_https() {
        assert_eq!(
            validate_url("https://example.com/page").unwrap(),
            "https://example.com/page"
        );
        assert_eq!(validate_url("http://localhost:3000").unwrap(), "http://localhost:3000/");
    }

    #[test]
    fn test_validate_url_defaults_scheme() {
        assert_eq!(validate_url("  vercel.com ").unwrap(), "https://vercel.com/");
    }

    #[test]
    fn test_validate_url_rejects_other_schemes() {
        assert!(matches!(
            validate_url("ftp://example.com/file"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(validate_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_validate_url_rejects_garbage() {
        assert!(validate_url("").is_err());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("https://").is_err());
    }
