use chrono::TimeZone;

use super::*;

const PAGE: &str = "https://example.com/products";
const CHUNK: &str = "https://example.com/_next/static/chunks/x.js";

fn headers(pairs: &[(&str, &str)]) -> Headers {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn predict_now(url: &str, pairs: &[(&str, &str)]) -> CacheBehavior {
    predict_at(url, &headers(pairs), now())
}

#[test]
fn test_cdn_hit_outranks_no_store() {
    assert_eq!(
        predict_now(PAGE, &[("x-vercel-cache", "HIT"), ("cache-control", "no-store")]),
        CacheBehavior::Cached
    );
    assert_eq!(
        predict_now(PAGE, &[("CF-Cache-Status", "hit"), ("cache-control", "no-store")]),
        CacheBehavior::Cached
    );
}

#[test]
fn test_cdn_miss_is_not_a_hit() {
    assert_eq!(
        predict_now(PAGE, &[("x-vercel-cache", "MISS"), ("cache-control", "no-store")]),
        CacheBehavior::NoCache
    );
}

#[test]
fn test_immutable_static_asset() {
    assert_eq!(
        predict_now(CHUNK, &[("cache-control", "public, max-age=31536000, immutable")]),
        CacheBehavior::Cached
    );
}

#[test]
fn test_no_store() {
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "no-store")]),
        CacheBehavior::NoCache
    );
}

#[test]
fn test_validator_only() {
    assert_eq!(predict_now(PAGE, &[("etag", "\"abc\"")]), CacheBehavior::Validates);
    assert_eq!(
        predict_now(PAGE, &[("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT")]),
        CacheBehavior::Validates
    );
}

#[test]
fn test_no_signals() {
    assert_eq!(predict_now(PAGE, &[]), CacheBehavior::Unknown);
    assert_eq!(
        predict_now(PAGE, &[("content-type", "text/html")]),
        CacheBehavior::Unknown
    );
}

#[test]
fn test_prerender_stale_time_must_revalidate() {
    assert_eq!(
        predict_now(
            PAGE,
            &[
                ("x-nextjs-prerender", "1"),
                ("x-nextjs-stale-time", "300"),
                ("cache-control", "private, no-cache, no-store, max-age=0, must-revalidate"),
            ]
        ),
        CacheBehavior::Validates
    );
}

#[test]
fn test_prerender_without_must_revalidate_falls_through() {
    assert_eq!(
        predict_now(
            PAGE,
            &[
                ("x-nextjs-prerender", "1"),
                ("x-nextjs-stale-time", "300"),
                ("cache-control", "s-maxage=31536000"),
            ]
        ),
        CacheBehavior::Cached
    );
}

#[test]
fn test_age_rule() {
    assert_eq!(predict_now(PAGE, &[("age", "120")]), CacheBehavior::Cached);
    assert_eq!(
        predict_now(PAGE, &[("age", "120"), ("cache-control", "public, must-revalidate")]),
        CacheBehavior::Validates
    );
    assert_eq!(
        predict_now(PAGE, &[("age", "0"), ("cache-control", "no-store")]),
        CacheBehavior::NoCache
    );
}

#[test]
fn test_age_outranks_immutable_directive() {
    assert_eq!(
        predict_now(PAGE, &[("age", "5"), ("cache-control", "immutable, must-revalidate")]),
        CacheBehavior::Validates
    );
}

#[test]
fn test_malformed_age_is_ignored() {
    assert_eq!(
        predict_now(PAGE, &[("age", "soon"), ("cache-control", "no-store")]),
        CacheBehavior::NoCache
    );
}

#[test]
fn test_cache_control_directives() {
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "no-cache")]),
        CacheBehavior::Validates
    );
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "public, immutable")]),
        CacheBehavior::Cached
    );
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "max-age=60")]),
        CacheBehavior::Cached
    );
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "max-age=0"), ("etag", "W/\"1\"")]),
        CacheBehavior::Validates
    );
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "max-age=0")]),
        CacheBehavior::NoCache
    );
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "public, s-maxage=600")]),
        CacheBehavior::Cached
    );
}

#[test]
fn test_directives_are_case_insensitive() {
    assert_eq!(
        predict_now(PAGE, &[("Cache-Control", "No-Store")]),
        CacheBehavior::NoCache
    );
}

#[test]
fn test_malformed_max_age_continues_to_s_maxage() {
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "max-age=abc, s-maxage=10")]),
        CacheBehavior::Cached
    );
    assert_eq!(
        predict_now(PAGE, &[("cache-control", "max-age=abc"), ("etag", "\"x\"")]),
        CacheBehavior::Validates
    );
}

#[test]
fn test_static_asset_short_max_age_uses_directives() {
    // Not a one-year immutable asset, but the immutable directive still applies.
    assert_eq!(
        predict_now(CHUNK, &[("cache-control", "max-age=60, immutable")]),
        CacheBehavior::Cached
    );
}

#[test]
fn test_pragma_no_cache() {
    assert_eq!(
        predict_now(PAGE, &[("Pragma", "no-cache")]),
        CacheBehavior::Validates
    );
}

#[test]
fn test_expires() {
    assert_eq!(
        predict_now(PAGE, &[("expires", "Thu, 01 Jan 2026 00:00:00 GMT")]),
        CacheBehavior::Cached
    );
    assert_eq!(
        predict_now(PAGE, &[("expires", "Wed, 21 Oct 2015 07:28:00 GMT")]),
        CacheBehavior::NoCache
    );
    assert_eq!(
        predict_now(
            PAGE,
            &[("expires", "Wed, 21 Oct 2015 07:28:00 GMT"), ("etag", "\"v1\"")]
        ),
        CacheBehavior::Validates
    );
}

#[test]
fn test_expires_obsolete_date_forms() {
    assert_eq!(
        predict_now(PAGE, &[("expires", "Thursday, 15-Jan-26 00:00:00 GMT")]),
        CacheBehavior::Cached
    );
    assert_eq!(
        predict_now(PAGE, &[("expires", "Sunday, 06-Nov-94 08:49:37 GMT")]),
        CacheBehavior::NoCache
    );
    assert_eq!(
        predict_now(PAGE, &[("expires", "Thu Jan 15 00:00:00 2026")]),
        CacheBehavior::Cached
    );
    assert_eq!(
        predict_now(
            PAGE,
            &[("expires", "Wed Oct 21 07:28:00 2015"), ("etag", "\"v1\"")]
        ),
        CacheBehavior::Validates
    );
}

#[test]
fn test_parse_http_date_forms_agree() {
    let expected = Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap();
    for value in [
        "Sun, 06 Nov 1994 08:49:37 GMT",
        "Sunday, 06-Nov-94 08:49:37 GMT",
        "Sun Nov  6 08:49:37 1994",
    ] {
        assert_eq!(parse_http_date(value), Some(expected), "{value}");
    }
}

#[test]
fn test_unparseable_expires_falls_through() {
    assert_eq!(predict_now(PAGE, &[("expires", "0")]), CacheBehavior::Unknown);
    assert_eq!(
        predict_now(PAGE, &[("expires", "-1"), ("last-modified", "yesterday")]),
        CacheBehavior::Validates
    );
}

#[test]
fn test_predict_is_total() {
    let values = ["", "0", "-1", "abc", "HIT", "no-store", "max-age=", "=", ",,,"];
    let names = [
        "cache-control",
        "age",
        "expires",
        "pragma",
        "x-vercel-cache",
        "etag",
    ];
    for name in names {
        for value in values {
            let _ = predict(CHUNK, &headers(&[(name, value)]));
            let _ = predict(PAGE, &headers(&[(name, value)]));
        }
    }
}
