//! Cache behavior prediction.
//!
//! The prediction is an ordered decision list. Each rule either returns a
//! verdict or abstains; the first verdict wins and later rules are never
//! consulted. The order below is the contract:
//!
//! 1. CDN cache hit (`x-vercel-cache` / `cf-cache-status`)
//! 2. Immutable Next.js static asset with a max-age of at least one year
//! 3. Next.js prerender with stale-time and `must-revalidate`
//! 4. Positive `age`
//! 5. `cache-control` directives
//! 6. `pragma: no-cache`
//! 7. `expires`
//! 8. Validators (`etag` / `last-modified`)
//!
//! Anything left over is [`CacheBehavior::Unknown`]. Malformed numeric or
//! date values make their rule abstain.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::trace;

use crate::classifier::NEXT_STATIC_PATH;
use crate::headers::{Headers, NormalizedHeaders};
use crate::types::CacheBehavior;

const ONE_YEAR_SECS: i64 = 31_536_000;

/// Everything a rule may look at, computed once per prediction.
struct CacheInput<'a> {
    url: &'a str,
    headers: NormalizedHeaders,
    /// Lower-cased, trimmed `cache-control` directives.
    directives: Vec<String>,
    now: DateTime<Utc>,
}

impl CacheInput<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    fn has_directive(&self, name: &str) -> bool {
        self.directives.iter().any(|d| d == name)
    }

    fn must_revalidate(&self) -> bool {
        self.has_directive("must-revalidate")
    }

    /// Numeric value of `name=N`. `None` if absent or not a number.
    fn directive_value(&self, name: &str) -> Option<i64> {
        self.directives.iter().find_map(|d| {
            let (key, value) = d.split_once('=')?;
            if key.trim() != name {
                return None;
            }
            value.trim().trim_matches('"').parse::<i64>().ok()
        })
    }

    fn has_validator(&self) -> bool {
        self.headers.contains("etag") || self.headers.contains("last-modified")
    }
}

type Rule = fn(&CacheInput<'_>) -> Option<CacheBehavior>;

const RULES: &[(&str, Rule)] = &[
    ("cdn-hit", cdn_hit),
    ("immutable-static-asset", immutable_static_asset),
    ("prerender-stale-time", prerender_stale_time),
    ("age", age),
    ("cache-control", cache_control),
    ("pragma", pragma),
    ("expires", expires),
    ("validators", validators),
];

/// Predict how a response will be cached, using the current time for `expires`.
pub fn predict(url: &str, headers: &Headers) -> CacheBehavior {
    predict_at(url, headers, Utc::now())
}

/// Predict how a response will be cached relative to `now`.
pub fn predict_at(url: &str, headers: &Headers, now: DateTime<Utc>) -> CacheBehavior {
    let headers = NormalizedHeaders::new(headers);
    let directives = headers
        .get("cache-control")
        .map(|cc| {
            cc.split(',')
                .map(|d| d.trim().to_ascii_lowercase())
                .filter(|d| !d.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let input = CacheInput {
        url,
        headers,
        directives,
        now,
    };

    for (name, rule) in RULES {
        if let Some(behavior) = rule(&input) {
            trace!(url, rule = *name, %behavior, "cache rule matched");
            return behavior;
        }
    }
    CacheBehavior::Unknown
}

fn is_hit(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.trim().eq_ignore_ascii_case("HIT"))
}

fn cdn_hit(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    if is_hit(input.header("x-vercel-cache")) || is_hit(input.header("cf-cache-status")) {
        return Some(CacheBehavior::Cached);
    }
    None
}

fn immutable_static_asset(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    if !input.url.contains(NEXT_STATIC_PATH) || !input.has_directive("immutable") {
        return None;
    }
    match input.directive_value("max-age") {
        Some(max_age) if max_age >= ONE_YEAR_SECS => Some(CacheBehavior::Cached),
        _ => None,
    }
}

fn prerender_stale_time(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    let prerendered = input
        .header("x-nextjs-prerender")
        .is_some_and(|v| v.trim() == "1");
    if prerendered && input.header("x-nextjs-stale-time").is_some() && input.must_revalidate() {
        return Some(CacheBehavior::Validates);
    }
    None
}

fn age(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    let age = input.header("age")?.trim().parse::<i64>().ok()?;
    if age <= 0 {
        return None;
    }
    if input.must_revalidate() {
        Some(CacheBehavior::Validates)
    } else {
        Some(CacheBehavior::Cached)
    }
}

fn cache_control(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    if input.directives.is_empty() {
        return None;
    }
    if input.has_directive("no-store") {
        return Some(CacheBehavior::NoCache);
    }
    if input.has_directive("no-cache") {
        return Some(CacheBehavior::Validates);
    }
    if input.has_directive("immutable") {
        return Some(CacheBehavior::Cached);
    }
    match input.directive_value("max-age") {
        Some(n) if n > 0 => return Some(CacheBehavior::Cached),
        Some(0) if input.has_validator() => return Some(CacheBehavior::Validates),
        Some(0) => return Some(CacheBehavior::NoCache),
        _ => {}
    }
    match input.directive_value("s-maxage") {
        Some(n) if n > 0 => Some(CacheBehavior::Cached),
        _ => None,
    }
}

fn pragma(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    input
        .header("pragma")
        .filter(|p| p.to_ascii_lowercase().contains("no-cache"))
        .map(|_| CacheBehavior::Validates)
}

fn expires(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    let expires = parse_http_date(input.header("expires")?)?;
    if expires > input.now {
        Some(CacheBehavior::Cached)
    } else if input.has_validator() {
        Some(CacheBehavior::Validates)
    } else {
        Some(CacheBehavior::NoCache)
    }
}

fn validators(input: &CacheInput<'_>) -> Option<CacheBehavior> {
    input.has_validator().then_some(CacheBehavior::Validates)
}

/// Parse an HTTP-date (`Wed, 21 Oct 2015 07:28:00 GMT`) or one of its
/// obsolete forms.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    // Obsolete forms: RFC 850, then asctime.
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|date| date.and_utc())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
