//! Human-readable formatting for sizes, durations and analysis reports.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::{CacheBehavior, PageAnalysisResult};

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB", "TB", "PB"];

/// Format a byte count with binary units and one decimal, dropping a
/// trailing `.0` (`1536` → `1.5 KB`, `1024` → `1 KB`).
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{:.0} {}", rounded, SIZE_UNITS[unit])
    } else {
        format!("{:.1} {}", rounded, SIZE_UNITS[unit])
    }
}

/// Format milliseconds as `N ms` below one second, `N.NN s` above.
pub fn format_duration_ms(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn optional_ms(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_duration_ms)
}

/// Plain-text summary of an analysis result.
pub struct TextReport<'a>(pub &'a PageAnalysisResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "Reachable: {}", yes_no(result.is_reachable))?;
        writeln!(f, "Next.js:   {}", yes_no(result.is_next_js))?;
        writeln!(f, "RSC:       {}", yes_no(result.has_rsc))?;

        writeln!(f)?;
        writeln!(f, "Details:")?;
        for detail in &result.details {
            writeln!(f, "  - {}", detail)?;
        }

        let Some(analysis) = &result.analysis else {
            return Ok(());
        };

        writeln!(f)?;
        writeln!(f, "Performance ({}):", analysis.url)?;
        writeln!(f, "  TTFB  {}", optional_ms(analysis.metrics.ttfb))?;
        writeln!(f, "  FCP   {}", optional_ms(analysis.metrics.fcp))?;
        writeln!(f, "  LCP   {}", optional_ms(analysis.metrics.lcp))?;

        let mut by_type: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
        let mut by_cache: BTreeMap<&str, usize> = BTreeMap::new();
        for timing in &analysis.network_timeline {
            let entry = by_type.entry(timing.resource_type.as_str()).or_default();
            entry.0 += 1;
            entry.1 += timing.encoded_data_length.unwrap_or(0);
            *by_cache
                .entry(timing.predicted_cache_behavior.as_str())
                .or_default() += 1;
        }

        writeln!(f)?;
        writeln!(f, "Timeline ({} requests):", analysis.network_timeline.len())?;
        for (resource_type, (count, bytes)) in &by_type {
            writeln!(
                f,
                "  {:<12}{:>5}  {:>10}",
                resource_type,
                count,
                format_bytes(*bytes)
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Predicted caching:")?;
        for behavior in [
            CacheBehavior::Cached,
            CacheBehavior::Validates,
            CacheBehavior::NoCache,
            CacheBehavior::Unknown,
        ] {
            let count = by_cache.get(behavior.as_str()).copied().unwrap_or(0);
            writeln!(f, "  {:<12}{:>5}", behavior.as_str(), count)?;
        }

        writeln!(f)?;
        writeln!(f, "JavaScript chunks ({}):", analysis.js_chunks.len())?;
        for chunk in &analysis.js_chunks {
            writeln!(
                f,
                "  {:>10}  {:>9}  {}",
                format_bytes(chunk.size),
                format_duration_ms(chunk.load_time),
                chunk.url
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JsChunk, PerformanceMetrics, RscAnalysis};

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(500), "500 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration_ms(50.0), "50 ms");
        assert_eq!(format_duration_ms(1234.0), "1.23 s");
    }

    #[test]
    fn test_report_without_analysis() {
        let result = PageAnalysisResult {
            is_reachable: true,
            details: vec!["URL is reachable".to_string(), "Not a Next.js application".to_string()],
            ..Default::default()
        };
        let report = TextReport(&result).to_string();
        assert!(report.contains("Reachable: yes"));
        assert!(report.contains("Next.js:   no"));
        assert!(report.contains("  - Not a Next.js application"));
        assert!(!report.contains("Timeline"));
    }

    #[test]
    fn test_report_with_analysis() {
        let result = PageAnalysisResult {
            is_reachable: true,
            is_next_js: true,
            has_rsc: true,
            details: Vec::new(),
            analysis: Some(RscAnalysis {
                url: "https://example.com/".to_string(),
                metrics: PerformanceMetrics {
                    ttfb: Some(12.0),
                    fcp: None,
                    lcp: None,
                },
                network_timeline: Vec::new(),
                rsc_payloads: Vec::new(),
                js_chunks: vec![JsChunk {
                    url: "https://example.com/_next/static/chunks/main.js".to_string(),
                    size: 2048,
                    load_time: 75.0,
                }],
            }),
        };
        let report = TextReport(&result).to_string();
        assert!(report.contains("TTFB  12 ms"));
        assert!(report.contains("FCP   -"));
        assert!(report.contains("Timeline (0 requests):"));
        assert!(report.contains("JavaScript chunks (1):"));
        assert!(report.contains("2 KB"));
        assert!(report.contains("75 ms"));
    }
}
