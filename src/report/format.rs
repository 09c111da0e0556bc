//! Summary renderings: one structured, one for humans.

use crate::domain::summary::RunSummary;

/// Plain text block for logs and the console.
#[must_use]
pub fn format_summary_text(s: &RunSummary) -> String {
    let run_short = s.run_id.get(..8).unwrap_or(&s.run_id);
    let mut lines = vec![
        format!("=== Scan Complete ({}) | Run {} ===", s.mode, run_short),
        format!(
            "Scanned: {} cities, {} events, {} buckets",
            s.cities_scanned, s.events_found, s.buckets_analyzed
        ),
        format!(
            "Opportunities: {} found, {} blocked{}",
            s.opportunities_found,
            s.blocked_count,
            block_detail(s)
        ),
        format!(
            "Orders: {} attempted, {} succeeded, {} failed",
            s.orders_attempted, s.orders_succeeded, s.orders_failed
        ),
    ];
    if s.best_edge > 0.0 {
        lines.push(format!("Best edge: +{:.3} ({})", s.best_edge, s.best_edge_label));
    }
    lines.push(format!(
        "Exposure: ${:.2} | Daily P&L: ${:+.2}",
        s.total_exposure_usd, s.daily_pnl_usd
    ));
    if !s.errors.is_empty() {
        lines.push(format!("Errors: {}", s.errors.join("; ")));
    }
    lines.push(format!("Duration: {:.1}s", s.duration_seconds));
    lines.join("\n")
}

fn block_detail(s: &RunSummary) -> String {
    if s.blocked_count == 0 {
        return String::new();
    }
    let reasons: Vec<String> = s
        .block_reasons
        .iter()
        .map(|(reason, count)| format!("{count} {reason}"))
        .collect();
    format!(" ({})", reasons.join(", "))
}

/// JSON rendering for programmatic consumers.
pub fn format_summary_json(s: &RunSummary) -> crate::error::Result<String> {
    Ok(serde_json::to_string_pretty(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_summary_includes_counters_and_mode() {
        let mut s = RunSummary::new("0123456789abcdef", "dry-run");
        s.cities_scanned = 5;
        s.events_found = 3;
        s.buckets_analyzed = 21;
        s.opportunities_found = 1;
        s.blocked_count = 1;
        s.block_reasons.insert("COOLDOWN".to_string(), 1);
        s.orders_attempted = 1;
        s.orders_succeeded = 1;
        s.best_edge = 0.156;
        s.best_edge_label = "nyc 36-37 $0.075".to_string();
        s.total_exposure_usd = 5.0;
        s.duration_seconds = 12.3;

        let text = format_summary_text(&s);
        assert!(text.contains("dry-run"));
        assert!(text.contains("Run 01234567"));
        assert!(text.contains("5 cities, 3 events, 21 buckets"));
        assert!(text.contains("1 blocked (1 COOLDOWN)"));
        assert!(text.contains("Best edge: +0.156"));
        assert!(text.contains("Exposure: $5.00"));
    }

    #[test]
    fn errors_are_rendered_when_present() {
        let mut s = RunSummary::new("r", "dry-run");
        s.errors.push("api down".to_string());
        let text = format_summary_text(&s);
        assert!(text.contains("Errors: api down"));
    }

    #[test]
    fn json_summary_parses_back() {
        let s = RunSummary::new("r", "live");
        let json = format_summary_json(&s).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["mode"], "live");
    }
}
