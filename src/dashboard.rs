//! ==============================================================================
//! dashboard.rs - html rendering
//! ==============================================================================
//!
//! renders a store snapshot as a self-contained html page: current reading,
//! statistics, an inline svg line chart of the history and a table of the
//! latest readings. the page reloads itself every 5 seconds.
//!
//! ==============================================================================

use crate::domain::{Reading, Snapshot};

use std::fmt::Write;

/// how many rows the readings table shows (newest first)
pub const TABLE_ROWS: usize = 20;
pub const REFRESH_SECONDS: u32 = 5;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 160.0;

pub fn render(snapshot: &Snapshot) -> String {
    let headline = match snapshot.current {
        Some(r) => format!(
            r#"<h1>🌡️ Última temperatura: {}°C</h1>
    <p class="muted">recibida {}</p>"#,
            r.value,
            html_escape(&r.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        ),
        None => "<h1>Esperando datos...</h1>".to_string(),
    };

    let stats = &snapshot.statistics;
    let fmt_opt = |v: Option<f64>| v.map(|x| format!("{:.2}°C", x)).unwrap_or_else(|| "—".to_string());

    let mut rows = String::new();
    for r in snapshot.history.iter().rev().take(TABLE_ROWS) {
        let _ = writeln!(
            rows,
            "        <tr><td>{}</td><td>{:.2}°C</td></tr>",
            html_escape(&r.timestamp.format("%H:%M:%S").to_string()),
            r.value
        );
    }

    format!(
        r#"<!doctype html>
<html>
<head>
    <meta charset="utf-8">
    <meta http-equiv="refresh" content="{refresh}">
    <title>temperatura</title>
    <style>
        body {{ font-family: system-ui; padding: 2rem; background: #1a1a2e; color: #eee; }}
        .muted {{ color: #888; }}
        .stats span {{ display: inline-block; margin-right: 1.5rem; }}
        table {{ border-collapse: collapse; margin-top: 1rem; }}
        td, th {{ padding: 0.25rem 1rem; border-bottom: 1px solid #16213e; }}
        svg {{ background: #16213e; border-radius: 8px; }}
    </style>
</head>
<body>
    {headline}
    <div class="stats">
        <span>lecturas: {count}</span>
        <span>mín: {min}</span>
        <span>máx: {max}</span>
        <span>promedio: {avg}</span>
    </div>
    {chart}
    <table>
        <tr><th>hora</th><th>temperatura</th></tr>
{rows}    </table>
</body>
</html>"#,
        refresh = REFRESH_SECONDS,
        headline = headline,
        count = stats.count,
        min = fmt_opt(stats.min),
        max = fmt_opt(stats.max),
        avg = fmt_opt(stats.average),
        chart = render_chart(&snapshot.history),
        rows = rows,
    )
}

/// svg polyline scaled to the history's own min/max
fn render_chart(history: &[Reading]) -> String {
    if history.len() < 2 {
        return String::new();
    }

    let (lo, hi) = history
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r.value), hi.max(r.value)));
    // flat line when every value is equal
    let span = if hi > lo { hi - lo } else { 1.0 };
    let step = CHART_WIDTH / (history.len() - 1) as f64;

    let mut points = String::new();
    for (i, r) in history.iter().enumerate() {
        let x = i as f64 * step;
        let y = CHART_HEIGHT - (r.value - lo) / span * CHART_HEIGHT;
        let _ = write!(points, "{:.1},{:.1} ", x, y);
    }

    format!(
        r##"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}">
        <polyline fill="none" stroke="#ff6b6b" stroke-width="2" points="{points}"/>
    </svg>"##,
        w = CHART_WIDTH,
        h = CHART_HEIGHT,
        points = points.trim_end(),
    )
}

/// escape html special characters to prevent xss
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Statistics;
    use chrono::DateTime;

    fn reading(value: f64, secs: i64) -> Reading {
        Reading::new(value, DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap())
    }

    fn snapshot(values: &[f64]) -> Snapshot {
        let history: Vec<Reading> =
            values.iter().enumerate().map(|(i, v)| reading(*v, i as i64)).collect();
        Snapshot {
            current: history.last().copied(),
            statistics: Statistics::from_values(values.iter().copied()),
            history,
        }
    }

    #[test]
    fn test_waiting_page() {
        let html = render(&Snapshot::default());
        assert!(html.contains("Esperando datos..."));
        assert!(html.contains(r#"http-equiv="refresh" content="5""#));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn test_page_with_data() {
        let html = render(&snapshot(&[20.0, 22.5]));
        assert!(html.contains("Última temperatura: 22.5°C"));
        assert!(html.contains("promedio: 21.25°C"));
        assert!(html.contains("<polyline"));
        assert_eq!(html.matches("<td>").count(), 4);
    }

    #[test]
    fn test_headline_shows_full_value() {
        let html = render(&snapshot(&[45.231]));
        assert!(html.contains("Última temperatura: 45.231°C"));
    }

    #[test]
    fn test_table_is_capped() {
        let values: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let html = render(&snapshot(&values));
        assert_eq!(html.matches("<tr><td>").count(), TABLE_ROWS);
        assert!(html.contains("49.00°C"));
    }

    #[test]
    fn test_flat_chart() {
        let chart = render_chart(&[reading(21.0, 0), reading(21.0, 1)]);
        assert!(chart.contains("0.0,160.0 600.0,160.0"));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape(r#"<a href="x">&</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }
}
