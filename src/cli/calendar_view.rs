use crate::domain::{CalendarColor, CalendarReport, ColoredItem, DayBucket, FetchStage};

use super::output::{format_amount, paint};

const MARKER: &str = "●";

/// One line per calendar cell: marker, date, color, count and amounts.
pub fn day_line(bucket: &DayBucket, currency: &str) -> String {
    let tags: Vec<&str> = bucket.type_tags.iter().map(|tag| tag.label()).collect();
    format!(
        "{} {}  {}  {} item(s)  total {}  paid {}  remaining {}  [{}]",
        paint(bucket.color, MARKER),
        bucket.key(),
        paint(bucket.color, &format!("{:<6}", bucket.color.label())),
        bucket.count,
        format_amount(bucket.total_amount, currency),
        format_amount(bucket.paid_amount, currency),
        format_amount(bucket.remaining_amount, currency),
        tags.join(", ")
    )
}

pub fn item_line(entry: &ColoredItem, currency: &str) -> String {
    let owner = entry.display_name.as_deref().unwrap_or("(unknown owner)");
    format!(
        "    {} {} ({} {} #{})  {}  [{}]",
        paint(entry.color, MARKER),
        owner,
        entry.parent.kind.label(),
        entry.parent.id,
        entry.item.index + 1,
        format_amount(entry.item.amount, currency),
        entry.item.status.label()
    )
}

/// Full textual rendering of a calendar report.
pub fn render(report: &CalendarReport, currency: &str, with_items: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if report.days.is_empty() {
        lines.push(format!("No items due in {}.", report.month.label()));
    }
    for bucket in &report.days {
        lines.push(day_line(bucket, currency));
        if with_items {
            lines.extend(bucket.items.iter().map(|entry| item_line(entry, currency)));
        }
    }
    lines
}

/// Human-readable form of each recovered per-parent failure.
pub fn diagnostic_lines(report: &CalendarReport) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .map(|diagnostic| {
            let stage = match diagnostic.stage {
                FetchStage::Items => "items unavailable",
                FetchStage::DisplayName => "owner name unavailable",
            };
            format!(
                "{} {}: {} ({})",
                diagnostic.parent_kind.label(),
                diagnostic.parent_id,
                stage,
                diagnostic.message
            )
        })
        .collect()
}

pub fn summary_lines(report: &CalendarReport, currency: &str) -> Vec<String> {
    let summary = report.summary();
    let mut lines = vec![
        format!("Items: {}", summary.item_count),
        format!("Total: {}", format_amount(summary.total_amount, currency)),
        format!("Paid: {}", format_amount(summary.paid_amount, currency)),
        format!("Remaining: {}", format_amount(summary.remaining_amount, currency)),
    ];
    let per_color: Vec<String> = CalendarColor::ALL
        .iter()
        .map(|color| format!("{} {}", summary.days_with(*color), color.label()))
        .collect();
    lines.push(format!("Days: {}", per_color.join(", ")));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::DayAggregator;
    use crate::domain::{
        CaisseType, DueEntry, DueStatus, MonthWindow, ParentKind, ParentSummary, ScheduledItem,
        TypeTag,
    };
    use chrono::NaiveDate;

    fn report() -> CalendarReport {
        let day = NaiveDate::from_ymd_opt(2024, 5, 5).unwrap();
        let entry = DueEntry {
            item: ScheduledItem::new("c1", 0, day, 10_000, DueStatus::Due),
            parent: ParentSummary {
                id: "c1".into(),
                kind: ParentKind::Contract,
                type_tag: TypeTag::Caisse(CaisseType::Standard),
            },
            display_name: None,
        };
        CalendarReport {
            month: MonthWindow::containing(day),
            days: DayAggregator::aggregate(vec![entry], day),
            diagnostics: Vec::new(),
        }
    }

    #[test]
    fn render_lists_days_and_items() {
        colored::control::set_override(false);
        let lines = render(&report(), "XAF", true);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("2024-05-05"));
        assert!(lines[0].contains("orange"));
        assert!(lines[0].contains("remaining 10 000 XAF"));
        assert!(lines[1].contains("(unknown owner)"));
        assert!(lines[1].contains("#1"));
    }

    #[test]
    fn empty_report_says_so() {
        let mut report = report();
        report.days.clear();
        assert_eq!(render(&report, "XAF", false), vec!["No items due in 2024-05."]);
    }

    #[test]
    fn summary_counts_days_per_color() {
        let lines = summary_lines(&report(), "XAF");
        assert!(lines.contains(&"Days: 0 red, 1 orange, 0 yellow, 0 green, 0 gray".to_string()));
    }
}
