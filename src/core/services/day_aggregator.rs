use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{CalendarColor, ColoredItem, DayBucket, DueEntry, DueStatus};

/// Days ahead of `today` (inclusive of today) in which a due item is imminent.
pub const IMMINENT_DAYS: i64 = 2;

/// Time position of an outstanding item relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Overdue,
    Imminent,
    Upcoming,
}

impl Urgency {
    pub fn classify(due_date: NaiveDate, today: NaiveDate) -> Self {
        let days_until = (due_date - today).num_days();
        if days_until < 0 {
            Urgency::Overdue
        } else if days_until <= IMMINENT_DAYS {
            Urgency::Imminent
        } else {
            Urgency::Upcoming
        }
    }
}

/// Groups due entries per calendar day and assigns traffic-light colors.
pub struct DayAggregator;

impl DayAggregator {
    /// Color of a single item.
    pub fn item_color(status: DueStatus, due_date: NaiveDate, today: NaiveDate) -> CalendarColor {
        match status {
            DueStatus::Paid => CalendarColor::Green,
            DueStatus::Refused | DueStatus::Canceled => CalendarColor::Gray,
            DueStatus::Due | DueStatus::Partial => match Urgency::classify(due_date, today) {
                Urgency::Overdue => CalendarColor::Red,
                Urgency::Imminent => CalendarColor::Orange,
                Urgency::Upcoming => CalendarColor::Yellow,
            },
        }
    }

    /// Color of a calendar cell.
    ///
    /// Re-reads raw statuses and dates instead of folding the item colors, so
    /// callers rendering both get independently derived values.
    pub fn day_color(items: &[ColoredItem], today: NaiveDate) -> CalendarColor {
        if items.is_empty() {
            return CalendarColor::Gray;
        }

        let urgency_present = |wanted: Urgency| {
            items.iter().any(|entry| {
                entry.item.status.is_outstanding()
                    && entry
                        .item
                        .due_date
                        .map_or(false, |due| Urgency::classify(due, today) == wanted)
            })
        };

        if urgency_present(Urgency::Overdue) {
            CalendarColor::Red
        } else if urgency_present(Urgency::Imminent) {
            CalendarColor::Orange
        } else if urgency_present(Urgency::Upcoming) {
            CalendarColor::Yellow
        } else if items.iter().all(|entry| entry.item.status == DueStatus::Paid) {
            CalendarColor::Green
        } else if items.iter().all(|entry| entry.item.status.is_void()) {
            CalendarColor::Gray
        } else {
            CalendarColor::Yellow
        }
    }

    /// Buckets entries by due day, ascending. Entries without a due date are skipped.
    pub fn aggregate(entries: Vec<DueEntry>, today: NaiveDate) -> Vec<DayBucket> {
        let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

        for entry in entries {
            let Some(due_date) = entry.item.due_date else {
                tracing::debug!(item = %entry.item.id, "skipping item without due date");
                continue;
            };

            let color = Self::item_color(entry.item.status, due_date, today);
            let bucket = buckets
                .entry(due_date)
                .or_insert_with(|| DayBucket::new(due_date));

            // Sums saturate at `Amount::MAX`.
            bucket.total_amount = bucket.total_amount.saturating_add(entry.item.amount);
            if entry.item.is_paid() {
                bucket.paid_amount = bucket.paid_amount.saturating_add(entry.item.amount);
            } else {
                bucket.remaining_amount =
                    bucket.remaining_amount.saturating_add(entry.item.amount);
            }
            bucket.count += 1;
            bucket.statuses.insert(entry.item.status);
            if !bucket.type_tags.contains(&entry.parent.type_tag) {
                bucket.type_tags.push(entry.parent.type_tag);
            }
            bucket.items.push(ColoredItem {
                item: entry.item,
                parent: entry.parent,
                display_name: entry.display_name,
                color,
            });
        }

        buckets
            .into_values()
            .map(|mut bucket| {
                bucket.color = Self::day_color(&bucket.items, today);
                bucket
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        CaisseType, ParentKind, ParentSummary, PayoutMode, ScheduledItem, TypeTag,
    };

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn entry(day: u32, amount: i64, status: DueStatus, tag: TypeTag) -> DueEntry {
        DueEntry {
            item: ScheduledItem::new("c1", day, date(day), amount, status),
            parent: ParentSummary {
                id: "c1".into(),
                kind: ParentKind::Contract,
                type_tag: tag,
            },
            display_name: Some("Awa Ndiaye".into()),
        }
    }

    fn standard(day: u32, amount: i64, status: DueStatus) -> DueEntry {
        entry(day, amount, status, TypeTag::Caisse(CaisseType::Standard))
    }

    #[test]
    fn item_color_follows_status_then_distance() {
        let today = date(10);
        let color = |status, day| DayAggregator::item_color(status, date(day), today);
        assert_eq!(color(DueStatus::Paid, 1), CalendarColor::Green);
        assert_eq!(color(DueStatus::Refused, 1), CalendarColor::Gray);
        assert_eq!(color(DueStatus::Canceled, 20), CalendarColor::Gray);
        assert_eq!(color(DueStatus::Due, 9), CalendarColor::Red);
        assert_eq!(color(DueStatus::Due, 10), CalendarColor::Orange);
        assert_eq!(color(DueStatus::Partial, 12), CalendarColor::Orange);
        assert_eq!(color(DueStatus::Due, 13), CalendarColor::Yellow);
    }

    #[test]
    fn day_color_of_empty_bucket_is_gray() {
        assert_eq!(DayAggregator::day_color(&[], date(1)), CalendarColor::Gray);
    }

    #[test]
    fn mixed_paid_and_void_day_falls_back_to_yellow() {
        let buckets = DayAggregator::aggregate(
            vec![
                standard(3, 1_000, DueStatus::Paid),
                standard(3, 2_000, DueStatus::Canceled),
            ],
            date(10),
        );
        assert_eq!(buckets[0].color, CalendarColor::Yellow);
    }

    #[test]
    fn fully_paid_day_is_green_and_fully_void_day_is_gray() {
        let buckets = DayAggregator::aggregate(
            vec![
                standard(3, 1_000, DueStatus::Paid),
                standard(4, 2_000, DueStatus::Refused),
                standard(4, 500, DueStatus::Canceled),
            ],
            date(10),
        );
        assert_eq!(buckets[0].color, CalendarColor::Green);
        assert_eq!(buckets[1].color, CalendarColor::Gray);
        assert_eq!(buckets[1].remaining_amount, 2_500);
    }

    #[test]
    fn imminent_partial_outranks_paid_item() {
        let today = date(10);
        let buckets = DayAggregator::aggregate(
            vec![
                standard(12, 700, DueStatus::Partial),
                standard(12, 300, DueStatus::Paid),
            ],
            today,
        );
        assert_eq!(buckets[0].color, CalendarColor::Orange);
        assert_eq!(buckets[0].paid_amount, 300);
        assert_eq!(buckets[0].remaining_amount, 700);
    }

    #[test]
    fn type_tags_are_unique_in_first_seen_order() {
        let payout = TypeTag::Payout(PayoutMode::CapitalPlusCommissionsAtEnd);
        let buckets = DayAggregator::aggregate(
            vec![
                entry(5, 100, DueStatus::Due, payout),
                standard(5, 100, DueStatus::Due),
                entry(5, 100, DueStatus::Paid, payout),
            ],
            date(1),
        );
        assert_eq!(
            buckets[0].type_tags,
            vec![payout, TypeTag::Caisse(CaisseType::Standard)]
        );
        assert_eq!(buckets[0].count, 3);
        assert_eq!(buckets[0].statuses.len(), 2);
    }

    #[test]
    fn entries_without_due_date_are_skipped() {
        let mut undated = standard(5, 100, DueStatus::Due);
        undated.item.due_date = None;
        let entries = vec![undated, standard(6, 50, DueStatus::Due)];
        let buckets = DayAggregator::aggregate(entries, date(1));
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].date, date(6));
    }

    #[test]
    fn buckets_are_sorted_ascending() {
        let buckets = DayAggregator::aggregate(
            vec![
                standard(20, 1, DueStatus::Due),
                standard(2, 1, DueStatus::Due),
                standard(11, 1, DueStatus::Due),
            ],
            date(1),
        );
        let dates: Vec<_> = buckets.iter().map(|bucket| bucket.date).collect();
        assert_eq!(dates, vec![date(2), date(11), date(20)]);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_overflowing() {
        let entries = vec![
            standard(5, i64::MAX, DueStatus::Due),
            standard(5, i64::MAX, DueStatus::Paid),
            standard(5, 10, DueStatus::Due),
        ];
        let buckets = DayAggregator::aggregate(entries, date(1));
        assert_eq!(buckets[0].total_amount, i64::MAX);
        assert_eq!(buckets[0].paid_amount, i64::MAX);
        assert_eq!(buckets[0].remaining_amount, i64::MAX);
        assert_eq!(buckets[0].count, 3);
    }
}
