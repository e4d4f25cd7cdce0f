//! Attendance reporting core: reconciliation of rosters against recorded
//! facts, and aggregation of reconciled entries into per-class statistics.
//!
//! The pipeline is: fetch roster + records, [`reconcile`] to fill gaps with
//! the absent default, then aggregate with [`aggregate_single_day`] (raw
//! counts) or [`aggregate_averaged_over_range`] (per-day averages). The two
//! aggregations are deliberately separate operations: single-day reports show
//! raw counts while multi-day class summaries show daily averages, and hiding
//! that behind a flag has caused confusion before.

use crate::models::attendance_record::{self, AttendanceStatus};
use crate::models::{class, student, user};
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// The printable grid and ranged summaries look at most this many calendar
/// days past the range start.
pub const MAX_RANGE_DAYS: u64 = 31;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Class not found: {0}")]
    ClassNotFound(i64),
}

/// One reconciled (student, date) entry. `recorded` is false when the entry
/// is the presentation-time absent default rather than a stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledEntry {
    pub student_id: i64,
    pub student_name: String,
    pub nisn: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub check_in_time: Option<NaiveTime>,
    pub notes: Option<String>,
    pub recorded: bool,
}

/// Raw single-day counts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyStats {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    pub attendance_rate: f64,
}

impl DailyStats {
    pub fn total(&self) -> i64 {
        self.present + self.late + self.absent + self.excused
    }
}

/// Multi-day averages: per-status counts divided by the number of distinct
/// dates covered, rounded to two decimals. The rate is computed from the raw
/// totals (averaging does not change it).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeStats {
    pub present: f64,
    pub late: f64,
    pub absent: f64,
    pub excused: f64,
    pub attendance_rate: f64,
    pub school_days: i64,
}

/// Produces exactly one entry per (roster member, target date), defaulting
/// missing pairs to Tidak Hadir with no check-in time and no notes. The
/// default is presentation-only and never persisted.
///
/// Matching is by student id. Output order is roster order (outer) then the
/// given date order (inner); duplicate roster ids contribute one entry each.
pub fn reconcile(
    roster: &[student::Model],
    records: &[attendance_record::Model],
    dates: &[NaiveDate],
) -> Vec<ReconciledEntry> {
    let mut by_key: HashMap<(i64, NaiveDate), &attendance_record::Model> = HashMap::new();
    for record in records {
        by_key.insert((record.student_id, record.date), record);
    }

    let mut seen: HashSet<i64> = HashSet::new();
    let mut entries = Vec::with_capacity(roster.len() * dates.len());

    for student in roster {
        if !seen.insert(student.id) {
            continue;
        }
        for &date in dates {
            let entry = match by_key.get(&(student.id, date)) {
                Some(record) => ReconciledEntry {
                    student_id: student.id,
                    student_name: student.name.clone(),
                    nisn: student.nisn.clone(),
                    date,
                    status: record.status,
                    check_in_time: record.check_in_time,
                    notes: record.notes.clone(),
                    recorded: true,
                },
                None => ReconciledEntry {
                    student_id: student.id,
                    student_name: student.name.clone(),
                    nisn: student.nisn.clone(),
                    date,
                    status: AttendanceStatus::TidakHadir,
                    check_in_time: None,
                    notes: None,
                    recorded: false,
                },
            };
            entries.push(entry);
        }
    }

    entries
}

/// Raw counts over a reconciled set. Callers pass the entries of one date;
/// an empty set yields zero counts and a 0.00 rate, never a division error.
pub fn aggregate_single_day(entries: &[ReconciledEntry]) -> DailyStats {
    let mut stats = DailyStats::default();
    for entry in entries {
        match entry.status {
            AttendanceStatus::Hadir => stats.present += 1,
            AttendanceStatus::Terlambat => stats.late += 1,
            AttendanceStatus::TidakHadir => stats.absent += 1,
            AttendanceStatus::Izin => stats.excused += 1,
        }
    }
    stats.attendance_rate = rate_of(stats.present, stats.late, stats.total());
    stats
}

/// Per-day averages over a reconciled multi-day set.
pub fn aggregate_averaged_over_range(entries: &[ReconciledEntry]) -> RangeStats {
    let totals = aggregate_single_day(entries);
    let days = entries
        .iter()
        .map(|e| e.date)
        .collect::<HashSet<_>>()
        .len() as i64;

    if days == 0 {
        return RangeStats::default();
    }

    RangeStats {
        present: round2(totals.present as f64 / days as f64),
        late: round2(totals.late as f64 / days as f64),
        absent: round2(totals.absent as f64 / days as f64),
        excused: round2(totals.excused as f64 / days as f64),
        attendance_rate: totals.attendance_rate,
        school_days: days,
    }
}

/// School days (Mon-Fri) in the inclusive range, truncated to
/// [`MAX_RANGE_DAYS`] calendar days from the range start. Empty when
/// `start > end`.
pub fn school_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let hard_end = start
        .checked_add_days(Days::new(MAX_RANGE_DAYS - 1))
        .unwrap_or(end);
    let end = end.min(hard_end);

    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn rate_of(present: i64, late: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round2((present + late) as f64 / total as f64 * 100.0)
}

/// Reconciled entries for one class over a target date set, with the context
/// the formatters need.
#[derive(Debug, Clone)]
pub struct ClassReport {
    pub class: class::Model,
    pub teacher: Option<user::Model>,
    pub dates: Vec<NaiveDate>,
    pub roster_size: usize,
    pub entries: Vec<ReconciledEntry>,
}

impl ClassReport {
    pub fn daily_stats(&self) -> DailyStats {
        aggregate_single_day(&self.entries)
    }

    pub fn range_stats(&self) -> RangeStats {
        aggregate_averaged_over_range(&self.entries)
    }
}

/// Builds the report for a single class; `ClassNotFound` when the id is
/// unknown.
pub async fn build_class_report(
    db: &DatabaseConnection,
    class_id: i64,
    dates: &[NaiveDate],
) -> ReportResult<ClassReport> {
    let class = class::Entity::find_by_id(class_id)
        .one(db)
        .await?
        .ok_or(ReportError::ClassNotFound(class_id))?;
    report_for_class(db, class, dates).await
}

/// Builds reports for one class (when `class_id` is given) or every class,
/// ordered by class name.
pub async fn build_reports(
    db: &DatabaseConnection,
    class_id: Option<i64>,
    dates: &[NaiveDate],
) -> ReportResult<Vec<ClassReport>> {
    let classes = match class_id {
        Some(id) => vec![
            class::Entity::find_by_id(id)
                .one(db)
                .await?
                .ok_or(ReportError::ClassNotFound(id))?,
        ],
        None => {
            class::Entity::find()
                .order_by_asc(class::Column::Name)
                .all(db)
                .await?
        }
    };

    let mut reports = Vec::with_capacity(classes.len());
    for class in classes {
        reports.push(report_for_class(db, class, dates).await?);
    }
    Ok(reports)
}

async fn report_for_class(
    db: &DatabaseConnection,
    class: class::Model,
    dates: &[NaiveDate],
) -> ReportResult<ClassReport> {
    let roster = student::Model::roster(db, class.id).await?;

    let teacher = match class.teacher_id {
        Some(teacher_id) => user::Entity::find_by_id(teacher_id).one(db).await?,
        None => None,
    };

    let records = if roster.is_empty() || dates.is_empty() {
        Vec::new()
    } else {
        let student_ids: Vec<i64> = roster.iter().map(|s| s.id).collect();
        attendance_record::Entity::find()
            .filter(attendance_record::Column::StudentId.is_in(student_ids))
            .filter(attendance_record::Column::Date.is_in(dates.to_vec()))
            .all(db)
            .await?
    };

    let entries = reconcile(&roster, &records, dates);

    Ok(ClassReport {
        class,
        teacher,
        dates: dates.to_vec(),
        roster_size: roster.len(),
        entries,
    })
}
