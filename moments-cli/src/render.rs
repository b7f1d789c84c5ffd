//! Plain text rendering of the gallery views
use chrono::{Datelike, Months, NaiveDate};
use entities::diary::DiaryAsset;
use service::gallery::MomentCalendar;

const WEEKDAYS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];
const MOMENT_MARK: char = '*';
const CELL_WIDTH: usize = 4;

pub fn render_grid(moments: &[DiaryAsset]) -> String {
    if moments.is_empty() {
        return "No moments yet".to_string();
    }

    moments
        .iter()
        .map(|moment| {
            format!(
                "{}  #{}  {}\n            {}",
                moment.date_label(),
                moment.asset_id,
                moment.description,
                moment.image_url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string()
}

pub fn render_moment(moment: &DiaryAsset) -> String {
    format!(
        "Date:        {}\nAsset ID:    {}\nUnit name:   {}\nDescription: {}\nImage:       {}",
        moment.date_label(),
        moment.asset_id,
        moment.unit_name,
        moment.description,
        moment.image_url
    )
}

/// Month grid starting on Monday, days with a moment are marked with `*`
pub fn render_calendar(calendar: &MomentCalendar, month: NaiveDate) -> String {
    let first = month.with_day(1).unwrap_or(month);
    let highlighted = calendar.highlighted_days(first.year(), first.month());

    let header: String = WEEKDAYS.iter().map(|weekday| format!("{weekday:>3} ")).collect();
    let mut lines = vec![first.format("%B %Y").to_string(), header.trim_end().to_string()];

    let offset = first.weekday().num_days_from_monday() as usize;
    let mut row = " ".repeat(offset * CELL_WIDTH);
    for day in 1..=days_in_month(first) {
        let mark = if highlighted.contains(&day) { MOMENT_MARK } else { ' ' };
        row.push_str(&format!("{day:>3}{mark}"));

        if (offset + day as usize) % WEEKDAYS.len() == 0 {
            lines.push(row.trim_end().to_string());
            row.clear();
        }
    }
    if !row.is_empty() {
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

/// Parses a `yyyy-MM` month into its first day
pub fn parse_month(month: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .map_err(|e| format!("expected a 'yyyy-MM' month: {e}"))
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}
