use chrono::{DateTime, Utc};
use sn_core::{PeriodLabel, Quote};
use sn_writer::period::to_eastern;
use sn_writer::prompt::format_decimal;
use sn_writer::Report;

pub fn quote_lines(quote: &Quote) -> Vec<String> {
    vec![
        format!("Name: {}", quote.name),
        format!("Price: {}", format_decimal(quote.price)),
        format!("PrevClose: {}", format_decimal(quote.prev_close)),
        format!("Volume: {}", quote.volume),
        format!("ExchangeShortName: {}", quote.exchange),
        format!("ChangePercent: {}", format_decimal(quote.change_percent)),
    ]
}

/// `January 15, 2024 | NASDAQ:ACME | Mid-day`
pub fn header(now: DateTime<Utc>, quote: &Quote, period: PeriodLabel) -> String {
    format!(
        "{} | {}:{} | {}",
        to_eastern(&now).format("%B %-d, %Y"),
        quote.exchange,
        quote.symbol,
        period
    )
}

pub fn report_lines(now: DateTime<Utc>, report: &Report, dry_run: bool) -> Vec<String> {
    let mut lines = vec![header(now, &report.quote, report.period)];
    match (&report.prompt, &report.article) {
        (None, _) => lines.push(format!(
            "Market is closed, no article generated for {}.",
            report.quote.symbol
        )),
        (Some(prompt), _) if dry_run => {
            lines.push(String::new());
            lines.push(format!("PROMPT: {}", prompt));
        }
        (Some(_), Some(article)) => {
            lines.push(String::new());
            lines.push(article.content.trim().to_string());
        }
        (Some(_), None) => lines.push("Failed to generate an article.".to_string()),
    }
    lines
}
