use colored::{ColoredString, Colorize};
use std::fmt;

use crate::domain::{Amount, CalendarColor};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn build_label(kind: MessageKind) -> (&'static str, &'static str) {
    match kind {
        MessageKind::Info => ("INFO", "[i]"),
        MessageKind::Success => ("SUCCESS", "[ok]"),
        MessageKind::Warning => ("WARNING", "[!]"),
        MessageKind::Error => ("ERROR", "[x]"),
        MessageKind::Section => ("", ""),
    }
}

fn apply_style(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        _ => {
            let (label, icon) = build_label(kind);
            format!("{label}: {icon} {text}")
        }
    };

    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message);
    match kind {
        MessageKind::Section => println!("\n{}", formatted),
        MessageKind::Error => eprintln!("{}", formatted),
        _ => println!("{}", formatted),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Paints `text` with the terminal color closest to the calendar color.
pub fn paint(color: CalendarColor, text: &str) -> ColoredString {
    match color {
        CalendarColor::Green => text.green(),
        CalendarColor::Orange => text.truecolor(255, 140, 0),
        CalendarColor::Yellow => text.yellow(),
        CalendarColor::Red => text.red(),
        CalendarColor::Gray => text.bright_black(),
    }
}

/// Formats an amount with space-grouped thousands, e.g. `1 250 000 XAF`.
pub fn format_amount(amount: Amount, currency: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} {currency}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(0, "XAF"), "0 XAF");
        assert_eq!(format_amount(950, "XAF"), "950 XAF");
        assert_eq!(format_amount(10_000, "XAF"), "10 000 XAF");
        assert_eq!(format_amount(1_250_000, "XAF"), "1 250 000 XAF");
        assert_eq!(format_amount(-3_000, "XAF"), "-3 000 XAF");
    }

    #[test]
    fn labels_carry_kind_prefix() {
        colored::control::set_override(false);
        assert_eq!(apply_style(MessageKind::Warning, "late"), "WARNING: [!] late");
        assert_eq!(apply_style(MessageKind::Section, " May "), "=== May ===");
    }
}
