use std::path::PathBuf;

use chrono::{Local, NaiveDate};

use crate::{
    config::{Config, ConfigManager},
    core::services::{DueCalendarService, ProgressService},
    domain::{CaisseType, MonthWindow, PayoutMode, TypeFilter},
    storage::{DocumentStore, JsonStore},
    utils::build_info,
};

use super::{calendar_view, output, CliError};

pub const USAGE: &str = "\
Usage:
  kara_cli calendar <contracts|commissions> [--month YYYY-MM] [--types a,b] [--today YYYY-MM-DD] [--data PATH] [--items]
  kara_cli progress <contract-id> [--today YYYY-MM-DD] [--data PATH]
  kara_cli version
  kara_cli help

Without arguments an interactive prompt opens; set KARA_CLI_SCRIPT to read commands from stdin.

Caisse types: standard, journaliere, libre
Payout modes: monthly_commission_final_capital, capital_plus_commissions_at_end";

/// Commands understood by `dispatch`, offered for completion in the shell.
pub const COMMAND_NAMES: &[&str] = &["calendar", "progress", "version", "help", "exit", "quit"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// Flags shared by the calendar and progress commands.
#[derive(Debug, Default)]
struct Options {
    positional: Vec<String>,
    month: Option<String>,
    types: Vec<String>,
    today: Option<String>,
    data: Option<PathBuf>,
    items: bool,
}

impl Options {
    fn parse(args: &[&str]) -> Result<Self, CliError> {
        let mut options = Options::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (*arg, None),
            };
            if flag == "--items" {
                options.items = true;
                continue;
            }
            if !flag.starts_with("--") {
                options.positional.push(flag.to_string());
                continue;
            }
            let value = match inline {
                Some(value) => value,
                None => iter
                    .next()
                    .map(|value| value.to_string())
                    .ok_or_else(|| CliError::Input(format!("`{flag}` expects a value")))?,
            };
            match flag {
                "--month" => options.month = Some(value),
                "--today" => options.today = Some(value),
                "--data" => options.data = Some(PathBuf::from(value)),
                "--types" => options.types.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|tag| !tag.is_empty())
                        .map(str::to_string),
                ),
                other => return Err(CliError::Input(format!("unknown option `{other}`"))),
            }
        }
        Ok(options)
    }

    fn today(&self) -> Result<NaiveDate, CliError> {
        match &self.today {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map_err(|_| CliError::Input(format!("`{raw}` is not a YYYY-MM-DD date"))),
            None => Ok(Local::now().date_naive()),
        }
    }

    fn month(&self, today: NaiveDate) -> Result<MonthWindow, CliError> {
        match &self.month {
            Some(raw) => Ok(MonthWindow::parse(raw)?),
            None => Ok(MonthWindow::containing(today)),
        }
    }

    fn caisse_filter(&self) -> Result<TypeFilter<CaisseType>, CliError> {
        let tags = self
            .types
            .iter()
            .map(|raw| {
                CaisseType::parse(raw)
                    .ok_or_else(|| CliError::Input(format!("unknown caisse type `{raw}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeFilter::only(tags))
    }

    fn payout_filter(&self) -> Result<TypeFilter<PayoutMode>, CliError> {
        let tags = self
            .types
            .iter()
            .map(|raw| {
                PayoutMode::parse(raw)
                    .ok_or_else(|| CliError::Input(format!("unknown payout mode `{raw}`")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeFilter::only(tags))
    }
}

/// Configuration and data location shared by every command of a session.
pub struct CommandContext {
    manager: ConfigManager,
    config: Config,
}

impl CommandContext {
    pub fn new() -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        Ok(Self { manager, config })
    }

    pub fn dispatch(&self, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
        match command {
            "calendar" => self.calendar(&Options::parse(args)?)?,
            "progress" => self.progress(&Options::parse(args)?)?,
            "version" => println!("{}", build_info::current().summary()),
            "help" => println!("{USAGE}"),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            other => {
                return Err(CliError::Input(format!(
                    "unknown command `{other}` (try `help`)"
                )))
            }
        }
        Ok(LoopControl::Continue)
    }

    fn open_store(&self, options: &Options) -> Result<JsonStore, CliError> {
        let path = options
            .data
            .clone()
            .unwrap_or_else(|| self.manager.data_file(&self.config));
        Ok(JsonStore::open(path)?)
    }

    fn calendar(&self, options: &Options) -> Result<(), CliError> {
        let kind = options
            .positional
            .first()
            .map(String::as_str)
            .ok_or_else(|| CliError::Input("calendar needs `contracts` or `commissions`".into()))?;
        let today = options.today()?;
        let month = options.month(today)?;
        let store = self.open_store(options)?;
        let service = DueCalendarService::new(&store, &self.config);

        let (title, report) = match kind {
            "contracts" => (
                "Contract payments",
                service.contract_calendar(month.start, &options.caisse_filter()?, today)?,
            ),
            "commissions" => (
                "Placement commissions",
                service.commission_calendar(month.start, &options.payout_filter()?, today)?,
            ),
            other => {
                return Err(CliError::Input(format!(
                    "unknown calendar `{other}`, expected `contracts` or `commissions`"
                )))
            }
        };

        let currency = self.config.currency.as_str();
        output::section(format!("{} due in {}", title, report.month.label()));
        for line in calendar_view::render(&report, currency, options.items) {
            println!("{line}");
        }
        for line in calendar_view::diagnostic_lines(&report) {
            output::warning(line);
        }
        output::section("Summary");
        for line in calendar_view::summary_lines(&report, currency) {
            println!("{line}");
        }
        if report.is_partial() {
            output::warning(format!(
                "calendar is partial: {} parent(s) could not be fully read",
                report.diagnostics.len()
            ));
        }
        Ok(())
    }

    fn progress(&self, options: &Options) -> Result<(), CliError> {
        let contract_id = options
            .positional
            .first()
            .ok_or_else(|| CliError::Input("progress needs a contract id".into()))?;
        let today = options.today()?;
        let store = self.open_store(options)?;
        let items = store.list_contract_payments(contract_id)?;
        if items.is_empty() {
            return Err(CliError::Input(format!(
                "no scheduled payments for contract `{contract_id}`"
            )));
        }

        let currency = self.config.currency.as_str();
        output::section(format!("Contract {contract_id}"));
        println!(
            "Paid: {}",
            output::format_amount(ProgressService::paid_total(&items), currency)
        );
        println!(
            "Remaining: {}",
            output::format_amount(ProgressService::remaining_total(&items), currency)
        );
        match ProgressService::progress_percent(&items) {
            Some(percent) => println!("Progress: {percent:.1}%"),
            None => println!("Progress: n/a"),
        }
        let next = ProgressService::next_due(&items, today);
        match next.and_then(|item| item.due_date.map(|due| (due, item.amount))) {
            Some((due, amount)) => println!(
                "Next due: {} ({})",
                due.format("%Y-%m-%d"),
                output::format_amount(amount, currency)
            ),
            None => println!("Next due: none"),
        }
        let overdue = ProgressService::overdue(&items, today);
        if overdue.is_empty() {
            output::success("no overdue payments");
        } else {
            output::warning(format!("{} overdue payment(s)", overdue.len()));
        }
        Ok(())
    }
}
