use anyhow::{Context, Result, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use sitelens_client::{
    ClientConfig, CrawlClient, CrawlItem, SortColumn, SortDirection, SortSpec,
};
use sitelens_core::format::format_date;
use sitelens_core::{HeadingBar, Level, LinkSlice, Notifications, Store};
use std::path::PathBuf;
use std::time::Duration;

pub const LOG_FILE: &str = "~/.config/sitelens/sitelens.log";
pub const FAILED_TITLE: &str = "CRAWLING DID NOT WORK.";
const CHART_WIDTH: usize = 40;

/// Location of the TUI log file, with `~` expanded.
pub fn log_file_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(LOG_FILE).as_ref())
}

/// Parse `COLUMN[:asc|desc]` into a single-column sort spec.
///
/// The direction defaults to descending, matching the first click on a
/// column header.
pub fn parse_sort_arg(value: &str) -> Result<SortSpec> {
    let (column, direction) = match value.split_once(':') {
        Some((column, direction)) => (column, Some(direction)),
        None => (value, None),
    };

    let column = SortColumn::from_str(column.trim()).ok_or_else(|| {
        let known: Vec<&str> = SortColumn::ALL.iter().map(|c| c.as_str()).collect();
        anyhow!(
            "Unknown sort column '{}'. Expected one of: {}",
            column,
            known.join(", ")
        )
    })?;

    let direction = match direction {
        Some(direction) => SortDirection::from_str(direction.trim())
            .ok_or_else(|| anyhow!("Unknown sort direction '{}'. Use asc or desc", direction))?,
        None => SortDirection::Descending,
    };

    Ok(SortSpec::by(column, direction))
}

pub fn build_client_config(
    api_url: &str,
    token: Option<&str>,
    timeout_secs: u64,
) -> Result<ClientConfig> {
    if timeout_secs == 0 {
        bail!("Timeout must be at least 1 second");
    }
    let mut config = ClientConfig::new(api_url)
        .with_context(|| format!("Invalid API URL '{}'", api_url))?
        .with_timeout(Duration::from_secs(timeout_secs));
    if let Some(token) = token {
        config = config.with_token(token);
    }
    Ok(config)
}

/// `-q` is global, so it may sit before or after the subcommand.
pub fn quiet_from_args(matches: &ArgMatches) -> bool {
    matches.get_flag("quiet")
        || matches
            .subcommand()
            .is_some_and(|(_, sub_matches)| sub_matches.get_flag("quiet"))
}

/// Build the HTTP client from the global arguments.
pub fn client_from_args(args: &ArgMatches) -> Result<CrawlClient> {
    let api_url = args
        .get_one::<String>("api-url")
        .map(String::as_str)
        .unwrap_or(sitelens_client::config::DEFAULT_API_URL);
    let token = args.get_one::<String>("token").map(String::as_str);
    let timeout = args
        .get_one::<u64>("timeout")
        .copied()
        .unwrap_or(sitelens_client::config::DEFAULT_TIMEOUT_SECS);

    let config = build_client_config(api_url, token, timeout)?;
    Ok(CrawlClient::new(config)?)
}

pub fn page_size_from_args(args: &ArgMatches) -> u32 {
    args.get_one::<u32>("page-size").copied().unwrap_or(10)
}

/// Title shown for a row; failed crawls have no meaningful title.
pub fn display_title(item: &CrawlItem) -> &str {
    if item.is_success() {
        &item.page_title
    } else {
        FAILED_TITLE
    }
}

pub fn status_label(item: &CrawlItem) -> &'static str {
    if item.is_success() { "Success" } else { "Failed" }
}

/// Render labelled horizontal bars scaled to `width` cells.
pub fn bar_lines(entries: &[(String, u32)], width: usize) -> Vec<String> {
    let max = entries.iter().map(|(_, value)| *value).max().unwrap_or(0);
    let label_width = entries
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|(label, value)| {
            let len = if max == 0 {
                0
            } else {
                ((*value as usize * width) / max as usize).max(usize::from(*value > 0))
            };
            format!(
                "{:<label_width$} {} {}",
                label,
                "█".repeat(len),
                value,
                label_width = label_width
            )
        })
        .collect()
}

pub fn heading_lines(bars: &[HeadingBar]) -> Vec<String> {
    if bars.iter().all(|bar| bar.count == 0) {
        return vec!["No heading data available.".to_string()];
    }
    let entries: Vec<(String, u32)> = bars.iter().map(|b| (b.name.clone(), b.count)).collect();
    bar_lines(&entries, CHART_WIDTH)
}

pub fn link_lines(slices: &[LinkSlice]) -> Vec<String> {
    if slices.is_empty() {
        return vec!["No link data available.".to_string()];
    }
    let entries: Vec<(String, u32)> = slices
        .iter()
        .map(|s| (s.name.to_string(), s.value))
        .collect();
    bar_lines(&entries, CHART_WIDTH)
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

pub fn print_banner() {
    print_divider();
    println!(
        "{}  {}",
        "  SITELENS".bright_white().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    print_divider();
}

fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message.to_string());
    spinner
}

/// Print everything the store reported and fail if any of it was an error.
fn report_notifications(notifications: &Notifications) -> Result<()> {
    let mut last_error = None;
    for notification in notifications.iter() {
        let symbol = match notification.level {
            Level::Info => "→".blue(),
            Level::Success => "✓".green().bold(),
            Level::Warning => "⚠".yellow().bold(),
            Level::Error => "✗".red().bold(),
        };
        match notification.item_id {
            Some(id) => println!(
                "{} {} {}",
                symbol,
                notification.message,
                format!("(id {})", id).bright_white()
            ),
            None => println!("{} {}", symbol, notification.message),
        }
        if notification.level == Level::Error {
            last_error = Some(notification.message.clone());
        }
    }

    match last_error {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

fn print_item_row(item: &CrawlItem) {
    let status = if item.is_success() {
        status_label(item).green()
    } else {
        status_label(item).red()
    };
    let title = if item.is_success() {
        display_title(item).bright_white()
    } else {
        display_title(item).red()
    };
    println!(
        "{:>6}  {:<8} {:<16}  {}",
        item.id,
        status,
        format_date(item.created_at.as_ref()),
        title
    );
    if let Some(url) = item.url() {
        println!("{:>8}{}", "", url.cyan());
    }
}

fn print_item_detail(store: &Store<CrawlClient>, item: &CrawlItem) {
    let detail = store.detail();
    print_divider();
    println!("  {}", display_title(item).bright_white().bold());
    print_divider();

    if !item.error.is_empty() {
        println!("{} {}", "Error:".red().bold(), item.error.red());
    }
    println!("{} {}", "URL:".dimmed(), item.url().unwrap_or("").cyan());
    println!("{} {}", "HTML version:".dimmed(), item.html_version);
    println!(
        "{} {}",
        "Login form:".dimmed(),
        if item.has_login_form { "YES" } else { "NO" }
    );
    println!(
        "{} {}",
        "Date:".dimmed(),
        format_date(item.created_at.as_ref())
    );

    println!();
    println!("{}", "Headings".bright_white().bold());
    for line in heading_lines(detail.heading_chart()) {
        println!("  {}", line.cyan());
    }

    println!();
    println!("{}", "Links".bright_white().bold());
    for line in link_lines(detail.link_chart()) {
        println!("  {}", line.green());
    }
}

/// Load one page with the list arguments shared by show/delete/reanalyze.
async fn load_page(
    store: &mut Store<CrawlClient>,
    args: &ArgMatches,
    quiet: bool,
) -> Result<()> {
    let page = args.get_one::<u32>("page").copied().unwrap_or(1);
    if let Some(query) = args.get_one::<String>("query") {
        store.set_search_text(query.as_str());
    }

    let spinner = spinner(&format!("Loading page {}...", page), quiet);
    store.set_page(page).await;
    spinner.finish_and_clear();

    report_notifications(store.notifications())
}

/// Select the requested ids, warning about any that are not on the page.
fn select_ids(store: &mut Store<CrawlClient>, ids: &[i64]) -> Result<()> {
    store.set_selected(ids);
    for id in ids {
        if !store.selection().contains(*id) {
            println!(
                "{} Item {} is not on page {}, skipping",
                "⚠".yellow().bold(),
                id,
                store.query().current_page()
            );
        }
    }
    if store.selection().is_empty() {
        bail!("None of the given ids are on the loaded page");
    }
    Ok(())
}

pub async fn handle_ui(sub_matches: &ArgMatches) -> Result<()> {
    let client = client_from_args(sub_matches)?;
    sitelens_tui::run(client, page_size_from_args(sub_matches)).await
}

pub async fn handle_submit(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let url = sub_matches
        .get_one::<String>("URL")
        .context("A URL is required")?;
    let mut store = Store::new(client_from_args(sub_matches)?);
    store.set_input(url.as_str());

    let spinner = spinner(&format!("Submitting {}...", url), quiet);
    let accepted = store.submit().await;
    spinner.finish_and_clear();

    if let Some(message) = store.form().validation_message() {
        bail!("{}", message);
    }
    report_notifications(store.notifications())?;
    if !accepted {
        bail!("Submission was not accepted");
    }
    Ok(())
}

pub async fn handle_list(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let mut store = Store::with_page_size(
        client_from_args(sub_matches)?,
        page_size_from_args(sub_matches),
    );
    if let Some(sort) = sub_matches.get_one::<String>("sort") {
        store.set_sort(parse_sort_arg(sort)?);
    }
    load_page(&mut store, sub_matches, quiet).await?;

    let pagination = store.pagination();
    if !quiet {
        print_divider();
        println!(
            "  {} {} | page {} of {}",
            store.total_count().to_string().bright_white().bold(),
            "item(s)".dimmed(),
            pagination.current_page,
            pagination.total_pages.max(1)
        );
        print_divider();
    }

    if store.items().is_empty() {
        println!("{}", "No Items".dimmed());
        return Ok(());
    }
    for item in store.items() {
        print_item_row(item);
    }
    Ok(())
}

pub async fn handle_show(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let id = *sub_matches.get_one::<i64>("ID").context("An id is required")?;
    let mut store = Store::with_page_size(
        client_from_args(sub_matches)?,
        page_size_from_args(sub_matches),
    );
    load_page(&mut store, sub_matches, quiet).await?;

    store.set_current_item(Some(id));
    let Some(item) = store.detail().current_item().cloned() else {
        bail!(
            "Item {} is not on page {}",
            id,
            store.query().current_page()
        );
    };
    print_item_detail(&store, &item);
    Ok(())
}

fn ids_from(sub_matches: &ArgMatches) -> Vec<i64> {
    sub_matches
        .get_many::<i64>("ID")
        .map(|ids| ids.copied().collect())
        .unwrap_or_default()
}

pub async fn handle_delete(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let ids = ids_from(sub_matches);
    let mut store = Store::with_page_size(
        client_from_args(sub_matches)?,
        page_size_from_args(sub_matches),
    );
    load_page(&mut store, sub_matches, quiet).await?;
    select_ids(&mut store, &ids)?;

    let spinner = spinner(
        &format!("Deleting {} item(s)...", store.selection().len()),
        quiet,
    );
    store.delete_selected().await;
    spinner.finish_and_clear();

    report_notifications(store.notifications())
}

pub async fn handle_reanalyze(
    sub_matches: &ArgMatches,
    quiet: bool,
) -> Result<()> {
    let ids = ids_from(sub_matches);
    let mut store = Store::with_page_size(
        client_from_args(sub_matches)?,
        page_size_from_args(sub_matches),
    );
    load_page(&mut store, sub_matches, quiet).await?;
    select_ids(&mut store, &ids)?;

    let spinner = spinner("Submitting for re-analysis...", quiet);
    store.reanalyze_selected().await;
    spinner.finish_and_clear();

    report_notifications(store.notifications())
}
