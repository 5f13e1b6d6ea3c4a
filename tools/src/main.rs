//! salestrack: command-line front end for the sales-commission tracker.
//!
//! Usage:
//!   salestrack log --result sale --product auto --product home --liability 100_300_plus \
//!                  --premium auto=1200 --premium home=850
//!   salestrack stats
//!   salestrack import report.csv --period 2024-06
//!   salestrack leaderboard --period 2024-06

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use salestrack_core::{
    calendar::{parse_work_day, DAYS_OF_WEEK},
    call_log::{CallDraft, CallEntry},
    config::TrackerConfig,
    format::{format_currency, format_rate},
    leaderboard::{AgentDetail, Leaderboard},
    product::{CallResult, LiabilityLimit, ProductKey},
    report::{parse_report_path, period_for},
    stats::DashboardStats,
    store::TrackerStore,
    tier::TierTarget,
    tracker::Tracker,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "salestrack")]
#[command(about = "Sales points and commission tracker", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "salestrack.db")]
    db: String,

    /// Directory holding tracker.json
    #[arg(long, global = true, default_value = "./data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log a call outcome
    Log(LogArgs),
    /// List logged calls, newest first
    Calls {
        /// Show the whole log instead of the recent window
        #[arg(long)]
        all: bool,
    },
    /// Delete one logged call
    Delete { call_id: String },
    /// Delete every logged call
    Clear,
    /// Points, tier progress and projected commission
    Stats {
        #[arg(long)]
        json: bool,
        /// Evaluate as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Show or change the agent name
    Name { name: Option<String> },
    /// Show or toggle working days
    Workdays {
        /// Days to flip in or out, e.g. `sat` or `5`
        #[arg(long = "toggle")]
        toggle: Vec<String>,
    },
    /// Commission tier targets
    Tiers(TiersArgs),
    /// Import a CSV productivity report
    Import(ImportArgs),
    /// Past report imports
    History,
    /// Team leaderboard for one period
    Leaderboard {
        /// Defaults to the newest imported period
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// One agent's report history
    Agent {
        name: String,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct LogArgs {
    /// sale | no_sale | voicemail | other
    #[arg(long, default_value = "sale")]
    result: CallResult,

    /// Product sold; repeat for bundles
    #[arg(long = "product")]
    products: Vec<ProductKey>,

    /// Auto liability limit: below_50_100 | 50_100 | 100_300_plus
    #[arg(long, default_value = "50_100")]
    liability: LiabilityLimit,

    /// Premium per product, e.g. `auto=1200.50`; repeat per product
    #[arg(long = "premium")]
    premiums: Vec<String>,

    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Debug, Args)]
struct TiersArgs {
    #[command(subcommand)]
    command: Option<TiersCommand>,
}

#[derive(Debug, Subcommand)]
enum TiersCommand {
    /// Show tiers and progress
    Show,
    /// Edit one tier by position (1-based)
    Set {
        position: usize,
        #[arg(long)]
        min_points: Option<String>,
        /// Whole percent, 0-100
        #[arg(long)]
        rate: Option<String>,
    },
    /// Restore the default tiers
    Reset,
}

#[derive(Debug, Args)]
struct ImportArgs {
    path: PathBuf,

    /// Reporting period, e.g. 2024-06. Defaults to the current month.
    #[arg(long)]
    period: Option<String>,

    /// Parse and print without writing to the database
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = TrackerConfig::load_or_default(&cli.data_dir)?;
    let store = TrackerStore::open(&cli.db).with_context(|| format!("opening {}", cli.db))?;
    let tracker = Tracker::new(store, config)?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Log(args) => log_call(&tracker, args),
        Commands::Calls { all } => {
            let calls = if all { tracker.calls()? } else { tracker.recent_calls()? };
            print_calls(&calls);
            Ok(())
        }
        Commands::Delete { call_id } => {
            tracker.delete_call(&call_id)?;
            println!("Deleted call {call_id}");
            Ok(())
        }
        Commands::Clear => {
            let removed = tracker.clear_calls()?;
            println!("Cleared {removed} calls");
            Ok(())
        }
        Commands::Stats { json, today: as_of } => {
            let stats = tracker.dashboard(as_of.unwrap_or(today))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&tracker.agent_name()?, &stats);
            }
            Ok(())
        }
        Commands::Name { name } => {
            let current = match name {
                Some(n) => tracker.rename_agent(&n)?,
                None => tracker.agent_name()?,
            };
            println!("{current}");
            Ok(())
        }
        Commands::Workdays { toggle } => {
            let mut days = tracker.work_days()?;
            for raw in &toggle {
                days = tracker.toggle_work_day(parse_work_day(raw)?)?;
            }
            print_work_days(&days);
            Ok(())
        }
        Commands::Tiers(args) => tiers(&tracker, args, today),
        Commands::Import(args) => import(&tracker, args, today),
        Commands::History => {
            let batches = tracker.store().import_batches()?;
            if batches.is_empty() {
                println!("  (No imports yet)");
            }
            for b in batches {
                println!(
                    "  {} | {} | {} rows, {} skipped | {}",
                    b.imported_at, b.period, b.imported, b.skipped, b.source
                );
            }
            Ok(())
        }
        Commands::Leaderboard { period, json } => {
            match tracker.leaderboard(period.as_deref())? {
                Some(board) if json => println!("{}", serde_json::to_string_pretty(&board)?),
                Some(board) => print_leaderboard(&board),
                None => println!("  (No reports imported yet)"),
            }
            Ok(())
        }
        Commands::Agent { name, json } => {
            let detail = tracker.agent_detail(&name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print_agent(&detail);
            }
            Ok(())
        }
    }
}

fn log_call(tracker: &Tracker, args: LogArgs) -> Result<()> {
    let mut draft = CallDraft::new();
    draft.result = args.result;
    draft.liability = args.liability;
    draft.notes = args.notes;
    for product in args.products {
        if !draft.is_selected(product) {
            draft.toggle_product(product);
        }
    }
    for raw in &args.premiums {
        let (product, amount) = raw
            .split_once('=')
            .with_context(|| format!("premium '{raw}' should look like auto=1200"))?;
        let product: ProductKey = product.parse()?;
        if !draft.is_selected(product) {
            log::warn!("premium given for {product}, which was not sold on this call; ignored");
            continue;
        }
        draft.set_premium(product, amount);
    }

    let preview = draft.preview();
    let entry = tracker.log_call(draft, Utc::now())?;

    println!("Logged {} ({})", entry.result, entry.id);
    if entry.result.is_sale() {
        println!("  points:   {} base + {} bonus = {}", preview.base, preview.bonus, preview.total);
        for reason in &entry.bonus_reasons {
            println!("            {reason}");
        }
        println!("  premium:  {}", format_currency(entry.premium));
    }
    Ok(())
}

fn tiers(tracker: &Tracker, args: TiersArgs, today: NaiveDate) -> Result<()> {
    match args.command.unwrap_or(TiersCommand::Show) {
        TiersCommand::Show => {
            let stats = tracker.dashboard(today)?;
            print_tier_progress(&stats);
        }
        TiersCommand::Set { position, min_points, rate } => {
            let index = position
                .checked_sub(1)
                .context("tier positions start at 1")?;
            let targets = tracker.update_tier(index, min_points.as_deref(), rate.as_deref())?;
            print_targets(&targets);
        }
        TiersCommand::Reset => {
            let targets = tracker.reset_tiers()?;
            print_targets(&targets);
        }
    }
    Ok(())
}

fn import(tracker: &Tracker, args: ImportArgs, today: NaiveDate) -> Result<()> {
    let period = args.period.unwrap_or_else(|| period_for(today));
    if args.dry_run {
        let parsed = parse_report_path(&args.path, &period)?;
        println!("=== DRY RUN: {} ===", args.path.display());
        println!("  period:     {}", parsed.period);
        println!("  agents:     {}", parsed.records.len());
        println!("  skipped:    {}", parsed.skipped);
        println!("  duplicates: {}", parsed.duplicates);
        for r in &parsed.records {
            println!(
                "  {:<24} {:>5} calls {:>4} sales {:>7.1} pts {:>14}",
                r.agent_name,
                r.calls,
                r.sales,
                r.points,
                format_currency(r.premium)
            );
        }
        return Ok(());
    }

    let batch = tracker.import_report_path(&args.path, &period)?;
    println!("=== IMPORT ===");
    println!("  batch:    {}", batch.batch_id);
    println!("  period:   {}", batch.period);
    println!("  imported: {}", batch.imported);
    println!("  skipped:  {}", batch.skipped);
    Ok(())
}

fn print_calls(calls: &[CallEntry]) {
    if calls.is_empty() {
        println!("  (No calls logged yet)");
        return;
    }
    for c in calls {
        let products: Vec<&str> = c.products.iter().map(|p| p.label()).collect();
        let liability = c
            .liability_limit
            .map(|l| format!(" · {}", l.label()))
            .unwrap_or_default();
        println!(
            "  {} | {} | {:<15} | {}{} | {} pts | {}",
            c.id,
            c.timestamp.with_timezone(&Local).format("%b %d %H:%M"),
            c.result.label(),
            if products.is_empty() { "-".to_string() } else { products.join(", ") },
            liability,
            c.total_points(),
            format_currency(c.premium)
        );
        if c.bonus_points > 0 {
            println!("           +{} bonus", c.bonus_points);
        }
        if let Some(notes) = &c.notes {
            println!("           {notes}");
        }
    }
}

fn print_stats(agent: &str, s: &DashboardStats) {
    println!("=== {agent} ===");
    println!("  calls:          {}", s.total_calls);
    println!("  sales:          {}", s.total_sales);
    println!("  closure rate:   {:.1}%", s.closure_rate);
    println!("  total points:   {} (incl. {} bonus)", s.total_points, s.total_bonus_points);
    println!("  total premium:  {}", format_currency(s.total_premium));
    let tier_note = match (&s.active_label, s.using_estimate) {
        (Some(label), false) => format!("{label} rate"),
        (Some(label), true) => format!("{label} estimate"),
        (None, _) => "fallback rate".to_string(),
    };
    println!(
        "  commission:     {} ({} {})",
        format_currency(s.projected_commission),
        format_rate(s.active_rate),
        tier_note
    );

    println!();
    print_tier_progress(s);

    println!();
    println!("=== PRODUCTS ===");
    for p in &s.products {
        println!("  {:<11} {:>3} sold  {:>4} pts", p.label, p.sales, p.points);
    }
    if s.total_bonus_points > 0 {
        println!("  +{} bonus pts from bundles", s.total_bonus_points);
    }

    println!();
    println!("=== OUTCOMES ===");
    for r in &s.results {
        println!("  {:<15} {:>4}  {:>5.1}%", r.label, r.count, r.percent);
    }
}

fn print_tier_progress(s: &DashboardStats) {
    println!("=== COMMISSION TIERS ===");
    for t in &s.tier_progress {
        let status = if t.reached {
            "reached".to_string()
        } else {
            format!("{} pts to go", t.points_to_go)
        };
        println!(
            "  {:<10} {:>4} · {:>3} pts  {:>5.1}%  {}",
            t.label,
            format_rate(t.rate),
            t.min_points,
            t.percent,
            status
        );
    }
    match &s.next_tier {
        Some(next) => {
            println!(
                "  next: {} ({}) in {} pts",
                next.label,
                format_rate(next.rate),
                s.points_needed
            );
            println!(
                "  pace: {} pts/shift over {} working days left",
                s.points_per_shift, s.working_days_left
            );
        }
        None => println!("  all tiers reached"),
    }
}

fn print_targets(targets: &[TierTarget]) {
    for (i, t) in targets.iter().enumerate() {
        println!("  {}. {:<10} {:>4} pts  {:>5.1}%", i + 1, t.label, t.min_points, t.rate);
    }
}

fn print_work_days(days: &[u8]) {
    let line: Vec<String> = DAYS_OF_WEEK
        .iter()
        .enumerate()
        .map(|(i, d)| {
            if days.contains(&(i as u8)) {
                format!("[{d}]")
            } else {
                format!(" {d} ")
            }
        })
        .collect();
    println!("  {}", line.join(" "));
}

fn print_leaderboard(board: &Leaderboard) {
    println!("=== LEADERBOARD {} ===", board.period);
    if board.entries.is_empty() {
        println!("  (No agents for this period)");
        return;
    }
    for e in &board.entries {
        println!(
            "  {:>3}. {:<24} {:>7.1} pts {:>14}  {:>5.1}%  {:<9} {:>12}",
            e.rank,
            e.agent_name,
            e.points,
            format_currency(e.premium),
            e.closure_rate,
            e.tier.as_deref().unwrap_or("-"),
            format_currency(e.projected_commission)
        );
    }
    let t = &board.totals;
    println!();
    println!("  agents:       {}", t.agents);
    println!("  calls:        {}", t.calls);
    println!("  sales:        {}", t.sales);
    println!("  points:       {:.1}", t.points);
    println!("  premium:      {}", format_currency(t.premium));
    println!("  closure rate: {:.1}%", t.closure_rate);
}

fn print_agent(d: &AgentDetail) {
    println!("=== {} ===", d.agent_name);
    for p in &d.periods {
        let r = &p.record;
        println!(
            "  {} | {:>5} calls {:>4} sales {:>7.1} pts | {:>14} | {:<9} | {}",
            r.period,
            r.calls,
            r.sales,
            r.points,
            format_currency(r.premium),
            p.tier.as_deref().unwrap_or("-"),
            format_currency(p.projected_commission)
        );
    }
    println!();
    println!("  periods:      {}", d.periods.len());
    println!("  points:       {:.1}", d.totals.points);
    println!("  premium:      {}", format_currency(d.totals.premium));
    println!("  closure rate: {:.1}%", d.totals.closure_rate);
    println!("  commission:   {}", format_currency(d.total_projected_commission));
    if let Some(best) = &d.best_period {
        println!("  best period:  {best}");
    }
}
