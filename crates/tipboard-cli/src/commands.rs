//! Subcommand implementations for the tipboard CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use tipboard_core::auth::Session;
use tipboard_core::config::{default_db_path, LoadedConfig};
use tipboard_core::migrate::{decode_collection, Decoded};
use tipboard_core::model::{Bet, BetInput, CombinedCoupon, LivePrediction, Record, RecordKind};
use tipboard_core::store::{RECORDS_KEY, SESSION_KEY};
use tipboard_core::validate::{BetDraft, CouponDraft, LiveFields};
use tipboard_core::view::{StatusFilter, ViewState};
use tipboard_core::{Board, KeyValueStorage, Status};
use tipboard_storage::SqliteStorage;
use tracing::debug;

use crate::{CouponArgs, LiveArgs, LiveEditArgs};

/// Settings shared by every subcommand.
pub struct Context {
    pub db: Option<PathBuf>,
    pub loaded: LoadedConfig,
}

impl Context {
    /// Database path: `--db`, then `TIPBOARD_DB`, then the data directory.
    fn db_path(&self) -> Result<PathBuf> {
        let explicit = self.db.clone().or_else(|| {
            std::env::var("TIPBOARD_DB")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
        });
        match explicit {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
                Ok(path)
            }
            None => default_db_path(&self.loaded.config),
        }
    }

    fn open_board(&self) -> Result<Board<SqliteStorage>> {
        let path = self.db_path()?;
        debug!(path = %path.display(), "opening board");
        let storage = tipboard_storage::open_storage(&path)?;
        Board::open(storage, &self.loaded.config)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub fn cmd_login(ctx: &Context, email: &str) -> Result<()> {
    let mut board = ctx.open_board()?;
    let session = board.login(email)?;
    println!(
        "signed in as {} ({})",
        session.email,
        role_label(session.is_admin())
    );
    Ok(())
}

pub fn cmd_logout(ctx: &Context) -> Result<()> {
    let mut board = ctx.open_board()?;
    board.logout()?;
    println!("signed out");
    Ok(())
}

pub fn cmd_whoami(ctx: &Context) -> Result<()> {
    let board = ctx.open_board()?;
    match board.session() {
        Some(session) => println!("{} ({})", session.email, role_label(session.is_admin())),
        None => println!("not signed in"),
    }
    Ok(())
}

fn role_label(is_admin: bool) -> &'static str {
    if is_admin {
        "admin"
    } else {
        "viewer"
    }
}

// ---------------------------------------------------------------------------
// Add - publish new records
// ---------------------------------------------------------------------------

pub fn cmd_add_live(ctx: &Context, args: LiveArgs) -> Result<()> {
    let mut board = ctx.open_board()?;
    let id = board.publish_live(LiveFields {
        league: args.league,
        home_team: args.home,
        away_team: args.away,
        prediction: args.prediction,
        minute: args.minute,
    })?;
    println!("published live prediction {id}");
    Ok(())
}

pub fn cmd_add_coupon(ctx: &Context, args: CouponArgs) -> Result<()> {
    let draft = CouponDraft {
        title: args.title,
        bets: parse_bets(&args.bets)?,
    };
    let mut board = ctx.open_board()?;
    let id = board.publish_coupon(draft)?;
    if let Some(Record::Combined(coupon)) = board.find(&id) {
        println!(
            "published coupon {id} (total odds {:.2}, potential winnings {:.2})",
            coupon.total_odds, coupon.potential_winnings
        );
    }
    Ok(())
}

fn parse_bets(specs: &[String]) -> Result<Vec<BetInput>> {
    specs
        .iter()
        .map(|spec| spec.parse::<BetDraft>()?.into_input())
        .collect()
}

// ---------------------------------------------------------------------------
// List / Show
// ---------------------------------------------------------------------------

pub fn cmd_list(ctx: &Context, kind: &str, status: &str, json: bool) -> Result<()> {
    let mut state = ViewState::default();
    state.select_kind(kind.parse()?);
    state.select_filter(status.parse()?);

    let board = ctx.open_board()?;
    let view = board.view(&state);

    if json {
        println!("{}", serde_json::to_string_pretty(&view.items)?);
        return Ok(());
    }

    if view.items.is_empty() {
        println!("{}", empty_message(state.kind, state.filter, view.kind_is_empty()));
        return Ok(());
    }
    for record in &view.items {
        print!("{}", format_record(record));
    }
    println!();
    println!(
        "{} of {} {} shown",
        view.items.len(),
        view.total_in_kind,
        plural(state.kind)
    );
    Ok(())
}

fn empty_message(kind: RecordKind, filter: StatusFilter, kind_is_empty: bool) -> String {
    if kind_is_empty {
        format!("No {} published yet.", plural(kind))
    } else {
        format!("No {} with status {filter}.", plural(kind))
    }
}

fn plural(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Live => "live predictions",
        RecordKind::Combined => "coupons",
    }
}

pub fn cmd_show(ctx: &Context, id: &str) -> Result<()> {
    let board = ctx.open_board()?;
    match board.find(id) {
        Some(record) => print!("{}", format_record(record)),
        None => println!("no record with id {id}"),
    }
    Ok(())
}

fn format_record(record: &Record) -> String {
    match record {
        Record::Live(p) => format_live(p),
        Record::Combined(c) => format_coupon(c),
    }
}

fn format_live(p: &LivePrediction) -> String {
    format!(
        "[{}] {} | {} | {} - {} | {} ({}') | {}\n",
        p.id,
        format_timestamp(p.timestamp),
        p.league,
        p.home_team,
        p.away_team,
        p.prediction,
        p.minute,
        p.status
    )
}

fn format_coupon(c: &CombinedCoupon) -> String {
    let mut out = format!(
        "[{}] {} | {} | total odds {:.2} | potential winnings {:.2} | {}\n",
        c.id,
        format_timestamp(c.timestamp),
        c.title,
        c.total_odds,
        c.potential_winnings,
        c.status
    );
    for (i, bet) in c.bets.iter().enumerate() {
        out.push_str(&format_bet(i, bet));
    }
    out
}

fn format_bet(index: usize, bet: &Bet) -> String {
    format!(
        "    {index}. {} | {} - {} | {} @{:.2} | {}\n",
        bet.league, bet.home_team, bet.away_team, bet.prediction, bet.odds, bet.status
    )
}

fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(ms)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

// ---------------------------------------------------------------------------
// Settle / Bet - status changes
// ---------------------------------------------------------------------------

pub fn cmd_settle(ctx: &Context, id: &str, status: &str) -> Result<()> {
    let status: Status = status.parse()?;
    let mut board = ctx.open_board()?;
    if board.set_status(id, status)? {
        println!("{id}: {status}");
    } else {
        println!("no record with id {id}");
    }
    Ok(())
}

pub fn cmd_bet(ctx: &Context, coupon_id: &str, index: usize, status: &str) -> Result<()> {
    let status: Status = status.parse()?;
    let mut board = ctx.open_board()?;
    if board.set_bet_status(coupon_id, index, status)? {
        println!("{coupon_id} bet {index}: {status}");
    } else {
        println!("no bet {index} on coupon {coupon_id}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Edit / Delete
// ---------------------------------------------------------------------------

pub fn cmd_edit_live(ctx: &Context, id: &str, args: LiveEditArgs) -> Result<()> {
    let mut board = ctx.open_board()?;
    let Some(Record::Live(current)) = board.find(id) else {
        println!("no live prediction with id {id}");
        return Ok(());
    };
    let fields = LiveFields {
        league: args.league.unwrap_or_else(|| current.league.clone()),
        home_team: args.home.unwrap_or_else(|| current.home_team.clone()),
        away_team: args.away.unwrap_or_else(|| current.away_team.clone()),
        prediction: args.prediction.unwrap_or_else(|| current.prediction.clone()),
        minute: args.minute.unwrap_or_else(|| current.minute.clone()),
    };
    board.edit_live(id, fields)?;
    println!("updated {id}");
    Ok(())
}

pub fn cmd_edit_coupon(
    ctx: &Context,
    id: &str,
    title: Option<String>,
    bet_specs: &[String],
) -> Result<()> {
    let mut board = ctx.open_board()?;
    let Some(Record::Combined(current)) = board.find(id) else {
        println!("no coupon with id {id}");
        return Ok(());
    };
    let bets = if bet_specs.is_empty() {
        current.bets.iter().map(BetInput::from).collect()
    } else {
        parse_bets(bet_specs)?
    };
    let draft = CouponDraft {
        title: title.unwrap_or_else(|| current.title.clone()),
        bets,
    };
    board.edit_coupon(id, draft)?;
    if let Some(Record::Combined(coupon)) = board.find(id) {
        println!(
            "updated {id} (total odds {:.2}, potential winnings {:.2})",
            coupon.total_odds, coupon.potential_winnings
        );
    }
    Ok(())
}

pub fn cmd_delete(ctx: &Context, id: &str) -> Result<()> {
    let mut board = ctx.open_board()?;
    if board.delete(id)? {
        println!("deleted {id}");
    } else {
        println!("no record with id {id}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Doctor - diagnostic health check
// ---------------------------------------------------------------------------

pub fn cmd_doctor(ctx: &Context) -> Result<()> {
    println!("tipboard doctor");
    println!("===============\n");

    println!("Version:  {}", tipboard_core::VERSION);
    println!("Config:   {}", ctx.loaded.source);
    println!("Admins:   {}", ctx.loaded.config.admin_emails.join(", "));
    println!();

    // Read-only: opening a Board would discard unreadable data.
    let path = ctx.db_path();
    let storage = path
        .as_ref()
        .ok()
        .map(|p| tipboard_storage::open_storage(p));
    let db_ok = matches!(storage, Some(Ok(_)));
    let db_label = match &path {
        Ok(p) => format!("Database accessible ({})", p.display()),
        Err(_) => "Database accessible".to_string(),
    };
    print_check(&db_label, db_ok, "check the data directory permissions or pass --db");

    let has_admin = !ctx.loaded.config.admin_emails.is_empty();
    print_check(
        "Admin allow-list configured",
        has_admin,
        "add admin_emails to .tipboard/config.toml",
    );

    let records_ok = match &storage {
        Some(Ok(storage)) => {
            let ok = check_stored_records(storage);
            report_session(storage);
            ok
        }
        _ => false,
    };

    println!();
    if db_ok && has_admin && records_ok {
        println!("All checks passed.");
    } else {
        println!("Some checks failed. See suggestions above.");
    }
    Ok(())
}

fn check_stored_records(storage: &SqliteStorage) -> bool {
    const LABEL: &str = "Stored predictions readable";
    let raw = match storage.get(RECORDS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            print_check(LABEL, true, "");
            println!("  [--] nothing stored yet");
            return true;
        }
        Err(e) => {
            print_check(LABEL, false, &format!("{e:#}"));
            return false;
        }
    };

    match decode_collection(&raw) {
        Decoded::Records { records, skipped } => {
            print_check(
                LABEL,
                skipped == 0,
                &format!("{skipped} unreadable records will be dropped on the next change"),
            );
            let live = records.iter().filter(|r| r.kind() == RecordKind::Live).count();
            let coupons = records.len() - live;
            println!("  [--] {live} live predictions, {coupons} coupons stored");
            skipped == 0
        }
        Decoded::Legacy => {
            print_check(
                LABEL,
                false,
                "data uses the legacy layout and will be discarded on the next open",
            );
            false
        }
        Decoded::Corrupt(reason) => {
            print_check(
                LABEL,
                false,
                &format!("{reason}; the data will be discarded on the next open"),
            );
            false
        }
    }
}

fn report_session(storage: &SqliteStorage) {
    let stored = storage.get(SESSION_KEY).ok().flatten();
    match stored.map(|raw| serde_json::from_str::<Session>(&raw)) {
        Some(Ok(s)) => println!("  [--] signed in as {} ({})", s.email, role_label(s.is_admin())),
        Some(Err(_)) => println!("  [--] stored session is unreadable"),
        None => println!("  [--] not signed in"),
    }
}

fn print_check(label: &str, ok: bool, hint: &str) {
    if ok {
        println!("  [ok] {label}");
    } else {
        println!("  [!!] {label}");
        println!("       hint: {hint}");
    }
}
