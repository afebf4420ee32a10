mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tipboard", version, about = "Publish and follow match predictions")]
struct Cli {
    /// Database file (defaults to $TIPBOARD_DB or the data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in; allow-listed emails get the admin role
    Login { email: String },
    /// Sign out
    Logout,
    /// Show who is signed in
    Whoami,
    /// Publish a live prediction or a combined coupon
    #[command(subcommand)]
    Add(AddCommand),
    /// List records of one kind
    List {
        /// live or combined
        #[arg(long, default_value = "live")]
        kind: String,
        /// all, pending, won or lost
        #[arg(long, default_value = "all")]
        status: String,
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one record
    Show { id: String },
    /// Set a record's status (pending, won, lost)
    Settle { id: String, status: String },
    /// Set the status of one bet within a coupon
    Bet {
        coupon_id: String,
        index: usize,
        status: String,
    },
    /// Edit a published record
    #[command(subcommand)]
    Edit(EditCommand),
    /// Delete a record
    Delete { id: String },
    /// Diagnostic health check
    Doctor,
}

#[derive(Subcommand)]
enum AddCommand {
    /// Publish a live match prediction
    Live(LiveArgs),
    /// Publish a combined coupon
    Coupon(CouponArgs),
}

#[derive(Subcommand)]
enum EditCommand {
    /// Edit a live prediction; omitted fields keep their value
    Live {
        id: String,
        #[command(flatten)]
        fields: LiveEditArgs,
    },
    /// Edit a coupon; without --bet the current bets are kept
    Coupon {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// league|home|away|prediction|odds (repeatable)
        #[arg(long = "bet")]
        bets: Vec<String>,
    },
}

#[derive(Args)]
pub struct LiveArgs {
    #[arg(long)]
    pub league: String,
    #[arg(long)]
    pub home: String,
    #[arg(long)]
    pub away: String,
    #[arg(long)]
    pub prediction: String,
    #[arg(long)]
    pub minute: String,
}

#[derive(Args)]
pub struct LiveEditArgs {
    #[arg(long)]
    pub league: Option<String>,
    #[arg(long)]
    pub home: Option<String>,
    #[arg(long)]
    pub away: Option<String>,
    #[arg(long)]
    pub prediction: Option<String>,
    #[arg(long)]
    pub minute: Option<String>,
}

#[derive(Args)]
pub struct CouponArgs {
    #[arg(long)]
    pub title: String,
    /// league|home|away|prediction|odds (repeatable)
    #[arg(long = "bet", required = true)]
    pub bets: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let loaded = match tipboard_core::config::load_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("tipboard: {e:#}");
            std::process::exit(1);
        }
    };
    init_tracing(loaded.config.log.as_deref());

    let ctx = commands::Context {
        db: cli.db,
        loaded,
    };

    let result = match cli.command {
        Command::Login { email } => commands::cmd_login(&ctx, &email),
        Command::Logout => commands::cmd_logout(&ctx),
        Command::Whoami => commands::cmd_whoami(&ctx),
        Command::Add(AddCommand::Live(args)) => commands::cmd_add_live(&ctx, args),
        Command::Add(AddCommand::Coupon(args)) => commands::cmd_add_coupon(&ctx, args),
        Command::List { kind, status, json } => commands::cmd_list(&ctx, &kind, &status, json),
        Command::Show { id } => commands::cmd_show(&ctx, &id),
        Command::Settle { id, status } => commands::cmd_settle(&ctx, &id, &status),
        Command::Bet {
            coupon_id,
            index,
            status,
        } => commands::cmd_bet(&ctx, &coupon_id, index, &status),
        Command::Edit(EditCommand::Live { id, fields }) => {
            commands::cmd_edit_live(&ctx, &id, fields)
        }
        Command::Edit(EditCommand::Coupon { id, title, bets }) => {
            commands::cmd_edit_coupon(&ctx, &id, title, &bets)
        }
        Command::Delete { id } => commands::cmd_delete(&ctx, &id),
        Command::Doctor => commands::cmd_doctor(&ctx),
    };

    if let Err(e) = result {
        eprintln!("tipboard: {e:#}");
        std::process::exit(1);
    }
}

/// Log to stderr. `TIPBOARD_LOG` wins over the config file; default is `warn`.
fn init_tracing(config_filter: Option<&str>) {
    let filter = EnvFilter::try_from_env("TIPBOARD_LOG")
        .ok()
        .or_else(|| config_filter.and_then(|f| EnvFilter::try_new(f).ok()))
        .unwrap_or_else(|| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
