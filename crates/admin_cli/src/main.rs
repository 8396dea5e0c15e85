use std::{error::Error, io::Write, path::PathBuf, sync::Arc};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, LocalStore};
use migration::MigratorTrait;
use sea_orm::Database;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "easymoney_admin")]
#[command(about = "Admin utilities for easyMoney (profiles, backups, reset)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./easymoney.db?mode=rwc"
    )]
    database_url: String,

    /// Use the single-profile local store at this path instead of the database.
    #[arg(long)]
    local: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    /// Write the backup document of a profile.
    Export(ExportArgs),
    /// Replace the budget of a profile with a backup document.
    Import(ImportArgs),
    /// Print the monthly report of a profile.
    Report(ProfileArg),
    /// Delete every profile and record the reset time.
    Reset(ConfirmArg),
    /// Show the last reset time.
    Status,
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    List,
    Create(UserCreateArgs),
    Delete(UserDeleteArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "USD")]
    currency: String,
    #[arg(long, default_value = "system")]
    theme: String,
}

#[derive(Args, Debug)]
struct UserDeleteArgs {
    id: Uuid,
    #[command(flatten)]
    confirm: ConfirmArg,
}

#[derive(Args, Debug)]
struct ProfileArg {
    id: Uuid,
}

#[derive(Args, Debug)]
struct ExportArgs {
    id: Uuid,
    /// Output file; defaults to `budget-{name}-{date}.json` in the current directory.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ImportArgs {
    id: Uuid,
    file: PathBuf,
}

#[derive(Args, Debug)]
struct ConfirmArg {
    /// Do not ask for confirmation.
    #[arg(long)]
    yes: bool,
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Ask a yes/no question on stderr; only `y` confirms.
fn confirm(prompt: &str) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(format!("{prompt} [y/N] "))
    )?;
    out.flush()?;

    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        let answer = match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Char(_) | KeyCode::Enter | KeyCode::Esc => false,
            _ => continue,
        };
        execute!(out, Print(if answer { "y\r\n" } else { "n\r\n" }))?;
        out.flush()?;
        return Ok(answer);
    }
}

async fn connect_engine(cli: &Cli) -> Result<Engine, Box<dyn Error + Send + Sync>> {
    if let Some(path) = &cli.local {
        let store = LocalStore::open(path.clone()).await?;
        return Ok(Engine::builder().store(Arc::new(store)).build().await?);
    }

    let db = Database::connect(&cli.database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(Engine::builder().database(db).build().await?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let engine = connect_engine(&cli).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::List,
        }) => {
            for user in engine.get_users().await? {
                println!(
                    "{}  {:<30} {}  income {}",
                    user.id,
                    user.name,
                    user.currency,
                    user.income.format(&user.currency)
                );
            }
        }
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let user = engine
                .create_user(&args.name, Some(&args.currency), Some(&args.theme))
                .await?;
            println!("created user: {} ({})", user.name, user.id);
        }
        Command::User(User {
            command: UserCommand::Delete(args),
        }) => {
            if !args.confirm.yes && !confirm(&format!("Delete user {} and all its data?", args.id))? {
                eprintln!("aborted");
                std::process::exit(1);
            }
            engine.delete_user(args.id).await?;
            println!("deleted user: {}", args.id);
        }
        Command::Export(args) => {
            let Some(user) = engine.get_user(args.id).await? else {
                eprintln!("user not found: {}", args.id);
                std::process::exit(1);
            };
            let document = engine.export_data(args.id).await?;
            let path = args.output.unwrap_or_else(|| {
                PathBuf::from(engine.export_file_name(&user, Utc::now().date_naive()))
            });
            std::fs::write(&path, document.to_json_pretty()?)?;
            println!("exported {} expenses to {}", document.expenses.len(), path.display());
        }
        Command::Import(args) => {
            let json = std::fs::read_to_string(&args.file)?;
            if let Err(err) = engine.import_data(args.id, &json).await {
                eprintln!("{err}");
                std::process::exit(2);
            }
            println!("imported {} into {}", args.file.display(), args.id);
        }
        Command::Report(args) => {
            let report = engine.report(args.id, Utc::now().date_naive()).await?;
            print!("{report}");
        }
        Command::Reset(args) => {
            if !args.yes && !confirm("Delete ALL profiles and data?")? {
                eprintln!("aborted");
                std::process::exit(1);
            }
            let now = Utc::now();
            engine.reset(now).await?;
            println!("reset done at {now}");
        }
        Command::Status => match engine.status().await?.last_reset {
            Some(at) => println!("last reset: {at}"),
            None => println!("never reset"),
        },
    }

    Ok(())
}
