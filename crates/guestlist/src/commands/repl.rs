//! Interactive console: one process, one cookie jar, many commands.

use anyhow::Result;
use clap::Args;
use console::{Style, Term, style};
use guestlist_client::{Error, SessionEvent, SessionStore};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Config, Editor};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use super::accompanies::print_groups;
use super::auth::print_profile;
use super::{ADMIN_EMAIL_ENV, Context, credentials, describe, print_error, print_success};

const EXPIRED_NOTICE: &str = "Session expired. Sign in again with /login.";
use crate::table::{SortColumn, print_guest, print_guests, sort_guests};

/// Arguments for the console command.
#[derive(Args, Debug)]
pub struct ConsoleArgs {
    /// Start without signing in
    #[arg(long)]
    pub no_login: bool,
}

/// Run the console command.
pub async fn run(args: ConsoleArgs, ctx: &Context) -> Result<()> {
    let store = ctx.connect()?;
    let mut console = Console::new(store, ctx.verbose)?;
    console.start(!args.no_login).await?;
    console.run().await
}

enum ControlFlow {
    Continue,
    Exit,
}

/// Console state.
pub struct Console {
    store: SessionStore,
    editor: Editor<(), DefaultHistory>,
    term: Term,
    verbose: bool,
    watcher: Option<JoinHandle<()>>,
}

impl Console {
    pub fn new(store: SessionStore, verbose: bool) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();

        let editor = Editor::with_config(config)?;

        Ok(Self {
            store,
            editor,
            term: Term::stdout(),
            verbose,
            watcher: None,
        })
    }

    /// Restore or establish a session and start watching for expiry.
    async fn start(&mut self, login: bool) -> Result<()> {
        self.watcher = Some(watch_session(&self.store));

        let session = self.store.hydrate().await;
        if session.is_authenticated {
            if let Some(user) = &session.user {
                self.print_dim(&format!("Signed in as {}", user.name));
            }
        } else if login {
            self.login().await;
        }
        Ok(())
    }

    /// Run the console loop.
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        loop {
            let prompt = self.format_prompt();

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }

                    if !line.starts_with('/') {
                        self.print_dim("Type /help for available commands");
                        continue;
                    }

                    match self.handle_slash_command(line).await {
                        Ok(ControlFlow::Continue) => continue,
                        Ok(ControlFlow::Exit) => break,
                        // Reported by the session watcher.
                        Err(e) if is_expired(&e) => continue,
                        Err(e) => {
                            print_error(&e.to_string());
                            continue;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!();
                    self.print_dim("(Interrupted - type /quit to exit)");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(e) => {
                    print_error(&format!("Input error: {}", e));
                    break;
                }
            }
        }

        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        self.print_dim("Goodbye!");
        Ok(())
    }

    async fn handle_slash_command(&mut self, input: &str) -> Result<ControlFlow> {
        let parts: Vec<&str> = input[1..].split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        let args = parts.get(1..).unwrap_or_default();

        match cmd {
            "quit" | "q" | "exit" => return Ok(ControlFlow::Exit),
            "help" | "h" | "?" => self.print_help(),
            "clear" | "cls" => self.term.clear_screen()?,
            "guests" => self.list_guests(args).await?,
            "show" => match args.first() {
                Some(id) => {
                    let guest = self
                        .store
                        .client()
                        .guests()
                        .get(id)
                        .await
                        .map_err(command_error)?;
                    print_guest(&guest);
                }
                None => print_error("Usage: /show <id>"),
            },
            "delete" => match args.first() {
                Some(id) => {
                    self.store
                        .client()
                        .guests()
                        .delete(id)
                        .await
                        .map_err(command_error)?;
                    print_success("Guest deleted");
                }
                None => print_error("Usage: /delete <id>"),
            },
            "accompanies" => {
                let groups = self
                    .store
                    .client()
                    .accompanies()
                    .list()
                    .await
                    .map_err(command_error)?;
                print_groups(&groups);
            }
            "whoami" => match self.store.snapshot().user {
                Some(user) => print_profile(&user),
                None => self.print_dim("Not signed in (use /login)"),
            },
            "login" => self.login().await,
            "logout" => {
                self.store.logout().await;
                print_success("Signed out");
            }
            "" => self.print_dim("Type /help for available commands"),
            _ => {
                print_error(&format!("Unknown command: /{}", cmd));
                self.print_dim("Type /help for available commands");
            }
        }

        Ok(ControlFlow::Continue)
    }

    async fn list_guests(&self, args: &[&str]) -> Result<()> {
        let column = match args.first() {
            Some(name) => match SortColumn::parse(name) {
                Some(column) => Some(column),
                None => {
                    print_error(&format!("Unknown column: {name}"));
                    self.print_dim("Columns: reg-num, name, email, mobile, quota");
                    return Ok(());
                }
            },
            None => None,
        };
        let descending = matches!(args.get(1), Some(&"desc"));

        let mut guests = self
            .store
            .client()
            .guests()
            .list()
            .await
            .map_err(command_error)?;
        if let Some(column) = column {
            sort_guests(&mut guests, column, descending);
        }
        print_guests(&guests);
        Ok(())
    }

    async fn login(&self) {
        let email = std::env::var(ADMIN_EMAIL_ENV).ok().filter(|s| !s.is_empty());
        let credentials = match credentials(email) {
            Ok(credentials) => credentials,
            Err(e) => {
                print_error(&e.to_string());
                return;
            }
        };

        match self.store.login(&credentials).await {
            Ok(session) => match session.user {
                Some(user) => print_success(&format!("Signed in as {}", user.name)),
                None => print_error("Login succeeded but the server did not return a profile"),
            },
            Err(e) => print_error(&e.user_message()),
        }
    }

    fn format_prompt(&self) -> String {
        match self.store.snapshot().user {
            Some(user) => format!("{} ", style(format!("{}>", user.name)).cyan().bold()),
            None => format!("{} ", style("guestlist>").dim()),
        }
    }

    fn print_welcome(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Guestlist Console").bold().cyan());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!("{}", dim.apply_to("Use /help for commands, Ctrl+D to exit."));
        if self.verbose {
            println!(
                "{}",
                dim.apply_to(format!("Server: {}", self.store.client().base_url()))
            );
        }
        println!();
    }

    fn print_help(&self) {
        let dim = Style::new().dim();
        println!();
        println!("{}", style("Available Commands").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!(
            "  {}  - List guests, optionally sorted",
            style("/guests [column] [asc|desc]").cyan()
        );
        println!("  {}  - Show a guest", style("/show <id>").cyan());
        println!("  {}  - Delete a guest", style("/delete <id>").cyan());
        println!(
            "  {}  - List accompanying guests",
            style("/accompanies").cyan()
        );
        println!("  {}  - Show the signed-in admin", style("/whoami").cyan());
        println!("  {}  - Sign in", style("/login").cyan());
        println!("  {}  - Sign out", style("/logout").cyan());
        println!("  {}  - Clear the screen", style("/clear").cyan());
        println!("  {}  - Show this help", style("/help, /h, /?").cyan());
        println!("  {}  - Exit the console", style("/quit, /q").cyan());
        println!();
        println!(
            "{}",
            dim.apply_to("Columns: reg-num, name, email, mobile, quota")
        );
        println!();
    }

    fn print_dim(&self, msg: &str) {
        let dim = Style::new().dim();
        println!("{}", dim.apply_to(msg));
    }
}

/// Like [`describe`], but keeps an expired session recognizable so the
/// console can leave its reporting to the session watcher.
fn command_error(error: Error) -> anyhow::Error {
    if error.is_session_expired() {
        anyhow::Error::new(error)
    } else {
        describe(error)
    }
}

fn is_expired(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<Error>()
        .is_some_and(Error::is_session_expired)
}

/// Report session transitions that happen behind a command's back.
fn watch_session(store: &SessionStore) -> JoinHandle<()> {
    let mut events = store.events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(SessionEvent::Expired) => {
                    let yellow = Style::new().yellow();
                    eprintln!(
                        "{}",
                        yellow.apply_to(EXPIRED_NOTICE)
                    );
                }
                Ok(event) => tracing::debug!(?event, "session event"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "session events lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
