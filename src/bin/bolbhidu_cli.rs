//!
//! bolbhidu CLI binary
//! -------------------
//! Command-line console for the bolbhidu news and message board backend.
//! In REPL mode it plays the role of the site's pages: log in, publish and
//! edit posts, browse the public feed and the message board. Session state
//! is persisted between runs; any authentication failure clears it and
//! sends the user back to the login prompt.

use std::env;
use std::io::{self, Write};

use anyhow::{Context, Result};

use bolbhidu::cli::{print_messages, print_post_detail, print_posts};
use bolbhidu::client::ApiClient;
use bolbhidu::config;
use bolbhidu::error::ApiError;
use bolbhidu::models::PostDraft;
use bolbhidu::session::SessionStore;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--url <base>] [--session-file <path>] [--user <u> --password <p>] [-c \"<command>\"]\n  {program} --repl [--url <base>] [--session-file <path>]   # start interactive console (default)\n\nFlags:\n  --url <base>             Backend base URL (default: $BOLBHIDU_API_URL or {default_url})\n  --session-file <path>    Session file (default: $BOLBHIDU_SESSION_FILE or ~/.bolbhidu/session.json)\n  --user <u>               Username for automatic login on startup\n  --password <p>           Password for automatic login on startup\n  -c, --command <cmd>      Run a single console command and exit\n  --repl                   Start interactive mode (default when -c is absent)\n  -h, --help               Show this help\n\nConsole commands:\n  login <user> <password>            authenticate and persist the session\n  logout                             drop the persisted session\n  status                             show backend URL and login state\n  posts                              list posts, newest first\n  post <id>                          show one post\n  publish <headline> [| content [| tags]]   create a post (requires login)\n  edit <id> <headline> [| content [| tags]] update a post (requires login)\n  delete <id>                        delete a post (requires login)\n  messages                           list message board entries, newest first\n  send <text>                        post a message to the board\n  help                               show this help\n  quit | exit                        leave the console\n\nExamples:\n  {program} -c \"posts\"\n  {program} --user admin --password secret -c \"publish Budget session opens | Full text here | politics,economy\"\n  {program} --repl\n    > login admin secret\n    > posts",
        program = program,
        default_url = config::DEFAULT_API_URL,
    );
}

fn main() -> Result<()> {
    println!("bolbhidu\n  news & message board console");
    // Initialize tracing subscriber so request traces are visible on the command line
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mut args: Vec<String> = env::args().collect();
    let program = args.remove(0);

    let mut url: Option<String> = None;
    let mut session_file: Option<String> = None;
    let mut user: Option<String> = None;
    let mut password: Option<String> = None;
    let mut command: Option<String> = None;
    let mut repl: bool = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--url" => {
                if i + 1 >= args.len() { eprintln!("--url requires a value"); print_usage(&program); std::process::exit(2); }
                url = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--session-file" => {
                if i + 1 >= args.len() { eprintln!("--session-file requires a value"); print_usage(&program); std::process::exit(2); }
                session_file = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--user" => {
                if i + 1 >= args.len() { eprintln!("--user requires a value"); print_usage(&program); std::process::exit(2); }
                user = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--password" => {
                if i + 1 >= args.len() { eprintln!("--password requires a value"); print_usage(&program); std::process::exit(2); }
                password = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--command" | "-c" => {
                if i + 1 >= args.len() { eprintln!("--command requires a value"); print_usage(&program); std::process::exit(2); }
                command = Some(args[i + 1].clone());
                i += 2; continue;
            }
            "--repl" => { repl = true; i += 1; continue; }
            "-h" | "--help" => {
                print_usage(&program);
                return Ok(());
            }
            unk => {
                eprintln!("Unrecognized argument: {}", unk);
                print_usage(&program);
                std::process::exit(2);
            }
        }
    }

    let base = url.unwrap_or_else(config::api_url);
    let client = ApiClient::new(&base).with_context(|| format!("cannot use backend URL '{}'", base))?;
    let store = SessionStore::new(session_file.map(Into::into).unwrap_or_else(config::session_file));

    // Tokio runtime; one operation in flight at a time
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build Tokio runtime")?;

    // Automatic login on startup when credentials were supplied
    if let (Some(u), Some(p)) = (user.as_deref(), password.as_deref()) {
        match rt.block_on(client.login(u, p)) {
            Ok(session) => {
                store.save(&session).context("login succeeded but the session could not be persisted")?;
                println!("logged in as {} (user id {})", session.username, session.user_id);
            }
            Err(e) => {
                eprintln!("login failed: {}", e.message());
                std::process::exit(1);
            }
        }
    }

    // One-shot command unless --repl asked for the console as well
    if let Some(line) = command {
        if repl { eprintln!("--repl cannot be combined with -c"); std::process::exit(2); }
        return match handle_line(&rt, &client, &store, &line) {
            HandleResult::Failed => std::process::exit(1),
            _ => Ok(()),
        };
    }

    run_repl(rt, client, store)
}

fn run_repl(rt: tokio::runtime::Runtime, client: ApiClient, store: SessionStore) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();
    println!("bolbhidu console. Type 'help' for commands.");
    match store.load() {
        Some(s) => println!("resuming session for {}", s.username),
        None => println!("not logged in"),
    }
    loop {
        input.clear();
        print!("> "); let _ = stdout.flush();
        if stdin.read_line(&mut input).is_err() { break; }
        if input.is_empty() { break; } // EOF
        let line = input.trim();
        if line.is_empty() { continue; }
        match handle_line(&rt, &client, &store, line) {
            HandleResult::Quit => break,
            _ => {}
        }
    }
    Ok(())
}

enum HandleResult {
    Ok,
    Failed,
    Quit,
}

fn handle_line(rt: &tokio::runtime::Runtime, client: &ApiClient, store: &SessionStore, line: &str) -> HandleResult {
    let up = line.to_uppercase();
    if up == "QUIT" || up == "EXIT" { return HandleResult::Quit; }
    if up == "HELP" { print_usage("bolbhidu_cli"); return HandleResult::Ok; }

    if up == "STATUS" {
        println!("backend: {}", client.base());
        match store.load() {
            Some(s) => println!("logged in as {} (user id {}), session file {}", s.username, s.user_id, store.path().display()),
            None => println!("not logged in"),
        }
        return HandleResult::Ok;
    }

    if up.starts_with("LOGIN") {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 3 { eprintln!("usage: login <username> <password>"); return HandleResult::Failed; }
        match rt.block_on(client.login(parts[1], parts[2])) {
            Ok(session) => {
                if let Err(e) = store.save(&session) {
                    eprintln!("login succeeded but the session could not be persisted: {}", e.message());
                    return HandleResult::Failed;
                }
                println!("logged in as {} (user id {})", session.username, session.user_id);
                HandleResult::Ok
            }
            Err(e) => report_error(store, e),
        }
    } else if up == "LOGOUT" {
        match store.clear() {
            Ok(()) => { println!("logged out"); HandleResult::Ok }
            Err(e) => { eprintln!("{}", e.message()); HandleResult::Failed }
        }
    } else if up == "POSTS" {
        let session = store.load();
        match rt.block_on(client.list_posts(session.as_ref())) {
            Ok(posts) => { print_posts(&posts); HandleResult::Ok }
            Err(e) => report_error(store, e),
        }
    } else if up.starts_with("POST ") {
        let id = match parse_id(line, "post") { Some(id) => id, None => return HandleResult::Failed };
        match rt.block_on(client.fetch_post(id)) {
            Ok(post) => { print_post_detail(&post); HandleResult::Ok }
            Err(ApiError::RequestFailed { status: 404, .. }) => {
                eprintln!("Post not found. It might have been deleted or the ID is incorrect.");
                HandleResult::Failed
            }
            Err(e) => report_error(store, e),
        }
    } else if up.starts_with("PUBLISH") {
        let session = match store.require() { Ok(s) => s, Err(e) => return report_error(store, e) };
        let draft = parse_draft(line["publish".len()..].trim());
        match rt.block_on(client.create_post(&session, &draft)) {
            Ok(post) => {
                println!("Post \"{}\" added successfully!", post.headline);
                refresh_posts(rt, client, store);
                HandleResult::Ok
            }
            Err(e) => report_error(store, e),
        }
    } else if up.starts_with("EDIT ") {
        let session = match store.require() { Ok(s) => s, Err(e) => return report_error(store, e) };
        let rest = line["edit".len()..].trim();
        let (id_part, draft_part) = match rest.split_once(char::is_whitespace) {
            Some(split) => split,
            None => { eprintln!("usage: edit <id> <headline> [| content [| tags]]"); return HandleResult::Failed; }
        };
        let id = match id_part.parse::<i64>() {
            Ok(id) => id,
            Err(_) => { eprintln!("usage: edit <id> <headline> [| content [| tags]]"); return HandleResult::Failed; }
        };
        let draft = parse_draft(draft_part.trim());
        match rt.block_on(client.update_post(&session, id, &draft)) {
            Ok(post) => {
                println!("Post \"{}\" updated.", post.headline);
                refresh_posts(rt, client, store);
                HandleResult::Ok
            }
            Err(e) => report_error(store, e),
        }
    } else if up.starts_with("DELETE ") {
        let session = match store.require() { Ok(s) => s, Err(e) => return report_error(store, e) };
        let id = match parse_id(line, "delete") { Some(id) => id, None => return HandleResult::Failed };
        match rt.block_on(client.delete_post(&session, id)) {
            Ok(()) => {
                println!("Post {} deleted.", id);
                refresh_posts(rt, client, store);
                HandleResult::Ok
            }
            Err(e) => report_error(store, e),
        }
    } else if up == "MESSAGES" {
        match rt.block_on(client.list_messages()) {
            Ok(messages) => { print_messages(&messages); HandleResult::Ok }
            Err(e) => report_error(store, e),
        }
    } else if up.starts_with("SEND ") {
        let text = line["send".len()..].trim();
        match rt.block_on(client.create_message(text)) {
            Ok(_) => {
                println!("Message posted.");
                match rt.block_on(client.list_messages()) {
                    Ok(messages) => print_messages(&messages),
                    Err(e) => eprintln!("{}", e.message()),
                }
                HandleResult::Ok
            }
            Err(e) => report_error(store, e),
        }
    } else {
        eprintln!("unknown command: {} (try 'help')", line);
        HandleResult::Failed
    }
}

/// Error sink for every operation. An expired session is cleared here and
/// the user is pointed back at login; everything else stays on screen and
/// the console remains usable.
fn report_error(store: &SessionStore, err: ApiError) -> HandleResult {
    if err.is_auth_expired() {
        if let Err(e) = store.clear() {
            eprintln!("warning: could not clear session: {}", e.message());
        }
        eprintln!("{}", err.message());
        eprintln!("use: login <username> <password>");
    } else {
        eprintln!("{}", err.message());
    }
    HandleResult::Failed
}

/// Re-fetch the list after a successful mutation; server-assigned fields
/// (id, author, timestamps) come from the listing, never from local state.
fn refresh_posts(rt: &tokio::runtime::Runtime, client: &ApiClient, store: &SessionStore) {
    let session = store.load();
    match rt.block_on(client.list_posts(session.as_ref())) {
        Ok(posts) => print_posts(&posts),
        Err(e) => eprintln!("{}", e.message()),
    }
}

fn parse_id(line: &str, command: &str) -> Option<i64> {
    let rest = line[command.len()..].trim();
    match rest.parse::<i64>() {
        Ok(id) => Some(id),
        Err(_) => {
            eprintln!("usage: {} <id>", command);
            None
        }
    }
}

/// `headline | content | tags` with the last two optional.
fn parse_draft(text: &str) -> PostDraft {
    let mut parts = text.splitn(3, '|').map(|s| s.trim().to_string());
    let headline = parts.next().unwrap_or_default();
    let content = parts.next().filter(|s| !s.is_empty());
    let tags = parts.next().filter(|s| !s.is_empty());
    PostDraft { headline, content, tags }
}
