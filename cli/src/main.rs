//! Playground binary for the chain resolution engine.
//!
//! Builds a demonstration chat-bot command tree covering the whole matcher
//! catalogue and resolves command lines against it. This is a development
//! and debugging front end; the real platform dispatcher lives elsewhere and
//! consumes the library directly.

use clap::{Args, Parser, Subcommand};
use command_chain_core::{
    ArgValue, ChainError, ChainTree, Following, HandlerError, Interval, Literal, NoArgs, Numeric,
    Optional, Page, Switch, Text, Url, execute, help, resolve,
};
use tracing_subscriber::EnvFilter;

/// Caller context handed through resolution to the demo handlers.
#[derive(Debug, Default)]
struct Session {
    sender: String,
    counter: f64,
    replies: Vec<String>,
}

#[derive(Debug, Parser)]
#[command(name = "chain-resolve")]
#[command(about = "Resolve command lines against a demonstration chain tree")]
struct Cli {
    /// Name reported as the command sender.
    #[arg(long, default_value = "demo")]
    sender: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a tokenized line and run the matched handler.
    Run(TokensArgs),
    /// Resolve a tokenized line and print the match without running it.
    Resolve(ResolveArgs),
    /// List every completion reachable from a (possibly empty) prefix.
    Complete(TokensArgs),
}

#[derive(Debug, Args)]
struct TokensArgs {
    /// Whitespace-split tokens of the input line.
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Whitespace-split tokens of the input line.
    tokens: Vec<String>,

    /// Print the match as JSON instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let tree = match demo_tree() {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };
    tracing::debug!(nodes = tree.len(), "demo tree built");

    let mut session = Session {
        sender: cli.sender,
        ..Session::default()
    };

    let result = match cli.command {
        Command::Run(args) => run_line(&tree, &mut session, &args.tokens),
        Command::Resolve(args) => resolve_line(&tree, &session, &args),
        Command::Complete(args) => complete_line(&tree, &session, &args.tokens),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_line(
    tree: &ChainTree<Session>,
    session: &mut Session,
    tokens: &[String],
) -> Result<(), String> {
    match execute(tree, session, tokens) {
        Ok(()) => {
            for reply in &session.replies {
                println!("{reply}");
            }
            Ok(())
        }
        // Expected conditions render as the reply the bot would send.
        Err(err) if err.is_user_facing() => {
            println!("{err}");
            Ok(())
        }
        Err(err) => Err(err.to_string()),
    }
}

fn resolve_line(
    tree: &ChainTree<Session>,
    session: &Session,
    args: &ResolveArgs,
) -> Result<(), String> {
    match resolve(tree, session, &args.tokens) {
        Ok(invocation) => {
            if args.json {
                let report = serde_json::json!({
                    "path": invocation.path(),
                    "priority": invocation.priority(),
                    "args": invocation.args(),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?
                );
            } else {
                println!("matched: {}", invocation.path());
                for arg in invocation.args() {
                    println!("  {arg}");
                }
            }
            Ok(())
        }
        Err(err) if err.is_user_facing() => {
            println!("{err}");
            Ok(())
        }
        Err(err) => Err(err.to_string()),
    }
}

fn complete_line(
    tree: &ChainTree<Session>,
    session: &Session,
    tokens: &[String],
) -> Result<(), String> {
    let lines = help(tree, session, tokens).map_err(|e| e.to_string())?;
    if lines.is_empty() {
        println!("no completions");
        return Ok(());
    }
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn reply(session: &mut Session, text: String) {
    session.replies.push(text);
}

/// The demonstration command family:
///
/// ```text
/// root ─ remind ─ [interval] ─ [text...]
///      ├ list ──┬ [Page:#]
///      │        └ (asc|desc)
///      ├ set ─── [#] ─ (none)
///      ├ link ── [url] ─ (none)
///      ├ greet ─ [name]? ─ (none)
///      └ say ─── [text...]
/// ```
fn demo_tree() -> Result<ChainTree<Session>, ChainError> {
    let mut tree: ChainTree<Session> = ChainTree::new();
    let root = tree.root();

    let remind = tree.add_child(root, Literal::new("remind"))?;
    let interval = tree.add_child(remind, Interval)?;
    let message = tree.add_child(interval, Following)?;
    tree.set_description(message, "schedule a reminder")?;
    tree.set_handler(message, handle_remind)?;

    let list = tree.add_child(root, Literal::new("list"))?;
    let page = tree.add_child(list, Page)?;
    tree.set_description(page, "browse reminders by page")?;
    tree.set_handler(page, handle_list_page)?;
    let order = tree.add_child(list, Switch::new(["asc", "desc"]))?;
    tree.set_description(order, "list reminders in order")?;
    tree.set_handler(order, handle_list_order)?;

    let set = tree.add_child(root, Literal::new("set"))?;
    let value = tree.add_child(set, Numeric)?;
    let set_leaf = tree.add_child(value, NoArgs)?;
    tree.set_description(set_leaf, "set the counter")?;
    tree.set_handler(set_leaf, handle_set)?;

    let link = tree.add_child(root, Literal::new("link"))?;
    let target = tree.add_child(link, Url)?;
    let link_leaf = tree.add_child(target, NoArgs)?;
    tree.set_description(link_leaf, "attach a link")?;
    tree.set_handler(link_leaf, handle_link)?;

    let greet = tree.add_child(root, Literal::new("greet"))?;
    let name = tree.add_child(greet, Optional::new(Text::new("name"), "everyone"))?;
    let greet_leaf = tree.add_child(name, NoArgs)?;
    tree.set_description(greet_leaf, "greet someone")?;
    tree.set_handler(greet_leaf, handle_greet)?;

    let say = tree.add_child(root, Literal::new("say"))?;
    let text = tree.add_child(say, Following)?;
    tree.set_description(text, "echo a message")?;
    tree.set_handler(text, handle_say)?;

    Ok(tree)
}

fn handle_remind(session: &mut Session, args: &[ArgValue]) -> Result<(), HandlerError> {
    let millis = args[1].as_number().ok_or("expected an interval")?;
    let message = args[2].as_text().ok_or("expected a message")?;
    let text = format!("reminder in {millis}ms: {message}");
    reply(session, text);
    Ok(())
}

fn handle_list_page(session: &mut Session, args: &[ArgValue]) -> Result<(), HandlerError> {
    let page = args[1].as_page().ok_or("expected a page")?;
    reply(session, format!("reminders, page {page}"));
    Ok(())
}

fn handle_list_order(session: &mut Session, args: &[ArgValue]) -> Result<(), HandlerError> {
    let order = args[1].as_text().ok_or("expected an order")?;
    reply(session, format!("reminders, {order}ending"));
    Ok(())
}

fn handle_set(session: &mut Session, args: &[ArgValue]) -> Result<(), HandlerError> {
    session.counter = args[1].as_number().ok_or("expected a value")?;
    let text = format!("counter set to {}", session.counter);
    reply(session, text);
    Ok(())
}

fn handle_link(session: &mut Session, args: &[ArgValue]) -> Result<(), HandlerError> {
    let url = args[1].as_url().ok_or("expected a url")?.to_string();
    reply(session, format!("linked {url}"));
    Ok(())
}

fn handle_greet(session: &mut Session, args: &[ArgValue]) -> Result<(), HandlerError> {
    let name = args[1].as_text().ok_or("expected a name")?.to_string();
    reply(session, format!("hello {name}!"));
    Ok(())
}

fn handle_say(session: &mut Session, args: &[ArgValue]) -> Result<(), HandlerError> {
    let text = args[1].as_text().ok_or("expected text")?.to_string();
    let line = format!("<{}> {}", session.sender, text);
    reply(session, line);
    Ok(())
}
