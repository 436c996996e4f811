//! End-to-end resolution tests over realistic command trees.

use command_chain_core::{
    ArgValue, ChainError, ChainTree, Following, HandlerError, Interval, Literal, NoArgs, Numeric,
    Optional, Page, Priority, ResolveError, Switch, Text, Url, execute, help, resolve,
};

/// A stand-in for the platform's caller context.
#[derive(Debug)]
struct Session {
    sender: String,
    replies: Vec<String>,
}

impl Session {
    fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
            replies: Vec::new(),
        }
    }
}

/// Builds a small reminder-bot command family exercising most of the
/// catalogue:
///
/// ```text
/// root ─ remind ─ [interval] ─ [text...]
///      ├ list ──┬ [Page:#]
///      │        └ (asc|desc)
///      ├ set ─── [#] ─ (none)
///      └ link ── [url] ─ (none)
/// ```
fn reminder_tree() -> ChainTree<Session> {
    let mut tree: ChainTree<Session> = ChainTree::new();
    let root = tree.root();

    let remind = tree.add_child(root, Literal::new("remind")).unwrap();
    let interval = tree.add_child(remind, Interval).unwrap();
    let message = tree.add_child(interval, Following).unwrap();
    tree.set_description(message, "schedule a reminder").unwrap();
    tree.set_handler(
        message,
        |session: &mut Session, args: &[ArgValue]| -> Result<(), HandlerError> {
            let millis = args[1].as_number().ok_or("expected interval")?;
            let text = args[2].as_text().ok_or("expected message")?;
            session.replies.push(format!("in {millis}ms: {text}"));
            Ok(())
        },
    )
    .unwrap();

    let list = tree.add_child(root, Literal::new("list")).unwrap();
    let page = tree.add_child(list, Page).unwrap();
    tree.set_description(page, "browse reminders").unwrap();
    tree.set_handler(
        page,
        |session: &mut Session, args: &[ArgValue]| -> Result<(), HandlerError> {
            let page = args[1].as_page().ok_or("expected page")?;
            session.replies.push(format!("page {page}"));
            Ok(())
        },
    )
    .unwrap();
    let order = tree.add_child(list, Switch::new(["asc", "desc"])).unwrap();
    tree.set_handler(
        order,
        |session: &mut Session, args: &[ArgValue]| -> Result<(), HandlerError> {
            let order = args[1].as_text().ok_or("expected order")?;
            session.replies.push(format!("sorted {order}"));
            Ok(())
        },
    )
    .unwrap();

    let set = tree.add_child(root, Literal::new("set")).unwrap();
    let value = tree.add_child(set, Numeric).unwrap();
    let set_leaf = tree.add_child(value, NoArgs).unwrap();
    tree.set_handler(
        set_leaf,
        |session: &mut Session, args: &[ArgValue]| -> Result<(), HandlerError> {
            let value = args[1].as_number().ok_or("expected value")?;
            session.replies.push(format!("set to {value}"));
            Ok(())
        },
    )
    .unwrap();

    let link = tree.add_child(root, Literal::new("link")).unwrap();
    let target = tree.add_child(link, Url).unwrap();
    tree.add_child(target, NoArgs).unwrap();

    tree
}

#[test]
fn literal_then_numeric_then_none_resolves() {
    let tree = reminder_tree();
    let session = Session::new("ava");

    let invocation = resolve(&tree, &session, &["set", "42"]).unwrap();
    assert_eq!(
        invocation.args(),
        &[ArgValue::Text("set".into()), ArgValue::Number(42.0)]
    );
    assert_eq!(invocation.priority(), Priority::High);
    assert_eq!(invocation.path(), "set [#] (none)");
}

#[test]
fn execute_runs_the_bound_handler() {
    let tree = reminder_tree();
    let mut session = Session::new("ava");

    execute(&tree, &mut session, &["remind", "5s", "stand", "up"]).unwrap();
    execute(&tree, &mut session, &["list", "page:2"]).unwrap();
    execute(&tree, &mut session, &["LIST", "DESC"]).unwrap();

    assert_eq!(
        session.replies,
        vec!["in 5000ms: stand up", "page 2", "sorted desc"]
    );
    assert_eq!(session.sender, "ava");
}

#[test]
fn page_defaults_when_input_stops_early() {
    let tree = reminder_tree();
    let mut session = Session::new("ava");

    execute(&tree, &mut session, &["list"]).unwrap();
    assert_eq!(session.replies, vec!["page 1"]);
}

#[test]
fn unknown_command_is_no_match() {
    let tree = reminder_tree();
    let session = Session::new("ava");

    let err = resolve(&tree, &session, &["destroy", "everything"]).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch));
    assert!(err.is_user_facing());
}

#[test]
fn trailing_tokens_kill_completed_shapes() {
    let tree = reminder_tree();
    let session = Session::new("ava");

    let err = resolve(&tree, &session, &["set", "42", "extra"]).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch));
}

#[test]
fn url_chain_requires_an_absolute_url() {
    let tree = reminder_tree();
    let session = Session::new("ava");

    let invocation = resolve(&tree, &session, &["link", "https://example.com/x"]).unwrap();
    assert_eq!(
        invocation.args(),
        &[
            ArgValue::Text("link".into()),
            ArgValue::Url("https://example.com/x".into())
        ]
    );

    let err = resolve(&tree, &session, &["link", "example.com"]).unwrap_err();
    assert!(matches!(err, ResolveError::NoMatch));
}

#[test]
fn help_lists_children_of_a_prefix() {
    let tree = reminder_tree();
    let session = Session::new("ava");

    let lines = help(&tree, &session, &["list"]).unwrap();
    assert_eq!(
        lines,
        vec![
            "list [Page:#] : browse reminders".to_string(),
            "list (asc|desc)".to_string()
        ]
    );
}

#[test]
fn help_on_empty_input_lists_every_chain() {
    let tree = reminder_tree();
    let session = Session::new("ava");

    // Breadth-first flattening: shallower chains list first.
    let lines = help(&tree, &session, &[] as &[&str]).unwrap();
    assert_eq!(
        lines,
        vec![
            "list [Page:#] : browse reminders".to_string(),
            "list (asc|desc)".to_string(),
            "remind [interval] [text...] : schedule a reminder".to_string(),
            "set [#] (none)".to_string(),
            "link [url] (none)".to_string(),
        ]
    );
}

#[test]
fn optional_default_fills_in_for_missing_argument() {
    let mut tree: ChainTree<Session> = ChainTree::new();
    let greet = tree.add_child(tree.root(), Literal::new("greet")).unwrap();
    let name = tree
        .add_child(greet, Optional::new(Text::new("name"), "everyone"))
        .unwrap();
    let leaf = tree.add_child(name, NoArgs).unwrap();
    tree.set_handler(
        leaf,
        |session: &mut Session, args: &[ArgValue]| -> Result<(), HandlerError> {
            let name = args[1].as_text().ok_or("expected name")?;
            session.replies.push(format!("hello {name}"));
            Ok(())
        },
    )
    .unwrap();

    let mut session = Session::new("ava");
    execute(&tree, &mut session, &["greet"]).unwrap();
    execute(&tree, &mut session, &["greet", "bob"]).unwrap();
    assert_eq!(session.replies, vec!["hello everyone", "hello bob"]);
}

#[test]
fn dominance_prefers_the_specific_completion() {
    // Both chains complete on "desc": the switch at High, the free-text
    // fallback at Low. The High completion eliminates the Low one.
    let mut tree: ChainTree<Session> = ChainTree::new();
    let order = tree
        .add_child(tree.root(), Switch::new(["asc", "desc"]))
        .unwrap();
    tree.add_child(order, NoArgs).unwrap();
    let word = tree.add_child(tree.root(), Text::new("word")).unwrap();
    tree.add_child(word, NoArgs).unwrap();

    let session = Session::new("ava");
    let invocation = resolve(&tree, &session, &["desc"]).unwrap();
    assert_eq!(invocation.args(), &[ArgValue::Text("desc".into())]);
    assert_eq!(invocation.priority(), Priority::High);
}

#[test]
fn construction_rejects_ambiguous_structure() {
    let mut tree: ChainTree<Session> = ChainTree::new();
    tree.add_child(tree.root(), Switch::new(["asc", "desc"]))
        .unwrap();

    let err = tree
        .add_child(tree.root(), Switch::new(["desc", "down"]))
        .unwrap_err();
    assert!(matches!(err, ChainError::CannotCoexist { .. }));

    let tail = tree.add_child(tree.root(), Following).unwrap();
    let err = tree.add_child(tail, NoArgs).unwrap_err();
    assert!(matches!(err, ChainError::CannotExtend { .. }));
}

#[test]
fn custom_matcher_reads_the_context() {
    use command_chain_core::{Matcher, MatcherError, MatcherKind, ResolutionState};

    /// Matches the literal token "me" and appends the sender's name.
    struct Sender;

    impl Matcher<Session> for Sender {
        fn describe(&self) -> String {
            "[me]".to_string()
        }

        fn kind(&self) -> MatcherKind {
            MatcherKind::Custom
        }

        fn attempt(
            &self,
            state: &mut ResolutionState<'_, Session>,
        ) -> Result<Priority, MatcherError> {
            if state.peek() != Some("me") {
                return Ok(Priority::None);
            }
            let sender = state.context().sender.clone();
            state.take();
            state.push_arg(ArgValue::Text(sender));
            Ok(Priority::High)
        }
    }

    let mut tree: ChainTree<Session> = ChainTree::new();
    let whois = tree.add_child(tree.root(), Literal::new("whois")).unwrap();
    let me = tree.add_child(whois, Sender).unwrap();
    tree.add_child(me, NoArgs).unwrap();

    let session = Session::new("ava");
    let invocation = resolve(&tree, &session, &["whois", "me"]).unwrap();
    assert_eq!(
        invocation.args(),
        &[ArgValue::Text("whois".into()), ArgValue::Text("ava".into())]
    );
}

#[test]
fn failing_matcher_surfaces_as_a_fault() {
    use command_chain_core::{Matcher, MatcherError, MatcherKind, ResolutionState};

    /// A matcher whose external lookup always fails.
    struct Permission;

    impl Matcher<Session> for Permission {
        fn describe(&self) -> String {
            "[perm]".to_string()
        }

        fn kind(&self) -> MatcherKind {
            MatcherKind::Custom
        }

        fn attempt(
            &self,
            _state: &mut ResolutionState<'_, Session>,
        ) -> Result<Priority, MatcherError> {
            Err(MatcherError::new("[perm]", "permission store offline"))
        }
    }

    let mut tree: ChainTree<Session> = ChainTree::new();
    let admin = tree.add_child(tree.root(), Literal::new("admin")).unwrap();
    let perm = tree.add_child(admin, Permission).unwrap();
    tree.add_child(perm, NoArgs).unwrap();

    let session = Session::new("ava");
    let err = resolve(&tree, &session, &["admin", "reboot"]).unwrap_err();
    assert!(matches!(err, ResolveError::Matcher(_)));
    assert!(!err.is_user_facing());
    assert!(err.to_string().contains("permission store offline"));

    let err = help(&tree, &session, &["admin", "reboot"]).unwrap_err();
    assert!(matches!(err, ResolveError::Matcher(_)));
    assert!(!err.is_user_facing());
}

#[test]
fn handler_failure_is_distinguished_from_no_match() {
    let mut tree: ChainTree<Session> = ChainTree::new();
    let fail = tree.add_child(tree.root(), Literal::new("fail")).unwrap();
    let leaf = tree.add_child(fail, NoArgs).unwrap();
    tree.set_handler(
        leaf,
        |_: &mut Session, _: &[ArgValue]| -> Result<(), HandlerError> {
            Err(HandlerError::from("backend unavailable"))
        },
    )
    .unwrap();

    let mut session = Session::new("ava");
    let err = execute(&tree, &mut session, &["fail"]).unwrap_err();
    assert!(matches!(err, ResolveError::Handler(_)));
    assert!(!err.is_user_facing());
    assert!(err.to_string().contains("backend unavailable"));
}
