//! Blog Post Workflow
//!
//! This example walks a blog post through a small publishing workflow.
//!
//! Key concepts:
//! - One state field per record, declared with `fsm_record!`
//! - Multi-source transitions and the wildcard source
//! - A handler group choosing one member by source and guard
//! - Listeners notified before and after every state change
//! - Query predicates over records that were never bound
//!
//! Run with: cargo run --example blog_workflow

use fieldfsm::builder::{simple_transition, transition, HandlerGroup};
use fieldfsm::core::{Guard, Handler, HandlerCall, Invocation, Signature, StateValue};
use fieldfsm::{call_args, fsm_record, EventKind, TransitionRegistry};
use serde_json::Value;

struct BlogPost {
    state: StateValue,
    title: String,
    audit: Vec<String>,
}

fsm_record!(BlogPost {
    state: [state],
    plain: [title, audit],
});

/// Owner shared by the members of the `publish` group.
#[derive(Clone)]
struct Editor {
    name: &'static str,
}

// Pure guard - only priorities 1 and 2 may publish
fn priority_allowed(inv: &Invocation<'_, BlogPost>) -> bool {
    matches!(inv.arg(0).and_then(Value::as_i64), Some(1) | Some(2))
}

fn audited(action: &'static str) -> Handler<BlogPost> {
    Handler::new(
        Signature::positional(1),
        move |call: &mut HandlerCall<'_, BlogPost>| {
            let editor = call.owner::<Editor>().map_or("unknown", |e| e.name);
            let priority = call.arg(0).cloned().unwrap_or(Value::Null);
            call.record_mut()
                .audit
                .push(format!("{editor} {action} (priority {priority})"));
            Ok(())
        },
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = TransitionRegistry::<BlogPost>::builder()
        .transition("hide", simple_transition(["new", "published"], "hidden"))
        .transition("moderate", simple_transition("*", "moderated"))
        .transition(
            "publish",
            transition()
                .target("published")
                .condition(Guard::new(Signature::positional(1), priority_allowed))
                .group(
                    HandlerGroup::new()
                        .owner(Editor { name: "alice" })
                        .member(
                            "first_publish",
                            transition().source("new").handler(audited("published")),
                        )
                        .member(
                            "unhide",
                            transition().source("hidden").handler(audited("restored")),
                        ),
                ),
        )
        .build()?;

    registry.listen(EventKind::AfterStateChange, |post: &BlogPost, change| {
        println!(
            "'{}' moved {:?} -> {:?}",
            post.title, change.source, change.target
        );
    });

    let mut post = BlogPost {
        state: Some("new".into()),
        title: "Hello, world".into(),
        audit: Vec::new(),
    };

    let mut publish = registry.bind("publish", &mut post)?;
    println!("can publish with priority 3: {}", publish.can_proceed(&call_args!(3))?);
    publish.set(&call_args!(1))?;

    registry.bind("hide", &mut post)?.set(&call_args!())?;
    registry.bind("publish", &mut post)?.set(&call_args!(2))?;

    for line in &post.audit {
        println!("audit: {line}");
    }

    let published = registry.query("publish")?;
    let archive = vec![post];
    let live = archive.iter().filter(|p| published.matches(*p)).count();
    println!("{live} of {} posts are live", archive.len());

    println!("{}", serde_json::to_string_pretty(&registry.describe())?);
    Ok(())
}
