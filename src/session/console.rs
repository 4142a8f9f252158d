//! Interactive console
//!
//! Reads line commands from stdin while a renderer task per list prints every
//! state its controller publishes. Commands run on their own tasks so the
//! feedback stream keeps draining while requests are in flight.

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
    render::{render_analytics, render_feedback, render_list, render_payouts, render_stats, render_toasts},
};
use crate::actions::AdminActions;
use crate::feedback::FeedbackQueue;
use crate::lists::resources::{Broadcasts, Tasks, Users, Withdrawals};
use crate::lists::{ControllerRegistry, ListKind, ListState, Resource};
use std::error::Error;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio::task::JoinHandle;

const HELP: &str = "\
Commands:
  reload <list>                  reload a list
  next <list> | prev <list>      move one page forward or back
  page <list> <delta>            move by <delta> pages (never below page 1)
  filter <list> <name> [value]   set a filter; omit the value to clear it
  toasts                         show visible notifications
  dismiss <id-prefix>            close a notification early
  stats | analytics | payouts    load dashboard figures
  help | quit
Lists: tasks, users, withdrawals, broadcasts";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Reload(ListKind),
    Page(ListKind, i64),
    Filter {
        list: ListKind,
        name: String,
        value: String,
    },
    Toasts,
    Dismiss(String),
    Stats,
    Analytics,
    Payouts,
    Help,
    Quit,
}

fn parse_list(word: Option<&str>) -> Result<ListKind, String> {
    let word = word.ok_or("Missing list name (tasks, users, withdrawals, broadcasts)")?;
    ListKind::from_str(word).map_err(|_| format!("Unknown list: {}", word))
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("Empty command".to_string());
        };

        match verb.to_lowercase().as_str() {
            "reload" => Ok(Self::Reload(parse_list(words.next())?)),
            "next" => Ok(Self::Page(parse_list(words.next())?, 1)),
            "prev" => Ok(Self::Page(parse_list(words.next())?, -1)),
            "page" => {
                let list = parse_list(words.next())?;
                let delta = words
                    .next()
                    .ok_or("Missing page delta")?
                    .parse::<i64>()
                    .map_err(|e| format!("Invalid page delta: {}", e))?;
                Ok(Self::Page(list, delta))
            }
            "filter" => {
                let list = parse_list(words.next())?;
                let name = words.next().ok_or("Missing filter name")?.to_string();
                let value = words.collect::<Vec<_>>().join(" ");
                Ok(Self::Filter { list, name, value })
            }
            "toasts" => Ok(Self::Toasts),
            "dismiss" => Ok(Self::Dismiss(
                words.next().ok_or("Missing notification id")?.to_string(),
            )),
            "stats" => Ok(Self::Stats),
            "analytics" => Ok(Self::Analytics),
            "payouts" => Ok(Self::Payouts),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("Unknown command: {} (type `help`)", other)),
        }
    }
}

/// Prints a list whenever its controller publishes. Runs apart from the
/// request path, so a rendering panic only ends this task.
fn spawn_renderer<R: Resource>(mut states: watch::Receiver<ListState<R::Item>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = states.borrow_and_update().clone();
            if state.loading {
                println!("{}: loading page {}...", R::NAME, state.page);
            } else {
                println!("{}", render_list::<R>(&state));
            }
        }
    })
}

async fn execute(
    command: ConsoleCommand,
    lists: ControllerRegistry,
    actions: AdminActions,
    feedback: FeedbackQueue,
) {
    match command {
        ConsoleCommand::Reload(list) => {
            lists.reload(list).await;
        }
        ConsoleCommand::Page(list, delta) => {
            lists.change_page(list, delta).await;
        }
        ConsoleCommand::Filter { list, name, value } => {
            lists.set_filter(list, &name, &value).await;
        }
        ConsoleCommand::Toasts => println!("{}", render_toasts(&feedback.visible().await)),
        ConsoleCommand::Dismiss(prefix) => match feedback.find_by_prefix(&prefix).await {
            Some(id) => {
                feedback.dismiss(id).await;
            }
            None => {
                feedback
                    .warning(format!("No visible notification matches {}", prefix))
                    .await;
            }
        },
        ConsoleCommand::Stats => {
            if let Ok(stats) = actions.load_stats().await {
                println!("{}", render_stats(&stats));
            }
        }
        ConsoleCommand::Analytics => {
            if let Ok(analytics) = actions.load_analytics().await {
                println!("{}", render_analytics(&analytics));
            }
        }
        ConsoleCommand::Payouts => {
            if let Ok(payouts) = actions.list_payouts().await {
                println!("{}", render_payouts(&payouts));
            }
        }
        ConsoleCommand::Help => println!("{}", HELP),
        ConsoleCommand::Quit => {}
    }
}

/// Runs the interactive console until `quit`, end of input or Ctrl+C.
pub async fn run_console(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting(session.storage.path());

    let renderers = vec![
        spawn_renderer::<Tasks>(session.lists.tasks.subscribe()),
        spawn_renderer::<Users>(session.lists.users.subscribe()),
        spawn_renderer::<Withdrawals>(session.lists.withdrawals.subscribe()),
        spawn_renderer::<Broadcasts>(session.lists.broadcasts.subscribe()),
    ];

    let lists = session.lists.clone();
    let feedback = session.feedback.clone();
    tokio::spawn(async move {
        feedback.info("Loading tasks, users, withdrawals and broadcasts").await;
        lists.reload_all().await;
    });

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = input.next_line() => {
                let Ok(Some(line)) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<ConsoleCommand>() {
                    Ok(ConsoleCommand::Quit) => break,
                    Ok(command) => {
                        tokio::spawn(execute(
                            command,
                            session.lists.clone(),
                            session.actions.clone(),
                            session.feedback.clone(),
                        ));
                    }
                    Err(message) => {
                        let feedback = session.feedback.clone();
                        tokio::spawn(async move {
                            feedback.warning(message).await;
                        });
                    }
                }
            }
            Some(event) = session.event_receiver.recv() => {
                if event.should_display() {
                    println!("{}", render_feedback(&event));
                }
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    print_session_shutdown();
    for renderer in renderers {
        renderer.abort();
    }
    print_session_exit_success();

    Ok(())
}
