//! # dailies
//!
//! Command-line driver for the dailies controller: signs in, performs one
//! action against the tracker, prints plain text and signs out again.

#![deny(unsafe_code)]

mod render;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use dailies_app::{AppController, Credentials, TaskFilters, View};
use dailies_core::{ProjectId, SearchItem, SearchResultGroup, TaskId};
use secrecy::SecretString;
use tracing::info;

/// Dailies production tracker client.
#[derive(Parser, Debug)]
#[command(name = "dailies", version, about = "Dailies production tracker client")]
struct Cli {
    /// Sign in as this user (otherwise an existing session is required).
    #[arg(long, global = true)]
    username: Option<String>,

    /// Password for `--username`.
    #[arg(long, env = "DAILIES_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Log level filter (overrides settings; `RUST_LOG` still wins).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the signed-in user.
    Whoami,
    /// List projects.
    Projects {
        /// Filter by name.
        #[arg(long)]
        query: Option<String>,
    },
    /// List a project's tasks.
    Tasks {
        /// Project id.
        #[arg(long)]
        project: i64,
        /// Free-text filter.
        #[arg(long, default_value = "")]
        q: String,
        /// Stage filter.
        #[arg(long, default_value = "")]
        stage: String,
        /// Status filter.
        #[arg(long, default_value = "")]
        status: String,
    },
    /// Show a task with its versions and comments.
    Task {
        /// Task id.
        #[arg(long)]
        id: i64,
    },
    /// Comment on a task.
    Comment {
        /// Task id.
        #[arg(long)]
        task: i64,
        /// Comment text.
        #[arg(long)]
        text: String,
    },
    /// Search projects and tasks.
    Search {
        /// Query text.
        query: String,
        /// Navigate to the Nth result (1-based, in display order).
        #[arg(long)]
        open: Option<usize>,
    },
    /// Show stages and statuses.
    Sets,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = dailies_settings::load_settings().context("loading settings")?;
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| settings.logging.level.clone());
    if cli.json_logs {
        dailies_logging::init_json_subscriber(&level);
    } else {
        dailies_logging::init_subscriber(&level);
    }

    let client = match dailies_settings::ApiConfig::from_settings(&settings) {
        Ok(api) => Ok(dailies_client::connect(&settings.http, api)
            .context("building HTTP client")?),
        Err(error) => Err(error),
    };
    let ctrl = AppController::new(client);

    ctrl.initialize().await;
    if let Some(message) = ctrl.snapshot().config_error {
        bail!("configuration error: {message}");
    }

    let signed_in_here = sign_in(&ctrl, &cli).await?;
    let outcome = if ctrl.snapshot().view == View::App {
        run(&ctrl, cli.command).await
    } else {
        Err(anyhow::anyhow!(
            "not signed in (pass --username and --password)"
        ))
    };

    if signed_in_here {
        ctrl.logout().await;
    }
    outcome
}

/// Log in when credentials were given and no session exists. Returns whether
/// this run created the session.
async fn sign_in(ctrl: &AppController, cli: &Cli) -> Result<bool> {
    let Some(username) = cli.username.clone() else {
        return Ok(false);
    };
    if ctrl.snapshot().view == View::App {
        return Ok(false);
    }
    let Some(password) = cli.password.clone() else {
        bail!("--password (or DAILIES_PASSWORD) is required with --username");
    };

    let credentials = Credentials {
        username,
        password: SecretString::from(password),
    };
    ctrl.login(&credentials).await;

    let state = ctrl.snapshot();
    if let Some(error) = state.error {
        bail!("login failed: {error}");
    }
    info!(view = ?state.view, "login finished");
    Ok(state.view == View::App)
}

async fn run(ctrl: &AppController, command: Command) -> Result<()> {
    match command {
        Command::Whoami => {
            if let Some(user) = ctrl.snapshot().user {
                render::user(&user);
            }
        }
        Command::Projects { query } => {
            if let Some(query) = query {
                ctrl.set_project_query(query).await;
            }
            render::projects(&ctrl.snapshot().projects);
        }
        Command::Tasks {
            project,
            q,
            stage,
            status,
        } => {
            ctrl.select_project(ProjectId::new(project)).await;
            let filters = TaskFilters { q, stage, status };
            if !filters.is_empty() {
                ctrl.set_task_filters(filters).await;
            }
            render::tasks(&ctrl.snapshot().tasks);
        }
        Command::Task { id } => {
            ctrl.select_task(TaskId::new(id)).await;
            if ctrl.snapshot().selected_task.is_none() {
                bail!("task {id} could not be loaded");
            }
            render::task_detail(ctrl);
        }
        Command::Comment { task, text } => {
            ctrl.select_task(TaskId::new(task)).await;
            if ctrl.snapshot().selected_task.is_none() {
                bail!("task {task} could not be loaded");
            }
            let before = ctrl.snapshot().comments.len();
            ctrl.set_comment_draft(text);
            ctrl.submit_comment().await;
            let state = ctrl.snapshot();
            if !state.comment_draft.is_empty() {
                bail!("comment was not accepted");
            }
            println!("comment posted ({} → {})", before, state.comments.len());
        }
        Command::Search { query, open } => {
            ctrl.open_search();
            ctrl.search(&query).await;
            let results = ctrl.snapshot().search_results;
            render::search_results(&results);

            if let Some(n) = open {
                let Some(item) = nth_result(&results, n) else {
                    bail!("no search result #{n}");
                };
                ctrl.navigate_search_result(item).await;
                let state = ctrl.snapshot();
                if state.selected_task.is_some() {
                    render::task_detail(ctrl);
                } else if state.selected_project_id.is_some() {
                    render::tasks(&state.tasks);
                } else {
                    println!("nothing to open for {} {}", item.kind, item.id);
                }
            }
        }
        Command::Sets => render::reference(&ctrl.snapshot().reference),
    }
    Ok(())
}

/// The `n`th result in display order, counting from 1.
fn nth_result(groups: &[SearchResultGroup], n: usize) -> Option<&SearchItem> {
    let index = n.checked_sub(1)?;
    groups.iter().flat_map(|g| g.items.iter()).nth(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailies_core::SearchId;

    fn group(title: &str, labels: &[&str]) -> SearchResultGroup {
        SearchResultGroup {
            title: title.into(),
            items: labels
                .iter()
                .enumerate()
                .map(|(i, label)| SearchItem {
                    id: SearchId::Int(i64::try_from(i).unwrap()),
                    label: (*label).into(),
                    subtitle: None,
                    kind: "task".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn results_are_numbered_across_groups_from_one() {
        let groups = [group("Projects", &["Nova"]), group("Tasks", &["SH010", "SH020"])];

        assert!(nth_result(&groups, 0).is_none());
        assert_eq!(nth_result(&groups, 1).unwrap().label, "Nova");
        assert_eq!(nth_result(&groups, 3).unwrap().label, "SH020");
        assert!(nth_result(&groups, 4).is_none());
    }
}
