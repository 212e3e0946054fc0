//! Plain-text output.

use dailies_app::{AppController, StatusBadge};
use dailies_core::{Project, ReferenceSet, SearchResultGroup, Task, User};

pub fn user(user: &User) {
    println!("{} ({}) · {}", user.display_name(), user.username, user.role);
}

pub fn projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("no projects");
    }
    for p in projects {
        let archived = if p.is_archived() { "  [archived]" } else { "" };
        println!("{:>6}  {}{archived}", p.id.get(), p.name);
    }
}

pub fn tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
    }
    for t in tasks {
        println!(
            "{:>6}  {:<8} {:<24} {:<8} {} [{}]",
            t.id.get(),
            t.shot_no,
            t.title,
            t.stage,
            t.status,
            StatusBadge::classify(&t.status).token()
        );
    }
}

pub fn task_detail(ctrl: &AppController) {
    let state = ctrl.snapshot();
    let Some(task) = &state.selected_task else {
        return;
    };

    println!("{} · {}", task.shot_no, task.title);
    println!(
        "  stage {}   status {} [{}]",
        task.stage,
        task.status,
        StatusBadge::classify(&task.status).token()
    );
    if let Some(assignee) = &task.assignee {
        println!("  assignee {}", assignee.display_name());
    }
    if let Some(due) = &task.due_date {
        println!("  due {due}");
    }
    if let Some(remark) = task.remark.as_deref().filter(|r| !r.trim().is_empty()) {
        println!("  remark {remark}");
    }
    println!("  latest {}", ctrl.latest_version_summary());

    for version in &state.versions {
        match ctrl.download_version(version) {
            Some(url) => println!("    v{}  {url}", version.version_no),
            None => println!("    v{}", version.version_no),
        }
    }

    if state.comments.is_empty() {
        println!("  no comments");
    }
    for comment in &state.comments {
        println!(
            "  {} @ {}: {}",
            comment.author.display_name(),
            dailies_app::local_timestamp(&comment.created_at),
            comment.content
        );
    }
}

pub fn search_results(groups: &[SearchResultGroup]) {
    if groups.is_empty() {
        println!("no results");
    }
    let mut n = 0;
    for group in groups {
        println!("{}", group.title);
        for item in &group.items {
            n += 1;
            match &item.subtitle {
                Some(sub) => println!("  {n:>3}. {} — {sub}", item.label),
                None => println!("  {n:>3}. {}", item.label),
            }
        }
    }
}

pub fn reference(reference: &ReferenceSet) {
    println!("stages:   {}", reference.stages.join(", "));
    println!("statuses: {}", reference.statuses.join(", "));
}
