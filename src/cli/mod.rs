//! Command implementations for the `taskdeck` binary.
//!
//! Thin presentation layer: parses user input, drives the store and the
//! scoring engine, renders their output. No scoring or storage logic lives
//! here.

use anyhow::Result;
use chrono::NaiveDate;

use crate::engine::{self, Ranking, Strategy};
use crate::tasks::TaskDraft;
use crate::AppContext;

/// `taskdeck add` — validate and append a task.
pub async fn cmd_add(
    ctx: &AppContext,
    title: String,
    due: Option<NaiveDate>,
    hours: Option<f64>,
    importance: Option<u8>,
    deps: Vec<String>,
) -> Result<()> {
    let draft = TaskDraft {
        title,
        due_date: due,
        estimated_hours: hours,
        importance,
        dependencies: deps,
    };
    let task = ctx.tasks.add(draft).await?;
    println!("added {} ({})", task.title, task.id);
    Ok(())
}

/// `taskdeck update` — edit an existing task; unset flags keep the stored
/// value, `--deps` replaces the whole dependency list when given.
#[allow(clippy::too_many_arguments)]
pub async fn cmd_update(
    ctx: &AppContext,
    id: String,
    title: Option<String>,
    due: Option<NaiveDate>,
    hours: Option<f64>,
    importance: Option<u8>,
    deps: Option<Vec<String>>,
) -> Result<()> {
    let Some(current) = ctx.tasks.get(&id).await else {
        println!("no task with id {id}");
        return Ok(());
    };
    let draft = TaskDraft {
        title: title.unwrap_or(current.title),
        due_date: due.or(current.due_date),
        estimated_hours: Some(hours.unwrap_or(current.estimated_hours)),
        importance: Some(importance.unwrap_or(current.importance)),
        dependencies: deps.unwrap_or(current.dependencies),
    };
    let task = ctx.tasks.update(&id, draft).await?;
    println!("updated {} ({})", task.title, task.id);
    Ok(())
}

/// `taskdeck list` — stored order, no scoring.
pub async fn cmd_list(ctx: &AppContext, json: bool) -> Result<()> {
    let tasks = ctx.tasks.list().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }
    if tasks.is_empty() {
        println!("No tasks added yet");
        return Ok(());
    }
    println!("Total tasks: {}", tasks.len());
    for (i, task) in tasks.iter().enumerate() {
        println!("{:>3}. {} ({})", i + 1, task.title, task.id);
        println!("     {}", meta_line(task));
    }
    Ok(())
}

/// `taskdeck analyze` — rank every task under a strategy.
pub async fn cmd_analyze(ctx: &AppContext, strategy: &str, json: bool) -> Result<()> {
    let strategy: Strategy = strategy.parse()?;
    let tasks = ctx.tasks.list().await;
    let ranking = engine::score(&tasks, strategy, &ctx.config.scoring);
    render_ranking(&ranking, json)
}

/// `taskdeck suggest` — top N of the same ranking `analyze` produces.
pub async fn cmd_suggest(ctx: &AppContext, strategy: &str, count: usize, json: bool) -> Result<()> {
    let strategy: Strategy = strategy.parse()?;
    let tasks = ctx.tasks.list().await;
    let ranking = engine::suggest_top(&tasks, strategy, &ctx.config.scoring, count);
    render_ranking(&ranking, json)
}

/// `taskdeck done` — mark a task done by removing it.
pub async fn cmd_done(ctx: &AppContext, id: &str) -> Result<()> {
    if ctx.tasks.remove(id).await? {
        println!("task marked as done");
    } else {
        println!("no task with id {id}");
    }
    Ok(())
}

/// `taskdeck reorder` — move a task between positions (0-based).
pub async fn cmd_reorder(ctx: &AppContext, from: usize, to: usize) -> Result<()> {
    ctx.tasks.reorder(from, to).await?;
    println!("tasks reordered");
    Ok(())
}

// ─── Rendering ────────────────────────────────────────────────────────────────

fn render_ranking(ranking: &Ranking, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(ranking)?);
        return Ok(());
    }
    if ranking.entries.is_empty() {
        println!("No tasks to analyze — add some first");
        return Ok(());
    }
    for cycle in &ranking.cycles {
        println!("warning: dependency cycle: {}", cycle.ids.join(" -> "));
    }
    for (i, entry) in ranking.entries.iter().enumerate() {
        println!(
            "{:>3}. [{:<6} {:>4.1}] {}",
            i + 1,
            entry.label.to_string(),
            entry.score,
            entry.task.title
        );
        println!("     {}", meta_line(&entry.task));
        println!("     {}", entry.explanation);
    }
    Ok(())
}

fn meta_line(task: &crate::tasks::Task) -> String {
    let mut meta = format!(
        "Est: {}h · Imp: {}/10",
        task.estimated_hours, task.importance
    );
    if let Some(due) = task.due_date {
        meta.push_str(&format!(" · Due: {due}"));
    }
    if !task.dependencies.is_empty() {
        meta.push_str(&format!(" · Deps: {}", task.dependencies.join(", ")));
    }
    meta
}
