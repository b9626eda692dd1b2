use crate::domain::{Counters, Task, TaskError, TaskId, Theme};
use crate::session::{Prompter, Session};
use crate::store::RenameOutcome;
use anyhow::Result;
use clap::ValueEnum;
use std::collections::HashSet;
use std::io::{self, BufRead, Write};

/// `sort` argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

/// `theme` argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

/// Prompts on stdin/stdout; `assume_yes` answers every confirmation with yes
pub struct StdinPrompter {
    pub assume_yes: bool,
}

impl StdinPrompter {
    fn read_line(message: &str) -> Option<String> {
        print!("{} ", message);
        io::stdout().flush().ok()?;
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Self::read_line(&format!("{} [y/N]", message))
            .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false)
    }

    /// A blank answer is returned as is, so a rename to it is rejected as empty
    fn prompt_text(&mut self, message: &str, default: &str) -> Option<String> {
        Self::read_line(&format!("{} ({})", message, default))
    }
}

/// Resolve a reference or explain on stderr that nothing matched
fn resolve_or_warn(session: &Session, reference: &str) -> Option<TaskId> {
    let id = session.resolve(reference);
    if id.is_none() {
        eprintln!("No task matches \"{}\"", reference);
    }
    id
}

/// One line per task: position, completion marker, name
pub fn format_task_line(position: usize, task: &Task) -> String {
    let marker = if task.completed { "x" } else { " " };
    format!("{:>3}. [{}] {}", position, marker, task.text)
}

pub fn format_counters(counters: &Counters) -> String {
    format!(
        "Total: {}  Completed: {}  Deleted: {}  Edited: {}",
        counters.total, counters.completed, counters.deleted, counters.edited
    )
}

pub fn print_list(session: &Session) {
    if session.tasks().is_empty() {
        println!("No tasks yet. Add one with `tasklane add <name>`.");
        return;
    }
    for (i, task) in session.tasks().iter().enumerate() {
        println!("{}", format_task_line(i + 1, task));
    }
}

pub fn add(session: &mut Session, text: &str) -> Result<()> {
    session.create(text)?;
    print_list(session);
    Ok(())
}

pub fn toggle(session: &mut Session, reference: &str) -> Result<()> {
    if let Some(id) = resolve_or_warn(session, reference) {
        let completed = session.toggle_complete(id)?;
        println!("{}", if completed { "Completed." } else { "Reopened." });
    }
    Ok(())
}

pub fn rename(
    session: &mut Session,
    reference: &str,
    new_text: Option<&str>,
    prompter: &mut dyn Prompter,
) -> Result<()> {
    let Some(id) = resolve_or_warn(session, reference) else {
        return Ok(());
    };
    let outcome = match new_text {
        Some(text) => Some(session.rename(id, text)?),
        None => session.rename_with(id, prompter)?,
    };
    match outcome {
        Some(RenameOutcome::Renamed) => println!("Renamed."),
        Some(RenameOutcome::Unchanged) => println!("Name unchanged."),
        None => println!("Cancelled."),
    }
    Ok(())
}

/// One reference deletes one task; several delete them as a selection
pub fn remove(session: &mut Session, references: &[String], prompter: &mut dyn Prompter) -> Result<()> {
    let ids: Vec<TaskId> = references
        .iter()
        .filter_map(|r| resolve_or_warn(session, r))
        .collect();

    let removed = match ids.as_slice() {
        [] => 0,
        [id] if references.len() == 1 => session.delete_one(*id, prompter)?,
        _ => {
            let selected: HashSet<TaskId> = ids.into_iter().collect();
            session.delete_selected(&selected, prompter)?
        }
    };
    println!("Deleted {} task(s).", removed);
    Ok(())
}

pub fn sort(session: &mut Session, direction: SortArg) -> Result<()> {
    match direction {
        SortArg::Asc => session.sort_ascending()?,
        SortArg::Desc => session.sort_descending()?,
    }
    print_list(session);
    Ok(())
}

pub fn reset(session: &mut Session) -> Result<()> {
    session.reset()?;
    print_list(session);
    Ok(())
}

pub fn move_task(session: &mut Session, reference: &str, before: Option<&str>) -> Result<()> {
    let Some(moved) = resolve_or_warn(session, reference) else {
        return Ok(());
    };
    let before = match before {
        Some(b) => match resolve_or_warn(session, b) {
            Some(id) => Some(id),
            None => return Ok(()),
        },
        None => None,
    };
    match session.drag_reorder(moved, before) {
        Ok(_) => print_list(session),
        Err(e) if matches!(e.downcast_ref::<TaskError>(), Some(TaskError::NotFound)) => {}
        Err(e) => return Err(e),
    }
    Ok(())
}

pub fn theme(session: &mut Session, theme: Option<ThemeArg>) -> Result<()> {
    if let Some(theme) = theme {
        session.set_theme(theme.into())?;
    }
    println!("{}", session.theme().to_tag());
    Ok(())
}
