//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output.

use crate::cli::Command;
use crate::config::{self, ProjectConfig};
use crate::render;
use crate::todos::{Action, Status, StatusFilter, TodoBoard};
use crate::traits::Prompter;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

/// Asks for confirmation on stderr and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{} ", message.trim_end());
        let _ = stderr.flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

/// Whether a typed answer accepts the prompt.
fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "ok")
}

/// Run a CLI command against the project in `base_dir`.
pub fn run(command: Command, base_dir: &Path, prompter: &dyn Prompter) -> CliOutput {
    match command {
        Command::Version => run_version(),
        Command::EnsureConfig => run_ensure_config(base_dir),
        Command::Add { title, description, status } => {
            with_board(base_dir, |board| todo_add(board, title, description, &status))
        }
        Command::Edit { id, title, description, status } => with_board(base_dir, |board| {
            todo_edit(board, id, title, description, status.as_deref())
        }),
        Command::List { status } => with_board(base_dir, |board| todo_list(board, &status)),
        Command::Show { id } => with_board(base_dir, |board| todo_show(board, id)),
        Command::Complete { id, yes } => with_board(base_dir, |board| {
            todo_confirmed(board, Action::Complete, id, yes, prompter)
        }),
        Command::Delete { id, yes } => with_board(base_dir, |board| {
            todo_confirmed(board, Action::Delete, id, yes, prompter)
        }),
        Command::Export => with_board(base_dir, |board| json_output(board.store().items())),
    }
}

// === Utility Commands ===

fn run_version() -> CliOutput {
    success_output(format!("todo-keeper v{}", crate::VERSION))
}

fn run_ensure_config(base_dir: &Path) -> CliOutput {
    match config::ensure_config_in(base_dir) {
        Ok(config) => {
            let messages = vec![
                format!("Config ensured at {}", ProjectConfig::config_path(base_dir).display()),
                format!("  backend: {}", config.backend.as_str()),
                format!("  storage_key: {}", config.storage_key),
            ];
            CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![], stderr: messages }
        }
        Err(e) => error_output(format!("Error ensuring config: {e}")),
    }
}

// === Todo Commands ===

fn todo_add(board: &mut TodoBoard, title: String, description: String, status: &str) -> CliOutput {
    let status = match Status::from_str(status) {
        Ok(s) => s,
        Err(e) => return error_output(e.to_string()),
    };

    board.open_add_form();
    if let Some(form) = board.form_mut() {
        form.title = title;
        form.description = description;
        form.status = status;
    }

    match board.submit_form() {
        Ok(Some(todo)) => success_output(format!("Added todo {}: {}", todo.id, todo.title)),
        Ok(None) => error_output("Todo was not added".into()),
        Err(e) => error_output(format!("Error adding todo: {e}")),
    }
}

fn todo_edit(
    board: &mut TodoBoard,
    id: i64,
    title: Option<String>,
    description: Option<String>,
    status: Option<&str>,
) -> CliOutput {
    let status = match status.map(Status::from_str).transpose() {
        Ok(s) => s,
        Err(e) => return error_output(e.to_string()),
    };

    if !board.open_edit_form(id) {
        return match board.store().get(id) {
            Some(_) => error_output(format!("todo {id} is completed and can no longer be edited")),
            None => not_found(id),
        };
    }
    if let Some(form) = board.form_mut() {
        if let Some(title) = title {
            form.title = title;
        }
        if let Some(description) = description {
            form.description = description;
        }
        if let Some(status) = status {
            form.status = status;
        }
    }

    match board.submit_form() {
        Ok(Some(todo)) => success_output(format!("Updated todo {}: {}", todo.id, todo.title)),
        Ok(None) => not_found(id),
        Err(e) => error_output(format!("Error updating todo: {e}")),
    }
}

fn todo_list(board: &mut TodoBoard, status: &str) -> CliOutput {
    let filter = match StatusFilter::from_str(status) {
        Ok(f) => f,
        Err(e) => return error_output(e.to_string()),
    };
    board.set_filter(filter);

    match render::render_list(&board.visible(), filter, board.empty_message()) {
        Ok(text) => success_output(text.trim_end().to_string()),
        Err(e) => error_output(e.to_string()),
    }
}

fn todo_show(board: &TodoBoard, id: i64) -> CliOutput {
    let Some(todo) = board.store().get(id) else {
        return not_found(id);
    };
    match render::render_detail(todo) {
        Ok(text) => success_output(text.trim_end().to_string()),
        Err(e) => error_output(e.to_string()),
    }
}

fn todo_confirmed(
    board: &mut TodoBoard,
    action: Action,
    id: i64,
    yes: bool,
    prompter: &dyn Prompter,
) -> CliOutput {
    let requested = match action {
        Action::Delete => board.request_delete(id),
        Action::Complete => board.request_complete(id),
    };
    if !requested {
        return match board.store().get(id) {
            Some(_) => error_output(format!("todo {id} is already completed")),
            None => not_found(id),
        };
    }

    if !yes {
        let prompt = board.store().get(id).map(|todo| render::render_confirmation(action, todo));
        let message = match prompt {
            Some(Ok(message)) => message,
            Some(Err(e)) => return error_output(e.to_string()),
            None => return not_found(id),
        };
        if !prompter.confirm(&message) {
            board.cancel();
            return success_output("Cancelled".into());
        }
    }

    match board.confirm() {
        Some(resolution) if resolution.applied => {
            let verb = match action {
                Action::Delete => "Deleted",
                Action::Complete => "Completed",
            };
            success_output(format!("{verb} todo {id}"))
        }
        _ => not_found(id),
    }
}

// === Helpers ===

fn open_board(base_dir: &Path) -> Result<TodoBoard, String> {
    let config =
        config::load_or_default(base_dir).map_err(|e| format!("Error loading config: {e}"))?;
    let store = config.open_store(base_dir).map_err(|e| format!("Error opening store: {e}"))?;
    Ok(TodoBoard::new(store))
}

fn with_board(base_dir: &Path, f: impl FnOnce(&mut TodoBoard) -> CliOutput) -> CliOutput {
    match open_board(base_dir) {
        Ok(mut board) => f(&mut board),
        Err(e) => error_output(e),
    }
}

fn not_found(id: i64) -> CliOutput {
    error_output(format!("todo not found: {id}"))
}

fn json_output<T: serde::Serialize + ?Sized>(value: &T) -> CliOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => success_output(json),
        Err(e) => error_output(e.to_string()),
    }
}

fn success_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![message], stderr: vec![] }
}

fn error_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
}
