use std::process::Command;

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("nothing to open: empty path")]
    EmptyPath,
    #[error("failed to launch `{program}` for {path}: {source}")]
    Spawn {
        program: String,
        path: String,
        source: std::io::Error,
    },
}

pub trait ShellActions: Send + Sync {
    fn open_path(&self, full_path: &str) -> Result<(), ShellError>;
    fn reveal_path(&self, full_path: &str) -> Result<(), ShellError>;
}

/// Hands paths to the desktop's default handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl ShellActions for SystemShell {
    fn open_path(&self, full_path: &str) -> Result<(), ShellError> {
        spawn(open_command(full_path)?, full_path)
    }

    fn reveal_path(&self, full_path: &str) -> Result<(), ShellError> {
        spawn(reveal_command(full_path)?, full_path)
    }
}

pub fn open_command(path: &str) -> Result<Command, ShellError> {
    if path.trim().is_empty() {
        return Err(ShellError::EmptyPath);
    }

    let command = if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", path]);
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(path);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(path);
        command
    };
    Ok(command)
}

pub fn reveal_command(path: &str) -> Result<Command, ShellError> {
    if path.trim().is_empty() {
        return Err(ShellError::EmptyPath);
    }

    let command = if cfg!(target_os = "windows") {
        let mut command = Command::new("explorer");
        command.arg(format!("/select,{}", path));
        command
    } else if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.args(["-R", path]);
        command
    } else {
        // xdg has no "select"; open the containing folder instead.
        let parent = std::path::Path::new(path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| path.to_string());
        let mut command = Command::new("xdg-open");
        command.arg(parent);
        command
    };
    Ok(command)
}

fn spawn(mut command: Command, path: &str) -> Result<(), ShellError> {
    let program = command.get_program().to_string_lossy().into_owned();
    debug!(%program, path, "launching shell handler");
    command.spawn().map_err(|source| ShellError::Spawn {
        program,
        path: path.to_string(),
        source,
    })?;
    Ok(())
}
