use anyhow::{Context, Result};
use std::process::Command;

/// Open an article link, preferring the configured `open_command` over the
/// system handler.
pub fn open_url(url: &str, command: Option<&str>) -> Result<()> {
    if let Some(cmd) = command.map(str::trim).filter(|c| !c.is_empty()) {
        let mut parts = cmd.split_whitespace();
        let program = parts.next().unwrap_or(cmd);
        Command::new(program)
            .args(parts)
            .arg(url)
            .spawn()
            .with_context(|| format!("failed to run open_command `{cmd}`"))?;
        return Ok(());
    }
    open::that(url).with_context(|| format!("failed to open {url}"))
}
