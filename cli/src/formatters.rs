//! Output formatting utilities

use colored::*;
use procvisor_engine::domain::{ProcessSnapshot, ProcessState};
use std::io::Write;
use tabwriter::TabWriter;

/// Format process state with appropriate color
pub fn format_state(state: ProcessState) -> ColoredString {
    let state_str = state.as_str();
    match state {
        ProcessState::Running => state_str.green(),
        ProcessState::Fatal => state_str.red(),
        ProcessState::Backoff => state_str.red(),
        ProcessState::Exited => state_str.yellow(),
        ProcessState::Stopping => state_str.yellow(),
        ProcessState::Starting => state_str.cyan(),
        _ => state_str.normal(),
    }
}

fn format_pid(pid: Option<u32>) -> String {
    pid.map_or_else(|| "-".to_string(), |p| p.to_string())
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

/// Render processes as an aligned table
pub fn render_status_table(
    processes: &[ProcessSnapshot],
    verbose: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut tw = TabWriter::new(Vec::new()).padding(2).ansi(true);

    let mut header = vec!["NAME", "PID", "STATE", "INFO", "DESCRIPTION"];
    if verbose {
        header.extend(["DIRECTORY", "COMMAND", "ENVIRONMENT"]);
    }
    writeln!(tw, "{}", header.join("\t"))?;

    for p in processes {
        let mut row = vec![
            p.spec.process_name().to_string(),
            format_pid(p.status.pid),
            format_state(p.status.state).to_string(),
            or_dash(&p.status.description).to_string(),
            or_dash(p.spec.description()).to_string(),
        ];
        if verbose {
            row.push(or_dash(p.spec.directory()).to_string());
            row.push(p.spec.command().to_string());
            row.push(or_dash(&p.spec.environment().join(" ")).to_string());
        }
        writeln!(tw, "{}", row.join("\t"))?;
    }

    tw.flush()?;
    Ok(String::from_utf8(tw.into_inner()?)?)
}
