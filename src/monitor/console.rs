//! Plain-text per-tick console view

use crate::core::reaper::{TerminationOutcome, TickReport};

/// ANSI sequence that clears the terminal and homes the cursor
pub const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

const NAME_WIDTH: usize = 32;

pub fn render_tick(report: &TickReport, threshold_secs: u64) -> String {
    let mut out = format!(
        "================ idle-reaper | tick {} | {} ================\n",
        report.tick,
        report.timestamp.format("%H:%M:%S")
    );

    if let Some(reason) = &report.skipped {
        out.push_str(&format!("Inspection failed, tick skipped: {}\n", reason));
    }

    if report.tracked.is_empty() {
        out.push_str("No minimized processes\n");
    } else {
        for (name, secs) in &report.tracked {
            out.push_str(&format!(
                "  {:<width$} {:>6}s / {}s\n",
                truncate(name, NAME_WIDTH),
                secs,
                threshold_secs,
                width = NAME_WIDTH
            ));
        }
    }

    for record in &report.terminations {
        let request = &record.request;
        let line = match &record.outcome {
            TerminationOutcome::Terminated => {
                format!("Closed {} (pid {})", request.name, request.pid)
            }
            TerminationOutcome::AlreadyExited => {
                format!("{} (pid {}) had already exited", request.name, request.pid)
            }
            TerminationOutcome::DryRun => {
                format!("[dry run] would close {} (pid {})", request.name, request.pid)
            }
            TerminationOutcome::Failed(reason) => {
                format!("Failed to close {} (pid {}): {}", request.name, request.pid, reason)
            }
        };
        out.push_str(&line);
        out.push('\n');
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::accounting::KillRequest;
    use crate::core::reaper::TerminationRecord;

    fn report(tracked: Vec<(&str, u64)>, terminations: Vec<TerminationRecord>) -> TickReport {
        TickReport {
            tick: 3,
            timestamp: chrono::Local::now(),
            tracked: tracked.into_iter().map(|(n, s)| (n.to_string(), s)).collect(),
            terminations,
            skipped: None,
        }
    }

    #[test]
    fn test_renders_tracked_and_closed() {
        let record = TerminationRecord {
            request: KillRequest { name: "notepad.exe".into(), pid: 42, idle_secs: 20 },
            outcome: TerminationOutcome::Terminated,
        };
        let text = render_tick(&report(vec![("notepad.exe", 20)], vec![record]), 20);

        assert!(text.contains("tick 3"));
        assert!(text.contains("notepad.exe"));
        assert!(text.contains("20s / 20s"));
        assert!(text.contains("Closed notepad.exe (pid 42)"));
    }

    #[test]
    fn test_renders_empty_tick() {
        let text = render_tick(&report(vec![], vec![]), 600);
        assert!(text.contains("No minimized processes"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a-very-long-process-name.exe", 10), "a-very-...");
    }
}
