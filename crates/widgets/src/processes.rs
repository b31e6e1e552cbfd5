use rtpm_core::{DashState, DashWidget};

/// Process table in source order, truncated to `max_rows`.
#[derive(Debug)]
pub struct ProcessTable {
    max_rows: usize,
}

impl ProcessTable {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new(10)
    }
}

impl DashWidget for ProcessTable {
    fn id(&self) -> &str {
        "processes"
    }

    fn view(&self, state: &DashState) -> Option<String> {
        let processes = &state.sample.as_deref()?.processes;
        if processes.is_empty() || self.max_rows == 0 {
            return None;
        }

        let mut out = format!("{:<16} {:>6} {:>10}  {}", "NAME", "CPU%", "MEM", "STATUS");
        for p in processes.iter().take(self.max_rows) {
            out.push_str(&format!(
                "\n{:<16} {:>6.2} {:>10}  {}",
                p.name, p.cpu_percent, p.memory_label, p.status
            ));
        }
        if processes.len() > self.max_rows {
            out.push_str(&format!("\n... {} more", processes.len() - self.max_rows));
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{offline, online};

    #[test]
    fn rows_in_source_order() {
        let view = ProcessTable::default().view(&online()).unwrap();
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("procA"));
        assert!(lines[1].ends_with("512 MB  running"));
        assert!(lines[3].ends_with("unknown"));
    }

    #[test]
    fn truncated_table_says_so() {
        let view = ProcessTable::new(2).view(&online()).unwrap();
        assert!(view.ends_with("... 1 more"));
    }

    #[test]
    fn nothing_to_show() {
        assert!(ProcessTable::default().view(&offline()).is_none());
    }
}
