//! Target process and capture lifecycle types

use super::ProcessId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The process the engine is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProcess {
    pub pid: ProcessId,
    pub name: String,
    pub window_title: Option<String>,
}

impl TargetProcess {
    /// Creates a target with no window title
    pub fn new(pid: ProcessId, name: impl Into<String>) -> Self {
        TargetProcess {
            pid,
            name: name.into(),
            window_title: None,
        }
    }

    /// Sets the main window title
    pub fn with_window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = Some(title.into());
        self
    }
}

impl fmt::Display for TargetProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.window_title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => {
                write!(f, "{} (PID {}) - {}", self.name, self.pid, title)
            }
            _ => write!(f, "{} (PID {})", self.name, self.pid),
        }
    }
}

/// Engine lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    #[default]
    Detached,
    Attached,
    Capturing,
}

impl CaptureState {
    /// Attached or capturing
    pub fn is_attached(&self) -> bool {
        !matches!(self, CaptureState::Detached)
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self, CaptureState::Capturing)
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CaptureState::Detached => "detached",
            CaptureState::Attached => "attached",
            CaptureState::Capturing => "capturing",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        let target = TargetProcess::new(4242, "Nioh3.exe");
        assert_eq!(target.to_string(), "Nioh3.exe (PID 4242)");

        let titled = target.clone().with_window_title("Nioh 3");
        assert_eq!(titled.to_string(), "Nioh3.exe (PID 4242) - Nioh 3");

        let blank = target.with_window_title("   ");
        assert_eq!(blank.to_string(), "Nioh3.exe (PID 4242)");
    }

    #[test]
    fn test_capture_state_predicates() {
        assert!(!CaptureState::Detached.is_attached());
        assert!(CaptureState::Attached.is_attached());
        assert!(!CaptureState::Attached.is_capturing());
        assert!(CaptureState::Capturing.is_attached());
        assert!(CaptureState::Capturing.is_capturing());
        assert_eq!(CaptureState::default(), CaptureState::Detached);
    }
}
