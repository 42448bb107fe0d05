//! Context window utilization.

use serde::Serialize;

use crate::models::HookContextWindow;

/// Percent strictly above which the line carries the high marker
pub const HIGH_THRESHOLD: u64 = 80;
/// Percent strictly above which the line carries the medium marker
pub const MEDIUM_THRESHOLD: u64 = 60;

pub const HIGH_MARKER: &str = " !!";
pub const MEDIUM_MARKER: &str = " !";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Medium,
    High,
}

impl Severity {
    pub fn from_percent(percent: u64) -> Self {
        if percent > HIGH_THRESHOLD {
            Self::High
        } else if percent > MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::None
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Medium => MEDIUM_MARKER,
            Self::High => HIGH_MARKER,
        }
    }
}

/// `round(100 * used / size)` with ties going to the even neighbour.
///
/// Integer arithmetic keeps the result exact for any u64 input. A zero
/// window size yields 0.
pub fn context_percent(used: u64, size: u64) -> u64 {
    if size == 0 {
        return 0;
    }
    let scaled = u128::from(used) * 100;
    let size = u128::from(size);
    let quotient = scaled / size;
    let twice_rem = (scaled % size) * 2;
    let rounded = if twice_rem > size || (twice_rem == size && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    };
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContextUsage {
    /// Summed input + cache creation + cache read tokens, when reported
    pub used_tokens: Option<u64>,
    pub window_size: Option<u64>,
    pub percent: u64,
    pub severity: Severity,
}

impl ContextUsage {
    pub fn from_window(window: Option<&HookContextWindow>) -> Self {
        let used_tokens = window
            .and_then(|w| w.current_usage.as_ref())
            .map(|u| u.total_tokens());
        let window_size = window.and_then(|w| w.context_window_size);
        let percent = match (used_tokens, window_size) {
            (Some(used), Some(size)) => context_percent(used, size),
            _ => 0,
        };
        Self {
            used_tokens,
            window_size,
            percent,
            severity: Severity::from_percent(percent),
        }
    }

    /// `"<percent>%<marker>"`
    pub fn label(&self) -> String {
        format!("{}%{}", self.percent, self.severity.marker())
    }
}
