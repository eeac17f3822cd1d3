//! Risk tier table.
//!
//! Maps the classifier's integer prediction (0 = no disease, 1-4 = increasing
//! severity) to the text and styling shown to the user.

/// Highest severity code the table knows about.
pub const MAX_LEVEL: u8 = 4;

/// Alert styling for a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Success,
    Info,
    Warning,
    Error,
}

impl AlertKind {
    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Success => (16, 185, 129), // Emerald (#10B981)
            Self::Info => (59, 130, 246),    // Blue (#3B82F6)
            Self::Warning => (251, 191, 36), // Amber (#FBBF24)
            Self::Error => (244, 63, 94),    // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for AlertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Display record for one prediction code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskTier {
    pub level: u8,
    pub title: &'static str,
    /// Message text; `**bold**` spans mark emphasis.
    pub message: &'static str,
    pub alert: AlertKind,
    pub recommendation: &'static str,
    pub severity: &'static str,
}

const RISK_TIERS: [RiskTier; 5] = [
    RiskTier {
        level: 0,
        title: "✅ No Heart Disease Detected",
        message: "The patient shows **no signs** of heart disease.",
        alert: AlertKind::Success,
        recommendation: "Continue maintaining a healthy lifestyle with regular check-ups.",
        severity: "None",
    },
    RiskTier {
        level: 1,
        title: "⚠️ Mild Risk Detected",
        message: "The patient shows **mild signs** of heart disease.",
        alert: AlertKind::Info,
        recommendation: "Consult with a healthcare professional for preventive measures and lifestyle modifications.",
        severity: "Low",
    },
    RiskTier {
        level: 2,
        title: "⚠️ Moderate Risk Detected",
        message: "The patient shows **moderate signs** of heart disease.",
        alert: AlertKind::Warning,
        recommendation: "Medical consultation is recommended. Consider further diagnostic tests and treatment planning.",
        severity: "Moderate",
    },
    RiskTier {
        level: 3,
        title: "🚨 High Risk Detected",
        message: "The patient shows **significant signs** of heart disease.",
        alert: AlertKind::Warning,
        recommendation: "Seek medical attention soon. Comprehensive cardiovascular evaluation is strongly advised.",
        severity: "High",
    },
    RiskTier {
        level: 4,
        title: "🚨 Very High Risk Detected",
        message: "The patient shows **severe signs** of heart disease.",
        alert: AlertKind::Error,
        recommendation: "URGENT: Immediate medical consultation required. Do not delay seeking professional medical care.",
        severity: "Very High",
    },
];

const RISK_BAR_FILLED: [&str; 5] = ["🟢", "🟡", "🟠", "🔴", "🔴"];
const RISK_BAR_EMPTY: &str = "⚪";

impl RiskTier {
    /// Look up the tier for a prediction code.
    ///
    /// Codes outside 0-4 resolve to the "no disease" entry.
    #[must_use]
    pub fn lookup(code: i64) -> &'static RiskTier {
        Self::get(code).unwrap_or(&RISK_TIERS[0])
    }

    /// Strict lookup: `None` for codes outside the table.
    #[must_use]
    pub fn get(code: i64) -> Option<&'static RiskTier> {
        usize::try_from(code).ok().and_then(|i| RISK_TIERS.get(i))
    }

    /// All tiers, lowest severity first.
    #[must_use]
    pub fn all() -> &'static [RiskTier] {
        &RISK_TIERS
    }

    /// Styling of the message banner: 0 success, 1-2 warning, 3-4 error.
    #[must_use]
    pub fn banner(&self) -> AlertKind {
        match self.level {
            0 => AlertKind::Success,
            1 | 2 => AlertKind::Warning,
            _ => AlertKind::Error,
        }
    }

    /// Score as shown in the "Risk Score" metric.
    #[must_use]
    pub fn score_label(&self) -> String {
        format!("{}/{}", self.level, MAX_LEVEL)
    }

    /// Emoji risk indicator, e.g. `🟢 🟡 ⚪⚪⚪` for level 1.
    #[must_use]
    pub fn risk_bar(&self) -> String {
        let filled = usize::from(self.level) + 1;
        let empty = usize::from(MAX_LEVEL - self.level);
        format!(
            "{} {}",
            RISK_BAR_FILLED[..filled].join(" "),
            RISK_BAR_EMPTY.repeat(empty)
        )
    }

    /// Whether the result deserves a celebration.
    #[must_use]
    pub fn celebrates(&self) -> bool {
        self.level == 0
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.severity, self.score_label())
    }
}
