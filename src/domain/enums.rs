use serde::{Deserialize, Serialize};

/// Importance axis of the Eisenhower matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Importance {
    Important,
    #[default]
    Unimportant,
}

impl Importance {
    /// The other importance (used by the toggle key)
    pub fn toggled(&self) -> Self {
        match self {
            Self::Important => Self::Unimportant,
            Self::Unimportant => Self::Important,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Important => "Important",
            Self::Unimportant => "Unimportant",
        }
    }
}

/// Quadrant of the Eisenhower matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    /// Important and urgent
    Do,
    /// Important, not urgent
    Schedule,
    /// Urgent, not important
    Delegate,
    /// Neither
    Eliminate,
}

impl Quadrant {
    pub fn from_flags(important: bool, urgent: bool) -> Self {
        match (important, urgent) {
            (true, true) => Self::Do,
            (true, false) => Self::Schedule,
            (false, true) => Self::Delegate,
            (false, false) => Self::Eliminate,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Do => "Do",
            Self::Schedule => "Schedule",
            Self::Delegate => "Delegate",
            Self::Eliminate => "Eliminate",
        }
    }

    /// Matrix order, top-left to bottom-right
    pub fn all() -> &'static [Quadrant] {
        &[
            Quadrant::Do,
            Quadrant::Schedule,
            Quadrant::Delegate,
            Quadrant::Eliminate,
        ]
    }
}

/// Mutually exclusive relevance bucket a task is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relevance {
    Due,
    Normal,
    Snoozed,
    Completed,
}

impl Relevance {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Due => "Due",
            Self::Normal => "Open",
            Self::Snoozed => "Snoozed",
            Self::Completed => "Completed",
        }
    }

    /// Display order of the buckets
    pub fn all() -> &'static [Relevance] {
        &[
            Relevance::Due,
            Relevance::Normal,
            Relevance::Snoozed,
            Relevance::Completed,
        ]
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    /// Text prompt is open (add, rename, dates)
    Prompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_toggled() {
        assert_eq!(Importance::Important.toggled(), Importance::Unimportant);
        assert_eq!(Importance::Unimportant.toggled(), Importance::Important);
    }

    #[test]
    fn test_importance_default_is_unimportant() {
        assert_eq!(Importance::default(), Importance::Unimportant);
    }

    #[test]
    fn test_importance_serializes_by_name() {
        let json = serde_json::to_string(&Importance::Important).unwrap();
        assert_eq!(json, "\"Important\"");
        let parsed: Importance = serde_json::from_str("\"Unimportant\"").unwrap();
        assert_eq!(parsed, Importance::Unimportant);
    }

    #[test]
    fn test_quadrant_from_flags() {
        assert_eq!(Quadrant::from_flags(true, true), Quadrant::Do);
        assert_eq!(Quadrant::from_flags(true, false), Quadrant::Schedule);
        assert_eq!(Quadrant::from_flags(false, true), Quadrant::Delegate);
        assert_eq!(Quadrant::from_flags(false, false), Quadrant::Eliminate);
    }
}
