//! Status module - publication timing buckets for records

/// Publication timing classification of a record
///
/// Records start as `Unset` and are classified by the user from the four
/// fixed buckets. Any bucket may be replaced by any other; there is no
/// ordering constraint between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Status {
    /// Not classified yet
    #[default]
    Unset,

    /// Published before anyone else
    First,

    /// Published within an hour of the first publication
    WithinHour,

    /// Published within two to three hours
    WithinThreeHours,

    /// Published more than three hours later
    AfterThreeHours,
}

impl Status {
    /// The four statuses a user can choose, in prompt order
    pub const CHOICES: [Status; 4] = [
        Status::First,
        Status::WithinHour,
        Status::WithinThreeHours,
        Status::AfterThreeHours,
    ];

    /// Get the storage key for the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Unset => "unset",
            Status::First => "first",
            Status::WithinHour => "within_hour",
            Status::WithinThreeHours => "within_3h",
            Status::AfterThreeHours => "after_3h",
        }
    }

    /// Parse a status from its storage key
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unset" => Some(Status::Unset),
            "first" => Some(Status::First),
            "within_hour" => Some(Status::WithinHour),
            "within_3h" => Some(Status::WithinThreeHours),
            "after_3h" => Some(Status::AfterThreeHours),
            _ => None,
        }
    }

    /// Human-readable label shown on buttons and in exported tables
    ///
    /// `Unset` has an empty label so that unclassified rows show a blank cell.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Unset => "",
            Status::First => "Published first",
            Status::WithinHour => "Published within the hour",
            Status::WithinThreeHours => "Published within 2-3 hours",
            Status::AfterThreeHours => "Published after more than 3 hours",
        }
    }

    /// Inverse of [`Status::label`]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return Some(Status::Unset);
        }
        Self::CHOICES.into_iter().find(|s| s.label() == label)
    }

    /// Whether the user has classified the record
    pub fn is_set(&self) -> bool {
        !matches!(self, Status::Unset)
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid status: {}", s))
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
