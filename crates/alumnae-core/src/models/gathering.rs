use std::fmt;

use serde::{Deserialize, Serialize};

use crate::directory::ValidationError;

/// Kanban column a gathering sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatheringStatus {
    #[default]
    Planning,
    Open,
    Upcoming,
    Done,
}

impl GatheringStatus {
    /// Board column order.
    pub const ALL: [GatheringStatus; 4] = [
        GatheringStatus::Planning,
        GatheringStatus::Open,
        GatheringStatus::Upcoming,
        GatheringStatus::Done,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GatheringStatus::Planning => "planning",
            GatheringStatus::Open => "open",
            GatheringStatus::Upcoming => "upcoming",
            GatheringStatus::Done => "done",
        }
    }

    /// Column heading shown on the board.
    pub fn title(&self) -> &'static str {
        match self {
            GatheringStatus::Planning => "Planning",
            GatheringStatus::Open => "Sign-ups Open",
            GatheringStatus::Upcoming => "Upcoming (Closed)",
            GatheringStatus::Done => "Done",
        }
    }

    /// Next column, stopping at `Done`.
    pub fn next(&self) -> Self {
        match self {
            GatheringStatus::Planning => GatheringStatus::Open,
            GatheringStatus::Open => GatheringStatus::Upcoming,
            GatheringStatus::Upcoming | GatheringStatus::Done => GatheringStatus::Done,
        }
    }

    /// Previous column, stopping at `Planning`.
    pub fn prev(&self) -> Self {
        match self {
            GatheringStatus::Planning | GatheringStatus::Open => GatheringStatus::Planning,
            GatheringStatus::Upcoming => GatheringStatus::Open,
            GatheringStatus::Done => GatheringStatus::Upcoming,
        }
    }
}

impl fmt::Display for GatheringStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gathering {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub status: GatheringStatus,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub participants: u32,
}

impl Gathering {
    /// Only gatherings in the open column take sign-ups.
    pub fn accepts_signups(&self) -> bool {
        self.status == GatheringStatus::Open
    }

    pub fn participants_display(&self) -> String {
        match self.participants {
            1 => "1 participant".to_string(),
            n => format!("{} participants", n),
        }
    }
}

/// Insert payload for the `gatherings` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewGathering {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: GatheringStatus,
    pub date: String,
    pub location: String,
    pub participants: u32,
}

/// One board column with the gatherings in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn<'a> {
    pub status: GatheringStatus,
    pub items: Vec<&'a Gathering>,
}

/// Group gatherings into the four status columns, keeping input order
/// within each column.
pub fn board(gatherings: &[Gathering]) -> Vec<BoardColumn<'_>> {
    GatheringStatus::ALL
        .iter()
        .map(|&status| BoardColumn {
            status,
            items: gatherings.iter().filter(|g| g.status == status).collect(),
        })
        .collect()
}

const DEFAULT_KIND: &str = "Small group";
const DEFAULT_LOCATION: &str = "TBD";

/// Editable fields of the "new gathering" form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatheringField {
    Title,
    Kind,
    Date,
    Location,
}

impl GatheringField {
    pub const ALL: [GatheringField; 4] = [
        GatheringField::Title,
        GatheringField::Kind,
        GatheringField::Date,
        GatheringField::Location,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            GatheringField::Title => "Title",
            GatheringField::Kind => "Type",
            GatheringField::Date => "Date",
            GatheringField::Location => "Location",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatheringForm {
    pub title: String,
    pub kind: String,
    pub date: String,
    pub location: String,
}

impl GatheringForm {
    pub fn value(&self, field: GatheringField) -> &str {
        match field {
            GatheringField::Title => &self.title,
            GatheringField::Kind => &self.kind,
            GatheringField::Date => &self.date,
            GatheringField::Location => &self.location,
        }
    }

    pub fn value_mut(&mut self, field: GatheringField) -> &mut String {
        match field {
            GatheringField::Title => &mut self.title,
            GatheringField::Kind => &mut self.kind,
            GatheringField::Date => &mut self.date,
            GatheringField::Location => &mut self.location,
        }
    }

    /// New gatherings start in planning with nobody signed up.
    pub fn validate(&self) -> Result<NewGathering, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::new(vec!["title"]));
        }

        let or_default = |value: &str, default: &str| {
            let value = value.trim();
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        Ok(NewGathering {
            title: title.to_string(),
            kind: or_default(&self.kind, DEFAULT_KIND),
            status: GatheringStatus::Planning,
            date: self.date.trim().to_string(),
            location: or_default(&self.location, DEFAULT_LOCATION),
            participants: 0,
        })
    }
}
