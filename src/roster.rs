//! Staff roster filtering for the selection screens.

use std::fmt;

use crate::models::{StaffRecord, StaffUser};

/// Sentinel id of the "Any staff" entry.
pub const ANY_STAFF_ID: &str = "any_staff";

/// Staff preference chosen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StaffChoice {
    /// No specific staff member.
    #[default]
    Any,
    /// A staff member, by user id.
    Specific(String),
}

impl StaffChoice {
    /// Parse a selector value; the sentinel and blank map to `Any`.
    pub fn from_id(id: &str) -> Self {
        let id = id.trim();
        if id.is_empty() || id == ANY_STAFF_ID {
            Self::Any
        } else {
            Self::Specific(id.to_string())
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Any => ANY_STAFF_ID,
            Self::Specific(id) => id,
        }
    }
}

impl fmt::Display for StaffChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One selectable entry on the checkout staff step.
#[derive(Debug, Clone, PartialEq)]
pub struct StaffOption {
    pub choice: StaffChoice,
    pub name: String,
    pub position: Option<String>,
    pub image: Option<String>,
    pub service_count: usize,
    /// User details sent with the completion request. `None` for "Any staff".
    pub user: Option<StaffUser>,
}

impl StaffOption {
    fn any() -> Self {
        Self {
            choice: StaffChoice::Any,
            name: "Any staff".to_string(),
            position: None,
            image: None,
            service_count: 0,
            user: None,
        }
    }

    fn from_record(record: &StaffRecord) -> Self {
        Self {
            choice: StaffChoice::Specific(record.user_id.clone()),
            name: record.display_name().to_string(),
            position: record.position.clone(),
            image: record.image.clone().or_else(|| record.user.image.clone()),
            service_count: record.service_count(),
            user: Some(record.user.clone()),
        }
    }
}

/// Entries for the checkout staff step.
///
/// "Any staff" always comes first; roster entries not flagged available are
/// left out entirely.
pub fn selectable_staff(roster: &[StaffRecord]) -> Vec<StaffOption> {
    std::iter::once(StaffOption::any())
        .chain(roster.iter().filter(|s| s.is_available()).map(StaffOption::from_record))
        .collect()
}

/// Find the option matching `choice`, if it is still selectable.
pub fn find_option<'a>(options: &'a [StaffOption], choice: &StaffChoice) -> Option<&'a StaffOption> {
    options.iter().find(|o| &o.choice == choice)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<StaffRecord> {
        vec![
            StaffRecord::new("1", "u1", "Ana").unavailable(),
            StaffRecord::new("2", "u2", "Ben"),
            StaffRecord {
                is_available: None,
                ..StaffRecord::new("3", "u3", "Cy")
            },
            StaffRecord::new("4", "u4", "Dee"),
        ]
    }

    #[test]
    fn test_any_staff_first() {
        let options = selectable_staff(&roster());
        assert_eq!(options[0].choice, StaffChoice::Any);
        assert_eq!(options[0].name, "Any staff");

        let options = selectable_staff(&[]);
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].choice, StaffChoice::Any);
    }

    #[test]
    fn test_unavailable_staff_excluded() {
        let options = selectable_staff(&roster());
        let names: Vec<_> = options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["Any staff", "Ben", "Dee"]);
        assert!(find_option(&options, &StaffChoice::Specific("u1".to_string())).is_none());
    }

    #[test]
    fn test_keyed_by_user_id() {
        let options = selectable_staff(&roster());
        let ben = find_option(&options, &StaffChoice::Specific("u2".to_string())).unwrap();
        assert_eq!(ben.user.as_ref().map(|u| u.name.as_str()), Some("Ben"));
    }

    #[test]
    fn test_choice_from_id() {
        assert_eq!(StaffChoice::from_id("any_staff"), StaffChoice::Any);
        assert_eq!(StaffChoice::from_id(""), StaffChoice::Any);
        assert_eq!(StaffChoice::from_id("u9"), StaffChoice::Specific("u9".to_string()));
        assert_eq!(StaffChoice::Any.to_string(), "any_staff");
    }
}
