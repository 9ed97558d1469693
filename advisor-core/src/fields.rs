use serde::{Deserialize, Serialize};

/// The six always-first intake slots, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedField {
    CompanyName,
    Language,
    Sphere,
    Education,
    Experience,
    Location,
}

impl FixedField {
    /// All fixed fields in declaration order
    pub const ALL: [FixedField; 6] = [
        FixedField::CompanyName,
        FixedField::Language,
        FixedField::Sphere,
        FixedField::Education,
        FixedField::Experience,
        FixedField::Location,
    ];

    /// Stable identifier used as the answer-store key
    pub fn id(&self) -> &'static str {
        match self {
            FixedField::CompanyName => "company_name",
            FixedField::Language => "language",
            FixedField::Sphere => "sphere",
            FixedField::Education => "education",
            FixedField::Experience => "experience",
            FixedField::Location => "location",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            FixedField::CompanyName => "Company Name",
            FixedField::Language => "Language",
            FixedField::Sphere => "Business Sphere",
            FixedField::Education => "Education",
            FixedField::Experience => "Experience",
            FixedField::Location => "Location",
        }
    }

    /// The field asked after this one, if any
    pub fn next(&self) -> Option<FixedField> {
        let idx = Self::ALL.iter().position(|f| f == self)?;
        Self::ALL.get(idx + 1).copied()
    }
}

/// A named milestone level unlocked by accumulating points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    pub id: String,
    pub name: String,
    pub points_required: u32,
    pub icon: String,
}

impl Tier {
    fn new(id: &str, name: &str, points_required: u32, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            points_required,
            icon: icon.to_string(),
        }
    }
}

/// Static tier table, ordered by ascending threshold
pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier::new("beginner", "Beginner", 0, "\u{1F331}"),
        Tier::new("motivated_entrepreneur", "Motivated Entrepreneur", 3, "\u{1F680}"),
        Tier::new("growing_entrepreneur", "Growing Entrepreneur", 6, "\u{1F31F}"),
        Tier::new(
            "experienced_business_professional",
            "Experienced Business Professional",
            10,
            "\u{1F4BC}",
        ),
        Tier::new("master_entrepreneur", "Master Entrepreneur", 20, "\u{1F451}"),
    ]
}
