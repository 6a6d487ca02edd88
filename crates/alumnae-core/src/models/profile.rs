use serde::{Deserialize, Serialize};

/// The "my profile" card shown on the dashboard.
///
/// Cohort is kept as entered, since this card is never filtered or
/// aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub cohort: String,
    pub job: String,
    pub company: String,
    pub introduction: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "Kim Salesio".to_string(),
            cohort: "25".to_string(),
            job: "Attorney".to_string(),
            company: "Kim & Chang".to_string(),
            introduction: "Have a warm day with your fellow alumnae.".to_string(),
        }
    }
}

impl UserProfile {
    pub fn value(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::Name => &self.name,
            ProfileField::Cohort => &self.cohort,
            ProfileField::Job => &self.job,
            ProfileField::Company => &self.company,
            ProfileField::Introduction => &self.introduction,
        }
    }

    pub fn value_mut(&mut self, field: ProfileField) -> &mut String {
        match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Cohort => &mut self.cohort,
            ProfileField::Job => &mut self.job,
            ProfileField::Company => &mut self.company,
            ProfileField::Introduction => &mut self.introduction,
        }
    }

    /// Heading line, e.g. "Kim Salesio (25th)".
    pub fn headline(&self) -> String {
        let cohort = self.cohort.trim();
        if cohort.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, crate::utils::format_cohort_str(cohort))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Cohort,
    Job,
    Company,
    Introduction,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::Name,
        ProfileField::Cohort,
        ProfileField::Job,
        ProfileField::Company,
        ProfileField::Introduction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::Cohort => "Cohort",
            ProfileField::Job => "Job",
            ProfileField::Company => "Company",
            ProfileField::Introduction => "Introduction",
        }
    }
}
