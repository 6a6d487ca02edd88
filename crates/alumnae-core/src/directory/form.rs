//! Registration and edit form validation.

use rand::Rng;
use thiserror::Error;

use crate::models::{Birthday, Member, MemberProfile, NewMember};

/// Region used when the form leaves it blank.
pub const DEFAULT_REGION: &str = "Seoul Gangnam";
/// Tag given to members registered without any.
pub const DEFAULT_TAG: &str = "New member";
pub const DEFAULT_JOB: &str = "Job not entered";
pub const DEFAULT_COMPANY: &str = "Company not entered";
pub const DEFAULT_EMAIL: &str = "email@example.com";
pub const DEFAULT_PHONE: &str = "010-0000-0000";
pub const DEFAULT_INTRODUCTION: &str = "Hello!";

/// Rejected form submission, listing every failing field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("The following fields are missing or invalid: {}", .fields.join(", "))]
pub struct ValidationError {
    pub fields: Vec<&'static str>,
}

impl ValidationError {
    pub fn new(fields: Vec<&'static str>) -> Self {
        Self { fields }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Cohort,
    Region,
    Job,
    Company,
    Email,
    Phone,
    Introduction,
    Tags,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Name,
        FormField::Cohort,
        FormField::Region,
        FormField::Job,
        FormField::Company,
        FormField::Email,
        FormField::Phone,
        FormField::Introduction,
        FormField::Tags,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Cohort => "Cohort",
            FormField::Region => "Region",
            FormField::Job => "Job",
            FormField::Company => "Company",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
            FormField::Introduction => "Introduction",
            FormField::Tags => "Tags (comma separated)",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, FormField::Name | FormField::Cohort)
    }
}

/// Raw text of the registration/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberForm {
    pub name: String,
    pub cohort: String,
    pub region: String,
    pub job: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub introduction: String,
    pub tags: String,
}

impl Default for MemberForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            cohort: String::new(),
            region: DEFAULT_REGION.to_string(),
            job: String::new(),
            company: String::new(),
            email: String::new(),
            phone: String::new(),
            introduction: String::new(),
            tags: String::new(),
        }
    }
}

impl MemberForm {
    /// Prefill the form for editing an existing member.
    pub fn from_member(member: &Member) -> Self {
        Self {
            name: member.name.clone(),
            cohort: member.cohort.to_string(),
            region: member.region.clone(),
            job: member.job.clone(),
            company: member.company.clone(),
            email: member.email.clone(),
            phone: member.phone.clone(),
            introduction: member.introduction.clone(),
            tags: member.tags_display(),
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Cohort => &self.cohort,
            FormField::Region => &self.region,
            FormField::Job => &self.job,
            FormField::Company => &self.company,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Introduction => &self.introduction,
            FormField::Tags => &self.tags,
        }
    }

    pub fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Cohort => &mut self.cohort,
            FormField::Region => &mut self.region,
            FormField::Job => &mut self.job,
            FormField::Company => &mut self.company,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Introduction => &mut self.introduction,
            FormField::Tags => &mut self.tags,
        }
    }

    /// Check required fields and build the normalized profile.
    ///
    /// Name must be non-blank and cohort a positive integer. All failures are
    /// reported together.
    pub fn validate(&self) -> Result<MemberProfile, ValidationError> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name");
        }

        let cohort_text = self.cohort.trim();
        let cohort = if cohort_text.is_empty() {
            errors.push("cohort");
            None
        } else {
            match cohort_text.parse::<u32>() {
                Ok(n) if n >= 1 => Some(n),
                _ => {
                    errors.push("cohort (positive number)");
                    None
                }
            }
        };

        let cohort = match cohort {
            Some(c) if errors.is_empty() => c,
            _ => return Err(ValidationError::new(errors)),
        };

        Ok(MemberProfile {
            name: name.to_string(),
            cohort,
            region: or_default(&self.region, DEFAULT_REGION),
            job: or_default(&self.job, DEFAULT_JOB),
            company: or_default(&self.company, DEFAULT_COMPANY),
            email: or_default(&self.email, DEFAULT_EMAIL),
            phone: or_default(&self.phone, DEFAULT_PHONE),
            introduction: or_default(&self.introduction, DEFAULT_INTRODUCTION),
            tags: parse_tags(&self.tags),
        })
    }

    /// Validate for registration: adds a random birthday and unpaid status.
    pub fn validate_new<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<NewMember, ValidationError> {
        let profile = self.validate()?;
        Ok(NewMember::new(profile, Birthday::random(rng)))
    }
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Split on commas, trim, drop empties and duplicates. Never returns an
/// empty list.
pub fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    if tags.is_empty() {
        tags.push(DEFAULT_TAG.to_string());
    }
    tags
}
