use chrono::NaiveDate;

/// Published newsletter issues, newest first: (issue number, year, month).
const ISSUES: [(u32, i32, u32); 3] = [(103, 2024, 9), (102, 2024, 6), (101, 2024, 3)];

/// One issue of the association newsletter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsletterIssue {
    pub number: u32,
    pub published: NaiveDate,
}

impl NewsletterIssue {
    pub fn title(&self) -> String {
        format!("Alumnae Newsletter No. {}", self.number)
    }

    pub fn published_display(&self) -> String {
        format!("Published {}", self.published.format("%B %Y"))
    }

    /// Storage key of the issue's PDF inside the archive bucket.
    pub fn pdf_key(&self) -> String {
        format!("newsletters/{}.pdf", self.number)
    }
}

/// Every issue in the archive, newest first.
pub fn newsletter_issues() -> Vec<NewsletterIssue> {
    ISSUES
        .iter()
        .filter_map(|&(number, year, month)| {
            NaiveDate::from_ymd_opt(year, month, 1).map(|published| NewsletterIssue { number, published })
        })
        .collect()
}
