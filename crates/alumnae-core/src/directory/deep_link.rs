//! Deep-link parameters that pre-seed the directory filters.
//!
//! Accepted keys: `cohort`, `region`, `search`, `payment`, `birthday`, `tag`.
//! Input may be a bare query string (`cohort=10&tag=IT`), a query with a
//! leading `?`, or a full URL. Unknown keys, empty values and values that do
//! not parse are ignored.

use reqwest::Url;
use tracing::debug;

use super::filter::{BirthdayFilter, FilterState, PaymentFilter};
use crate::models::PaymentStatus;

const QUERY_BASE: &str = "alumnae://directory";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeepLink {
    pub cohort: Option<u32>,
    pub region: Option<String>,
    pub search: Option<String>,
    pub payment: Option<PaymentStatus>,
    pub birthday: Option<BirthdayFilter>,
    pub tag: Option<String>,
}

impl DeepLink {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let url = match Url::parse(input) {
            Ok(url) if url.query().is_some() => url,
            _ => {
                let query = input.trim_start_matches('?');
                match Url::parse(&format!("{}?{}", QUERY_BASE, query)) {
                    Ok(url) => url,
                    Err(e) => {
                        debug!(error = %e, "Ignoring unparseable deep link");
                        return Self::default();
                    }
                }
            }
        };

        let mut link = Self::default();
        for (key, raw) in url.query_pairs() {
            let value = raw.trim();
            if value.is_empty() {
                continue;
            }
            match key.as_ref() {
                "cohort" => {
                    if let Ok(cohort) = value.parse::<u32>() {
                        if cohort >= 1 {
                            link.cohort = Some(cohort);
                        }
                    }
                }
                "region" => link.region = Some(value.to_string()),
                // Search is a substring match, so surrounding spaces matter
                "search" => link.search = Some(raw.to_string()),
                "payment" => {
                    link.payment = match value {
                        "paid" => Some(PaymentStatus::Paid),
                        "unpaid" => Some(PaymentStatus::Unpaid),
                        _ => link.payment,
                    }
                }
                "birthday" => {
                    link.birthday = match value {
                        "today" => Some(BirthdayFilter::Today),
                        "month" => Some(BirthdayFilter::Month),
                        _ => link.birthday,
                    }
                }
                "tag" => link.tag = Some(value.to_string()),
                other => debug!(key = other, "Ignoring unknown deep link parameter"),
            }
        }
        link
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Override the filter field by field; absent parameters leave it alone.
    pub fn apply_to(&self, filter: &mut FilterState) {
        if let Some(cohort) = self.cohort {
            filter.cohort_range = cohort..=cohort;
        }
        if let Some(region) = &self.region {
            filter.regions = [region.clone()].into_iter().collect();
        }
        if let Some(search) = &self.search {
            filter.search = search.clone();
        }
        if let Some(payment) = self.payment {
            filter.payment = PaymentFilter::Only(payment);
        }
        if let Some(birthday) = self.birthday {
            filter.birthday = birthday;
        }
        if let Some(tag) = &self.tag {
            filter.tags = [tag.clone()].into_iter().collect();
        }
    }

    /// Render back into a query string, keys in a fixed order.
    pub fn to_query(&self) -> String {
        let mut url = match Url::parse(QUERY_BASE) {
            Ok(url) => url,
            Err(_) => return String::new(),
        };
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(cohort) = self.cohort {
                pairs.append_pair("cohort", &cohort.to_string());
            }
            if let Some(region) = &self.region {
                pairs.append_pair("region", region);
            }
            if let Some(search) = &self.search {
                pairs.append_pair("search", search);
            }
            if let Some(payment) = self.payment {
                pairs.append_pair("payment", payment.as_str());
            }
            if let Some(birthday) = self.birthday {
                let value = match birthday {
                    BirthdayFilter::Today => "today",
                    BirthdayFilter::Month => "month",
                    BirthdayFilter::All => "all",
                };
                pairs.append_pair("birthday", value);
            }
            if let Some(tag) = &self.tag {
                pairs.append_pair("tag", tag);
            }
        }
        url.query().unwrap_or_default().to_string()
    }
}
