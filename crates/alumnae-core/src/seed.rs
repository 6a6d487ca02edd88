//! Random demo rosters for a first run without saved data.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{ApprovalStatus, Birthday, Member, PaymentStatus};
use crate::store::sort_by_name;

const FAMILY_NAMES: &[&str] = &["Kim", "Lee", "Park", "Choi", "Jung", "Kang", "Cho", "Yoon", "Jang", "Lim"];

const GIVEN_NAMES: &[&str] = &[
    "Minji", "Seoyeon", "Jiwoo", "Hayoon", "Sua", "Yuna", "Eunji", "Dahye", "Soyeon", "Hyejin",
    "Jisoo", "Nari",
];

const REGIONS: &[&str] = &[
    "Seoul Gangnam",
    "Seoul Seocho",
    "Seoul Mapo",
    "Gyeonggi Bundang",
    "Busan Haeundae",
    "New York",
    "Sydney",
    "Gwangju Dong-gu",
    "Daegu Suseong",
];

const JOBS: &[&str] = &[
    "Attorney", "Physician", "Teacher", "Software Engineer", "Designer", "Accountant",
    "Researcher", "Pharmacist", "Marketer", "Founder",
];

const COMPANIES: &[&str] = &[
    "Hanbit Partners", "Seoul Medical Center", "Blue Harbor Labs", "Mirae Finance", "Daon Studio",
    "Namsan Law Group", "Green Table", "Arum School",
];

const TAGS: &[&str] = &[
    "IT", "Startup", "Law", "Medical", "Education", "F&B", "Finance", "Art", "Overseas", "Marketing",
];

const INTRODUCTIONS: &[&str] = &[
    "Happy to help fellow alumnae with career questions.",
    "Always up for coffee when you're in town.",
    "Looking for partners for a new project.",
    "Glad to be back in touch with everyone.",
];

/// Highest cohort a generated member can have.
const MAX_SEED_COHORT: u32 = 60;

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Generate `count` members with ids `1..=count`, sorted by name.
pub fn generate_roster<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Member> {
    let mut roster: Vec<Member> = (1..=count as i64).map(|id| generate_member(id, rng)).collect();
    sort_by_name(&mut roster);
    roster
}

pub fn generate_member<R: Rng + ?Sized>(id: i64, rng: &mut R) -> Member {
    let family = pick(rng, FAMILY_NAMES);
    let given = pick(rng, GIVEN_NAMES);
    let tag_count = rng.gen_range(1..=2);
    let tags = TAGS
        .choose_multiple(rng, tag_count)
        .map(|t| t.to_string())
        .collect();
    let payment_status = if rng.gen_bool(0.5) {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Unpaid
    };

    Member {
        id,
        name: format!("{} {}", family, given),
        cohort: rng.gen_range(1..=MAX_SEED_COHORT),
        region: pick(rng, REGIONS).to_string(),
        job: pick(rng, JOBS).to_string(),
        company: pick(rng, COMPANIES).to_string(),
        email: format!(
            "{}.{}{}@example.com",
            given.to_lowercase(),
            family.to_lowercase(),
            id
        ),
        phone: format!(
            "010-{:04}-{:04}",
            rng.gen_range(0..10_000),
            rng.gen_range(0..10_000)
        ),
        introduction: pick(rng, INTRODUCTIONS).to_string(),
        tags,
        birthday: Some(Birthday::random(rng)),
        payment_status,
        approval_status: ApprovalStatus::Approved,
    }
}
