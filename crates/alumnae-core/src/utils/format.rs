use std::cmp::Ordering;

/// Truncate a string to at most `max_chars` characters, adding "..." when cut.
/// Counts characters, not bytes, so multi-byte names never split.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else if max_chars <= 3 {
        s.chars().take(max_chars).collect()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}

/// Case-insensitive ordering with an exact comparison as tie-breaker,
/// so the result is total and stable across runs.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Ordinal cohort label: 1st, 2nd, 3rd, 11th, 22nd...
pub fn format_cohort(cohort: u32) -> String {
    let suffix = match (cohort % 10, cohort % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", cohort, suffix)
}

/// Like `format_cohort` for free-text input; non-numeric text is returned as-is.
pub fn format_cohort_str(cohort: &str) -> String {
    match cohort.trim().parse::<u32>() {
        Ok(n) => format_cohort(n),
        Err(_) => cohort.to_string(),
    }
}

pub fn format_percent(percent: u32) -> String {
    format!("{}%", percent)
}

/// Won amount with thousands separators, e.g. `₩2,450,000`.
pub fn format_won(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("₩{}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("김살레시오동문", 5), "김살...");
    }

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("alice", "Bob"), Ordering::Less);
        assert_eq!(cmp_ignore_case("Bob", "alice"), Ordering::Greater);
        assert_eq!(cmp_ignore_case("kim", "Kim"), Ordering::Greater);
        assert_eq!(cmp_ignore_case("Kim", "Kim"), Ordering::Equal);
    }

    #[test]
    fn test_format_cohort() {
        assert_eq!(format_cohort(1), "1st");
        assert_eq!(format_cohort(2), "2nd");
        assert_eq!(format_cohort(3), "3rd");
        assert_eq!(format_cohort(11), "11th");
        assert_eq!(format_cohort(12), "12th");
        assert_eq!(format_cohort(22), "22nd");
        assert_eq!(format_cohort(113), "113th");
        assert_eq!(format_cohort_str("25"), "25th");
        assert_eq!(format_cohort_str("n/a"), "n/a");
    }

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(0), "₩0");
        assert_eq!(format_won(999), "₩999");
        assert_eq!(format_won(1_000), "₩1,000");
        assert_eq!(format_won(2_450_000), "₩2,450,000");
    }
}
