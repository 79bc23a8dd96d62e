//! Tolerant extraction of structured values from free-text completions.
//!
//! Every extractor returns a fallback rather than failing; a completion that
//! cannot be parsed still produces a cacheable value.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Insight, InsightKind};

pub const DEFAULT_FIT_SCORE: u8 = 70;
pub const DEFAULT_ROI: f64 = 0.0;
pub const DEFAULT_SALARY: &str = "N/A";
pub const MAX_USPS: usize = 5;

static LABELLED_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bscore\b\D{0,20}?(\d{1,3})\b").expect("valid score pattern")
});

static ANY_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,3})\b").expect("valid integer pattern"));

static LABELLED_ROI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\broi\b\D{0,20}?(\d+(?:\.\d+)?)").expect("valid roi pattern")
});

static MULTIPLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*x\b").expect("valid multiple pattern"));

static SALARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[₹$£€]\s?\d[\d,]*(?:\.\d+)?(?:\s?(?:Lakhs?|LPA|Cr|L|K|k|M))?")
        .expect("valid salary pattern")
});

static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:[-*•]|\d+[.)])\s+(.+?)\s*$").expect("valid bullet pattern")
});

// == Dispatch ==
/// Extracts the value for `kind` from a completion.
pub fn extract(kind: InsightKind, text: &str) -> Insight {
    match kind {
        InsightKind::FitScore => Insight::Score(fit_score(text)),
        InsightKind::Roi => Insight::Ratio(roi(text)),
        InsightKind::Salary => Insight::Text(salary(text)),
        InsightKind::Usps => Insight::List(usps(text)),
    }
}

/// A 0-100 score, preferring a number labelled "score".
pub fn fit_score(text: &str) -> u8 {
    let in_range = |m: &str| m.parse::<u8>().ok().filter(|n| *n <= 100);

    LABELLED_SCORE
        .captures_iter(text)
        .filter_map(|c| in_range(&c[1]))
        .next()
        .or_else(|| {
            ANY_INTEGER
                .captures_iter(text)
                .filter_map(|c| in_range(&c[1]))
                .next()
        })
        .unwrap_or(DEFAULT_FIT_SCORE)
}

/// An ROI multiple, either labelled ("ROI: 3.8") or suffixed ("3.8x").
pub fn roi(text: &str) -> f64 {
    [&*LABELLED_ROI, &*MULTIPLE]
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c[1].parse::<f64>().ok()))
        .unwrap_or(DEFAULT_ROI)
}

/// The first currency amount, verbatim.
pub fn salary(text: &str) -> String {
    SALARY
        .find(text)
        .map(|m| m.as_str().trim().trim_end_matches(',').to_string())
        .unwrap_or_else(|| DEFAULT_SALARY.to_string())
}

/// Up to [`MAX_USPS`] selling points: bullet items, else non-empty lines.
pub fn usps(text: &str) -> Vec<String> {
    let clean = |s: &str| s.replace("**", "").trim().to_string();

    let bullets: Vec<String> = BULLET
        .captures_iter(text)
        .map(|c| clean(&c[1]))
        .filter(|s| !s.is_empty())
        .take(MAX_USPS)
        .collect();
    if !bullets.is_empty() {
        return bullets;
    }

    text.lines()
        .map(clean)
        .filter(|s| !s.is_empty())
        .take(MAX_USPS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_score_prefers_labelled_number() {
        assert_eq!(fit_score("Among 3 options, the fit score is 87/100."), 87);
        assert_eq!(fit_score("Score: 92"), 92);
    }

    #[test]
    fn test_fit_score_falls_back_to_any_number_in_range() {
        assert_eq!(fit_score("I would rate this 450 out of 1000... say 64"), 64);
    }

    #[test]
    fn test_fit_score_default() {
        assert_eq!(fit_score("A strong match overall."), DEFAULT_FIT_SCORE);
        assert_eq!(fit_score(""), DEFAULT_FIT_SCORE);
    }

    #[test]
    fn test_roi_patterns() {
        assert_eq!(roi("Estimated ROI: 3.8 over five years"), 3.8);
        assert_eq!(roi("Expect roughly a 2.5x return"), 2.5);
        assert_eq!(roi("hard to say"), DEFAULT_ROI);
    }

    #[test]
    fn test_salary_patterns() {
        assert_eq!(salary("Average starting salary is ₹26.0L per year"), "₹26.0L");
        assert_eq!(salary("Graduates earn $85,000 on average"), "$85,000");
        assert_eq!(salary("around £42k"), "£42k");
        assert_eq!(salary("Not enough data"), DEFAULT_SALARY);
    }

    #[test]
    fn test_usps_from_bullets() {
        let text = "Highlights:\n- **World-class** research\n* Strong alumni network\n1. Located in Boston\n";
        assert_eq!(
            usps(text),
            vec!["World-class research", "Strong alumni network", "Located in Boston"]
        );
    }

    #[test]
    fn test_usps_caps_and_falls_back_to_lines() {
        let many = (1..=8).map(|i| format!("- point {}", i)).collect::<Vec<_>>().join("\n");
        assert_eq!(usps(&many).len(), MAX_USPS);

        assert_eq!(usps("Small classes\n\nGreat labs"), vec!["Small classes", "Great labs"]);
        assert!(usps("   ").is_empty());
    }

    #[test]
    fn test_extract_dispatch() {
        assert_eq!(extract(InsightKind::FitScore, "score 88"), Insight::Score(88));
        assert_eq!(extract(InsightKind::Roi, "ROI 1.9"), Insight::Ratio(1.9));
        assert_eq!(
            extract(InsightKind::Salary, "₹26.0L"),
            Insight::Text("₹26.0L".into())
        );
        assert_eq!(
            extract(InsightKind::Usps, "- Tutorials"),
            Insight::List(vec!["Tutorials".into()])
        );
    }
}
