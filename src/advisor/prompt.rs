//! Prompt construction for each insight kind.

use std::fmt::Write;

use crate::models::{InsightKind, InsightRequest};

/// Builds the completion prompt for `kind`.
pub fn build_prompt(kind: InsightKind, req: &InsightRequest) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are a study-abroad counselor assessing {} for a student.",
        req.college
    );
    if let Some(country) = &req.country {
        let _ = writeln!(prompt, "Destination country: {}.", country);
    }
    if let Some(course) = &req.course {
        let _ = writeln!(prompt, "Intended course: {}.", course);
    }
    if let Some(profile) = &req.profile {
        let _ = writeln!(prompt, "Student profile: {}", profile);
    }

    let task = match kind {
        InsightKind::FitScore => {
            "Reply with a single line of the form `Fit score: N` where N is 0 to 100."
        }
        InsightKind::Roi => {
            "Estimate the return on investment as a multiple of total cost. \
             Reply with a single line of the form `ROI: N.Nx`."
        }
        InsightKind::Salary => {
            "Estimate the average starting salary for graduates in the local \
             currency, for example `₹26.0L` or `$85,000`. Reply with the amount only."
        }
        InsightKind::Usps => {
            "List the college's unique selling points for this student as up to \
             five short bullet points starting with `- `."
        }
    };
    prompt.push_str(task);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_mentions_college_and_optional_fields() {
        let mut req = InsightRequest::new("91234", "MIT");
        req.country = Some("USA".to_string());
        req.profile = Some(json!({ "gpa": 3.9 }));

        let prompt = build_prompt(InsightKind::FitScore, &req);
        assert!(prompt.contains("MIT"));
        assert!(prompt.contains("USA"));
        assert!(prompt.contains("\"gpa\":3.9"));
        assert!(prompt.contains("Fit score"));
        assert!(!prompt.contains("Intended course"));
    }

    #[test]
    fn test_prompt_differs_per_kind() {
        let req = InsightRequest::new("1", "Oxford");
        let prompts: Vec<String> = InsightKind::ALL
            .into_iter()
            .map(|kind| build_prompt(kind, &req))
            .collect();

        for (i, a) in prompts.iter().enumerate() {
            for b in prompts.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
