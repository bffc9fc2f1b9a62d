use std::collections::HashMap;

use crate::models::RatePayable;

use super::normalize_key;

/// Strict fallback chain: mapped worker locale, then mapped project locale,
/// then the configured default. There is no fuzzy matching: an unmapped
/// client string falls through even if it is itself a valid ISO code.
pub fn resolve_locale(
    worker_locale: Option<&str>,
    project_locale: Option<&str>,
    mappings: &HashMap<String, String>,
    fallback: &str,
) -> String {
    if let Some(raw) = worker_locale {
        if !raw.trim().is_empty() {
            if let Some(mapped) = mappings.get(&normalize_key(raw)) {
                return mapped.clone();
            }
        }
    }
    if let Some(raw) = project_locale {
        if !raw.trim().is_empty() {
            if let Some(mapped) = mappings.get(&normalize_key(raw)) {
                return mapped.clone();
            }
        }
    }
    fallback.to_string()
}

/// More than one rate matched a (locale, tier, date) lookup: overlapping
/// effective windows in rates_payable that the import refuses to pick from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateConflict {
    pub locale: String,
    pub expert_tier: Option<String>,
    pub work_date: String,
    pub candidates: usize,
}

/// Find the rate effective for (locale, tier) on the work date. Effective
/// windows are compared as ISO date strings; a NULL effective_to is open.
/// Zero matches is fine (the row degrades to null earnings); two or more
/// is a data-integrity conflict surfaced to the caller.
pub fn find_rate<'a>(
    rates: &'a [RatePayable],
    locale: &str,
    expert_tier: Option<&str>,
    work_date: &str,
) -> std::result::Result<Option<&'a RatePayable>, RateConflict> {
    let mut matches = rates.iter().filter(|rate| {
        rate.locale == locale
            && rate.expert_tier.as_deref() == expert_tier
            && rate.effective_from.as_str() <= work_date
            && rate.effective_to.as_deref().map_or(true, |to| to >= work_date)
    });
    let first = matches.next();
    let extra = matches.count();
    if extra > 0 {
        return Err(RateConflict {
            locale: locale.to_string(),
            expert_tier: expert_tier.map(|t| t.to_string()),
            work_date: work_date.to_string(),
            candidates: extra + 1,
        });
    }
    Ok(first)
}

/// Earnings use exactly one basis: per-unit whenever the rate carries a
/// positive rate_per_unit, otherwise per-hour. Never the sum of both.
pub fn calculate_earnings(
    units_completed: f64,
    hours_worked: f64,
    rate: Option<&RatePayable>,
) -> (Option<String>, Option<f64>) {
    let Some(rate) = rate else {
        return (None, None);
    };
    let earnings = if rate.rate_per_unit > 0.0 {
        rate.rate_per_unit * units_completed
    } else {
        rate.rate_per_hour * hours_worked
    };
    let earnings = if earnings.is_finite() { Some(earnings) } else { None };
    (Some(rate.currency.clone()), earnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("es-mx".to_string(), "es-419".to_string());
        map.insert("pt-br".to_string(), "pt-BR".to_string());
        map
    }

    fn rate(
        id: i64,
        locale: &str,
        tier: Option<&str>,
        per_unit: f64,
        per_hour: f64,
        from: &str,
        to: Option<&str>,
    ) -> RatePayable {
        RatePayable {
            id,
            locale: locale.to_string(),
            expert_tier: tier.map(|t| t.to_string()),
            rate_per_unit: per_unit,
            rate_per_hour: per_hour,
            currency: "USD".to_string(),
            effective_from: from.to_string(),
            effective_to: to.map(|t| t.to_string()),
        }
    }

    #[test]
    fn test_worker_locale_mapping_wins() {
        let locale = resolve_locale(Some("es-MX"), Some("pt-br"), &mappings(), "en-US");
        assert_eq!(locale, "es-419");
    }

    #[test]
    fn test_project_locale_used_when_worker_unset() {
        let locale = resolve_locale(None, Some("pt-BR"), &mappings(), "en-US");
        assert_eq!(locale, "pt-BR");
    }

    #[test]
    fn test_unmapped_worker_locale_falls_through_to_project() {
        let locale = resolve_locale(Some("fil-PH"), Some("es-mx"), &mappings(), "en-US");
        assert_eq!(locale, "es-419");
    }

    #[test]
    fn test_fallback_when_nothing_maps() {
        assert_eq!(resolve_locale(None, None, &mappings(), "en-US"), "en-US");
        // an unmapped string does not pass through, even if it looks like an ISO code
        assert_eq!(resolve_locale(Some("fr-FR"), None, &mappings(), "en-US"), "en-US");
        assert_eq!(resolve_locale(Some(""), Some(" "), &mappings(), "en-US"), "en-US");
    }

    #[test]
    fn test_find_rate_matches_locale_tier_and_window() {
        let rates = vec![
            rate(1, "es-419", Some("expert"), 2.0, 15.0, "2025-01-01", Some("2025-06-30")),
            rate(2, "es-419", Some("expert"), 2.5, 16.0, "2025-07-01", None),
            rate(3, "en-US", Some("expert"), 3.0, 20.0, "2025-01-01", None),
        ];
        let hit = find_rate(&rates, "es-419", Some("expert"), "2025-03-10").unwrap().unwrap();
        assert_eq!(hit.id, 1);
        let hit = find_rate(&rates, "es-419", Some("expert"), "2025-11-10").unwrap().unwrap();
        assert_eq!(hit.id, 2);
    }

    #[test]
    fn test_find_rate_window_is_inclusive() {
        let rates = vec![rate(1, "en-US", None, 2.0, 0.0, "2025-01-01", Some("2025-01-31"))];
        assert!(find_rate(&rates, "en-US", None, "2025-01-01").unwrap().is_some());
        assert!(find_rate(&rates, "en-US", None, "2025-01-31").unwrap().is_some());
        assert!(find_rate(&rates, "en-US", None, "2024-12-31").unwrap().is_none());
        assert!(find_rate(&rates, "en-US", None, "2025-02-01").unwrap().is_none());
    }

    #[test]
    fn test_find_rate_no_match_is_none() {
        let rates = vec![rate(1, "en-US", Some("expert"), 2.0, 0.0, "2025-01-01", None)];
        assert!(find_rate(&rates, "en-US", Some("standard"), "2025-03-01").unwrap().is_none());
        assert!(find_rate(&rates, "pt-BR", Some("expert"), "2025-03-01").unwrap().is_none());
    }

    #[test]
    fn test_find_rate_overlapping_windows_conflict() {
        let rates = vec![
            rate(1, "en-US", Some("expert"), 2.0, 0.0, "2025-01-01", None),
            rate(2, "en-US", Some("expert"), 2.5, 0.0, "2025-03-01", None),
        ];
        let err = find_rate(&rates, "en-US", Some("expert"), "2025-04-01").unwrap_err();
        assert_eq!(err.candidates, 2);
        assert_eq!(err.locale, "en-US");
        // before the overlap starts there is exactly one match
        assert!(find_rate(&rates, "en-US", Some("expert"), "2025-02-01").unwrap().is_some());
    }

    #[test]
    fn test_earnings_unit_basis_wins() {
        let r = rate(1, "en-US", None, 2.0, 15.0, "2025-01-01", None);
        let (currency, earnings) = calculate_earnings(10.0, 3.0, Some(&r));
        assert_eq!(currency.as_deref(), Some("USD"));
        assert_eq!(earnings, Some(20.0));
    }

    #[test]
    fn test_earnings_hour_basis_when_no_unit_rate() {
        let r = rate(1, "en-US", None, 0.0, 15.0, "2025-01-01", None);
        let (_, earnings) = calculate_earnings(10.0, 3.0, Some(&r));
        assert_eq!(earnings, Some(45.0));
    }

    #[test]
    fn test_earnings_without_rate() {
        let (currency, earnings) = calculate_earnings(10.0, 3.0, None);
        assert_eq!(currency, None);
        assert_eq!(earnings, None);
    }

    #[test]
    fn test_non_finite_earnings_become_none() {
        let r = rate(1, "en-US", None, f64::MAX, 0.0, "2025-01-01", None);
        let (currency, earnings) = calculate_earnings(f64::MAX, 0.0, Some(&r));
        assert_eq!(currency.as_deref(), Some("USD"));
        assert_eq!(earnings, None);
    }
}
