//! Helpers for asserting on Prometheus text exposition.

/// Value of the first sample of `metric` whose label set contains every
/// entry of `labels` (each written as `key="value"`).
///
/// Returns `None` when no such sample exists.
pub fn sample_value(exposition: &str, metric: &str, labels: &[&str]) -> Option<f64> {
    exposition
        .lines()
        .filter(|line| !line.starts_with('#'))
        .find(|line| {
            let matches_name = line
                .strip_prefix(metric)
                .is_some_and(|rest| rest.starts_with('{') || rest.starts_with(' '));
            matches_name && labels.iter().all(|label| line.contains(label))
        })
        .and_then(|line| line.rsplit(' ').next())
        .and_then(|value| value.parse().ok())
}
