//! Ordering and deduplication of release data

use crate::report::release::ReleaseData;
use crate::version::semver::is_version_lower;

/// Sort by module name. The sort is stable, so entries for the same module
/// keep the order they were collected in.
pub fn sort_release_data(data: &mut [ReleaseData]) {
    data.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Collapse runs of entries with the same name into the entry with the
/// lowest minimum supported version. Ties keep the earlier entry.
///
/// Expects `data` to be sorted by name.
pub fn prune_release_data(data: Vec<ReleaseData>) -> Vec<ReleaseData> {
    let mut pruned: Vec<ReleaseData> = Vec::with_capacity(data.len());

    for entry in data {
        match pruned.last_mut() {
            Some(kept) if kept.name == entry.name => {
                if is_version_lower(&entry.min_supported_version, &kept.min_supported_version) {
                    *kept = entry;
                }
            }
            _ => pruned.push(entry),
        }
    }

    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn release(name: &str, min_supported_version: &str) -> ReleaseData {
        ReleaseData {
            name: name.to_string(),
            min_supported_version: min_supported_version.to_string(),
            ..Default::default()
        }
    }

    fn summary(data: &[ReleaseData]) -> Vec<(&str, &str)> {
        data.iter()
            .map(|r| (r.name.as_str(), r.min_supported_version.as_str()))
            .collect()
    }

    #[test]
    fn sort_release_data_is_stable_by_name() {
        let mut data = vec![
            release("koa", "2.0.0"),
            release("express", "4.6.0"),
            release("koa", "1.0.0"),
        ];

        sort_release_data(&mut data);

        assert_eq!(
            summary(&data),
            vec![("express", "4.6.0"), ("koa", "2.0.0"), ("koa", "1.0.0")]
        );
    }

    #[rstest]
    #[case::empty(vec![], vec![])]
    #[case::single(vec![("koa", "2.0.0")], vec![("koa", "2.0.0")])]
    #[case::lower_first(
        vec![("koa", "1.0.0"), ("koa", "2.0.0")],
        vec![("koa", "1.0.0")]
    )]
    #[case::lower_second(
        vec![("koa", "2.0.0"), ("koa", "1.0.0")],
        vec![("koa", "1.0.0")]
    )]
    #[case::tie_keeps_first(
        vec![("pg", "8.2.0"), ("pg", "8.2.0")],
        vec![("pg", "8.2.0")]
    )]
    #[case::run_of_three(
        vec![("pg", "8.2.0"), ("pg", "7.0.0"), ("pg", "8.0.0")],
        vec![("pg", "7.0.0")]
    )]
    #[case::unpaired_last_entry(
        vec![("express", "4.6.0"), ("koa", "2.0.0"), ("koa", "1.5.0"), ("redis", "2.6.0")],
        vec![("express", "4.6.0"), ("koa", "1.5.0"), ("redis", "2.6.0")]
    )]
    #[case::mixed(
        vec![
            ("a", "1.0.0"),
            ("b", "3.0.0"),
            ("b", "2.0.0"),
            ("c", "1.2.0"),
            ("c", "1.10.0"),
            ("c", "1.1.0"),
            ("d", "0.1.0"),
        ],
        vec![("a", "1.0.0"), ("b", "2.0.0"), ("c", "1.1.0"), ("d", "0.1.0")]
    )]
    fn prune_release_data_keeps_lowest_per_name(
        #[case] input: Vec<(&str, &str)>,
        #[case] expected: Vec<(&str, &str)>,
    ) {
        let data = input
            .into_iter()
            .map(|(name, version)| release(name, version))
            .collect();

        let pruned = prune_release_data(data);

        assert_eq!(summary(&pruned), expected);
    }

    #[test]
    fn prune_release_data_keeps_the_whole_surviving_entry() {
        let mut higher = release("mongodb", "4.1.0");
        higher.min_agent_version = "11.0.0".to_string();
        let mut lower = release("mongodb", "2.1.0");
        lower.min_agent_version = "10.0.0".to_string();

        let pruned = prune_release_data(vec![higher, lower.clone()]);

        assert_eq!(pruned, vec![lower]);
    }
}
