//! Benchmark datasets with known sample counts.

/// Built-in dataset names and sizes, in report seeding order.
pub const BUILTIN_DATASETS: [(&str, u64); 8] = [
    ("DUTS", 5019),
    ("DUT-OMRON", 5168),
    ("HKU-IS", 1447),
    ("ECSSD", 1000),
    ("PASCAL-S", 850),
    ("SOC", 1200),
    ("MSRA10K", 10000),
    ("THUR15K", 15531),
];

/// Sample count of a recognized benchmark dataset.
pub fn builtin_size(name: &str) -> Option<u64> {
    BUILTIN_DATASETS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|&(_, size)| size)
}

/// Canonical (uppercased) form of a dataset name, used for every report
/// key.
pub fn normalize_name(name: &str) -> String {
    name.to_ascii_uppercase()
}
