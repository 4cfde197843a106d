pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Unique scratch path under the system temp dir.
#[cfg(test)]
pub fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "reelguess-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}
