use std::io::Read;

pub const DEFAULT_CURRENCY_PREFIX: &str = "$";

pub fn read_stdin() -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    std::io::stdin().read_to_end(&mut buf)?;
    Ok(buf)
}

/// Fixed four decimal places; absent cost renders as `0.0000`.
pub fn format_cost(v: Option<f64>) -> String {
    let v = v.unwrap_or(0.0);
    // -0.0 would otherwise print as "-0.0000"
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:.4}")
}

/// Last path segment, accepting both `/` and `\` separators and ignoring
/// trailing ones. A bare root (`/`, `\\`) is returned as given.
pub fn dir_label(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return path;
    }
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}
