/// Normalize a spreadsheet header: control characters (newlines, tabs) become
/// spaces, whitespace runs collapse to a single space and the ends are trimmed.
pub fn normalize_header(value: &str) -> String {
    let cleaned = value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>();

    return cleaned.split_whitespace().collect::<Vec<&str>>().join(" ");
}
