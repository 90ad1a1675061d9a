//! Clean-up of model-generated SQL before it reaches the executor.
//!
//! Models wrap SQL in fences, prepend prose or emit several statements.
//! These functions reduce the output to one SELECT and cap its size; they
//! never change what the query means, except [`fix_attrition`] which maps
//! the numeric attrition flags to the text values the table stores.

use std::sync::LazyLock;

use regex::Regex;

fn pattern(re: &str) -> Regex {
    Regex::new(re).unwrap_or_else(|e| panic!("invalid SQL pattern {re:?}: {e}"))
}

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+"));
static ONLY_WORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\bonly\b"));
static SELECT_WORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)select"));
static COUNT_SELECT: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)select\s+count\s*\("));
static LIMIT_CLAUSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\blimit\b"));
static BAD_ATTRITION: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\battrition\s*=\s*([01])\b"));
static PLACEHOLDERS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        pattern(r"select\s+query\b"),
        pattern(r"select\s+sql\b"),
        pattern(r"select\s+data\b"),
        pattern(r"select\s+\*\s*limit\b"),
    ]
});

/// Strips markdown fences and collapses all whitespace to single spaces.
pub fn normalize_sql(sql: &str) -> String {
    let unfenced = sql.replace("```sql", "").replace("```", "");
    WHITESPACE.replace_all(unfenced.trim(), " ").trim().to_string()
}

/// First statement of the output, starting at its first `select`.
pub fn extract_first_select(sql: &str) -> String {
    let normalized = normalize_sql(sql);
    let mut s = ONLY_WORD.replace_all(&normalized, "").trim().to_string();

    if let Some(end) = s.find(';') {
        s = format!("{};", s[..end].trim());
    }
    // byte offsets must come from `s` itself; lowercasing can change lengths
    if let Some(start) = SELECT_WORD.find(&s).map(|m| m.start()) {
        if start > 0 {
            s = s[start..].to_string();
        }
    }
    WHITESPACE.replace_all(s.trim(), " ").to_string()
}

/// Appends `LIMIT limit` unless the statement already limits itself or is a
/// plain `SELECT COUNT(...)`. Always ends with exactly one `;`.
pub fn ensure_limit(sql: &str, limit: usize) -> String {
    let s = extract_first_select(sql);
    let body = s.trim_end_matches(';').trim_end();

    if COUNT_SELECT.is_match(body) || LIMIT_CLAUSE.is_match(body) {
        return format!("{body};");
    }
    format!("{body} LIMIT {limit};")
}

/// `extract_first_select` + `fix_attrition` + `ensure_limit`.
pub fn prepare_sql(raw: &str, limit: usize) -> String {
    ensure_limit(&fix_attrition(&extract_first_select(raw)), limit)
}

/// True when the query compares `Attrition` to 1 or 0.
pub fn contains_bad_attrition(sql: &str) -> bool {
    BAD_ATTRITION.is_match(&extract_first_select(sql))
}

/// Rewrites `Attrition = 1` / `Attrition = 0` to `'Yes'` / `'No'`.
pub fn fix_attrition(sql: &str) -> String {
    BAD_ATTRITION
        .replace_all(sql, |caps: &regex::Captures<'_>| {
            let value = if &caps[1] == "1" { "'Yes'" } else { "'No'" };
            format!("Attrition = {value}")
        })
        .into_owned()
}

/// Heuristic check that the query is a real SELECT over `employees`.
pub fn is_valid_hr_sql(sql: &str) -> bool {
    let s = extract_first_select(sql).to_lowercase();

    if !s.starts_with("select") || !s.contains(" from employees") {
        return false;
    }
    if BAD_ATTRITION.is_match(&s) {
        return false;
    }
    !PLACEHOLDERS.iter().any(|p| p.is_match(&s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sql_strips_fences() {
        let raw = "```sql\nSELECT Department,\n  COUNT(*)\nFROM employees\n```";
        assert_eq!(normalize_sql(raw), "SELECT Department, COUNT(*) FROM employees");
    }

    #[test]
    fn test_extract_first_select() {
        assert_eq!(
            extract_first_select("Here is the query: SELECT * FROM employees; SELECT 2;"),
            "SELECT * FROM employees;"
        );
        assert_eq!(
            extract_first_select("Only SELECT Age FROM employees"),
            "SELECT Age FROM employees"
        );
        assert_eq!(extract_first_select("no query here"), "no query here");
    }

    #[test]
    fn test_extract_first_select_after_non_ascii_prose() {
        // KELVIN SIGN shrinks and dotted capital I grows when lowercased
        assert_eq!(
            extract_first_select("\u{212A} SELECT Age FROM employees"),
            "SELECT Age FROM employees"
        );
        assert_eq!(
            extract_first_select("İstanbul office: SELECT Age FROM employees;"),
            "SELECT Age FROM employees;"
        );
        assert_eq!(
            prepare_sql("Voilà \u{212A}elvin: select Age from employees where attrition = 1", 50),
            "select Age from employees where Attrition = 'Yes' LIMIT 50;"
        );
        assert!(is_valid_hr_sql("İ SELECT Age FROM employees"));
    }

    #[test]
    fn test_ensure_limit() {
        assert_eq!(
            ensure_limit("SELECT * FROM employees", 50),
            "SELECT * FROM employees LIMIT 50;"
        );
        assert_eq!(
            ensure_limit("SELECT * FROM employees LIMIT 5;", 50),
            "SELECT * FROM employees LIMIT 5;"
        );
        assert_eq!(
            ensure_limit("select count(*) from employees", 50),
            "select count(*) from employees;"
        );
        // grouped counts are not plain counts
        assert_eq!(
            ensure_limit("SELECT Department, COUNT(*) FROM employees GROUP BY Department", 10),
            "SELECT Department, COUNT(*) FROM employees GROUP BY Department LIMIT 10;"
        );
    }

    #[test]
    fn test_bad_attrition() {
        assert!(contains_bad_attrition(
            "SELECT COUNT(*) FROM employees WHERE Attrition = 1"
        ));
        assert!(contains_bad_attrition("select * from employees where attrition=0"));
        assert!(!contains_bad_attrition(
            "SELECT COUNT(*) FROM employees WHERE Attrition = 'Yes'"
        ));
        assert!(!contains_bad_attrition(
            "SELECT * FROM employees WHERE Attrition = 10"
        ));
    }

    #[test]
    fn test_fix_attrition() {
        assert_eq!(
            fix_attrition("SELECT COUNT(*) FROM employees WHERE attrition=1 OR Attrition = 0"),
            "SELECT COUNT(*) FROM employees WHERE Attrition = 'Yes' OR Attrition = 'No'"
        );
    }

    #[test]
    fn test_is_valid_hr_sql() {
        assert!(is_valid_hr_sql("SELECT COUNT(*) FROM employees WHERE Attrition = 'Yes';"));
        assert!(!is_valid_hr_sql("SELECT 1"));
        assert!(!is_valid_hr_sql("SELECT * FROM staff"));
        assert!(!is_valid_hr_sql("SELECT COUNT(*) FROM employees WHERE Attrition = 1"));
        assert!(!is_valid_hr_sql("SELECT query FROM employees"));
        assert!(!is_valid_hr_sql("DELETE FROM employees"));
    }

    #[test]
    fn test_prepare_sql() {
        let raw = "```sql\nSELECT COUNT(*) AS leavers FROM employees WHERE Attrition = 1\n```";
        assert_eq!(
            prepare_sql(raw, 50),
            "SELECT COUNT(*) AS leavers FROM employees WHERE Attrition = 'Yes';"
        );
    }
}
