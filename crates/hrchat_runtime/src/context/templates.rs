//! Fixed SQL for questions that must always be answered the same way.

const ATTRITION_RATE_BY_DEPARTMENT: &str = "SELECT Department, \
ROUND(100.0 * SUM(CASE WHEN Attrition = 'Yes' THEN 1 ELSE 0 END) / COUNT(*), 2) AS AttritionRatePercent \
FROM employees GROUP BY Department ORDER BY AttritionRatePercent DESC;";

const AVG_INCOME_BY_DEPARTMENT: &str = "SELECT Department, \
ROUND(AVG(MonthlyIncome), 2) AS AvgMonthlyIncome \
FROM employees GROUP BY Department ORDER BY AvgMonthlyIncome DESC;";

pub const EMPLOYEE_COUNT: &str = "SELECT COUNT(*) AS employee_count FROM employees;";

const COUNT_KEYWORDS: [&str; 4] = ["how many", "count", "number of", "total"];

/// Words that turn a headcount into a filtered count.
const FILTER_WORDS: [&str; 10] = [
    "where", "above", "below", "greater", "less", "older", "younger", ">", "<", "=",
];

/// Words that turn a headcount into a grouped count.
const GROUPING_WORDS: [&str; 3] = [" by ", " per ", " each "];

pub fn is_count_question(question: &str) -> bool {
    let q = question.to_lowercase();
    COUNT_KEYWORDS.iter().any(|k| q.contains(k))
}

/// Template SQL for `question`, if one applies.
pub fn match_known_sql(question: &str) -> Option<&'static str> {
    let q = question.trim().to_lowercase();

    if q.contains("attrition rate") && q.contains("department") {
        return Some(ATTRITION_RATE_BY_DEPARTMENT);
    }
    if (q.contains("average") || q.contains("avg"))
        && q.contains("monthlyincome")
        && q.contains("department")
    {
        return Some(AVG_INCOME_BY_DEPARTMENT);
    }
    if is_count_question(&q)
        && !FILTER_WORDS.iter().any(|w| q.contains(w))
        && !GROUPING_WORDS.iter().any(|w| q.contains(w))
    {
        return Some(EMPLOYEE_COUNT);
    }
    None
}
