//! Static copy shown around the charts.

pub const TITLE: &str = "Interactive view of data-industry jobs";

pub const INTRO: &str = "Explore the data job market through linked charts: salaries, \
job categories, contract types and where people work from. Use the filters on the left \
to narrow the analysis to a year, experience levels and work settings.";

pub const QUESTIONS: &[&str] = &[
    "Which categories pay the most?",
    "How does salary change with experience or country?",
    "Which work settings dominate the field?",
];

pub const BAR: &str =
    "Horizontal bars show which job categories have the highest average salary.";

pub const TREEMAP: &str = "Block size is the total salary of each job title within its \
category, which makes the hierarchy easy to scan.";

pub const SUNBURST: &str = "Three levels: the centre ring is the job category, the second \
ring the experience level and the outer ring the employment type. Size and colour show \
accumulated salary.";

pub const GEO: &str = "Each bubble is a country. Its size follows total salary and its \
colour the category that contributes most to it.";

pub const BOX: &str = "How salary varies within each experience level: quartiles, \
median, whiskers and outliers.";

pub const SCATTER: &str = "How salaries moved across categories and experience levels over \
the years. This panel always shows every record; the sidebar filters do not apply.";

pub const CONCLUSION: &[&str] = &[
    "Which profiles earn the best salaries.",
    "How experience and work setting influence pay.",
    "Which countries offer the strongest opportunities in data.",
];
