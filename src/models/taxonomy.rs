//! Fixed taxonomies offered by the project form. All three are conventions,
//! not constraints: stored values outside these lists round-trip untouched.

/// Budget categories every allocation is keyed by.
pub const BUDGET_CATEGORIES: [&str; 5] =
    ["인건비", "학생인건비", "재료비", "연구활동비", "연구수당"];

/// Grant types.
pub const PROJECT_TYPES: [&str; 5] = ["기초연구", "응용연구", "개발연구", "인력양성", "기타"];

/// Funding agencies.
pub const AGENCIES: [&str; 6] = [
    "한국연구재단",
    "산업통상자원부",
    "과학기술정보통신부",
    "중소벤처기업부",
    "교육부",
    "기타",
];
