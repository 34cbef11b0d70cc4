use newsrel_core::Category;
use tracing::debug;

/// Keyword groups in evaluation order; the first group with any hit wins
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
  (
    Category::Earnings,
    &[
      "earnings",
      "revenue",
      "profit",
      "quarterly",
      "financial results",
      "reported earnings",
      "q1",
      "q2",
      "q3",
      "q4",
      "fiscal",
      "eps",
    ],
  ),
  (
    Category::Executive,
    &[
      "ceo",
      "executive",
      "appoint",
      "resign",
      "leadership",
      "board of directors",
      "chief executive",
      "president",
      "chairman",
      "cfo",
      "cto",
    ],
  ),
  (
    Category::Legal,
    &[
      "lawsuit",
      "legal",
      "court",
      "settlement",
      "sue",
      "judge",
      "regulation",
      "sec",
      "ftc",
      "antitrust",
      "investigation",
      "fine",
      "penalty",
    ],
  ),
  (
    Category::Product,
    &[
      "product",
      "launch",
      "release",
      "unveil",
      "announce",
      "new service",
      "update",
      "version",
      "feature",
      "beta",
      "rollout",
    ],
  ),
  (
    Category::Market,
    &[
      "market share",
      "competitor",
      "industry",
      "sector performance",
      "trend",
      "market cap",
      "stock price",
      "shares",
      "trading",
      "analyst",
    ],
  ),
];

/// Assign a topical category by substring keyword match over `title + " " + content`.
///
/// Matching is plain substring, so "sec" also fires inside "second" and "fine" inside
/// "refined"; the keyword lists are tuned with that in mind.
pub fn categorize(title: &str, content: &str) -> Category {
  let text = format!("{title} {content}").to_lowercase();

  for (category, keywords) in CATEGORY_KEYWORDS {
    if let Some(keyword) = keywords.iter().find(|k| text.contains(*k)) {
      debug!(category = %category, keyword, "Categorized");
      return *category;
    }
  }

  Category::General
}
