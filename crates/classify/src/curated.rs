//! Hand-maintained lookup tables for the pattern index.
//!
//! Aliases are the short names news copy actually uses for an entity. Exclusions are
//! case-insensitive regex fragments; a hit vetoes the entity for that article.

/// Well-known short names, keyed by upper-case symbol
const KNOWN_ALIASES: &[(&str, &[&str])] = &[
  ("AAPL", &["Apple"]),
  ("GOOGL", &["Google", "Alphabet"]),
  ("MSFT", &["Microsoft"]),
  ("AMZN", &["Amazon"]),
  ("NVDA", &["Nvidia", "NVIDIA"]),
  ("TSLA", &["Tesla"]),
  ("META", &["Meta", "Facebook"]),
  ("BRK.B", &["Berkshire Hathaway", "Berkshire"]),
  ("JNJ", &["Johnson & Johnson", "J&J"]),
  ("V", &["Visa"]),
  ("WMT", &["Walmart"]),
  ("JPM", &["JPMorgan", "Chase"]),
  ("MA", &["Mastercard"]),
  ("UNH", &["UnitedHealth"]),
  ("HD", &["Home Depot"]),
  ("PG", &["Procter & Gamble", "P&G"]),
  ("BAC", &["Bank of America"]),
  ("ABBV", &["AbbVie"]),
  ("KO", &["Coca-Cola", "Coke"]),
  ("PEP", &["Pepsi", "PepsiCo"]),
  ("COST", &["Costco"]),
  ("DIS", &["Disney"]),
  ("ABT", &["Abbott"]),
  ("VZ", &["Verizon"]),
  ("ADBE", &["Adobe"]),
  ("WFC", &["Wells Fargo"]),
  ("LLY", &["Eli Lilly"]),
  ("PM", &["Philip Morris"]),
  ("T", &["AT&T"]),
  ("ORCL", &["Oracle"]),
  ("MCD", &["McDonald's"]),
  ("IBM", &["IBM"]),
  ("INTC", &["Intel"]),
  ("CSCO", &["Cisco"]),
  ("XOM", &["Exxon"]),
  ("CVX", &["Chevron"]),
  ("NFLX", &["Netflix"]),
  ("AMD", &["AMD"]),
  ("QCOM", &["Qualcomm"]),
  ("UPS", &["UPS"]),
  ("LOW", &["Lowe's"]),
  ("GS", &["Goldman Sachs"]),
  ("AXP", &["American Express"]),
  ("BLK", &["BlackRock"]),
  ("C", &["Citigroup"]),
  ("CAT", &["Caterpillar"]),
  ("BA", &["Boeing"]),
  ("SCHW", &["Charles Schwab"]),
  ("BKNG", &["Booking Holdings", "Booking.com"]),
  ("TMUS", &["T-Mobile"]),
  ("F", &["Ford"]),
  ("GM", &["General Motors"]),
];

/// Phrases where a tracked name is a common word, keyed by upper-case symbol
const ENTITY_EXCLUSIONS: &[(&str, &[&str])] = &[
  (
    "GOOGL",
    &[
      // search engine used as a verb or tool
      r"google search",
      r"search google",
      r"search on google",
      r"according to google",
      r"google says",
      r"google shows",
      r"found on google",
      r"google results",
      r"google it",
      r"googling for",
      r"google maps",
      r"google translate",
      r"google play store",
      r"google chrome browser",
      r"use google to",
      r"try googling",
      r"google the term",
      r"google image search",
      r"google scholar",
      r"via google",
      r"through google",
      r"using google",
      r"google doodle",
      r"google street view",
    ],
  ),
  (
    "AAPL",
    &[
      // fruit
      r"apple pie",
      r"apple fruit",
      r"apple sauce",
      r"apple juice",
      r"apple cider",
      r"apple tree",
      r"apple orchard",
      r"green apple",
      r"red apple",
      r"apple picking",
      r"apple harvest",
      r"caramel apple",
      r"apple crisp",
      r"apple butter",
      r"apple farm",
      r"apple season",
      r"organic apple",
      // idioms
      r"an apple a day",
      r"apple of my eye",
      r"adam's apple",
      r"apple cart",
      r"bad apple",
      r"apple doesn't fall",
    ],
  ),
  (
    "META",
    &[
      r"meta description",
      r"meta tag",
      r"meta data",
      r"metadata",
      r"meta keyword",
      r"meta title",
      r"meta information",
      r"meta analysis",
      r"meta study",
      r"meta review",
      r"meta search",
      r"meta programming",
      r"meta character",
      r"meta level",
      r"meta discussion",
      r"meta comment",
      r"meta joke",
      r"meta reference",
      r"going meta",
    ],
  ),
  (
    "T",
    &[
      r"\bt\s+mobile\b",
      r"\bt\s+shirt\b",
      r"\bt\s+test\b",
      r"\bt\s+bone\b",
      r"\bt\s+cell\b",
      r"\bt\s+junction\b",
      r"\bt\s+lymphocyte\b",
      r"\bt\s+helper\b",
      r"vitamin t\b",
      r"\bmr\s+t\b",
      r"\bmodel t\b",
    ],
  ),
  (
    "CAT",
    &[
      r"cat animal",
      r"cat pet",
      r"cats and dogs",
      r"stray cat",
      r"house cat",
      r"wild cat",
      r"cat owner",
      r"cat food",
      r"cat litter",
      r"cat scan",
      r"cat nap",
      r"fat cat",
      r"cat burglar",
      r"cat fight",
      r"curiosity killed the cat",
      r"cat's out of the bag",
      r"like herding cats",
    ],
  ),
  (
    "TGT",
    &[
      r"target practice",
      r"target audience",
      r"target market",
      r"hit the target",
      r"off target",
      r"target date",
      r"target price",
      r"moving target",
      r"target demographic",
    ],
  ),
  (
    "F",
    &[
      r"\bf\s+grade\b",
      r"\bf\s+sharp\b",
      r"\bf\s+major\b",
      r"\bf\s+word\b",
      r"\bf\s+bomb\b",
      r"vitamin f\b",
      r"john f kennedy",
      r"\bf\s+scott\b",
    ],
  ),
];

/// Casual, comparative and advice-seeking phrasing that marks a passing mention
pub const GENERIC_EXCLUSIONS: &[&str] = &[
  // personal opinion
  r"\bi love\b",
  r"\bi hate\b",
  r"\bi use\b",
  r"\bi bought\b",
  r"\bmy favorite\b",
  r"\bmy least favorite\b",
  // comparisons
  r"\bbetter than\b",
  r"\bworse than\b",
  r"\bcompared to\b",
  r"\bsimilar to\b",
  r"\blike\b.*\bbut\b",
  r"\bunlike\b",
  // advice
  r"\bshould i buy\b",
  r"\bshould i sell\b",
  r"\bwhat do you think\b",
  r"\bany thoughts on\b",
  r"\badvice on\b",
  r"\bhelp with\b",
  // list filler
  r"\bincluding\b.*\band many others\b",
  r"\bsuch as\b.*\band more\b",
  r"\bexamples include\b",
  r"\bcompanies like\b",
];

fn lookup(table: &'static [(&'static str, &'static [&'static str])], symbol: &str) -> &'static [&'static str] {
  table
    .iter()
    .find(|(key, _)| *key == symbol)
    .map(|(_, values)| *values)
    .unwrap_or(&[])
}

/// Curated aliases for `symbol` (upper-case)
pub fn known_aliases(symbol: &str) -> &'static [&'static str] {
  lookup(KNOWN_ALIASES, symbol)
}

/// Curated exclusion patterns for `symbol` (upper-case), not including the generic ones
pub fn entity_exclusions(symbol: &str) -> &'static [&'static str] {
  lookup(ENTITY_EXCLUSIONS, symbol)
}

/// Symbols that carry their own exclusion list
pub fn symbols_with_exclusions() -> impl Iterator<Item = &'static str> {
  ENTITY_EXCLUSIONS.iter().map(|(symbol, _)| *symbol)
}
