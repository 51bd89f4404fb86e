// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scored keyword rule tables for query classification.
//!
//! Each rule is an independent `(term, weight)` pair; the classifier sums
//! the weights of matching terms per category. Tables are ordered by weight
//! so the strongest signals are easy to audit.

use crate::Domain;

/// Scored terms per professional domain. Matching is case-insensitive
/// substring containment over the query text.
pub(crate) const DOMAIN_TABLE: &[(Domain, &[(&str, u32)])] = &[
    (
        Domain::Tax,
        &[
            ("tax return", 3),
            ("deduction", 3),
            ("tax credit", 3),
            ("taxable income", 3),
            ("withholding", 3),
            ("corporate tax", 3),
            ("income tax", 3),
            ("capital gains", 3),
            ("depreciation", 2),
            ("filing status", 2),
            ("vat", 2),
            ("estimated payment", 2),
            ("tax", 2),
            ("irs", 2),
            ("write off", 1),
            ("refund", 1),
        ],
    ),
    (
        Domain::Audit,
        &[
            ("audit opinion", 3),
            ("internal controls", 3),
            ("materiality", 3),
            ("audit evidence", 3),
            ("substantive testing", 3),
            ("audit", 2),
            ("auditor", 2),
            ("sampling", 1),
            ("working papers", 1),
        ],
    ),
    (
        Domain::Reporting,
        &[
            ("financial statements", 3),
            ("balance sheet", 3),
            ("income statement", 3),
            ("cash flow statement", 3),
            ("ifrs", 3),
            ("gaap", 3),
            ("revenue recognition", 3),
            ("consolidation", 2),
            ("disclosure", 2),
            ("journal entry", 2),
            ("amortization", 2),
            ("accrual", 2),
            ("bookkeeping", 1),
            ("ledger", 1),
        ],
    ),
    (
        Domain::Compliance,
        &[
            ("regulatory filing", 3),
            ("anti-money laundering", 3),
            ("sarbanes-oxley", 3),
            ("sox compliance", 3),
            ("fbar", 3),
            ("fatca", 3),
            ("kyc", 2),
            ("compliance", 2),
            ("regulation", 2),
            ("penalty", 1),
            ("deadline", 1),
        ],
    ),
];

/// Tax sub-domain markers, checked only when the winning domain is Tax.
/// First matching entry wins.
pub(crate) const TAX_SUBDOMAINS: &[(&str, &[&str])] = &[
    (
        "corporate",
        &["corporate", "corporation", "c-corp", "s-corp", "company tax"],
    ),
    (
        "international",
        &["cross-border", "foreign income", "expat", "treaty", "transfer pricing"],
    ),
    (
        "personal",
        &["personal", "individual", "my taxes", "1040", "filing status", "self-employed"],
    ),
];

/// Jurisdiction lookup: canonical code followed by its trigger terms.
pub(crate) const JURISDICTION_TABLE: &[(&str, &[&str])] = &[
    ("us", &["united states", "u.s.", " usa", "irs", "federal tax", "american"]),
    ("uk", &["united kingdom", " uk ", "hmrc", "british"]),
    ("ca", &["canada", "canadian", "cra"]),
    ("au", &["australia", "australian", "ato"]),
    ("de", &["germany", "german"]),
    ("in", &["india", "indian"]),
    ("eu", &["european union", "eu vat", "eu directive"]),
];

/// Terms indicating the query needs document analysis even without an
/// attachment hint.
pub(crate) const DOCUMENT_TERMS: &[&str] = &[
    "attached",
    "this document",
    "uploaded",
    "review my",
    "in the file",
    "the spreadsheet",
];

/// Terms indicating the query needs research beyond a direct answer.
pub(crate) const RESEARCH_TERMS: &[&str] = &[
    "latest guidance",
    "recent ruling",
    "case law",
    "research",
    "compare jurisdictions",
    "precedent",
    "authoritative",
];

/// Terms indicating the query depends on live market or rate data.
pub(crate) const REAL_TIME_TERMS: &[&str] = &[
    "current rate",
    "today's",
    "exchange rate",
    "market price",
    "stock price",
    "interest rate right now",
    "live",
];

/// Terms indicating multi-step reasoning regardless of complexity score.
pub(crate) const DEEP_REASONING_TERMS: &[&str] = &[
    "restructuring",
    "step by step",
    "walk me through",
    "trade-off",
    "tradeoff",
    "scenario analysis",
    "multi-year",
    "optimize",
];

/// Advanced-topic terms feeding the complexity score.
pub(crate) const ADVANCED_TERMS: &[(&str, u32)] = &[
    ("transfer pricing", 3),
    ("controlled foreign corporation", 3),
    ("hedge accounting", 3),
    ("goodwill impairment", 3),
    ("deferred tax", 2),
    ("1031 exchange", 2),
    ("like-kind exchange", 2),
    ("wash sale", 2),
    ("consolidation", 2),
    ("revenue recognition", 2),
    ("net operating loss", 2),
    ("alternative minimum tax", 2),
    ("carryforward", 1),
    ("amortization schedule", 1),
];
