//! Common regex patterns for field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date formats, in precedence order
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\d{4}-\d{2}-\d{2}"
    ).unwrap();

    pub static ref DATE_MDY: Regex = Regex::new(
        r"\d{2}/\d{2}/\d{4}"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\d{2}-\d{2}-\d{4}"
    ).unwrap();

    // Amounts: "$1,234.56" wins over labeled totals
    pub static ref AMOUNT_DOLLAR: Regex = Regex::new(
        r"\$\d+(?:,\d{3})*(?:\.\d{2})?"
    ).unwrap();

    pub static ref AMOUNT_TOTAL: Regex = Regex::new(
        r"(?i:total):?\s*\$?\d+(?:,\d{3})*(?:\.\d{2})?"
    ).unwrap();

    pub static ref AMOUNT_LABELED: Regex = Regex::new(
        r"(?i:amount):?\s*\$?\d+(?:,\d{3})*(?:\.\d{2})?"
    ).unwrap();

    // Billing party name, stops at newline, comma or any non-letter
    pub static ref NAME_LABELED: Regex = Regex::new(
        r"(?i)\b(?:customer|billed to|bill to|client|to)[:\- \t]+([a-z][a-z \t]*)"
    ).unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(
        r"\s+"
    ).unwrap();

    // Markdown decorations left by layout-aware text extraction
    pub static ref MARKDOWN_EMPHASIS: Regex = Regex::new(
        r"\*\*|__"
    ).unwrap();

    pub static ref MARKDOWN_HEADING: Regex = Regex::new(
        r"(?m)^[ \t]*#{1,6}[ \t]+"
    ).unwrap();
}
