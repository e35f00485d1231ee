use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A named group of example prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExampleCategory {
    pub key: &'static str,
    pub title: &'static str,
    pub blurb: &'static str,
    pub prompts: &'static [&'static str],
}

const CATEGORIES: &[ExampleCategory] = &[
    ExampleCategory {
        key: "DXCompetitiveInformation",
        title: "Competitive Information for DX Business",
        blurb: "Discover opportunities and competitive insights.",
        prompts: &[
            "How does Roche’s portfolio compare to Siemens Healthineers (SHS) in terms of breadth, depth, and innovation?",
            "How do Roche’s analyzers compare to Siemens Healthineers’?",
        ],
    },
    ExampleCategory {
        key: "Brandville",
        title: "Brand & Communication",
        blurb: "Ask about brand guidelines, assets, and visual identity.",
        prompts: &[
            "What is the Siemens logo?",
            "What are the Siemens brand colors and their hex codes?",
        ],
    },
];

static BY_KEY: Lazy<HashMap<&'static str, &'static ExampleCategory>> =
    Lazy::new(|| CATEGORIES.iter().map(|c| (c.key, c)).collect());

/// All categories in display order
pub fn categories() -> &'static [ExampleCategory] {
    CATEGORIES
}

pub fn category(key: &str) -> Option<&'static ExampleCategory> {
    BY_KEY.get(key).copied()
}

/// Example prompts for a category; unknown keys have none.
pub fn examples_for(key: &str) -> &'static [&'static str] {
    category(key).map(|c| c.prompts).unwrap_or(&[])
}

/// The nth (1-based) example of a category
pub fn example_at(key: &str, index: usize) -> Option<&'static str> {
    let position = index.checked_sub(1)?;
    examples_for(key).get(position).copied()
}
