//! Hierarchical taxonomy codes.
//!
//! A code is eight digits split into groups `DD EEE FFF`. Trailing zero groups
//! encode the level:
//!
//! | level | shape      |
//! |-------|------------|
//! | 1     | `DD000000` |
//! | 2     | `DDEEE000` |
//! | 3     | `DDEEEFFF` |

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

const ZERO_MINOR: &str = "000";
const ZERO_ITEM: &str = "000";

fn code_regex() -> &'static Regex {
    static CODE: OnceLock<Regex> = OnceLock::new();
    CODE.get_or_init(|| Regex::new(r"^([0-9]{2})([0-9]{3})([0-9]{3})$").expect("valid code regex"))
}

/// Nesting level encoded by a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodeLevel {
    Category,
    Subcategory,
    Item,
}

impl CodeLevel {
    /// 1-based depth below the root.
    pub fn depth(self) -> usize {
        match self {
            CodeLevel::Category => 1,
            CodeLevel::Subcategory => 2,
            CodeLevel::Item => 3,
        }
    }
}

/// Why a code could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeError {
    /// Not eight digits
    Unrecognized,
    /// `DD000FFF`: item digits without a subcategory, the implied
    /// subcategory would be the category itself
    MissingSubcategory,
}

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeError::Unrecognized => f.write_str("unrecognized code"),
            CodeError::MissingSubcategory => {
                f.write_str("item code without subcategory digits")
            }
        }
    }
}

/// A classified taxonomy code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxonomyCode {
    major: String,
    minor: String,
    item: String,
    level: CodeLevel,
}

impl TaxonomyCode {
    /// Classify a raw code. Surrounding whitespace is ignored.
    ///
    /// The most specific level wins: item codes are checked before
    /// subcategory codes, which are checked before category codes.
    pub fn parse(raw: &str) -> Result<Self, CodeError> {
        let caps = code_regex()
            .captures(raw.trim())
            .ok_or(CodeError::Unrecognized)?;
        let major = caps[1].to_string();
        let minor = caps[2].to_string();
        let item = caps[3].to_string();

        let level = if item != ZERO_ITEM {
            if minor == ZERO_MINOR {
                return Err(CodeError::MissingSubcategory);
            }
            CodeLevel::Item
        } else if minor != ZERO_MINOR {
            CodeLevel::Subcategory
        } else {
            CodeLevel::Category
        };

        Ok(Self {
            major,
            minor,
            item,
            level,
        })
    }

    pub fn level(&self) -> CodeLevel {
        self.level
    }

    /// Code of the level-1 ancestor (or of self for categories).
    pub fn category_code(&self) -> String {
        format!("{}{ZERO_MINOR}{ZERO_ITEM}", self.major)
    }

    /// Code of the level-2 ancestor, None for categories.
    pub fn subcategory_code(&self) -> Option<String> {
        match self.level {
            CodeLevel::Category => None,
            _ => Some(format!("{}{}{ZERO_ITEM}", self.major, self.minor)),
        }
    }

    /// Ancestor codes from the top of the hierarchy down, self excluded.
    pub fn ancestors(&self) -> Vec<String> {
        match self.level {
            CodeLevel::Category => Vec::new(),
            CodeLevel::Subcategory => vec![self.category_code()],
            CodeLevel::Item => {
                let mut codes = vec![self.category_code()];
                codes.extend(self.subcategory_code());
                codes
            }
        }
    }

    /// Code of the direct parent, None for categories (their parent is the root).
    pub fn parent_code(&self) -> Option<String> {
        self.ancestors().pop()
    }
}

impl fmt::Display for TaxonomyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.major, self.minor, self.item)
    }
}

/// One row of the flat input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodedRow {
    pub code: String,
    pub label: String,
}

impl CodedRow {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}
