use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A real category label stored on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Design,
    Development,
    Productivity,
    Inspiration,
}

impl Category {
    /// All stored categories, in display order
    pub const ALL: [Category; 4] = [
        Category::Design,
        Category::Development,
        Category::Productivity,
        Category::Inspiration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Design => "Design",
            Category::Development => "Development",
            Category::Productivity => "Productivity",
            Category::Inspiration => "Inspiration",
        }
    }

    /// Next category in display order, wrapping around
    pub fn next(self) -> Category {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous category in display order, wrapping around
    pub fn prev(self) -> Category {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for a label that is not a known category
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive; `All` is not a stored category and is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// The active category filter: `All` or a single stored category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Only(Category),
}

impl Filter {
    /// All filter values, in tab order (`All` first)
    pub fn choices() -> [Filter; 5] {
        [
            Filter::All,
            Filter::Only(Category::Design),
            Filter::Only(Category::Development),
            Filter::Only(Category::Productivity),
            Filter::Only(Category::Inspiration),
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Only(c) => c.label(),
        }
    }

    pub fn matches(self, category: Category) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(c) => c == category,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Filter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Filter::All)
        } else {
            s.parse().map(Filter::Only)
        }
    }
}
