use std::fmt;

use crate::Error;

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
#[serde(transparent)]
pub struct PostId(pub u64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize,
)]
pub enum Category {
    #[default]
    Technology,
    Gaming,
    Design,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Technology, Category::Gaming, Category::Design];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Technology => "Technology",
            Category::Gaming => "Gaming",
            Category::Design => "Design",
        }
    }

    /// Exact, case-sensitive match on the category name
    pub fn from_name(name: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Category picked in a post form: anything unrecognized falls back to
    /// the default category
    pub fn from_form(name: Option<&str>) -> Category {
        name.and_then(Category::from_name).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits a comma-separated tag list, trimming every tag and dropping empty ones
pub fn parse_tags(csv: Option<&str>) -> Vec<String> {
    csv.map(|csv| {
        csv.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,

    /// Comma-separated
    pub tags: Option<String>,

    /// One of the `Category` names; anything else means `Technology`
    pub category: Option<String>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.title)?;
        crate::validate_string(&self.content)?;
        if let Some(tags) = &self.tags {
            crate::validate_string(tags)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct PostEdit {
    pub title: String,
    pub content: String,

    /// Comma-separated, replaces all the current tags
    pub tags: Option<String>,
}

impl PostEdit {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.title)?;
        crate::validate_string(&self.content)?;
        if let Some(tags) = &self.tags {
            crate::validate_string(tags)?;
        }
        Ok(())
    }
}

/// Both criteria must hold when both are set. `tags` is comma-separated and
/// matches posts carrying any one of the listed tags.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tags: Option<String>,
}
