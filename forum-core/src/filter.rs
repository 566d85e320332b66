use crate::{
    api::{Category, PostFilter},
    Post,
};

pub trait FilterExt {
    fn matches(&self, post: &Post) -> bool;
}

impl FilterExt for PostFilter {
    /// An unknown category does not filter anything. A tag filter never
    /// matches posts without tags.
    fn matches(&self, post: &Post) -> bool {
        if let Some(category) = self.category.as_deref().and_then(Category::from_name) {
            if post.category != category {
                return false;
            }
        }
        match self.tags.as_deref().filter(|t| !t.is_empty()) {
            None => true,
            Some(tags) => {
                let wanted = tags
                    .split(',')
                    .map(|t| t.trim().to_lowercase())
                    .collect::<Vec<_>>();
                post.tags
                    .iter()
                    .any(|t| wanted.contains(&t.to_lowercase()))
            }
        }
    }
}
