//! Repositorio de etiquetas; siempre se recorre en orden alfabético.

use std::collections::BTreeSet;

use crate::model::Tag;

#[derive(Debug, Default)]
pub struct TagRepository {
    tags: BTreeSet<Tag>,
}

impl TagRepository {
    pub fn new() -> Self {
        TagRepository::default()
    }

    pub fn add_tags<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for name in names {
            self.tags.insert(Tag::new(name));
        }
    }

    pub fn as_list(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
