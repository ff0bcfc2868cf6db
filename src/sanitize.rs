use std::collections::HashSet;

use ammonia::Builder as AmmoniaBuilder;

/// Strips every tag from user supplied text before it is stored.
///
/// Elements in the "clean content" set lose their children as well, so
/// `<script>alert(1)</script>Hello` becomes `Hello` rather than
/// `alert(1)Hello`. Output is escaped text, which the views emit verbatim,
/// and cleaning it a second time is a no-op.
pub struct Sanitizer {
    builder: AmmoniaBuilder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = AmmoniaBuilder::empty();
        builder.clean_content_tags(HashSet::from(["script", "style"]));
        Self { builder }
    }

    pub fn clean(&self, input: &str) -> String {
        self.builder.clean(input).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
