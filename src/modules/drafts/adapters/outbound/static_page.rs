use crate::modules::drafts::core::branch::FALLBACK_BRANCH_SELECTOR;
use crate::modules::drafts::core::ports::{PageContext, PageError};

/// A page described up front: its URL and, optionally, the source-branch element's text.
#[derive(Debug, Clone)]
pub struct StaticPage {
    url: String,
    fallback_branch: Option<String>,
}

impl StaticPage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            fallback_branch: None,
        }
    }

    pub fn with_fallback_branch(mut self, text: impl Into<String>) -> Self {
        self.fallback_branch = Some(text.into());
        self
    }
}

impl PageContext for StaticPage {
    fn page_url(&self) -> Result<String, PageError> {
        Ok(self.url.clone())
    }

    fn element_text(&self, selector: &str) -> Result<Option<String>, PageError> {
        if selector == FALLBACK_BRANCH_SELECTOR {
            return Ok(self.fallback_branch.clone());
        }
        Ok(None)
    }
}

#[cfg(test)]
mod static_page_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_only_answer_for_the_source_branch_element() {
        let page = StaticPage::new("https://bb.example").with_fallback_branch("main");
        assert_eq!(page.page_url().unwrap(), "https://bb.example");
        assert_eq!(
            page.element_text(FALLBACK_BRANCH_SELECTOR).unwrap(),
            Some("main".to_string())
        );
        assert_eq!(page.element_text(".something-else").unwrap(), None);
    }
}
