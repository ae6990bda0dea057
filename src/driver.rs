//! The driver boundary.
//!
//! The engine is driver-agnostic: anything that can navigate, locate
//! elements, read/write attributes, send keystrokes, click and run scripts
//! can drive it. A WebDriver-backed implementation plugs in here; the test
//! suite plugs in a scripted in-memory fake.

use std::fmt;

use crate::errors::AutomationError;

/// Ways to locate an element on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    /// Locate by the element's `id` attribute.
    Id(String),
    /// Locate by CSS selector.
    Css(String),
    /// Locate an anchor by its exact link text.
    LinkText(String),
    /// Locate by XPath query.
    XPath(String),
}

impl By {
    pub fn id(id: impl Into<String>) -> Self {
        By::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        By::Css(selector.into())
    }

    pub fn link_text(text: impl Into<String>) -> Self {
        By::LinkText(text.into())
    }

    pub fn xpath(query: impl Into<String>) -> Self {
        By::XPath(query.into())
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            By::Id(s) => write!(f, "id:{s}"),
            By::Css(s) => write!(f, "css:{s}"),
            By::LinkText(s) => write!(f, "link:{s}"),
            By::XPath(s) => write!(f, "xpath:{s}"),
        }
    }
}

/// Non-character keys the engine sends to commit input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Enter,
    Escape,
}

/// A live browser session.
///
/// Implementations are synchronous; the engine layers its own bounded
/// polling on top (see [`crate::wait`]). The session is a single shared
/// mutable resource and the engine assumes exclusive ownership of it.
pub trait UiDriver: Send + Sync {
    /// Navigate the session to the given URL.
    fn goto(&self, url: &str) -> Result<(), AutomationError>;

    /// Find the first element matching `by`, or `ElementNotFound`.
    fn find_element(&self, by: &By) -> Result<Element, AutomationError>;

    /// Find all elements matching `by`. No match is an empty vec, not an error.
    fn find_elements(&self, by: &By) -> Result<Vec<Element>, AutomationError>;

    /// Execute a script in the page and return its JSON-converted result.
    fn execute_script(&self, script: &str) -> Result<serde_json::Value, AutomationError>;

    /// Tear down the browser session.
    fn quit(&self) -> Result<(), AutomationError>;
}

/// Backend interface for a located element.
///
/// Any operation may fail with `StaleElement` if the host UI re-rendered
/// the DOM underneath the handle; callers that understand that fault
/// recover by re-locating (see [`crate::fields`]).
pub trait ElementImpl: Send + Sync + fmt::Debug {
    fn id(&self) -> Option<String>;
    fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError>;
    fn text(&self) -> Result<String, AutomationError>;
    fn is_displayed(&self) -> Result<bool, AutomationError>;
    /// Rendered size in pixels (width, height).
    fn size(&self) -> Result<(u32, u32), AutomationError>;
    fn click(&self) -> Result<(), AutomationError>;
    /// Move the pointer over the element, then click. Some Maximo toggles
    /// only react to a hover-then-click gesture.
    fn hover_click(&self) -> Result<(), AutomationError>;
    fn clear(&self) -> Result<(), AutomationError>;
    fn type_text(&self, text: &str) -> Result<(), AutomationError>;
    fn press_key(&self, key: Key) -> Result<(), AutomationError>;
    fn find_element(&self, by: &By) -> Result<Element, AutomationError>;
    fn find_elements(&self, by: &By) -> Result<Vec<Element>, AutomationError>;
}

/// A located element on the page.
pub struct Element {
    inner: Box<dyn ElementImpl>,
}

impl Element {
    pub fn new(inner: impl ElementImpl + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn id(&self) -> Option<String> {
        self.inner.id()
    }

    /// The element's `id` attribute, or an empty string when absent.
    pub fn id_or_empty(&self) -> String {
        self.inner.id().unwrap_or_default()
    }

    pub fn attribute(&self, name: &str) -> Result<Option<String>, AutomationError> {
        self.inner.attribute(name)
    }

    pub fn attr_or_empty(&self, name: &str) -> Result<String, AutomationError> {
        Ok(self.inner.attribute(name)?.unwrap_or_default())
    }

    pub fn text(&self) -> Result<String, AutomationError> {
        self.inner.text()
    }

    pub fn is_displayed(&self) -> Result<bool, AutomationError> {
        self.inner.is_displayed()
    }

    pub fn size(&self) -> Result<(u32, u32), AutomationError> {
        self.inner.size()
    }

    /// Displayed with a non-zero rendered size. Maximo keeps plenty of
    /// zero-sized placeholders in the DOM, so display state alone lies.
    pub fn is_visible(&self) -> Result<bool, AutomationError> {
        if !self.inner.is_displayed()? {
            return Ok(false);
        }
        let (width, height) = self.inner.size()?;
        Ok(width > 0 && height > 0)
    }

    pub fn click(&self) -> Result<(), AutomationError> {
        self.inner.click()
    }

    pub fn hover_click(&self) -> Result<(), AutomationError> {
        self.inner.hover_click()
    }

    pub fn clear(&self) -> Result<(), AutomationError> {
        self.inner.clear()
    }

    pub fn type_text(&self, text: &str) -> Result<(), AutomationError> {
        self.inner.type_text(text)
    }

    pub fn press_key(&self, key: Key) -> Result<(), AutomationError> {
        self.inner.press_key(key)
    }

    pub fn find_element(&self, by: &By) -> Result<Element, AutomationError> {
        self.inner.find_element(by)
    }

    pub fn find_elements(&self, by: &By) -> Result<Vec<Element>, AutomationError> {
        self.inner.find_elements(by)
    }

    /// The element's CSS classes, split on whitespace.
    pub fn classes(&self) -> Result<Vec<String>, AutomationError> {
        Ok(self
            .attr_or_empty("class")?
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }

    pub fn has_class(&self, class: &str) -> Result<bool, AutomationError> {
        Ok(self.classes()?.iter().any(|c| c == class))
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}
