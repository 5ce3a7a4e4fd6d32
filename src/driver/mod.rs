pub mod chrome;
pub mod types;

use anyhow::Result;

pub use types::{LiveRead, Locator};

/// The live browser session the interpreter drives. Every call blocks until
/// the browser answers or the implementation's default wait expires.
pub trait Browser {
    fn navigate(&mut self, url: &str) -> Result<()>;
    fn click(&mut self, locator: &Locator) -> Result<()>;
    /// Clears the matched input, then types `text` into it.
    fn type_text(&mut self, selector: &str, text: &str) -> Result<()>;
    fn scroll_into_view(&mut self, locator: &Locator) -> Result<()>;
    /// Serialized outer markup of every element matching `selector`, in
    /// document order. No match is an empty list, not an error.
    fn outer_html_all(&mut self, selector: &str) -> Result<Vec<String>>;
    /// Reads the first element matching `selector` on the live page.
    fn read_first(&mut self, selector: &str, attr: Option<&str>) -> Result<Option<LiveRead>>;
    fn current_url(&mut self) -> Result<String>;
    /// Runs `js` in the page and returns its result as text.
    fn evaluate_script(&mut self, js: &str) -> Result<String>;
}
