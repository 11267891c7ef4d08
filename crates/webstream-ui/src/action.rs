//! MenuCommand — what a menu item does when it is activated.
//!
//! Items carry a plain value; the session dispatches it.  Indices refer to
//! the list the screen was built from (result rows or history entries).

use webstream_proto::provider::Provider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Reset the current search and start a new one.
    NewSearch,
    /// Show previous searches.
    OpenHistory,
    /// Play result row `i`.
    SelectResult(usize),
    /// Open the search prompt for a provider.
    OpenProvider(Provider),
    /// Re-run history entry `i`.
    RepeatSearch(usize),
    /// Placeholder rows.
    Nothing,
}
