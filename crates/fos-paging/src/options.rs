//! Paging options
//!
//! [`PagingOptions`] is the fully resolved, immutable option set a container
//! runs with. [`PagingConfig`] is a partial set: what a caller passes to
//! `attach`, and what a container carries in its `data-paging` attribute.
//! Resolution layers defaults, then the caller's config, then the carried
//! record.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Deserializer};

use crate::PagingError;

/// How many loads may be triggered by scrolling before switching to clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoTriggerLimit {
    #[default]
    Unlimited,
    /// Remaining scroll-triggered loads
    Until(u32),
}

impl AutoTriggerLimit {
    /// Whether scrolling may still trigger a load
    pub fn allows_auto(&self) -> bool {
        match self {
            AutoTriggerLimit::Unlimited => true,
            AutoTriggerLimit::Until(n) => *n > 0,
        }
    }

    /// Spend one scroll-triggered load
    pub fn consume(&mut self) {
        if let AutoTriggerLimit::Until(n) = self {
            *n = n.saturating_sub(1);
        }
    }
}

/// `false` is unlimited, `true` one load, an integer that many
#[derive(Deserialize)]
#[serde(untagged)]
enum RawLimit {
    Flag(bool),
    Count(i64),
}

impl<'de> Deserialize<'de> for AutoTriggerLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawLimit::deserialize(deserializer)? {
            RawLimit::Flag(false) => AutoTriggerLimit::Unlimited,
            RawLimit::Flag(true) => AutoTriggerLimit::Until(1),
            RawLimit::Count(n) => AutoTriggerLimit::Until(u32::try_from(n.max(0)).unwrap_or(u32::MAX)),
        })
    }
}

/// Called after each successful load with the href just fetched
#[derive(Clone)]
pub struct PageCallback(Rc<dyn Fn(&str)>);

impl PageCallback {
    pub fn new(f: impl Fn(&str) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, href: &str) {
        (self.0)(href)
    }
}

impl fmt::Debug for PageCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PageCallback(..)")
    }
}

/// Called once per load, right after the loading placeholder goes in
#[derive(Clone)]
pub struct LoadingHook(Rc<dyn Fn()>);

impl LoadingHook {
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl fmt::Debug for LoadingHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LoadingHook(..)")
    }
}

/// Resolved options
#[derive(Debug, Clone)]
pub struct PagingOptions {
    /// Emit diagnostics
    pub debug: bool,
    /// Load on scroll instead of on click
    pub auto_trigger: bool,
    pub auto_trigger_until: AutoTriggerLimit,
    /// Placeholder markup shown while loading
    pub loading_html: String,
    pub loading_function: Option<LoadingHook>,
    /// Extra slack in px for the near-bottom test
    pub padding: f64,
    pub next_selector: String,
    /// Selector appended to the fetch URL, scoping the inserted content
    pub content_selector: String,
    /// Ancestor of the next link to hide instead of its parent
    pub paging_selector: String,
    pub callback: Option<PageCallback>,
    /// Extra class for the content wrapper
    pub wrapper_class: String,
}

impl Default for PagingOptions {
    fn default() -> Self {
        Self {
            debug: false,
            auto_trigger: true,
            auto_trigger_until: AutoTriggerLimit::Unlimited,
            loading_html: "<small>Loading...</small>".to_string(),
            loading_function: None,
            padding: 0.0,
            next_selector: "a:last".to_string(),
            content_selector: String::new(),
            paging_selector: String::new(),
            callback: None,
            wrapper_class: "clearfix".to_string(),
        }
    }
}

impl PagingOptions {
    /// Defaults, overridden by `caller`, overridden by `carried`
    pub fn resolve(caller: &PagingConfig, carried: &PagingConfig) -> Self {
        Self::default().apply(caller).apply(carried)
    }

    /// Override every field `config` sets
    pub fn apply(mut self, config: &PagingConfig) -> Self {
        if let Some(v) = config.debug {
            self.debug = v;
        }
        if let Some(v) = config.auto_trigger {
            self.auto_trigger = v;
        }
        if let Some(v) = config.auto_trigger_until {
            self.auto_trigger_until = v;
        }
        if let Some(v) = &config.loading_html {
            self.loading_html = v.clone();
        }
        if let Some(v) = &config.loading_function {
            self.loading_function = Some(v.clone());
        }
        if let Some(v) = config.padding {
            self.padding = v;
        }
        if let Some(v) = &config.next_selector {
            self.next_selector = v.clone();
        }
        if let Some(v) = &config.content_selector {
            self.content_selector = v.clone();
        }
        if let Some(v) = &config.paging_selector {
            self.paging_selector = v.clone();
        }
        if let Some(v) = &config.callback {
            self.callback = Some(v.clone());
        }
        if let Some(v) = &config.wrapper_class {
            self.wrapper_class = v.clone();
        }
        self
    }
}

/// Partial options
///
/// Deserializes from the camelCase keys of a `data-paging` record. Hooks
/// cannot be expressed in JSON and are only settable from code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagingConfig {
    pub debug: Option<bool>,
    pub auto_trigger: Option<bool>,
    pub auto_trigger_until: Option<AutoTriggerLimit>,
    pub loading_html: Option<String>,
    #[serde(skip)]
    pub loading_function: Option<LoadingHook>,
    pub padding: Option<f64>,
    pub next_selector: Option<String>,
    pub content_selector: Option<String>,
    pub paging_selector: Option<String>,
    #[serde(skip)]
    pub callback: Option<PageCallback>,
    pub wrapper_class: Option<String>,
}

impl PagingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON options record
    pub fn from_json(json: &str) -> Result<Self, PagingError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn auto_trigger(mut self, auto: bool) -> Self {
        self.auto_trigger = Some(auto);
        self
    }

    pub fn auto_trigger_until(mut self, limit: AutoTriggerLimit) -> Self {
        self.auto_trigger_until = Some(limit);
        self
    }

    pub fn loading_html(mut self, html: impl Into<String>) -> Self {
        self.loading_html = Some(html.into());
        self
    }

    pub fn loading_function(mut self, f: impl Fn() + 'static) -> Self {
        self.loading_function = Some(LoadingHook::new(f));
        self
    }

    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn next_selector(mut self, selector: impl Into<String>) -> Self {
        self.next_selector = Some(selector.into());
        self
    }

    pub fn content_selector(mut self, selector: impl Into<String>) -> Self {
        self.content_selector = Some(selector.into());
        self
    }

    pub fn paging_selector(mut self, selector: impl Into<String>) -> Self {
        self.paging_selector = Some(selector.into());
        self
    }

    pub fn callback(mut self, f: impl Fn(&str) + 'static) -> Self {
        self.callback = Some(PageCallback::new(f));
        self
    }

    pub fn wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_class = Some(class.into());
        self
    }
}

/// A bare closure is shorthand for a config holding only the callback
impl<F: Fn(&str) + 'static> From<F> for PagingConfig {
    fn from(callback: F) -> Self {
        PagingConfig::new().callback(callback)
    }
}
