//! A document: the text math is found in, the math items found in it, and the render actions that
//! take each item from markup to an `mjx-container` spliced back into the text.
//!
//! Errors are contained per item. Markup that fails to compile is shown as an `merror`, and an item
//! that cannot be typeset gets an error container. The only error that escapes [`MathDocument::render`]
//! is [`Error::ResourceFailed`], when a resource the compiler asked for could not be loaded.

use std::fmt;
use std::mem;
use std::rc::Rc;

use bitflags::bitflags;
use serde_json::Value;

use crate::error::{Error, ResourceRequest, Result};
use crate::input::{EntityTable, MathMl, MathMlOptions};
use crate::options::{merge_user, OptionList};
use crate::output::{Chtml, ChtmlOptions, Element};
use crate::tree::MmlTree;
use crate::tree::classes::MmlFactory;
use crate::util::{LinkedList, PrioritizedList};

bitflags! {
    /// The render stages a document or an item has been through
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct States: u8 {
        const FIND_MATH = 1 << 0;
        const COMPILED  = 1 << 1;
        const TYPESET   = 1 << 2;
        const INSERTED  = 1 << 3;
        /// Set while [`MathDocument::rerender`] runs
        const RERENDER  = 1 << 4;
    }
}

/// Options of the document itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentOptions {
    /// How many times an item is compiled again after loading a resource before giving up
    pub max_retries: usize,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions { max_retries: 5 }
    }
}

impl DocumentOptions {
    /// Every option a document accepts: its own, and those of the input and output jax under
    /// `MathML` and `CHTML`
    pub fn defaults() -> OptionList {
        let mut list = serde_json::to_value(Self::default()).map(OptionList::from_json).unwrap_or_default();
        list.set("MathML", MathMlOptions::defaults());
        list.set("CHTML", ChtmlOptions::defaults());
        list
    }
}

/// One expression found in the document
#[derive(Debug, Clone)]
pub struct MathItem {
    /// The markup, `<math>` element included
    pub math:    String,
    pub display: bool,
    /// Byte offsets of the markup in the document text
    pub start:   usize,
    pub end:     usize,
    pub root:    Option<MmlTree>,
    pub output:  Option<Element>,
    pub states:  States,
}

impl MathItem {
    pub fn new(math: impl Into<String>, display: bool, start: usize, end: usize) -> Self {
        MathItem {
            math: math.into(),
            display,
            start,
            end,
            root:   None,
            output: None,
            states: States::empty(),
        }
    }
}

/// Supplies the resources the compiler asks for
pub trait ResourceLoader {
    /// The `(name, value)` entity definitions answering `request`, or `None` if it cannot be loaded
    fn load(&mut self, request: &ResourceRequest) -> Option<Vec<(String, String)>>;
}

impl<F> ResourceLoader for F
where F: FnMut(&ResourceRequest) -> Option<Vec<(String, String)>>
{
    fn load(&mut self, request: &ResourceRequest) -> Option<Vec<(String, String)>> {
        self(request)
    }
}

/// A named step of [`MathDocument::render`]
#[derive(Clone, Copy)]
pub struct RenderAction {
    pub name: &'static str,
    pub run:  fn(&mut MathDocument) -> Result<()>,
}

impl RenderAction {
    pub fn new(name: &'static str, run: fn(&mut MathDocument) -> Result<()>) -> Self {
        RenderAction { name, run }
    }
}

impl fmt::Debug for RenderAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RenderAction({})", self.name)
    }
}

impl PartialEq for RenderAction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// The render actions every document starts with
pub fn default_render_actions() -> PrioritizedList<RenderAction> {
    let mut actions = PrioritizedList::new();
    actions.add(RenderAction::new("find", MathDocument::find_math), 10);
    actions.add(RenderAction::new("compile", MathDocument::compile), 20);
    actions.add(RenderAction::new("typeset", MathDocument::typeset), 150);
    actions.add(RenderAction::new("update", MathDocument::update_document), 200);
    actions
}

/// A text with math in it
pub struct MathDocument {
    source:   String,
    text:     String,
    options:  DocumentOptions,
    input:    MathMl,
    output:   Chtml,
    entities: Rc<EntityTable>,
    loader:   Option<Box<dyn ResourceLoader>>,
    /// The items found so far, in document order
    pub math:   LinkedList<MathItem>,
    pub states: States,
    pub render_actions: PrioritizedList<RenderAction>,
}

impl fmt::Debug for MathDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MathDocument")
            .field("options", &self.options)
            .field("items", &self.math.len())
            .field("states", &self.states)
            .finish()
    }
}

impl MathDocument {
    /// A document over `text`, configured by `{ "maxRetries": .., "MathML": {..}, "CHTML": {..} }`.
    /// Keys that are not options are rejected.
    pub fn new(text: impl Into<String>, options: Value) -> Result<Self> {
        let mut merged = DocumentOptions::defaults();
        merge_user(&mut merged, &OptionList::from_json(options))?;
        let document: DocumentOptions = merged.typed()?;
        let mathml: MathMlOptions = match merged.sublist("MathML") {
            Some(list) => list.typed()?,
            None => MathMlOptions::default(),
        };
        let chtml: ChtmlOptions = match merged.sublist("CHTML") {
            Some(list) => list.typed()?,
            None => ChtmlOptions::default(),
        };
        let text = text.into();
        Ok(MathDocument {
            text:     text.clone(),
            source:   text,
            options:  document,
            input:    MathMl::new(mathml, Rc::new(MmlFactory::standard())),
            output:   Chtml::new(chtml),
            entities: Rc::new(EntityTable::new()),
            loader:   None,
            math:     LinkedList::new(),
            states:   States::empty(),
            render_actions: default_render_actions(),
        })
    }

    /// Load missing entity definitions with `loader` instead of leaving unknown entities as text
    pub fn with_loader(mut self, loader: impl ResourceLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    pub fn input(&self) -> &MathMl {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut MathMl {
        &mut self.input
    }

    pub fn output(&self) -> &Chtml {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut Chtml {
        &mut self.output
    }

    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    /// The text as it was given
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The text with the typeset math in it, once the document has been rendered
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Run every render action in priority order
    pub fn render(&mut self) -> Result<()> {
        let actions: Vec<RenderAction> = self.render_actions.iter().copied().collect();
        for action in actions {
            trace!("render action \"{}\"", action.name);
            (action.run)(self)?;
        }
        Ok(())
    }

    /// Typeset the compiled items again and put them back in the text
    pub fn rerender(&mut self) -> Result<()> {
        self.states.insert(States::RERENDER);
        self.states.remove(States::TYPESET | States::INSERTED);
        self.math.for_each_mut(|item| item.states.remove(States::TYPESET | States::INSERTED));
        self.output.reset();
        let result = self.render();
        self.states.remove(States::RERENDER);
        result
    }

    /// Forget the items and start again from the source text
    pub fn clear(&mut self) {
        self.math = LinkedList::new();
        self.states = States::empty();
        self.text = self.source.clone();
        self.output.reset();
    }

    /// Add an item for every `<math>` element of the text
    pub fn find_math(&mut self) -> Result<()> {
        if self.states.contains(States::FIND_MATH) {
            return Ok(());
        }
        for mut item in locate_math(&self.source) {
            item.states.insert(States::FIND_MATH);
            self.math.insert_by(item, |a, b| a.start < b.start);
        }
        debug!("found {} math items", self.math.len());
        self.states.insert(States::FIND_MATH);
        Ok(())
    }

    /// Compile the items that have no tree yet (every item with `forceReparse`)
    pub fn compile(&mut self) -> Result<()> {
        let force = self.input.options().force_reparse;
        let mut math = mem::take(&mut self.math);
        let mut failure = None;
        math.for_each_mut(|item| {
            if failure.is_some() || (item.states.contains(States::COMPILED) && !force) {
                return;
            }
            match self.compile_math(&item.math, item.display) {
                Ok(tree) => {
                    item.root = Some(tree);
                    item.states.insert(States::COMPILED);
                },
                Err(error) => failure = Some(error),
            }
        });
        self.math = math;
        match failure {
            Some(error) => Err(error),
            None => {
                self.states.insert(States::COMPILED);
                Ok(())
            },
        }
    }

    /// Typeset the compiled items that have no output yet
    pub fn typeset(&mut self) -> Result<()> {
        let output = &mut self.output;
        self.math.for_each_mut(|item| {
            if item.states.contains(States::TYPESET) {
                return;
            }
            item.output = Some(match item.root.as_mut() {
                Some(tree) => output.typeset(tree),
                None => {
                    warn!("math at {} was typeset before being compiled", item.start);
                    output.typeset_error("Math has not been compiled")
                },
            });
            item.states.insert(States::TYPESET);
        });
        self.states.insert(States::TYPESET);
        Ok(())
    }

    /// Replace each typeset item of the source by its output, and put the stylesheet in front
    pub fn update_document(&mut self) -> Result<()> {
        if self.states.contains(States::INSERTED) {
            return Ok(());
        }
        let mut text = String::with_capacity(self.source.len());
        let mut last = 0;
        for item in self.math.iter() {
            if item.start < last {
                continue;
            }
            text.push_str(&self.source[last .. item.start]);
            match &item.output {
                Some(output) => text.push_str(&output.to_string()),
                None => text.push_str(&self.source[item.start .. item.end]),
            }
            last = item.end;
        }
        text.push_str(&self.source[last ..]);
        if !self.math.is_empty() {
            text.insert_str(0, &format!("<style id=\"MJX-CHTML-styles\">\n{}</style>\n", self.output.styles().css()));
        }
        self.text = text;
        self.math.for_each_mut(|item| {
            if item.output.is_some() {
                item.states.insert(States::INSERTED);
            }
        });
        self.states.insert(States::INSERTED);
        Ok(())
    }

    /// Compile and typeset one expression outside of the document text
    pub fn convert(&mut self, math: &str, display: bool) -> Result<Element> {
        let mut tree = self.compile_math(math, display)?;
        Ok(self.output.typeset(&mut tree))
    }

    /// Compile `math`, loading what the compiler asks for. Errors other than resource failures
    /// become a tree showing the message.
    fn compile_math(&mut self, math: &str, display: bool) -> Result<MmlTree> {
        let mut retries = 0;
        loop {
            let can_load = self.loader.is_some();
            match self.input.compile(math, display, &self.entities, can_load) {
                Ok(tree) => return Ok(tree),
                Err(Error::Retry(request)) => {
                    retries += 1;
                    if retries > self.options.max_retries {
                        warn!("giving up on {} after {} retries", request, self.options.max_retries);
                        return Err(Error::ResourceFailed(request));
                    }
                    debug!("loading {} (attempt {})", request, retries);
                    self.load(&request)?;
                },
                Err(error) => {
                    warn!("{}", error);
                    return Ok(self.input.format_error(&error.to_string()));
                },
            }
        }
    }

    fn load(&mut self, request: &ResourceRequest) -> Result<()> {
        let entries = self.loader.as_mut()
            .and_then(|loader| loader.load(request))
            .ok_or_else(|| Error::ResourceFailed(request.clone()))?;
        let table = Rc::make_mut(&mut self.entities);
        for (name, value) in entries {
            table.add(name, value);
        }
        if let ResourceRequest::Entities(letter) = request {
            table.mark_loaded(*letter);
        }
        Ok(())
    }
}

/// The `<math>` elements of `text`, whatever their namespace prefix
pub fn locate_math(text: &str) -> Vec<MathItem> {
    let mut items = Vec::new();
    let mut pos = 0;
    while let Some(offset) = text[pos ..].find('<') {
        let start = pos + offset;
        pos = start + 1;
        let rest = &text[pos ..];
        let name_len = rest.find(|c: char| c.is_whitespace() || c == '>' || c == '/').unwrap_or(rest.len());
        let name = &rest[.. name_len];
        let local = name.rsplit(':').next().unwrap_or(name);
        if local != "math" {
            continue;
        }
        let Some(tag_len) = rest.find('>') else { break };
        let tag = &rest[name_len .. tag_len];
        let end = if tag.ends_with('/') {
            pos + tag_len + 1
        } else {
            let close = format!("</{}>", name);
            match text[pos ..].find(&close) {
                Some(i) => pos + i + close.len(),
                None => {
                    warn!("<{}> at {} is never closed", name, start);
                    continue;
                },
            }
        };
        let display = attribute(tag, "display") == Some("block") || attribute(tag, "mode") == Some("display");
        items.push(MathItem::new(&text[start .. end], display, start, end));
        pos = end;
    }
    items
}

/// The value of attribute `name` in the inside of a start tag
fn attribute<'t>(tag: &'t str, name: &str) -> Option<&'t str> {
    let mut rest = tag;
    while let Some(i) = rest.find(name) {
        let preceded = rest[.. i].ends_with(char::is_whitespace);
        let after = &rest[i + name.len() ..];
        rest = after;
        if !preceded {
            continue;
        }
        let Some(value) = after.trim_start().strip_prefix('=') else { continue };
        let value = value.trim_start();
        let quote = value.chars().next()?;
        if quote != '"' && quote != '\'' {
            continue;
        }
        let value = &value[1 ..];
        return value.find(quote).map(|end| &value[.. end]);
    }
    None
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn math_elements_are_located() {
        let text = "<p>a <math><mi>x</mi></math>, b <m:math display=\"block\"><mn>1</mn></m:math><mathx/></p>";
        let items = locate_math(text);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].math, "<math><mi>x</mi></math>");
        assert!(!items[0].display);
        assert_eq!(&text[items[1].start .. items[1].end], "<m:math display=\"block\"><mn>1</mn></m:math>");
        assert!(items[1].display);
    }

    #[test]
    fn attributes_of_a_tag() {
        assert_eq!(attribute(" display='block' x=\"1\"", "display"), Some("block"));
        assert_eq!(attribute(" xdisplay=\"block\"", "display"), None);
        assert_eq!(attribute(" x=\"1\"", "x"), Some("1"));
    }

    #[test]
    fn render_splices_the_output_into_the_text() {
        let text = "<p>Let <math><mi>x</mi></math> be <math display=\"block\"><mn>1</mn></math>.</p>";
        let mut document = MathDocument::new(text, json!({})).unwrap();
        document.render().unwrap();
        let out = document.text();
        assert!(out.starts_with("<style id=\"MJX-CHTML-styles\">"));
        assert_eq!(out.matches("<mjx-container").count(), 2);
        assert!(out.contains("<p>Let "));
        assert!(out.ends_with(".</p>"));
        assert!(!out.contains("<mi>"));
        assert!(document.states.contains(States::FIND_MATH | States::COMPILED | States::TYPESET | States::INSERTED));
        assert!(document.math.iter().all(|item| item.states.contains(States::INSERTED)));
    }

    #[test]
    fn render_actions_run_in_priority_order() {
        let document = MathDocument::new("", json!({})).unwrap();
        let names: Vec<_> = document.render_actions.iter().map(|action| action.name).collect();
        assert_eq!(names, ["find", "compile", "typeset", "update"]);
    }

    #[test]
    fn compile_errors_stay_in_their_item() {
        let text = "<math><mi>x</math> and <math><mi>y</mi></math>";
        let mut document = MathDocument::new(text, json!({})).unwrap();
        document.render().unwrap();
        let items: Vec<_> = document.math.iter().collect();
        let broken = items[0].root.as_ref().unwrap();
        let root = broken.root().unwrap();
        assert!(broken.descendants(root).into_iter().any(|id| broken.kind(id) == "merror"));
        let fine = items[1].root.as_ref().unwrap();
        assert_eq!(fine.get_text(fine.root().unwrap()), "y");
        assert!(items[0].output.as_ref().unwrap().find("mjx-merror").is_some());
    }

    #[test]
    fn unknown_options_are_rejected() {
        let err = MathDocument::new("", json!({ "CHTML": { "bogus": 1 } })).unwrap_err();
        assert!(matches!(err, Error::UnknownOption { ref path } if path == "CHTML.bogus"));
        let document = MathDocument::new("", json!({ "maxRetries": 2, "MathML": { "verify": { "fullErrors": true } } })).unwrap();
        assert_eq!(document.options().max_retries, 2);
        assert!(document.input().options().verify.full_errors);
    }

    #[test]
    fn missing_entities_are_loaded_and_the_item_compiled_again() {
        let mut requests = Vec::new();
        let loader = move |request: &ResourceRequest| {
            requests.push(request.clone());
            Some(vec![("foo".to_string(), "\u{2603}".to_string())])
        };
        let mut document = MathDocument::new("<math><mi>&foo;</mi></math>", json!({}))
            .unwrap()
            .with_loader(loader);
        document.render().unwrap();
        assert!(document.entities().is_loaded('f'));
        let item = document.math.first().unwrap();
        let tree = item.root.as_ref().unwrap();
        assert_eq!(tree.get_text(tree.root().unwrap()), "\u{2603}");
    }

    #[test]
    fn a_loader_that_fails_stops_the_render() {
        let loader = |_: &ResourceRequest| -> Option<Vec<(String, String)>> { None };
        let mut document = MathDocument::new("<math><mi>&foo;</mi></math>", json!({}))
            .unwrap()
            .with_loader(loader);
        let err = document.render().unwrap_err();
        assert!(matches!(err, Error::ResourceFailed(ResourceRequest::Entities('f'))));
    }

    #[test]
    fn without_a_loader_unknown_entities_stay_as_text() {
        let mut document = MathDocument::new("<math><mi>&foo;</mi></math>", json!({})).unwrap();
        document.render().unwrap();
        let item = document.math.first().unwrap();
        let tree = item.root.as_ref().unwrap();
        assert_eq!(tree.get_text(tree.root().unwrap()), "&foo;");
    }

    #[test]
    fn rerender_typesets_again() {
        let mut document = MathDocument::new("<math><mi>x</mi></math>", json!({})).unwrap();
        document.render().unwrap();
        let first = document.text().to_string();
        document.rerender().unwrap();
        assert_eq!(document.text(), first);
        assert!(!document.states.contains(States::RERENDER));
    }

    #[test]
    fn convert_one_expression() {
        let mut document = MathDocument::new("", json!({})).unwrap();
        let container = document.convert("<math><mi>x</mi></math>", false).unwrap();
        assert_eq!(container.attribute("class"), Some("MathJax"));
        assert!(container.find("mjx-mi").is_some());
        let error = document.convert("<mrow/>", false).unwrap();
        assert!(error.find("mjx-merror").is_some());
    }
}
