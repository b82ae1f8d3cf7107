/*! # MathML to HTML/CSS math rendering

This library takes a formula written in MathML (e.g. `<math><mfrac><mn>1</mn><mn>2</mn></mfrac></math>`) and typesets it as HTML elements styled with CSS,
spaced and sized the way TeX would.

## Basic usage

A call to `render` turns one expression into its `mjx-container` element and the stylesheet the element needs.

```
let (container, styles) = mml_chtml::render("<math><mi>x</mi><mo>+</mo><mn>1</mn></math>", false).expect("Error in rendering");
let html = format!("<style>{}</style>{}", styles.css(), container);
assert!(html.contains("mjx-container"));
```

Notes:

 - Malformed MathML does not fail the call: the expression is shown as an `merror` holding the message.
 - Sizes are in em, so the output follows the font size of the page it is put in.
 - Each character is an empty `mjx-c` element. Its glyph and box are given by a CSS rule of the stylesheet, so the stylesheet must be on the page.

## More complex cases

The call to `render` is a wrapper around two operations, which may be run separately:

  1. Compiling the markup into a [`MmlTree`](crate::tree::MmlTree), cf [`MathMl::compile`](crate::input::MathMl::compile).
     The input jax translates entities, parses the markup, checks it against the node kinds it knows and pushes the inherited attributes down the tree.
  2. Typesetting the tree, cf [`Chtml::typeset`](crate::output::Chtml::typeset). This computes the TeX classes of the nodes, then builds a tree of
     wrappers measuring each node (cf [`WrapperTree`](crate::output::WrapperTree)) and turns it into elements.

```
use std::rc::Rc;
use mml_chtml::input::{EntityTable, MathMl, MathMlOptions};
use mml_chtml::output::{Chtml, ChtmlOptions};
use mml_chtml::tree::classes::MmlFactory;

let input = MathMl::new(MathMlOptions::default(), Rc::new(MmlFactory::standard()));
let mut tree = input.compile("<math><msup><mi>x</mi><mn>2</mn></msup></math>", false, &Rc::new(EntityTable::new()), false).expect("Compile error");

let mut output = Chtml::new(ChtmlOptions::default());
let container = output.typeset(&mut tree);
let css = output.styles().css();
# assert!(container.find("mjx-msup").is_some());
# assert!(css.contains("mjx-c.mjx-c78"));
```

Whole texts with `<math>` elements in them are handled by a [`MathDocument`](crate::document::MathDocument), which finds the math,
renders each item (keeping errors to the item they happen in) and splices the results back into the text:

```
let text = "<p>Let <math><mi>x</mi></math> be positive.</p>";
let mut document = mml_chtml::document::MathDocument::new(text, serde_json::json!({ "CHTML": { "scale": 1.2 } })).expect("Invalid options");
document.render().expect("Resource missing");
assert!(document.text().contains("<mjx-container"));
```

## Options

Options are given as one JSON object, with the options of the input jax under `MathML` and those of the output jax under `CHTML`.
Every key must already have a default: misspelled options are reported rather than ignored. Lists may be extended
with `{"[+]": [...]}` and shortened with `{"[-]": [...]}`, cf [`options`](crate::options).

## Fonts

Character metrics, stretchy delimiter descriptions and TeX font parameters come from a [`FontData`](crate::output::FontData).
The crate comes with [`TexFont`](crate::output::TexFont), the metrics of the MathJax TeX fonts.
*/



#[macro_use]
extern crate serde_derive;



#[macro_use]
extern crate log;

#[macro_use]
mod macros;

pub mod error;
pub mod factory;
pub mod options;
pub mod lengths;
pub mod util;
pub mod tree;
pub mod input;
pub mod output;
pub mod document;

use std::rc::Rc;

use crate::input::{EntityTable, MathMl, MathMlOptions};
use crate::output::{Chtml, ChtmlOptions, CssStyles, Element};
use crate::tree::classes::MmlFactory;


/// Render one MathML expression with the default options. Returns its `mjx-container` and the stylesheet it uses.
pub fn render(mathml: &str, display: bool) -> Result<(Element, CssStyles), crate::error::Error> {
    let input = MathMl::new(MathMlOptions::default(), Rc::new(MmlFactory::standard()));
    let mut tree = match input.compile(mathml, display, &Rc::new(EntityTable::new()), false) {
        Ok(tree) => tree,
        Err(error) if error.is_retry() => return Err(error),
        Err(error) => {
            warn!("{}", error);
            input.format_error(&error.to_string())
        },
    };

    let mut output = Chtml::new(ChtmlOptions::default());
    let container = output.typeset(&mut tree);
    Ok((container, output.styles()))
}

#[cfg(test)]
mod tests {
    use crate::render;

    /// Every ASCII character must come out as a character of the font, in every variant,
    /// without the heuristic box used for characters the font does not know.
    #[test]
    fn all_alphanumeric_variant_combinations_must_work() {
        let alphanumeric : Vec<_> =
            (0 .. 0x7F)
            .filter_map(|i| std::primitive::char::from_u32(i))
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        let variants = vec![
            None,
            Some("normal"),
            Some("bold"),
            Some("italic"),
            Some("bold-italic"),
        ];

        for variant in variants {
            for character in alphanumeric.iter() {
                let formula = match variant {
                    Some(variant) => format!("<math><mi mathvariant=\"{}\">{}</mi></math>", variant, character),
                    None          => format!("<math><mi>{}</mi></math>", character),
                };

                let (container, styles) = render(&formula, false).unwrap();
                assert!(container.find("mjx-merror").is_none(), "{}", formula);
                assert!(container.find("mjx-utext").is_none(), "{}", formula);
                let class = format!("mjx-c{:X}", *character as u32);
                assert!(styles.css().contains(&class), "{}", formula);
            }
        }
    }

    #[test]
    fn malformed_markup_is_shown_as_an_error() {
        let (container, _) = render("<math><mi>x</math>", false).unwrap();
        assert!(container.find("mjx-merror").is_some());
    }
}
