//! Named character entities.
//!
//! MathML sources routinely use HTML entity names (`&InvisibleTimes;`, `&alpha;`, ...) that an XML
//! parser does not know. They are translated before parsing. The common names are built in; others
//! are loaded on demand, one file per initial letter, through the document's resource loader.

use std::collections::{HashMap, HashSet};

use phf::phf_map;

use crate::error::ResourceRequest;

static ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    "amp" => "&",
    "lt" => "<",
    "gt" => ">",
    "quot" => "\"",
    "apos" => "'",
    "nbsp" => "\u{00A0}",
    "times" => "\u{00D7}",
    "divide" => "\u{00F7}",
    "div" => "\u{00F7}",
    "minus" => "\u{2212}",
    "pm" => "\u{00B1}",
    "PlusMinus" => "\u{00B1}",
    "mp" => "\u{2213}",
    "MinusPlus" => "\u{2213}",
    "sdot" => "\u{22C5}",
    "middot" => "\u{00B7}",
    "ast" => "*",
    "lowast" => "\u{2217}",
    "compfn" => "\u{2218}",
    "InvisibleTimes" => "\u{2062}",
    "it" => "\u{2062}",
    "ApplyFunction" => "\u{2061}",
    "af" => "\u{2061}",
    "InvisibleComma" => "\u{2063}",
    "ic" => "\u{2063}",
    "infin" => "\u{221E}",
    "sum" => "\u{2211}",
    "Sum" => "\u{2211}",
    "prod" => "\u{220F}",
    "Product" => "\u{220F}",
    "coprod" => "\u{2210}",
    "int" => "\u{222B}",
    "Integral" => "\u{222B}",
    "iint" => "\u{222C}",
    "conint" => "\u{222E}",
    "oint" => "\u{222E}",
    "part" => "\u{2202}",
    "PartialD" => "\u{2202}",
    "nabla" => "\u{2207}",
    "Del" => "\u{2207}",
    "forall" => "\u{2200}",
    "exist" => "\u{2203}",
    "Exists" => "\u{2203}",
    "empty" => "\u{2205}",
    "isin" => "\u{2208}",
    "in" => "\u{2208}",
    "notin" => "\u{2209}",
    "ni" => "\u{220B}",
    "sub" => "\u{2282}",
    "sup" => "\u{2283}",
    "sube" => "\u{2286}",
    "supe" => "\u{2287}",
    "cap" => "\u{2229}",
    "cup" => "\u{222A}",
    "and" => "\u{2227}",
    "or" => "\u{2228}",
    "not" => "\u{00AC}",
    "le" => "\u{2264}",
    "leq" => "\u{2264}",
    "ge" => "\u{2265}",
    "geq" => "\u{2265}",
    "ne" => "\u{2260}",
    "NotEqual" => "\u{2260}",
    "equiv" => "\u{2261}",
    "Congruent" => "\u{2261}",
    "approx" => "\u{2248}",
    "sim" => "\u{223C}",
    "simeq" => "\u{2243}",
    "cong" => "\u{2245}",
    "prop" => "\u{221D}",
    "ll" => "\u{226A}",
    "gg" => "\u{226B}",
    "perp" => "\u{22A5}",
    "mid" => "\u{2223}",
    "parallel" => "\u{2225}",
    "angle" => "\u{2220}",
    "deg" => "\u{00B0}",
    "prime" => "\u{2032}",
    "Prime" => "\u{2033}",
    "hellip" => "\u{2026}",
    "ctdot" => "\u{22EF}",
    "vellip" => "\u{22EE}",
    "dtdot" => "\u{22F1}",
    "rarr" => "\u{2192}",
    "rightarrow" => "\u{2192}",
    "RightArrow" => "\u{2192}",
    "to" => "\u{2192}",
    "larr" => "\u{2190}",
    "leftarrow" => "\u{2190}",
    "LeftArrow" => "\u{2190}",
    "harr" => "\u{2194}",
    "uarr" => "\u{2191}",
    "darr" => "\u{2193}",
    "rArr" => "\u{21D2}",
    "Rightarrow" => "\u{21D2}",
    "Implies" => "\u{21D2}",
    "lArr" => "\u{21D0}",
    "hArr" => "\u{21D4}",
    "iff" => "\u{21D4}",
    "map" => "\u{21A6}",
    "mapsto" => "\u{21A6}",
    "langle" => "\u{27E8}",
    "rangle" => "\u{27E9}",
    "lang" => "\u{27E8}",
    "rang" => "\u{27E9}",
    "lceil" => "\u{2308}",
    "rceil" => "\u{2309}",
    "lfloor" => "\u{230A}",
    "rfloor" => "\u{230B}",
    "lbrace" => "{",
    "rbrace" => "}",
    "lbrack" => "[",
    "rbrack" => "]",
    "lpar" => "(",
    "rpar" => ")",
    "verbar" => "|",
    "Verbar" => "\u{2016}",
    "Vert" => "\u{2016}",
    "radic" => "\u{221A}",
    "Sqrt" => "\u{221A}",
    "OverBar" => "\u{00AF}",
    "UnderBar" => "_",
    "OverBrace" => "\u{23DE}",
    "UnderBrace" => "\u{23DF}",
    "Hat" => "^",
    "tilde" => "\u{02DC}",
    "DiacriticalTilde" => "\u{02DC}",
    "dot" => "\u{02D9}",
    "die" => "\u{00A8}",
    "ThinSpace" => "\u{2009}",
    "MediumSpace" => "\u{205F}",
    "ThickSpace" => "\u{2005}\u{200A}",
    "NegativeThinSpace" => "\u{200B}",
    "NoBreak" => "\u{2060}",
    "NewLine" => "\n",
    "alpha" => "\u{03B1}",
    "beta" => "\u{03B2}",
    "gamma" => "\u{03B3}",
    "delta" => "\u{03B4}",
    "epsi" => "\u{03B5}",
    "epsilon" => "\u{03B5}",
    "zeta" => "\u{03B6}",
    "eta" => "\u{03B7}",
    "theta" => "\u{03B8}",
    "iota" => "\u{03B9}",
    "kappa" => "\u{03BA}",
    "lambda" => "\u{03BB}",
    "mu" => "\u{03BC}",
    "nu" => "\u{03BD}",
    "xi" => "\u{03BE}",
    "omicron" => "\u{03BF}",
    "pi" => "\u{03C0}",
    "rho" => "\u{03C1}",
    "sigmaf" => "\u{03C2}",
    "sigma" => "\u{03C3}",
    "tau" => "\u{03C4}",
    "upsilon" => "\u{03C5}",
    "phi" => "\u{03D5}",
    "chi" => "\u{03C7}",
    "psi" => "\u{03C8}",
    "omega" => "\u{03C9}",
    "Alpha" => "\u{0391}",
    "Beta" => "\u{0392}",
    "Gamma" => "\u{0393}",
    "Delta" => "\u{0394}",
    "Epsilon" => "\u{0395}",
    "Zeta" => "\u{0396}",
    "Eta" => "\u{0397}",
    "Theta" => "\u{0398}",
    "Iota" => "\u{0399}",
    "Kappa" => "\u{039A}",
    "Lambda" => "\u{039B}",
    "Mu" => "\u{039C}",
    "Nu" => "\u{039D}",
    "Xi" => "\u{039E}",
    "Omicron" => "\u{039F}",
    "Pi" => "\u{03A0}",
    "Rho" => "\u{03A1}",
    "Sigma" => "\u{03A3}",
    "Tau" => "\u{03A4}",
    "Upsilon" => "\u{03A5}",
    "Phi" => "\u{03A6}",
    "Chi" => "\u{03A7}",
    "Psi" => "\u{03A8}",
    "Omega" => "\u{03A9}",
};

/// Entities every XML parser knows; left alone before parsing
const XML_ENTITIES: &[&str] = &["amp", "lt", "gt", "quot", "apos"];

/// The entity tables of a document: the built-in names plus whatever has been loaded
#[derive(Debug, Clone, Default)]
pub struct EntityTable {
    loaded:  HashMap<String, String>,
    letters: HashSet<char>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.loaded.insert(name.into(), value.into());
    }

    /// Record that the definitions for names starting with `letter` have been loaded
    pub fn mark_loaded(&mut self, letter: char) {
        self.letters.insert(letter);
    }

    pub fn is_loaded(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    /// The replacement text of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.loaded.get(name).map(String::as_str).or_else(|| ENTITIES.get(name).copied())
    }

    fn replace(&self, name: &str, can_load: bool) -> Result<Option<String>, ResourceRequest> {
        if let Some(number) = name.strip_prefix('#') {
            let code = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None      => number.parse::<u32>().ok(),
            };
            return Ok(code.and_then(char::from_u32).map(String::from));
        }
        if let Some(value) = self.get(name) {
            return Ok(Some(value.to_string()));
        }
        match name.chars().next() {
            Some(letter) if can_load && !self.is_loaded(letter) => {
                debug!("entity \"{}\" needs the definitions for \"{}\"", name, letter);
                Err(ResourceRequest::Entities(letter))
            },
            _ => {
                warn!("unknown entity \"&{};\"", name);
                Ok(None)
            },
        }
    }

    fn translate_with(&self, text: &str, keep_xml: bool, can_load: bool) -> Result<String, ResourceRequest> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find('&') {
            out.push_str(&rest[.. start]);
            let after = &rest[start + 1 ..];
            let name_len = after.find(|c: char| !(c.is_ascii_alphanumeric() || c == '#')).unwrap_or(after.len());
            let name = &after[.. name_len];
            let terminated = after[name_len ..].starts_with(';');
            if name.is_empty() || !terminated || (keep_xml && XML_ENTITIES.contains(&name)) {
                out.push('&');
                rest = after;
                continue;
            }
            match self.replace(name, can_load)? {
                Some(value) if keep_xml => out.push_str(&escape_xml(&value)),
                Some(value) => out.push_str(&value),
                None => {
                    // leave unknown entities visible, escaped so the parser accepts them
                    out.push_str(if keep_xml { "&amp;" } else { "&" });
                    out.push_str(name);
                    out.push(';');
                },
            }
            rest = &after[name_len + 1 ..];
        }
        out.push_str(rest);
        Ok(out)
    }

    /// Replace every entity reference in `text`
    pub fn translate(&self, text: &str, can_load: bool) -> Result<String, ResourceRequest> {
        self.translate_with(text, false, can_load)
    }

    /// Replace the entity references of a markup source, keeping the source well-formed XML
    pub fn translate_markup(&self, markup: &str, can_load: bool) -> Result<String, ResourceRequest> {
        self.translate_with(markup, true, can_load)
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _   => out.push(c),
        }
    }
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_numeric() {
        let table = EntityTable::new();
        assert_eq!(table.translate("a&InvisibleTimes;b", false).unwrap(), "a\u{2062}b");
        assert_eq!(table.translate("&#x3B1;&#946;", false).unwrap(), "\u{03B1}\u{03B2}");
        assert_eq!(table.translate("x &lt; y", false).unwrap(), "x < y");
        assert_eq!(table.translate("AT&T", false).unwrap(), "AT&T");
    }

    #[test]
    fn markup_stays_well_formed() {
        let table = EntityTable::new();
        assert_eq!(table.translate_markup("<mo>&lt;</mo><mi>&alpha;</mi>", false).unwrap(),
                   "<mo>&lt;</mo><mi>\u{03B1}</mi>");
        assert_eq!(table.translate_markup("<mo>&lpar;</mo>", false).unwrap(), "<mo>(</mo>");
        assert_eq!(table.translate_markup("<mi>&bogus;</mi>", false).unwrap(), "<mi>&amp;bogus;</mi>");
    }

    #[test]
    fn unknown_entities_request_a_load() {
        let mut table = EntityTable::new();
        assert_eq!(table.translate("&Zopf;", true), Err(ResourceRequest::Entities('Z')));
        table.add("Zopf", "\u{2124}");
        table.mark_loaded('Z');
        assert_eq!(table.translate("&Zopf;", true).unwrap(), "\u{2124}");
        assert_eq!(table.translate("&Zeta2;", true).unwrap(), "&Zeta2;");
    }
}
