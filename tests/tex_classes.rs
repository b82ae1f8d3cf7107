extern crate mml_chtml;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;

mod common;
use common::{compile, init_logger, load_yaml, tokens};

use mml_chtml::tree::tex_class::{atom_space, TexClass, TEXSPACE, TEXSPACELENGTH};

const TEX_CLASSES_YAML: &str = "tests/data/tex_classes.yaml";

#[derive(Debug, Serialize, Deserialize)]
struct Case {
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "MathML")]
    mathml: String,
    #[serde(rename = "Classes")]
    classes: Vec<String>,
}

#[test]
fn token_classes() {
    init_logger();
    let cases: Vec<Case> = load_yaml(TEX_CLASSES_YAML);
    let mut fail = 0;

    for case in cases {
        let mut tree = compile(&case.mathml);
        let root = tree.root().unwrap();
        tree.set_tex_class(root, None);
        let classes: Vec<&str> = tokens(&tree).into_iter()
            .map(|id| tree[id].tex_class.map_or("NONE", TexClass::name))
            .collect();
        if classes != case.classes {
            println!("{}: {}", case.description, case.mathml);
            println!("  expected {:?}, found {:?}", case.classes, classes);
            fail += 1;
        }
    }

    if fail > 0 {
        panic!("{} TeX class tests failed.", fail);
    }
}

const CLASSES: [TexClass; 8] = [
    TexClass::Ord, TexClass::Op, TexClass::Bin, TexClass::Rel,
    TexClass::Open, TexClass::Close, TexClass::Punct, TexClass::Inner,
];

#[test]
fn spacing_of_every_pair_of_classes() {
    for (i, &left) in CLASSES.iter().enumerate() {
        for (j, &right) in CLASSES.iter().enumerate() {
            let entry = TEXSPACE[i][j];
            let expected = TEXSPACELENGTH[entry.unsigned_abs() as usize];
            assert_eq!(atom_space(left, right, false), expected, "{:?} {:?}", left, right);
            let in_script = if entry >= 0 { "" } else { expected };
            assert_eq!(atom_space(left, right, true), in_script, "{:?} {:?} in a script", left, right);
        }
    }
}

#[test]
fn spacing_follows_the_previous_atom() {
    let mut tree = compile("<math><mi>a</mi><mo>+</mo><mi>b</mi><mo>=</mo><mi>c</mi></math>");
    let root = tree.root().unwrap();
    tree.set_tex_class(root, None);
    let spaces: Vec<&str> = tokens(&tree).into_iter().map(|id| tree.tex_spacing(id)).collect();
    assert_eq!(spaces, ["", "mediummathspace", "mediummathspace", "thickmathspace", "thickmathspace"]);
}

#[test]
fn no_spacing_in_scripts() {
    let mut tree = compile("<math><msup><mi>x</mi><mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow></msup></math>");
    let root = tree.root().unwrap();
    tree.set_tex_class(root, None);
    let plus = common::nodes_of_kind(&tree, "mo")[0];
    assert_eq!(tree[plus].tex_class, Some(TexClass::Bin));
    assert_eq!(tree.tex_spacing(plus), "");
}
