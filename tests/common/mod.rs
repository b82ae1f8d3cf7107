#![allow(dead_code)]

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::rc::Rc;

use serde::de::DeserializeOwned;

use mml_chtml::input::{EntityTable, MathMl, MathMlOptions};
use mml_chtml::output::{ChtmlOptions, Metrics, TexFont, WrapperId, WrapperTree};
use mml_chtml::tree::{MmlTree, NodeId};
use mml_chtml::tree::classes::MmlFactory;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn load_yaml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> T {
    let file = File::open(path.as_ref()).expect("failed to open test collection");
    let reader = BufReader::new(file);
    serde_yaml::from_reader(reader).expect("failed to parse test collection")
}

pub fn compile_with(options: MathMlOptions, mathml: &str) -> MmlTree {
    let input = MathMl::new(options, Rc::new(MmlFactory::standard()));
    input.compile(mathml, false, &Rc::new(EntityTable::new()), false)
        .unwrap_or_else(|err| panic!("{} failed to compile: {}", mathml, err))
}

pub fn compile(mathml: &str) -> MmlTree {
    compile_with(MathMlOptions::default(), mathml)
}

/// The nodes of the given kind, in document order
pub fn nodes_of_kind(tree: &MmlTree, kind: &str) -> Vec<NodeId> {
    let root = tree.root().expect("tree has no root");
    tree.descendants(root).into_iter().filter(|&id| tree.kind(id) == kind).collect()
}

/// The token nodes, in document order
pub fn tokens(tree: &MmlTree) -> Vec<NodeId> {
    let root = tree.root().expect("tree has no root");
    tree.descendants(root).into_iter().filter(|&id| tree[id].is_token()).collect()
}

/// Run `f` over the wrappers of a compiled tree, with the TeX classes computed
pub fn with_wrappers<R>(tree: &mut MmlTree, f: impl FnOnce(&mut WrapperTree<'_, TexFont>, WrapperId) -> R) -> R {
    let root = tree.root().expect("tree has no root");
    tree.set_tex_class(root, None);
    let font = TexFont::new();
    let options = ChtmlOptions::default();
    let mut wrappers = WrapperTree::new(tree, &font, &options, Metrics::from_options(&options));
    let top = wrappers.wrap(root);
    f(&mut wrappers, top)
}
