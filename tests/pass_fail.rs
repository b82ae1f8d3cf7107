extern crate mml_chtml;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;

mod common;
use common::{init_logger, load_yaml};

use mml_chtml::render;

const PASS_FAIL_YAML: &str = "tests/data/passfail.yaml";


#[derive(Debug, Serialize, Deserialize)]
struct Tests {
    #[serde(rename="Pass")]
    pass: Vec<String>,
    #[serde(rename="Fail")]
    fail: Vec<String>,
}

#[test]
fn pass_fail() {
    init_logger();
    let tests: Tests = load_yaml(PASS_FAIL_YAML);
    let mut fail = 0;

    for test in tests.pass {
        match render(&test, false) {
            Ok((container, _)) if container.find("mjx-merror").is_none() => continue,
            Ok((container, _)) => {
                println!("MathML: {}", test);
                println!("Should have passed, shown as: {}", container);
                fail += 1;
            },
            Err(err) => {
                println!("MathML: {}", test);
                println!("Should have passed, failed with: {:?}", err);
                fail += 1;
            },
        }
    }

    // Malformed markup never fails the call: it is typeset as an error in place of the math
    for test in tests.fail {
        match render(&test, false) {
            Ok((container, _)) if container.find("mjx-merror").is_some() => continue,
            Ok((container, _)) => {
                println!("MathML: {}", test);
                println!("Should have been shown as an error, got: {}", container);
                fail += 1;
            },
            Err(err) => {
                println!("MathML: {}", test);
                println!("Should have been contained, failed with: {:?}", err);
                fail += 1;
            },
        }
    }

    if fail > 0 {
        panic!("{} Pass/Fail tests failed.", fail);
    }
}
