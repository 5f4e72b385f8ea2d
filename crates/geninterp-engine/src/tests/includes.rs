use std::io;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;

use super::{create_test_dir, create_test_file, invariants};
use crate::blocks::{BlockType, Include};
use crate::error::InterpretError;
use crate::interpreter::Interpreter;
use crate::io::MemoryReader;
use crate::presets;
use crate::tree::SourceId;

fn latex_with(files: &[(&str, &str)]) -> Interpreter {
    let reader = files
        .iter()
        .fold(MemoryReader::new(), |reader, (path, content)| {
            reader.with_file(*path, *content)
        });
    presets::latex().with_reader(reader)
}

#[rstest]
#[case::splices_file("11\\input{ch1}22", "11aa{bb}cc22")]
#[case::reference_with_extension("11\\input{ch1.tex}22", "11aa{bb}cc22")]
#[case::reference_is_trimmed("11\\input{ ch1\n}22", "11aa{bb}cc22")]
#[case::comment_inside_reference("11\\input{ch%note\n1}22", "11aa{bb}cc22")]
#[case::same_file_twice("\\input{ch1}\\input{ch1}", "aa{bb}ccaa{bb}cc")]
fn include_is_replaced_by_file(#[case] input: &str, #[case] expected: &str) {
    let interpreter = latex_with(&[("ch1.tex", "aa{bb}cc")]);
    let tree = interpreter.interpret(input).unwrap();
    invariants::check(&tree);
    assert_eq!(tree.render(), expected);
}

#[test]
fn included_text_is_interpreted() {
    let interpreter = latex_with(&[("ch1.tex", "aa%dropped\ncc")]);
    assert_eq!(interpreter.render("11\\input{ch1}22").unwrap(), "11aacc22");
}

#[test]
fn included_nodes_point_into_their_own_source() {
    let interpreter = latex_with(&[("ch1.tex", "aa{bb}cc")]);
    let tree = interpreter.interpret("11\\input{ch1}22").unwrap();

    insta::assert_snapshot!(tree.render_structure(), @r#"
    <Root>
    ├── <plain 0..2 "11">
    ├── <input 2..13 "\input{ch1}">
    │   ├── <plain 0..2 "aa">
    │   ├── <bracket 2..6 "{bb}">
    │   │   └── <plain 3..5 "bb">
    │   └── <plain 6..8 "cc">
    └── <plain 13..15 "22">
    "#);

    let input = tree.iter_matching("input").next().unwrap();
    assert!(tree.node(input).is_spliced());
    let bracket = tree.iter_matching("bracket").next().unwrap();
    let block = tree.block(bracket).unwrap();
    assert_ne!(block.source(), SourceId::MAIN);
    assert_eq!(
        tree.source(block.source()).path.as_deref(),
        Some(Path::new("ch1.tex"))
    );
    assert_eq!(tree.text_of(block), "aa{bb}cc");
}

#[test]
fn empty_file_renders_nothing() {
    let interpreter = latex_with(&[("empty.tex", "")]);
    let tree = interpreter.interpret("11\\input{empty}22").unwrap();
    let input = tree.iter_matching("input").next().unwrap();
    assert!(tree.node(input).is_childless());
    assert_eq!(tree.render(), "1122");
}

#[test]
fn nested_includes() {
    let interpreter = latex_with(&[("a.tex", "A\\input{b}A"), ("b.tex", "{B}")]);
    let tree = interpreter.interpret("1\\input{a}2").unwrap();
    invariants::check(&tree);
    assert_eq!(tree.render(), "1A{B}A2");
}

#[test]
fn missing_file_is_unresolved() {
    let interpreter = latex_with(&[]);
    let err = interpreter.interpret("\\input{missing}").unwrap_err();
    assert!(matches!(
        err,
        InterpretError::UnresolvedInclude { path, source }
            if path == Path::new("missing.tex") && source.kind() == io::ErrorKind::NotFound
    ));
}

#[test]
fn cycle_is_detected() {
    let interpreter = latex_with(&[("a.tex", "x\\input{b}"), ("b.tex", "y\\input{a}")]);
    let err = interpreter.interpret("\\input{a}").unwrap_err();
    assert!(matches!(
        err,
        InterpretError::CyclicInclude { path } if path == Path::new("a.tex")
    ));
}

#[test]
fn file_including_itself_is_a_cycle() {
    let interpreter = latex_with(&[("a.tex", "x\\input{a}")]);
    let err = interpreter.interpret_file("a.tex").unwrap_err();
    assert!(matches!(
        err,
        InterpretError::CyclicInclude { path } if path == Path::new("a.tex")
    ));
}

#[test]
fn errors_in_included_file_propagate() {
    let interpreter = latex_with(&[("bad.tex", "aa{bb")]);
    let err = interpreter.interpret("\\input{bad}").unwrap_err();
    assert!(matches!(
        err,
        InterpretError::UnterminatedBlock { block, .. } if block == "bracket 2.."
    ));
}

#[test]
fn subinterpreter_override_handles_included_files() {
    let reader = MemoryReader::new().with_file("raw.tex", "a%b{c");
    let verbatim = Interpreter::new(Vec::new())
        .unwrap()
        .with_reader(reader.clone());

    let interpreter = Interpreter::new(vec![
        BlockType::comment("comment", "%"),
        BlockType::include(
            "input",
            Include::new("\\input{", "}")
                .extension(".tex")
                .subinterpreter(Arc::new(verbatim)),
        ),
    ])
    .unwrap()
    .with_reader(reader);

    assert_eq!(
        interpreter.render("1%x\n\\input{raw}2").unwrap(),
        "1a%b{c2"
    );
}

#[test]
fn base_dir_applies_to_include_types() {
    let interpreter = latex_with(&[("/book/ch1.tex", "one")]).with_base_dir("/book");
    assert_eq!(interpreter.render("\\input{ch1}").unwrap(), "one");

    let bases: Vec<_> = interpreter
        .block_types()
        .iter()
        .filter_map(|bt| bt.include_settings())
        .map(|inc| inc.base_dir.clone())
        .collect();
    assert_eq!(bases, vec![Some(Path::new("/book").to_path_buf())]);
}

#[test]
fn base_dir_reaches_subinterpreter_overrides() {
    let reader = MemoryReader::new()
        .with_file("/book/outer.tex", "\\input{inner}")
        .with_file("/book/inner.tex", "deep");
    let nested = presets::latex().with_reader(reader.clone());

    let interpreter = Interpreter::new(vec![BlockType::include(
        "input",
        Include::new("\\input{", "}")
            .extension(".tex")
            .subinterpreter(Arc::new(nested)),
    )])
    .unwrap()
    .with_reader(reader)
    .with_base_dir("/book");

    assert_eq!(interpreter.render("\\input{outer}").unwrap(), "deep");
}

#[test]
fn interpret_file_resolves_relative_to_the_file() {
    let dir = create_test_dir();
    let main = create_test_file(&dir, "main.tex", "11\\input{chapters/one}22");
    create_test_file(&dir, "chapters/one.tex", "aa{\\input{chapters/two}}cc");
    create_test_file(&dir, "chapters/two.tex", "bb%note");

    let interpreter = presets::latex().with_base_file(&main);
    let tree = interpreter.interpret_file(&main).unwrap();

    invariants::check(&tree);
    assert_eq!(tree.path(), Some(main.as_path()));
    assert_eq!(tree.render(), "11aa{bb}cc22");
}

#[test]
fn interpret_file_missing_is_a_read_error() {
    let dir = create_test_dir();
    let missing = dir.path().join("nope.tex");
    let err = presets::latex().interpret_file(&missing).unwrap_err();
    assert!(matches!(err, InterpretError::ReadSource { path, .. } if path == missing));
}

#[test]
fn disk_cycle_through_different_spellings() {
    let dir = create_test_dir();
    let main = create_test_file(&dir, "main.tex", "\\input{./sub/../main}");
    create_test_file(&dir, "sub/other.tex", "");

    let err = presets::latex()
        .with_base_file(&main)
        .interpret_file(&main)
        .unwrap_err();
    assert!(matches!(err, InterpretError::CyclicInclude { .. }));
}
