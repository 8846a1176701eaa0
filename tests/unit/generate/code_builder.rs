use super::*;

#[test]
fn scope_indents_its_body() {
    let mut b = CodeBuilder::new();
    b.line("class A");
    b.scope("}", |b| {
        b.line("int x;");
        b.scope("};", |b| b.line("y();"));
    });
    assert_eq!(
        b.finish(),
        "class A\n{\n    int x;\n    {\n        y();\n    };\n}\n"
    );
}

#[test]
fn empty_lines_carry_no_indentation() {
    let mut b = CodeBuilder::new();
    b.indent();
    b.line("");
    b.blank();
    b.line("x");
    assert_eq!(b.finish(), "\n\n    x\n");
}

#[test]
fn append_reindents_the_other_builder() {
    let mut inner = CodeBuilder::new();
    inner.line("a");
    inner.indent();
    inner.line("b");

    let mut outer = CodeBuilder::new();
    outer.indent();
    outer.append(&inner);
    assert_eq!(outer.finish(), "    a\n        b\n");
}

#[test]
fn dedent_stops_at_zero() {
    let mut b = CodeBuilder::new();
    b.dedent();
    b.lines(["a", "b"]);
    assert_eq!(b.finish(), "a\nb\n");
}
