use relang::Regex;

include!("macros.rs");

#[test]
fn test_blank() {
    let exprs = ["", "()", "(())", "((()))", "()()"];
    let valids = [""];
    let invalids = [" ", "a", "  "];
    run_tests!(&exprs, &valids, &invalids);
}

#[test]
fn test_single() {
    let exprs = [" ", "( )", "(( ))", "(() )"];
    let valids = [" "];
    let invalids = ["", "a", "  "];
    run_tests!(&exprs, &valids, &invalids);

    let exprs = ["a", "(a)"];
    let valids = ["a"];
    let invalids = ["", "b", "a ", " a", "aa"];
    run_tests!(&exprs, &valids, &invalids);

    let exprs = ["/*", "(/*)"];
    let valids = ["*"];
    let invalids = ["", " ", "a", "**"];
    run_tests!(&exprs, &valids, &invalids);

    let exprs = ["/(", "(/()", "()/("];
    let valids = ["("];
    let invalids = ["", " ", ")", "()"];
    run_tests!(&exprs, &valids, &invalids);
}

#[test]
fn test_concat() {
    let exprs = ["ab", "(ab)", "(a)b", "a(b)", "()ab", "a()b"];
    let valids = ["ab"];
    let invalids = ["", " ", "a", "b", "c", "ba", "ab ", " ab"];
    run_tests!(&exprs, &valids, &invalids);

    let exprs = ["a ", "(a) ", "a( )", "(a )"];
    let valids = ["a "];
    let invalids = ["a", " ", " a", "a  ", " a "];
    run_tests!(&exprs, &valids, &invalids);
}
