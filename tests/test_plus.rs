use relang::Regex;

include!("macros.rs");

#[test]
fn test_plus() {
    let exprs = ["a+", "(a)+"];
    let valids = ["a", "aa", "aaa"];
    let invalids = ["", " ", "b", "ab"];
    run_tests!(&exprs, &valids, &invalids);

    let exprs = ["(ab)+"];
    let valids = ["ab", "abab", "ababab"];
    let invalids = ["", "a", "aba", "abb"];
    run_tests!(&exprs, &valids, &invalids);

    let exprs = ["a+b"];
    let valids = ["ab", "aab", "aaab"];
    let invalids = ["", "b", "a", "abb"];
    run_tests!(&exprs, &valids, &invalids);

    let exprs = ["a+b?"];
    let valids = ["a", "aaa", "ab", "aaab"];
    let invalids = ["", "b", "ba", "abb"];
    run_tests!(&exprs, &valids, &invalids);
}
