#[allow(unused_macros)]
macro_rules! run_tests {
    ($exprs:expr, $valids:expr, $invalids:expr) => {{
        $exprs.iter().for_each(|&expr| {
            let re = Regex::new(expr).unwrap();
            $valids.iter().for_each(|s| {
                assert!(re.accepts(s), r#""{}" failed to match "{}""#, expr, s)
            });
            $invalids.iter().for_each(|s| {
                assert_eq!(re.accepts(s), false, r#""{}" matched "{}""#, expr, s)
            });
        })
    }};
}

#[allow(unused_macros)]
macro_rules! run_invalid_tests {
    ($exprs:expr) => {{
        $exprs.iter().for_each(|&expr| {
            Regex::new(expr).unwrap_err();
        });
    }};
}
