/// Compile a regex literal once and hand out a `&'static Regex`.
#[macro_export]
macro_rules! regex {
    ($pat:literal) => {{
        static RE: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pat).expect("built-in regex must compile"));
        &*RE
    }};
}

/// Conjunction of predicates: `all![a, b, c]`.
#[macro_export]
macro_rules! all {
    ($($p:expr),+ $(,)?) => {
        $crate::Predicate::And(vec![ $($p),+ ])
    };
}

/// Disjunction of predicates: `any![a, b, c]`.
#[macro_export]
macro_rules! any {
    ($($p:expr),+ $(,)?) => {
        $crate::Predicate::Or(vec![ $($p),+ ])
    };
}
