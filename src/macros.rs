/// Largest of a list of `f64` expressions
macro_rules! max {
    ($x:expr) => ( $x );
    ($x:expr, $($xs:expr),+ $(,)?) => {
        {
            let a: f64 = $x;
            a.max(max!($($xs),+))
        }
    };
}
