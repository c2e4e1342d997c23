//! Error context for `anyhow` results in closure form, so that call
//! sites read `.map_err(ctx!("loading {path:?}"))` instead of
//! `.with_context(|| anyhow!("loading {path:?}"))`.

#[macro_export]
macro_rules! ctx {
    ($fmt:tt) => {
        |e| anyhow::Context::context(Result::<(), _>::Err(e), format!($fmt))
            .err().expect("context on Err gives Err")
    };
    ($fmt:tt, $($arg:tt)*) => {
        |e| anyhow::Context::context(Result::<(), _>::Err(e), format!($fmt, $($arg)*))
            .err().expect("context on Err gives Err")
    };
}
