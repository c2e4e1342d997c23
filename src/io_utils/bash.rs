//! Render command lines for log messages so that they can be copied
//! into a shell to reproduce a single sample by hand.

use std::{borrow::Cow, ffi::OsStr};

use itertools::Itertools;

const CHARS_NOT_NEEDING_QUOTING: &str = "_:.-+,/=@[]^";

pub fn bash_string_literal(s: &str) -> Cow<'_, str> {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || CHARS_NOT_NEEDING_QUOTING.contains(c))
    {
        s.into()
    } else {
        let mut ss = String::new();
        ss.push('\'');
        for c in s.chars() {
            if c == '\'' {
                ss.push_str("'\\''");
            } else {
                ss.push(c);
            }
        }
        ss.push('\'');
        ss.into()
    }
}

pub fn bash_string_from_program_and_args(
    program: &OsStr,
    args: impl IntoIterator<Item = impl AsRef<OsStr>>,
) -> String {
    std::iter::once(bash_string_literal(&program.to_string_lossy()).into_owned())
        .chain(
            args.into_iter()
                .map(|arg| bash_string_literal(&arg.as_ref().to_string_lossy()).into_owned()),
        )
        .join(" ")
}
