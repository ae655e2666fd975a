//! Helper functions callable from templates.
//!
//! ## Functions
//!
//! - `substitute(name)` - dictionary lookup, undefined when the name is missing
//! - `counter(n)` - the sequence `0..n`, produced lazily
//! - `left(s, n)`, `right(s, n)`, `mid(s, begin, length)` - byte-indexed slicing
//! - `add(a, b)`, `sub(a, b)` - unsigned arithmetic, wrapping on overflow
//!
//! Numeric arguments go through [`normalize`], so `add("2", 3.0)` works
//! whichever source the operands came from.
//!
//! ### Example
//!
//! ```jinja
//! {% for i in counter(substitute("replicas")) %}
//! node-{{ add(i, 1) }}: {{ left(substitute("prefix"), 3) }}
//! {% endfor %}
//! ```

use std::sync::Arc;

use minijinja::value::{Enumerator, Object, ObjectRepr};
use minijinja::{Environment, ErrorKind};

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::normalize::normalize;
use crate::value::Value;

/// Returns the dictionary value for `name`, if any.
pub fn substitute<'a>(dictionary: &'a Dictionary, name: &str) -> Option<&'a Value> {
    dictionary.get(name)
}

/// The sequence `0, 1, ..., n-1`.
///
/// Items are computed on access, so `counter(-1)` (normalized to `u64::MAX`)
/// is as cheap to create as `counter(3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    len: u64,
}

impl Counter {
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> std::ops::Range<u64> {
        0..self.len
    }
}

impl Object for Counter {
    fn repr(self: &Arc<Self>) -> ObjectRepr {
        ObjectRepr::Seq
    }

    fn get_value(self: &Arc<Self>, key: &minijinja::Value) -> Option<minijinja::Value> {
        let index = u64::try_from(key.as_usize()?).ok()?;
        (index < self.len).then(|| minijinja::Value::from(index))
    }

    fn enumerate(self: &Arc<Self>) -> Enumerator {
        // Lengths beyond the address space are capped; nothing is allocated.
        Enumerator::Seq(usize::try_from(self.len).unwrap_or(usize::MAX))
    }
}

/// Produces the lazy sequence `0, 1, ..., n-1`.
pub fn counter(n: &Value) -> Result<Counter> {
    Ok(Counter { len: normalize(n)? })
}

/// Returns the first `n` bytes of `s`.
///
/// # Errors
/// * `Error::IndexOutOfRange` if `n` exceeds the length of `s` or splits a character
pub fn left(s: &str, n: &Value) -> Result<String> {
    let n = normalize(n)?;
    slice(s, 0, n)
}

/// Returns the last `n` bytes of `s`.
pub fn right(s: &str, n: &Value) -> Result<String> {
    let n = normalize(n)?;
    let begin = (s.len() as u64)
        .checked_sub(n)
        .ok_or(Error::IndexOutOfRange { index: n, length: s.len() })?;
    slice(s, begin, s.len() as u64)
}

/// Returns the bytes `[begin, begin + length)` of `s`.
pub fn mid(s: &str, begin: &Value, length: &Value) -> Result<String> {
    let begin = normalize(begin)?;
    let length = normalize(length)?;
    let end = begin
        .checked_add(length)
        .ok_or(Error::IndexOutOfRange { index: u64::MAX, length: s.len() })?;
    slice(s, begin, end)
}

pub fn add(a: &Value, b: &Value) -> Result<u64> {
    Ok(normalize(a)?.wrapping_add(normalize(b)?))
}

/// Subtracts `b` from `a`; `sub(2, 5)` wraps around instead of failing.
pub fn sub(a: &Value, b: &Value) -> Result<u64> {
    Ok(normalize(a)?.wrapping_sub(normalize(b)?))
}

fn slice(s: &str, begin: u64, end: u64) -> Result<String> {
    let out_of_range = |index| Error::IndexOutOfRange { index, length: s.len() };
    let from = usize::try_from(begin).map_err(|_| out_of_range(begin))?;
    let to = usize::try_from(end).map_err(|_| out_of_range(end))?;
    if from > s.len() {
        return Err(out_of_range(begin));
    }
    s.get(from..to).map(str::to_string).ok_or_else(|| out_of_range(end))
}

fn to_template_error(err: Error) -> minijinja::Error {
    minijinja::Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

/// Registers the helper functions on a MiniJinja environment.
///
/// `substitute` keeps a shared handle on `dictionary`; the other helpers are pure.
pub fn register_functions(env: &mut Environment<'static>, dictionary: Arc<Dictionary>) {
    env.add_function("substitute", move |name: String| -> minijinja::Value {
        substitute(&dictionary, &name)
            .map(minijinja::Value::from_serialize)
            .unwrap_or(minijinja::Value::UNDEFINED)
    });
    env.add_function(
        "counter",
        |n: minijinja::Value| -> std::result::Result<minijinja::Value, minijinja::Error> {
            counter(&Value::from(&n))
                .map(minijinja::Value::from_object)
                .map_err(to_template_error)
        },
    );
    env.add_function(
        "left",
        |s: String, n: minijinja::Value| -> std::result::Result<String, minijinja::Error> {
            left(&s, &Value::from(&n)).map_err(to_template_error)
        },
    );
    env.add_function(
        "right",
        |s: String, n: minijinja::Value| -> std::result::Result<String, minijinja::Error> {
            right(&s, &Value::from(&n)).map_err(to_template_error)
        },
    );
    env.add_function(
        "mid",
        |s: String,
         begin: minijinja::Value,
         length: minijinja::Value|
         -> std::result::Result<String, minijinja::Error> {
            mid(&s, &Value::from(&begin), &Value::from(&length)).map_err(to_template_error)
        },
    );
    env.add_function(
        "add",
        |a: minijinja::Value, b: minijinja::Value| -> std::result::Result<u64, minijinja::Error> {
            add(&Value::from(&a), &Value::from(&b)).map_err(to_template_error)
        },
    );
    env.add_function(
        "sub",
        |a: minijinja::Value, b: minijinja::Value| -> std::result::Result<u64, minijinja::Error> {
            sub(&Value::from(&a), &Value::from(&b)).map_err(to_template_error)
        },
    );
}
