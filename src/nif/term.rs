//! Elixir Term Conversion Utilities
//!
//! Path addresses cross the boundary as lists of binaries; results use the
//! usual `{:ok, value}` / `{:error, reason}` shape.

use crate::error::Result;
use crate::position::PathAddress;
use rustler::{Decoder, Encoder, Env, NewBinary, NifResult, Term};

rustler::atoms! {
    ok,
    error,
}

impl Encoder for PathAddress {
    fn encode<'a>(&self, env: Env<'a>) -> Term<'a> {
        let mut list = Term::list_new_empty(env);
        for selector in self.to_strings().iter().rev() {
            list = list.list_prepend(str_to_binary(env, selector));
        }
        list
    }
}

impl<'a> Decoder<'a> for PathAddress {
    fn decode(term: Term<'a>) -> NifResult<Self> {
        let selectors: Vec<String> = term.decode()?;
        Ok(PathAddress::from(selectors))
    }
}

/// `{:ok, value}` or `{:error, message}`
pub fn result_to_term<'a, T: Encoder>(env: Env<'a>, result: Result<T>) -> Term<'a> {
    match result {
        Ok(value) => (ok(), value).encode(env),
        Err(e) => (error(), str_to_binary(env, &e.to_string())).encode(env),
    }
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
