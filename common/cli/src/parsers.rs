use std::ffi::OsStr;

use clap::builder::TypedValueParser;
use clap::error::ErrorKind;
use clap::{Arg, Command, Error};

/// Accepts an absolute `http`/`https` url, e.g. 'http://localhost:8000/api/'.
///
/// Trailing slashes are removed so that paths like `/books` can be appended as-is.
#[derive(Clone, Default)]
pub struct BaseUrlParser {}

impl TypedValueParser for BaseUrlParser {
    type Value = String;

    fn parse_ref(&self, _cmd: &Command, _arg: Option<&Arg>, value: &OsStr) -> Result<Self::Value, Error> {
        let value = value
            .to_str()
            .ok_or_else(|| Error::raw(ErrorKind::InvalidValue, "Invalid argument encoding"))?;

        base_url_parser(value).map_err(|error| Error::raw(ErrorKind::InvalidValue, error))
    }
}

pub fn base_url_parser(s: &str) -> Result<String, String> {
    let trimmed = s.trim().trim_end_matches('/');

    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            format!(
                "Invalid base url. Required format: 'http://<HOST>[:<PORT>][/<PATH>]', found: '{}'\n",
                s
            )
        })?;

    if host.is_empty() || host.starts_with('/') {
        return Err(format!("Invalid base url, missing host, found: '{}'\n", s));
    }

    Ok(trimmed.to_string())
}
