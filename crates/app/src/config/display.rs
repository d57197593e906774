//! Display Config

use rusty_money::iso::{self, Currency};

/// Look up an ISO 4217 currency by its alphabetic code, in any case.
pub(crate) fn parse_currency(code: &str) -> Result<&'static Currency, String> {
    iso::find(&code.trim().to_uppercase()).ok_or_else(|| format!("unknown currency code `{code}`"))
}
