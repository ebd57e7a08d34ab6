//! Short form generation and short URL composition.
//!
//! Short forms are drawn uniformly from the case-sensitive alphanumeric
//! alphabet (62 symbols). Six symbols give ~5.7e10 combinations, so
//! collisions are improbable but possible; the store rejects them through a
//! unique constraint instead of overwriting.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Number of symbols in a generated short form.
pub const SHORT_FORM_LENGTH: usize = 6;

/// Path under which short forms are resolved.
pub const SHORT_URL_PATH: &str = "/api/v1/short_url/";

/// Generates a random short form.
pub fn generate_short_form() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_FORM_LENGTH)
        .map(char::from)
        .collect()
}

/// Builds externally resolvable short URLs for the advertised origin.
#[derive(Debug, Clone)]
pub struct AliasGenerator {
    base: String,
}

impl AliasGenerator {
    /// Creates a generator for `{scheme}://{host}:{port}`.
    pub fn new(scheme: &str, host: &str, port: u16) -> Self {
        Self {
            base: format!("{}://{}:{}{}", scheme, host, port, SHORT_URL_PATH),
        }
    }

    /// Returns a fresh `(short_form, short_url)` pair.
    pub fn next_alias(&self) -> (String, String) {
        let short_form = generate_short_form();
        let short_url = self.short_url(&short_form);
        (short_form, short_url)
    }

    pub fn short_url(&self, short_form: &str) -> String {
        format!("{}{}", self.base, short_form)
    }
}
