//! Email domain gate for the internal grants view.

/// The only organization whose members may see internal grants.
pub const AUTHORIZED_DOMAIN: &str = "ethereum.org";

/// Check whether `email` belongs to [`AUTHORIZED_DOMAIN`].
///
/// The domain after the last `@` must equal it exactly, ignoring case.
/// Subdomains and look-alike suffixes are not accepted.
pub fn is_authorized_email(email: &str) -> bool {
    match email.rfind('@') {
        Some(at) if at > 0 => email[at + 1..].eq_ignore_ascii_case(AUTHORIZED_DOMAIN),
        _ => false,
    }
}
