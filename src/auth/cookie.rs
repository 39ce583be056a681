use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, CookieJar, Key, SameSite};
use sha2::{Digest, Sha512};

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth-token";

/// Issues, clears and verifies the signed session cookie.
#[derive(Clone)]
pub struct AuthCookie {
    key: Key,
    secure: bool,
    max_age: Duration,
}

impl AuthCookie {
    /// The signing key is derived from `secret` with SHA-512, which yields the
    /// 64 bytes `Key` expects for any secret length.
    pub fn new(secret: &str, secure: bool, max_age_days: i64) -> Self {
        let digest = Sha512::digest(secret.as_bytes());
        Self {
            key: Key::from(digest.as_slice()),
            secure,
            max_age: Duration::days(max_age_days),
        }
    }

    /// A signed cookie carrying `token`.
    pub fn issue(&self, token: &str) -> Cookie<'static> {
        let cookie = self.base(token.to_owned()).max_age(self.max_age).finish();

        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(cookie);
        jar.get(AUTH_COOKIE).cloned().unwrap_or_else(|| Cookie::named(AUTH_COOKIE))
    }

    /// A cookie instructing the client to drop the session cookie.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.base(String::new()).finish();
        cookie.make_removal();
        cookie
    }

    /// The token inside `cookie`, or `None` when its signature does not verify.
    pub fn read(&self, cookie: Cookie<'static>) -> Option<String> {
        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        jar.signed(&self.key)
            .get(AUTH_COOKIE)
            .map(|verified| verified.value().to_owned())
    }

    fn base(&self, value: String) -> actix_web::cookie::CookieBuilder<'static> {
        Cookie::build(AUTH_COOKIE, value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(self.secure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issued_cookie_attributes() {
        let cookies = AuthCookie::new("cookie-secret", true, 7);
        let cookie = cookies.issue("token-value");

        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_ne!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_read_verifies_signature() {
        let cookies = AuthCookie::new("cookie-secret", false, 7);
        let issued = cookies.issue("token-value");

        assert_eq!(cookies.read(issued.clone()).as_deref(), Some("token-value"));

        let other = AuthCookie::new("another-secret", false, 7);
        assert_eq!(other.read(issued), None);

        let unsigned = Cookie::new(AUTH_COOKIE, "token-value");
        assert_eq!(cookies.read(unsigned), None);
    }

    #[test]
    fn test_removal_expires_cookie() {
        let cookie = AuthCookie::new("cookie-secret", false, 7).removal();
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
