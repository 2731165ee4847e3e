use validator::ValidateEmail;

/// An email address that has passed the same shape check a browser applies to
/// `<input type="email">`. Leading/trailing whitespace is dropped before
/// checking, as browsers do.
///
/// Must be instantiated with `WaitlistEmail::parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistEmail(String);

impl WaitlistEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        let candidate = email.trim().to_owned();
        ValidateEmail::validate_email(&candidate)
            .then_some(Self(candidate.clone()))
            .ok_or(format!("Invalid email: {email:?}"))
    }
}

impl AsRef<str> for WaitlistEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for WaitlistEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
