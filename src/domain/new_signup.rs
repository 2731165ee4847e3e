use serde::Serialize;

use super::Stage;
use super::WaitlistEmail;

/// The payload sent to the waitlist service. `stage` is omitted entirely when
/// absent, rather than sent as null.
#[derive(Debug, Clone, Serialize)]
pub struct NewSignup {
    #[serde(serialize_with = "as_str")]
    pub email: WaitlistEmail,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "option_as_str"
    )]
    pub stage: Option<Stage>,
}

fn as_str<S, T>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    T: AsRef<str>,
{
    serializer.serialize_str(value.as_ref())
}

fn option_as_str<S>(
    value: &Option<Stage>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(stage) => serializer.serialize_str(stage.as_ref()),
        None => serializer.serialize_none(),
    }
}
