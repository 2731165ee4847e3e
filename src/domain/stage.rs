use unicode_segmentation::UnicodeSegmentation;

/// Optional free-text context ("where are you in the journey?") sent alongside
/// an email. Blank input is not a stage at all, hence `parse` returns
/// `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage(String);

impl Stage {
    pub const MAX_GRAPHEMES: usize = 256;

    pub fn parse(stage: String) -> Result<Option<Self>, String> {
        let trimmed = stage.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        match trimmed.graphemes(true).count() > Self::MAX_GRAPHEMES {
            true => Err(format!(
                "Stage is longer than {} characters",
                Self::MAX_GRAPHEMES
            )),
            false => Ok(Some(Self(trimmed.to_owned()))),
        }
    }
}

impl AsRef<str> for Stage {
    fn as_ref(&self) -> &str { &self.0 }
}
