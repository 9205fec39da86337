use std::io::Write;

use drivelink_clipboard::{CopyIndicator, copy_via};
use drivelink_core::{ConversionResult, DriveLinkResult, MediaType};
use drivelink_url::DriveConverter;
use tokio::sync::watch;

pub const COPIED_STATUS: &str = "Copied to clipboard!";

/// What the user asked for on one line of the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Convert(String),
    Toggle,
    Copy,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" | ":q" | ":quit" => Command::Quit,
            ":t" | ":toggle" => Command::Toggle,
            ":c" | ":copy" => Command::Copy,
            text => Command::Convert(text.to_string()),
        }
    }
}

/// Interactive view state: the pasted text, the selected media type and the
/// copied indicator. The output is never stored; it is recomputed from the
/// other two whenever it is read.
pub struct Session {
    converter: DriveConverter,
    input: String,
    media_type: MediaType,
    indicator: CopyIndicator,
}

impl Session {
    pub fn new(media_type: MediaType) -> Self {
        Self {
            converter: DriveConverter,
            input: String::new(),
            media_type,
            indicator: CopyIndicator::new(),
        }
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn toggle_media_type(&mut self) {
        self.media_type = self.media_type.toggled();
    }

    pub fn output(&self) -> String {
        self.converter.convert(&self.input, self.media_type)
    }

    pub fn result(&self) -> ConversionResult {
        self.converter.convert_detailed(&self.input, self.media_type)
    }

    pub fn is_copied(&self) -> bool {
        self.indicator.is_copied()
    }

    /// Status text the view shows next to the prompt, if any.
    pub fn status(&self) -> Option<&'static str> {
        self.is_copied().then_some(COPIED_STATUS)
    }

    pub fn copied_state(&self) -> watch::Receiver<bool> {
        self.indicator.subscribe()
    }

    /// Copies the current output, entering the copied state on success.
    /// Returns `false` when there is nothing to copy.
    pub fn copy_to<W: Write>(&mut self, writer: &mut W) -> DriveLinkResult<bool> {
        let copied = copy_via(writer, &self.output())?;
        if copied {
            self.indicator.mark_copied();
        }
        Ok(copied)
    }
}

/// Resolves once the copied state has reverted, or the session is gone.
pub async fn until_reverted(mut copied: watch::Receiver<bool>) {
    let _ = copied.wait_for(|copied| !*copied).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivelink_clipboard::COPIED_DURATION;
    use std::time::Duration;

    const SHARE_URL: &str = "https://drive.google.com/file/d/1A2b3C4d_5/view?usp=sharing";

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse(""), Command::Quit);
        assert_eq!(Command::parse(" :q "), Command::Quit);
        assert_eq!(Command::parse(":t"), Command::Toggle);
        assert_eq!(Command::parse(":copy"), Command::Copy);
        assert_eq!(
            Command::parse(" https://drive.google.com/file/d/x/view "),
            Command::Convert("https://drive.google.com/file/d/x/view".to_string())
        );
    }

    #[tokio::test]
    async fn output_follows_input_and_media_type() {
        let mut session = Session::new(MediaType::Image);
        assert_eq!(session.output(), "");

        session.set_input(SHARE_URL);
        assert!(session.output().ends_with("id=1A2b3C4d_5&media_type=png"));

        session.toggle_media_type();
        assert_eq!(session.media_type(), MediaType::Video);
        assert!(session.output().ends_with("id=1A2b3C4d_5&media_type=mp4"));

        session.set_input("https://example.com/no-id-here");
        assert_eq!(session.output(), "");
        assert_eq!(session.result().download_url, None);
    }

    #[tokio::test]
    async fn copy_enters_copied_state_only_with_output() {
        let mut session = Session::new(MediaType::Video);
        let mut out = Vec::new();

        assert!(!session.copy_to(&mut out).unwrap());
        assert!(!session.is_copied());
        assert!(out.is_empty());

        session.set_input(SHARE_URL);
        assert!(session.copy_to(&mut out).unwrap());
        assert!(session.is_copied());
        assert!(!out.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn copied_status_clears_after_duration() {
        let mut session = Session::new(MediaType::Image);
        session.set_input(SHARE_URL);
        assert_eq!(session.status(), None);

        session.copy_to(&mut Vec::new()).unwrap();
        assert_eq!(session.status(), Some(COPIED_STATUS));
        let reverted = tokio::spawn(until_reverted(session.copied_state()));

        tokio::time::sleep(COPIED_DURATION - Duration::from_millis(100)).await;
        tokio::task::yield_now().await;
        assert_eq!(session.status(), Some(COPIED_STATUS));
        assert!(!reverted.is_finished());

        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::task::yield_now().await;
        assert_eq!(session.status(), None);
        reverted.await.unwrap();
    }

    #[tokio::test]
    async fn detailed_result_warns_for_non_drive_links() {
        let mut session = Session::new(MediaType::Video);
        session.set_input("https://example.com/d/abc");
        let result = session.result();
        assert_eq!(result.download_url.as_deref(), Some(session.output().as_str()));
        assert!(result.warning.is_some());
    }
}
