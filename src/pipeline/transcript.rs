use crate::locale::Locale;
use crate::services::VideoDetails;

/// Assemble the metadata block that stands in for a YouTube transcript.
///
/// Field order and blank lines are fixed; only numbers and the publish date
/// depend on `locale`.
pub fn assemble_metadata_transcript(details: &VideoDetails, locale: Locale) -> String {
    format!(
        "Title: {}\n\nChannel: {}\nPublished: {}\nViews: {}\nLikes: {}\n\nDescription:\n{}",
        details.title,
        details.channel_title,
        locale.format_date(&details.published_at),
        locale.format_count(details.view_count.as_deref()),
        locale.format_count(details.like_count.as_deref()),
        details.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> VideoDetails {
        VideoDetails {
            title: "T".into(),
            description: "D".into(),
            channel_title: "C".into(),
            published_at: "2024-01-02T00:00:00Z".into(),
            view_count: Some("1234".into()),
            like_count: Some("5".into()),
        }
    }

    #[test]
    fn test_template_en_us() {
        assert_eq!(
            assemble_metadata_transcript(&details(), Locale::EnUs),
            "Title: T\n\nChannel: C\nPublished: 1/2/2024\nViews: 1,234\nLikes: 5\n\nDescription:\nD"
        );
    }

    #[test]
    fn test_template_de_de() {
        assert_eq!(
            assemble_metadata_transcript(&details(), Locale::DeDe),
            "Title: T\n\nChannel: C\nPublished: 2.1.2024\nViews: 1.234\nLikes: 5\n\nDescription:\nD"
        );
    }

    #[test]
    fn test_hidden_likes_and_multiline_description() {
        let mut details = details();
        details.like_count = None;
        details.description = "line one\nline two".into();
        let transcript = assemble_metadata_transcript(&details, Locale::EnUs);
        assert!(transcript.contains("\nLikes: NaN\n"));
        assert!(transcript.ends_with("Description:\nline one\nline two"));
    }
}
