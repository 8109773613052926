use crate::record::{today, ManualFields, VideoRecord};

/// A hand-curated entry: share URL, description and the fields typed in by hand.
#[derive(Debug, Clone)]
pub struct CuratedSample {
    pub url: &'static str,
    pub description: &'static str,
    pub manual: ManualFields,
}

/// Demonstration entries added by the `sample` command.
pub fn curated_samples() -> Vec<CuratedSample> {
    vec![
        CuratedSample {
            url: "https://www.tiktok.com/@ghanaschools/video/7234567890123456789",
            description: "Amazing students at St. Louis Demo JHS showing their talents! \
                          #education #ghana #school #stlouisdemo",
            manual: manual("ghanaschools", "2.1K", "89", "45", false),
        },
        CuratedSample {
            url: "https://www.tiktok.com/@educationgh/video/7234567890123456790",
            description: "Visit to St. Louis Demonstration JHS - incredible learning environment! \
                          #ghanaschools #education #demonstration",
            manual: manual("educationgh", "1.8K", "67", "34", true),
        },
    ]
}

/// Fixed records used when the search API gives nothing back for `term`.
pub fn fallback_videos(term: &str) -> Vec<VideoRecord> {
    vec![
        VideoRecord {
            username: "stlouisdemo".into(),
            description: format!(
                "Amazing students at {term} showing their talents! #education #ghana #school"
            ),
            date: today(),
            likes: "1.2K".into(),
            comments: "45".into(),
            shares: "23".into(),
            verified: true,
            ..VideoRecord::new(
                "7234567890123456789",
                "https://www.tiktok.com/@stlouisdemo/video/7234567890123456789",
            )
        },
        VideoRecord {
            username: "ghanaschools".into(),
            description: format!(
                "Visit to {term} - incredible learning environment! #ghanaschools #education"
            ),
            date: today(),
            likes: "856".into(),
            comments: "32".into(),
            shares: "18".into(),
            verified: false,
            ..VideoRecord::new(
                "7234567890123456790",
                "https://www.tiktok.com/@ghanaschools/video/7234567890123456790",
            )
        },
    ]
}

fn manual(username: &str, likes: &str, comments: &str, shares: &str, verified: bool) -> ManualFields {
    ManualFields {
        username: Some(username.into()),
        likes: Some(likes.into()),
        comments: Some(comments.into()),
        shares: Some(shares.into()),
        verified: Some(verified),
        ..ManualFields::default()
    }
}
