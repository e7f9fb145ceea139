/// Privacy notice shown to guardians of children under the age threshold.
static PRIVACY_NOTICE: &str = "\
Privacy Notice for Children Under 13:

We take your child's privacy seriously. This app is designed to be safe and educational.

What we collect:
- A username (display name only)
- Age for appropriate content
- Story progress and preferences
- Drawings and voice recordings (with parental permission)

What we DON'T collect:
- Real names
- Addresses or location
- Contact information (except parent email)
- Any unnecessary personal information

Data is automatically deleted according to our retention policy.
Parents can request data deletion at any time.
";

/// Returns the child privacy notice text.
#[must_use]
pub fn privacy_notice() -> &'static str {
    PRIVACY_NOTICE
}

#[cfg(test)]
mod tests {
    use super::privacy_notice;

    #[test]
    fn notice_mentions_parental_permission_and_deletion() {
        let notice = privacy_notice();
        assert!(notice.contains("with parental permission"));
        assert!(notice.contains("request data deletion"));
    }
}
