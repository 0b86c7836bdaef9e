//! Built-in keyword tables for the waste-management assistants
//!
//! Tables are built once on first use and shared for the life of the process.

use super::engine::SupportMode;
use super::keywords::KeywordTable;
use once_cell::sync::Lazy;

/// Configuration of the single-domain FAQ assistant
#[derive(Debug)]
pub struct FaqProfile {
    /// Window title
    pub title: &'static str,
    /// Bot message seeded when the chat opens
    pub greeting: &'static str,
    /// Patterns answered with `greeting_reply`, checked before the table
    pub greeting_patterns: &'static [&'static str],
    /// Reply to a greeting
    pub greeting_reply: &'static str,
    /// Pattern answered with `help_reply`, checked after greetings
    pub help_pattern: &'static str,
    /// Reply listing what the assistant can do
    pub help_reply: &'static str,
    /// Domain keywords and the fallback reply
    pub table: KeywordTable,
}

/// Configuration of one support-assistant mode
#[derive(Debug)]
pub struct ModeProfile {
    /// Mode this profile configures
    pub mode: SupportMode,
    /// Panel title
    pub title: &'static str,
    /// Bot message seeded when the mode opens
    pub greeting: &'static str,
    /// Keywords and the mode's fallback reply
    pub table: KeywordTable,
}

static FAQ: Lazy<FaqProfile> = Lazy::new(|| FaqProfile {
    title: "Waste Management Assistant",
    greeting: "Hello! I'm your waste management assistant. Ask me about collection schedules, waste segregation, or filing complaints.",
    greeting_patterns: &["hello", "hi", "hey"],
    greeting_reply: "Hello! How can I help you with waste management today?",
    help_pattern: "help",
    help_reply: "I can help you with:\n• Collection schedules\n• Waste segregation guidelines\n• Filing complaints\n• Contact information\n• Payment queries",
    table: KeywordTable::builder()
        .keyword(
            "collection schedule",
            "Waste collection schedules vary by ward. Generally, wet waste is collected daily, dry waste 3 times a week, and hazardous waste once a month. Check with your local collector for specific timings.",
        )
        .keyword(
            "segregation",
            "Proper waste segregation is crucial: \n• Wet waste: Food scraps, vegetable peels, garden waste\n• Dry waste: Paper, plastic, metal, glass\n• Hazardous waste: Electronics, batteries, medical waste",
        )
        .keyword(
            "complaint",
            "To file a complaint: \n1. Go to the Complaints section\n2. Fill out the complaint form\n3. Add photos if available\n4. Submit and track the status",
        )
        .keyword(
            "contact",
            "For urgent issues, contact your ward office directly. Non-urgent complaints can be submitted through this portal.",
        )
        .keyword(
            "payment",
            "Waste collection fees are typically charged monthly. Contact your ward office for payment methods and schedules.",
        )
        .default_response(
            "I'm sorry, I didn't understand that. Try asking about collection schedules, waste segregation, complaints, or type \"help\" for more options.",
        )
        .build()
        .expect("built-in FAQ table is valid"),
});

static SUPPORT: Lazy<[ModeProfile; 3]> = Lazy::new(|| {
    [
        ModeProfile {
            mode: SupportMode::Help,
            title: "Help Center",
            greeting: "Hi! I'm here to help you navigate the app. What would you like to know?",
            table: KeywordTable::builder()
                .keyword(
                    "collection",
                    "To manage waste collections, go to the Collections page from the sidebar. You can view scheduled pickups and their status.",
                )
                .keyword(
                    "complaint",
                    "To file a complaint, navigate to the Complaints page. Click \"New Complaint\" and fill in the details.",
                )
                .keyword(
                    "profile",
                    "You can update your profile in Settings. Click on your avatar or name to access profile settings.",
                )
                .keyword(
                    "notification",
                    "Notification preferences can be managed in Settings under the Notification Preferences section.",
                )
                .keyword(
                    "dashboard",
                    "The dashboard shows your overview. Admins see system-wide stats, collectors see their routes, and residents see their collection schedule.",
                )
                .default_response(
                    "I can help you with collections, complaints, profiles, notifications, and dashboard navigation. What would you like to know more about?",
                )
                .build()
                .expect("built-in help table is valid"),
        },
        ModeProfile {
            mode: SupportMode::Support,
            title: "Contact Support",
            greeting: "Hello! I'm here to help with any technical issues or questions. Please describe your problem.",
            table: KeywordTable::builder()
                .keyword(
                    "login",
                    "If you're having trouble logging in, try resetting your password. If the issue persists, our team will assist you within 24 hours.",
                )
                .keyword(
                    "error",
                    "Please describe the error message you're seeing, and I'll help troubleshoot. Common issues can often be resolved by refreshing the page.",
                )
                .keyword(
                    "account",
                    "For account-related issues, I can help with password resets, email changes, or account access problems.",
                )
                .keyword(
                    "payment",
                    "For billing or payment questions, our support team will respond within 24 hours. Please provide your account details.",
                )
                .default_response(
                    "I've logged your support request. Our team typically responds within 24 hours. Is there anything specific I can help with right now?",
                )
                .build()
                .expect("built-in support table is valid"),
        },
        ModeProfile {
            mode: SupportMode::Issue,
            title: "Report an Issue",
            greeting: "Thank you for reporting an issue. Please describe what's not working as expected.",
            table: KeywordTable::builder()
                .keyword(
                    "bug",
                    "Thank you for reporting this bug. I've logged it for our development team. Can you provide steps to reproduce it?",
                )
                .keyword(
                    "slow",
                    "If the app is running slowly, try clearing your browser cache or using a different browser. I've noted the performance issue.",
                )
                .keyword(
                    "missing",
                    "If you're seeing missing data or features, please let me know which page you're on. I've logged this issue.",
                )
                .keyword(
                    "broken",
                    "Thank you for reporting this broken feature. Our team will investigate. Can you tell me what you were trying to do?",
                )
                .default_response(
                    "I've logged your issue report. Our team reviews all reports and prioritizes them based on severity. Thank you for helping us improve!",
                )
                .build()
                .expect("built-in issue table is valid"),
        },
    ]
});

/// The FAQ assistant's configuration
pub fn faq_profile() -> &'static FaqProfile {
    &FAQ
}

/// The support assistant's configuration for `mode`
pub fn mode_profile(mode: SupportMode) -> &'static ModeProfile {
    let index = match mode {
        SupportMode::Help => 0,
        SupportMode::Support => 1,
        SupportMode::Issue => 2,
    };
    &SUPPORT[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_build() {
        assert_eq!(faq_profile().table.len(), 5);
        for mode in SupportMode::ALL {
            let profile = mode_profile(mode);
            assert_eq!(profile.mode, mode);
            assert!(!profile.table.is_empty());
        }
    }

    #[test]
    fn test_faq_keywords_in_declaration_order() {
        let keywords: Vec<_> = faq_profile().table.keywords().collect();
        assert_eq!(
            keywords,
            vec![
                "collection schedule",
                "segregation",
                "complaint",
                "contact",
                "payment"
            ]
        );
    }

    #[test]
    fn test_bullet_formatting_preserved() {
        let segregation = faq_profile().table.lookup("segregation");
        assert!(segregation.contains("\n• Wet waste"));
    }

    #[test]
    fn test_help_mode_has_no_login_keyword() {
        assert!(mode_profile(SupportMode::Help)
            .table
            .keywords()
            .all(|k| k != "login"));
    }
}
