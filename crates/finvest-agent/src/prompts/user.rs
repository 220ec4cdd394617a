//! User-turn message bodies paired with the system prompts

/// Per-company analysis request carrying the assembled data bundle
pub fn analyze_user_message(company_name: &str, content: &str) -> String {
    format!("Analyze the following data for {company_name}:\n\n{content}")
}

/// Comparative request over banner-separated per-company reports
pub fn compare_user_message(content: &str) -> String {
    format!("Compare these companies based on the following data:\n{content}")
}

/// One half of a split transcript, `part` is 1 or 2
pub fn transcript_part_user_message(part: u8, text: &str) -> String {
    format!("Analyze this earnings call transcript part {part}:\n\n{text}")
}

/// Merge request over the two half-summaries
pub fn transcript_combine_user_message(part1_summary: &str, part2_summary: &str) -> String {
    format!("Combine these analyses:\n\nPart 1:\n{part1_summary}\n\nPart 2:\n{part2_summary}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_message_layout() {
        let message = analyze_user_message("REC Limited", "FINANCIAL DATA:\nrevenue");
        assert!(message.starts_with("Analyze the following data for REC Limited:"));
        assert!(message.ends_with("FINANCIAL DATA:\nrevenue"));
    }

    #[test]
    fn test_transcript_part_numbers() {
        assert!(transcript_part_user_message(1, "text").contains("part 1"));
        assert!(transcript_part_user_message(2, "text").contains("part 2"));
    }
}
